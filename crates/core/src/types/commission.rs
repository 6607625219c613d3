//! Platform commission arithmetic.
//!
//! Commission is a fixed-rate cut of an order total, computed once when
//! the order-placed event is recorded. There is no later recalculation
//! path, so the derived amounts are denormalized onto the order.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Platform commission rate applied to every order (10%).
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// The platform's cut of an order and the vendor's remainder.
///
/// Amounts are rounded to whole currency units, half away from zero,
/// matching how totals are presented to vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    /// The rate the amounts were derived from.
    pub rate: Decimal,
    /// Platform's cut: `round(total * rate)`.
    pub commission_amount: Decimal,
    /// Vendor's estimated payout: `round(total * (1 - rate))`.
    pub payout_estimate: Decimal,
}

impl CommissionBreakdown {
    /// Compute the breakdown for an order total at the fixed platform rate.
    #[must_use]
    pub fn for_total(total: Decimal) -> Self {
        Self::at_rate(total, COMMISSION_RATE)
    }

    /// Compute the breakdown for an order total at an explicit rate.
    #[must_use]
    pub fn at_rate(total: Decimal, rate: Decimal) -> Self {
        let round = |d: Decimal| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self {
            rate,
            commission_amount: round(total * rate),
            payout_estimate: round(total * (Decimal::ONE - rate)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_percent_of_round_total() {
        let b = CommissionBreakdown::for_total(Decimal::from(1000));
        assert_eq!(b.commission_amount, Decimal::from(100));
        assert_eq!(b.payout_estimate, Decimal::from(900));
    }

    #[test]
    fn test_fractional_total_rounds_half_away_from_zero() {
        // 10% of 1235 = 123.5 -> rounds to 124, payout 1111.5 -> 1112
        let b = CommissionBreakdown::for_total(Decimal::from(1235));
        assert_eq!(b.commission_amount, Decimal::from(124));
        assert_eq!(b.payout_estimate, Decimal::from(1112));
    }

    #[test]
    fn test_zero_total() {
        let b = CommissionBreakdown::for_total(Decimal::ZERO);
        assert_eq!(b.commission_amount, Decimal::ZERO);
        assert_eq!(b.payout_estimate, Decimal::ZERO);
    }

    #[test]
    fn test_rate_constant_is_ten_percent() {
        assert_eq!(COMMISSION_RATE, Decimal::new(10, 2));
    }
}
