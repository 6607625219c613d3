//! Status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Payout status recorded on an order once commission is computed.
///
/// Initialized to `Pending` by the order-placed handler; later states are
/// driven by the (manual, monthly) payout reconciliation process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Paid,
    OnHold,
}

impl PayoutStatus {
    /// The wire/storage representation (`"pending"`, `"paid"`, `"on_hold"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::OnHold => "on_hold",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&PayoutStatus::Pending).expect("serialize");
        assert_eq!(json, "\"pending\"");
        assert_eq!(PayoutStatus::OnHold.as_str(), "on_hold");
    }
}
