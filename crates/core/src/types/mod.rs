//! Core types for Agora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod commission;
pub mod email;
pub mod handle;
pub mod id;
pub mod status;

pub use commission::{COMMISSION_RATE, CommissionBreakdown};
pub use email::{Email, EmailError};
pub use handle::{Handle, HandleError, random_suffix};
pub use id::*;
pub use status::PayoutStatus;
