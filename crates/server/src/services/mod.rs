//! Business logic: the registration saga, commission recording, the
//! brand-link steps, and clients for external collaborators (Stripe,
//! background removal, the local file store).

pub mod auth;
pub mod background_removal;
pub mod commission;
pub mod product_brand;
pub mod registration;
pub mod saga;
pub mod stripe;
pub mod uploads;
