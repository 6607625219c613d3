//! Integration tests for Agora.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p agora-cli -- migrate
//!
//! # Start the server
//! cargo run -p agora-server
//!
//! # Run the (ignored) end-to-end tests
//! cargo test -p agora-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `AGORA_BASE_URL` - server under test (default `http://localhost:9000`)
//! - `STORE_REGISTRATION_CODE` - set to the server's configured code to
//!   exercise the registration gate tests
//!
//! # Test Categories
//!
//! - `store_registration` - the registration saga end to end
//! - `admin_brands` - brand CRUD, slugs, and product↔brand links
