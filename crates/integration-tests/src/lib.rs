//! Integration tests for the pre-checkout capture service.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the service with valid VTEX credentials in the environment
//! cargo run -p precheckout-storefront
//!
//! # Run integration tests (they are ignored by default)
//! cargo test -p precheckout-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `capture_endpoint` - JSON upsert endpoint tests
//! - `precheckout_form` - Server-rendered form tests
//!
//! The base URL defaults to `http://localhost:3000` and can be overridden
//! with `PRECHECKOUT_BASE_URL`.
