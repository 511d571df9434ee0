//! Pre-Checkout Core - Shared types and validators.
//!
//! This crate provides the types used across the pre-checkout components:
//! - `storefront` - The capture service (form, capture endpoint, VTEX clients)
//! - `integration-tests` - End-to-end tests against a running service
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation functions - no I/O,
//! no HTTP clients. Everything here is synchronous, total, and independently
//! unit-testable.
//!
//! # Modules
//!
//! - [`types`] - Email and phone validation, customer record, capture outcome

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
