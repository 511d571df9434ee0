//! VTEX platform API clients.
//!
//! # Architecture
//!
//! - `reqwest` clients with a fixed request timeout configured once at
//!   process start (no per-request tuning)
//! - VTEX is source of truth - no local persistence, direct API calls
//! - Error envelopes keep the raw JSON payload so callers can probe the
//!   platform's loosely-shaped error bodies for the most specific message
//!
//! # APIs
//!
//! ## Masterdata
//! - Schema-light document store queried by field-equality filters
//! - Customer records live in the configured data entity (default `CL`)
//! - Store calls retry transport failures a fixed number of times
//!
//! ## Checkout
//! - Current order form (the in-progress order session)
//! - Client profile attachment (email + phone onto the session)

pub mod checkout;
pub mod masterdata;

pub use checkout::{CheckoutClient, CheckoutError};
pub use masterdata::{MasterdataClient, MasterdataError};
