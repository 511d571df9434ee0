//! Pre-checkout capture service library.
//!
//! This crate provides the capture service as a library, allowing it to be
//! tested and reused by the binary and the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod vtex;
