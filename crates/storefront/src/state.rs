//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PrecheckoutConfig;
use crate::vtex::{CheckoutClient, CheckoutError, MasterdataClient, MasterdataError};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("masterdata client: {0}")]
    Masterdata(#[from] MasterdataError),
    #[error("checkout client: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The server is stateless per request; the
/// state only carries configuration and the platform clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PrecheckoutConfig,
    masterdata: MasterdataClient,
    checkout: CheckoutClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either platform client fails to build.
    pub fn new(config: PrecheckoutConfig) -> Result<Self, StateError> {
        let masterdata = MasterdataClient::new(&config.vtex)?;
        let checkout = CheckoutClient::new(&config.vtex)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                masterdata,
                checkout,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &PrecheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the Masterdata document store client.
    #[must_use]
    pub fn masterdata(&self) -> &MasterdataClient {
        &self.inner.masterdata
    }

    /// Get a reference to the checkout API client.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }
}
