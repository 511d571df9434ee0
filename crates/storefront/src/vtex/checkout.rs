//! Checkout API client for the order session.
//!
//! The order form is the platform's in-progress cart/checkout state. This
//! workflow reads its id and writes the captured identity into its client
//! profile attachment; it does not own the session's lifecycle.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::config::VtexConfig;
use crate::services::form::SessionApi;

/// Errors that can occur when talking to the checkout API.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The checkout API answered with a non-success status.
    #[error("checkout error ({status})")]
    Api {
        /// HTTP status returned by the checkout API.
        status: u16,
        /// Raw error payload, if the body was JSON.
        payload: Option<Value>,
    },
}

impl CheckoutError {
    /// Human-readable message from the API payload, when one exists.
    ///
    /// Probes the payload's `message` then `error` fields. Transport
    /// failures carry no API message; callers supply their own fallback.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Api {
                payload: Some(payload),
                ..
            } => ["message", "error"]
                .iter()
                .find_map(|key| payload.get(key).and_then(Value::as_str))
                .map(str::to_owned),
            _ => None,
        }
    }
}

/// Client for the public checkout API.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CheckoutClient {
    /// Create a new checkout client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &VtexConfig) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CheckoutClientInner {
                client,
                base_url: config.base_url(),
            }),
        })
    }

    fn order_form_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/checkout/pub/orderForm{suffix}",
            self.inner.base_url
        )
    }

    /// Fetch the current order form and extract its identifier.
    ///
    /// A response without an `orderFormId` field is tolerated and yields
    /// `None`; the capture flow continues without a session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API answers non-success.
    #[instrument(skip(self))]
    pub async fn current_order_form_id(&self) -> Result<Option<String>, CheckoutError> {
        let response = self
            .inner
            .client
            .get(self.order_form_url(""))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<Value>().await.ok();
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        let order_form: Value = response.json().await?;
        Ok(order_form
            .get("orderFormId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_owned))
    }

    /// Attach the captured identity to an order form's client profile.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API answers non-success.
    #[instrument(skip(self, email, phone))]
    pub async fn attach_client_profile(
        &self,
        order_form_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<(), CheckoutError> {
        let url = self.order_form_url(&format!(
            "/{order_form_id}/attachments/clientProfileData"
        ));

        let response = self
            .inner
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "phone": phone }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<Value>().await.ok();
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        Ok(())
    }
}

impl SessionApi for CheckoutClient {
    async fn current_order_form(&self) -> Result<Option<String>, CheckoutError> {
        self.current_order_form_id().await
    }

    async fn attach_profile(
        &self,
        order_form_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<(), CheckoutError> {
        self.attach_client_profile(order_form_id, email, phone).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_message_field() {
        let err = CheckoutError::Api {
            status: 400,
            payload: Some(serde_json::json!({
                "message": "session expired",
                "error": "ignored"
            })),
        };
        assert_eq!(err.message(), Some("session expired".to_string()));
    }

    #[test]
    fn test_message_falls_back_to_error_field() {
        let err = CheckoutError::Api {
            status: 400,
            payload: Some(serde_json::json!({ "error": "bad attachment" })),
        };
        assert_eq!(err.message(), Some("bad attachment".to_string()));
    }

    #[test]
    fn test_message_none_without_known_fields() {
        let err = CheckoutError::Api {
            status: 502,
            payload: Some(serde_json::json!({ "code": "X" })),
        };
        assert_eq!(err.message(), None);

        let err = CheckoutError::Api {
            status: 502,
            payload: None,
        };
        assert_eq!(err.message(), None);
    }
}
