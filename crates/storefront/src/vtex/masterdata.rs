//! Masterdata document store client.
//!
//! Masterdata is a key-free document collection queryable by field-equality
//! filter, with create and partial-update by document id. There is no
//! uniqueness constraint on any field; deduplication is the caller's job.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use precheckout_core::CustomerRecord;

use crate::config::VtexConfig;

/// Accept header for the Masterdata v10 API.
const MASTERDATA_ACCEPT: &str = "application/vnd.vtex.ds.v10+json";

/// Fixed fallback when the store gives us nothing human-readable.
pub const FALLBACK_MESSAGE: &str = "internal error";

/// Errors that can occur when talking to Masterdata.
#[derive(Debug, Error)]
pub enum MasterdataError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    ///
    /// The raw JSON payload is kept; its shape varies per endpoint, so
    /// callers probe it instead of deserializing into a fixed type.
    #[error("store error ({status}): {}", message_from_payload(payload.as_ref()).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()))]
    Api {
        /// HTTP status returned by the store.
        status: u16,
        /// Raw error payload, if the body was JSON.
        payload: Option<Value>,
    },

    /// A create succeeded but no document id could be found in the response.
    #[error("store response missing document id")]
    MissingDocumentId,

    /// Client-side configuration problem (bad credential header value).
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl MasterdataError {
    /// The store's HTTP status, when it produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw store error payload, when the body was JSON.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        match self {
            Self::Api { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Most specific human-readable message available.
    ///
    /// Probes the payload's `Message` then `message` fields, falls back to
    /// the transport error, then to [`FALLBACK_MESSAGE`].
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api { payload, .. } => message_from_payload(payload.as_ref())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            Self::Http(err) => err.to_string(),
            Self::MissingDocumentId | Self::InvalidConfig(_) => self.to_string(),
        }
    }
}

/// Probe a loosely-shaped error payload for a message field.
fn message_from_payload(payload: Option<&Value>) -> Option<String> {
    let payload = payload?;
    ["Message", "message"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_str))
        .map(str::to_owned)
}

// =============================================================================
// Wire types
// =============================================================================

/// Search hit for the email-equality query.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FoundDocument {
    /// Store-assigned document id.
    pub id: String,
    /// The stored email (echoed back from the filter field).
    pub email: String,
}

/// Fields overwritten on repeat captures for an existing document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    /// Digits-only phone.
    pub home_phone: String,
    /// Active order session id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_form_id: Option<String>,
    /// Capture timestamp.
    pub captured_at: DateTime<Utc>,
}

/// Create response. The id field name varies across store versions, so all
/// three observed spellings are accepted, first non-empty wins.
#[derive(Debug, Deserialize)]
struct CreatedDocument {
    #[serde(rename = "DocumentId")]
    document_id: Option<String>,
    #[serde(rename = "Id")]
    id_pascal: Option<String>,
    id: Option<String>,
}

impl CreatedDocument {
    fn into_id(self) -> Option<String> {
        [self.document_id, self.id_pascal, self.id]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

// =============================================================================
// MasterdataClient
// =============================================================================

/// Client for the Masterdata document store.
///
/// Carries the fixed timeout and transport-retry count from configuration;
/// every call uses them, none are tunable per-request.
#[derive(Clone)]
pub struct MasterdataClient {
    inner: Arc<MasterdataClientInner>,
}

struct MasterdataClientInner {
    client: reqwest::Client,
    base_url: String,
    data_entity: String,
    retries: u32,
}

impl MasterdataClient {
    /// Create a new Masterdata client.
    ///
    /// # Errors
    ///
    /// Returns error if the app key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &VtexConfig) -> Result<Self, MasterdataError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static(MASTERDATA_ACCEPT));
        headers.insert(
            "X-VTEX-API-AppKey",
            HeaderValue::from_str(&config.app_key).map_err(|e| {
                MasterdataError::InvalidConfig(format!("app key: {e}"))
            })?,
        );
        headers.insert(
            "X-VTEX-API-AppToken",
            HeaderValue::from_str(config.app_token.expose_secret()).map_err(|e| {
                MasterdataError::InvalidConfig(format!("app token: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(MasterdataClientInner {
                client,
                base_url: config.base_url(),
                data_entity: config.data_entity.clone(),
                retries: config.upstream_retries,
            }),
        })
    }

    fn entity_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/dataentities/{}/{suffix}",
            self.inner.base_url, self.inner.data_entity
        )
    }

    /// Send a request, retrying transport failures up to the fixed count.
    ///
    /// Non-success HTTP statuses are not retried; the store already saw the
    /// request and a retry could double-write.
    async fn send_with_retry(
        &self,
        make: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> Result<reqwest::Response, MasterdataError> {
        let mut attempt: u32 = 0;
        loop {
            match make().send().await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.inner.retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %err,
                        attempt,
                        retries = self.inner.retries,
                        "Masterdata transport failure, retrying"
                    );
                }
                Err(err) => return Err(MasterdataError::Http(err)),
            }
        }
    }

    /// Turn a non-success response into an [`MasterdataError::Api`].
    async fn api_error(response: reqwest::Response) -> MasterdataError {
        let status = response.status().as_u16();
        let payload = response.json::<Value>().await.ok();
        MasterdataError::Api { status, payload }
    }

    /// Find the document matching an email, requesting at most one result.
    ///
    /// # Errors
    ///
    /// Returns error if the request or the store call fails.
    #[instrument(skip(self))]
    pub async fn search_documents(
        &self,
        email: &str,
    ) -> Result<Option<FoundDocument>, MasterdataError> {
        let url = format!(
            "{}?_fields=id,email&_where=email={}",
            self.entity_url("search"),
            urlencoding::encode(email)
        );

        let response = self
            .send_with_retry(|| {
                self.inner
                    .client
                    .get(&url)
                    .header("REST-Range", "resources=0-1")
            })
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let mut found: Vec<FoundDocument> = response.json().await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    /// Create a customer document, returning its store-assigned id.
    ///
    /// The record's own `id` is expected to be empty; it is omitted from the
    /// wire form and the store assigns one.
    ///
    /// # Errors
    ///
    /// Returns error if the store call fails or the response carries no id
    /// under any of the known field names.
    #[instrument(skip(self, record), fields(email = %record.email))]
    pub async fn create_document(
        &self,
        record: &CustomerRecord,
    ) -> Result<String, MasterdataError> {
        let url = self.entity_url("documents");

        let response = self
            .send_with_retry(|| self.inner.client.post(&url).json(record))
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let created: CreatedDocument = response.json().await?;
        created.into_id().ok_or(MasterdataError::MissingDocumentId)
    }

    /// Partially update the document with the given id.
    ///
    /// # Errors
    ///
    /// Returns error if the store call fails.
    #[instrument(skip(self, patch))]
    pub async fn update_partial_document(
        &self,
        id: &str,
        patch: &CustomerPatch,
    ) -> Result<(), MasterdataError> {
        let url = self.entity_url(&format!("documents/{id}"));

        let response = self
            .send_with_retry(|| self.inner.client.patch(&url).json(patch))
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }
}
