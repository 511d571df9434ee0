//! Idempotent capture upsert.
//!
//! Find-by-email then update-or-create. The store enforces no uniqueness, so
//! the one-record-per-email invariant is best effort: two concurrent first
//! captures of the same email can both observe "not found" and both create.
//! Accepted risk; distributed locking would be disproportionate here.

use chrono::Utc;
use thiserror::Error;

use precheckout_core::{CaptureAction, CaptureOutcome, CustomerRecord, DEFAULT_BIRTH_DATE};

use crate::vtex::masterdata::{CustomerPatch, MasterdataClient, MasterdataError};

/// A capture request, already extracted from whatever transport carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Shopper email, trimmed by the service.
    pub email: String,
    /// Phone as digits (the handler accepts either wire alias for this).
    pub home_phone: String,
    /// Active order session id, when the client had one.
    pub order_form_id: Option<String>,
}

/// Errors produced by the capture service.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Email or phone missing/empty after trim. Never reaches the store.
    #[error("email and phone are required")]
    MissingFields,

    /// The store call failed; displays the most specific message available.
    #[error("{}", .0.message())]
    Store(#[from] MasterdataError),
}

/// The document store collaborator, as seen by the capture service.
///
/// Production impl is [`MasterdataClient`]; tests use in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Find the id of the document matching a trimmed email, if any.
    async fn find_by_email(&self, email: &str) -> Result<Option<String>, MasterdataError>;

    /// Create a document from a not-yet-stored record (empty `id`),
    /// returning the store-assigned id.
    async fn create(&self, record: &CustomerRecord) -> Result<String, MasterdataError>;

    /// Partially update the document with the given id.
    async fn update_partial(
        &self,
        id: &str,
        patch: &CustomerPatch,
    ) -> Result<(), MasterdataError>;
}

impl DocumentStore for MasterdataClient {
    async fn find_by_email(&self, email: &str) -> Result<Option<String>, MasterdataError> {
        Ok(self.search_documents(email).await?.map(|found| found.id))
    }

    async fn create(&self, record: &CustomerRecord) -> Result<String, MasterdataError> {
        self.create_document(record).await
    }

    async fn update_partial(
        &self,
        id: &str,
        patch: &CustomerPatch,
    ) -> Result<(), MasterdataError> {
        self.update_partial_document(id, patch).await
    }
}

/// Upsert a customer record keyed by trimmed email.
///
/// Validates required fields first (zero store calls on failure), then
/// queries for an existing document and either patches it or creates a
/// fresh one with the birth-date sentinel. A capture timestamp is written
/// on both paths.
///
/// # Errors
///
/// [`CaptureError::MissingFields`] when email or phone is empty after trim,
/// [`CaptureError::Store`] when a store call fails.
pub async fn upsert_customer<S: DocumentStore>(
    store: &S,
    request: &CaptureRequest,
) -> Result<CaptureOutcome, CaptureError> {
    let email = request.email.trim();
    let phone = request.home_phone.trim();

    if email.is_empty() || phone.is_empty() {
        return Err(CaptureError::MissingFields);
    }

    let order_form_id = request
        .order_form_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned);
    let captured_at = Utc::now();

    if let Some(id) = store.find_by_email(email).await? {
        store
            .update_partial(
                &id,
                &CustomerPatch {
                    home_phone: phone.to_owned(),
                    order_form_id,
                    captured_at,
                },
            )
            .await?;

        Ok(CaptureOutcome {
            action: CaptureAction::Updated,
            id,
        })
    } else {
        let id = store
            .create(&CustomerRecord {
                id: String::new(),
                email: email.to_owned(),
                home_phone: phone.to_owned(),
                order_form_id,
                birth_date: DEFAULT_BIRTH_DATE.to_owned(),
                captured_at: Some(captured_at),
            })
            .await?;

        Ok(CaptureOutcome {
            action: CaptureAction::Created,
            id,
        })
    }
}

/// The capture collaborator as seen by the form controller.
#[allow(async_fn_in_trait)]
pub trait CaptureApi {
    /// Run the capture upsert for a request.
    async fn capture(&self, request: &CaptureRequest) -> Result<CaptureOutcome, CaptureError>;
}

impl CaptureApi for MasterdataClient {
    async fn capture(&self, request: &CaptureRequest) -> Result<CaptureOutcome, CaptureError> {
        upsert_customer(self, request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// In-memory store fake recording every call. `docs` keeps the records
    /// exactly as they were handed to `create`, keyed by the assigned id.
    #[derive(Default)]
    struct MemoryStore {
        docs: Mutex<Vec<(String, CustomerRecord)>>,
        patches: Mutex<Vec<(String, CustomerPatch)>>,
        calls: AtomicUsize,
        next_id: AtomicUsize,
        reject_create: Mutex<Option<(u16, serde_json::Value)>>,
    }

    impl MemoryStore {
        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DocumentStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<String>, MasterdataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .docs
                .lock()
                .unwrap()
                .iter()
                .find(|(_, stored)| stored.email == email)
                .map(|(id, _)| id.clone()))
        }

        async fn create(&self, record: &CustomerRecord) -> Result<String, MasterdataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((status, payload)) = self.reject_create.lock().unwrap().take() {
                return Err(MasterdataError::Api {
                    status,
                    payload: Some(payload),
                });
            }
            let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            self.docs.lock().unwrap().push((id.clone(), record.clone()));
            Ok(id)
        }

        async fn update_partial(
            &self,
            id: &str,
            patch: &CustomerPatch,
        ) -> Result<(), MasterdataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.patches
                .lock()
                .unwrap()
                .push((id.to_owned(), patch.clone()));
            Ok(())
        }
    }

    fn request(email: &str, phone: &str) -> CaptureRequest {
        CaptureRequest {
            email: email.to_owned(),
            home_phone: phone.to_owned(),
            order_form_id: Some("of-123".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_first_capture_creates_then_updates_same_id() {
        let store = MemoryStore::default();

        let first = upsert_customer(&store, &request("x@y.com", "11987654321"))
            .await
            .unwrap();
        assert_eq!(first.action, CaptureAction::Created);

        let second = upsert_customer(&store, &request("x@y.com", "21999998888"))
            .await
            .unwrap();
        assert_eq!(second.action, CaptureAction::Updated);
        assert_eq!(second.id, first.id);

        let patches = store.patches.lock().unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, first.id);
        assert_eq!(patches[0].1.home_phone, "21999998888");
        assert_eq!(patches[0].1.order_form_id, Some("of-123".to_owned()));
    }

    #[tokio::test]
    async fn test_create_hands_store_an_unstored_record() {
        let store = MemoryStore::default();

        upsert_customer(&store, &request("x@y.com", "11987654321"))
            .await
            .unwrap();

        let docs = store.docs.lock().unwrap();
        assert_eq!(docs.len(), 1);
        let record = &docs[0].1;
        assert!(record.id.is_empty());
        assert_eq!(record.email, "x@y.com");
        assert_eq!(record.home_phone, "11987654321");
        assert_eq!(record.birth_date, DEFAULT_BIRTH_DATE);
        assert!(record.captured_at.is_some());
    }

    #[tokio::test]
    async fn test_email_is_trimmed_before_lookup() {
        let store = MemoryStore::default();

        upsert_customer(&store, &request("  x@y.com  ", "11987654321"))
            .await
            .unwrap();
        let outcome = upsert_customer(&store, &request("x@y.com", "11987654321"))
            .await
            .unwrap();
        assert_eq!(outcome.action, CaptureAction::Updated);
    }

    #[tokio::test]
    async fn test_empty_email_issues_zero_store_calls() {
        let store = MemoryStore::default();

        let err = upsert_customer(&store, &request("", "11987654321"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::MissingFields));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_phone_issues_zero_store_calls() {
        let store = MemoryStore::default();

        let err = upsert_customer(&store, &request("x@y.com", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::MissingFields));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_order_form_id_is_dropped() {
        let store = MemoryStore::default();

        let mut req = request("x@y.com", "11987654321");
        req.order_form_id = Some("   ".to_owned());
        upsert_customer(&store, &req).await.unwrap();

        // Update path goes through a patch; check via a second capture
        upsert_customer(&store, &req).await.unwrap();
        let patches = store.patches.lock().unwrap();
        assert_eq!(patches[0].1.order_form_id, None);
    }

    #[tokio::test]
    async fn test_store_rejection_surfaces_exact_message() {
        let store = MemoryStore::default();
        *store.reject_create.lock().unwrap() =
            Some((429, serde_json::json!({ "message": "quota exceeded" })));

        let err = upsert_customer(&store, &request("x@y.com", "11987654321"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded");
        match err {
            CaptureError::Store(store_err) => {
                assert_eq!(store_err.status(), Some(429));
                assert!(store_err.details().is_some());
            }
            CaptureError::MissingFields => panic!("expected store error"),
        }
    }
}
