//! Customer record and capture outcome types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel birth date written on create.
///
/// The platform entity schema requires a birth date, but the capture flow
/// never collects one. The sentinel is never read back or validated.
pub const DEFAULT_BIRTH_DATE: &str = "1900-01-01";

/// A stored customer record in the platform's document store.
///
/// At most one record exists per trimmed email value. The store itself has
/// no uniqueness constraint; the invariant is enforced by the capture
/// service's find-before-create, so concurrent first captures of the same
/// email can race (accepted risk).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Store-assigned identifier, immutable once created. Empty on a
    /// record that has not been stored yet, and omitted from the wire form.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Trimmed email, the natural dedup key.
    pub email: String,
    /// Exactly 11 digits, stored digits-only.
    pub home_phone: String,
    /// Order session active at the time of capture; overwritten on repeat
    /// captures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_form_id: Option<String>,
    /// Schema-required placeholder, always the sentinel on create.
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
    /// Timestamp of the last capture or update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

/// What the upsert did for a given email.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaptureAction {
    /// No record matched the email; a new one was created.
    Created,
    /// An existing record was partially updated.
    Updated,
}

/// Result of a successful capture upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Whether the record was created or updated.
    pub action: CaptureAction,
    /// The record's store-assigned id.
    pub id: String,
}
