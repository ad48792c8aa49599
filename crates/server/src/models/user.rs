//! User domain type.
//!
//! This is the validated domain object, separate from the document type the
//! store persists.

use chrono::{DateTime, Utc};
use serde::Serialize;

use userhub_core::{Email, UserId};

/// A stored user.
///
/// Serializes to the wire shape
/// `{id, name, email, age, phone, createdAt, updatedAt}`; optional fields
/// are present as `null` when unset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier, immutable after creation.
    pub id: UserId,
    /// Display name, trimmed, 2-50 characters.
    pub name: String,
    /// Normalized email address, unique across all users.
    pub email: Email,
    /// Age in years, if provided.
    pub age: Option<i32>,
    /// Phone number, if provided. Trimmed, no format constraint.
    pub phone: Option<String>,
    /// Set once at insert time.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update; never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}
