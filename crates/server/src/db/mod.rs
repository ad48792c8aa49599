//! Persistence for the user directory.
//!
//! The [`UserRepository`] port keeps handlers independent of the document
//! store: [`mongo::MongoUserRepository`] talks to MongoDB, while
//! [`memory::InMemoryUserRepository`] honors the same contract for tests
//! and storeless development.
//!
//! # Collection
//!
//! - `users` - one document per user, unique index on `email`

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryUserRepository;
pub use mongo::MongoUserRepository;

use crate::models::User;
use crate::validate::{UserDraft, UserPatch, ValidationFailure};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Driver or connectivity error from the store.
    #[error("store error: {0}")]
    Store(#[from] mongodb::error::Error),

    /// The merged record failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Unique index violation on `email`.
    #[error("email already exists")]
    DuplicateEmail,

    /// The identifier is not in the store's expected shape.
    #[error("invalid user id: {0}")]
    InvalidId(String),

    /// No user matches the identifier.
    #[error("user not found")]
    NotFound,

    /// Data in the store failed domain conversion.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Port for user persistence.
///
/// Capability set is deliberately narrow: list, create, update-by-id,
/// delete-by-id. The store enforces email uniqueness; per-document
/// atomicity is the only concurrency guarantee relied upon.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All stored users in insertion order; empty when none exist.
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Insert a validated draft, assigning id and timestamps.
    ///
    /// Fails with [`RepositoryError::DuplicateEmail`] if the email is
    /// already taken.
    async fn create(&self, draft: UserDraft) -> Result<User, RepositoryError>;

    /// Apply a partial update to the user with the given id.
    ///
    /// Supplied fields are merged over the stored record, the full rule
    /// set is re-run, and `updated_at` is refreshed.
    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<User, RepositoryError>;

    /// Remove the user with the given id, returning the removed record.
    async fn delete_by_id(&self, id: &str) -> Result<User, RepositoryError>;
}
