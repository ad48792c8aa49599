//! In-memory user repository.
//!
//! Honors the same contract as the MongoDB implementation - id shape,
//! email uniqueness, timestamp handling, insertion order - so handlers can
//! be exercised without a live store. Backed by a `Mutex<Vec<_>>`; the
//! lock is never held across an await point.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use userhub_core::UserId;

use super::{RepositoryError, UserRepository};
use crate::models::User;
use crate::validate::{UserDraft, UserPatch};

/// Repository keeping users in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_id(id: &str) -> Result<UserId, RepositoryError> {
        UserId::parse(id).map_err(|e| RepositoryError::InvalidId(e.to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        self.users.lock().expect("user store mutex poisoned")
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.lock().clone())
    }

    async fn create(&self, draft: UserDraft) -> Result<User, RepositoryError> {
        let mut users = self.lock();

        if users.iter().any(|u| u.email == draft.email) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let now = Utc::now();
        let id = UserId::parse(&ObjectId::new().to_hex())
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let user = User {
            id,
            name: draft.name,
            email: draft.email,
            age: draft.age,
            phone: draft.phone,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        Ok(user)
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<User, RepositoryError> {
        let id = Self::parse_id(id)?;
        let mut users = self.lock();

        let position = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let existing = users
            .get(position)
            .ok_or(RepositoryError::NotFound)?
            .clone();

        let draft = UserDraft::from_patch(&existing, &patch)?;

        if users
            .iter()
            .any(|u| u.id != existing.id && u.email == draft.email)
        {
            return Err(RepositoryError::DuplicateEmail);
        }

        let updated = User {
            id: existing.id,
            name: draft.name,
            email: draft.email,
            age: draft.age,
            phone: draft.phone,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        if let Some(slot) = users.get_mut(position) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: &str) -> Result<User, RepositoryError> {
        let id = Self::parse_id(id)?;
        let mut users = self.lock();

        let position = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(users.remove(position))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use userhub_core::Email;

    use super::*;
    use crate::validate::NewUser;

    fn draft(name: &str, email: &str) -> UserDraft {
        UserDraft::from_new(&NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            age: None,
            phone: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(draft("Jane Doe", "jane@example.com")).await.unwrap();

        assert_eq!(user.id.as_str().len(), 24);
        assert!(user.updated_at >= user.created_at);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let repo = InMemoryUserRepository::new();
        repo.create(draft("Jane Doe", "jane@example.com")).await.unwrap();
        repo.create(draft("John Doe", "john@example.com")).await.unwrap();

        let users = repo.list_all().await.unwrap();
        let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["jane@example.com", "john@example.com"]);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(draft("Jane Doe", "jane@example.com")).await.unwrap();

        // Same email after normalization.
        let err = repo
            .create(draft("Other Jane", "  JANE@Example.COM "))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_update_touches_only_supplied_fields() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(UserDraft {
                name: "Jane Doe".to_owned(),
                email: Email::parse("jane@example.com").unwrap(),
                age: Some(28),
                phone: Some("555-0100".to_owned()),
            })
            .await
            .unwrap();

        let updated = repo
            .update_by_id(
                user.id.as_str(),
                UserPatch {
                    age: Some(30),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.age, Some(30));
        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.email.as_str(), "jane@example.com");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.created_at, user.created_at);
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_other_user() {
        let repo = InMemoryUserRepository::new();
        repo.create(draft("Jane Doe", "jane@example.com")).await.unwrap();
        let john = repo.create(draft("John Doe", "john@example.com")).await.unwrap();

        let err = repo
            .update_by_id(
                john.id.as_str(),
                UserPatch {
                    email: Some("jane@example.com".to_owned()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_update_validation_failure() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(draft("Jane Doe", "jane@example.com")).await.unwrap();

        let err = repo
            .update_by_id(
                user.id.as_str(),
                UserPatch {
                    age: Some(121),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .update_by_id("64f1a2b3c4d5e6f708192a3b", UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_malformed_id_classified() {
        let repo = InMemoryUserRepository::new();
        let err = repo.delete_by_id("nope").await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record_and_is_terminal() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(draft("Jane Doe", "jane@example.com")).await.unwrap();

        let removed = repo.delete_by_id(user.id.as_str()).await.unwrap();
        assert_eq!(removed.email.as_str(), "jane@example.com");

        let err = repo.delete_by_id(user.id.as_str()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
