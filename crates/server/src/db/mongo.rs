//! MongoDB-backed user repository.
//!
//! Documents map 1:1 to the wire model except for the store-specific
//! `_id`/timestamp representations. Email uniqueness is enforced by a
//! unique index; concurrent inserts with the same email are resolved by
//! the store and surface here as [`RepositoryError::DuplicateEmail`].

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{DateTime, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use userhub_core::{Email, UserId};

use super::{RepositoryError, UserRepository};
use crate::config::AppConfig;
use crate::models::User;
use crate::validate::{UserDraft, UserPatch};

/// Name of the users collection.
const USERS_COLLECTION: &str = "users";

/// Mongo server error code for a duplicate key.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Document shape persisted in the `users` collection.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    age: Option<i32>,
    phone: Option<String>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl UserDocument {
    /// Convert a stored document into the domain type.
    ///
    /// Stored data that no longer passes domain parsing is reported as
    /// corruption rather than silently passed through.
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in store: {e}"))
        })?;
        let id = UserId::parse(&self.id.to_hex())
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid id in store: {e}")))?;

        Ok(User {
            id,
            name: self.name,
            email,
            age: self.age,
            phone: self.phone,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.to_chrono(),
        })
    }
}

/// Repository backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    database: Database,
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Build a repository from configuration.
    ///
    /// The driver connects lazily, so this succeeds even when the store is
    /// unreachable; individual operations fail instead. Call
    /// [`Self::prepare`] at startup to surface connectivity early.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] if the connection string cannot
    /// be parsed.
    pub async fn connect(config: &AppConfig) -> Result<Self, RepositoryError> {
        let client = Client::with_uri_str(config.database_url.expose_secret()).await?;
        let database = client.database(&config.database_name);
        let collection = database.collection(USERS_COLLECTION);

        Ok(Self {
            database,
            collection,
        })
    }

    /// Ping the store and ensure the unique email index exists.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] if the store is unreachable or
    /// index creation fails.
    pub async fn prepare(&self) -> Result<(), RepositoryError> {
        self.database.run_command(doc! { "ping": 1 }).await?;

        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;

        Ok(())
    }

    /// Parse an incoming identifier into the store's `_id` type.
    fn parse_id(id: &str) -> Result<ObjectId, RepositoryError> {
        let id = UserId::parse(id).map_err(|e| RepositoryError::InvalidId(e.to_string()))?;
        ObjectId::parse_str(id.as_str()).map_err(|e| RepositoryError::InvalidId(e.to_string()))
    }

    /// Build the stored representation of a validated draft.
    fn document_from_draft(id: ObjectId, draft: UserDraft, created_at: DateTime) -> UserDocument {
        UserDocument {
            id,
            name: draft.name,
            email: draft.email.into_inner(),
            age: draft.age,
            phone: draft.phone,
            created_at,
            updated_at: DateTime::from_chrono(Utc::now()),
        }
    }
}

/// Whether a driver error is the store rejecting a duplicate unique key.
///
/// Inserts report the code as a write error; findAndModify paths report it
/// as a command error.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => {
            write_err.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_err) => command_err.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Map a driver error, classifying duplicate-key rejections.
fn map_store_error(err: mongodb::error::Error) -> RepositoryError {
    if is_duplicate_key(&err) {
        RepositoryError::DuplicateEmail
    } else {
        RepositoryError::Store(err)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let mut cursor = self.collection.find(doc! {}).await?;

        let mut users = Vec::new();
        while cursor.advance().await? {
            users.push(cursor.deserialize_current()?.into_user()?);
        }
        Ok(users)
    }

    async fn create(&self, draft: UserDraft) -> Result<User, RepositoryError> {
        let now = DateTime::from_chrono(Utc::now());
        let document = Self::document_from_draft(ObjectId::new(), draft, now);

        self.collection
            .insert_one(&document)
            .await
            .map_err(map_store_error)?;

        document.into_user()
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<User, RepositoryError> {
        let oid = Self::parse_id(id)?;
        let filter = doc! { "_id": oid };

        let existing = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let created_at = existing.created_at;
        let existing = existing.into_user()?;

        let draft = UserDraft::from_patch(&existing, &patch)?;
        let replacement = Self::document_from_draft(oid, draft, created_at);

        self.collection
            .find_one_and_replace(filter, &replacement)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_store_error)?
            .ok_or(RepositoryError::NotFound)?
            .into_user()
    }

    async fn delete_by_id(&self, id: &str) -> Result<User, RepositoryError> {
        let oid = Self::parse_id(id)?;

        self.collection
            .find_one_and_delete(doc! { "_id": oid })
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into_user()
    }
}
