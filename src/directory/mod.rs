//! User directory: persistent identity storage behind a capability trait.
//!
//! The auth core reads and writes only the identity ID, email and
//! password-hash fields; everything else about a user belongs to the host
//! platform. Any storage backend or test double can satisfy [`UserDirectory`].

pub mod memory;

pub use memory::InMemoryDirectory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::UserId;

/// A user identity as stored in the directory.
///
/// `password_hash` is never serialized, so a hash cannot leak through any
/// serialization path even if [`User::sanitize_password`] was skipped. Once
/// sanitized the field must not be re-populated on the same value before it
/// crosses to a presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Clear the password hash before this value leaves the auth core.
    /// Idempotent.
    pub fn sanitize_password(&mut self) {
        self.password_hash = None;
    }
}

/// Request for creating a new directory record
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
}

/// Request for updating a directory record. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

/// Capability interface over persistent identity storage.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create a new identity record
    async fn create(&self, request: &UserCreate) -> Result<User>;

    /// Update an identity record by ID
    async fn update(&self, id: UserId, request: &UserUpdate) -> Result<User>;

    /// Delete an identity record by ID. Cascading session invalidation is the
    /// host platform's concern, not guaranteed here.
    async fn delete(&self, id: UserId) -> Result<()>;

    /// Get an identity by ID
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Find an identity by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
