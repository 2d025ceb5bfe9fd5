//! In-memory user directory, used in tests and single-node setups.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::directory::{User, UserCreate, UserDirectory, UserUpdate};
use crate::errors::{Error, Result};
use crate::types::UserId;

/// In-memory [`UserDirectory`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn create(&self, request: &UserCreate) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == request.email) {
            return Err(Error::Validation {
                message: "An account with this email address already exists".to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: request.email.clone(),
            username: request.username.clone(),
            password_hash: request.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, request: &UserUpdate) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| Error::NotFound {
            resource: "user".to_string(),
        })?;

        if let Some(username) = &request.username {
            user.username = username.clone();
        }
        if let Some(password_hash) = &request.password_hash {
            user.password_hash = Some(password_hash.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        let mut users = self.users.write().await;
        users.remove(&id).ok_or_else(|| Error::NotFound {
            resource: "user".to_string(),
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(email: &str) -> UserCreate {
        UserCreate {
            email: email.to_string(),
            username: "tester".to_string(),
            password_hash: Some("hash".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let directory = InMemoryDirectory::new();
        let created = directory.create(&create_request("a@x.com")).await.unwrap();

        let by_id = directory.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        let by_email = directory.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let directory = InMemoryDirectory::new();
        directory.create(&create_request("a@x.com")).await.unwrap();

        let err = directory.create(&create_request("a@x.com")).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_update_leaves_unset_fields_unchanged() {
        let directory = InMemoryDirectory::new();
        let created = directory.create(&create_request("a@x.com")).await.unwrap();

        let updated = directory
            .update(
                created.id,
                &UserUpdate {
                    username: Some("renamed".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.password_hash.as_deref(), Some("hash"));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let directory = InMemoryDirectory::new();
        let err = directory.delete(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
