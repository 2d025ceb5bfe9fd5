//! Auth service: orchestrates the credential manager, token issuer, session
//! store and user directory into registration, login and account flows.
//!
//! On login and registration the service issues both a bearer token and a
//! cookie-backed session. The session is authoritative: logout deletes it and
//! subsequent lookups fail. The token has no revocation and stays valid until
//! its own expiry; the two mechanisms are independent.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::auth::ownership::validate_is_owner;
use crate::auth::password::{self, Argon2Params};
use crate::auth::session::{clear_session_cookie, session_cookie, SessionStore};
use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::directory::{User, UserCreate, UserDirectory, UserUpdate};
use crate::errors::{Error, Result};
use crate::store::KvBackend;
use crate::types::{abbrev_uuid, UserId};

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update input. The actor must own the target account.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A freshly authenticated user: sanitized identity, bearer token, session ID
/// and the `Set-Cookie` string carrying it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
    pub session_id: String,
    pub cookie: String,
}

/// The auth core entry point. Holds no mutable state; safe to share across
/// request-handling tasks.
pub struct AuthService {
    config: Config,
    directory: Arc<dyn UserDirectory>,
    tokens: TokenIssuer,
    sessions: SessionStore,
}

impl AuthService {
    /// Wire up the service from configuration, a user directory and a session
    /// backend. Fails if the token secret is missing.
    pub fn new(config: Config, directory: Arc<dyn UserDirectory>, backend: Arc<dyn KvBackend>) -> Result<Self> {
        let tokens = TokenIssuer::new(&config)?;
        let sessions = SessionStore::new(backend, &config);
        Ok(Self {
            config,
            directory,
            tokens,
            sessions,
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// The `Set-Cookie` string that clears the session cookie on logout.
    pub fn clear_cookie(&self) -> String {
        clear_session_cookie(&self.config.auth.session)
    }

    /// Register a new user: validate, hash, create the directory record, then
    /// mint a bearer token and a session.
    #[instrument(skip_all)]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthenticatedUser> {
        validate_email(&request.email)?;
        validate_username(&request.username)?;
        self.validate_password(&request.password)?;

        if self.directory.find_by_email(&request.email).await?.is_some() {
            return Err(Error::Validation {
                message: "An account with this email address already exists".to_string(),
            });
        }

        let password_hash = self.hash_on_blocking_thread(request.password).await?;

        let mut user = self
            .directory
            .create(&UserCreate {
                email: request.email,
                username: request.username,
                password_hash: Some(password_hash),
            })
            .await?;
        user.sanitize_password();

        debug!(user = %abbrev_uuid(&user.id), "user registered");
        self.issue_credentials(user).await
    }

    /// Log a user in: verify credentials, then mint a bearer token and a
    /// session. Unknown email and wrong password are indistinguishable to the
    /// caller.
    #[instrument(skip_all)]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthenticatedUser> {
        validate_email(&request.email)?;

        let mut user = self.directory.find_by_email(&request.email).await?.ok_or(Error::Auth)?;
        let hash = user.password_hash.clone().ok_or(Error::Auth)?;

        // Verify on a blocking thread to avoid stalling the async runtime
        let candidate = request.password;
        tokio::task::spawn_blocking(move || password::verify_password(&hash, &candidate))
            .await
            .map_err(|e| Error::Hash {
                reason: format!("spawn password verification task: {e}"),
            })??;
        user.sanitize_password();

        debug!(user = %abbrev_uuid(&user.id), "login succeeded");
        self.issue_credentials(user).await
    }

    /// Delete the session. The bearer token issued alongside it remains valid
    /// until its own expiry.
    #[instrument(skip_all)]
    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.sessions.delete_by_id(session_id).await
    }

    /// Get a user by ID, sanitized.
    #[instrument(skip_all)]
    pub async fn get_by_id(&self, user_id: UserId) -> Result<User> {
        let mut user = self.directory.get_by_id(user_id).await?.ok_or_else(|| Error::NotFound {
            resource: "user".to_string(),
        })?;
        user.sanitize_password();
        Ok(user)
    }

    /// Update a user's profile. The actor must own the account.
    #[instrument(skip_all, fields(actor = %abbrev_uuid(&actor_id), user = %abbrev_uuid(&user_id)))]
    pub async fn update(&self, actor_id: UserId, user_id: UserId, request: UpdateRequest) -> Result<User> {
        validate_is_owner(actor_id, user_id, "user")?;

        if let Some(username) = &request.username {
            validate_username(username)?;
        }

        let password_hash = match request.password {
            Some(password) => {
                self.validate_password(&password)?;
                Some(self.hash_on_blocking_thread(password).await?)
            }
            None => None,
        };

        let mut user = self
            .directory
            .update(
                user_id,
                &UserUpdate {
                    username: request.username,
                    password_hash,
                },
            )
            .await?;
        user.sanitize_password();
        Ok(user)
    }

    /// Delete a user account. The actor must own the account. Existing
    /// sessions are not cascaded; they lapse at their TTL.
    #[instrument(skip_all, fields(actor = %abbrev_uuid(&actor_id), user = %abbrev_uuid(&user_id)))]
    pub async fn delete(&self, actor_id: UserId, user_id: UserId) -> Result<()> {
        validate_is_owner(actor_id, user_id, "user")?;
        self.directory.delete(user_id).await?;
        warn!(user = %abbrev_uuid(&user_id), "user account deleted");
        Ok(())
    }

    async fn issue_credentials(&self, user: User) -> Result<AuthenticatedUser> {
        let token = self.tokens.generate(user.id)?;
        let session_id = self.sessions.create_session(user.id).await?;
        let cookie = session_cookie(&self.config.auth.session, &session_id);

        Ok(AuthenticatedUser {
            user,
            token,
            session_id,
            cookie,
        })
    }

    async fn hash_on_blocking_thread(&self, password: String) -> Result<String> {
        let params = Argon2Params::from(&self.config.auth.password);
        tokio::task::spawn_blocking(move || password::hash_password_with_params(&password, Some(params)))
            .await
            .map_err(|e| Error::Hash {
                reason: format!("spawn password hashing task: {e}"),
            })?
    }

    fn validate_password(&self, password: &str) -> Result<()> {
        let rules = &self.config.auth.password;
        if password.len() < rules.min_length {
            return Err(Error::Validation {
                message: format!("Password must be at least {} characters", rules.min_length),
            });
        }
        if password.len() > rules.max_length {
            return Err(Error::Validation {
                message: format!("Password must be no more than {} characters", rules.max_length),
            });
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || email.len() > 60 || !email.contains('@') {
        return Err(Error::Validation {
            message: "Invalid email address".to_string(),
        });
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > 60 {
        return Err(Error::Validation {
            message: "Username must be between 1 and 60 characters".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_service;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            username: "tester".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_sanitizes_and_issues_credentials() {
        let service = create_test_service();
        let authed = service.register(register_request("a@x.com")).await.unwrap();

        assert!(authed.user.password_hash.is_none());
        assert!(!authed.token.is_empty());
        assert!(!authed.session_id.is_empty());
        assert!(authed.cookie.contains(&authed.session_id));

        let claims = service.tokens().verify(&authed.token).unwrap();
        assert_eq!(claims.sub, authed.user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let service = create_test_service();
        service.register(register_request("a@x.com")).await.unwrap();

        let err = service.register(register_request("a@x.com")).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input_before_processing() {
        let service = create_test_service();

        let bad_email = register_request("not-an-email");
        assert_eq!(service.register(bad_email).await.unwrap_err().kind(), "validation");

        let mut short_password = register_request("b@x.com");
        short_password.password = "short".to_string();
        assert_eq!(service.register(short_password).await.unwrap_err().kind(), "validation");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_identical() {
        let service = create_test_service();
        service.register(register_request("a@x.com")).await.unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "secret1x".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.kind(), "auth");
        assert_eq!(unknown_email.kind(), "auth");
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let service = create_test_service();
        let alice = service.register(register_request("alice@x.com")).await.unwrap();
        let mallory = service.register(register_request("mallory@x.com")).await.unwrap();

        let err = service
            .update(
                mallory.user.id,
                alice.user.id,
                UpdateRequest {
                    username: Some("owned".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "forbidden");

        // Target account untouched
        let unchanged = service.get_by_id(alice.user.id).await.unwrap();
        assert_eq!(unchanged.username, "tester");
    }

    #[tokio::test]
    async fn test_owner_can_update_and_new_password_works() {
        let service = create_test_service();
        let alice = service.register(register_request("alice@x.com")).await.unwrap();

        let updated = service
            .update(
                alice.user.id,
                alice.user.id,
                UpdateRequest {
                    username: Some("renamed".to_string()),
                    password: Some("newsecret".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "renamed");
        assert!(updated.password_hash.is_none());

        service
            .login(LoginRequest {
                email: "alice@x.com".to_string(),
                password: "newsecret".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let service = create_test_service();
        let alice = service.register(register_request("alice@x.com")).await.unwrap();
        let mallory = service.register(register_request("mallory@x.com")).await.unwrap();

        let err = service.delete(mallory.user.id, alice.user.id).await.unwrap_err();
        assert_eq!(err.kind(), "forbidden");

        service.delete(alice.user.id, alice.user.id).await.unwrap();
        let err = service.get_by_id(alice.user.id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test_log::test(tokio::test)]
    async fn test_end_to_end_login_logout_token_outlives_session() {
        let service = create_test_service();
        service.register(register_request("a@x.com")).await.unwrap();

        let authed = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        // Session resolves to the owner while logged in
        let session = service.sessions().get_session_by_id(&authed.session_id).await.unwrap();
        assert_eq!(session.user_id, authed.user.id);

        service.logout(&authed.session_id).await.unwrap();

        // Session is gone...
        let err = service.sessions().get_session_by_id(&authed.session_id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");

        // ...but the bearer token still verifies until its own expiry
        let claims = service.tokens().verify(&authed.token).unwrap();
        assert_eq!(claims.sub, authed.user.id);
    }
}
