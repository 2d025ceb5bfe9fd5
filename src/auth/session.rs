//! Server-side session management over a key-value backend.
//!
//! Sessions are the revocable half of the login state: an opaque random ID
//! handed to the browser as a cookie, mapping to a small record in a
//! TTL-evicting key-value store. Absence of the record means never created,
//! explicitly deleted, or expired; the three are indistinguishable to
//! callers and all surface as `NotFound`.
//!
//! Backend calls are bounded by the configured `backend_timeout` and a
//! backend failure always surfaces as `Store`, never as `NotFound`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use base64::{engine::general_purpose, Engine as _};
use rand::prelude::RngExt;
use rand::rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, SessionConfig};
use crate::errors::{Error, Result};
use crate::store::KvBackend;
use crate::types::{abbrev_uuid, UserId};

/// Key namespace for session records in the shared backend
const SESSION_KEY_PREFIX: &str = "sessions:";

/// A session record: who owns this login state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
}

/// Creates, reads and deletes session records. Safe to share across request
/// handlers; all state lives in the backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KvBackend>,
    ttl: Duration,
    backend_timeout: Duration,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KvBackend>, config: &Config) -> Self {
        Self {
            backend,
            ttl: config.auth.session.timeout,
            backend_timeout: config.auth.session.backend_timeout,
        }
    }

    /// Create a session for a user with the configured TTL. Returns the
    /// opaque session ID to hand out as a cookie value.
    pub async fn create_session(&self, user_id: UserId) -> Result<String> {
        self.create_session_with_ttl(user_id, self.ttl).await
    }

    /// Create a session with an explicit TTL.
    pub async fn create_session_with_ttl(&self, user_id: UserId, ttl: Duration) -> Result<String> {
        let session_id = generate_session_id();
        let value = serde_json::to_string(&Session { user_id }).context("serialize session record")?;

        self.bounded(self.backend.set_ex(&session_key(&session_id), &value, ttl.as_secs()))
            .await?;

        debug!(user = %abbrev_uuid(&user_id), "session created");
        Ok(session_id)
    }

    /// Look up a session by ID. `NotFound` covers absent, deleted and expired
    /// uniformly.
    pub async fn get_session_by_id(&self, session_id: &str) -> Result<Session> {
        let value = self.bounded(self.backend.get(&session_key(session_id))).await?;

        let value = value.ok_or_else(|| Error::NotFound {
            resource: "session".to_string(),
        })?;

        let session: Session = serde_json::from_str(&value).context("deserialize session record")?;
        Ok(session)
    }

    /// Delete a session by ID. Idempotent; deleting an absent session is not
    /// an error.
    pub async fn delete_by_id(&self, session_id: &str) -> Result<()> {
        self.bounded(self.backend.del(&session_key(session_id))).await?;
        debug!("session deleted");
        Ok(())
    }

    /// Run a backend call under the configured timeout. An elapsed timeout is
    /// a backend failure, not a missing record.
    async fn bounded<T>(&self, fut: impl Future<Output = anyhow::Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.backend_timeout, fut).await {
            Ok(result) => result.map_err(Error::Store),
            Err(_) => Err(Error::Store(anyhow::anyhow!(
                "session backend call exceeded {:?}",
                self.backend_timeout
            ))),
        }
    }
}

fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

/// Generate a cryptographically random session ID: 32 bytes (256 bits) of OS
/// entropy, base64url without padding. Collisions are avoided
/// probabilistically, not detected.
fn generate_session_id() -> String {
    let mut id_bytes = [0u8; 32];
    rng().fill(&mut id_bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(id_bytes)
}

/// Build the `Set-Cookie` string carrying a session ID. Flags and max-age
/// come from configuration.
pub fn session_cookie(config: &SessionConfig, session_id: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; SameSite={}; Max-Age={}",
        config.cookie_name,
        session_id,
        config.cookie_same_site,
        config.timeout.as_secs()
    );
    if config.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the expired `Set-Cookie` string that clears the session cookie on
/// logout.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!("{}=; Path=/; SameSite={}; Max-Age=0", config.cookie_name, config.cookie_same_site);
    if config.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
