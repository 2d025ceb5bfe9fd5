//! # gatehouse
//!
//! Authentication and authorization core for multi-user content platforms:
//! credential handling, bearer-token issuance and verification,
//! server-tracked session lifecycle, and per-resource ownership enforcement.
//!
//! This is a library crate. HTTP routing, request/response marshaling,
//! pagination and storage schemas are the host service's concern; gatehouse
//! is consumed through three narrow seams:
//!
//! - [`directory::UserDirectory`] — persistent identity storage (the core
//!   touches only ID, email and password-hash fields)
//! - [`store::KvBackend`] — a TTL key-value store for session records
//!   (`SET key value EX ttl` / `GET` / `DEL` semantics)
//! - [`config::Config`] — explicit configuration passed into constructors;
//!   no process-wide singleton
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use gatehouse::auth::service::{AuthService, RegisterRequest};
//! use gatehouse::{config::Config, directory::InMemoryDirectory, store::InMemoryKv};
//!
//! # async fn example() -> gatehouse::errors::Result<()> {
//! let mut config = Config::default();
//! config.secret_key = Some("change-me".to_string());
//!
//! let service = AuthService::new(config, Arc::new(InMemoryDirectory::new()), Arc::new(InMemoryKv::new()))?;
//!
//! let authed = service
//!     .register(RegisterRequest {
//!         email: "a@x.com".to_string(),
//!         username: "a".to_string(),
//!         password: "correct-horse".to_string(),
//!     })
//!     .await?;
//!
//! // `authed.cookie` goes to Set-Cookie, `authed.token` to API clients.
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failure carries a tagged kind (see [`errors::Error`]) so callers
//! map outcomes without parsing message text. Backend failures surface as
//! `Store` and are never folded into `NotFound`.

pub mod auth;
pub mod config;
pub mod directory;
pub mod errors;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use auth::service::AuthService;
pub use config::Config;
pub use errors::{Error, Result};
