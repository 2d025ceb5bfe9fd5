//! Authentication and authorization core.
//!
//! This module provides:
//! - Password hashing and verification using Argon2 ([`password`])
//! - Signed, time-bounded bearer tokens ([`token`])
//! - Server-side sessions over a TTL key-value backend ([`session`])
//! - Ownership enforcement for mutations on owned resources ([`ownership`])
//! - The orchestration layer tying them together ([`service`])
//!
//! # Two credentials per login
//!
//! Login and registration issue two independent proofs of identity:
//!
//! ## 1. Session (authoritative)
//!
//! An opaque random ID stored server-side with a TTL and handed to the
//! browser as an HTTP-only cookie. Revocable: logout deletes the record and
//! every later lookup fails uniformly.
//!
//! ## 2. Bearer token (convenience)
//!
//! A signed JWT carrying the subject ID. Stateless and non-revocable; it
//! outlives logout and stays valid until its embedded expiry. Services that
//! need revocation must authorize against the session.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gatehouse::auth::service::{AuthService, LoginRequest};
//! use gatehouse::{config::Config, directory::InMemoryDirectory, store::InMemoryKv};
//!
//! let service = AuthService::new(config, Arc::new(directory), Arc::new(backend))?;
//! let authed = service.login(LoginRequest { email, password }).await?;
//! // hand authed.cookie to the HTTP layer, authed.token to API clients
//! ```

pub mod ownership;
pub mod password;
pub mod service;
pub mod session;
pub mod token;
