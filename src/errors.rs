//! Unified error type for the auth core.
//!
//! Every error crosses component boundaries tagged with its kind so that
//! calling layers can map deterministically to user-visible outcomes
//! (unauthorized vs forbidden vs server error) without inspecting message
//! text. None of these are retried inside the core.

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed input rejected before any processing
    #[error("{message}")]
    Validation { message: String },

    /// Credential mismatch during login or password verification
    #[error("Invalid email or password")]
    Auth,

    /// Acting identity does not own the target resource
    #[error("Not the owner of {resource}")]
    Forbidden { resource: String },

    /// Missing identity or session. For sessions this covers absent, deleted
    /// and TTL-expired uniformly; the three are indistinguishable to callers.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Well-signed token whose expiry has elapsed
    #[error("Token expired")]
    ExpiredToken,

    /// Tampered, malformed, or wrongly-signed token
    #[error("Invalid token")]
    InvalidToken,

    /// Token signing machinery failure (missing or empty secret, encoder error)
    #[error("Failed to sign token: {reason}")]
    Signing { reason: String },

    /// Password hashing primitive failure (e.g. invalid cost parameters)
    #[error("Failed to hash password: {reason}")]
    Hash { reason: String },

    /// Session backend unavailable, timed out, or returned garbage.
    /// Must always propagate as-is: collapsing it into `NotFound` would
    /// silently admit failed logins as successful.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl Error {
    /// Stable kind label for logs, metrics, and outcome mapping in callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation",
            Error::Auth => "auth",
            Error::Forbidden { .. } => "forbidden",
            Error::NotFound { .. } => "not_found",
            Error::ExpiredToken => "expired_token",
            Error::InvalidToken => "invalid_token",
            Error::Signing { .. } => "signing",
            Error::Hash { .. } => "hash",
            Error::Store(_) => "store",
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } => message.clone(),
            Error::Auth => "Invalid email or password".to_string(),
            Error::Forbidden { resource } => format!("You do not have permission to modify this {resource}"),
            Error::NotFound { resource } => format!("{resource} not found"),
            Error::ExpiredToken => "Session token has expired".to_string(),
            Error::InvalidToken => "Invalid session token".to_string(),
            Error::Signing { .. } | Error::Hash { .. } | Error::Store(_) => "Internal server error".to_string(),
        }
    }
}

/// Type alias for auth core operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_are_stable() {
        assert_eq!(Error::Auth.kind(), "auth");
        assert_eq!(
            Error::NotFound {
                resource: "session".to_string()
            }
            .kind(),
            "not_found"
        );
        assert_eq!(Error::Store(anyhow::anyhow!("connection refused")).kind(), "store");
    }

    #[test]
    fn test_internal_details_never_reach_user_message() {
        let err = Error::Store(anyhow::anyhow!("redis://10.0.0.3:6379 connection refused"));
        assert_eq!(err.user_message(), "Internal server error");

        let err = Error::Hash {
            reason: "invalid memory cost".to_string(),
        };
        assert!(!err.user_message().contains("memory cost"));
    }
}
