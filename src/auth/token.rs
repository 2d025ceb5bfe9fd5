//! Bearer token issuance and verification.
//!
//! Tokens are JWTs signed with a shared secret (HS256), carrying subject,
//! issued-at and expiry claims. They are stateless: there is no revocation
//! mechanism, and a token remains valid until its expiry regardless of
//! logout. The server-side session (see [`crate::auth::session`]) is the
//! revocable mechanism; consuming services that need revocation must check
//! the session, not the token.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::types::UserId;

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: UserId,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a secret and TTL taken from
/// configuration at construction time.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: chrono::Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer from configuration. A missing or empty `secret_key`
    /// is a signing error.
    pub fn new(config: &Config) -> Result<Self> {
        let secret = config.secret_key.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| Error::Signing {
            reason: "secret_key is required".to_string(),
        })?;

        let expiry = chrono::Duration::from_std(config.auth.token.expiry).map_err(|e| Error::Signing {
            reason: format!("token expiry out of range: {e}"),
        })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        })
    }

    /// Create a token for a user with the configured TTL.
    pub fn generate(&self, user_id: UserId) -> Result<String> {
        self.generate_with_expiry(user_id, self.expiry)
    }

    /// Create a token for a user with an explicit TTL. A non-positive TTL
    /// produces an already-expired token.
    pub fn generate_with_expiry(&self, user_id: UserId, expiry: chrono::Duration) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + expiry).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| Error::Signing {
            reason: format!("encode token: {e}"),
        })
    }

    /// Verify and decode a bearer token.
    ///
    /// The signature is checked before the expiry claim, so a tampered token
    /// is rejected as [`Error::InvalidToken`] regardless of its embedded
    /// expiry; only a well-signed token past its expiry yields
    /// [`Error::ExpiredToken`].
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::default();
        // No clock slack: a token expired by one second is expired
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::ExpiredToken,
            _ => Error::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.secret_key = Some("test-secret-key-for-tokens".to_string());
        config.auth.token.expiry = Duration::from_secs(3600);
        config
    }

    #[test]
    fn test_generate_and_verify_roundtrip() {
        let issuer = TokenIssuer::new(&create_test_config()).unwrap();
        let user_id = Uuid::new_v4();

        let token = issuer.generate(user_id).unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_empty_secret_is_signing_error() {
        let mut config = create_test_config();
        config.secret_key = Some(String::new());
        let err = TokenIssuer::new(&config).unwrap_err();
        assert_eq!(err.kind(), "signing");

        config.secret_key = None;
        let err = TokenIssuer::new(&config).unwrap_err();
        assert_eq!(err.kind(), "signing");
    }

    #[test]
    fn test_wrong_secret_is_invalid_token() {
        let issuer = TokenIssuer::new(&create_test_config()).unwrap();
        let token = issuer.generate(Uuid::new_v4()).unwrap();

        let mut other_config = create_test_config();
        other_config.secret_key = Some("a-different-secret".to_string());
        let other = TokenIssuer::new(&other_config).unwrap();

        let err = other.verify(&token).unwrap_err();
        assert_eq!(err.kind(), "invalid_token");
    }

    #[test]
    fn test_expired_token_under_correct_secret() {
        let issuer = TokenIssuer::new(&create_test_config()).unwrap();
        let token = issuer
            .generate_with_expiry(Uuid::new_v4(), chrono::Duration::seconds(-1))
            .unwrap();

        let err = issuer.verify(&token).unwrap_err();
        assert_eq!(err.kind(), "expired_token");
    }

    #[test]
    fn test_tampered_expired_token_is_invalid_not_expired() {
        // A tampered token must be rejected uniformly by signature, even when
        // its embedded expiry is in the past.
        let issuer = TokenIssuer::new(&create_test_config()).unwrap();
        let token = issuer
            .generate_with_expiry(Uuid::new_v4(), chrono::Duration::seconds(-3600))
            .unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let tampered_payload = parts[1].to_string().to_uppercase();
        parts[1] = &tampered_payload;
        let tampered = parts.join(".");

        let err = issuer.verify(&tampered).unwrap_err();
        assert_eq!(err.kind(), "invalid_token");
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let issuer = TokenIssuer::new(&create_test_config()).unwrap();
        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token"] {
            let err = issuer.verify(token).unwrap_err();
            assert_eq!(err.kind(), "invalid_token", "token: {token:?}");
        }
    }
}
