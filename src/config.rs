//! Configuration for the auth core.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. Variables prefixed with `GATEHOUSE_` override YAML values; for
//! nested values use double underscores, e.g. `GATEHOUSE_AUTH__SESSION__COOKIE_NAME`.
//!
//! There is no process-wide singleton: the loaded [`Config`] value is passed
//! explicitly into the constructors of the token issuer, the session store
//! and the auth service.
//!
//! ```no_run
//! use gatehouse::config::Config;
//!
//! # fn main() -> Result<(), figment::Error> {
//! let config = Config::load("config.yaml")?;
//! println!("session cookie: {}", config.auth.session.cookie_name);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration for the auth core.
///
/// All fields have sensible defaults defined in the `Default` implementation;
/// only `secret_key` must be supplied for production use.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Secret key for bearer token signing (required for production)
    pub secret_key: Option<String>,
    /// Authentication configuration
    pub auth: AuthConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Password validation rules and hashing cost
    pub password: PasswordConfig,
    /// Session cookie and backend configuration
    pub session: SessionConfig,
    /// Bearer token configuration
    pub token: TokenConfig,
}

/// Bearer token configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenConfig {
    /// How long an issued bearer token is valid. There is no revocation:
    /// a token outlives logout and stays valid until this duration elapses.
    #[serde(with = "humantime_serde")]
    pub expiry: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

/// Session cookie and backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Session time-to-live; the backend evicts the record once this elapses
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Upper bound on any single key-value backend call
    #[serde(with = "humantime_serde")]
    pub backend_timeout: Duration,
    /// Cookie name for the session ID
    pub cookie_name: String,
    /// Set Secure flag on cookies (HTTPS only)
    pub cookie_secure: bool,
    /// Set HttpOnly flag on cookies
    pub cookie_http_only: bool,
    /// SameSite cookie attribute ("strict", "lax", or "none")
    pub cookie_same_site: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60 * 60 * 24), // 24 hours
            backend_timeout: Duration::from_secs(3),
            cookie_name: "session-id".to_string(),
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: "strict".to_string(),
        }
    }
}

/// Password validation rules and Argon2 cost parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Argon2 memory cost in KiB (default: 19456 KiB = 19 MB, secure for production)
    pub argon2_memory_kib: u32,
    /// Argon2 iterations (default: 2, secure for production)
    pub argon2_iterations: u32,
    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            argon2_memory_kib: 19456,
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: None,
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply `GATEHOUSE_`-prefixed
    /// environment variable overrides.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("GATEHOUSE_").split("__"))
            .extract()
    }
}
