//! Test utilities (available with the `test-utils` feature).

use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::config::Config;
use crate::directory::InMemoryDirectory;
use crate::store::InMemoryKv;

/// Config tuned for tests: fixed secret, cheap Argon2 cost, short password
/// minimum, tight backend timeout.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.secret_key = Some("test-secret-key-for-testing-only".to_string());
    config.auth.password.min_length = 6;
    config.auth.password.argon2_memory_kib = 1024;
    config.auth.password.argon2_iterations = 1;
    config.auth.session.backend_timeout = std::time::Duration::from_millis(500);
    config
}

/// An [`AuthService`] wired to in-memory directory and session backends.
pub fn create_test_service() -> AuthService {
    AuthService::new(create_test_config(), Arc::new(InMemoryDirectory::new()), Arc::new(InMemoryKv::new()))
        .expect("test config has a secret key")
}
