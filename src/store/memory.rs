//! In-memory key-value backend with per-key TTL.
//!
//! Suitable for tests and single-node deployments. Expiry is lazy: an expired
//! entry is treated as absent on read and physically removed on the next
//! write pass.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::store::KvBackend;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory [`KvBackend`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryKv {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvBackend for InMemoryKv {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> anyhow::Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| now < entry.expires_at);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.value.clone()))
    }

    async fn del(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
