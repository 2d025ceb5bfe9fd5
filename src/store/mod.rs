//! Key-value backend contract for session storage.
//!
//! The session store delegates durability and atomicity entirely to this
//! backend: `SET key value EX ttl`, `GET key`, `DEL key`, with records
//! auto-evicted once their TTL elapses. Operations are atomic per key; no
//! cross-key coordination is needed because each session is independently
//! created, read and deleted.
//!
//! Backend failures surface as raw [`anyhow::Error`] values here; the session
//! store wraps them into [`crate::errors::Error::Store`] so they are never
//! mistaken for a missing key.

pub mod memory;

pub use memory::InMemoryKv;

/// A TTL-capable string key-value store. Any Redis-like backend or test
/// double can satisfy this.
#[async_trait::async_trait]
pub trait KvBackend: Send + Sync {
    /// Store `value` under `key`, evicted automatically after `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> anyhow::Result<()>;

    /// Fetch the value under `key`. `None` means absent, deleted, or expired.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Remove the value under `key`. Deleting an absent key is not an error.
    async fn del(&self, key: &str) -> anyhow::Result<()>;
}
