//! Storage abstractions for persisted calculator state

use anyhow::Result;

/// A named collection of byte values addressed by string keys.
///
/// Writes replace the whole value stored under a key.
pub trait KeyValueCollection: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;
}
