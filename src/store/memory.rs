use crate::core::kv::KeyValueCollection;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory collection, lost when the process exits.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCollection for MemoryCollection {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        let value = entries.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_vec());
        debug!("Store PUT for key: {key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        debug!("Store REMOVE for key: {key}");
        Ok(entries.remove(key).is_some())
    }
}
