use crate::core::kv::KeyValueCollection;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionHandle, PersistMode};
use tracing::debug;

/// A collection backed by one fjall partition. Every write is synced to disk
/// before returning.
pub struct DiskCollection {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Keyspace, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn sync(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush store to disk")
    }
}

impl KeyValueCollection for DiskCollection {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read key {key}"))?;
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value.map(|slice| slice.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.partition
            .insert(key.as_bytes(), value)
            .with_context(|| format!("Failed to write key {key}"))?;
        self.sync()?;
        debug!("Store PUT for key: {key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let existed = self
            .partition
            .contains_key(key)
            .with_context(|| format!("Failed to read key {key}"))?;
        if existed {
            self.partition
                .remove(key.as_bytes())
                .with_context(|| format!("Failed to remove key {key}"))?;
            self.sync()?;
        }
        debug!("Store REMOVE for key: {key}");
        Ok(existed)
    }
}
