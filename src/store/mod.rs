pub mod disk;
pub mod memory;

use crate::core::kv::KeyValueCollection;
use anyhow::{Context, Result};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::debug;

/// Hands out named collections, either persisted in a fjall keyspace or held
/// in memory. Asking for the same name twice yields the same collection.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    /// Opens (or creates) a persistent store rooted at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        debug!("Opened store at {}", path.display());

        Ok(Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: Some(keyspace),
        })
    }

    /// A store whose collections vanish with the process.
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.keyspace.is_some()
    }

    pub fn collection(&self, name: &str) -> Result<Arc<dyn KeyValueCollection>> {
        if let Some(collection) = self
            .collections
            .read()
            .map_err(|_| anyhow::anyhow!("Store lock poisoned"))?
            .get(name)
        {
            return Ok(Arc::clone(collection));
        }

        let collection: Arc<dyn KeyValueCollection> = match &self.keyspace {
            Some(keyspace) => {
                let partition = keyspace
                    .open_partition(name, PartitionCreateOptions::default())
                    .with_context(|| format!("Failed to open collection {name}"))?;
                Arc::new(DiskCollection::new(keyspace.clone(), partition))
            }
            None => Arc::new(MemoryCollection::new()),
        };

        let mut collections = self
            .collections
            .write()
            .map_err(|_| anyhow::anyhow!("Store lock poisoned"))?;
        Ok(Arc::clone(
            collections.entry(name.to_string()).or_insert(collection),
        ))
    }
}
