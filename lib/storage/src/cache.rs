use parking_lot::RwLock;
use ragx_core::LoadError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::IndexStore;

/// Loads each index directory once and shares the result.
///
/// Stores are keyed by canonical path, so `./rag_db` and an absolute path to
/// the same directory resolve to the same entry.
#[derive(Default)]
pub struct StoreCache {
    stores: RwLock<HashMap<PathBuf, Arc<IndexStore>>>,
}

impl StoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached store for `dir`, loading it on first use
    pub fn get_or_load<P: AsRef<Path>>(&self, dir: P) -> Result<Arc<IndexStore>, LoadError> {
        let key = cache_key(dir.as_ref());

        if let Some(store) = self.stores.read().get(&key) {
            return Ok(store.clone());
        }

        // Held across the load so concurrent callers do not read twice
        let mut stores = self.stores.write();
        if let Some(store) = stores.get(&key) {
            return Ok(store.clone());
        }
        let store = Arc::new(IndexStore::load(&key)?);
        stores.insert(key, store.clone());
        Ok(store)
    }

    /// Re-read `dir` from disk and replace the cached entry.
    /// The previous store stays valid for holders of its `Arc`.
    pub fn reload<P: AsRef<Path>>(&self, dir: P) -> Result<Arc<IndexStore>, LoadError> {
        let key = cache_key(dir.as_ref());
        let store = Arc::new(IndexStore::load(&key)?);
        self.stores.write().insert(key.clone(), store.clone());
        info!("Reloaded index {:?}", key);
        Ok(store)
    }

    pub fn evict<P: AsRef<Path>>(&self, dir: P) -> bool {
        self.stores.write().remove(&cache_key(dir.as_ref())).is_some()
    }

    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }
}

fn cache_key(dir: &Path) -> PathBuf {
    std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

static GLOBAL_CACHE: OnceLock<StoreCache> = OnceLock::new();

/// Process-wide store cache (initialized on first use)
pub fn global_cache() -> &'static StoreCache {
    GLOBAL_CACHE.get_or_init(StoreCache::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write_artifacts;
    use ragx_core::{Distance, Document};

    fn write_fixture(dir: &Path, texts: &[&str]) {
        let documents = texts.iter().map(|t| Document::new(*t)).collect();
        let store = IndexStore::from_documents(documents, Distance::Euclidean).unwrap();
        write_artifacts(dir, store.vectorizer(), store.index(), store.documents()).unwrap();
    }

    #[test]
    fn test_second_lookup_reuses_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_fixture(temp_dir.path(), &["first passage", "second passage"]);

        let cache = StoreCache::new();
        let a = cache.get_or_load(temp_dir.path()).unwrap();
        let b = cache.get_or_load(temp_dir.path().join(".")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_store_ignores_disk_changes_until_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_fixture(temp_dir.path(), &["first passage", "second passage"]);

        let cache = StoreCache::new();
        let before = cache.get_or_load(temp_dir.path()).unwrap();

        write_fixture(temp_dir.path(), &["one", "two", "three"]);
        assert_eq!(cache.get_or_load(temp_dir.path()).unwrap().len(), 2);

        let after = cache.reload(temp_dir.path()).unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(before.len(), 2);
        assert!(Arc::ptr_eq(&after, &cache.get_or_load(temp_dir.path()).unwrap()));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = StoreCache::new();
        assert!(matches!(
            cache.get_or_load(temp_dir.path()),
            Err(LoadError::MissingArtifact { .. })
        ));
        assert!(cache.is_empty());

        write_fixture(temp_dir.path(), &["late passage", "another one"]);
        assert!(cache.get_or_load(temp_dir.path()).is_ok());
        assert!(cache.evict(temp_dir.path()));
        assert!(!cache.evict(temp_dir.path()));
    }
}
