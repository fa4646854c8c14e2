//! Persistent key-value cache for analysis results
//!
//! Two namespaces live here at runtime: per-post analyses keyed by post id,
//! and aggregate analyses keyed by a whole-set fingerprint. Storage failures
//! are never fatal: a read/parse failure is a cache miss, a write failure is
//! logged and swallowed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Cache directory: .pulse/
pub const CACHE_DIR: &str = ".pulse";

/// A cached value together with the fingerprint of the input it was computed
/// from. The entry is valid to reuse only while the fingerprints still match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
    pub fingerprint: String,
    pub value: T,
}

/// Get/put capability over durable storage, one payload per namespace.
pub trait CacheBackend: Send + Sync {
    fn load(&self, namespace: &str) -> Option<String>;
    fn store(&self, namespace: &str, payload: &str);
}

/// Backend writing one JSON file per namespace under a cache directory.
pub struct DiskBackend {
    dir: PathBuf,
}

impl DiskBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl CacheBackend for DiskBackend {
    fn load(&self, namespace: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(namespace)).ok()
    }

    fn store(&self, namespace: &str, payload: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::debug!("cannot create cache directory {}: {}", self.dir.display(), e);
            return;
        }
        if let Err(e) = std::fs::write(self.path_for(namespace), payload) {
            tracing::debug!("cache write for {} failed: {}", namespace, e);
        }
    }
}

/// In-memory backend for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryBackend {
    payloads: Mutex<HashMap<String, String>>,
}

impl CacheBackend for MemoryBackend {
    fn load(&self, namespace: &str) -> Option<String> {
        self.payloads.lock().unwrap().get(namespace).cloned()
    }

    fn store(&self, namespace: &str, payload: &str) {
        self.payloads
            .lock()
            .unwrap()
            .insert(namespace.to_string(), payload.to_string());
    }
}

/// One namespace of cached analyses, loaded eagerly and persisted on every put.
pub struct CacheStore<T> {
    backend: Arc<dyn CacheBackend>,
    namespace: String,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Serialize + DeserializeOwned + Clone> CacheStore<T> {
    /// Open a namespace. Missing or corrupt storage yields an empty store.
    pub fn open(backend: Arc<dyn CacheBackend>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let entries = match backend.load(&namespace) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("discarding corrupt cache namespace {}: {}", namespace, e);
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        Self {
            backend,
            namespace,
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    /// The value behind `key`, but only while its stored fingerprint matches.
    pub fn lookup(&self, key: &str, fingerprint: &str) -> Option<&T> {
        self.entries
            .get(key)
            .filter(|entry| entry.fingerprint == fingerprint)
            .map(|entry| &entry.value)
    }

    pub fn put(&mut self, key: impl Into<String>, entry: CacheEntry<T>) {
        self.entries.insert(key.into(), entry);
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(payload) => self.backend.store(&self.namespace, &payload),
            Err(e) => tracing::debug!("cache serialization for {} failed: {}", self.namespace, e),
        }
    }
}
