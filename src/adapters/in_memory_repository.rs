//! In-memory session repository for testing.
//!
//! This adapter provides a pure in-memory implementation of
//! SessionRepository, enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    hash::Hash,
    path::Path,
    sync::{Arc, Mutex},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Result, error::Error, ports::SessionRepository, q_learning::SavedSession,
};

/// In-memory repository for testing.
///
/// Stores serialized sessions in a shared HashMap. Sessions pass through the
/// same rmp_serde encoding as the file adapter, so round-trip behavior is
/// identical.
///
/// # Thread Safety
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of sessions currently stored.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    /// Remove all stored sessions.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }
}

impl<S, A> SessionRepository<S, A> for InMemoryRepository
where
    S: Serialize + DeserializeOwned + Eq + Hash,
    A: Serialize + DeserializeOwned + Eq + Hash,
{
    fn save(&self, session: &SavedSession<S, A>, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec(session).map_err(|e| Error::SerializationContext {
            operation: "serialize session for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage.lock().unwrap().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedSession<S, A>> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage.lock().unwrap();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load session from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize session from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let key = path.to_string_lossy().to_string();
        self.storage.lock().unwrap().contains_key(&key)
    }
}
