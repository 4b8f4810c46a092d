//! In-memory artifact store.
//!
//! Thread-safe reference implementation, intended for embedded usage and
//! tests. Artifacts are held as `Arc`s, so `get` is a cheap clone and
//! readers never copy tables.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::artifact::Artifact;
use crate::error::StorageError;
use crate::storage::traits::ArtifactStore;

fn lock_err(context: &'static str) -> StorageError {
    StorageError::Backend(format!("poisoned lock: {context}"))
}

/// Thread-safe in-memory [`ArtifactStore`].
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<BTreeMap<u64, Arc<Artifact>>>,
}

impl MemoryArtifactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put(&self, artifact: &Artifact) -> Result<(), StorageError> {
        let mut guard = self.artifacts.write().map_err(|_| lock_err("put"))?;
        if guard.contains_key(&artifact.version) {
            return Err(StorageError::VersionConflict { version: artifact.version });
        }
        guard.insert(artifact.version, Arc::new(artifact.clone()));
        Ok(())
    }

    fn get(&self, version: u64) -> Result<Arc<Artifact>, StorageError> {
        let guard = self.artifacts.read().map_err(|_| lock_err("get"))?;
        guard
            .get(&version)
            .cloned()
            .ok_or(StorageError::VersionNotFound { version })
    }

    fn latest(&self) -> Result<Option<u64>, StorageError> {
        let guard = self.artifacts.read().map_err(|_| lock_err("latest"))?;
        Ok(guard.keys().next_back().copied())
    }

    fn versions(&self) -> Result<Vec<u64>, StorageError> {
        let guard = self.artifacts.read().map_err(|_| lock_err("versions"))?;
        Ok(guard.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, CancelToken, SmoothingConfig};
    use crate::dataset::OutcomeDataset;

    fn artifact(version: u64) -> Artifact {
        aggregate(
            &OutcomeDataset::default(),
            &SmoothingConfig::default(),
            version,
            &CancelToken::new(),
        )
        .unwrap()
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemoryArtifactStore::new();
        store.put(&artifact(1)).unwrap();
        assert_eq!(store.get(1).unwrap().version, 1);
    }

    #[test]
    fn duplicate_version_is_a_conflict() {
        let store = MemoryArtifactStore::new();
        store.put(&artifact(1)).unwrap();
        assert!(matches!(
            store.put(&artifact(1)),
            Err(StorageError::VersionConflict { version: 1 })
        ));
    }

    #[test]
    fn latest_tracks_the_highest_version() {
        let store = MemoryArtifactStore::new();
        assert_eq!(store.latest().unwrap(), None);
        store.put(&artifact(3)).unwrap();
        store.put(&artifact(1)).unwrap();
        assert_eq!(store.latest().unwrap(), Some(3));
        assert_eq!(store.versions().unwrap(), vec![1, 3]);
    }

    #[test]
    fn missing_version_is_not_found() {
        let store = MemoryArtifactStore::new();
        assert!(matches!(
            store.get(9),
            Err(StorageError::VersionNotFound { version: 9 })
        ));
    }
}
