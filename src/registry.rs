//! Active-artifact registry.
//!
//! The registry is the single point of shared mutable state in the crate:
//! one atomically swappable reference to the active [`Artifact`]. Loading a
//! new version happens against the store *before* the swap, so the write
//! lock is held only for the pointer replacement and readers never observe
//! a partially-built artifact. Readers clone the `Arc` once at entry and
//! keep using that exact artifact even if a newer version is activated
//! mid-call.

use std::sync::{Arc, RwLock};

use crate::artifact::Artifact;
use crate::error::{LiftError, LiftResult};
use crate::storage::ArtifactStore;

/// Holds the currently-active artifact and loads new versions from a store.
pub struct ModelRegistry {
    store: Arc<dyn ArtifactStore>,
    active: RwLock<Option<Arc<Artifact>>>,
}

impl ModelRegistry {
    /// Creates a registry over a store. No artifact is active until
    /// [`activate`](Self::activate) or [`refresh`](Self::refresh) succeeds.
    #[must_use]
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store, active: RwLock::new(None) }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Loads `version` from the store and atomically promotes it.
    ///
    /// # Errors
    /// Store and validation failures propagate; the previously active
    /// artifact stays in place on any failure.
    pub fn activate(&self, version: u64) -> LiftResult<()> {
        // Load fully before taking the write lock; the swap itself is a
        // single reference replacement.
        let artifact = self.store.get(version)?;
        let mut guard = self
            .active
            .write()
            .map_err(|_| LiftError::internal("registry lock poisoned"))?;
        *guard = Some(artifact);
        Ok(())
    }

    /// Returns the active artifact reference.
    ///
    /// Never blocks on I/O and never returns a partially-updated artifact.
    ///
    /// # Errors
    /// [`LiftError::NoActiveArtifact`] until the first successful
    /// activation.
    pub fn current(&self) -> LiftResult<Arc<Artifact>> {
        let guard = self
            .active
            .read()
            .map_err(|_| LiftError::internal("registry lock poisoned"))?;
        guard.clone().ok_or(LiftError::NoActiveArtifact)
    }

    /// Version of the active artifact, if any.
    #[must_use]
    pub fn active_version(&self) -> Option<u64> {
        self.active
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|a| a.version))
    }

    /// Activates `store.latest()` if it is newer than the active version.
    ///
    /// Returns the version activated, or `None` if the registry was already
    /// current (or the store is empty).
    ///
    /// # Errors
    /// Store failures propagate; a no-op refresh never fails.
    pub fn refresh(&self) -> LiftResult<Option<u64>> {
        let Some(latest) = self.store.latest()? else {
            return Ok(None);
        };
        if self.active_version().is_some_and(|v| v >= latest) {
            return Ok(None);
        }
        self.activate(latest)?;
        Ok(Some(latest))
    }
}
