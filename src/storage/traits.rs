//! Abstract storage contract for versioned artifacts.
//!
//! A store is durable keyed storage of artifacts by monotonically increasing
//! version id, write-once per version. Backends must be safe to share across
//! threads: the registry reads while aggregation jobs write.

use std::sync::Arc;

use crate::artifact::Artifact;
use crate::error::StorageError;

/// Storage trait for versioned, write-once artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Persists a new artifact under its version.
    ///
    /// # Errors
    /// - [`StorageError::VersionConflict`] if the version already exists;
    ///   existing versions are never overwritten.
    fn put(&self, artifact: &Artifact) -> Result<(), StorageError>;

    /// Retrieves the artifact for an exact version, validated.
    ///
    /// # Errors
    /// - [`StorageError::VersionNotFound`] if the version is absent.
    /// - [`StorageError::CorruptArtifact`] if the stored data fails
    ///   validation.
    fn get(&self, version: u64) -> Result<Arc<Artifact>, StorageError>;

    /// Returns the highest version currently persisted, or `None` if the
    /// store is empty.
    ///
    /// # Errors
    /// Backend enumeration failures surface as [`StorageError::Backend`].
    fn latest(&self) -> Result<Option<u64>, StorageError>;

    /// Lists all persisted versions in ascending order.
    ///
    /// # Errors
    /// Backend enumeration failures surface as [`StorageError::Backend`].
    fn versions(&self) -> Result<Vec<u64>, StorageError>;
}
