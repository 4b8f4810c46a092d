//! Durable filesystem artifact store.
//!
//! One immutable file per version (`artifact-v0000000001.dlft`), written
//! through a temporary file and published with `hard_link` so a version is
//! either fully present or absent. An already-linked final name is the
//! write-once conflict signal; crashes mid-write leave only a temp file,
//! which the next open sweeps away. Payloads carry a CRC32 trailer and are
//! re-validated on every load.

mod codec;

pub use codec::{decode, encode, MAGIC};

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::artifact::Artifact;
use crate::error::StorageError;
use crate::storage::traits::ArtifactStore;

const FILE_PREFIX: &str = "artifact-v";
const FILE_SUFFIX: &str = ".dlft";
const TEMP_SUFFIX: &str = ".tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Filesystem-backed [`ArtifactStore`].
#[derive(Debug)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Opens (or creates) a store rooted at `dir`, sweeping temp files left
    /// by interrupted writes.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the directory cannot be created or
    /// listed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
            {
                // Leftover from an interrupted write; never published.
                let _ = fs::remove_file(&path);
            }
        }
        Ok(Self { dir })
    }

    /// The directory this store persists into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn version_path(&self, version: u64) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{version:010}{FILE_SUFFIX}"))
    }

    fn parse_version(name: &str) -> Option<u64> {
        name.strip_prefix(FILE_PREFIX)?
            .strip_suffix(FILE_SUFFIX)?
            .parse()
            .ok()
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&self, artifact: &Artifact) -> Result<(), StorageError> {
        let bytes = encode(artifact)?;

        let final_path = self.version_path(artifact.version);
        if final_path.exists() {
            return Err(StorageError::VersionConflict { version: artifact.version });
        }

        let temp_name = format!(
            "{FILE_PREFIX}{:010}-{}-{}{TEMP_SUFFIX}",
            artifact.version,
            process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
        );
        let temp_path = self.dir.join(temp_name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        // Publication point: linking fails atomically if the version has
        // appeared in the meantime.
        let linked = fs::hard_link(&temp_path, &final_path);
        let cleanup = fs::remove_file(&temp_path);
        match linked {
            Ok(()) => {
                cleanup?;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StorageError::VersionConflict { version: artifact.version })
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn get(&self, version: u64) -> Result<Arc<Artifact>, StorageError> {
        let path = self.version_path(version);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::VersionNotFound { version });
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        let artifact: Artifact =
            decode(&mut BufReader::new(file)).map_err(|e| StorageError::CorruptArtifact {
                reason: format!("{}: {e}", path.display()),
            })?;
        if artifact.version != version {
            return Err(StorageError::CorruptArtifact {
                reason: format!(
                    "file {} claims version {}",
                    path.display(),
                    artifact.version
                ),
            });
        }
        artifact.validate()?;
        Ok(Arc::new(artifact))
    }

    fn latest(&self) -> Result<Option<u64>, StorageError> {
        Ok(self.versions()?.last().copied())
    }

    fn versions(&self) -> Result<Vec<u64>, StorageError> {
        let mut versions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if let Some(version) = Self::parse_version(name) {
                    versions.push(version);
                }
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }
}
