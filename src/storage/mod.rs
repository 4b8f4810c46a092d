//! Artifact storage backends.

pub mod memory;
pub mod traits;

#[cfg(feature = "persistent")]
pub mod persistent;

pub use memory::MemoryArtifactStore;
pub use traits::ArtifactStore;

#[cfg(feature = "persistent")]
pub use persistent::FsArtifactStore;
