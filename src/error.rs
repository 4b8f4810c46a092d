//! Error types for draftlift.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific error conditions and provides clear error messages.
//! Conditions the engine recovers from locally (an unknown pair, a missing
//! base rate, an oversized `top_k`) never appear here.

use thiserror::Error;

use crate::ids::ChampionId;

/// Validation errors raised while checking caller-supplied input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Role identifier cannot be empty")]
    EmptyRole,

    #[error("top_k must be at least 1")]
    TopKZero,

    #[error("Too many {side} picks: {count} (max 5)")]
    TooManyPicks {
        side: &'static str,
        count: usize,
    },

    #[error("Champion '{champion}' occupies more than one draft slot")]
    DuplicateDraftChampion {
        champion: ChampionId,
    },

    #[error("Invalid smoothing configuration: {reason}")]
    InvalidSmoothing {
        reason: String,
    },

    #[error("Invalid scoring configuration: {reason}")]
    InvalidScoring {
        reason: String,
    },
}

/// Errors raised by an aggregation run. No artifact is published when a run
/// fails with either variant.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Data integrity violation: {reason}")]
    DataIntegrity {
        reason: String,
    },

    #[error("Aggregation run was cancelled")]
    Cancelled,
}

/// Errors raised by artifact storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Attempt to put a version that already exists (write-once).
    #[error("Artifact version {version} already exists")]
    VersionConflict {
        version: u64,
    },

    /// Requested version is not in the store.
    #[error("Artifact version {version} not found")]
    VersionNotFound {
        version: u64,
    },

    /// A stored artifact failed load-time validation.
    #[error("Corrupt artifact: {reason}")]
    CorruptArtifact {
        reason: String,
    },

    /// Backend error (lock poisoning, encoding, enumeration).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Underlying I/O failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for draftlift.
///
/// This enum encompasses all possible errors that can occur when using
/// the aggregation, storage, registry, and inference layers.
#[derive(Debug, Error)]
pub enum LiftError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The registry has never been activated; requests cannot be served.
    #[error("No active artifact: activate a version before serving requests")]
    NoActiveArtifact,

    /// A draft slot references a champion the active artifact knows nothing
    /// about.
    #[error("Unknown champion in draft: '{champion}'")]
    UnknownChampion {
        champion: ChampionId,
    },

    /// The runtime queue for the requested lane is full.
    #[error("Runtime queue full ({queued} jobs queued)")]
    Busy {
        queued: usize,
    },

    /// The runtime has shut down and accepts no further work.
    #[error("Runtime is shutting down")]
    ShuttingDown,

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl LiftError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is the caller's fault (bad request).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownChampion { .. })
    }

    /// Returns true if the request may succeed if retried later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NoActiveArtifact | Self::Busy { .. })
    }
}

/// Result type alias for draftlift operations.
pub type LiftResult<T> = Result<T, LiftError>;
