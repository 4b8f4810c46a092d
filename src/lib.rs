//! # draftlift - Lift Aggregation & Inference Engine
//!
//! draftlift recommends, for a partially-filled team draft, the champions
//! most likely to win, with a breakdown of why. It has three parts:
//!
//! - **Aggregator**: converts historical match outcomes into smoothed
//!   statistical tables (base role strength, ally-synergy lift,
//!   enemy-counter lift).
//! - **ModelRegistry / ArtifactStore**: versioned, write-once artifact
//!   storage plus an atomically swappable active-artifact reference that
//!   serves concurrent readers through zero-downtime upgrades.
//! - **DraftEngine**: combines the tables in logit space to rank candidate
//!   champions and produce structured explanations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftlift::{
//!     CancelToken, DraftEngine, MemoryArtifactStore, ModelRegistry,
//!     OutcomeDataset, RecommendRequest, SmoothingConfig,
//! };
//!
//! let registry = Arc::new(ModelRegistry::new(Arc::new(MemoryArtifactStore::new())));
//! let engine = DraftEngine::new(registry);
//!
//! // Offline: aggregate a parsed outcome snapshot and activate it.
//! let dataset = OutcomeDataset::new(records);
//! engine.rebuild(&dataset, &SmoothingConfig::default(), &CancelToken::new())?;
//!
//! // Online: serve draft recommendations against the active artifact.
//! let response = engine.recommend(&RecommendRequest {
//!     role: "MID".into(),
//!     allies: vec!["Jinx".into()],
//!     enemies: vec!["Zed".into()],
//!     bans: vec!["Yasuo".into()],
//!     top_k: 3,
//! })?;
//! ```
//!
//! Match ingestion, HTTP transport, and presentation are external
//! collaborators; this crate consumes an already-parsed [`OutcomeDataset`]
//! and exposes the serde request/response types the transport layer uses.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

// Core types
pub mod artifact;
pub mod dataset;
pub mod draft;
pub mod error;
pub mod ids;

// Aggregation and scoring
pub mod aggregate;
pub mod score;

// Storage, registry, and the inference engine
pub mod engine;
pub mod registry;
pub mod request;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use aggregate::{aggregate, CancelToken, SmoothingConfig};
pub use artifact::{Artifact, ArtifactManifest, LiftStat, TallyStat};
pub use dataset::{OutcomeDataset, OutcomeRecord};
pub use draft::DraftState;
pub use engine::runtime::{DraftRuntime, RebuildHandle, RuntimeConfig};
pub use engine::DraftEngine;
pub use error::{AggregationError, LiftError, LiftResult, StorageError, ValidationError};
pub use ids::{ChampionId, RoleId};
pub use registry::ModelRegistry;
pub use request::{RecommendRequest, RecommendResponse, RecommendationView};
pub use score::{
    logit, recommend, score_candidate, sigmoid, Reason, Recommendation, ScoreComponents,
    ScoringConfig,
};
pub use storage::{ArtifactStore, MemoryArtifactStore};

#[cfg(feature = "persistent")]
pub use storage::FsArtifactStore;
