//! Inference engine over the model registry.
//!
//! [`DraftEngine`] is the entry point the transport layer calls: it
//! validates requests, resolves the active artifact exactly once per call,
//! scores and ranks candidates, and drives aggregation runs end to end
//! (aggregate → put → activate). The registry is dependency-injected; there
//! is no ambient global model state.

/// Bounded worker-pool runtime over the engine.
pub mod runtime;

use std::sync::Arc;

use crate::aggregate::{aggregate, CancelToken, SmoothingConfig};
use crate::dataset::OutcomeDataset;
use crate::draft::DraftState;
use crate::error::{LiftError, LiftResult, ValidationError};
use crate::ids::ChampionId;
use crate::registry::ModelRegistry;
use crate::request::{RecommendRequest, RecommendResponse};
use crate::score::{recommend, Recommendation, ScoringConfig};

/// Real-time inference engine.
#[derive(Clone)]
pub struct DraftEngine {
    registry: Arc<ModelRegistry>,
    scoring: ScoringConfig,
}

impl DraftEngine {
    /// Creates an engine over a registry with the default scoring
    /// configuration.
    #[must_use]
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry, scoring: ScoringConfig::default() }
    }

    /// Creates an engine with an explicit scoring configuration.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidScoring`] for a bad configuration.
    pub fn with_scoring(
        registry: Arc<ModelRegistry>,
        scoring: ScoringConfig,
    ) -> Result<Self, ValidationError> {
        Ok(Self { registry, scoring: scoring.validate()? })
    }

    /// The injected registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Serves one transport request: validate, score, rank, render.
    ///
    /// # Errors
    /// - [`LiftError::Validation`] for structural request problems.
    /// - [`LiftError::NoActiveArtifact`] until a version is activated.
    /// - [`LiftError::UnknownChampion`] if a pick names a champion the
    ///   active artifact has no evidence about.
    pub fn recommend(&self, request: &RecommendRequest) -> LiftResult<RecommendResponse> {
        let draft = request.draft_state();
        let ranked = self.recommend_draft(&draft, request.top_k)?;
        Ok(RecommendResponse::new(request, &ranked))
    }

    /// Structured-output counterpart of [`recommend`](Self::recommend),
    /// used by embedders and tests. The draft is read-only; it is never
    /// mutated or retained.
    ///
    /// # Errors
    /// As [`recommend`](Self::recommend).
    pub fn recommend_draft(
        &self,
        draft: &DraftState,
        top_k: usize,
    ) -> LiftResult<Vec<Recommendation>> {
        if top_k == 0 {
            return Err(ValidationError::TopKZero.into());
        }
        draft.validate()?;

        // One reference read per call; a concurrent activation does not
        // affect this request.
        let artifact = self.registry.current()?;

        // Bans may name anything; picks must be champions the artifact has
        // evidence about.
        for champ in draft.allies.iter().chain(draft.enemies.iter()) {
            if !artifact.knows_champion(champ) {
                return Err(LiftError::UnknownChampion { champion: champ.clone() });
            }
        }

        Ok(recommend(&artifact, draft, &self.scoring, top_k))
    }

    /// Runs a full aggregation cycle: builds an artifact at the next
    /// version, persists it, and activates it. Nothing is published if any
    /// step fails or the run is cancelled.
    ///
    /// # Errors
    /// Aggregation, storage, and activation failures propagate.
    pub fn rebuild(
        &self,
        dataset: &OutcomeDataset,
        smoothing: &SmoothingConfig,
        cancel: &CancelToken,
    ) -> LiftResult<u64> {
        let store = self.registry.store();
        let version = store.latest()?.map_or(1, |v| v + 1);
        let artifact = aggregate(dataset, smoothing, version, cancel)?;
        store.put(&artifact)?;
        self.registry.activate(version)?;
        Ok(version)
    }

    /// Convenience for listing the champions a draft would be scored
    /// against (the artifact's base-table universe minus the draft's
    /// unavailable champions).
    ///
    /// # Errors
    /// [`LiftError::NoActiveArtifact`] until a version is activated.
    pub fn candidates(&self, draft: &DraftState) -> LiftResult<Vec<ChampionId>> {
        let artifact = self.registry.current()?;
        let taken = draft.unavailable();
        Ok(artifact
            .base_champions()
            .into_iter()
            .filter(|champ| !taken.contains(champ))
            .collect())
    }
}
