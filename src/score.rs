//! Logit-space candidate scoring.
//!
//! Probability deltas cannot be summed directly: 50% + 60% + 60% is not a
//! probability. Scores are therefore combined in log-odds space, which keeps
//! the result inside `[0, 1]` and gives diminishing returns near the
//! boundaries. Explanations are built as structured [`Reason`] values and
//! rendered to display strings only at the transport boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::draft::DraftState;
use crate::error::ValidationError;
use crate::ids::ChampionId;

/// Neutral probability used when the artifact has no base rate for a
/// candidate (or the whole target role).
pub const NEUTRAL_RATE: f64 = 0.5;

/// Configuration for the additive-in-logit-space scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight applied to the summed synergy lifts.
    pub synergy_weight: f64,
    /// Weight applied to the summed counter lifts.
    pub counter_weight: f64,
    /// Conversion factor from win-rate delta to log-odds. A 1% win-rate
    /// difference is roughly 0.04 logits near 50%, hence the default 4.0.
    pub logit_scale: f64,
    /// Probabilities are clamped into `[epsilon, 1 - epsilon]` before the
    /// logit transform.
    pub epsilon: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            synergy_weight: 1.0,
            counter_weight: 1.0,
            logit_scale: 4.0,
            epsilon: 1e-7,
        }
    }
}

impl ScoringConfig {
    /// Validates the configuration, returning it for chaining.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidScoring`] for negative weights, a
    /// non-positive scale, or an epsilon outside `(0, 0.5)`.
    pub fn validate(self) -> Result<Self, ValidationError> {
        for (name, value) in [
            ("synergy_weight", self.synergy_weight),
            ("counter_weight", self.counter_weight),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ValidationError::InvalidScoring {
                    reason: format!("{name} must be non-negative (got {value})"),
                });
            }
        }
        if !(self.logit_scale > 0.0) || !self.logit_scale.is_finite() {
            return Err(ValidationError::InvalidScoring {
                reason: format!("logit_scale must be positive (got {})", self.logit_scale),
            });
        }
        if !(self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(ValidationError::InvalidScoring {
                reason: format!("epsilon must be in (0, 0.5) (got {})", self.epsilon),
            });
        }
        Ok(self)
    }
}

/// Log-odds transform, with `p` clamped into `[epsilon, 1 - epsilon]`.
#[must_use]
pub fn logit(p: f64, epsilon: f64) -> f64 {
    let p = p.clamp(epsilon, 1.0 - epsilon);
    (p / (1.0 - p)).ln()
}

/// Numerically stable inverse of [`logit`].
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// One structured explanation term for a scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reason {
    /// The candidate's smoothed base rate in the target role.
    Base {
        /// The base probability used.
        probability: f64,
        /// True when the artifact had no entry and the neutral rate was
        /// substituted.
        no_data: bool,
    },
    /// A non-zero ally synergy contribution.
    Synergy {
        /// The ally responsible.
        partner: ChampionId,
        /// Win-rate delta from the pair table.
        lift: f64,
    },
    /// A non-zero enemy counter contribution.
    Counter {
        /// The enemy responsible.
        partner: ChampionId,
        /// Win-rate delta from the pair table.
        lift: f64,
    },
    /// The combined final probability.
    Final {
        /// The estimated win probability.
        probability: f64,
    },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base { probability, no_data: false } => {
                write!(f, "Base win rate: {:.1}%", probability * 100.0)
            }
            Self::Base { probability, no_data: true } => {
                write!(
                    f,
                    "Base win rate: {:.1}% (no historical data)",
                    probability * 100.0
                )
            }
            Self::Synergy { partner, lift } => {
                write!(f, "Synergy with {partner}: {:+.1}%", lift * 100.0)
            }
            Self::Counter { partner, lift } => {
                write!(f, "Counter vs {partner}: {:+.1}%", lift * 100.0)
            }
            Self::Final { probability } => {
                write!(f, "Estimated win probability: {:.1}%", probability * 100.0)
            }
        }
    }
}

/// The three additive components behind a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// Base probability before lifts.
    pub base: f64,
    /// Sum of applicable synergy lifts (unweighted).
    pub synergy_sum: f64,
    /// Sum of applicable counter lifts (unweighted).
    pub counter_sum: f64,
    /// True when `base` is the substituted neutral rate.
    pub base_is_prior: bool,
}

/// A scored, explained candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The candidate champion.
    pub champion: ChampionId,
    /// Estimated win probability in `[0, 1]`.
    pub probability: f64,
    /// Component breakdown.
    pub components: ScoreComponents,
    /// Ordered explanation: base, synergy terms by descending |lift|,
    /// counter terms by descending |lift|, final probability.
    pub reasons: Vec<Reason>,
}

/// Orders lift terms by descending magnitude, ties by partner id.
fn sort_terms(terms: &mut [(ChampionId, f64)]) {
    terms.sort_by(|a, b| {
        b.1.abs()
            .total_cmp(&a.1.abs())
            .then_with(|| a.0.cmp(&b.0))
    });
}

/// Scores one candidate against a draft using the active artifact.
#[must_use]
pub fn score_candidate(
    artifact: &Artifact,
    draft: &DraftState,
    candidate: &ChampionId,
    config: &ScoringConfig,
) -> Recommendation {
    let role = &draft.target_role;

    let (base, base_is_prior) = match artifact.base_rate(role, candidate) {
        Some(p) => (p, false),
        None => (NEUTRAL_RATE, true),
    };

    let mut synergy_terms: Vec<(ChampionId, f64)> = Vec::with_capacity(draft.allies.len());
    for ally in &draft.allies {
        // Unknown pair is neutral, not penalized.
        let lift = artifact
            .synergy_lift(role, candidate, ally)
            .map_or(0.0, |stat| stat.lift);
        if lift != 0.0 {
            synergy_terms.push((ally.clone(), lift));
        }
    }

    let mut counter_terms: Vec<(ChampionId, f64)> = Vec::with_capacity(draft.enemies.len());
    for enemy in &draft.enemies {
        let lift = artifact
            .counter_lift(role, candidate, enemy)
            .map_or(0.0, |stat| stat.lift);
        if lift != 0.0 {
            counter_terms.push((enemy.clone(), lift));
        }
    }

    let synergy_sum: f64 = synergy_terms.iter().map(|(_, lift)| lift).sum();
    let counter_sum: f64 = counter_terms.iter().map(|(_, lift)| lift).sum();

    let total_logit = logit(base, config.epsilon)
        + config.logit_scale
            * (config.synergy_weight * synergy_sum + config.counter_weight * counter_sum);
    let probability = sigmoid(total_logit);

    sort_terms(&mut synergy_terms);
    sort_terms(&mut counter_terms);

    let mut reasons = Vec::with_capacity(2 + synergy_terms.len() + counter_terms.len());
    reasons.push(Reason::Base { probability: base, no_data: base_is_prior });
    reasons.extend(
        synergy_terms
            .into_iter()
            .map(|(partner, lift)| Reason::Synergy { partner, lift }),
    );
    reasons.extend(
        counter_terms
            .into_iter()
            .map(|(partner, lift)| Reason::Counter { partner, lift }),
    );
    reasons.push(Reason::Final { probability });

    Recommendation {
        champion: candidate.clone(),
        probability,
        components: ScoreComponents { base, synergy_sum, counter_sum, base_is_prior },
        reasons,
    }
}

/// Scores every available candidate and returns the top `top_k`, ordered by
/// probability descending with ties broken by champion id ascending.
///
/// The candidate set is every champion in the artifact's base table minus
/// the draft's picks and bans. `top_k` values beyond the candidate count
/// are truncated, not an error.
#[must_use]
pub fn recommend(
    artifact: &Artifact,
    draft: &DraftState,
    config: &ScoringConfig,
    top_k: usize,
) -> Vec<Recommendation> {
    let taken = draft.unavailable();
    let mut scored: Vec<Recommendation> = artifact
        .base_champions()
        .into_iter()
        .filter(|champ| !taken.contains(champ))
        .map(|champ| score_candidate(artifact, draft, &champ, config))
        .collect();

    scored.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.champion.cmp(&b.champion))
    });
    scored.truncate(top_k);
    scored
}
