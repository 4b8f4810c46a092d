//! Transport-facing request and response types.
//!
//! The HTTP surface itself lives outside this crate; these are the serde
//! payloads it consumes and produces. Structured [`Reason`] values are
//! rendered to display strings here, at the boundary, so the scoring core
//! stays free of formatting concerns.

use serde::{Deserialize, Serialize};

use crate::draft::DraftState;
use crate::ids::{ChampionId, RoleId};
use crate::score::Recommendation;

fn default_top_k() -> usize {
    5
}

/// An inference request from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendRequest {
    /// Target role to recommend for.
    pub role: RoleId,
    /// Champions already picked by the requesting team (≤ 5).
    #[serde(default)]
    pub allies: Vec<ChampionId>,
    /// Champions picked by the opposing team (≤ 5).
    #[serde(default)]
    pub enemies: Vec<ChampionId>,
    /// Banned champions.
    #[serde(default)]
    pub bans: Vec<ChampionId>,
    /// Number of recommendations to return (defaults to 5).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl RecommendRequest {
    /// Builds the per-call draft state. Duplicate bans collapse into the
    /// set; pick-slot duplicates are caught by draft validation.
    #[must_use]
    pub fn draft_state(&self) -> DraftState {
        DraftState {
            target_role: self.role.clone(),
            allies: self.allies.clone(),
            enemies: self.enemies.clone(),
            bans: self.bans.iter().cloned().collect(),
        }
    }
}

/// One recommendation as serialized to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    /// Recommended champion.
    pub champion: ChampionId,
    /// Estimated win probability in `[0, 1]`.
    pub score: f64,
    /// Rendered explanation lines, in presentation order.
    pub reasons: Vec<String>,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        Self {
            champion: rec.champion.clone(),
            score: rec.probability,
            reasons: rec.reasons.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The inference response returned to the transport layer, echoing the
/// draft it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    /// Target role the request named.
    pub role: RoleId,
    /// Echoed ally picks.
    pub allies: Vec<ChampionId>,
    /// Echoed enemy picks.
    pub enemies: Vec<ChampionId>,
    /// Echoed bans.
    pub bans: Vec<ChampionId>,
    /// Ranked recommendations, best first.
    pub recommendations: Vec<RecommendationView>,
}

impl RecommendResponse {
    /// Assembles a response from the echoed request and ranked
    /// recommendations.
    #[must_use]
    pub fn new(request: &RecommendRequest, ranked: &[Recommendation]) -> Self {
        Self {
            role: request.role.clone(),
            allies: request.allies.clone(),
            enemies: request.enemies.clone(),
            bans: request.bans.clone(),
            recommendations: ranked.iter().map(RecommendationView::from).collect(),
        }
    }
}
