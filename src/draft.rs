//! Per-request draft state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ids::{ChampionId, RoleId};

/// Maximum picks per side in a standard draft.
pub const MAX_TEAM_SIZE: usize = 5;

/// A partially-filled draft for one recommendation request.
///
/// Empty slots are simply omitted from the lists. The engine treats the
/// state as read-only; any "clear the occupied target role first" policy
/// belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    /// Role the recommendation is for.
    pub target_role: RoleId,
    /// Champions already picked by the requesting team.
    pub allies: Vec<ChampionId>,
    /// Champions picked by the opposing team.
    pub enemies: Vec<ChampionId>,
    /// Banned champions (either side).
    pub bans: BTreeSet<ChampionId>,
}

impl DraftState {
    /// Creates an empty draft for a role.
    #[must_use]
    pub fn for_role(target_role: impl Into<RoleId>) -> Self {
        Self {
            target_role: target_role.into(),
            allies: Vec::new(),
            enemies: Vec::new(),
            bans: BTreeSet::new(),
        }
    }

    /// Validates structural constraints: a non-blank role, at most
    /// [`MAX_TEAM_SIZE`] picks per side, and no champion appearing in more
    /// than one slot class.
    ///
    /// # Errors
    /// Returns the first violated [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target_role.is_blank() {
            return Err(ValidationError::EmptyRole);
        }
        if self.allies.len() > MAX_TEAM_SIZE {
            return Err(ValidationError::TooManyPicks {
                side: "ally",
                count: self.allies.len(),
            });
        }
        if self.enemies.len() > MAX_TEAM_SIZE {
            return Err(ValidationError::TooManyPicks {
                side: "enemy",
                count: self.enemies.len(),
            });
        }

        let mut seen: BTreeSet<&ChampionId> = BTreeSet::new();
        for champ in self.allies.iter().chain(self.enemies.iter()) {
            if !seen.insert(champ) {
                return Err(ValidationError::DuplicateDraftChampion {
                    champion: champ.clone(),
                });
            }
        }
        // A banned champion cannot also be picked.
        for champ in &self.bans {
            if seen.contains(champ) {
                return Err(ValidationError::DuplicateDraftChampion {
                    champion: champ.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns every champion occupying a slot: picks and bans. These are
    /// unavailable as candidates.
    #[must_use]
    pub fn unavailable(&self) -> BTreeSet<ChampionId> {
        self.allies
            .iter()
            .chain(self.enemies.iter())
            .chain(self.bans.iter())
            .cloned()
            .collect()
    }
}
