//! Match-outcome input contract.
//!
//! An [`OutcomeDataset`] is an immutable snapshot of parsed match results,
//! one record per (match, participant). Producing it — fetching, paging,
//! and parsing raw match payloads — is an ingestion concern outside this
//! crate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AggregationError;
use crate::ids::{ChampionId, RoleId};

/// One participant's outcome in one match.
///
/// `allies` and `enemies` exclude the champion itself; `allies` are the
/// other members of the champion's own team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Role the champion played.
    pub role: RoleId,
    /// The champion this record is about.
    pub champion: ChampionId,
    /// Teammates observed alongside the champion.
    pub allies: BTreeSet<ChampionId>,
    /// Opposing champions in the same match.
    pub enemies: BTreeSet<ChampionId>,
    /// Whether the champion's team won.
    pub won: bool,
}

impl OutcomeRecord {
    /// Checks the structural invariants a well-formed record must satisfy.
    ///
    /// # Errors
    /// Returns [`AggregationError::DataIntegrity`] if the record lists its
    /// own champion as an ally or enemy, or lists the same champion on both
    /// sides.
    pub fn check_integrity(&self) -> Result<(), AggregationError> {
        if self.allies.contains(&self.champion) {
            return Err(AggregationError::DataIntegrity {
                reason: format!("record for '{}' lists itself as an ally", self.champion),
            });
        }
        if self.enemies.contains(&self.champion) {
            return Err(AggregationError::DataIntegrity {
                reason: format!("record for '{}' lists itself as an enemy", self.champion),
            });
        }
        if let Some(shared) = self.allies.intersection(&self.enemies).next() {
            return Err(AggregationError::DataIntegrity {
                reason: format!(
                    "record for '{}' lists '{shared}' as both ally and enemy",
                    self.champion
                ),
            });
        }
        Ok(())
    }
}

/// An immutable sequence of match-outcome records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDataset {
    records: Vec<OutcomeRecord>,
}

impl OutcomeDataset {
    /// Wraps a parsed outcome table. The dataset is a snapshot; it is never
    /// mutated after construction.
    #[must_use]
    pub fn new(records: Vec<OutcomeRecord>) -> Self {
        Self { records }
    }

    /// Returns the records in input order.
    #[must_use]
    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    /// Number of records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
