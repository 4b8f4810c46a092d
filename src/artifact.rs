//! Versioned, immutable statistical artifacts.
//!
//! An [`Artifact`] is the output of one aggregation run: the smoothed base
//! table plus the synergy and counter lift tables, along with a version id,
//! build timestamp, and a manifest describing the run. Once constructed an
//! artifact is never mutated; the registry swaps whole `Arc<Artifact>`
//! references.
//!
//! All tables are `BTreeMap`s keyed by role and champion so that iteration
//! order, serialization, and the manifest digest are deterministic.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::SmoothingConfig;
use crate::error::{AggregationError, StorageError};
use crate::ids::{ChampionId, RoleId};

/// Raw win/game counts for one (role, champion) or pair cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyStat {
    /// Number of wins observed.
    pub wins: u64,
    /// Number of games observed.
    pub games: u64,
}

impl TallyStat {
    /// Builds a tally, rejecting `wins > games`.
    ///
    /// # Errors
    /// Returns [`AggregationError::DataIntegrity`] when the counts are
    /// inconsistent. Malformed counts abort the whole run rather than being
    /// silently clamped, since clamping would mask an upstream bug.
    pub fn checked(wins: u64, games: u64) -> Result<Self, AggregationError> {
        if wins > games {
            return Err(AggregationError::DataIntegrity {
                reason: format!("wins ({wins}) exceed games ({games})"),
            });
        }
        Ok(Self { wins, games })
    }

    /// Records one game.
    pub fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Beta-smoothed win probability: `(wins + α) / (games + α + β)`.
    #[must_use]
    pub fn smoothed(&self, alpha: f64, beta: f64) -> f64 {
        (self.wins as f64 + alpha) / (self.games as f64 + alpha + beta)
    }
}

/// A clamped pairwise lift with its sample size.
///
/// `lift` is the smoothed conditional win probability minus the champion's
/// role base rate; positive means the partner helps, negative means the
/// partner hurts. `games` is retained for operators auditing sparse pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiftStat {
    /// Win-probability delta from the role base rate.
    pub lift: f64,
    /// Number of games the pair was observed together.
    pub games: u64,
}

/// Smoothed base rates: role → champion → probability.
pub type BaseTable = BTreeMap<RoleId, BTreeMap<ChampionId, f64>>;

/// Pairwise lifts: role → champion → partner → [`LiftStat`].
pub type PairTable = BTreeMap<RoleId, BTreeMap<ChampionId, BTreeMap<ChampionId, LiftStat>>>;

/// Provenance for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// Number of outcome records consumed.
    pub record_count: u64,
    /// Number of distinct champions in the base table.
    pub champion_count: u64,
    /// Smoothing configuration the run used.
    pub smoothing: SmoothingConfig,
    /// blake3 hex digest of the canonical table encoding. Two runs over the
    /// same dataset and configuration produce the same digest.
    pub digest: String,
}

/// An immutable bundle of base/synergy/counter tables produced by one
/// aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Monotonically increasing version id.
    pub version: u64,
    /// When the aggregation run finished.
    pub built_at: DateTime<Utc>,
    /// Run provenance.
    pub manifest: ArtifactManifest,
    /// Smoothed base rates.
    pub base: BaseTable,
    /// Ally synergy lifts.
    pub synergy: PairTable,
    /// Enemy counter lifts.
    pub counter: PairTable,
}

/// Computes the blake3 digest over the canonical JSON encoding of the three
/// tables. `BTreeMap` key order makes the encoding stable.
#[must_use]
pub fn table_digest(base: &BaseTable, synergy: &PairTable, counter: &PairTable) -> String {
    let mut hasher = blake3::Hasher::new();
    // Keyed sections keep the digest unambiguous if a table is empty.
    hasher.update(b"base:");
    hasher.update(&serde_json::to_vec(base).unwrap_or_default());
    hasher.update(b"synergy:");
    hasher.update(&serde_json::to_vec(synergy).unwrap_or_default());
    hasher.update(b"counter:");
    hasher.update(&serde_json::to_vec(counter).unwrap_or_default());
    hasher.finalize().to_hex().to_string()
}

impl Artifact {
    /// Smoothed base rate for a (role, champion), if the table has it.
    #[must_use]
    pub fn base_rate(&self, role: &RoleId, champion: &ChampionId) -> Option<f64> {
        self.base.get(role)?.get(champion).copied()
    }

    /// Returns true if the base table has any entry for the role.
    #[must_use]
    pub fn has_role(&self, role: &RoleId) -> bool {
        self.base.get(role).is_some_and(|champs| !champs.is_empty())
    }

    /// Synergy lift for (role, champion, ally), if observed.
    #[must_use]
    pub fn synergy_lift(
        &self,
        role: &RoleId,
        champion: &ChampionId,
        ally: &ChampionId,
    ) -> Option<LiftStat> {
        self.synergy.get(role)?.get(champion)?.get(ally).copied()
    }

    /// Counter lift for (role, champion, enemy), if observed.
    #[must_use]
    pub fn counter_lift(
        &self,
        role: &RoleId,
        champion: &ChampionId,
        enemy: &ChampionId,
    ) -> Option<LiftStat> {
        self.counter.get(role)?.get(champion)?.get(enemy).copied()
    }

    /// All champions present in the base table, across every role. This is
    /// the candidate universe for recommendations.
    #[must_use]
    pub fn base_champions(&self) -> BTreeSet<ChampionId> {
        self.base
            .values()
            .flat_map(|champs| champs.keys().cloned())
            .collect()
    }

    /// Returns true if the artifact has any evidence about the champion:
    /// a base-table entry or an appearance as a pair partner.
    #[must_use]
    pub fn knows_champion(&self, champion: &ChampionId) -> bool {
        if self.base.values().any(|champs| champs.contains_key(champion)) {
            return true;
        }
        for table in [&self.synergy, &self.counter] {
            for champs in table.values() {
                if champs.contains_key(champion) {
                    return true;
                }
                if champs.values().any(|partners| partners.contains_key(champion)) {
                    return true;
                }
            }
        }
        false
    }

    /// Validates value ranges and digest consistency. Called on every load
    /// from a storage backend; freshly aggregated artifacts satisfy this by
    /// construction.
    ///
    /// # Errors
    /// Returns [`StorageError::CorruptArtifact`] naming the first violation.
    pub fn validate(&self) -> Result<(), StorageError> {
        for (role, champs) in &self.base {
            for (champ, p) in champs {
                if !(0.0..=1.0).contains(p) || !p.is_finite() {
                    return Err(StorageError::CorruptArtifact {
                        reason: format!("base rate {p} for {role}/{champ} outside [0, 1]"),
                    });
                }
            }
        }
        for (kind, table) in [("synergy", &self.synergy), ("counter", &self.counter)] {
            for (role, champs) in table {
                for (champ, partners) in champs {
                    for (partner, stat) in partners {
                        if !(-1.0..=1.0).contains(&stat.lift) || !stat.lift.is_finite() {
                            return Err(StorageError::CorruptArtifact {
                                reason: format!(
                                    "{kind} lift {} for {role}/{champ} vs {partner} outside [-1, 1]",
                                    stat.lift
                                ),
                            });
                        }
                        if stat.games == 0 {
                            return Err(StorageError::CorruptArtifact {
                                reason: format!(
                                    "{kind} pair {role}/{champ} vs {partner} has zero games"
                                ),
                            });
                        }
                        if champ == partner {
                            return Err(StorageError::CorruptArtifact {
                                reason: format!("{kind} pair {role}/{champ} partners itself"),
                            });
                        }
                    }
                }
            }
        }

        let digest = table_digest(&self.base, &self.synergy, &self.counter);
        if digest != self.manifest.digest {
            return Err(StorageError::CorruptArtifact {
                reason: "manifest digest does not match tables".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_artifact() -> Artifact {
        let mut mid = BTreeMap::new();
        mid.insert(ChampionId::from("Ahri"), 0.52);
        mid.insert(ChampionId::from("Zed"), 0.49);
        let mut base = BTreeMap::new();
        base.insert(RoleId::from("MID"), mid);

        let mut partners = BTreeMap::new();
        partners.insert(ChampionId::from("Jinx"), LiftStat { lift: 0.07, games: 100 });
        let mut champs = BTreeMap::new();
        champs.insert(ChampionId::from("Ahri"), partners);
        let mut synergy = BTreeMap::new();
        synergy.insert(RoleId::from("MID"), champs);

        let counter = PairTable::new();
        let digest = table_digest(&base, &synergy, &counter);
        Artifact {
            version: 1,
            built_at: Utc::now(),
            manifest: ArtifactManifest {
                record_count: 1000,
                champion_count: 2,
                smoothing: SmoothingConfig::default(),
                digest,
            },
            base,
            synergy,
            counter,
        }
    }

    #[test]
    fn tally_rejects_wins_over_games() {
        assert!(TallyStat::checked(5, 4).is_err());
        assert!(TallyStat::checked(4, 4).is_ok());
    }

    #[test]
    fn smoothed_zero_games_is_pure_prior() {
        let stat = TallyStat::default();
        let p = stat.smoothed(5.0, 5.0);
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lookups_hit_and_miss() {
        let artifact = tiny_artifact();
        let mid = RoleId::from("MID");
        assert_eq!(artifact.base_rate(&mid, &ChampionId::from("Ahri")), Some(0.52));
        assert_eq!(artifact.base_rate(&mid, &ChampionId::from("Nobody")), None);
        assert!(artifact
            .synergy_lift(&mid, &ChampionId::from("Ahri"), &ChampionId::from("Jinx"))
            .is_some());
        assert!(artifact
            .counter_lift(&mid, &ChampionId::from("Ahri"), &ChampionId::from("Zed"))
            .is_none());
    }

    #[test]
    fn knows_pair_partners_too() {
        let artifact = tiny_artifact();
        assert!(artifact.knows_champion(&ChampionId::from("Jinx")));
        assert!(!artifact.knows_champion(&ChampionId::from("Nobody")));
    }

    #[test]
    fn validate_accepts_consistent_artifact() {
        assert!(tiny_artifact().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_base() {
        let mut artifact = tiny_artifact();
        artifact
            .base
            .get_mut(&RoleId::from("MID"))
            .unwrap()
            .insert(ChampionId::from("Ahri"), 1.5);
        assert!(matches!(
            artifact.validate(),
            Err(StorageError::CorruptArtifact { .. })
        ));
    }

    #[test]
    fn validate_rejects_digest_mismatch() {
        let mut artifact = tiny_artifact();
        artifact.manifest.digest = "00".repeat(32);
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn digest_is_stable_across_clones() {
        let a = tiny_artifact();
        let b = a.clone();
        assert_eq!(
            table_digest(&a.base, &a.synergy, &a.counter),
            table_digest(&b.base, &b.synergy, &b.counter)
        );
    }
}
