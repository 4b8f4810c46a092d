//! Offline aggregation of outcome records into a statistical artifact.
//!
//! [`aggregate`] is pure and deterministic: the same dataset, configuration,
//! and version always produce identical tables (and therefore an identical
//! manifest digest); only `built_at` differs between runs.
//!
//! Smoothing uses Beta-prior pseudo-counts so that low-sample champions
//! shrink toward 0.5 instead of their extreme observed ratios, and pairwise
//! lifts are clamped so that a single noisy pair cannot dominate scoring.
//! Pairs below the minimum sample count are omitted entirely: absence is the
//! "unknown" signal, distinct from a computed zero lift.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::artifact::{table_digest, Artifact, ArtifactManifest, LiftStat, TallyStat};
use crate::dataset::OutcomeDataset;
use crate::error::{AggregationError, LiftResult, ValidationError};
use crate::ids::{ChampionId, RoleId};

/// How often the cancellation token is polled, in records.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Beta-prior smoothing configuration for one aggregation run.
///
/// Role and pair priors are independent so sparse pair cells can be smoothed
/// harder than base rates; with the defaults they coincide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Alpha pseudo-wins for role base rates.
    pub role_alpha: f64,
    /// Beta pseudo-losses for role base rates.
    pub role_beta: f64,
    /// Alpha pseudo-wins for pair conditionals.
    pub pair_alpha: f64,
    /// Beta pseudo-losses for pair conditionals.
    pub pair_beta: f64,
    /// Symmetric clamp bound applied to every pairwise lift.
    pub lift_clamp: f64,
    /// Pairs observed in fewer games than this are omitted from the artifact.
    pub min_pair_games: u64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            role_alpha: 5.0,
            role_beta: 5.0,
            pair_alpha: 5.0,
            pair_beta: 5.0,
            lift_clamp: 0.15,
            min_pair_games: 20,
        }
    }
}

impl SmoothingConfig {
    /// Validates the configuration, returning it for chaining.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidSmoothing`] for non-positive
    /// priors or clamp, or a zero minimum sample count.
    pub fn validate(self) -> Result<Self, ValidationError> {
        for (name, value) in [
            ("role_alpha", self.role_alpha),
            ("role_beta", self.role_beta),
            ("pair_alpha", self.pair_alpha),
            ("pair_beta", self.pair_beta),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ValidationError::InvalidSmoothing {
                    reason: format!("{name} must be a positive finite number (got {value})"),
                });
            }
        }
        if !(self.lift_clamp > 0.0) || !self.lift_clamp.is_finite() {
            return Err(ValidationError::InvalidSmoothing {
                reason: format!("lift_clamp must be positive (got {})", self.lift_clamp),
            });
        }
        if self.min_pair_games == 0 {
            return Err(ValidationError::InvalidSmoothing {
                reason: "min_pair_games must be at least 1".to_string(),
            });
        }
        Ok(self)
    }

    /// The pure-prior probability a champion with zero games receives.
    #[must_use]
    pub fn prior_rate(&self) -> f64 {
        self.role_alpha / (self.role_alpha + self.role_beta)
    }
}

/// Cooperative cancellation handle for aggregation runs.
///
/// Cancellation is checked between record batches and table-building phases,
/// never mid-cell, so a cancelled run simply returns
/// [`AggregationError::Cancelled`] without publishing anything.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the run holding this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), AggregationError> {
        if self.is_cancelled() {
            Err(AggregationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

type RoleChampTallies = BTreeMap<RoleId, BTreeMap<ChampionId, TallyStat>>;
type PairTallies = BTreeMap<RoleId, BTreeMap<ChampionId, BTreeMap<ChampionId, TallyStat>>>;

/// Aggregates an outcome dataset into a versioned artifact.
///
/// An empty dataset yields an artifact with empty tables, not an error.
///
/// # Errors
/// - [`ValidationError::InvalidSmoothing`] for a bad configuration.
/// - [`AggregationError::DataIntegrity`] for malformed records; the whole
///   run is rejected.
/// - [`AggregationError::Cancelled`] if the token fires first.
pub fn aggregate(
    dataset: &OutcomeDataset,
    config: &SmoothingConfig,
    version: u64,
    cancel: &CancelToken,
) -> LiftResult<Artifact> {
    let config = config.clone().validate()?;

    let mut base_tallies: RoleChampTallies = BTreeMap::new();
    let mut synergy_tallies: PairTallies = BTreeMap::new();
    let mut counter_tallies: PairTallies = BTreeMap::new();

    for (index, record) in dataset.records().iter().enumerate() {
        if index % CANCEL_CHECK_INTERVAL == 0 {
            cancel.check()?;
        }
        record.check_integrity()?;

        base_tallies
            .entry(record.role.clone())
            .or_default()
            .entry(record.champion.clone())
            .or_default()
            .record(record.won);

        // One increment per distinct partner per record, from this record's
        // perspective. The symmetric perspective arrives via the partner's
        // own record, so no unordered occurrence is counted twice.
        let synergy_row = synergy_tallies
            .entry(record.role.clone())
            .or_default()
            .entry(record.champion.clone())
            .or_default();
        for ally in &record.allies {
            synergy_row.entry(ally.clone()).or_default().record(record.won);
        }

        let counter_row = counter_tallies
            .entry(record.role.clone())
            .or_default()
            .entry(record.champion.clone())
            .or_default();
        for enemy in &record.enemies {
            counter_row.entry(enemy.clone()).or_default().record(record.won);
        }
    }

    cancel.check()?;

    // Base table: Beta-smoothed win rates per (role, champion).
    let mut base = BTreeMap::new();
    for (role, champs) in &base_tallies {
        let mut row = BTreeMap::new();
        for (champ, tally) in champs {
            row.insert(champ.clone(), tally.smoothed(config.role_alpha, config.role_beta));
        }
        base.insert(role.clone(), row);
    }

    cancel.check()?;
    let synergy = build_lift_table(&synergy_tallies, &base, &config);
    cancel.check()?;
    let counter = build_lift_table(&counter_tallies, &base, &config);

    let champion_count = base
        .values()
        .flat_map(|champs| champs.keys())
        .collect::<std::collections::BTreeSet<_>>()
        .len() as u64;
    let digest = table_digest(&base, &synergy, &counter);

    Ok(Artifact {
        version,
        built_at: Utc::now(),
        manifest: ArtifactManifest {
            record_count: dataset.len() as u64,
            champion_count,
            smoothing: config,
            digest,
        },
        base,
        synergy,
        counter,
    })
}

/// Turns raw pair tallies into a clamped lift table, dropping cells below
/// the minimum sample count.
fn build_lift_table(
    tallies: &PairTallies,
    base: &crate::artifact::BaseTable,
    config: &SmoothingConfig,
) -> crate::artifact::PairTable {
    let mut table = BTreeMap::new();
    for (role, champs) in tallies {
        let mut role_row = BTreeMap::new();
        for (champ, partners) in champs {
            // A champion with pair tallies always has a base entry: both
            // come from the same records.
            let Some(base_rate) = base.get(role).and_then(|row| row.get(champ)).copied() else {
                continue;
            };
            let mut champ_row = BTreeMap::new();
            for (partner, tally) in partners {
                if tally.games < config.min_pair_games {
                    continue;
                }
                let conditional = tally.smoothed(config.pair_alpha, config.pair_beta);
                let lift = (conditional - base_rate).clamp(-config.lift_clamp, config.lift_clamp);
                champ_row.insert(partner.clone(), LiftStat { lift, games: tally.games });
            }
            if !champ_row.is_empty() {
                role_row.insert(champ.clone(), champ_row);
            }
        }
        if !role_row.is_empty() {
            table.insert(role.clone(), role_row);
        }
    }
    table
}
