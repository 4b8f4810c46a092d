//! Concurrency contract: many readers, rare writers, never a torn read.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use draftlift::{
    recommend, CancelToken, ChampionId, DraftEngine, DraftState, MemoryArtifactStore,
    ModelRegistry, OutcomeDataset, OutcomeRecord, Recommendation, RoleId, ScoringConfig,
    SmoothingConfig,
};

fn dataset(wins_per_champ: &[(&str, usize)]) -> OutcomeDataset {
    let mut records = Vec::new();
    for &(champ, wins) in wins_per_champ {
        for i in 0..100 {
            records.push(OutcomeRecord {
                role: RoleId::from("MID"),
                champion: ChampionId::from(champ),
                allies: BTreeSet::new(),
                enemies: BTreeSet::new(),
                won: i < wins,
            });
        }
    }
    OutcomeDataset::new(records)
}

fn build_two_version_registry() -> Arc<ModelRegistry> {
    let registry = Arc::new(ModelRegistry::new(Arc::new(MemoryArtifactStore::new())));
    let engine = DraftEngine::new(Arc::clone(&registry));
    // Version 1 and version 2 rank the champions in opposite orders.
    engine
        .rebuild(
            &dataset(&[("Ahri", 60), ("Zed", 40)]),
            &SmoothingConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();
    engine
        .rebuild(
            &dataset(&[("Ahri", 40), ("Zed", 60)]),
            &SmoothingConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();
    registry.activate(1).unwrap();
    registry
}

fn expected_for_version(registry: &ModelRegistry, version: u64) -> Vec<Recommendation> {
    let artifact = registry.store().get(version).unwrap();
    recommend(
        &artifact,
        &DraftState::for_role("MID"),
        &ScoringConfig::default(),
        10,
    )
}

#[test]
fn in_flight_reads_see_exactly_one_version() {
    let registry = build_two_version_registry();
    let engine = DraftEngine::new(Arc::clone(&registry));

    let expected_v1 = expected_for_version(&registry, 1);
    let expected_v2 = expected_for_version(&registry, 2);
    assert_ne!(expected_v1, expected_v2);

    let stop = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::new();
    for _ in 0..100 {
        let engine = engine.clone();
        let stop = Arc::clone(&stop);
        let expected_v1 = expected_v1.clone();
        let expected_v2 = expected_v2.clone();
        handles.push(thread::spawn(move || {
            let mut saw_v2 = false;
            while !stop.load(Ordering::Relaxed) {
                let ranked = engine
                    .recommend_draft(&DraftState::for_role("MID"), 10)
                    .unwrap();
                // Every response matches one version's output exactly;
                // a mixed-version score would match neither.
                if ranked == expected_v1 {
                    assert!(!saw_v2, "went back to v1 after observing v2");
                } else if ranked == expected_v2 {
                    saw_v2 = true;
                } else {
                    panic!("response matched neither version");
                }
            }
        }));
    }

    // Let readers get in flight, then swap.
    thread::sleep(std::time::Duration::from_millis(20));
    registry.activate(2).unwrap();
    thread::sleep(std::time::Duration::from_millis(20));
    stop.store(true, Ordering::Relaxed);

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.active_version(), Some(2));
}

#[test]
fn a_held_reference_outlives_the_swap() {
    let registry = build_two_version_registry();
    let held = registry.current().unwrap();
    assert_eq!(held.version, 1);

    registry.activate(2).unwrap();

    // The in-flight reference still scores as version 1.
    let ranked = recommend(
        &held,
        &DraftState::for_role("MID"),
        &ScoringConfig::default(),
        10,
    );
    assert_eq!(ranked, expected_for_version(&registry, 1));
}

#[test]
fn concurrent_refreshes_settle_on_the_latest_version() {
    let registry = build_two_version_registry();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                registry.refresh().unwrap();
                let current = registry.current().unwrap();
                assert!(current.version == 1 || current.version == 2);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.active_version(), Some(2));
}
