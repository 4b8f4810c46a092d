use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use draftlift::{
    aggregate, recommend, CancelToken, ChampionId, DraftState, OutcomeDataset, OutcomeRecord,
    RoleId, ScoringConfig, SmoothingConfig,
};

/// Synthetic league: 150 champions over 5 roles with overlapping teams so
/// the pair tables are densely populated.
fn synthetic_dataset() -> OutcomeDataset {
    let roles = ["TOP", "JUNGLE", "MID", "ADC", "SUPPORT"];
    let mut records = Vec::new();
    for match_id in 0..4000u64 {
        let won = match_id % 2 == 0;
        for (slot, role) in roles.iter().enumerate() {
            let champ = (match_id * 7 + slot as u64 * 31) % 150;
            let allies: BTreeSet<ChampionId> = (0..5)
                .filter(|&other| other != slot)
                .map(|other| champion((match_id * 7 + other as u64 * 31) % 150))
                .collect();
            // Enemy ids live in a disjoint range so no record can list a
            // champion on both sides.
            let enemies: BTreeSet<ChampionId> = (0..5)
                .map(|other| champion(150 + (match_id * 11 + other as u64 * 37 + 3) % 150))
                .collect();
            records.push(OutcomeRecord {
                role: RoleId::from(*role),
                champion: champion(champ),
                allies,
                enemies,
                won,
            });
        }
    }
    OutcomeDataset::new(records)
}

fn champion(index: u64) -> ChampionId {
    ChampionId::new(format!("Champ{index:03}"))
}

fn bench_scoring(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let config = SmoothingConfig { min_pair_games: 2, ..SmoothingConfig::default() };
    let artifact = aggregate(&dataset, &config, 1, &CancelToken::new()).unwrap();
    let scoring = ScoringConfig::default();

    let mut draft = DraftState::for_role("MID");
    draft.allies = vec![champion(1), champion(2), champion(3), champion(4)];
    draft.enemies = vec![champion(160), champion(161), champion(162), champion(163)];
    draft.bans = [champion(20), champion(21)].into_iter().collect();

    c.bench_function("recommend_full_draft_top10", |b| {
        b.iter(|| recommend(black_box(&artifact), black_box(&draft), &scoring, 10));
    });

    let empty = DraftState::for_role("MID");
    c.bench_function("recommend_empty_draft_top10", |b| {
        b.iter(|| recommend(black_box(&artifact), black_box(&empty), &scoring, 10));
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let config = SmoothingConfig::default();
    c.bench_function("aggregate_20k_records", |b| {
        b.iter(|| aggregate(black_box(&dataset), &config, 1, &CancelToken::new()).unwrap());
    });
}

criterion_group!(benches, bench_scoring, bench_aggregation);
criterion_main!(benches);
