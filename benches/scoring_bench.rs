use criterion::{criterion_group, criterion_main, Criterion};
use fragforge::catalog::Catalog;
use fragforge::config::PriorityWeights;
use fragforge::model::{CharacterInfo, Fragment, FragmentPool, RollKind, Stat, StatRoll};
use fragforge::optimizer::{CancelToken, Optimizer, SearchConstraints};
use fragforge::scorer::Scorer;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::sync::Arc;

const STAT_KEYS: &[&str] = &[
    "atk", "atk_pct", "def", "def_pct", "hp", "hp_pct", "crit_rate", "crit_dmg", "ego",
    "extra_dmg", "dot",
];

fn random_fragment(rng: &mut fastrand::Rng, id: u64, slot: u8) -> Fragment {
    let substats = (0..rng.u32(1..5))
        .map(|_| {
            let raw = STAT_KEYS[rng.usize(0..STAT_KEYS.len())];
            let rolls = rng.u32(1..4);
            let per_roll = rng.f64() * 5.0 + 1.0;
            Stat {
                name: raw.to_string(),
                raw_name: raw.to_string(),
                value: per_roll * rolls as f64,
                is_percentage: raw.ends_with("_pct"),
                is_main: false,
                roll_count: rolls,
                base_value: per_roll,
                rolls: (0..rolls)
                    .map(|i| StatRoll {
                        value: per_roll,
                        kind: if i == 0 {
                            RollKind::Initial
                        } else {
                            RollKind::Upgrade
                        },
                        hit_min: false,
                        hit_max: false,
                    })
                    .collect(),
            }
        })
        .collect();

    Fragment {
        id,
        slot,
        rarity: rng.u8(3..6),
        set_id: 101 + rng.u32(0..8),
        set_name: String::new(),
        level: 15,
        locked: false,
        wearer: None,
        main_stat: None,
        substats,
        gear_score: 0.0,
        priority_score: 0.0,
        potential: (0.0, 0.0),
    }
}

fn build_pool(per_slot: u64) -> FragmentPool {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut fragments = Vec::new();
    for slot in 1..=6u8 {
        for k in 0..per_slot {
            fragments.push(random_fragment(&mut rng, slot as u64 * 1000 + k, slot));
        }
    }
    FragmentPool { fragments }
}

fn character() -> CharacterInfo {
    CharacterInfo {
        name: "Sable".to_string(),
        resource_id: 1001,
        exp: 0,
        level: 60,
        max_level: 60,
        ascend: 5,
        limit_break: 0,
        friendship: 20,
        partner: None,
        potential_nodes: BTreeMap::new(),
    }
}

fn bench_rescore_pool(c: &mut Criterion) {
    let scorer = Scorer::new(Arc::new(Catalog::builtin()), PriorityWeights::default());
    let mut pool = build_pool(100);

    c.bench_function("rescore_pool_600", |b| {
        b.iter(|| scorer.rescore_pool(black_box(&mut pool)))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let scorer = Scorer::new(Arc::new(Catalog::builtin()), PriorityWeights::default());
    let mut pool = build_pool(1);
    scorer.rescore_pool(&mut pool);
    let ch = character();
    let gear: Vec<&Fragment> = pool.fragments.iter().collect();

    c.bench_function("aggregate_six_pieces", |b| {
        b.iter(|| scorer.aggregate(black_box(Some(&ch)), black_box(&gear)))
    });
}

fn bench_optimize(c: &mut Criterion) {
    let scorer = Scorer::new(Arc::new(Catalog::builtin()), PriorityWeights::default());
    let mut pool = build_pool(4);
    scorer.rescore_pool(&mut pool);
    let ch = character();
    let constraints = SearchConstraints::default();

    c.bench_function("optimize_4096_combinations", |b| {
        b.iter(|| {
            let optimizer = Optimizer::new(&scorer, &pool, &ch);
            optimizer.run(black_box(&constraints), &(), &CancelToken::new())
        })
    });
}

criterion_group!(benches, bench_rescore_pool, bench_aggregate, bench_optimize);
criterion_main!(benches);
