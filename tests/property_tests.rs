use fragforge::catalog::Catalog;
use fragforge::config::PriorityWeights;
use fragforge::model::{Fragment, RollKind, Stat, StatRoll};
use fragforge::scorer::Scorer;
use fragforge::snapshot;
use proptest::prelude::*;
use std::sync::Arc;

const STAT_KEYS: &[&str] = &[
    "atk", "atk_pct", "def", "def_pct", "hp", "hp_pct", "crit_rate", "crit_dmg", "ego",
    "extra_dmg", "dot", "unknown_future_stat",
];

prop_compose! {
    fn arb_substat()(
        key_idx in 0..STAT_KEYS.len(),
        per_roll in 0.1..20.0f64,
        rolls in 1..5u32
    ) -> Stat {
        let raw = STAT_KEYS[key_idx];
        Stat {
            name: raw.to_string(),
            raw_name: raw.to_string(),
            value: per_roll * rolls as f64,
            is_percentage: false,
            is_main: false,
            roll_count: rolls,
            base_value: per_roll,
            rolls: (0..rolls).map(|i| StatRoll {
                value: per_roll,
                kind: if i == 0 { RollKind::Initial } else { RollKind::Upgrade },
                hit_min: false,
                hit_max: false,
            }).collect(),
        }
    }
}

prop_compose! {
    fn arb_fragment()(
        id in 1..100_000u64,
        slot in 1..=6u8,
        rarity in 1..=5u8,
        set_id in 100..110u32,
        substats in proptest::collection::vec(arb_substat(), 0..5)
    ) -> Fragment {
        Fragment {
            id,
            slot,
            rarity,
            set_id,
            set_name: String::new(),
            level: 0,
            locked: false,
            wearer: None,
            main_stat: None,
            substats,
            gear_score: 0.0,
            priority_score: 0.0,
            potential: (0.0, 0.0),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_score_invariants(mut fragment in arb_fragment()) {
        let scorer = Scorer::new(Arc::new(Catalog::builtin()), PriorityWeights::default());
        scorer.score_fragment(&mut fragment);

        prop_assert!(fragment.gear_score >= 0.0);
        prop_assert!(fragment.gear_score.is_finite());

        let (low, high) = fragment.potential;
        prop_assert!(low <= high, "potential low {} above high {}", low, high);

        // Below rare there is no upgrade headroom at all.
        if fragment.rarity < 3 {
            prop_assert_eq!(low, fragment.gear_score);
            prop_assert_eq!(high, fragment.gear_score);
        }
    }

    #[test]
    fn test_normalizer_roll_sums(
        rolls in proptest::collection::vec(
            (1..=4u8, 1..=3u8, 0..STAT_KEYS.len() - 1, 0.1..20.0f64),
            0..8
        )
    ) {
        let roll_json: Vec<String> = rolls.iter()
            .map(|(slot, kind, key_idx, value)| format!(
                r#"{{"slot": {}, "kind": {}, "stat": "{}", "value": {}}}"#,
                slot, kind, STAT_KEYS[*key_idx], value
            ))
            .collect();
        let doc = format!(
            r#"{{
                "capture_time": "t",
                "inventory": {{ "fragments": [
                    {{"id": 1, "resource_id": "1054101", "rolls": [{}]}}
                ] }},
                "characters": {{ "list": [] }}
            }}"#,
            roll_json.join(",")
        );

        let catalog = Catalog::builtin();
        let snap = snapshot::parse(doc.as_bytes(), &catalog).unwrap();
        prop_assert_eq!(snap.pool.len(), 1);

        for sub in &snap.pool.fragments[0].substats {
            let roll_sum: f64 = sub.rolls.iter().map(|r| r.value).sum();
            prop_assert!((sub.value - roll_sum).abs() < 1e-9);
            prop_assert_eq!(sub.roll_count as usize, sub.rolls.len());
            prop_assert!(!sub.rolls.is_empty());
        }
    }
}
