use fragforge::api::{self, FragForgeState};
use fragforge::catalog::Catalog;
use fragforge::config::PriorityWeights;
use fragforge::optimizer::{CancelToken, NullProgress, SearchConstraints, SelectConstraints};
use std::collections::HashMap;

const SNAPSHOT: &str = r#"{
    "capture_time": "2026-08-01 21:14:03",
    "inventory": { "fragments": [
        {"id": 1, "resource_id": "1013101", "wearer_id": 1001, "rolls": [
            {"slot": 1, "kind": 1, "stat": "atk_pct", "value": 6.0}
        ]},
        {"id": 2, "resource_id": "1023101", "wearer_id": 1001, "rolls": [
            {"slot": 1, "kind": 1, "stat": "crit_rate", "value": 4.0}
        ]}
    ] },
    "characters": {
        "user": {"nickname": "tester", "level": 60},
        "list": [{"resource_id": 1001, "exp": 2500, "ascend": 5, "friendship": 5}]
    }
}"#;

#[test]
fn test_load_and_inspect_session() {
    let state = FragForgeState::default();
    let summary = api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();
    assert!(summary.contains("2 fragments"));

    let candidates = api::select_candidates(&state, 1, "Sable", &SelectConstraints::default())
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].gear_score, 10.0);
}

#[test]
fn test_failed_load_keeps_previous_session() {
    let state = FragForgeState::default();
    api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();

    assert!(api::load_snapshot(&state, b"{ definitely broken").is_err());

    // The earlier session is still intact and queryable.
    let candidates = api::select_candidates(&state, 1, "Sable", &SelectConstraints::default())
        .unwrap();
    assert_eq!(candidates.len(), 1);
}

#[test]
fn test_set_priority_weights_rescores_pool() {
    let state = FragForgeState::default();
    api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();

    let mut weights = HashMap::new();
    weights.insert("crit_rate".to_string(), 4u32);
    api::set_priority_weights(&state, &weights).unwrap();

    let constraints = SelectConstraints {
        by_priority: true,
        ..SelectConstraints::default()
    };
    let candidates = api::select_candidates(&state, 2, "Sable", &constraints).unwrap();
    assert_eq!(candidates.len(), 1);
    // crit_rate 4.0 / max 4.0 * weight 4 * 10
    assert_eq!(candidates[0].priority_score, 40.0);
}

#[test]
fn test_weights_survive_snapshot_reload() {
    let state = FragForgeState::default();
    api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();

    let mut weights = HashMap::new();
    weights.insert("atk_pct".to_string(), 2u32);
    api::set_priority_weights(&state, &weights).unwrap();

    api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();
    let candidates = api::select_candidates(&state, 1, "Sable", &SelectConstraints::default())
        .unwrap();
    assert_eq!(candidates[0].priority_score, 20.0);
}

#[test]
fn test_aggregate_stats_service() {
    let state = FragForgeState::default();
    api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();

    let stats = api::aggregate_stats(&state, "Sable", &[1, 2]).unwrap();
    // Sable base 620 ATK * (1 + 6%) + friendship 6.
    assert!((stats.atk - (620.0 * 1.06 + 6.0)).abs() < 1e-6);
    assert!((stats.crit_rate - 9.0).abs() < 1e-6);

    assert!(api::aggregate_stats(&state, "Nobody", &[1]).is_err());
    assert!(api::aggregate_stats(&state, "Sable", &[404]).is_err());
}

#[test]
fn test_optimize_with_starved_slots_is_empty_not_error() {
    // Two equipped pieces covering slots 1-2 only: the 6-slot product is
    // empty, which is a result, not a failure.
    let state = FragForgeState::default();
    api::load_snapshot(&state, SNAPSHOT.as_bytes()).unwrap();

    let report = api::optimize(
        &state,
        "Sable",
        &SearchConstraints::default(),
        &NullProgress,
        &CancelToken::new(),
    )
    .unwrap();
    assert!(report.results.is_empty());
    assert_eq!(report.total, 0);
    assert!(!report.cancelled);

    assert!(api::optimize(
        &state,
        "Nobody",
        &SearchConstraints::default(),
        &NullProgress,
        &CancelToken::new()
    )
    .is_err());
}

#[test]
fn test_weight_profile_round_trip() {
    let mut weights = PriorityWeights::default();
    weights.weight_crit_rate = 3;
    weights.weight_atk_pct = 1;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    std::fs::write(&path, serde_json::to_string(&weights).unwrap()).unwrap();

    let loaded = PriorityWeights::load_from_file(&path).unwrap();
    assert_eq!(loaded, weights);

    // Partial profiles fill the rest with zero defaults.
    std::fs::write(&path, r#"{"weight_hp": 7}"#).unwrap();
    let partial = PriorityWeights::load_from_file(&path).unwrap();
    assert_eq!(partial.weight_hp, 7);
    assert_eq!(partial.weight_atk, 0);
}

#[test]
fn test_catalog_override_replaces_only_present_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{
            "sets": [{
                "id": 500, "name": "Test Harness", "pieces": 2,
                "bonus": {"type": "stat", "stat": "atk_pct", "value": 9.0}
            }]
        }"#,
    )
    .unwrap();

    let catalog = Catalog::load_from_file(&path).unwrap();
    // Overridden section replaced wholesale...
    assert_eq!(catalog.resolve_set(500).name, "Test Harness");
    assert_eq!(catalog.resolve_set(101).name, "Unknown Set #101");
    // ...untouched sections keep the builtin tables.
    assert_eq!(catalog.resolve_character(1001).name, "Sable");
    assert!(catalog.stat("crit_rate").is_some());
}
