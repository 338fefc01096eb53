use crate::catalog::Catalog;
use crate::config::PriorityWeights;
use crate::error::{FfResult, FragForgeError};
use crate::model::{Fragment, FragmentPool, Roster};
use crate::optimizer::{
    CancelToken, Optimizer, ProgressCallback, SearchConstraints, SelectConstraints,
};
use crate::scorer::{AggregatedStats, Scorer};
use crate::snapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

/// One loaded snapshot plus its scoring state.
pub struct Session {
    pub capture_time: String,
    pub roster: Roster,
    pub pool: FragmentPool,
    pub scorer: Scorer,
}

/// The global state required to run FragForge services. Embedders hold one
/// of these; every service function below locks the session it needs.
pub struct FragForgeState {
    pub catalog: Arc<Catalog>,
    pub session: Mutex<Option<Session>>,
}

impl Default for FragForgeState {
    fn default() -> Self {
        Self {
            catalog: Arc::new(Catalog::builtin()),
            session: Mutex::new(None),
        }
    }
}

impl FragForgeState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            session: Mutex::new(None),
        }
    }
}

/// Owned, serializable mirror of one search result for callers that cannot
/// borrow into the pool.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RankedCombination {
    pub fragment_ids: [u64; 6],
    pub score: f64,
    pub stats: AggregatedStats,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OptimizeReport {
    pub results: Vec<RankedCombination>,
    pub examined: u64,
    pub total: u64,
    pub cancelled: bool,
}

/// Service: parse a snapshot and swap it in. A parse failure leaves any
/// previously loaded session untouched. Priority weights carry over.
pub fn load_snapshot(state: &FragForgeState, bytes: &[u8]) -> FfResult<String> {
    let parsed = snapshot::parse(bytes, &state.catalog)?;

    let mut guard = lock(state)?;
    let weights = guard
        .as_ref()
        .map(|s| s.scorer.weights.clone())
        .unwrap_or_default();

    let scorer = Scorer::new(state.catalog.clone(), weights);
    let mut pool = parsed.pool;
    scorer.rescore_pool(&mut pool);

    let summary = format!(
        "Loaded {} fragments and {} characters (captured {})",
        pool.len(),
        parsed.roster.characters.len(),
        parsed.capture_time
    );

    *guard = Some(Session {
        capture_time: parsed.capture_time,
        roster: parsed.roster,
        pool,
        scorer,
    });
    info!("{}", summary);
    Ok(summary)
}

/// Service: replace the priority weights and re-score the whole pool.
/// Must not be called while a search is running (the session lock enforces
/// this: a search holds the guard for its full duration).
pub fn set_priority_weights(state: &FragForgeState, map: &HashMap<String, u32>) -> FfResult<()> {
    let mut guard = lock(state)?;
    let session = guard
        .as_mut()
        .ok_or_else(|| FragForgeError::Validation("no snapshot loaded".to_string()))?;
    session.scorer.weights = PriorityWeights::from_map(map);
    let Session { scorer, pool, .. } = session;
    scorer.rescore_pool(pool);
    Ok(())
}

/// Service: filtered, ranked candidates for one slot. Returns owned copies.
pub fn select_candidates(
    state: &FragForgeState,
    slot: u8,
    target_character: &str,
    constraints: &SelectConstraints,
) -> FfResult<Vec<Fragment>> {
    let guard = lock(state)?;
    let session = guard
        .as_ref()
        .ok_or_else(|| FragForgeError::Validation("no snapshot loaded".to_string()))?;
    Ok(
        crate::optimizer::select(&session.pool, slot, target_character, constraints)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// Service: aggregate final stats for a character wearing the given pieces.
pub fn aggregate_stats(
    state: &FragForgeState,
    character_name: &str,
    fragment_ids: &[u64],
) -> FfResult<AggregatedStats> {
    let guard = lock(state)?;
    let session = guard
        .as_ref()
        .ok_or_else(|| FragForgeError::Validation("no snapshot loaded".to_string()))?;
    let character = session.roster.character(character_name).ok_or_else(|| {
        FragForgeError::Validation(format!("unknown character '{}'", character_name))
    })?;

    let mut gear = Vec::with_capacity(fragment_ids.len());
    for &id in fragment_ids {
        let fragment = session.pool.by_id(id).ok_or_else(|| {
            FragForgeError::Validation(format!("fragment {} not in the loaded pool", id))
        })?;
        gear.push(fragment);
    }

    Ok(session.scorer.aggregate(Some(character), &gear))
}

/// Service: run a full search for a character. Blocks until completion or
/// cancellation; intended to be called off the interactive thread.
pub fn optimize(
    state: &FragForgeState,
    character_name: &str,
    constraints: &SearchConstraints,
    progress: &dyn ProgressCallback,
    cancel: &CancelToken,
) -> FfResult<OptimizeReport> {
    let guard = lock(state)?;
    let session = guard
        .as_ref()
        .ok_or_else(|| FragForgeError::Validation("no snapshot loaded".to_string()))?;
    let character = session.roster.character(character_name).ok_or_else(|| {
        FragForgeError::Validation(format!("unknown character '{}'", character_name))
    })?;

    let optimizer = Optimizer::new(&session.scorer, &session.pool, character);
    let outcome = optimizer.run(constraints, progress, cancel);

    Ok(OptimizeReport {
        results: outcome
            .results
            .iter()
            .map(|c| RankedCombination {
                fragment_ids: c.pieces.map(|p| p.id),
                score: c.score,
                stats: c.stats,
            })
            .collect(),
        examined: outcome.examined,
        total: outcome.total,
        cancelled: outcome.cancelled,
    })
}

fn lock(state: &FragForgeState) -> FfResult<std::sync::MutexGuard<'_, Option<Session>>> {
    state
        .session
        .lock()
        .map_err(|e| FragForgeError::Validation(format!("session lock poisoned: {}", e)))
}
