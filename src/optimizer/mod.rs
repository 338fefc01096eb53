pub mod candidates;

pub use self::candidates::{select, SelectConstraints};

use crate::config::SearchParams;
use crate::model::{CharacterInfo, Fragment, FragmentPool};
use crate::scorer::{AggregatedStats, Scorer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Enumerated combinations between progress reports.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// The result buffer is sorted and cut back to the requested limit whenever
/// it grows past this multiple of it, bounding memory on huge products.
pub const BUFFER_FACTOR: usize = 10;

/// The search never considers fragments below rare regardless of the
/// display floor.
pub const SEARCH_RARITY_FLOOR: u8 = 3;

/// Cooperative cancellation flag, polled once per enumerated combination.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub examined: u64,
    pub total: u64,
    pub buffered: usize,
}

/// Receives periodic updates during a search. Implementations must return
/// quickly; the search thread calls this inline and reports may simply be
/// dropped by slow consumers.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, update: &ProgressUpdate);
}

/// For searches nobody watches.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

/// Adapter so a plain closure can receive updates.
pub struct FnProgress<F: Fn(&ProgressUpdate) + Send + Sync>(pub F);

impl<F: Fn(&ProgressUpdate) + Send + Sync> ProgressCallback for FnProgress<F> {
    fn on_progress(&self, update: &ProgressUpdate) {
        (self.0)(update)
    }
}

#[derive(Debug, Clone)]
pub struct SearchConstraints {
    pub min_rarity: u8,
    pub include_other_equipped: bool,
    pub excluded_wearers: Vec<String>,
    pub allowed_sets: Option<Vec<u32>>,
    /// Slot number -> allowed main stat names (selectable-main slots only).
    pub main_stat_filters: HashMap<u8, Vec<String>>,
    pub top_percent: u8,
    /// A combination must complete at least one of these as a 4-piece set.
    pub four_piece_sets: Vec<u32>,
    /// A combination must complete every one of these as a 2-piece set.
    pub two_piece_sets: Vec<u32>,
    pub max_results: usize,
}

impl Default for SearchConstraints {
    fn default() -> Self {
        Self {
            min_rarity: 1,
            include_other_equipped: true,
            excluded_wearers: Vec::new(),
            allowed_sets: None,
            main_stat_filters: HashMap::new(),
            top_percent: 100,
            four_piece_sets: Vec::new(),
            two_piece_sets: Vec::new(),
            max_results: 20,
        }
    }
}

impl From<&SearchParams> for SearchConstraints {
    fn from(params: &SearchParams) -> Self {
        let mut main_stat_filters = HashMap::new();
        for (slot, filter) in [
            (4u8, &params.main_stat_4),
            (5u8, &params.main_stat_5),
            (6u8, &params.main_stat_6),
        ] {
            if !filter.is_empty() {
                main_stat_filters.insert(slot, filter.clone());
            }
        }

        Self {
            min_rarity: params.min_rarity,
            include_other_equipped: !params.exclude_equipped,
            excluded_wearers: params.exclude_wearer.clone(),
            allowed_sets: if params.allow_set.is_empty() {
                None
            } else {
                Some(params.allow_set.clone())
            },
            main_stat_filters,
            top_percent: params.top_percent,
            four_piece_sets: params.four_set.clone(),
            two_piece_sets: params.two_set.clone(),
            max_results: params.max_results,
        }
    }
}

/// One scored 6-piece loadout. Borrows its pieces from the pool.
pub struct Combination<'a> {
    pub pieces: [&'a Fragment; 6],
    pub score: f64,
    pub stats: AggregatedStats,
}

pub struct SearchOutcome<'a> {
    pub results: Vec<Combination<'a>>,
    pub examined: u64,
    pub total: u64,
    pub cancelled: bool,
}

impl SearchOutcome<'_> {
    fn empty() -> Self {
        SearchOutcome {
            results: Vec::new(),
            examined: 0,
            total: 0,
            cancelled: false,
        }
    }
}

/// Exhaustive constrained search over the cartesian product of six per-slot
/// candidate pools. Strictly sequential; determinism of tie-breaking in
/// truncation depends on the fixed enumeration order.
pub struct Optimizer<'a> {
    scorer: &'a Scorer,
    pool: &'a FragmentPool,
    character: &'a CharacterInfo,
}

impl<'a> Optimizer<'a> {
    pub fn new(scorer: &'a Scorer, pool: &'a FragmentPool, character: &'a CharacterInfo) -> Self {
        Self {
            scorer,
            pool,
            character,
        }
    }

    pub fn run(
        &self,
        constraints: &SearchConstraints,
        progress: &dyn ProgressCallback,
        cancel: &CancelToken,
    ) -> SearchOutcome<'a> {
        let by_priority = self.scorer.weights.any_nonzero();

        let mut pools: [Vec<&Fragment>; 6] = Default::default();
        for slot in 1..=6u8 {
            let slot_constraints = SelectConstraints {
                min_rarity: constraints.min_rarity.max(SEARCH_RARITY_FLOOR),
                include_other_equipped: constraints.include_other_equipped,
                excluded_wearers: constraints.excluded_wearers.clone(),
                allowed_sets: constraints.allowed_sets.clone(),
                allowed_main_stats: constraints.main_stat_filters.get(&slot).cloned(),
                top_percent: constraints.top_percent,
                by_priority,
            };
            let candidates = select(self.pool, slot, &self.character.name, &slot_constraints);
            if candidates.is_empty() {
                // Starved slot: nothing can cover all six, so there is
                // nothing to search. Not an error.
                info!("Slot {} has no candidates, returning empty result", slot);
                return SearchOutcome::empty();
            }
            pools[(slot - 1) as usize] = candidates;
        }

        let total: u64 = pools.iter().map(|p| p.len() as u64).product();
        debug!(
            "Searching {} combinations for {} (priority ranking: {})",
            total, self.character.name, by_priority
        );

        let limit = constraints.max_results.max(1);
        let cap = limit * BUFFER_FACTOR;
        let mut buffer: Vec<Combination<'a>> = Vec::new();
        let mut examined: u64 = 0;
        let mut cancelled = false;

        'search: for &p1 in &pools[0] {
            for &p2 in &pools[1] {
                for &p3 in &pools[2] {
                    for &p4 in &pools[3] {
                        for &p5 in &pools[4] {
                            for &p6 in &pools[5] {
                                if cancel.is_cancelled() {
                                    cancelled = true;
                                    break 'search;
                                }
                                examined += 1;
                                if examined % PROGRESS_INTERVAL == 0 {
                                    progress.on_progress(&ProgressUpdate {
                                        examined,
                                        total,
                                        buffered: buffer.len(),
                                    });
                                }

                                let pieces = [p1, p2, p3, p4, p5, p6];
                                if has_duplicate_identity(&pieces) {
                                    continue;
                                }
                                if !set_requirements_hold(
                                    &pieces,
                                    &constraints.four_piece_sets,
                                    &constraints.two_piece_sets,
                                ) {
                                    continue;
                                }

                                let score: f64 = pieces
                                    .iter()
                                    .map(|p| {
                                        if by_priority {
                                            p.priority_score
                                        } else {
                                            p.gear_score
                                        }
                                    })
                                    .sum();
                                let stats = self.scorer.aggregate(Some(self.character), &pieces);

                                buffer.push(Combination {
                                    pieces,
                                    score,
                                    stats,
                                });
                                if buffer.len() > cap {
                                    buffer.sort_by(|a, b| b.score.total_cmp(&a.score));
                                    buffer.truncate(limit);
                                }
                            }
                        }
                    }
                }
            }
        }

        buffer.sort_by(|a, b| b.score.total_cmp(&a.score));
        buffer.truncate(limit);

        info!(
            "Search {} after {}/{} combinations, {} results",
            if cancelled { "cancelled" } else { "complete" },
            examined,
            total,
            buffer.len()
        );

        SearchOutcome {
            results: buffer,
            examined,
            total,
            cancelled,
        }
    }
}

/// A physical item cannot occupy two slots at once.
fn has_duplicate_identity(pieces: &[&Fragment; 6]) -> bool {
    for i in 0..pieces.len() {
        for j in (i + 1)..pieces.len() {
            if pieces[i].id == pieces[j].id {
                return true;
            }
        }
    }
    false
}

/// 4-piece requirements are OR'd (any one suffices); 2-piece requirements
/// are AND'd (all must hold).
fn set_requirements_hold(pieces: &[&Fragment; 6], four: &[u32], two: &[u32]) -> bool {
    if !four.is_empty() {
        let any_four = four
            .iter()
            .any(|&set_id| pieces.iter().filter(|p| p.set_id == set_id).count() >= 4);
        if !any_four {
            return false;
        }
    }
    two.iter()
        .all(|&set_id| pieces.iter().filter(|p| p.set_id == set_id).count() >= 2)
}
