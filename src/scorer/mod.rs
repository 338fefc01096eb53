pub mod aggregate;
pub mod engine;
pub mod types;

pub use self::types::AggregatedStats;

use crate::catalog::Catalog;
use crate::config::PriorityWeights;
use crate::model::{CharacterInfo, Fragment, FragmentPool};
use rayon::prelude::*;
use std::sync::Arc;

/// Scoring facade: holds the reference catalog and the active priority
/// weights. Weights are explicit state here, never process-global; swapping
/// them means building a new Scorer (or mutating this one) and re-scoring
/// the pool.
pub struct Scorer {
    pub weights: PriorityWeights,
    pub catalog: Arc<Catalog>,
}

impl Scorer {
    pub fn new(catalog: Arc<Catalog>, weights: PriorityWeights) -> Self {
        Self { weights, catalog }
    }

    /// Fills the three derived score fields of one fragment.
    pub fn score_fragment(&self, fragment: &mut Fragment) {
        engine::score_fragment(&self.catalog, &self.weights, fragment);
    }

    /// Recomputes every fragment's derived scores. Called once after load
    /// and again whenever the priority weights change.
    pub fn rescore_pool(&self, pool: &mut FragmentPool) {
        pool.fragments
            .par_iter_mut()
            .for_each(|fragment| engine::score_fragment(&self.catalog, &self.weights, fragment));
    }

    /// Final derived combat stats for a character wearing this gear.
    /// Pure function of its arguments.
    pub fn aggregate(
        &self,
        character: Option<&CharacterInfo>,
        gear: &[&Fragment],
    ) -> AggregatedStats {
        aggregate::aggregate(&self.catalog, character, gear)
    }
}
