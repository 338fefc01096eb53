use crate::catalog::{self, Catalog};
use crate::config::PriorityWeights;
use crate::model::Fragment;

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Computes gear score, priority score and the potential range for one
/// fragment, writing them into its derived fields.
///
/// Gear score: each substat normalized against (max single roll x rolls
/// merged), summed, scaled by 10. A stat the catalog has no roll data for
/// contributes zero rather than dividing by zero.
pub fn score_fragment(catalog: &Catalog, weights: &PriorityWeights, fragment: &mut Fragment) {
    let mut gear = 0.0;
    let mut priority = 0.0;

    for sub in &fragment.substats {
        let max_roll = catalog.stat(&sub.raw_name).map(|r| r.max_roll).unwrap_or(0.0);
        if max_roll <= 0.0 || sub.roll_count == 0 {
            continue;
        }
        let normalized = sub.value / (max_roll * sub.roll_count as f64);
        gear += normalized;
        priority += normalized * weights.get(&sub.raw_name) as f64;
    }

    fragment.gear_score = round1(gear * 10.0);
    fragment.priority_score = round1(priority * 10.0);
    fragment.potential = potential_range(catalog, fragment);
}

/// Projected [low, high] gear score once the remaining upgrade rolls are
/// spent. The low bound assumes every remaining roll lands the single worst
/// min/max ratio among the current substats; a coarse floor, kept for
/// compatibility with the values users already see.
fn potential_range(catalog: &Catalog, fragment: &Fragment) -> (f64, f64) {
    let gear = fragment.gear_score;

    // Below rare there are no upgrade rolls to spend.
    if fragment.rarity < 3 {
        return (gear, gear);
    }

    let spent: u32 = fragment
        .substats
        .iter()
        .map(|s| s.roll_count.saturating_sub(1))
        .sum();
    let remaining = catalog::upgrades_for_rarity(fragment.rarity).saturating_sub(spent);
    if remaining == 0 || fragment.substats.is_empty() {
        return (gear, gear);
    }

    let worst_ratio = fragment
        .substats
        .iter()
        .filter_map(|s| {
            let record = catalog.stat(&s.raw_name)?;
            if record.max_roll > 0.0 {
                Some(record.min_roll / record.max_roll)
            } else {
                None
            }
        })
        .fold(f64::MAX, f64::min);
    let worst_ratio = if worst_ratio == f64::MAX { 0.0 } else { worst_ratio };

    let low = round1(gear + remaining as f64 * worst_ratio * 10.0);
    let high = round1(gear + remaining as f64 * 10.0);
    (low, high)
}
