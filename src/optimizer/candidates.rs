use crate::catalog;
use crate::model::{Fragment, FragmentPool};

/// Per-slot candidate filter. `target` gear (pieces the searched character
/// already wears) is always eligible regardless of the equipped flag; the
/// explicit wearer exclude-list always wins.
#[derive(Debug, Clone)]
pub struct SelectConstraints {
    pub min_rarity: u8,
    pub include_other_equipped: bool,
    pub excluded_wearers: Vec<String>,
    pub allowed_sets: Option<Vec<u32>>,
    pub allowed_main_stats: Option<Vec<String>>,
    pub top_percent: u8,
    pub by_priority: bool,
}

impl Default for SelectConstraints {
    fn default() -> Self {
        Self {
            min_rarity: 1,
            include_other_equipped: true,
            excluded_wearers: Vec::new(),
            allowed_sets: None,
            allowed_main_stats: None,
            top_percent: 100,
            by_priority: false,
        }
    }
}

/// Filters and ranks one slot's fragments, descending by the selected score,
/// keeping the top ceil(N * pct / 100) candidates (at least one when any
/// survive the filters).
pub fn select<'a>(
    pool: &'a FragmentPool,
    slot: u8,
    target: &str,
    constraints: &SelectConstraints,
) -> Vec<&'a Fragment> {
    let mut candidates: Vec<&Fragment> = pool
        .fragments
        .iter()
        .filter(|f| f.slot == slot && f.rarity >= constraints.min_rarity)
        .filter(|f| wearer_allowed(f, target, constraints))
        .filter(|f| match &constraints.allowed_sets {
            Some(sets) => sets.contains(&f.set_id),
            None => true,
        })
        .filter(|f| main_stat_allowed(f, slot, constraints))
        .collect();

    let key = |f: &Fragment| {
        if constraints.by_priority {
            f.priority_score
        } else {
            f.gear_score
        }
    };
    candidates.sort_by(|a, b| key(b).total_cmp(&key(a)));

    if constraints.top_percent < 100 && !candidates.is_empty() {
        let keep = (candidates.len() * constraints.top_percent as usize).div_ceil(100);
        candidates.truncate(keep.max(1));
    }
    candidates
}

fn wearer_allowed(fragment: &Fragment, target: &str, constraints: &SelectConstraints) -> bool {
    match &fragment.wearer {
        None => true,
        Some(wearer) if wearer == target => true,
        Some(wearer) => {
            !constraints.excluded_wearers.iter().any(|w| w == wearer)
                && constraints.include_other_equipped
        }
    }
}

/// Main-stat filters only bind on slots where the main stat is selectable;
/// fixed-main slots pass through untouched.
fn main_stat_allowed(fragment: &Fragment, slot: u8, constraints: &SelectConstraints) -> bool {
    let Some(allowed) = &constraints.allowed_main_stats else {
        return true;
    };
    if !catalog::slot_has_selectable_main(slot) {
        return true;
    }
    match &fragment.main_stat {
        Some(main) => allowed
            .iter()
            .any(|name| *name == main.raw_name || *name == main.name),
        None => false,
    }
}
