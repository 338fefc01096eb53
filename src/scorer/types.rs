use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final derived combat stats for one character + 6-piece loadout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub atk: f64,
    pub def: f64,
    pub hp: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub ego: f64,
    pub extra_dmg: f64,
    pub dot: f64,

    // Display heuristics, not verified combat math. The formulas are fixed
    // for compatibility with what players already compare against.
    pub effective_hp: f64,
    pub avg_dmg: f64,
    pub max_crit_dmg: f64,
    pub sustain: f64,
}

impl AggregatedStats {
    /// Map-shaped view for callers that want named values.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("atk", self.atk),
            ("def", self.def),
            ("hp", self.hp),
            ("crit_rate", self.crit_rate),
            ("crit_dmg", self.crit_dmg),
            ("ego", self.ego),
            ("extra_dmg", self.extra_dmg),
            ("dot", self.dot),
            ("effective_hp", self.effective_hp),
            ("avg_dmg", self.avg_dmg),
            ("max_crit_dmg", self.max_crit_dmg),
            ("sustain", self.sustain),
        ])
    }
}
