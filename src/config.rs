use crate::error::FfResult;
use clap::parser::ValueSource;
use clap::{ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: PriorityWeights,
}

#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Ranked combinations to keep.
    #[arg(long, default_value_t = 20)]
    pub max_results: usize,

    /// Keep only the top N% of each slot's candidate pool.
    #[arg(long, default_value_t = 100)]
    pub top_percent: u8,

    /// Minimum rarity shown in inspect output (the search floor is at least 3).
    #[arg(long, default_value_t = 1)]
    pub min_rarity: u8,

    /// Skip fragments currently equipped to other characters.
    #[arg(long, default_value_t = false)]
    pub exclude_equipped: bool,

    /// Characters whose gear is never considered, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub exclude_wearer: Vec<String>,

    /// Restrict candidates to these set ids, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub allow_set: Vec<u32>,

    /// Required 4-piece sets; a combination must complete at least one.
    #[arg(long, value_delimiter = ',')]
    pub four_set: Vec<u32>,

    /// Required 2-piece sets; a combination must complete every one.
    #[arg(long, value_delimiter = ',')]
    pub two_set: Vec<u32>,

    /// Allowed main stats for slot 4, comma separated raw keys.
    #[arg(long, value_delimiter = ',')]
    pub main_stat_4: Vec<String>,

    /// Allowed main stats for slot 5.
    #[arg(long, value_delimiter = ',')]
    pub main_stat_5: Vec<String>,

    /// Allowed main stats for slot 6.
    #[arg(long, value_delimiter = ',')]
    pub main_stat_6: Vec<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_results: 20,
            top_percent: 100,
            min_rarity: 1,
            exclude_equipped: false,
            exclude_wearer: Vec::new(),
            allow_set: Vec::new(),
            four_set: Vec::new(),
            two_set: Vec::new(),
            main_stat_4: Vec::new(),
            main_stat_5: Vec::new(),
            main_stat_6: Vec::new(),
        }
    }
}

/// Per-stat integer priority weights. All zero means ranking falls back to
/// the preference-free gear score.
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PriorityWeights {
    #[arg(long, default_value_t = 0)]
    pub weight_atk: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_atk_pct: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_def: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_def_pct: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_hp: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_hp_pct: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_crit_rate: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_crit_dmg: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_ego: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_extra_dmg: u32,
    #[arg(long, default_value_t = 0)]
    pub weight_dot: u32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            weight_atk: 0,
            weight_atk_pct: 0,
            weight_def: 0,
            weight_def_pct: 0,
            weight_hp: 0,
            weight_hp_pct: 0,
            weight_crit_rate: 0,
            weight_crit_dmg: 0,
            weight_ego: 0,
            weight_extra_dmg: 0,
            weight_dot: 0,
        }
    }
}

impl PriorityWeights {
    /// Weight for a raw stat key. Unlisted keys weigh zero.
    pub fn get(&self, raw_key: &str) -> u32 {
        match raw_key {
            "atk" => self.weight_atk,
            "atk_pct" => self.weight_atk_pct,
            "def" => self.weight_def,
            "def_pct" => self.weight_def_pct,
            "hp" => self.weight_hp,
            "hp_pct" => self.weight_hp_pct,
            "crit_rate" => self.weight_crit_rate,
            "crit_dmg" => self.weight_crit_dmg,
            "ego" => self.weight_ego,
            "extra_dmg" => self.weight_extra_dmg,
            "dot" => self.weight_dot,
            _ => 0,
        }
    }

    pub fn any_nonzero(&self) -> bool {
        self.weight_atk > 0
            || self.weight_atk_pct > 0
            || self.weight_def > 0
            || self.weight_def_pct > 0
            || self.weight_hp > 0
            || self.weight_hp_pct > 0
            || self.weight_crit_rate > 0
            || self.weight_crit_dmg > 0
            || self.weight_ego > 0
            || self.weight_extra_dmg > 0
            || self.weight_dot > 0
    }

    pub fn from_map(map: &HashMap<String, u32>) -> Self {
        let mut w = Self::default();
        for (key, &value) in map {
            w.set(key, value);
        }
        w
    }

    pub fn set(&mut self, raw_key: &str, value: u32) {
        match raw_key {
            "atk" => self.weight_atk = value,
            "atk_pct" => self.weight_atk_pct = value,
            "def" => self.weight_def = value,
            "def_pct" => self.weight_def_pct = value,
            "hp" => self.weight_hp = value,
            "hp_pct" => self.weight_hp_pct = value,
            "crit_rate" => self.weight_crit_rate = value,
            "crit_dmg" => self.weight_crit_dmg = value,
            "ego" => self.weight_ego = value,
            "extra_dmg" => self.weight_extra_dmg = value,
            "dot" => self.weight_dot = value,
            _ => {}
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overlay explicit CLI flags onto file-loaded weights. Only arguments
    /// the user actually typed win over the file values.
    pub fn merge_from_cli(&mut self, cli_weights: &PriorityWeights, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_weights.$field;
                }
            };
        }

        update_if_present!(weight_atk, "weight_atk");
        update_if_present!(weight_atk_pct, "weight_atk_pct");
        update_if_present!(weight_def, "weight_def");
        update_if_present!(weight_def_pct, "weight_def_pct");
        update_if_present!(weight_hp, "weight_hp");
        update_if_present!(weight_hp_pct, "weight_hp_pct");
        update_if_present!(weight_crit_rate, "weight_crit_rate");
        update_if_present!(weight_crit_dmg, "weight_crit_dmg");
        update_if_present!(weight_ego, "weight_ego");
        update_if_present!(weight_extra_dmg, "weight_extra_dmg");
        update_if_present!(weight_dot, "weight_dot");
    }
}
