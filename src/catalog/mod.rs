mod tables;

use crate::error::FfResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatRecord {
    pub raw_name: String,
    pub display_name: String,
    pub is_percentage: bool,
    pub min_roll: f64,
    pub max_roll: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CharacterRecord {
    pub id: u32,
    pub name: String,
    pub base_atk: f64,
    pub base_def: f64,
    pub base_hp: f64,
    pub base_crit_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PartnerPassive {
    pub tier: u8,
    pub stat: String,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PartnerRecord {
    pub id: u32,
    pub name: String,
    pub base: (f64, f64, f64),
    pub growth: (f64, f64, f64),
    #[serde(default)]
    pub passives: Vec<PartnerPassive>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetBonus {
    /// Flat stat bonus applied by the aggregator when the set completes.
    Stat { stat: String, value: f64 },
    /// Combat-trigger effect; display only, never modeled numerically.
    Conditional { effect: String },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetRecord {
    pub id: u32,
    pub name: String,
    pub pieces: u8,
    pub bonus: SetBonus,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PotentialRecord {
    pub character_id: u32,
    pub node: u8,
    pub stat: String,
    pub per_level: [f64; 5],
}

/// Optional JSON override document. Sections that are absent keep the
/// builtin tables.
#[derive(Deserialize, Default)]
struct CatalogFile {
    stats: Option<Vec<StatRecord>>,
    characters: Option<Vec<CharacterRecord>>,
    partners: Option<Vec<PartnerRecord>>,
    sets: Option<Vec<SetRecord>>,
    potentials: Option<Vec<PotentialRecord>>,
}

/// Static reference data: stat roll ranges, character/partner/set records,
/// potential nodes. All lookups degrade to documented placeholders rather
/// than failing; the game API routinely ships ids we have no data for.
pub struct Catalog {
    stats: HashMap<String, StatRecord>,
    characters: HashMap<u32, CharacterRecord>,
    partners: HashMap<u32, PartnerRecord>,
    sets: HashMap<u32, SetRecord>,
    potentials: HashMap<(u32, u8), PotentialRecord>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let stats = tables::STATS
            .iter()
            .map(|&(raw, display, pct, min, max)| {
                (
                    raw.to_string(),
                    StatRecord {
                        raw_name: raw.to_string(),
                        display_name: display.to_string(),
                        is_percentage: pct,
                        min_roll: min,
                        max_roll: max,
                    },
                )
            })
            .collect();

        let characters = tables::CHARACTERS
            .iter()
            .map(|&(id, name, atk, def, hp, crit)| {
                (
                    id,
                    CharacterRecord {
                        id,
                        name: name.to_string(),
                        base_atk: atk,
                        base_def: def,
                        base_hp: hp,
                        base_crit_rate: crit,
                    },
                )
            })
            .collect();

        let mut partners: HashMap<u32, PartnerRecord> = tables::PARTNERS
            .iter()
            .map(|&(id, name, base, growth)| {
                (
                    id,
                    PartnerRecord {
                        id,
                        name: name.to_string(),
                        base,
                        growth,
                        passives: Vec::new(),
                    },
                )
            })
            .collect();
        for &(id, tier, stat, value) in tables::PARTNER_PASSIVES {
            if let Some(p) = partners.get_mut(&id) {
                p.passives.push(PartnerPassive {
                    tier,
                    stat: stat.to_string(),
                    value,
                });
            }
        }

        let sets = tables::SETS
            .iter()
            .map(|&(id, name, pieces, stat, value, effect)| {
                let bonus = if stat.is_empty() {
                    SetBonus::Conditional {
                        effect: effect.to_string(),
                    }
                } else {
                    SetBonus::Stat {
                        stat: stat.to_string(),
                        value,
                    }
                };
                (
                    id,
                    SetRecord {
                        id,
                        name: name.to_string(),
                        pieces,
                        bonus,
                    },
                )
            })
            .collect();

        let potentials = tables::POTENTIALS
            .iter()
            .map(|&(character_id, node, stat, per_level)| {
                (
                    (character_id, node),
                    PotentialRecord {
                        character_id,
                        node,
                        stat: stat.to_string(),
                        per_level,
                    },
                )
            })
            .collect();

        Self {
            stats,
            characters,
            partners,
            sets,
            potentials,
        }
    }

    /// Builtin tables with any sections present in the JSON file replacing
    /// their builtin counterpart wholesale.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FfResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        let mut catalog = Self::builtin();

        if let Some(stats) = file.stats {
            catalog.stats = stats.into_iter().map(|r| (r.raw_name.clone(), r)).collect();
        }
        if let Some(chars) = file.characters {
            catalog.characters = chars.into_iter().map(|r| (r.id, r)).collect();
        }
        if let Some(partners) = file.partners {
            catalog.partners = partners.into_iter().map(|r| (r.id, r)).collect();
        }
        if let Some(sets) = file.sets {
            catalog.sets = sets.into_iter().map(|r| (r.id, r)).collect();
        }
        if let Some(pots) = file.potentials {
            catalog.potentials = pots
                .into_iter()
                .map(|r| ((r.character_id, r.node), r))
                .collect();
        }

        info!(
            "Catalog loaded: {} stats, {} characters, {} partners, {} sets",
            catalog.stats.len(),
            catalog.characters.len(),
            catalog.partners.len(),
            catalog.sets.len()
        );
        Ok(catalog)
    }

    // --- Typed lookups ---

    pub fn stat(&self, raw_key: &str) -> Option<&StatRecord> {
        self.stats.get(raw_key)
    }

    /// Placeholder on miss: the raw key becomes the display name and both
    /// roll bounds are zero, which the scorer treats as a zero contribution.
    pub fn resolve_stat(&self, raw_key: &str) -> StatRecord {
        self.stats.get(raw_key).cloned().unwrap_or_else(|| {
            debug!("Unknown stat key '{}', using placeholder", raw_key);
            StatRecord {
                raw_name: raw_key.to_string(),
                display_name: raw_key.to_string(),
                is_percentage: false,
                min_roll: 0.0,
                max_roll: 0.0,
            }
        })
    }

    pub fn character(&self, id: u32) -> Option<&CharacterRecord> {
        self.characters.get(&id)
    }

    pub fn character_by_name(&self, name: &str) -> Option<&CharacterRecord> {
        self.characters.values().find(|c| c.name == name)
    }

    pub fn resolve_character(&self, id: u32) -> CharacterRecord {
        self.characters
            .get(&id)
            .cloned()
            .unwrap_or_else(|| placeholder_character(id))
    }

    pub fn partner(&self, id: u32) -> Option<&PartnerRecord> {
        self.partners.get(&id)
    }

    pub fn set(&self, id: u32) -> Option<&SetRecord> {
        self.sets.get(&id)
    }

    /// Placeholder on miss, clearly marked so unknown content is visible in
    /// reports instead of aborting the load.
    pub fn resolve_set(&self, id: u32) -> SetRecord {
        self.sets.get(&id).cloned().unwrap_or_else(|| SetRecord {
            id,
            name: format!("Unknown Set #{}", id),
            pieces: 4,
            bonus: SetBonus::Conditional {
                effect: String::new(),
            },
        })
    }

    /// Bonus stat granted by a character's potential node at a given level.
    /// Unknown node or level 0 contributes nothing.
    pub fn potential_bonus(&self, character_id: u32, node: u8, level: u8) -> Option<(&str, f64)> {
        if level == 0 {
            return None;
        }
        self.potentials.get(&(character_id, node)).map(|record| {
            let idx = (level.min(5) - 1) as usize;
            (record.stat.as_str(), record.per_level[idx])
        })
    }
}

fn placeholder_character(id: u32) -> CharacterRecord {
    CharacterRecord {
        id,
        name: String::new(),
        base_atk: 0.0,
        base_def: 0.0,
        base_hp: 0.0,
        base_crit_rate: 0.0,
    }
}

// --- Fixed progression tables (not overridable) ---

/// Character level for a cumulative experience total. Exact at breakpoints,
/// linearly interpolated between them (fractional progress truncates toward
/// the lower level), capped at the table maximum.
pub fn level_from_exp(exp: u64) -> u32 {
    let table = tables::CHAR_EXP_TABLE;
    let (last_exp, last_level) = *table.last().unwrap();
    if exp >= last_exp {
        return last_level;
    }
    for window in table.windows(2) {
        let (e1, l1) = window[0];
        let (e2, l2) = window[1];
        if exp < e2 {
            return l1 + (((exp - e1) * (l2 - l1) as u64) / (e2 - e1)) as u32;
        }
    }
    1
}

/// Partner cards use a flat divisor at low experience, then the shared
/// interpolation table. The caller clamps to the ascension cap.
pub fn partner_level_from_exp(exp: u64) -> u32 {
    if exp < tables::PARTNER_EXP_THRESHOLD {
        1 + (exp / tables::PARTNER_EXP_DIVISOR) as u32
    } else {
        level_from_exp(exp)
    }
}

/// Cumulative (ATK, DEF, HP) bonus for a friendship level. Table lookup in
/// range; indices past the table follow the observed 3-level cycle
/// (approximate, see tables.rs).
pub fn friendship_bonus(index: u32) -> (u32, u32, u32) {
    let table = tables::FRIENDSHIP_TABLE;
    if index == 0 {
        return (0, 0, 0);
    }
    if (index as usize) <= table.len() {
        return table[index as usize - 1];
    }

    let (mut atk, mut def, mut hp) = *table.last().unwrap();
    let steps = index - table.len() as u32;
    let cycles = steps / 3;
    atk += cycles * 4;
    def += cycles;
    hp += cycles;
    match steps % 3 {
        1 => atk += 2,
        2 => atk += 4,
        _ => {}
    }
    (atk, def, hp)
}

/// Total upgrade rolls a fragment of this rarity can receive over its
/// lifetime. Out-of-range rarities get none.
pub fn upgrades_for_rarity(rarity: u8) -> u32 {
    tables::RARITY_UPGRADES
        .get(rarity as usize)
        .copied()
        .unwrap_or(0)
}

/// Slots 1-3 carry fixed main stats; only slots 4-6 have a selectable main
/// stat, so main-stat search filters apply there alone.
pub fn slot_has_selectable_main(slot: u8) -> bool {
    (4..=6).contains(&slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendship_table_anchors() {
        assert_eq!(friendship_bonus(1), (0, 0, 0));
        assert_eq!(friendship_bonus(5), (6, 1, 1));
        assert_eq!(friendship_bonus(40), (52, 13, 13));
    }

    #[test]
    fn friendship_extrapolation_continues_cycle() {
        // 41..43 extend the (+2, +2, +1/+1) cycle past the table.
        assert_eq!(friendship_bonus(41), (54, 13, 13));
        assert_eq!(friendship_bonus(42), (56, 13, 13));
        assert_eq!(friendship_bonus(43), (56, 14, 14));
        assert_eq!(friendship_bonus(46), (60, 15, 15));
    }

    #[test]
    fn exp_breakpoints_are_exact() {
        assert_eq!(level_from_exp(0), 1);
        assert_eq!(level_from_exp(100), 2);
        assert_eq!(level_from_exp(600), 4);
        assert_eq!(level_from_exp(600_000), 100);
        assert_eq!(level_from_exp(10_000_000), 100);
    }

    #[test]
    fn exp_interpolates_between_breakpoints() {
        // Between (1_000, 5) and (2_500, 10): 1_600 is 2 levels of progress.
        assert_eq!(level_from_exp(1_600), 7);
        // Fractional progress truncates toward the lower level.
        assert_eq!(level_from_exp(299), 2);
    }

    #[test]
    fn partner_levels_fast_then_joins_table() {
        assert_eq!(partner_level_from_exp(0), 1);
        assert_eq!(partner_level_from_exp(400), 3);
        assert_eq!(partner_level_from_exp(999), 5);
        assert_eq!(partner_level_from_exp(2_500), 10);
    }

    #[test]
    fn unknown_lookups_degrade() {
        let catalog = Catalog::builtin();
        let stat = catalog.resolve_stat("mystery");
        assert_eq!(stat.display_name, "mystery");
        assert_eq!(stat.max_roll, 0.0);

        let set = catalog.resolve_set(999);
        assert_eq!(set.name, "Unknown Set #999");

        assert!(catalog.potential_bonus(1001, 9, 3).is_none());
        assert!(catalog.potential_bonus(1001, 1, 0).is_none());
    }
}
