use crate::catalog::{self, Catalog, SetBonus};
use crate::model::{CharacterInfo, Fragment};
use crate::scorer::types::AggregatedStats;

/// Fixed base critical damage before any gear or bonus applies.
pub const BASE_CRIT_DMG: f64 = 125.0;

/// Additive layers before the final combination: percentage multipliers for
/// the three core stats, flat addends for everything else.
#[derive(Default)]
struct Buckets {
    pct_atk: f64,
    pct_def: f64,
    pct_hp: f64,
    flat_atk: f64,
    flat_def: f64,
    flat_hp: f64,
    crit_rate: f64,
    crit_dmg: f64,
    ego: f64,
    extra_dmg: f64,
    dot: f64,
}

impl Buckets {
    fn apply(&mut self, raw_key: &str, value: f64) {
        match raw_key {
            "atk" => self.flat_atk += value,
            "atk_pct" => self.pct_atk += value,
            "def" => self.flat_def += value,
            "def_pct" => self.pct_def += value,
            "hp" => self.flat_hp += value,
            "hp_pct" => self.pct_hp += value,
            "crit_rate" => self.crit_rate += value,
            "crit_dmg" => self.crit_dmg += value,
            "ego" => self.ego += value,
            "extra_dmg" => self.extra_dmg += value,
            "dot" => self.dot += value,
            // Unknown content contributes nothing by design.
            _ => {}
        }
    }
}

/// Combines base character stats, partner-card and potential-node bonuses,
/// six pieces of gear, completed set bonuses and the friendship triple into
/// final derived stats. Pure function of its arguments.
pub fn aggregate(
    catalog: &Catalog,
    character: Option<&CharacterInfo>,
    gear: &[&Fragment],
) -> AggregatedStats {
    let record = character.and_then(|info| catalog.character(info.resource_id));
    let (base_atk, base_def, base_hp, base_crit) = record
        .map(|r| (r.base_atk, r.base_def, r.base_hp, r.base_crit_rate))
        .unwrap_or((0.0, 0.0, 0.0, 0.0));

    let mut buckets = Buckets::default();
    let mut friend = (0.0, 0.0, 0.0);
    let mut card = (0.0, 0.0, 0.0);

    if let Some(info) = character {
        // Partner card: level-scaled base contribution plus every passive
        // unlocked at the current limit-break tier.
        if let Some(partner) = &info.partner {
            if let Some(p) = catalog.partner(partner.resource_id) {
                let steps = partner.level.saturating_sub(1) as f64;
                card = (
                    p.base.0 + p.growth.0 * steps,
                    p.base.1 + p.growth.1 * steps,
                    p.base.2 + p.growth.2 * steps,
                );
                for passive in &p.passives {
                    if passive.tier <= partner.limit_break {
                        buckets.apply(&passive.stat, passive.value);
                    }
                }
            }
        }

        for (&node, &level) in &info.potential_nodes {
            if let Some((stat, value)) = catalog.potential_bonus(info.resource_id, node, level) {
                buckets.apply(stat, value);
            }
        }

        let (f_atk, f_def, f_hp) = catalog::friendship_bonus(info.friendship);
        friend = (f_atk as f64, f_def as f64, f_hp as f64);
    }

    for fragment in gear {
        if let Some(main) = &fragment.main_stat {
            buckets.apply(&main.raw_name, main.value);
        }
        for sub in &fragment.substats {
            buckets.apply(&sub.raw_name, sub.value);
        }
    }

    apply_set_bonuses(catalog, gear, &mut buckets);

    let atk = base_atk * (1.0 + buckets.pct_atk / 100.0) + buckets.flat_atk + friend.0 + card.0;
    let def = base_def * (1.0 + buckets.pct_def / 100.0) + buckets.flat_def + friend.1 + card.1;
    let hp = base_hp * (1.0 + buckets.pct_hp / 100.0) + buckets.flat_hp + friend.2 + card.2;
    let crit_rate = base_crit + buckets.crit_rate;
    let crit_dmg = BASE_CRIT_DMG + buckets.crit_dmg;

    AggregatedStats {
        atk,
        def,
        hp,
        crit_rate,
        crit_dmg,
        ego: buckets.ego,
        extra_dmg: buckets.extra_dmg,
        dot: buckets.dot,
        effective_hp: hp * (def / 300.0 + 1.0),
        avg_dmg: atk * (crit_rate / 100.0) * (crit_dmg / 100.0),
        max_crit_dmg: atk * (crit_dmg / 100.0),
        sustain: hp * (crit_dmg / 100.0),
    }
}

/// Every distinct set reaching its required piece count contributes its
/// bonus; conditional combat triggers are display-only and skipped here.
fn apply_set_bonuses(catalog: &Catalog, gear: &[&Fragment], buckets: &mut Buckets) {
    let mut counts: [(u32, u8); 6] = [(0, 0); 6];
    let mut distinct = 0usize;

    for fragment in gear {
        let mut found = false;
        for entry in counts.iter_mut().take(distinct) {
            if entry.0 == fragment.set_id {
                entry.1 += 1;
                found = true;
                break;
            }
        }
        if !found && distinct < counts.len() {
            counts[distinct] = (fragment.set_id, 1);
            distinct += 1;
        }
    }

    for &(set_id, count) in counts.iter().take(distinct) {
        let Some(record) = catalog.set(set_id) else {
            continue;
        };
        if count >= record.pieces {
            if let SetBonus::Stat { stat, value } = &record.bonus {
                buckets.apply(stat, *value);
            }
        }
    }
}
