use crate::catalog::Catalog;
use crate::model::{Fragment, RollKind, Stat, StatRoll};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Tolerance when deciding whether a roll landed on the catalog's minimum or
/// maximum magnitude; capture values arrive with float rounding.
pub const ROLL_EPSILON: f64 = 0.01;

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Num(u64),
    Text(String),
}

impl IdRepr {
    fn digits(&self) -> String {
        match self {
            IdRepr::Num(n) => n.to_string(),
            IdRepr::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawFragment {
    id: u64,
    resource_id: IdRepr,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    locked: bool,
    wearer_id: Option<u32>,
    #[serde(default)]
    rolls: Vec<RawRoll>,
}

#[derive(Deserialize)]
struct RawRoll {
    slot: u8,
    kind: u8,
    stat: String,
    value: f64,
}

/// Slot, rarity and set id packed into the composite resource identifier:
/// digit 3 = slot, digit 4 = rarity, trailing digits = set id. Validated
/// parse; any malformed width or range fails closed.
pub fn decode_resource_id(digits: &str) -> Option<(u8, u8, u32)> {
    if digits.len() < 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bytes = digits.as_bytes();
    let slot = bytes[2] - b'0';
    let rarity = bytes[3] - b'0';
    if !(1..=6).contains(&slot) || !(1..=5).contains(&rarity) {
        return None;
    }
    let set_id: u32 = digits[4..].parse().ok()?;
    Some((slot, rarity, set_id))
}

/// Builds one Fragment from a raw inventory record. Returns None (after
/// logging) for records the validated parse rejects; the caller drops them
/// and continues the batch.
pub fn normalize(value: &Value, catalog: &Catalog) -> Option<Fragment> {
    let raw: RawFragment = match serde_json::from_value(value.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!("Dropping malformed fragment record: {}", e);
            return None;
        }
    };

    let digits = raw.resource_id.digits();
    let Some((slot, rarity, set_id)) = decode_resource_id(&digits) else {
        warn!(
            "Dropping fragment {}: undecodable resource id '{}'",
            raw.id, digits
        );
        return None;
    };

    let mut main_stat = None;
    let mut sub_rolls: BTreeMap<u8, Vec<&RawRoll>> = BTreeMap::new();

    for roll in &raw.rolls {
        let Some(kind) = RollKind::from_tag(roll.kind) else {
            warn!(
                "Dropping fragment {}: unknown roll kind tag {}",
                raw.id, roll.kind
            );
            return None;
        };

        if roll.slot == 0 && kind == RollKind::Main {
            if main_stat.is_some() {
                warn!("Dropping fragment {}: duplicate main stat", raw.id);
                return None;
            }
            main_stat = Some(build_main_stat(roll, catalog));
        } else if roll.slot >= 1 && kind != RollKind::Main {
            sub_rolls.entry(roll.slot).or_default().push(roll);
        } else {
            warn!(
                "Dropping fragment {}: roll kind {:?} in slot {}",
                raw.id, kind, roll.slot
            );
            return None;
        }
    }

    let substats = sub_rolls
        .into_values()
        .map(|rolls| build_substat(&rolls, catalog))
        .collect();

    let wearer = raw
        .wearer_id
        .and_then(|id| catalog.character(id))
        .map(|c| c.name.clone());
    if wearer.is_none() && raw.wearer_id.is_some() {
        debug!(
            "Fragment {} wearer id {:?} unknown, treating as unequipped",
            raw.id, raw.wearer_id
        );
    }

    Some(Fragment {
        id: raw.id,
        slot,
        rarity,
        set_id,
        set_name: catalog.resolve_set(set_id).name,
        level: raw.level,
        locked: raw.locked,
        wearer,
        main_stat,
        substats,
        gear_score: 0.0,
        priority_score: 0.0,
        potential: (0.0, 0.0),
    })
}

fn build_main_stat(roll: &RawRoll, catalog: &Catalog) -> Stat {
    let record = catalog.resolve_stat(&roll.stat);
    Stat {
        name: record.display_name,
        raw_name: record.raw_name,
        value: roll.value,
        is_percentage: record.is_percentage,
        is_main: true,
        roll_count: 1,
        base_value: roll.value,
        rolls: vec![StatRoll {
            value: roll.value,
            kind: RollKind::Main,
            hit_min: false,
            hit_max: false,
        }],
    }
}

fn build_substat(rolls: &[&RawRoll], catalog: &Catalog) -> Stat {
    let record = catalog.resolve_stat(&rolls[0].stat);
    let mut value = 0.0;
    let mut tracked = Vec::with_capacity(rolls.len());

    for roll in rolls {
        value += roll.value;
        let (hit_min, hit_max) = if record.max_roll > 0.0 {
            (
                (roll.value - record.min_roll).abs() < ROLL_EPSILON,
                (roll.value - record.max_roll).abs() < ROLL_EPSILON,
            )
        } else {
            (false, false)
        };
        tracked.push(StatRoll {
            value: roll.value,
            // from_tag validated above; Main never reaches here
            kind: RollKind::from_tag(roll.kind).unwrap_or(RollKind::Upgrade),
            hit_min,
            hit_max,
        });
    }

    Stat {
        name: record.display_name,
        raw_name: record.raw_name,
        value,
        is_percentage: record.is_percentage,
        is_main: false,
        roll_count: rolls.len() as u32,
        base_value: rolls[0].value,
        rolls: tracked,
    }
}
