use crate::catalog::{self, Catalog};
use crate::model::{CharacterInfo, PartnerInfo, Roster, UserInfo};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Deserialize, Default)]
pub(crate) struct RawUser {
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    login_days: u32,
    #[serde(default)]
    streak: u32,
}

/// Character and partner-card records share one wire shape; which one a
/// record is depends on catalog membership of its resource id.
#[derive(Deserialize)]
struct RawProgression {
    resource_id: u32,
    #[serde(default)]
    exp: u64,
    #[serde(default)]
    ascend: u8,
    #[serde(default)]
    limit_break: u8,
    #[serde(default)]
    friendship: u32,
    partner_id: Option<u32>,
    #[serde(default)]
    potentials: String,
}

pub(crate) fn build(user: Option<RawUser>, records: &[Value], catalog: &Catalog) -> Roster {
    let mut partners: HashMap<u32, RawProgression> = HashMap::new();
    let mut characters: Vec<RawProgression> = Vec::new();

    for value in records {
        let raw: RawProgression = match serde_json::from_value(value.clone()) {
            Ok(r) => r,
            Err(e) => {
                warn!("Dropping malformed character record: {}", e);
                continue;
            }
        };
        if catalog.partner(raw.resource_id).is_some() {
            partners.insert(raw.resource_id, raw);
        } else {
            characters.push(raw);
        }
    }

    let mut roster_characters = Vec::with_capacity(characters.len());
    for raw in characters {
        let Some(record) = catalog.character(raw.resource_id) else {
            debug!(
                "Skipping pseudo-character with unknown resource id {}",
                raw.resource_id
            );
            continue;
        };

        let max_level = (raw.ascend as u32 + 1) * 10;
        let level = catalog::level_from_exp(raw.exp).min(max_level);

        let partner = raw
            .partner_id
            .and_then(|pid| catalog.partner(pid).map(|p| (pid, p)))
            .map(|(pid, partner_record)| {
                let progression = partners.get(&pid);
                let p_exp = progression.map(|p| p.exp).unwrap_or(0);
                let p_ascend = progression.map(|p| p.ascend).unwrap_or(0);
                let p_limit_break = progression.map(|p| p.limit_break).unwrap_or(0);
                let p_max = (p_ascend as u32 + 1) * 10;
                PartnerInfo {
                    name: partner_record.name.clone(),
                    resource_id: pid,
                    level: catalog::partner_level_from_exp(p_exp).min(p_max),
                    max_level: p_max,
                    limit_break: p_limit_break,
                }
            });

        roster_characters.push(CharacterInfo {
            name: record.name.clone(),
            resource_id: raw.resource_id,
            exp: raw.exp,
            level,
            max_level,
            ascend: raw.ascend,
            limit_break: raw.limit_break,
            friendship: raw.friendship,
            partner,
            potential_nodes: parse_potential_nodes(&raw.potentials, raw.resource_id),
        });
    }

    let user = user
        .map(|u| UserInfo {
            nickname: u.nickname,
            level: u.level,
            login_days: u.login_days,
            streak: u.streak,
        })
        .unwrap_or_default();

    Roster {
        user,
        characters: roster_characters,
    }
}

/// Potential nodes arrive as "[id,id,...]" where each id is an 8-digit
/// integer: 4-digit owner / 2-digit node number / 2-digit node level.
/// Entries with a foreign owner or a malformed width are discarded.
pub fn parse_potential_nodes(encoded: &str, owner_id: u32) -> BTreeMap<u8, u8> {
    let mut nodes = BTreeMap::new();
    let inner = encoded
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    if inner.is_empty() {
        return nodes;
    }

    for entry in inner.split(',') {
        let entry = entry.trim();
        if entry.len() != 8 || !entry.bytes().all(|b| b.is_ascii_digit()) {
            debug!("Discarding malformed potential node entry '{}'", entry);
            continue;
        }
        let packed: u32 = match entry.parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let owner = packed / 10_000;
        let node = ((packed / 100) % 100) as u8;
        let level = (packed % 100) as u8;
        if owner != owner_id {
            debug!(
                "Discarding potential node {} owned by {} while parsing {}",
                packed, owner, owner_id
            );
            continue;
        }
        nodes.insert(node, level);
    }
    nodes
}
