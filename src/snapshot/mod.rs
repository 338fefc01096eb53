pub mod fragment;
pub mod roster;

use crate::catalog::Catalog;
use crate::error::{FfResult, FragForgeError};
use crate::model::{FragmentPool, Roster};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One fully parsed capture: account roster plus the scored fragment pool.
/// Owns every entity it produced until the next snapshot replaces it.
pub struct Snapshot {
    pub capture_time: String,
    pub roster: Roster,
    pub pool: FragmentPool,
}

#[derive(Deserialize)]
struct RawDocument {
    capture_time: Option<String>,
    inventory: Option<RawInventory>,
    /// Legacy captures stored the fragment list at the top level.
    fragments: Option<Vec<Value>>,
    characters: Option<RawCharacterSection>,
}

#[derive(Deserialize)]
struct RawInventory {
    fragments: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawCharacterSection {
    user: Option<roster::RawUser>,
    #[serde(default)]
    list: Vec<Value>,
}

/// Parses a capture document. Structural failures abort with a ParseError;
/// individual malformed records are skipped with a warning so one bad item
/// never poisons the batch.
pub fn parse(bytes: &[u8], catalog: &Catalog) -> FfResult<Snapshot> {
    let doc: RawDocument = serde_json::from_slice(bytes)
        .map_err(|e| FragForgeError::Parse(format!("invalid snapshot document: {}", e)))?;

    let fragment_values = doc
        .inventory
        .and_then(|inv| inv.fragments)
        .or(doc.fragments)
        .ok_or_else(|| {
            FragForgeError::Parse("snapshot has no fragment inventory section".to_string())
        })?;

    let character_section = doc
        .characters
        .ok_or_else(|| FragForgeError::Parse("snapshot has no characters section".to_string()))?;

    let mut pool = FragmentPool::default();
    let mut skipped = 0usize;
    for value in fragment_values {
        match fragment::normalize(&value, catalog) {
            Some(frag) => pool.fragments.push(frag),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("Skipped {} malformed fragment records", skipped);
    }

    let roster = roster::build(character_section.user, &character_section.list, catalog);

    info!(
        "Snapshot parsed: {} fragments, {} characters",
        pool.len(),
        roster.characters.len()
    );

    Ok(Snapshot {
        capture_time: doc.capture_time.unwrap_or_default(),
        roster,
        pool,
    })
}

pub fn load_from_file<P: AsRef<Path>>(path: P, catalog: &Catalog) -> FfResult<Snapshot> {
    let bytes = fs::read(path.as_ref())?;
    parse(&bytes, catalog)
}
