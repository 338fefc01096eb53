use serde::Serialize;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// How a stat value landed on a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum RollKind {
    Main,
    Initial,
    Reroll,
    Upgrade,
}

impl RollKind {
    /// Wire tag from the capture record. Unknown tags fail the record closed.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Main),
            1 => Some(Self::Initial),
            2 => Some(Self::Reroll),
            3 => Some(Self::Upgrade),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatRoll {
    pub value: f64,
    pub kind: RollKind,
    pub hit_min: bool,
    pub hit_max: bool,
}

/// One named attribute on a fragment: either its main stat or one substat
/// with every roll that merged into it.
#[derive(Debug, Clone, Serialize)]
pub struct Stat {
    pub name: String,
    pub raw_name: String,
    pub value: f64,
    pub is_percentage: bool,
    pub is_main: bool,
    pub roll_count: u32,
    pub base_value: f64,
    pub rolls: Vec<StatRoll>,
}

impl Stat {
    pub fn format_value(&self) -> String {
        if self.is_percentage {
            format!("{:.1}%", self.value)
        } else {
            format!("{:.0}", self.value)
        }
    }
}

/// One piece of equipment. Immutable once parsed except for the three
/// derived score fields, which the scorer recomputes when priority weights
/// change.
#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    pub id: u64,
    pub slot: u8,
    pub rarity: u8,
    pub set_id: u32,
    pub set_name: String,
    pub level: u32,
    pub locked: bool,
    /// Resolved name of the character currently wearing this piece.
    pub wearer: Option<String>,
    pub main_stat: Option<Stat>,
    pub substats: Vec<Stat>,

    // Derived by the scorer.
    pub gear_score: f64,
    pub priority_score: f64,
    pub potential: (f64, f64),
}

/// All fragments from one snapshot. Owned here for the snapshot's lifetime;
/// the optimizer only ever borrows.
#[derive(Debug, Default)]
pub struct FragmentPool {
    pub fragments: Vec<Fragment>,
}

impl FragmentPool {
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn by_id(&self, id: u64) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerInfo {
    pub name: String,
    pub resource_id: u32,
    pub level: u32,
    pub max_level: u32,
    pub limit_break: u8,
}

/// One playable character's progression state.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterInfo {
    pub name: String,
    pub resource_id: u32,
    pub exp: u64,
    pub level: u32,
    pub max_level: u32,
    pub ascend: u8,
    pub limit_break: u8,
    pub friendship: u32,
    pub partner: Option<PartnerInfo>,
    /// Potential node number -> node level (1..=5).
    pub potential_nodes: BTreeMap<u8, u8>,
}

/// Coarse account metadata. Display only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserInfo {
    pub nickname: String,
    pub level: u32,
    pub login_days: u32,
    pub streak: u32,
}

#[derive(Debug, Default)]
pub struct Roster {
    pub user: UserInfo,
    pub characters: Vec<CharacterInfo>,
}

impl Roster {
    pub fn character(&self, name: &str) -> Option<&CharacterInfo> {
        self.characters.iter().find(|c| c.name == name)
    }
}
