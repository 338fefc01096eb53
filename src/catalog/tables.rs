//! Embedded reference data. Mirrors the game's static tables for the content
//! known at build time; a JSON catalog file can override any section at load
//! time (see `Catalog::load_from_file`).

/// raw key, display name, is_percentage, min single roll, max single roll.
pub(super) const STATS: &[(&str, &str, bool, f64, f64)] = &[
    ("atk", "ATK", false, 10.0, 20.0),
    ("atk_pct", "ATK%", true, 3.0, 6.0),
    ("def", "DEF", false, 10.0, 20.0),
    ("def_pct", "DEF%", true, 3.0, 6.0),
    ("hp", "HP", false, 50.0, 100.0),
    ("hp_pct", "HP%", true, 3.0, 6.0),
    ("crit_rate", "Crit Rate", true, 2.0, 4.0),
    ("crit_dmg", "Crit DMG", true, 4.0, 8.0),
    ("ego", "Ego", false, 5.0, 10.0),
    ("extra_dmg", "Extra DMG%", true, 2.0, 4.0),
    ("dot", "DoT%", true, 2.0, 4.0),
];

/// id, name, base ATK, base DEF, base HP, base crit rate.
pub(super) const CHARACTERS: &[(u32, &str, f64, f64, f64, f64)] = &[
    (1001, "Sable", 620.0, 410.0, 3400.0, 5.0),
    (1002, "Liora", 705.0, 350.0, 3100.0, 5.0),
    (1003, "Vex", 580.0, 465.0, 3850.0, 5.0),
    (1004, "Mara", 660.0, 380.0, 3250.0, 7.5),
    (1005, "Orin", 540.0, 520.0, 4200.0, 5.0),
    (1006, "Kessa", 690.0, 395.0, 3000.0, 6.0),
    (1007, "Dray", 625.0, 440.0, 3600.0, 5.0),
    (1008, "Nyx", 730.0, 330.0, 2900.0, 8.0),
];

/// id, name, card base (ATK, DEF, HP), per-level growth (ATK, DEF, HP).
pub(super) const PARTNERS: &[(u32, &str, (f64, f64, f64), (f64, f64, f64))] = &[
    (2001, "Ember Vow", (40.0, 20.0, 220.0), (4.0, 2.0, 22.0)),
    (2002, "Tide Oath", (30.0, 30.0, 300.0), (3.0, 3.0, 30.0)),
    (2003, "Gale Pact", (45.0, 15.0, 180.0), (5.0, 1.0, 18.0)),
    (2004, "Stone Creed", (25.0, 40.0, 260.0), (2.0, 4.0, 26.0)),
    (2005, "Ash Litany", (50.0, 10.0, 150.0), (5.0, 1.0, 15.0)),
    (2006, "Hollow Chorus", (35.0, 25.0, 240.0), (3.0, 2.0, 24.0)),
];

/// partner id, limit-break tier that unlocks the passive, stat key, value.
pub(super) const PARTNER_PASSIVES: &[(u32, u8, &str, f64)] = &[
    (2001, 1, "atk_pct", 3.0),
    (2001, 3, "atk_pct", 5.0),
    (2001, 5, "crit_rate", 4.0),
    (2002, 1, "hp_pct", 4.0),
    (2002, 3, "def_pct", 5.0),
    (2002, 5, "hp_pct", 6.0),
    (2003, 1, "extra_dmg", 2.0),
    (2003, 3, "atk_pct", 4.0),
    (2003, 5, "extra_dmg", 4.0),
    (2004, 1, "def_pct", 4.0),
    (2004, 3, "hp_pct", 4.0),
    (2004, 5, "def_pct", 6.0),
    (2005, 1, "dot", 2.0),
    (2005, 3, "dot", 3.0),
    (2005, 5, "crit_dmg", 8.0),
    (2006, 1, "ego", 5.0),
    (2006, 3, "ego", 8.0),
    (2006, 5, "crit_rate", 3.0),
];

/// id, name, pieces required, stat bonus key (empty = conditional), value, effect text.
pub(super) const SETS: &[(u32, &str, u8, &str, f64, &str)] = &[
    (101, "Berserker's Echo", 4, "atk_pct", 15.0, ""),
    (
        102,
        "Bulwark Oath",
        4,
        "",
        0.0,
        "Taking a hit grants a shield equal to 8% of max HP (10s cooldown)",
    ),
    (103, "Vital Chorus", 2, "hp_pct", 10.0, ""),
    (104, "Keen Edge", 2, "crit_rate", 5.0, ""),
    (105, "Iron Will", 2, "def_pct", 10.0, ""),
    (
        106,
        "Ember Litany",
        4,
        "",
        0.0,
        "Attacks have a 20% chance to ignite, dealing 40% ATK per second for 3s",
    ),
    (107, "Swift Current", 2, "extra_dmg", 4.0, ""),
    (108, "Hollow Vessel", 2, "ego", 10.0, ""),
];

/// character id, node number, stat key, magnitude per node level 1..=5.
pub(super) const POTENTIALS: &[(u32, u8, &str, [f64; 5])] = &[
    (1001, 1, "atk_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1001, 2, "crit_rate", [1.0, 2.0, 3.0, 4.0, 5.0]),
    (1002, 1, "atk_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1002, 2, "extra_dmg", [1.0, 2.0, 3.0, 4.0, 5.0]),
    (1003, 1, "hp_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1003, 2, "def_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1004, 1, "crit_dmg", [3.0, 6.0, 9.0, 12.0, 15.0]),
    (1004, 2, "crit_rate", [1.0, 2.0, 3.0, 4.0, 5.0]),
    (1005, 1, "def_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1005, 2, "hp_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1006, 1, "atk_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1006, 2, "dot", [1.0, 2.0, 3.0, 4.0, 5.0]),
    (1007, 1, "hp_pct", [2.0, 4.0, 6.0, 8.0, 10.0]),
    (1007, 2, "ego", [4.0, 8.0, 12.0, 16.0, 20.0]),
    (1008, 1, "crit_rate", [1.0, 2.0, 3.0, 4.0, 5.0]),
    (1008, 2, "crit_dmg", [3.0, 6.0, 9.0, 12.0, 15.0]),
];

/// Cumulative experience required to reach each level. Sparse breakpoints;
/// levels between adjacent rows are linearly interpolated.
pub(super) const CHAR_EXP_TABLE: &[(u64, u32)] = &[
    (0, 1),
    (100, 2),
    (300, 3),
    (600, 4),
    (1_000, 5),
    (2_500, 10),
    (7_000, 15),
    (14_000, 20),
    (30_000, 30),
    (60_000, 40),
    (100_000, 50),
    (160_000, 60),
    (240_000, 70),
    (340_000, 80),
    (460_000, 90),
    (600_000, 100),
];

/// Partner cards level much faster at the start; below this threshold a flat
/// divisor approximates the curve, above it the character table applies.
pub(super) const PARTNER_EXP_THRESHOLD: u64 = 1_000;
pub(super) const PARTNER_EXP_DIVISOR: u64 = 200;

/// Cumulative (ATK, DEF, HP) friendship bonus, indexed by friendship level.
/// Index 1 is the first entry. The in-game pattern repeats every 3 levels
/// (+2 ATK, +2 ATK, +1 DEF/+1 HP); values past the table follow that cycle
/// algebraically (reverse-engineered, not verified game data).
pub(super) const FRIENDSHIP_TABLE: &[(u32, u32, u32)] = &[
    (0, 0, 0),
    (2, 0, 0),
    (4, 0, 0),
    (4, 1, 1),
    (6, 1, 1),
    (8, 1, 1),
    (8, 2, 2),
    (10, 2, 2),
    (12, 2, 2),
    (12, 3, 3),
    (14, 3, 3),
    (16, 3, 3),
    (16, 4, 4),
    (18, 4, 4),
    (20, 4, 4),
    (20, 5, 5),
    (22, 5, 5),
    (24, 5, 5),
    (24, 6, 6),
    (26, 6, 6),
    (28, 6, 6),
    (28, 7, 7),
    (30, 7, 7),
    (32, 7, 7),
    (32, 8, 8),
    (34, 8, 8),
    (36, 8, 8),
    (36, 9, 9),
    (38, 9, 9),
    (40, 9, 9),
    (40, 10, 10),
    (42, 10, 10),
    (44, 10, 10),
    (44, 11, 11),
    (46, 11, 11),
    (48, 11, 11),
    (48, 12, 12),
    (50, 12, 12),
    (52, 12, 12),
    (52, 13, 13),
];

/// Upgrade rolls granted per rarity tier (index = rarity, 0 unused).
pub(super) const RARITY_UPGRADES: &[u32] = &[0, 1, 2, 3, 4, 5];
