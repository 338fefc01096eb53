use fragforge::catalog::{self, Catalog};
use fragforge::snapshot;
use fragforge::snapshot::roster::parse_potential_nodes;
use rstest::rstest;

fn doc_with_characters(list: &str) -> String {
    format!(
        r#"{{
            "capture_time": "t",
            "inventory": {{ "fragments": [] }},
            "characters": {{
                "user": {{ "nickname": "tester", "level": 58, "login_days": 321, "streak": 14 }},
                "list": {}
            }}
        }}"#,
        list
    )
}

// --- PROGRESSION TABLES ---

#[rstest]
#[case(0, 1)]
#[case(100, 2)] // exact breakpoint
#[case(299, 2)] // truncates toward the lower level
#[case(300, 3)]
#[case(1_600, 7)] // interpolated between (1000, 5) and (2500, 10)
#[case(600_000, 100)]
#[case(999_999_999, 100)] // capped at table max
fn test_level_from_exp(#[case] exp: u64, #[case] expected: u32) {
    assert_eq!(catalog::level_from_exp(exp), expected);
}

#[rstest]
#[case(1, (0, 0, 0))]
#[case(5, (6, 1, 1))]
#[case(40, (52, 13, 13))]
// Past the table the 3-level cycle extrapolates (approximate, by design).
#[case(43, (56, 14, 14))]
fn test_friendship_bonus(#[case] index: u32, #[case] expected: (u32, u32, u32)) {
    assert_eq!(catalog::friendship_bonus(index), expected);
}

// --- POTENTIAL NODE STRINGS ---

#[test]
fn test_potential_nodes_parse() {
    let nodes = parse_potential_nodes("[10010102,10010203]", 1001);
    assert_eq!(nodes.get(&1), Some(&2));
    assert_eq!(nodes.get(&2), Some(&3));
}

#[test]
fn test_potential_nodes_foreign_owner_discarded() {
    let nodes = parse_potential_nodes("[10020102,10010203]", 1001);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes.get(&2), Some(&3));
}

#[test]
fn test_potential_nodes_malformed_entries_skipped() {
    // wrong width, non-digits, empty list
    assert!(parse_potential_nodes("[100101,abcdefgh]", 1001).is_empty());
    assert!(parse_potential_nodes("[]", 1001).is_empty());
    assert!(parse_potential_nodes("", 1001).is_empty());
}

// --- ROSTER BUILDING ---

#[test]
fn test_character_with_partner() {
    let catalog = Catalog::builtin();
    let list = r#"[
        {"resource_id": 1001, "exp": 14000, "ascend": 4, "limit_break": 2,
         "friendship": 5, "partner_id": 2001, "potentials": "[10010103]"},
        {"resource_id": 2001, "exp": 400, "ascend": 1, "limit_break": 3}
    ]"#;
    let snap = snapshot::parse(doc_with_characters(list).as_bytes(), &catalog).unwrap();

    assert_eq!(snap.roster.user.nickname, "tester");
    assert_eq!(snap.roster.characters.len(), 1); // partner record is not a character

    let sable = snap.roster.character("Sable").expect("Sable in roster");
    assert_eq!(sable.max_level, 50); // (4 + 1) * 10
    assert_eq!(sable.level, 20); // exp table, under the cap
    assert_eq!(sable.friendship, 5);
    assert_eq!(sable.potential_nodes.get(&1), Some(&3));

    let partner = sable.partner.as_ref().expect("partner assigned");
    assert_eq!(partner.name, "Ember Vow");
    assert_eq!(partner.max_level, 20); // (1 + 1) * 10
    assert_eq!(partner.level, 3); // low-exp divisor approximation
    assert_eq!(partner.limit_break, 3);
}

#[test]
fn test_ascension_caps_level() {
    let catalog = Catalog::builtin();
    let list = r#"[{"resource_id": 1002, "exp": 600000, "ascend": 2}]"#;
    let snap = snapshot::parse(doc_with_characters(list).as_bytes(), &catalog).unwrap();
    let liora = snap.roster.character("Liora").unwrap();
    assert_eq!(liora.max_level, 30);
    assert_eq!(liora.level, 30); // exp would give 100
}

#[test]
fn test_partner_level_clamped_to_cap() {
    let catalog = Catalog::builtin();
    let list = r#"[
        {"resource_id": 1001, "partner_id": 2002},
        {"resource_id": 2002, "exp": 600000, "ascend": 0}
    ]"#;
    let snap = snapshot::parse(doc_with_characters(list).as_bytes(), &catalog).unwrap();
    let partner = snap.roster.characters[0].partner.as_ref().unwrap();
    assert_eq!(partner.max_level, 10);
    assert_eq!(partner.level, 10);
}

#[test]
fn test_pseudo_characters_skipped() {
    let catalog = Catalog::builtin();
    let list = r#"[
        {"resource_id": 9999, "exp": 100},
        {"resource_id": 1003, "exp": 100},
        {"bad": "record"}
    ]"#;
    let snap = snapshot::parse(doc_with_characters(list).as_bytes(), &catalog).unwrap();
    assert_eq!(snap.roster.characters.len(), 1);
    assert_eq!(snap.roster.characters[0].name, "Vex");
}

#[test]
fn test_unassigned_partner_defaults() {
    let catalog = Catalog::builtin();
    // Partner assigned but its own progression record is missing from the
    // list: defaults to a fresh card.
    let list = r#"[{"resource_id": 1001, "partner_id": 2003}]"#;
    let snap = snapshot::parse(doc_with_characters(list).as_bytes(), &catalog).unwrap();
    let partner = snap.roster.characters[0].partner.as_ref().unwrap();
    assert_eq!(partner.name, "Gale Pact");
    assert_eq!(partner.level, 1);
    assert_eq!(partner.limit_break, 0);
}
