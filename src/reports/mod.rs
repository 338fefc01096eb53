use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fragforge::model::{Fragment, Roster, UserInfo};
use fragforge::optimizer::Combination;

pub fn print_user_summary(user: &UserInfo) {
    if user.nickname.is_empty() {
        return;
    }
    println!(
        "👤 {} (Lv.{}) — {} days logged, {} day streak",
        user.nickname, user.level, user.login_days, user.streak
    );
}

pub fn print_roster_table(roster: &Roster) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Character").add_attribute(Attribute::Bold),
        Cell::new("Level"),
        Cell::new("Limit Break"),
        Cell::new("Friendship"),
        Cell::new("Partner"),
        Cell::new("Potentials"),
    ]);

    for c in &roster.characters {
        let partner = c
            .partner
            .as_ref()
            .map(|p| format!("{} (Lv.{}/LB{})", p.name, p.level, p.limit_break))
            .unwrap_or_else(|| "-".to_string());
        let potentials = if c.potential_nodes.is_empty() {
            "-".to_string()
        } else {
            c.potential_nodes
                .iter()
                .map(|(node, level)| format!("#{}:{}", node, level))
                .collect::<Vec<_>>()
                .join(" ")
        };
        table.add_row(vec![
            Cell::new(&c.name),
            Cell::new(format!("{}/{}", c.level, c.max_level)),
            Cell::new(c.limit_break),
            Cell::new(c.friendship),
            Cell::new(partner),
            Cell::new(potentials),
        ]);
    }

    for i in 1..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}

pub fn print_fragment_table(fragments: &[&Fragment]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Slot"),
        Cell::new("Rarity"),
        Cell::new("Set"),
        Cell::new("Lv"),
        Cell::new("Main"),
        Cell::new("Substats"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Potential"),
        Cell::new("Wearer"),
    ]);

    for f in fragments {
        let main = f
            .main_stat
            .as_ref()
            .map(|m| format!("{} {}", m.name, m.format_value()))
            .unwrap_or_else(|| "-".to_string());
        let subs = f
            .substats
            .iter()
            .map(|s| format!("{} {}", s.name, s.format_value()))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(f.id),
            Cell::new(f.slot),
            Cell::new("★".repeat(f.rarity as usize)),
            Cell::new(&f.set_name),
            Cell::new(format!("+{}", f.level)),
            Cell::new(main),
            Cell::new(subs),
            Cell::new(format!("{:.1}", f.gear_score)).fg(Color::Cyan),
            Cell::new(format!("{:.1}-{:.1}", f.potential.0, f.potential.1)),
            Cell::new(f.wearer.as_deref().unwrap_or("-")),
        ]);
    }

    if let Some(col) = table.column_mut(7) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    println!("{}", table);
    println!("{} fragments", fragments.len());
}

pub fn print_results_table(results: &[Combination]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Pieces"),
        Cell::new("ATK"),
        Cell::new("DEF"),
        Cell::new("HP"),
        Cell::new("Crit").fg(Color::Red),
        Cell::new("CritDMG").fg(Color::Red),
        Cell::new("EffHP"),
        Cell::new("AvgDMG").fg(Color::Green),
    ]);

    for (rank, combo) in results.iter().enumerate() {
        let pieces = combo
            .pieces
            .iter()
            .map(|p| p.id.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:.1}", combo.score)),
            Cell::new(pieces),
            Cell::new(format!("{:.0}", combo.stats.atk)),
            Cell::new(format!("{:.0}", combo.stats.def)),
            Cell::new(format!("{:.0}", combo.stats.hp)),
            Cell::new(format!("{:.1}%", combo.stats.crit_rate)),
            Cell::new(format!("{:.1}%", combo.stats.crit_dmg)),
            Cell::new(format!("{:.0}", combo.stats.effective_hp)),
            Cell::new(format!("{:.0}", combo.stats.avg_dmg)),
        ]);
    }

    for i in 1..=9 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}

/// Per-piece breakdown of one combination (usually the winner).
pub fn print_combination_detail(combo: &Combination) {
    println!("\nBest loadout ({:.1}):", combo.score);
    print_fragment_table(&combo.pieces.to_vec());
}
