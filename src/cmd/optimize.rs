use crate::reports;
use clap::Args;
use fragforge::config::Config;
use fragforge::error::FfResult;
use fragforge::optimizer::{
    CancelToken, Combination, FnProgress, Optimizer, ProgressUpdate, SearchConstraints,
    PROGRESS_INTERVAL,
};
use fragforge::scorer::Scorer;
use fragforge::snapshot::Snapshot;
use std::process;
use std::time::{Duration, Instant};

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Character to optimize for.
    #[arg(short = 'C', long)]
    pub character: String,

    /// Wall-clock budget in seconds; the search is cancelled when exceeded.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    /// Write the ranked results to a CSV file.
    #[arg(long)]
    pub export: Option<String>,
}

pub fn run(args: OptimizeArgs, snapshot: &Snapshot, scorer: &Scorer) {
    let Some(character) = snapshot.roster.character(&args.character) else {
        eprintln!("❌ Unknown character '{}'. Roster:", args.character);
        for c in &snapshot.roster.characters {
            eprintln!("   - {}", c.name);
        }
        process::exit(1);
    };

    let constraints = SearchConstraints::from(&args.config.search);
    let cancel = CancelToken::new();

    // The engine has no internal timeout; the wall-clock budget is imposed
    // from outside through the cancellation token.
    if let Some(secs) = args.time {
        let token = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            token.cancel();
        });
    }

    println!(
        "\n🔎 Searching loadouts for {} (Lv.{})...",
        character.name, character.level
    );

    let progress = FnProgress(|update: &ProgressUpdate| {
        // One line per ~1M combinations keeps long searches visible
        // without flooding the terminal.
        if update.examined % (PROGRESS_INTERVAL * 100) == 0 {
            println!(
                "   ... {} / {} combinations, {} buffered",
                update.examined, update.total, update.buffered
            );
        }
    });

    let start = Instant::now();
    let optimizer = Optimizer::new(scorer, &snapshot.pool, character);
    let outcome = optimizer.run(&constraints, &progress, &cancel);

    println!(
        "\n=== 🏆 SEARCH {} ===",
        if outcome.cancelled {
            "CANCELLED"
        } else {
            "COMPLETE"
        }
    );
    println!(
        "Examined {} of {} combinations in {:.2}s",
        outcome.examined,
        outcome.total,
        start.elapsed().as_secs_f32()
    );

    if outcome.results.is_empty() {
        println!("No combination satisfies the constraints.");
        return;
    }

    reports::print_results_table(&outcome.results);
    reports::print_combination_detail(&outcome.results[0]);

    if let Some(path) = &args.export {
        match export_csv(path, &outcome.results) {
            Ok(()) => println!("💾 Exported {} rows to {}", outcome.results.len(), path),
            Err(e) => eprintln!("❌ Export failed: {}", e),
        }
    }
}

fn export_csv(path: &str, results: &[Combination]) -> FfResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "rank",
        "score",
        "slot1",
        "slot2",
        "slot3",
        "slot4",
        "slot5",
        "slot6",
        "atk",
        "def",
        "hp",
        "crit_rate",
        "crit_dmg",
        "effective_hp",
        "avg_dmg",
    ])?;

    for (rank, combo) in results.iter().enumerate() {
        let mut row = vec![(rank + 1).to_string(), format!("{:.1}", combo.score)];
        row.extend(combo.pieces.iter().map(|p| p.id.to_string()));
        row.extend([
            format!("{:.0}", combo.stats.atk),
            format!("{:.0}", combo.stats.def),
            format!("{:.0}", combo.stats.hp),
            format!("{:.1}", combo.stats.crit_rate),
            format!("{:.1}", combo.stats.crit_dmg),
            format!("{:.0}", combo.stats.effective_hp),
            format!("{:.0}", combo.stats.avg_dmg),
        ]);
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
