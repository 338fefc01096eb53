use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use fragforge::catalog::Catalog;
use fragforge::config::PriorityWeights;
use fragforge::scorer::Scorer;
use fragforge::snapshot;
use std::process;
use std::sync::Arc;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/snapshot.json")]
    snapshot: String,

    #[arg(global = true, short = 'c', long)]
    catalog: Option<String>,

    #[arg(global = true, long)]
    weights: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Inspect(cmd::inspect::InspectArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    // 1. Parse raw matches first to distinguish user input from defaults.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    println!("\n🚀 Initializing FragForge Core...");

    // 2. Reference catalog: builtin tables unless a JSON override is given.
    let catalog = match &cli.catalog {
        Some(path) => {
            println!("📂 Loading Catalog: {}", path);
            match Catalog::load_from_file(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    process::exit(1);
                }
            }
        }
        None => Catalog::builtin(),
    };
    let catalog = Arc::new(catalog);

    // 3. Resolve weights: JSON profile as base, explicit CLI flags override.
    let (mut config, cli_weights_ref, sub_matches) = match &cli.command {
        Commands::Optimize(args) => (
            args.config.clone(),
            &args.config.weights,
            matches.subcommand_matches("optimize").unwrap(),
        ),
        Commands::Inspect(args) => (
            args.config.clone(),
            &args.config.weights,
            matches.subcommand_matches("inspect").unwrap(),
        ),
    };

    if let Some(path) = &cli.weights {
        println!("⚖️  Loading Weights from: {}", path);
        match PriorityWeights::load_from_file(path) {
            Ok(mut file_weights) => {
                file_weights.merge_from_cli(cli_weights_ref, sub_matches);
                config.weights = file_weights;
            }
            Err(e) => {
                eprintln!("❌ Failed to load weights: {}", e);
                process::exit(1);
            }
        }
    }

    // 4. Load and score the snapshot.
    println!("📂 Loading Snapshot: {}", cli.snapshot);
    let mut snap = match snapshot::load_from_file(&cli.snapshot, &catalog) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("\n❌ FATAL ERROR LOADING SNAPSHOT:");
            eprintln!("   {}", e);
            process::exit(1);
        }
    };

    let scorer = Scorer::new(catalog, config.weights.clone());
    scorer.rescore_pool(&mut snap.pool);

    // 5. Execute.
    match cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args, &snap, &scorer),
        Commands::Inspect(args) => cmd::inspect::run(args, &snap),
    }
}
