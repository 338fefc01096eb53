use crate::reports;
use clap::Args;
use fragforge::config::Config;
use fragforge::model::Fragment;
use fragforge::snapshot::Snapshot;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: Config,

    /// Show only this slot (1-6).
    #[arg(long)]
    pub slot: Option<u8>,

    /// Show only fragments equipped to this character.
    #[arg(short = 'C', long)]
    pub character: Option<String>,
}

pub fn run(args: InspectArgs, snapshot: &Snapshot) {
    println!("\n📸 Capture: {}", snapshot.capture_time);
    reports::print_user_summary(&snapshot.roster.user);
    reports::print_roster_table(&snapshot.roster);

    let mut fragments: Vec<&Fragment> = snapshot
        .pool
        .fragments
        .iter()
        .filter(|f| f.rarity >= args.config.search.min_rarity)
        .filter(|f| args.slot.map(|s| f.slot == s).unwrap_or(true))
        .filter(|f| match &args.character {
            Some(name) => f.wearer.as_deref() == Some(name.as_str()),
            None => true,
        })
        .collect();

    fragments.sort_by(|a, b| b.gear_score.total_cmp(&a.gear_score));
    reports::print_fragment_table(&fragments);
}
