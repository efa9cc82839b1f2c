mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::{RunContext, init_logging};
use crate::model::profile::{
    DEFAULT_TRIALS, InconsistencyPolicy, ScoringProfile, WeightingMode, default_characters,
    parse_character_list,
};
use crate::pipeline::{ScoringError, run_competition};

/// Scores and ranks a character-generation competition from per-team result folders.
#[derive(Debug, Parser)]
#[command(name = "pcg-leaderboard", version, about)]
struct Cli {
    /// Console verbosity (-v debug, -vv trace); RUST_LOG applies otherwise.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every team folder under --source and write the result tables.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Competition folder holding one sub-folder per team.
    #[arg(short, long)]
    source: PathBuf,

    /// Output folder (default: <source>/result).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Trials per character; also the divisor of every character mean.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: u32,

    /// Comma-separated character ids (default: A..Z).
    #[arg(long)]
    characters: Option<String>,

    /// Include the diversity axis in weights and character scores.
    #[arg(long)]
    diversity: bool,

    /// Fix every weight to 1.
    #[arg(long)]
    disable_weights: bool,

    /// Exclude teams whose stability/similarity file counts differ instead of aborting.
    #[arg(long)]
    skip_inconsistent_teams: bool,
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;

    let profile = build_profile(&args);
    if let Err(err) = check_usage(&args, &profile) {
        eprintln!("{err}");
        std::process::exit(2);
    }

    let ctx = RunContext::new(&args.source, args.out.as_deref());
    if let Err(err) = init_logging(&ctx, cli.verbose) {
        eprintln!("failed to open run log: {err}");
        std::process::exit(1);
    }

    match run_competition(&ctx, &profile) {
        Ok(output) => {
            tracing::info!(
                "scored {} teams; competition score {}",
                output.scores.teams.len(),
                output.ranking.competition_score
            );
        }
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
}

fn build_profile(args: &RunArgs) -> ScoringProfile {
    let mut profile = if args.diversity {
        ScoringProfile::with_diversity()
    } else {
        ScoringProfile::default_v1()
    };
    profile.trials = args.trials;
    profile.characters = args
        .characters
        .as_deref()
        .map(parse_character_list)
        .unwrap_or_else(default_characters);
    if args.disable_weights {
        profile.weighting = WeightingMode::Disabled;
    }
    if args.skip_inconsistent_teams {
        profile.inconsistency = InconsistencyPolicy::SkipTeam;
    }
    profile
}

/// Rejects unusable invocations before anything touches the source folder.
fn check_usage(args: &RunArgs, profile: &ScoringProfile) -> Result<(), ScoringError> {
    if !args.source.is_dir() {
        return Err(ScoringError::Usage(format!(
            "source folder {} does not exist",
            args.source.display()
        )));
    }
    profile.validate()
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
