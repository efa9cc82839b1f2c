pub mod stage2_validate;
pub mod stage3_weights;
pub mod stage4_scores;
pub mod stage5_rank;
pub mod stage6_report;

use crate::input::{InputError, load_competition};
use crate::logging::RunContext;
use crate::model::profile::ScoringProfile;
use crate::model::weights::WeightTable;
use stage2_validate::{InconsistentTeam, run_stage2};
use stage3_weights::run_stage3;
use stage4_scores::{Stage4Output, run_stage4};
use stage5_rank::{Stage5Output, run_stage5};
use stage6_report::{Stage6Input, write_reports};

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("usage error: {0}")]
    Usage(String),
    #[error(
        "inconsistent team data for {team}: {stability} stability files vs {similarity} similarity files"
    )]
    InconsistentTeamData {
        team: String,
        stability: usize,
        similarity: usize,
    },
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub weights: WeightTable,
    pub scores: Stage4Output,
    pub ranking: Stage5Output,
    pub skipped: Vec<InconsistentTeam>,
}

/// Runs every stage in memory; nothing is written.
pub fn score_competition(
    ctx: &RunContext,
    profile: &ScoringProfile,
) -> Result<RunOutput, ScoringError> {
    profile.validate()?;

    let input = load_competition(ctx, profile)?;
    let stage2 = run_stage2(&input, profile)?;
    let weights = run_stage3(&input.teams, profile);
    let scores = run_stage4(&stage2.teams, &weights, profile);
    let ranking = run_stage5(&scores.prompt_scores());

    Ok(RunOutput {
        weights,
        scores,
        ranking,
        skipped: stage2.skipped,
    })
}

/// Scores the competition and, only if that fully succeeds, writes the reports.
pub fn run_competition(
    ctx: &RunContext,
    profile: &ScoringProfile,
) -> Result<RunOutput, ScoringError> {
    let output = score_competition(ctx, profile)?;

    let input = Stage6Input {
        profile,
        weights: &output.weights,
        scores: &output.scores,
        ranking: &output.ranking,
        skipped: &output.skipped,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    write_reports(&input, &ctx.out_dir)?;

    Ok(output)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
