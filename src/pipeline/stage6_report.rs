use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::decimal::Score;
use crate::model::profile::{ScoringProfile, WeightingMode};
use crate::model::weights::WeightTable;
use crate::pipeline::stage2_validate::InconsistentTeam;
use crate::pipeline::stage4_scores::Stage4Output;
use crate::pipeline::stage5_rank::Stage5Output;
use crate::report::json::render_constants_json;
use crate::report::text::render_report_text;
use crate::report::{LeaderboardSummary, RankedLine, csv_row, format_optional, format_score};

pub const CONSTANTS_FILE: &str = "constants.json";
pub const TRIAL_SCORES_FILE: &str = "trial_scores.csv";
pub const CHARACTER_SCORES_FILE: &str = "character_scores.csv";
pub const RANKS_FILE: &str = "prompt_scores_ranks.csv";
pub const REPORT_FILE: &str = "report.txt";

#[derive(Debug, Clone)]
pub struct Stage6Input<'a> {
    pub profile: &'a ScoringProfile,
    pub weights: &'a WeightTable,
    pub scores: &'a Stage4Output,
    pub ranking: &'a Stage5Output,
    pub skipped: &'a [InconsistentTeam],

    pub tool_name: String,
    pub tool_version: String,
}

/// Writes every artifact. Callers only get here once all scores are final.
pub fn write_reports(input: &Stage6Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    let json = render_constants_json(input.ranking.competition_score, input.weights)
        .map_err(std::io::Error::other)?;
    write_text(&out_dir.join(CONSTANTS_FILE), &json)?;

    write_trial_csv(input, &out_dir.join(TRIAL_SCORES_FILE))?;
    write_character_csv(input, &out_dir.join(CHARACTER_SCORES_FILE))?;
    write_ranks_csv(input, &out_dir.join(RANKS_FILE))?;

    let summary = build_summary(input);
    write_text(&out_dir.join(REPORT_FILE), &render_report_text(&summary))?;

    tracing::info!("results written to {}", out_dir.display());
    Ok(())
}

fn write_trial_csv(input: &Stage6Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(
        w,
        "teamName,character,trial,trial_Score,stabilityScore,similarityScore"
    )?;

    for team in &input.scores.teams {
        for t in &team.trials {
            let row = csv_row(&[
                t.team.clone(),
                t.character.clone(),
                t.trial.to_string(),
                format_optional(t.value),
                format_score(t.stability),
                format_score(t.similarity),
            ]);
            writeln!(w, "{}", row)?;
        }
    }

    w.flush()
}

fn write_character_csv(input: &Stage6Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let mut header = String::from(
        "teamName,character,characterScore,nonWeightedAverageStabilityScore,nonWeightedAverageSimilarityScore",
    );
    if input.profile.diversity {
        header.push_str(",diversityRate");
    }
    writeln!(w, "{}", header)?;

    for team in &input.scores.teams {
        for c in &team.characters {
            let mut fields = vec![
                c.team.clone(),
                c.character.clone(),
                format_score(c.value),
                format_score(c.avg_stability),
                format_score(c.avg_similarity),
            ];
            if input.profile.diversity {
                fields.push(format_optional(c.diversity));
            }
            writeln!(w, "{}", csv_row(&fields))?;
        }
    }

    w.flush()
}

fn write_ranks_csv(input: &Stage6Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "teamName,promptScore,normalizedPromptScore,rank")?;

    for r in &input.ranking.ranking {
        let row = csv_row(&[
            r.team.clone(),
            format_optional(r.prompt_score),
            format_score(r.normalized),
            r.rank.to_string(),
        ]);
        writeln!(w, "{}", row)?;
    }

    w.flush()
}

fn build_summary(input: &Stage6Input<'_>) -> LeaderboardSummary {
    let ranking = input
        .ranking
        .ranking
        .iter()
        .map(|r| RankedLine {
            team: r.team.clone(),
            prompt_score: format_optional(r.prompt_score),
            normalized: format_score(r.normalized),
            rank: r.rank,
        })
        .collect::<Vec<_>>();
    let normalized_total: Score = input.ranking.ranking.iter().map(|r| r.normalized).sum();

    LeaderboardSummary {
        tool_name: input.tool_name.clone(),
        tool_version: input.tool_version.clone(),

        n_teams: input.scores.teams.len(),
        n_characters: input.profile.characters.len(),
        trials: input.profile.trials,
        axes: input.profile.axis_names().to_vec(),
        weighting: match input.profile.weighting {
            WeightingMode::Weighted => "cross-team inverse average".to_string(),
            WeightingMode::Disabled => "disabled (all weights 1)".to_string(),
        },

        competition_score: format_score(input.ranking.competition_score),
        normalized_total: format_score(normalized_total),
        ranking,
        skipped: input.skipped.iter().map(|s| s.team.clone()).collect(),
    }
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
