use crate::model::decimal::Score;
use crate::model::scores::{PromptScore, RankedPrompt};

#[derive(Debug, Clone)]
pub struct Stage5Output {
    pub competition_score: Score,
    pub ranking: Vec<RankedPrompt>,
}

pub fn run_stage5(prompts: &[PromptScore]) -> Stage5Output {
    let competition_score = competition_score(prompts);
    tracing::info!("competition_score: {competition_score}");

    let ranking = rank_prompts(prompts, competition_score);
    for r in &ranking {
        tracing::info!(
            team = r.team.as_str(),
            "normalized_prompt_score: {} - rank: {}",
            r.normalized,
            r.rank
        );
    }

    Stage5Output {
        competition_score,
        ranking,
    }
}

pub fn competition_score(prompts: &[PromptScore]) -> Score {
    prompts.iter().map(|p| Score::or_zero(p.value)).sum()
}

/// Percentage share of the competition total, ranked descending. Ties keep
/// input order; a zero total divides by one instead.
pub fn rank_prompts(prompts: &[PromptScore], competition_score: Score) -> Vec<RankedPrompt> {
    let divisor = if competition_score.is_zero() {
        Score::ONE
    } else {
        competition_score
    };

    let mut entries = prompts
        .iter()
        .map(|p| {
            let share = Score::or_zero(p.value)
                .checked_div(divisor)
                .unwrap_or(Score::ZERO);
            (p, share * Score::HUNDRED)
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (p, normalized))| RankedPrompt {
            team: p.team.clone(),
            prompt_score: p.value,
            normalized,
            rank: i + 1,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_rank.rs"]
mod tests;
