use rayon::prelude::*;

use crate::input::{CharacterResults, TeamSubmission};
use crate::model::decimal::Score;
use crate::model::profile::ScoringProfile;
use crate::model::scores::{CharacterScore, PromptScore, TrialScore};
use crate::model::weights::WeightTable;

#[derive(Debug, Clone)]
pub struct TeamScores {
    pub trials: Vec<TrialScore>,
    pub characters: Vec<CharacterScore>,
    pub prompt: PromptScore,
}

#[derive(Debug, Clone)]
pub struct Stage4Output {
    pub teams: Vec<TeamScores>,
}

impl Stage4Output {
    pub fn prompt_scores(&self) -> Vec<PromptScore> {
        self.teams.iter().map(|t| t.prompt.clone()).collect()
    }
}

pub fn run_stage4(
    teams: &[&TeamSubmission],
    weights: &WeightTable,
    profile: &ScoringProfile,
) -> Stage4Output {
    let teams = teams
        .par_iter()
        .map(|team| score_team(team, weights, profile))
        .collect::<Vec<_>>();
    Stage4Output { teams }
}

pub fn score_team(
    team: &TeamSubmission,
    weights: &WeightTable,
    profile: &ScoringProfile,
) -> TeamScores {
    let empty = CharacterResults::default();
    let mut trials = Vec::new();
    let mut characters = Vec::new();

    for character in team.scored_characters() {
        let results = team.results_for(&character).unwrap_or(&empty);
        let weight = weights.weight_of(&character);

        let mut values = Vec::with_capacity(profile.trials as usize);
        let mut stabilities = Vec::with_capacity(profile.trials as usize);
        let mut similarities = Vec::with_capacity(profile.trials as usize);

        for i in 0..profile.trials as usize {
            let stability = results.stability.trial(i);
            let similarity = results.similarity.trial(i);
            let value = trial_score(weight, stability, similarity);
            tracing::debug!(
                team = team.team.as_str(),
                character = character.as_str(),
                trial = i + 1,
                "stability: {stability} - similarity: {similarity} - trial_score: {}",
                render_optional(value)
            );
            trials.push(TrialScore {
                team: team.team.clone(),
                character: character.clone(),
                trial: (i + 1) as u32,
                value,
                stability,
                similarity,
            });
            values.push(value);
            stabilities.push(stability);
            similarities.push(similarity);
        }

        let avg_stability = non_weighted_average(&stabilities, profile.trials);
        let avg_similarity = non_weighted_average(&similarities, profile.trials);
        tracing::debug!(
            team = team.team.as_str(),
            character = character.as_str(),
            "average stability: {avg_stability} - average similarity: {avg_similarity}"
        );

        let diversity = profile
            .diversity
            .then_some(results.diversity.diversity_rate);
        let value = character_score(&values, profile.trials, diversity);
        tracing::info!(
            team = team.team.as_str(),
            character = character.as_str(),
            "character_score: {value}"
        );

        characters.push(CharacterScore {
            team: team.team.clone(),
            character,
            value,
            avg_stability,
            avg_similarity,
            diversity,
        });
    }

    let prompt = PromptScore {
        team: team.team.clone(),
        value: prompt_score(&characters),
    };
    tracing::info!(
        team = team.team.as_str(),
        "prompt_score: {}",
        render_optional(prompt.value)
    );

    TeamScores {
        trials,
        characters,
        prompt,
    }
}

/// `weight * stability * similarity`, undefined without a weight.
pub fn trial_score(weight: Option<Score>, stability: Score, similarity: Score) -> Option<Score> {
    weight.map(|w| w * stability * similarity)
}

/// Mean over the configured trial count, so absent trials pull the score down.
pub fn character_score(trials: &[Option<Score>], n_trials: u32, diversity: Option<Score>) -> Score {
    let sum: Score = trials.iter().map(|&v| Score::or_zero(v)).sum();
    let mean = sum
        .checked_div(Score::from_count(n_trials as usize))
        .unwrap_or(Score::ZERO);
    match diversity {
        Some(d) => mean * d,
        None => mean,
    }
}

/// Mean over the characters actually scored; undefined for a team with none.
pub fn prompt_score(characters: &[CharacterScore]) -> Option<Score> {
    let sum: Score = characters.iter().map(|c| c.value).sum();
    sum.checked_div(Score::from_count(characters.len()))
}

pub fn non_weighted_average(values: &[Score], n_trials: u32) -> Score {
    let sum: Score = values.iter().sum();
    sum.checked_div(Score::from_count(n_trials as usize))
        .unwrap_or(Score::ZERO)
}

pub fn render_optional(value: Option<Score>) -> String {
    Score::or_zero(value).render()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_scores.rs"]
mod tests;
