use rayon::prelude::*;

use crate::input::{CharacterResults, TeamSubmission};
use crate::model::decimal::Score;
use crate::model::profile::{ScoringProfile, WeightingMode};
use crate::model::weights::{CharacterWeight, WeightTable};

/// Derives one weight per configured character from every team's raw data.
/// Must finish before any trial is scored.
pub fn run_stage3(teams: &[TeamSubmission], profile: &ScoringProfile) -> WeightTable {
    let floor = weight_floor(profile.characters.len());

    let weights = profile
        .characters
        .par_iter()
        .map(|character| character_weight(teams, character, profile, floor))
        .collect::<Vec<_>>();

    for w in &weights {
        tracing::info!(
            character = w.character.as_str(),
            "weight: {} - weightStability: {} - weightSimilarity: {} - weightDiversity: {}",
            w.weight,
            w.stability,
            w.similarity,
            w.diversity.map(|d| d.render()).unwrap_or_else(|| "-".to_string())
        );
    }

    WeightTable { weights }
}

/// `1 / n_characters`; keeps every axis weight above zero.
pub fn weight_floor(n_characters: usize) -> Score {
    Score::ONE
        .checked_div(Score::from_count(n_characters))
        .unwrap_or(Score::ZERO)
}

pub fn axis_weight(average: Score, floor: Score) -> Score {
    (Score::ONE - average).max(floor)
}

fn character_weight(
    teams: &[TeamSubmission],
    character: &str,
    profile: &ScoringProfile,
    floor: Score,
) -> CharacterWeight {
    if profile.weighting == WeightingMode::Disabled {
        return CharacterWeight {
            character: character.to_string(),
            stability: Score::ONE,
            similarity: Score::ONE,
            diversity: profile.diversity.then_some(Score::ONE),
            weight: Score::ONE,
        };
    }

    let trial_slots = teams.len() * profile.trials as usize;

    let stability = axis_weight(
        average_over(teams, character, trial_slots, |r| r.stability.total()),
        floor,
    );
    let similarity = axis_weight(
        average_over(teams, character, trial_slots, |r| r.similarity.total()),
        floor,
    );
    let diversity = profile.diversity.then(|| {
        axis_weight(
            average_over(teams, character, teams.len(), |r| r.diversity.diversity_rate),
            floor,
        )
    });

    let mut weight = stability * similarity;
    if let Some(d) = diversity {
        weight = weight * d;
    }

    CharacterWeight {
        character: character.to_string(),
        stability,
        similarity,
        diversity,
        weight,
    }
}

/// Sum of `pick` over all teams divided by `slots`; zero when there are no slots.
fn average_over(
    teams: &[TeamSubmission],
    character: &str,
    slots: usize,
    pick: impl Fn(&CharacterResults) -> Score,
) -> Score {
    let sum: Score = teams
        .iter()
        .map(|t| t.results_for(character).map(&pick).unwrap_or(Score::ZERO))
        .sum();
    sum.checked_div(Score::from_count(slots))
        .unwrap_or(Score::ZERO)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_weights.rs"]
mod tests;
