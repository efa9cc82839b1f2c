use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::input::{InputError, STAGE_DIVERSITY, STAGE_SIMILARITY, STAGE_STABILITY};
use crate::logging::RunContext;
use crate::model::decimal::{Score, deserialize_lenient};

/// `{ dataCount, rate, raws: [{ tag, score }] }`; only the per-trial scores are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StabilityResult {
    #[serde(default)]
    pub raws: Vec<StabilityRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StabilityRaw {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub score: Score,
}

/// `{ count, similarityRate, trials: [{ id, label, similarity }], similarities }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarityResult {
    #[serde(default)]
    pub trials: Vec<SimilarityTrial>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarityTrial {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub similarity: Score,
}

/// `{ count, diversityRate, trials, diversities }`; only the rate matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiversityResult {
    #[serde(
        rename = "diversityRate",
        default,
        deserialize_with = "deserialize_lenient"
    )]
    pub diversity_rate: Score,
}

impl StabilityResult {
    #[cfg(test)]
    pub fn from_scores(scores: &[Score]) -> Self {
        Self {
            raws: scores.iter().map(|&score| StabilityRaw { score }).collect(),
        }
    }

    /// Zero-based trial lookup; absent trials are zero.
    pub fn trial(&self, index: usize) -> Score {
        self.raws.get(index).map(|r| r.score).unwrap_or(Score::ZERO)
    }

    pub fn total(&self) -> Score {
        self.raws.iter().map(|r| r.score).sum()
    }
}

impl SimilarityResult {
    #[cfg(test)]
    pub fn from_scores(scores: &[Score]) -> Self {
        Self {
            trials: scores
                .iter()
                .map(|&similarity| SimilarityTrial { similarity })
                .collect(),
        }
    }

    pub fn trial(&self, index: usize) -> Score {
        self.trials
            .get(index)
            .map(|t| t.similarity)
            .unwrap_or(Score::ZERO)
    }

    pub fn total(&self) -> Score {
        self.trials.iter().map(|t| t.similarity).sum()
    }
}

impl DiversityResult {
    #[cfg(test)]
    pub fn from_rate(rate: Score) -> Self {
        Self {
            diversity_rate: rate,
        }
    }
}

pub fn read_stability(ctx: &RunContext, team: &str, character: &str) -> StabilityResult {
    read_or_default(ctx, team, STAGE_STABILITY, character)
}

pub fn read_similarity(ctx: &RunContext, team: &str, character: &str) -> SimilarityResult {
    read_or_default(ctx, team, STAGE_SIMILARITY, character)
}

pub fn read_diversity(ctx: &RunContext, team: &str, character: &str) -> DiversityResult {
    read_or_default(ctx, team, STAGE_DIVERSITY, character)
}

pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn read_or_default<T: DeserializeOwned + Default>(
    ctx: &RunContext,
    team: &str,
    stage: &str,
    character: &str,
) -> T {
    let path = ctx.result_path(team, stage, character);
    match read_document(&path) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(
                team,
                character,
                axis = stage,
                "processing {stage} failed ({}): {err}; using zero default",
                path.display()
            );
            T::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/results.rs"]
mod tests;
