use serde::Serialize;

use crate::model::decimal::Score;
use crate::model::weights::{CharacterWeight, WeightTable};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConstantsDoc {
    competition_score: String,
    weights: Vec<WeightEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeightEntry {
    character: String,
    weight: String,
    weight_stability: String,
    weight_similarity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_diversity: Option<String>,
}

impl From<&CharacterWeight> for WeightEntry {
    fn from(w: &CharacterWeight) -> Self {
        Self {
            character: w.character.clone(),
            weight: w.weight.render(),
            weight_stability: w.stability.render(),
            weight_similarity: w.similarity.render(),
            weight_diversity: w.diversity.map(|d| d.render()),
        }
    }
}

/// Competition score and weight set, every number as a decimal string.
pub fn render_constants_json(
    competition_score: Score,
    weights: &WeightTable,
) -> serde_json::Result<String> {
    let doc = ConstantsDoc {
        competition_score: competition_score.render(),
        weights: weights.weights.iter().map(WeightEntry::from).collect(),
    };
    serde_json::to_string(&doc)
}
