use crate::model::decimal::Score;

/// Per-character multiplier shared by every team for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterWeight {
    pub character: String,
    pub stability: Score,
    pub similarity: Score,
    /// Present only when the diversity axis is enabled.
    pub diversity: Option<Score>,
    pub weight: Score,
}

#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    pub weights: Vec<CharacterWeight>,
}

impl WeightTable {
    pub fn get(&self, character: &str) -> Option<&CharacterWeight> {
        self.weights.iter().find(|w| w.character == character)
    }

    pub fn weight_of(&self, character: &str) -> Option<Score> {
        self.get(character).map(|w| w.weight)
    }
}
