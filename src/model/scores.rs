use crate::model::decimal::Score;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialScore {
    pub team: String,
    pub character: String,
    /// 1-based.
    pub trial: u32,
    /// `None` when the character has no registered weight.
    pub value: Option<Score>,
    pub stability: Score,
    pub similarity: Score,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterScore {
    pub team: String,
    pub character: String,
    pub value: Score,
    pub avg_stability: Score,
    pub avg_similarity: Score,
    pub diversity: Option<Score>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptScore {
    pub team: String,
    /// `None` when no character was scored for the team.
    pub value: Option<Score>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPrompt {
    pub team: String,
    pub prompt_score: Option<Score>,
    pub normalized: Score,
    pub rank: usize,
}
