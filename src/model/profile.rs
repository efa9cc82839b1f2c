use crate::pipeline::ScoringError;

pub const DEFAULT_TRIALS: u32 = 10;

#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub trials: u32,
    pub characters: Vec<String>,
    pub diversity: bool,
    pub weighting: WeightingMode,
    pub inconsistency: InconsistencyPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingMode {
    Weighted,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistencyPolicy {
    Abort,
    SkipTeam,
}

impl ScoringProfile {
    pub fn default_v1() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            characters: default_characters(),
            diversity: false,
            weighting: WeightingMode::Weighted,
            inconsistency: InconsistencyPolicy::Abort,
        }
    }

    pub fn with_diversity() -> Self {
        let mut base = Self::default_v1();
        base.diversity = true;
        base
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.trials == 0 {
            return Err(ScoringError::Usage("trial count must be at least 1".to_string()));
        }
        if self.characters.is_empty() {
            return Err(ScoringError::Usage("character list is empty".to_string()));
        }
        for (i, c) in self.characters.iter().enumerate() {
            if c.trim().is_empty() {
                return Err(ScoringError::Usage("character list contains an empty id".to_string()));
            }
            if self.characters[..i].contains(c) {
                return Err(ScoringError::Usage(format!("duplicate character id: {c}")));
            }
        }
        Ok(())
    }

    pub fn axis_names(&self) -> &'static [&'static str] {
        if self.diversity {
            &["stability", "similarity", "diversity"]
        } else {
            &["stability", "similarity"]
        }
    }
}

/// The fixed character set of the competition: the upper-case Latin alphabet.
pub fn default_characters() -> Vec<String> {
    ('A'..='Z').map(|c| c.to_string()).collect()
}

pub fn parse_character_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
