use crate::input::{CompetitionInput, TeamSubmission};
use crate::model::profile::{InconsistencyPolicy, ScoringProfile};
use crate::pipeline::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamCheck {
    Consistent,
    /// Neither stage folder holds any result file.
    Empty,
    Mismatch { stability: usize, similarity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InconsistentTeam {
    pub team: String,
    pub stability: usize,
    pub similarity: usize,
}

#[derive(Debug)]
pub struct Stage2Output<'a> {
    pub teams: Vec<&'a TeamSubmission>,
    pub skipped: Vec<InconsistentTeam>,
}

pub fn check_team(team: &TeamSubmission) -> TeamCheck {
    let stability = team.stability_files.len();
    let similarity = team.similarity_files.len();
    if stability != similarity {
        TeamCheck::Mismatch {
            stability,
            similarity,
        }
    } else if stability == 0 {
        TeamCheck::Empty
    } else {
        TeamCheck::Consistent
    }
}

pub fn run_stage2<'a>(
    input: &'a CompetitionInput,
    profile: &ScoringProfile,
) -> Result<Stage2Output<'a>, ScoringError> {
    let mut teams = Vec::with_capacity(input.teams.len());
    let mut skipped = Vec::new();

    for team in &input.teams {
        match check_team(team) {
            TeamCheck::Consistent => teams.push(team),
            TeamCheck::Empty => {
                tracing::warn!(
                    team = team.team.as_str(),
                    "stability files or similarity files do not exist"
                );
                teams.push(team);
            }
            TeamCheck::Mismatch {
                stability,
                similarity,
            } => {
                tracing::error!(
                    team = team.team.as_str(),
                    "number of stability files ({stability}) and similarity files ({similarity}) are not equal"
                );
                match profile.inconsistency {
                    InconsistencyPolicy::Abort => {
                        return Err(ScoringError::InconsistentTeamData {
                            team: team.team.clone(),
                            stability,
                            similarity,
                        });
                    }
                    InconsistencyPolicy::SkipTeam => skipped.push(InconsistentTeam {
                        team: team.team.clone(),
                        stability,
                        similarity,
                    }),
                }
            }
        }
    }

    Ok(Stage2Output { teams, skipped })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_validate.rs"]
mod tests;
