use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rayon::prelude::*;

pub mod results;

use results::{
    DiversityResult, SimilarityResult, StabilityResult, read_diversity, read_similarity,
    read_stability,
};

use crate::logging::RunContext;
use crate::model::profile::ScoringProfile;

pub const STAGE_STABILITY: &str = "stability";
pub const STAGE_SIMILARITY: &str = "similarity";
pub const STAGE_DIVERSITY: &str = "diversity";

pub const LOG_FOLDER_NAME: &str = "logs";
pub const RESULT_FOLDER_NAME: &str = "result";

const RESULT_SUFFIX: &str = ".json";

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct CharacterResults {
    pub stability: StabilityResult,
    pub similarity: SimilarityResult,
    pub diversity: DiversityResult,
}

#[derive(Debug, Clone)]
pub struct TeamSubmission {
    pub team: String,
    /// File names found under `<team>/stability`, sorted.
    pub stability_files: Vec<String>,
    /// File names found under `<team>/similarity`, sorted.
    pub similarity_files: Vec<String>,
    pub results: BTreeMap<String, CharacterResults>,
}

impl TeamSubmission {
    pub fn results_for(&self, character: &str) -> Option<&CharacterResults> {
        self.results.get(character)
    }

    /// Characters this team is scored on, in listing order.
    pub fn scored_characters(&self) -> Vec<String> {
        self.similarity_files
            .iter()
            .map(|f| character_id(f))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CompetitionInput {
    pub teams: Vec<TeamSubmission>,
}

/// Team folders in `source_dir`: visible directories other than the log and
/// result folders and anything in `excluded`, sorted by name.
pub fn list_teams(
    source_dir: &Path,
    excluded: &BTreeSet<String>,
) -> Result<Vec<String>, InputError> {
    if !source_dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "source folder {} does not exist",
            source_dir.display()
        )));
    }
    let mut teams = BTreeSet::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.')
            || name == LOG_FOLDER_NAME
            || name == RESULT_FOLDER_NAME
            || excluded.contains(&name)
        {
            continue;
        }
        teams.insert(name);
    }
    Ok(teams.into_iter().collect())
}

/// Visible regular files directly inside `dir`, sorted by name.
pub fn list_result_files(dir: &Path) -> Result<Vec<String>, InputError> {
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        files.insert(name);
    }
    Ok(files.into_iter().collect())
}

pub fn character_id(file_name: &str) -> String {
    file_name
        .strip_suffix(RESULT_SUFFIX)
        .unwrap_or(file_name)
        .to_string()
}

pub fn load_competition(
    ctx: &RunContext,
    profile: &ScoringProfile,
) -> Result<CompetitionInput, InputError> {
    let teams = list_teams(&ctx.source_dir, &ctx.owned_folders())?;
    tracing::info!(
        "discovered {} team folders in {}",
        teams.len(),
        ctx.source_dir.display()
    );

    let teams = teams
        .par_iter()
        .map(|team| load_team(ctx, profile, team))
        .collect::<Vec<_>>();

    Ok(CompetitionInput { teams })
}

pub fn load_team(ctx: &RunContext, profile: &ScoringProfile, team: &str) -> TeamSubmission {
    tracing::info!(team, "processing prompt");

    let stability_files = list_stage(ctx, team, STAGE_STABILITY);
    let similarity_files = list_stage(ctx, team, STAGE_SIMILARITY);

    let mut characters = profile.characters.iter().cloned().collect::<BTreeSet<_>>();
    for file in &similarity_files {
        characters.insert(character_id(file));
    }

    let mut results = BTreeMap::new();
    for character in characters {
        let diversity = if profile.diversity {
            read_diversity(ctx, team, &character)
        } else {
            DiversityResult::default()
        };
        let entry = CharacterResults {
            stability: read_stability(ctx, team, &character),
            similarity: read_similarity(ctx, team, &character),
            diversity,
        };
        results.insert(character, entry);
    }

    TeamSubmission {
        team: team.to_string(),
        stability_files,
        similarity_files,
        results,
    }
}

fn list_stage(ctx: &RunContext, team: &str, stage: &str) -> Vec<String> {
    let dir = ctx.stage_dir(team, stage);
    match list_result_files(&dir) {
        Ok(files) => files,
        Err(err) => {
            tracing::warn!(team, stage, "processing prompt failed: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
