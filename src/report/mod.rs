pub mod json;
pub mod text;

use crate::model::decimal::Score;

#[derive(Debug, Clone)]
pub struct RankedLine {
    pub team: String,
    pub prompt_score: String,
    pub normalized: String,
    pub rank: usize,
}

#[derive(Debug, Clone)]
pub struct LeaderboardSummary {
    pub tool_name: String,
    pub tool_version: String,

    pub n_teams: usize,
    pub n_characters: usize,
    pub trials: u32,
    pub axes: Vec<&'static str>,
    pub weighting: String,

    pub competition_score: String,
    pub normalized_total: String,
    pub ranking: Vec<RankedLine>,
    pub skipped: Vec<String>,
}

pub fn format_score(v: Score) -> String {
    v.render()
}

pub fn format_optional(v: Option<Score>) -> String {
    Score::or_zero(v).render()
}

/// Quotes a field only when it holds a delimiter, a quote or a line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
