use crate::report::{LeaderboardSummary, RankedLine};

pub fn render_report_text(summary: &LeaderboardSummary) -> String {
    let mut out = String::new();

    out.push_str("Competition Leaderboard Report\n");
    out.push_str("==============================\n\n");

    out.push_str("1. Scoring profile\n");
    out.push_str(&format!(
        "Tool: {} {}\n",
        summary.tool_name, summary.tool_version
    ));
    out.push_str(&format!("Axes: {}\n", summary.axes.join(", ")));
    out.push_str(&format!("Weighting: {}\n", summary.weighting));
    out.push_str(&format!(
        "Trials per character: {}\nCharacters: {}\n\n",
        summary.trials, summary.n_characters
    ));

    out.push_str("2. Competition\n");
    out.push_str(&format!("Teams scored: {}\n", summary.n_teams));
    out.push_str(&format!(
        "Competition score: {}\n",
        summary.competition_score
    ));
    out.push_str(&format!(
        "Normalized total: {}\n\n",
        summary.normalized_total
    ));

    out.push_str("3. Ranking\n");
    if summary.ranking.is_empty() {
        out.push_str("No teams were scored.\n");
    }
    let width = team_column_width(&summary.ranking);
    for line in &summary.ranking {
        out.push_str(&format!(
            "{:>4}  {:<width$}  {}  (prompt score {})\n",
            line.rank, line.team, line.normalized, line.prompt_score
        ));
    }

    if !summary.skipped.is_empty() {
        out.push_str("\n4. Skipped teams\n");
        for team in &summary.skipped {
            out.push_str(&format!("{team}: stability/similarity file counts differ\n"));
        }
    }

    out
}

fn team_column_width(ranking: &[RankedLine]) -> usize {
    ranking.iter().map(|l| l.team.chars().count()).max().unwrap_or(0)
}
