use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::input::{STAGE_SIMILARITY, STAGE_STABILITY};
use crate::model::decimal::Score;
use crate::model::profile::{InconsistencyPolicy, WeightingMode};
use stage6_report::{CHARACTER_SCORES_FILE, CONSTANTS_FILE, RANKS_FILE, TRIAL_SCORES_FILE};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("pcg_pipeline_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn write_character(source: &Path, team: &str, character: &str, stability: &[f64], similarity: &[f64]) {
    let raws = stability
        .iter()
        .map(|v| format!("{{\"score\":{v}}}"))
        .collect::<Vec<_>>()
        .join(",");
    let trials = similarity
        .iter()
        .map(|v| format!("{{\"similarity\":{v}}}"))
        .collect::<Vec<_>>()
        .join(",");
    write_file(
        &source
            .join(team)
            .join(STAGE_STABILITY)
            .join(format!("{character}.json")),
        &format!("{{\"raws\":[{raws}]}}"),
    );
    write_file(
        &source
            .join(team)
            .join(STAGE_SIMILARITY)
            .join(format!("{character}.json")),
        &format!("{{\"trials\":[{trials}]}}"),
    );
}

fn two_team_source() -> PathBuf {
    let source = make_temp_dir();
    write_character(&source, "A", "X", &[1.0, 1.0], &[1.0, 1.0]);
    write_character(&source, "B", "X", &[0.0, 0.0], &[0.0, 0.0]);
    source
}

fn profile(trials: u32) -> ScoringProfile {
    let mut p = ScoringProfile::default_v1();
    p.characters = vec!["X".to_string()];
    p.trials = trials;
    p
}

fn ctx(source: &Path) -> RunContext {
    RunContext::with_start(source, None, "test".to_string())
}

#[test]
fn test_two_team_competition_with_disabled_weights() {
    let source = two_team_source();
    let mut p = profile(2);
    p.weighting = WeightingMode::Disabled;

    let out = run_competition(&ctx(&source), &p).unwrap();
    assert_eq!(out.ranking.competition_score, Score::ONE);
    assert_eq!(out.ranking.ranking[0].team, "A");
    assert_eq!(out.ranking.ranking[0].normalized, Score::HUNDRED);
    assert_eq!(out.ranking.ranking[0].rank, 1);
    assert_eq!(out.ranking.ranking[1].team, "B");
    assert_eq!(out.ranking.ranking[1].normalized, Score::ZERO);
    assert_eq!(out.ranking.ranking[1].rank, 2);

    let ranks = fs::read_to_string(source.join("result").join(RANKS_FILE)).unwrap();
    assert_eq!(
        ranks,
        "teamName,promptScore,normalizedPromptScore,rank\nA,1,100,1\nB,0,0,2\n"
    );
}

#[test]
fn test_weighted_scenario_uses_cross_team_averages() {
    let source = two_team_source();
    let mut p = profile(2);
    p.characters = vec!["X".to_string(), "Y".to_string()];
    let out = score_competition(&ctx(&source), &p).unwrap();

    // Averages of 0.5 over 2 teams x 2 trials sit exactly on the 1/2 floor.
    let w = out.weights.get("X").unwrap();
    assert_eq!(w.stability.render(), "0.5");
    assert_eq!(w.similarity.render(), "0.5");
    assert_eq!(w.weight.render(), "0.25");

    let team_a = &out.scores.teams[0];
    assert_eq!(team_a.prompt.team, "A");
    assert_eq!(team_a.characters[0].value.render(), "0.25");
    assert_eq!(out.ranking.ranking[0].normalized, Score::HUNDRED);

    // No team submitted Y, so its average is zero and its weight is 1.
    assert_eq!(out.weights.get("Y").unwrap().weight, Score::ONE);
}

#[test]
fn test_reruns_produce_identical_outputs() {
    let source = two_team_source();
    let first = make_temp_dir().join("first");
    let second = make_temp_dir().join("second");
    let p = profile(2);

    run_competition(&RunContext::with_start(&source, Some(&first), "1".into()), &p).unwrap();
    run_competition(&RunContext::with_start(&source, Some(&second), "2".into()), &p).unwrap();

    for name in [CONSTANTS_FILE, TRIAL_SCORES_FILE, CHARACTER_SCORES_FILE, RANKS_FILE] {
        assert_eq!(
            fs::read(first.join(name)).unwrap(),
            fs::read(second.join(name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn test_out_dir_inside_source_is_not_a_team_on_rerun() {
    let source = two_team_source();
    let out = source.join("leaderboard");
    let run_ctx = RunContext::with_start(&source, Some(&out), "1".into());
    let p = profile(2);

    let first = run_competition(&run_ctx, &p).unwrap();
    let first_ranks = fs::read(out.join(RANKS_FILE)).unwrap();
    let first_constants = fs::read(out.join(CONSTANTS_FILE)).unwrap();

    let second = run_competition(&run_ctx, &p).unwrap();
    let teams = |o: &RunOutput| {
        o.ranking
            .ranking
            .iter()
            .map(|r| r.team.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(teams(&first), vec!["A", "B"]);
    assert_eq!(teams(&second), vec!["A", "B"]);
    assert_eq!(fs::read(out.join(RANKS_FILE)).unwrap(), first_ranks);
    assert_eq!(fs::read(out.join(CONSTANTS_FILE)).unwrap(), first_constants);
}

#[test]
fn test_inconsistent_team_aborts_without_outputs() {
    let source = two_team_source();
    write_file(
        &source.join("B").join(STAGE_STABILITY).join("Y.json"),
        "{\"raws\":[]}",
    );

    let err = run_competition(&ctx(&source), &profile(2)).unwrap_err();
    assert!(matches!(
        err,
        ScoringError::InconsistentTeamData { ref team, stability: 2, similarity: 1 } if team == "B"
    ));
    assert!(!source.join("result").exists());
}

#[test]
fn test_inconsistent_team_can_be_skipped() {
    let source = two_team_source();
    write_file(
        &source.join("B").join(STAGE_STABILITY).join("Y.json"),
        "{\"raws\":[]}",
    );
    let mut p = profile(2);
    p.inconsistency = InconsistencyPolicy::SkipTeam;

    let out = run_competition(&ctx(&source), &p).unwrap();
    assert_eq!(out.scores.teams.len(), 1);
    assert_eq!(out.skipped[0].team, "B");
    assert_eq!(out.ranking.ranking[0].normalized, Score::HUNDRED);
}

#[test]
fn test_missing_source_is_an_input_error() {
    let source = make_temp_dir().join("absent");
    let err = score_competition(&ctx(&source), &profile(2)).unwrap_err();
    assert!(matches!(err, ScoringError::Input(_)));
}

#[test]
fn test_invalid_profile_is_a_usage_error() {
    let source = two_team_source();
    let err = score_competition(&ctx(&source), &profile(0)).unwrap_err();
    assert!(matches!(err, ScoringError::Usage(_)));
}

#[test]
fn test_empty_competition_writes_headers_only() {
    let source = make_temp_dir();
    let out = run_competition(&ctx(&source), &profile(2)).unwrap();
    assert!(out.scores.teams.is_empty());
    assert_eq!(out.ranking.competition_score, Score::ZERO);

    let ranks = fs::read_to_string(source.join("result").join(RANKS_FILE)).unwrap();
    assert_eq!(ranks, "teamName,promptScore,normalizedPromptScore,rank\n");
}
