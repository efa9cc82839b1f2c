use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::scores::{CharacterScore, PromptScore, RankedPrompt, TrialScore};
use crate::model::weights::CharacterWeight;
use crate::pipeline::stage4_scores::TeamScores;
use rust_decimal_macros::dec;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("pcg_report_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn weights(diversity: bool) -> WeightTable {
    WeightTable {
        weights: vec![CharacterWeight {
            character: "A".to_string(),
            stability: Score::new(dec!(0.5)),
            similarity: Score::ONE,
            diversity: diversity.then_some(Score::ONE),
            weight: Score::new(dec!(0.5)),
        }],
    }
}

fn scores(diversity: bool) -> Stage4Output {
    let team = |name: &str, v: Score| TeamScores {
        trials: vec![TrialScore {
            team: name.to_string(),
            character: "A".to_string(),
            trial: 1,
            value: Some(v),
            stability: Score::ONE,
            similarity: v,
        }],
        characters: vec![CharacterScore {
            team: name.to_string(),
            character: "A".to_string(),
            value: v,
            avg_stability: Score::ONE,
            avg_similarity: v,
            diversity: diversity.then_some(Score::new(dec!(0.75))),
        }],
        prompt: PromptScore {
            team: name.to_string(),
            value: Some(v),
        },
    };
    Stage4Output {
        teams: vec![
            team("alpha", Score::new(dec!(0.5))),
            team("beta, inc", Score::ZERO),
        ],
    }
}

fn ranking() -> Stage5Output {
    Stage5Output {
        competition_score: Score::new(dec!(0.5)),
        ranking: vec![
            RankedPrompt {
                team: "alpha".to_string(),
                prompt_score: Some(Score::new(dec!(0.5))),
                normalized: Score::HUNDRED,
                rank: 1,
            },
            RankedPrompt {
                team: "beta, inc".to_string(),
                prompt_score: None,
                normalized: Score::ZERO,
                rank: 2,
            },
        ],
    }
}

fn write_all(out_dir: &Path, diversity: bool) {
    let mut profile = ScoringProfile::default_v1();
    profile.trials = 1;
    profile.characters = vec!["A".to_string()];
    profile.diversity = diversity;

    let weights = weights(diversity);
    let scores = scores(diversity);
    let ranking = ranking();
    let input = Stage6Input {
        profile: &profile,
        weights: &weights,
        scores: &scores,
        ranking: &ranking,
        skipped: &[],
        tool_name: "pcg-leaderboard".to_string(),
        tool_version: "test".to_string(),
    };
    write_reports(&input, out_dir).unwrap();
}

#[test]
fn test_write_reports_creates_every_file() {
    let out = make_temp_dir().join("result");
    write_all(&out, false);
    for name in [
        CONSTANTS_FILE,
        TRIAL_SCORES_FILE,
        CHARACTER_SCORES_FILE,
        RANKS_FILE,
        REPORT_FILE,
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }
}

#[test]
fn test_csv_headers_and_rows() {
    let out = make_temp_dir();
    write_all(&out, false);

    let trials = fs::read_to_string(out.join(TRIAL_SCORES_FILE)).unwrap();
    let mut lines = trials.lines();
    assert_eq!(
        lines.next(),
        Some("teamName,character,trial,trial_Score,stabilityScore,similarityScore")
    );
    assert_eq!(lines.next(), Some("alpha,A,1,0.5,1,0.5"));
    assert_eq!(lines.next(), Some("\"beta, inc\",A,1,0,1,0"));

    let chars = fs::read_to_string(out.join(CHARACTER_SCORES_FILE)).unwrap();
    assert!(chars.starts_with(
        "teamName,character,characterScore,nonWeightedAverageStabilityScore,nonWeightedAverageSimilarityScore\n"
    ));
    assert!(!chars.contains("diversityRate"));

    let ranks = fs::read_to_string(out.join(RANKS_FILE)).unwrap();
    let lines = ranks.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "teamName,promptScore,normalizedPromptScore,rank");
    assert_eq!(lines[1], "alpha,0.5,100,1");
    assert_eq!(lines[2], "\"beta, inc\",0,0,2");
}

#[test]
fn test_diversity_column_when_enabled() {
    let out = make_temp_dir();
    write_all(&out, true);

    let chars = fs::read_to_string(out.join(CHARACTER_SCORES_FILE)).unwrap();
    let lines = chars.lines().collect::<Vec<_>>();
    assert!(lines[0].ends_with(",diversityRate"));
    assert!(lines[1].ends_with(",0.75"));

    let json = fs::read_to_string(out.join(CONSTANTS_FILE)).unwrap();
    assert!(json.contains("\"weightDiversity\":\"1\""));
}

#[test]
fn test_constants_json_shape() {
    let out = make_temp_dir();
    write_all(&out, false);

    let json = fs::read_to_string(out.join(CONSTANTS_FILE)).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["competitionScore"], "0.5");
    assert_eq!(v["weights"][0]["character"], "A");
    assert_eq!(v["weights"][0]["weight"], "0.5");
    assert!(v["weights"][0].get("weightDiversity").is_none());
}

#[test]
fn test_outputs_are_deterministic() {
    let first = make_temp_dir();
    let second = make_temp_dir();
    write_all(&first, true);
    write_all(&second, true);
    for name in [CONSTANTS_FILE, TRIAL_SCORES_FILE, CHARACTER_SCORES_FILE, RANKS_FILE] {
        assert_eq!(
            fs::read(first.join(name)).unwrap(),
            fs::read(second.join(name)).unwrap()
        );
    }
}

#[test]
fn test_report_text_lists_ranking() {
    let out = make_temp_dir();
    write_all(&out, false);
    let text = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
    assert!(text.contains("Competition score: 0.5"));
    assert!(text.contains("Normalized total: 100"));
    assert!(text.contains("alpha"));
    assert!(!text.contains("Skipped teams"));
}
