//! End-to-end checks of the analysis pipeline on synthetic draw histories.

use keno_bias_watch::{
    analyze, board, frequency, AnalysisConfig, AnalysisOutcome, DrawRecord, Pipeline, SkipReason,
};
use proptest::prelude::*;

/// A fair-looking history: game `g` draws 20 consecutive numbers starting at
/// a rotating offset.
fn rotating_history(games: i64) -> Vec<DrawRecord> {
    (1..=games)
        .map(|g| {
            let start = (g * 13) as usize % 80;
            let numbers: Vec<String> = (0..20)
                .map(|i| ((start + i) % 80 + 1).to_string())
                .collect();
            DrawRecord::new(g, format!("game {g}"), numbers.join("-"))
        })
        .collect()
}

fn config() -> AnalysisConfig {
    AnalysisConfig {
        window_size: 200,
        min_games: 100,
        ..AnalysisConfig::default()
    }
}

#[test]
fn exact_minimum_is_scored() {
    let outcome = analyze(rotating_history(100), &config()).unwrap();
    let result = outcome.completed().expect("window at the floor should be scored");
    assert_eq!(result.window_games, 100);
    assert_eq!(result.stats.len(), 80);
    assert_eq!(result.top.len(), 10);
}

#[test]
fn one_below_minimum_is_skipped() {
    let outcome = analyze(rotating_history(99), &config()).unwrap();
    assert_eq!(
        outcome,
        AnalysisOutcome::Skipped(SkipReason::InsufficientData {
            required: 100,
            actual: 99
        })
    );
}

#[test]
fn only_the_latest_window_is_counted() {
    let mut history = rotating_history(300);
    history.reverse();
    let result = analyze(history, &config()).unwrap();
    let result = result.completed().unwrap();
    assert_eq!(result.window_games, 200);
    assert_eq!(result.first_game_id, 101);
    assert_eq!(result.last_game_id, 300);
    let total: u32 = result.stats.iter().map(|s| s.observed).sum();
    assert_eq!(total, 200 * 20);
}

#[test]
fn malformed_draws_only_undercount() {
    let mut history = rotating_history(100);
    history[0].numbers = "abc--,999,0,".to_string();
    history[1].numbers = String::new();
    let result = analyze(history, &config()).unwrap();
    let result = result.completed().unwrap();
    let total: u32 = result.stats.iter().map(|s| s.observed).sum();
    assert_eq!(total, 98 * 20);
}

#[test]
fn repeated_runs_are_identical() {
    let pipeline = Pipeline::new(config()).unwrap();
    let first = pipeline.analyze(rotating_history(150));
    let second = pipeline.analyze(rotating_history(150));
    assert_eq!(first, second);
}

#[test]
fn concurrent_runs_with_different_configs_do_not_interfere() {
    let strict = AnalysisConfig {
        alert_threshold: 99.0,
        top_k: 5,
        ..config()
    };
    let loose = AnalysisConfig {
        alert_threshold: 0.0,
        min_qualifying: 1,
        ..config()
    };
    let expected_strict = analyze(rotating_history(120), &strict).unwrap();
    let expected_loose = analyze(rotating_history(120), &loose).unwrap();

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| analyze(rotating_history(120), &strict).unwrap());
        let b = s.spawn(|| analyze(rotating_history(120), &loose).unwrap());
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(a, expected_strict);
    assert_eq!(b, expected_loose);
    assert!(b.completed().unwrap().alert);
    assert_eq!(a.completed().unwrap().top.len(), 5);
}

fn arb_history() -> impl Strategy<Value = Vec<DrawRecord>> {
    prop::collection::vec(prop::collection::vec(0u8..=90, 0..25), 100..140).prop_map(|games| {
        games
            .into_iter()
            .enumerate()
            .map(|(i, numbers)| {
                let text = numbers
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(if i % 2 == 0 { "-" } else { "," });
                DrawRecord::new(i as i64 + 1, "", text)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_weighted_score_blends_cluster_and_individual(history in arb_history()) {
        let outcome = analyze(history, &config()).unwrap();
        let result = outcome.completed().unwrap();
        for stat in &result.stats {
            let expected = 0.6 * stat.cluster_score + 0.4 * stat.z_score;
            prop_assert!((stat.weighted_score - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&stat.confidence));
        }
    }

    #[test]
    fn prop_top_k_is_sorted_with_low_numbers_first_on_ties(history in arb_history()) {
        let outcome = analyze(history, &config()).unwrap();
        let result = outcome.completed().unwrap();
        for pair in result.top.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.weighted_score >= b.weighted_score);
            if a.weighted_score == b.weighted_score {
                prop_assert!(a.number < b.number);
            }
        }
        let floor = result.top.last().unwrap().weighted_score;
        for stat in &result.stats {
            if !result.is_top(stat.number) {
                prop_assert!(stat.weighted_score <= floor);
            }
        }
    }

    #[test]
    fn prop_alert_matches_qualifying_count(history in arb_history()) {
        let cfg = config();
        let outcome = analyze(history, &cfg).unwrap();
        let result = outcome.completed().unwrap();
        for &n in &result.qualifying {
            prop_assert!(result.is_top(n));
            prop_assert!(result.stat(n).unwrap().confidence >= cfg.alert_threshold);
        }
        prop_assert_eq!(result.alert, result.qualifying.len() >= cfg.min_qualifying);
        prop_assert_eq!(result.combined_rarity.is_some(), !result.qualifying.is_empty());
    }

    #[test]
    fn prop_tokenizer_only_yields_board_numbers(raw in "[0-9,\\- a-z]{0,64}") {
        for n in frequency::parse_numbers(&raw) {
            prop_assert!(board::is_on_board(n));
        }
    }

    #[test]
    fn prop_analysis_is_idempotent(history in arb_history()) {
        let first = analyze(history.clone(), &config()).unwrap();
        let second = analyze(history, &config()).unwrap();
        prop_assert_eq!(first, second);
    }
}
