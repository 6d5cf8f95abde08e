use std::collections::HashSet;

use tracing::{debug, info};

use crate::board;
use crate::cluster::{self, Scores};
use crate::config::{AnalysisConfig, ConfigError};
use crate::frequency;
use crate::models::{AnalysisOutcome, DrawRecord, NumberStat, RankedResult, SkipReason};
use crate::ranking;
use crate::significance;

/// The most recent games of a history, ascending by game id.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisWindow {
    draws: Vec<DrawRecord>,
}

impl AnalysisWindow {
    /// Sorts `history` by game id, keeps the first record seen for each id and
    /// retains the last `window_size` games.
    pub fn latest(mut history: Vec<DrawRecord>, window_size: usize) -> Self {
        history.sort_by_key(|draw| draw.game_id);
        let mut seen = HashSet::new();
        history.retain(|draw| seen.insert(draw.game_id));
        let skip = history.len().saturating_sub(window_size);
        Self {
            draws: history.split_off(skip),
        }
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, history: Vec<DrawRecord>) -> AnalysisOutcome {
        let window = AnalysisWindow::latest(history, self.config.window_size);
        self.run(&window)
    }

    pub fn run(&self, window: &AnalysisWindow) -> AnalysisOutcome {
        let games = window.len();
        if games < self.config.min_games {
            info!(
                games,
                required = self.config.min_games,
                "not enough games, skipping analysis"
            );
            return AnalysisOutcome::Skipped(SkipReason::InsufficientData {
                required: self.config.min_games,
                actual: games,
            });
        }

        let draws = window.draws();
        let (first_game_id, last_game_id) = match (draws.first(), draws.last()) {
            (Some(first), Some(last)) => (first.game_id, last.game_id),
            _ => (0, 0),
        };
        info!(games, first_game_id, last_game_id, "analyzing window");

        let counts = frequency::count_frequencies(draws);
        let z_scores: Scores = counts.map(|observed| significance::z_score(observed, games));
        let confidences: Scores = z_scores.map(significance::confidence);
        let cluster_scores = cluster::cluster_scores(&z_scores);
        let weighted_scores: Scores = std::array::from_fn(|i| {
            cluster::weighted_score(cluster_scores[i], z_scores[i], &self.config.weights)
        });

        let stats: Vec<NumberStat> = board::numbers()
            .map(|n| {
                let i = (n - 1) as usize;
                NumberStat {
                    number: n,
                    observed: counts[i],
                    z_score: z_scores[i],
                    cluster_score: cluster_scores[i],
                    weighted_score: weighted_scores[i],
                    confidence: confidences[i],
                }
            })
            .collect();

        let top_numbers = ranking::select_top_k(&weighted_scores, self.config.top_k);
        let dominant_region = ranking::dominant_region(&top_numbers);
        let decision = ranking::alert_decision(
            &top_numbers,
            &confidences,
            self.config.alert_threshold,
            self.config.min_qualifying,
        );
        let combined_rarity = if decision.qualifying.is_empty() {
            None
        } else {
            Some(ranking::combined_rarity(&decision.qualifying, &confidences))
        };
        debug!(
            top = ?top_numbers,
            qualifying = decision.qualifying.len(),
            alert = decision.alert,
            "ranking complete"
        );

        let top = top_numbers
            .iter()
            .map(|&n| stats[(n - 1) as usize])
            .collect();

        AnalysisOutcome::Completed(RankedResult {
            window_games: games,
            first_game_id,
            last_game_id,
            expected_count: significance::expected_count(games),
            stats,
            top,
            dominant_region,
            qualifying: decision.qualifying,
            alert: decision.alert,
            combined_rarity,
        })
    }
}

/// Validates `config` and analyzes `history` in one call.
pub fn analyze(
    history: Vec<DrawRecord>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome, ConfigError> {
    Ok(Pipeline::new(config.clone())?.analyze(history))
}
