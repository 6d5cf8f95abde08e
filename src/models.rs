use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::board::Region;

/// `numbers` is the raw delimited text; only the frequency counter tokenizes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRecord {
    pub game_id: i64,
    pub timestamp: String,
    pub numbers: String,
    pub scraped_at: Option<NaiveDateTime>,
}

impl DrawRecord {
    pub fn new(game_id: i64, timestamp: impl Into<String>, numbers: impl Into<String>) -> Self {
        Self {
            game_id,
            timestamp: timestamp.into(),
            numbers: numbers.into(),
            scraped_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberStat {
    pub number: u8,
    pub observed: u32,
    pub z_score: f64,
    pub cluster_score: f64,
    pub weighted_score: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub window_games: usize,
    pub first_game_id: i64,
    pub last_game_id: i64,
    pub expected_count: f64,
    /// Every number 1..=80, index `n - 1`.
    pub stats: Vec<NumberStat>,
    pub top: Vec<NumberStat>,
    /// Always present when `top` is non-empty.
    pub dominant_region: Option<Region>,
    pub qualifying: Vec<u8>,
    pub alert: bool,
    /// Percentage; `None` when nothing qualifies.
    pub combined_rarity: Option<f64>,
}

impl RankedResult {
    pub fn stat(&self, number: u8) -> Option<&NumberStat> {
        self.stats.get(number.checked_sub(1)? as usize)
    }

    pub fn is_top(&self, number: u8) -> bool {
        self.top.iter().any(|s| s.number == number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SkipReason {
    #[error("insufficient data: need at least {required} games, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnalysisOutcome {
    Skipped(SkipReason),
    Completed(RankedResult),
}

impl AnalysisOutcome {
    pub fn completed(&self) -> Option<&RankedResult> {
        match self {
            AnalysisOutcome::Completed(result) => Some(result),
            AnalysisOutcome::Skipped(_) => None,
        }
    }
}
