use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::BOARD_SIZE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_games must be at least 1")]
    ZeroMinGames,
    #[error("window_size ({window_size}) is smaller than min_games ({min_games})")]
    WindowBelowMinimum { window_size: usize, min_games: usize },
    #[error("top_k must be between 1 and {max}, got {actual}")]
    TopKOutOfRange { actual: usize, max: usize },
    #[error("alert_threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(f64),
    #[error("min_qualifying must be at least 1")]
    ZeroMinQualifying,
    #[error("score weights must be finite and non-negative and sum to 1, got cluster {cluster} / individual {individual}")]
    InvalidWeights { cluster: f64, individual: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub cluster: f64,
    pub individual: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cluster: 0.6,
            individual: 0.4,
        }
    }
}

impl ScoreWeights {
    pub fn with_cluster(cluster: f64) -> Self {
        Self {
            cluster,
            individual: 1.0 - cluster,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub window_size: usize,
    pub min_games: usize,
    pub top_k: usize,
    pub alert_threshold: f64,
    pub min_qualifying: usize,
    pub weights: ScoreWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 500,
            min_games: 100,
            top_k: 10,
            alert_threshold: 90.0,
            min_qualifying: 3,
            weights: ScoreWeights::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_games == 0 {
            return Err(ConfigError::ZeroMinGames);
        }
        if self.window_size < self.min_games {
            return Err(ConfigError::WindowBelowMinimum {
                window_size: self.window_size,
                min_games: self.min_games,
            });
        }
        if self.top_k == 0 || self.top_k > BOARD_SIZE as usize {
            return Err(ConfigError::TopKOutOfRange {
                actual: self.top_k,
                max: BOARD_SIZE as usize,
            });
        }
        if !(0.0..=100.0).contains(&self.alert_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.alert_threshold));
        }
        if self.min_qualifying == 0 {
            return Err(ConfigError::ZeroMinQualifying);
        }
        let ScoreWeights {
            cluster,
            individual,
        } = self.weights;
        let usable = cluster.is_finite()
            && individual.is_finite()
            && cluster >= 0.0
            && individual >= 0.0
            && (cluster + individual - 1.0).abs() <= 1e-9;
        if !usable {
            return Err(ConfigError::InvalidWeights {
                cluster,
                individual,
            });
        }
        Ok(())
    }
}
