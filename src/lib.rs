pub mod board;
pub mod cluster;
pub mod config;
pub mod db;
pub mod frequency;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod significance;

pub use config::{AnalysisConfig, ScoreWeights};
pub use models::{AnalysisOutcome, DrawRecord, NumberStat, RankedResult, SkipReason};
pub use pipeline::{analyze, AnalysisWindow, Pipeline};
