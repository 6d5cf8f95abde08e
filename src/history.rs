use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::DrawRecord;

const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Game ID")]
    game_id: String,
    #[serde(rename = "Timestamp", default)]
    timestamp: String,
    #[serde(rename = "Numbers", default)]
    numbers: String,
    #[serde(rename = "Scraped At", default)]
    scraped_at: Option<String>,
}

/// Loads the scraper's `results.csv`.
pub fn load_csv(path: &Path) -> anyhow::Result<Vec<DrawRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open draw history {}", path.display()))?;
    let draws = read_csv(file).with_context(|| format!("in {}", path.display()))?;
    debug!(path = %path.display(), draws = draws.len(), "loaded draw history");
    Ok(draws)
}

pub fn read_csv<R: Read>(input: R) -> anyhow::Result<Vec<DrawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut draws = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("unreadable row at line {line}"))?;
        let game_id: i64 = row
            .game_id
            .parse()
            .with_context(|| format!("invalid Game ID '{}' at line {line}", row.game_id))?;
        let scraped_at = row.scraped_at.as_deref().and_then(|raw| {
            let parsed = NaiveDateTime::parse_from_str(raw, SCRAPED_AT_FORMAT).ok();
            if parsed.is_none() && !raw.is_empty() {
                warn!(line, value = raw, "ignoring unparsable Scraped At");
            }
            parsed
        });

        draws.push(DrawRecord {
            game_id,
            timestamp: row.timestamp,
            numbers: row.numbers,
            scraped_at,
        });
    }

    Ok(draws)
}
