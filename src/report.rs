use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::board::{self, BOARD_COLS, BOARD_ROWS};
use crate::config::AnalysisConfig;
use crate::models::RankedResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    StrongestBias,
    StrongSignal,
    Notable,
    Elevated,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceTier::StrongestBias => "STRONGEST BIAS",
            ConfidenceTier::StrongSignal => "Strong signal",
            ConfidenceTier::Notable => "Notable",
            ConfidenceTier::Elevated => "Elevated",
        };
        f.write_str(label)
    }
}

pub fn confidence_tier(confidence: f64) -> ConfidenceTier {
    if confidence >= 99.0 {
        ConfidenceTier::StrongestBias
    } else if confidence >= 95.0 {
        ConfidenceTier::StrongSignal
    } else if confidence >= 90.0 {
        ConfidenceTier::Notable
    } else {
        ConfidenceTier::Elevated
    }
}

pub fn verdict(result: &RankedResult) -> String {
    match result.combined_rarity {
        Some(rarity) if result.alert => format!(
            "The probability of this cluster appearing by chance is less than {rarity:.2}%."
        ),
        _ => "Numbers are elevated but have not reached the strongest bias threshold.".to_string(),
    }
}

pub fn region_label(result: &RankedResult) -> String {
    result
        .dominant_region
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn alert_subject(result: &RankedResult) -> String {
    format!(
        "Keno Bias Alert: {} Strong Numbers Found in {} Region",
        result.qualifying.len(),
        region_label(result)
    )
}

/// Text rendering of the board with top-ranked numbers bracketed.
pub fn board_grid(result: &RankedResult) -> String {
    let mut output = String::new();
    for row in 0..BOARD_ROWS {
        let cells: Vec<String> = (0..BOARD_COLS)
            .map(|col| {
                let n = board::BoardPosition { row, col }.number();
                if result.is_top(n) {
                    format!("[{n:>2}]")
                } else {
                    format!(" {n:>2} ")
                }
            })
            .collect();
        let _ = writeln!(output, "{}", cells.join(" ").trim_end());
    }
    output
}

pub fn build_report(
    result: &RankedResult,
    config: &AnalysisConfig,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();
    let region = region_label(result);

    let _ = writeln!(output, "# Keno Bias Report");
    let _ = writeln!(
        output,
        "Generated {} over the last {} games (game IDs {} to {})",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        result.window_games,
        result.first_game_id,
        result.last_game_id
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    if result.alert {
        let _ = writeln!(
            output,
            "A significant spatial cluster was detected in the **{region}** region: {} numbers at or above {:.1}% confidence.",
            result.qualifying.len(),
            config.alert_threshold
        );
    } else {
        let _ = writeln!(
            output,
            "No alert. {} of the top {} reached {:.1}% confidence (need {}). Most top picks sit in the {region} region.",
            result.qualifying.len(),
            result.top.len(),
            config.alert_threshold,
            config.min_qualifying
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Board");
    let _ = writeln!(output, "```");
    let _ = write!(output, "{}", board_grid(result));
    let _ = writeln!(output, "```");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top {} by Spatial Weighted Score", result.top.len());
    let _ = writeln!(
        output,
        "| Rank | Number | Hits | Expected | Z-Score | Confidence | Signal | Region |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
    for (rank, stat) in result.top.iter().enumerate() {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {:.1} | {:.3} | {:.1}% | {} | {} |",
            rank + 1,
            stat.number,
            stat.observed,
            result.expected_count,
            stat.z_score,
            stat.confidence,
            confidence_tier(stat.confidence),
            board::region(stat.number)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Statistical Verdict");
    let _ = writeln!(output, "{}", verdict(result));
    if result.alert {
        let _ = writeln!(
            output,
            "This figure treats the qualifying numbers as independent and understates how likely a correlated patch is."
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "> Historical statistical anomalies only. Past frequency does not guarantee future results. Keno is a game of chance; play responsibly."
    );

    output
}
