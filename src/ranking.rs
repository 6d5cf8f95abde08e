use std::collections::HashMap;

use crate::board::{self, Region};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDecision {
    pub qualifying: Vec<u8>,
    pub alert: bool,
}

/// Stable over ascending numbers: equal scores keep the lower number ahead.
pub fn select_top_k(weighted_scores: &[f64], k: usize) -> Vec<u8> {
    let mut ranked: Vec<u8> = board::numbers()
        .take(weighted_scores.len())
        .collect();
    ranked.sort_by(|a, b| {
        let (sa, sb) = (
            weighted_scores[(*a - 1) as usize],
            weighted_scores[(*b - 1) as usize],
        );
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

/// Ties go to the region that reached the winning tally first while scanning
/// `top` in rank order. `None` only for an empty slice.
pub fn dominant_region(top: &[u8]) -> Option<Region> {
    let mut tallies: HashMap<Region, usize> = HashMap::new();
    let mut leader: Option<(Region, usize)> = None;

    for &number in top {
        let region = board::region(number);
        let tally = tallies.entry(region).or_insert(0);
        *tally += 1;

        if leader.map_or(true, |(_, best)| *tally > best) {
            leader = Some((region, *tally));
        }
    }

    leader.map(|(region, _)| region)
}

pub fn alert_decision(
    top: &[u8],
    confidences: &[f64],
    threshold: f64,
    min_qualifying: usize,
) -> AlertDecision {
    let qualifying: Vec<u8> = top
        .iter()
        .copied()
        .filter(|&n| confidences[(n - 1) as usize] >= threshold)
        .collect();
    let alert = qualifying.len() >= min_qualifying;
    AlertDecision { qualifying, alert }
}

/// Chance, as a percentage, that every qualifying number ran hot by luck.
///
/// Treats the numbers as independent even though neighboring cluster scores
/// are correlated; the estimate is optimistic and kept that way.
pub fn combined_rarity(qualifying: &[u8], confidences: &[f64]) -> f64 {
    let joint: f64 = qualifying
        .iter()
        .map(|&n| 1.0 - confidences[(n - 1) as usize] / 100.0)
        .product();
    joint * 100.0
}
