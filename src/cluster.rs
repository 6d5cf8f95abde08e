use crate::board::{self, BOARD_SIZE};
use crate::config::ScoreWeights;

/// Per-number scores, index `n - 1` for number `n`.
pub type Scores = [f64; BOARD_SIZE as usize];

/// Mean z-score over `number` and its board neighbors (4, 6 or 9 values).
/// Numbers off the board score 0.0.
pub fn cluster_score(number: u8, z_scores: &Scores) -> f64 {
    if !board::is_on_board(number) {
        return 0.0;
    }
    let neighbors = board::neighbors(number);
    let own = z_scores[(number - 1) as usize];
    let total: f64 = neighbors
        .iter()
        .map(|&m| z_scores[(m - 1) as usize])
        .fold(own, |acc, z| acc + z);
    total / (neighbors.len() + 1) as f64
}

pub fn cluster_scores(z_scores: &Scores) -> Scores {
    std::array::from_fn(|i| cluster_score(i as u8 + 1, z_scores))
}

pub fn weighted_score(cluster: f64, z: f64, weights: &ScoreWeights) -> f64 {
    weights.cluster * cluster + weights.individual * z
}
