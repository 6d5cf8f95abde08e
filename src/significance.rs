pub const DRAWN_PER_GAME: u32 = 20;

pub const HIT_PROBABILITY: f64 = DRAWN_PER_GAME as f64 / crate::board::BOARD_SIZE as f64;

pub fn expected_count(games: usize) -> f64 {
    games as f64 * HIT_PROBABILITY
}

pub fn std_dev(games: usize) -> f64 {
    (games as f64 * HIT_PROBABILITY * (1.0 - HIT_PROBABILITY)).sqrt()
}

/// Standardized deviation of `observed` from the expected count over `games`.
///
/// Returns 0.0 when the variance is degenerate (`games == 0`).
pub fn z_score(observed: u32, games: usize) -> f64 {
    let sd = std_dev(games);
    if sd == 0.0 {
        return 0.0;
    }
    (observed as f64 - expected_count(games)) / sd
}

/// Standard normal CDF: Φ(x) = (1 + erf(x/√2)) / 2
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x * std::f64::consts::FRAC_1_SQRT_2))
}

pub fn confidence(z: f64) -> f64 {
    normal_cdf(z) * 100.0
}
