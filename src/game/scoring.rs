use std::time::Duration;

use crate::config::TimingConfig;
use crate::constants::POINTS_PER_LINE;

pub fn line_clear_points(rows: usize) -> u32 {
    rows as u32 * POINTS_PER_LINE
}

/// Gravity interval for the given score: one speed step per
/// `speedup_score_step` points, never below the configured floor.
pub fn drop_interval(score: u32, timing: &TimingConfig) -> Duration {
    let steps = u64::from(score / timing.speedup_score_step.max(1));
    let reduced = timing
        .drop_interval_ms
        .saturating_sub(steps.saturating_mul(timing.speedup_ms));
    Duration::from_millis(reduced.max(timing.min_drop_interval_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_line_is_worth_a_hundred() {
        assert_eq!(line_clear_points(0), 0);
        assert_eq!(line_clear_points(1), 100);
        assert_eq!(line_clear_points(4), 400);
    }

    #[test]
    fn interval_shrinks_with_score() {
        let timing = TimingConfig::default();
        assert_eq!(drop_interval(0, &timing), Duration::from_millis(1000));
        assert_eq!(drop_interval(499, &timing), Duration::from_millis(1000));
        assert_eq!(drop_interval(500, &timing), Duration::from_millis(900));
        assert_eq!(drop_interval(2000, &timing), Duration::from_millis(600));
    }

    #[test]
    fn interval_has_a_floor() {
        let timing = TimingConfig::default();
        assert_eq!(drop_interval(1_000_000, &timing), Duration::from_millis(100));
    }
}
