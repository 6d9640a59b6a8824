//! Final score for a won run

use crate::catalog::Difficulty;
use crate::sim::level::LevelTier;

/// Points per remaining life before multipliers
pub const POINTS_PER_LIFE: f64 = 2000.0;
/// Points lost per elapsed second
pub const TIME_PENALTY_PER_SEC: f64 = 10.0;

/// Score a won run.
///
/// `lives * 2000 * tier_mult * difficulty_mult * accuracy - elapsed * 10`,
/// floored and clamped at zero, where accuracy is `required / matches`.
/// A run with no matches scores zero.
pub fn score(
    lives: u8,
    tier: LevelTier,
    difficulty: Difficulty,
    matches: u32,
    elapsed_secs: f64,
) -> u64 {
    if matches == 0 {
        return 0;
    }
    let accuracy = tier.matches_required() as f64 / matches as f64;
    let raw = lives as f64 * POINTS_PER_LIFE * tier.multiplier() * difficulty.multiplier() * accuracy
        - elapsed_secs * TIME_PENALTY_PER_SEC;
    raw.floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fastest_beginner_run() {
        assert_eq!(score(3, LevelTier::Short, Difficulty::Beginner, 5, 0.0), 6000);
        assert_eq!(score(1, LevelTier::Short, Difficulty::Beginner, 5, 0.0), 2000);
    }

    #[test]
    fn test_long_advanced_run() {
        assert_eq!(
            score(3, LevelTier::Long, Difficulty::Advanced, 15, 100.0),
            59000
        );
    }

    #[test]
    fn test_medium_intermediate_floors() {
        // 2 * 2000 * 2.5 * 1.5 = 15000, minus 12.345s * 10
        assert_eq!(
            score(2, LevelTier::Medium, Difficulty::Intermediate, 10, 12.345),
            14876
        );
    }

    #[test]
    fn test_slow_run_clamps_to_zero() {
        assert_eq!(score(1, LevelTier::Short, Difficulty::Beginner, 5, 10_000.0), 0);
    }

    #[test]
    fn test_no_matches_scores_zero() {
        assert_eq!(score(3, LevelTier::Short, Difficulty::Beginner, 0, 0.0), 0);
    }

    proptest! {
        #[test]
        fn prop_score_never_grows_with_time(
            lives in 1u8..=3,
            tier in 0usize..3,
            diff in 0usize..3,
            t in 0.0f64..5000.0,
            extra in 0.0f64..1000.0,
        ) {
            let tier = LevelTier::from_index(tier).unwrap();
            let difficulty = Difficulty::from_index(diff).unwrap();
            let matches = tier.matches_required();
            let sooner = score(lives, tier, difficulty, matches, t);
            let later = score(lives, tier, difficulty, matches, t + extra);
            prop_assert!(later <= sooner);
        }
    }
}
