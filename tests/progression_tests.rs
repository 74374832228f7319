//! Property tests for the progression calculator.

use arise::{apply_experience, required_xp, Player};
use proptest::prelude::*;

fn fresh_player() -> Player {
    Player::new("hunter@example.com".to_string(), "Hunter".to_string())
}

proptest! {
    #[test]
    fn prop_curve_is_strictly_increasing(level in 1u32..10_000) {
        prop_assert!(required_xp(level + 1) > required_xp(level));
    }

    #[test]
    fn prop_curve_is_deterministic(level in 1u32..10_000) {
        prop_assert_eq!(required_xp(level), required_xp(level));
    }

    /// Experience is conserved modulo leveling: whatever was not consumed
    /// by level requirements is still on the counter.
    #[test]
    fn prop_experience_is_conserved(start_xp in 0.0f64..99.0, gain in 0.0f64..100_000.0) {
        let mut player = fresh_player();
        player.current_xp = start_xp;

        apply_experience(&mut player, gain, 0);

        let consumed: u64 = (1..player.level).map(required_xp).sum();
        let total_in = start_xp + gain;
        let total_out = player.current_xp + consumed as f64;

        prop_assert!((total_in - total_out).abs() < 1e-6);
        prop_assert!(player.current_xp >= 0.0);
        prop_assert!(player.current_xp < player.required_xp as f64);
    }

    /// Three unallocated points arrive with every level gained, however
    /// many level-ups a single award spills through.
    #[test]
    fn prop_stat_points_track_levels_gained(gain in 0.0f64..50_000.0) {
        let mut player = fresh_player();

        apply_experience(&mut player, gain, 0);

        prop_assert_eq!(player.stats.available_points, (player.level - 1) * 3);
    }

    /// Gold is never gated on experience.
    #[test]
    fn prop_gold_is_credited_unconditionally(gain in 0.0f64..500.0, gold in 0u64..1_000_000) {
        let mut player = fresh_player();

        apply_experience(&mut player, gain, gold);

        prop_assert_eq!(player.gold, gold);
    }
}
