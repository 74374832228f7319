//! # Progression Module
//!
//! Pure advancement arithmetic: the required-XP curve, the level-up loop,
//! and hunter-rank progression.
//!
//! All functions here are deterministic and clock-free. The level-up loop
//! always terminates because the curve is bounded below by
//! [`config::XP_BASE`].

use crate::config;
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// Experience required to clear the given level.
///
/// Strictly increasing in `level` and total for all levels >= 1.
///
/// # Examples
///
/// ```
/// use arise::required_xp;
///
/// assert_eq!(required_xp(1), 100);
/// assert_eq!(required_xp(2), 150);
/// assert!(required_xp(10) > required_xp(9));
/// ```
pub fn required_xp(level: u32) -> u64 {
    config::XP_BASE + config::XP_STEP * u64::from(level.saturating_sub(1))
}

/// Applies an experience and gold award to the player.
///
/// Experience spills through as many level-ups as it covers: while
/// `current_xp` meets the requirement, the requirement is consumed, the
/// level rises, the curve is re-evaluated, and
/// [`config::LEVEL_UP_STAT_POINTS`] unallocated points are granted. Gold
/// is credited unconditionally.
///
/// Returns whether at least one level-up occurred. The flag selects
/// celebratory versus neutral feedback and has no other state effect.
pub fn apply_experience(player: &mut Player, xp_gain: f64, gold_gain: u64) -> bool {
    player.current_xp += xp_gain;
    player.gold += gold_gain;

    let mut leveled_up = false;
    while player.current_xp >= player.required_xp as f64 {
        player.current_xp -= player.required_xp as f64;
        player.level += 1;
        player.required_xp = required_xp(player.level);
        player.stats.available_points += config::LEVEL_UP_STAT_POINTS;
        leveled_up = true;
    }
    leveled_up
}

/// Hunter ranks, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    /// The rank unlocked at the given level.
    pub fn for_level(level: u32) -> Rank {
        match level {
            0..=4 => Rank::E,
            5..=9 => Rank::D,
            10..=19 => Rank::C,
            20..=34 => Rank::B,
            35..=49 => Rank::A,
            _ => Rank::S,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Rank::E => "E",
            Rank::D => "D",
            Rank::C => "C",
            Rank::B => "B",
            Rank::A => "A",
            Rank::S => "S",
        };
        write!(f, "{}", letter)
    }
}

/// Re-derives the player's rank from their level.
///
/// Idempotent: applying it twice yields the same player as applying it
/// once. Returns whether the rank changed, used only to pick the
/// announcement.
pub fn check_progression(player: &mut Player) -> bool {
    let rank = Rank::for_level(player.level);
    let changed = rank != player.rank;
    player.rank = rank;
    changed
}
