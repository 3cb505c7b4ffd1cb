//! Scoring module - placement points, streak bonus and clock arithmetic
//!
//! Rules:
//! - A book dropped into its home slot is worth 10 points.
//! - If the previous correct placement is still inside the streak window, the
//!   streak grows and a bonus of `min(10 + (streak + 1) * 5, 50)` is added.
//! - Outside the window the streak restarts at 1 with no bonus.
//! - Clock bonuses are capped, penalties floor at zero.

use crate::types::{PLACEMENT_POINTS, STREAK_BONUS_BASE, STREAK_BONUS_CAP, STREAK_BONUS_STEP};

/// Placement score result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementScore {
    /// Base points for the placement.
    pub base: u32,
    /// Bonus from an extended streak (zero when the streak restarted).
    pub streak_bonus: u32,
    pub total: u32,
    /// Streak length after this placement.
    pub streak_after: u32,
}

/// Streak bonus for extending a streak that currently has `streak_count` hits.
pub fn streak_bonus(streak_count: u32) -> u32 {
    STREAK_BONUS_BASE
        .saturating_add(streak_count.saturating_add(1).saturating_mul(STREAK_BONUS_STEP))
        .min(STREAK_BONUS_CAP)
}

/// Score a correct placement.
///
/// `streak_alive` is whether the previous correct placement is still within the window.
pub fn placement_score(streak_count: u32, streak_alive: bool) -> PlacementScore {
    if streak_alive && streak_count > 0 {
        let bonus = streak_bonus(streak_count);
        PlacementScore {
            base: PLACEMENT_POINTS,
            streak_bonus: bonus,
            total: PLACEMENT_POINTS + bonus,
            streak_after: streak_count + 1,
        }
    } else {
        PlacementScore {
            base: PLACEMENT_POINTS,
            streak_bonus: 0,
            total: PLACEMENT_POINTS,
            streak_after: 1,
        }
    }
}

/// Add `bonus` seconds to the clock without exceeding `cap`.
pub fn add_time(time_left: u32, bonus: u32, cap: u32) -> u32 {
    time_left.saturating_add(bonus).min(cap)
}

/// Subtract `penalty` seconds from the clock, flooring at zero.
pub fn subtract_time(time_left: u32, penalty: u32) -> u32 {
    time_left.saturating_sub(penalty)
}

/// Whether reaching `completed_levels` grants a sorter charge.
pub fn earns_sorter(completed_levels: u32, levels_per_sorter: u32) -> bool {
    levels_per_sorter > 0 && completed_levels > 0 && completed_levels % levels_per_sorter == 0
}
