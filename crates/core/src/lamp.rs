//! Shelf lamp flicker
//!
//! Once per game second the lamp may go dark for a while. The odds and the dark
//! period both grow with the number of completed levels, and each level allows at
//! most [`LAMP_MAX_BLINKS`] blinks. The lamp never gates gameplay.

use crate::rng::SimpleRng;
use crate::types::LAMP_MAX_BLINKS;

/// Blink chance per game second, in parts per thousand
pub fn blink_chance_per_mille(completed_levels: u32) -> u32 {
    20u32.saturating_add(completed_levels).min(300)
}

/// How long the lamp stays dark after a blink
pub fn off_duration_ms(completed_levels: u32) -> u32 {
    500u32
        .saturating_add(completed_levels.saturating_mul(20))
        .min(3000)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lamp {
    off_remaining_ms: u32,
    blinks_this_level: u8,
}

impl Lamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.off_remaining_ms == 0
    }

    pub fn blinks_this_level(&self) -> u8 {
        self.blinks_this_level
    }

    /// Roll for a blink. Called once per game second.
    ///
    /// Returns the dark period when the lamp blinks.
    pub fn roll(&mut self, rng: &mut SimpleRng, completed_levels: u32) -> Option<u32> {
        if self.blinks_this_level >= LAMP_MAX_BLINKS || !self.is_on() {
            return None;
        }
        if !rng.chance_per_mille(blink_chance_per_mille(completed_levels)) {
            return None;
        }
        let off_ms = off_duration_ms(completed_levels);
        self.off_remaining_ms = off_ms;
        self.blinks_this_level += 1;
        Some(off_ms)
    }

    /// Count down the dark period
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.off_remaining_ms = self.off_remaining_ms.saturating_sub(elapsed_ms);
    }

    /// New level: blink budget refills
    pub fn next_level(&mut self) {
        self.blinks_this_level = 0;
    }

    /// Force the lamp back on (game over / restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
