//! Engine configuration
//!
//! All rule constants live in [`EngineConfig`] so a presentation layer can tune
//! difficulty without touching the state machine. Defaults match the constants in
//! `book_blitz_types`.
//!
//! # Environment Variables
//!
//! [`EngineConfig::from_env`] reads the following (all optional, unsigned integers):
//!
//! - `BOOK_BLITZ_START_TIME_SECS`
//! - `BOOK_BLITZ_MAX_TIME_SECS`
//! - `BOOK_BLITZ_INVALID_MOVE_PENALTY_SECS`
//! - `BOOK_BLITZ_LEVEL_BONUS_SECS`
//! - `BOOK_BLITZ_SORTER_TIME_BONUS_SECS`
//! - `BOOK_BLITZ_STREAK_WINDOW_MS`
//! - `BOOK_BLITZ_SORTER_BONUS`
//! - `BOOK_BLITZ_LEVEL_TRANSITION_MS`
//! - `BOOK_BLITZ_LEVELS_PER_SORTER`
//! - `BOOK_BLITZ_LAMP` (`0`/`false` disables lamp flicker)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Rule constants for one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub start_time_secs: u32,
    pub max_time_secs: u32,
    pub invalid_move_penalty_secs: u32,
    pub level_bonus_secs: u32,
    pub sorter_time_bonus_secs: u32,
    pub streak_window_ms: u32,
    pub sorter_bonus: u32,
    pub level_transition_ms: u32,
    pub levels_per_sorter: u32,
    pub lamp_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_time_secs: START_TIME_SECS,
            max_time_secs: MAX_TIME_SECS,
            invalid_move_penalty_secs: INVALID_MOVE_PENALTY_SECS,
            level_bonus_secs: LEVEL_BONUS_SECS,
            sorter_time_bonus_secs: SORTER_TIME_BONUS_SECS,
            streak_window_ms: STREAK_WINDOW_MS,
            sorter_bonus: SORTER_BONUS,
            level_transition_ms: LEVEL_TRANSITION_MS,
            levels_per_sorter: LEVELS_PER_SORTER,
            lamp_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults for unset ones.
    ///
    /// A variable that is set but not a valid number is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let d = Self::default();
        let num = |key: &str, default: u32| -> Result<u32> {
            match lookup(key).map(|s| s.trim().to_string()) {
                Some(s) if !s.is_empty() => s
                    .parse::<u32>()
                    .with_context(|| format!("{key} must be an unsigned integer, got {s:?}")),
                _ => Ok(default),
            }
        };

        let lamp_enabled = lookup("BOOK_BLITZ_LAMP")
            .map(|v| !(v == "0" || v.to_lowercase() == "false"))
            .unwrap_or(d.lamp_enabled);

        let config = Self {
            start_time_secs: num("BOOK_BLITZ_START_TIME_SECS", d.start_time_secs)?,
            max_time_secs: num("BOOK_BLITZ_MAX_TIME_SECS", d.max_time_secs)?,
            invalid_move_penalty_secs: num(
                "BOOK_BLITZ_INVALID_MOVE_PENALTY_SECS",
                d.invalid_move_penalty_secs,
            )?,
            level_bonus_secs: num("BOOK_BLITZ_LEVEL_BONUS_SECS", d.level_bonus_secs)?,
            sorter_time_bonus_secs: num(
                "BOOK_BLITZ_SORTER_TIME_BONUS_SECS",
                d.sorter_time_bonus_secs,
            )?,
            streak_window_ms: num("BOOK_BLITZ_STREAK_WINDOW_MS", d.streak_window_ms)?,
            sorter_bonus: num("BOOK_BLITZ_SORTER_BONUS", d.sorter_bonus)?,
            level_transition_ms: num("BOOK_BLITZ_LEVEL_TRANSITION_MS", d.level_transition_ms)?,
            levels_per_sorter: num("BOOK_BLITZ_LEVELS_PER_SORTER", d.levels_per_sorter)?,
            lamp_enabled,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the state machine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.start_time_secs == 0 {
            bail!("start_time_secs must be positive");
        }
        if self.start_time_secs > self.max_time_secs {
            bail!(
                "start_time_secs ({}) exceeds max_time_secs ({})",
                self.start_time_secs,
                self.max_time_secs
            );
        }
        if self.streak_window_ms == 0 {
            bail!("streak_window_ms must be positive");
        }
        Ok(())
    }
}
