//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond parsing and naming, making them
//! usable in any context (core logic, runtime loop, presentation layer).
//!
//! # Shelf
//!
//! A puzzle is a shelf of [`SHELF_SIZE`] books numbered `1..=12`. Book `n` belongs in
//! slot `n - 1`. The player may only move the selected book one slot to the left, and
//! only when it is smaller than its left neighbour.
//!
//! # Game Timing Constants
//!
//! Clock values are in seconds, sub-second windows in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `START_TIME_SECS` | 60 | Time on the clock at game start |
//! | `MAX_TIME_SECS` | 60 | Bonuses never push the clock above this |
//! | `INVALID_MOVE_PENALTY_SECS` | 3 | Deducted for a larger-over-smaller attempt |
//! | `LEVEL_BONUS_SECS` | 15 | Added when a shelf is fully sorted |
//! | `SORTER_TIME_BONUS_SECS` | 5 | Added when the sorter power-up fires |
//! | `CLOCK_STEP_MS` | 1000 | One game-clock second |
//! | `STREAK_WINDOW_MS` | 2000 | Time allowed between two correct placements |
//! | `STREAK_DECAY_MS` | 100 | Nominal cadence of the streak decay timer |
//! | `LEVEL_TRANSITION_MS` | 1000 | Sorted shelf stays up before the next one |
//!
//! # Scoring
//!
//! | Event | Points |
//! |-------|--------|
//! | Correct placement | 10 |
//! | Streak bonus | `min(10 + (streak + 1) * 5, 50)` on top of the base |
//! | Sorter power-up | 500 |
//!
//! # Examples
//!
//! ```
//! use book_blitz_types::{GameAction, Signal, SHELF_SIZE};
//!
//! // Parse game actions (case-insensitive)
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//! assert_eq!(GameAction::from_str("select:4"), Some(GameAction::Select(4)));
//!
//! // Signals carry a stable name and a default status line
//! assert_eq!(Signal::InvalidMove.as_str(), "invalid_move");
//! assert_eq!(SHELF_SIZE, 12);
//! ```

use serde::{Deserialize, Serialize};

/// Number of books on the shelf
pub const SHELF_SIZE: usize = 12;

/// Clock value at game start (seconds)
pub const START_TIME_SECS: u32 = 60;

/// Upper bound for the clock after any bonus (seconds)
pub const MAX_TIME_SECS: u32 = 60;

/// Penalty for an invalid move (seconds)
pub const INVALID_MOVE_PENALTY_SECS: u32 = 3;

/// Bonus for completing a level (seconds)
pub const LEVEL_BONUS_SECS: u32 = 15;

/// Bonus for firing the sorter power-up (seconds)
pub const SORTER_TIME_BONUS_SECS: u32 = 5;

/// Length of one game-clock second in milliseconds
pub const CLOCK_STEP_MS: u32 = 1000;

/// Window in which a correct placement extends the streak (2000ms)
pub const STREAK_WINDOW_MS: u32 = 2000;

/// Nominal streak decay cadence (100ms)
pub const STREAK_DECAY_MS: u32 = 100;

/// Level-complete window before the next shelf is dealt (1000ms)
pub const LEVEL_TRANSITION_MS: u32 = 1000;

/// Base points for a correctly placed book
pub const PLACEMENT_POINTS: u32 = 10;

/// Streak bonus base value
pub const STREAK_BONUS_BASE: u32 = 10;

/// Streak bonus growth per streak step
pub const STREAK_BONUS_STEP: u32 = 5;

/// Streak bonus cap
pub const STREAK_BONUS_CAP: u32 = 50;

/// Points awarded for firing the sorter power-up
pub const SORTER_BONUS: u32 = 500;

/// A sorter charge is granted every time this many levels are completed
pub const LEVELS_PER_SORTER: u32 = 3;

/// Maximum lamp blinks per level
pub const LAMP_MAX_BLINKS: u8 = 5;


/// Game phases
///
/// - **Playing**: normal play
/// - **LevelTransitioning**: a shelf was just sorted and stays up until the window closes; input is still accepted
/// - **GameOver**: the clock hit zero; only `Restart` does anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Playing,
    LevelTransitioning,
    GameOver,
}

impl Phase {
    /// Whether gameplay operations are accepted in this phase
    pub fn playable(&self) -> bool {
        !matches!(self, Phase::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Playing => "playing",
            Phase::LevelTransitioning => "level_transitioning",
            Phase::GameOver => "game_over",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are used by both the presentation layer and scripted drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Select the book at the given slot
    Select(u8),
    /// Move the selected book one slot left
    MoveLeft,
    /// Fire the sorter power-up
    UseSorter,
    /// Restart the game (from any phase)
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// `select` takes the slot index after a colon.
    ///
    /// # Examples
    ///
    /// ```
    /// use book_blitz_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("USESORTER"), Some(GameAction::UseSorter));
    /// assert_eq!(GameAction::from_str("select:0"), Some(GameAction::Select(0)));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(index) = lower.strip_prefix("select:") {
            let index: u8 = index.trim().parse().ok()?;
            if (index as usize) < SHELF_SIZE {
                return Some(GameAction::Select(index));
            }
            return None;
        }
        match lower.as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "usesorter" => Some(GameAction::UseSorter),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Action name without arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Select(_) => "select",
            GameAction::MoveLeft => "moveLeft",
            GameAction::UseSorter => "useSorter",
            GameAction::Restart => "restart",
        }
    }
}

impl std::fmt::Display for GameAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameAction::Select(index) => write!(f, "select:{index}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Engine-emitted event
///
/// Signals are drained by the caller after each operation. Rejected actions are
/// reported here, never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    /// A book landed in its home slot while a streak was alive
    CorrectPlacement { book: u8, bonus: u32, streak: u32 },
    /// A book landed in its home slot and started a new streak
    StreakStarted { book: u8 },
    /// A book moved left but is not home yet
    Moved { book: u8 },
    /// Tried to move a book over a smaller one
    InvalidMove,
    /// The streak window ran out
    StreakBroken,
    /// The shelf is fully sorted
    LevelComplete,
    /// A sorter charge was granted
    SorterEarned,
    /// The sorter power-up fired
    SorterUsed { bonus: u32 },
    /// The sorter was requested with zero charges
    NoCharges,
    /// The clock ran out, or an action was attempted after it did
    GameOver,
    /// The shelf lamp went dark for a while
    LampFlicker { off_ms: u32 },
}

impl Signal {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::CorrectPlacement { .. } => "correct_placement",
            Signal::StreakStarted { .. } => "streak_started",
            Signal::Moved { .. } => "moved",
            Signal::InvalidMove => "invalid_move",
            Signal::StreakBroken => "streak_broken",
            Signal::LevelComplete => "level_complete",
            Signal::SorterEarned => "sorter_earned",
            Signal::SorterUsed { .. } => "sorter_used",
            Signal::NoCharges => "no_charges",
            Signal::GameOver => "game_over",
            Signal::LampFlicker { .. } => "lamp_flicker",
        }
    }

    /// Default status line for the presentation layer
    ///
    /// # Examples
    ///
    /// ```
    /// use book_blitz_types::Signal;
    ///
    /// assert_eq!(Signal::Moved { book: 3 }.message(), "Moved book 3 left");
    /// assert_eq!(Signal::NoCharges.message(), "No sorters left!");
    /// ```
    pub fn message(&self) -> String {
        match self {
            Signal::CorrectPlacement { book, bonus, .. } => {
                format!("Streak +{bonus}! Book {book} placed correctly!")
            }
            Signal::StreakStarted { book } => {
                format!("Book {book} placed correctly! Streak started!")
            }
            Signal::Moved { book } => format!("Moved book {book} left"),
            Signal::InvalidMove => "Invalid move! Only move smaller books left.".to_string(),
            Signal::StreakBroken => "Streak broken!".to_string(),
            Signal::LevelComplete => "Sorted! Level complete!".to_string(),
            Signal::SorterEarned => "You earned a Sorter Power-Up!".to_string(),
            Signal::SorterUsed { .. } => "Sorter used! Bonus time + score!".to_string(),
            Signal::NoCharges => "No sorters left!".to_string(),
            Signal::GameOver => "Game Over! Try again.".to_string(),
            Signal::LampFlicker { .. } => "The lights flicker...".to_string(),
        }
    }
}
