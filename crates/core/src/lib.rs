//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on rendering, audio, networking, or storage, making it:
//!
//! - **Deterministic**: Same seed and same ticks produce identical games
//! - **Testable**: Timers advance only through [`GameState::tick`], no wall-clock waits
//! - **Portable**: Can run behind any front end (browser, terminal, headless)
//!
//! # Module Structure
//!
//! - [`puzzle`]: The 12-book shelf, swap and insertion sort
//! - [`rng`]: Seeded LCG and uniform Fisher-Yates shelf generator
//! - [`scoring`]: Placement points, streak bonus, clock arithmetic
//! - [`lamp`]: Cosmetic lamp flicker rolled once per game second
//! - [`game_state`]: Complete session state machine
//! - [`snapshot`]: Read-only copies for presentation and persistence
//! - [`config`]: Rule constants with environment overrides
//!
//! # Game Rules
//!
//! - **Moves**: Select a book and move it one slot left; only smaller-over-larger is allowed
//! - **Invalid move**: costs 3 seconds
//! - **Placement**: a book landing in its home slot scores 10
//! - **Streak**: another placement within 2 seconds adds `min(10 + (streak + 1) * 5, 50)`
//! - **Level**: a sorted shelf adds 15 seconds (capped at 60); a new shelf follows after a 1 second window
//! - **Sorter**: every third level grants a charge; firing it sorts the shelf for 500 points
//!
//! # Example
//!
//! ```
//! use book_blitz_core::{GameState, Puzzle, EngineConfig};
//! use book_blitz_types::{GameAction, Signal};
//!
//! let shelf = Puzzle::new([3, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();
//! let mut game = GameState::with_puzzle(12345, EngineConfig::default(), shelf);
//!
//! game.apply_action(GameAction::Select(1));
//! game.apply_action(GameAction::MoveLeft);
//!
//! assert_eq!(game.score(), 10);
//! assert_eq!(game.take_signals().as_slice(), &[Signal::StreakStarted { book: 1 }]);
//!
//! // One game second
//! game.tick(1000);
//! assert_eq!(game.time_left(), 59);
//! ```

pub mod config;
pub mod game_state;
pub mod lamp;
pub mod puzzle;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use book_blitz_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use game_state::{GameState, Signals, MAX_PENDING_SIGNALS};
pub use lamp::Lamp;
pub use puzzle::Puzzle;
pub use rng::{PuzzleGenerator, SimpleRng};
pub use scoring::{placement_score, streak_bonus, PlacementScore};
pub use snapshot::{FinalScore, GameSnapshot, StreakSnapshot};
