//! Runtime module - drives the engine in real time and persists results
//!
//! The core engine is a pure state machine that only moves when told to. This crate
//! supplies the pieces around it:
//!
//! - **Scheduler**: a single tokio task owns the [`GameState`](core::GameState),
//!   applies queued actions and drives `tick` from one interval
//! - **Fan-out**: snapshots over a `watch` channel, signals over a `broadcast` channel
//! - **Score gateway**: at game over the frozen final score is merged into the
//!   player's stored record on a separate task
//!
//! # Environment Variables
//!
//! - `BOOK_BLITZ_TICK_MS`: scheduler cadence (default: 100)
//! - `BOOK_BLITZ_SEED`: puzzle seed (default: 1)
//! - `BOOK_BLITZ_USER`: user id whose record receives the final score
//! - `BOOK_BLITZ_MAX_PENDING`: action queue depth (default: 32)
//!
//! Rule overrides (`BOOK_BLITZ_STREAK_WINDOW_MS`, ...) are read by
//! [`EngineConfig::from_env`](core::EngineConfig::from_env).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use book_blitz_runtime::{MemoryScoreStore, RuntimeConfig, Session};
//! use book_blitz_runtime::core::EngineConfig;
//! use book_blitz_runtime::types::GameAction;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryScoreStore::new());
//! let handle = Session::spawn(RuntimeConfig::default(), EngineConfig::default(), store);
//!
//! handle.send(GameAction::Select(3)).await?;
//! handle.send(GameAction::MoveLeft).await?;
//! println!("score: {}", handle.snapshot().score);
//!
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod gateway;
pub mod session;

pub use book_blitz_core as core;
pub use book_blitz_types as types;

pub use blocking::BlockingSession;
pub use gateway::{persist_final_score, MemoryScoreStore, ScoreRecord, ScoreStore};
pub use session::{RuntimeConfig, Session, SessionEvent, SessionHandle};
