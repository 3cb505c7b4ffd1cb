//! Session runtime
//!
//! One tokio task owns the [`GameState`] and is its only mutator. Actions arrive on
//! a bounded channel, a single interval drives [`GameState::tick`], snapshots go out
//! on a `watch` channel and signals on a `broadcast` channel.
//!
//! The interval is only polled while the game is running, and a restart resets it,
//! so no stale tick ever lands after game over or restart. When the game ends the
//! frozen [`FinalScore`] is handed to the score gateway on its own task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::{EngineConfig, FinalScore, GameSnapshot, GameState};
use crate::gateway::{persist_final_score, ScoreRecord, ScoreStore};
use crate::types::{GameAction, Signal, STREAK_DECAY_MS};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Scheduler cadence in milliseconds.
    pub tick_ms: u32,
    pub seed: u32,
    /// User whose record receives the final score; `None` skips persistence.
    pub user_id: Option<String>,
    pub max_pending_actions: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: STREAK_DECAY_MS,
            seed: 1,
            user_id: None,
            max_pending_actions: 32,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    ///
    /// - `BOOK_BLITZ_TICK_MS`: scheduler cadence (default 100)
    /// - `BOOK_BLITZ_SEED`: puzzle seed (default 1)
    /// - `BOOK_BLITZ_USER`: user id for score persistence (default unset)
    /// - `BOOK_BLITZ_MAX_PENDING`: action queue depth (default 32)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    ///
    /// A variable that is set but malformed is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let d = Self::default();
        let value = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let tick_ms = match value("BOOK_BLITZ_TICK_MS") {
            Some(s) => s
                .parse::<u32>()
                .context("BOOK_BLITZ_TICK_MS must be an unsigned integer")?
                .max(1),
            None => d.tick_ms,
        };

        let seed = match value("BOOK_BLITZ_SEED") {
            Some(s) => s
                .parse::<u32>()
                .context("BOOK_BLITZ_SEED must be an unsigned integer")?,
            None => d.seed,
        };

        let max_pending_actions = match value("BOOK_BLITZ_MAX_PENDING") {
            Some(s) => s
                .parse::<usize>()
                .context("BOOK_BLITZ_MAX_PENDING must be an unsigned integer")?
                .max(1),
            None => d.max_pending_actions,
        };

        let user_id = value("BOOK_BLITZ_USER");

        Ok(Self {
            tick_ms,
            seed,
            user_id,
            max_pending_actions,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1) as u64)
    }
}

/// Event published to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Signal { episode_id: u32, signal: Signal },
    GameEnded { episode_id: u32, final_score: FinalScore },
    Persisted { episode_id: u32, record: ScoreRecord },
    PersistFailed { episode_id: u32, message: String },
}

#[derive(Debug)]
enum SessionCommand {
    Action(GameAction),
    Shutdown,
}

/// Handle to a running session task
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<GameSnapshot>,
    event_tx: broadcast::Sender<SessionEvent>,
    task: JoinHandle<GameState>,
}

impl SessionHandle {
    /// Queue an action for the game loop
    pub async fn send(&self, action: GameAction) -> Result<()> {
        self.cmd_tx
            .send(SessionCommand::Action(action))
            .await
            .context("session task has stopped")
    }

    /// Blocking variant for synchronous callers outside the runtime
    pub fn blocking_send(&self, action: GameAction) -> Result<()> {
        self.cmd_tx
            .blocking_send(SessionCommand::Action(action))
            .context("session task has stopped")
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Receiver that wakes on every published snapshot
    pub fn watch(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Stop the loop and return the final engine state
    pub async fn shutdown(self) -> Result<GameState> {
        // The loop may already be gone; the join below reports that.
        let _ = self.cmd_tx.send(SessionCommand::Shutdown).await;
        self.task.await.context("session task panicked")
    }
}

pub struct Session;

impl Session {
    /// Spawn the session loop on the current tokio runtime.
    pub fn spawn(
        config: RuntimeConfig,
        engine: EngineConfig,
        store: Arc<dyn ScoreStore>,
    ) -> SessionHandle {
        let game = GameState::with_config(config.seed, engine);
        Self::spawn_with_state(config, game, store)
    }

    /// Spawn the session loop around an existing engine state.
    pub fn spawn_with_state(
        mut config: RuntimeConfig,
        game: GameState,
        store: Arc<dyn ScoreStore>,
    ) -> SessionHandle {
        config.tick_ms = config.tick_ms.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_actions.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());
        let (event_tx, _) = broadcast::channel(256);

        let task = tokio::spawn(run_session(
            config,
            game,
            store,
            cmd_rx,
            snapshot_tx,
            event_tx.clone(),
        ));

        SessionHandle {
            cmd_tx,
            snapshot_rx,
            event_tx,
            task,
        }
    }
}

async fn run_session(
    config: RuntimeConfig,
    mut game: GameState,
    store: Arc<dyn ScoreStore>,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    event_tx: broadcast::Sender<SessionEvent>,
) -> GameState {
    let period = config.tick_interval();
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "session started (seed {}, tick {}ms)",
        config.seed,
        config.tick_ms
    );

    loop {
        let running = !game.game_over();

        tokio::select! {
            cmd = cmd_rx.recv() => {
                let action = match cmd {
                    Some(SessionCommand::Action(action)) => action,
                    Some(SessionCommand::Shutdown) | None => break,
                };
                let was_over = game.game_over();
                game.apply_action(action);
                if action == GameAction::Restart {
                    ticker.reset();
                }
                publish(&mut game, was_over, &config, &store, &snapshot_tx, &event_tx);
            }
            _ = ticker.tick(), if running => {
                let was_over = game.game_over();
                if game.tick(config.tick_ms) {
                    publish(&mut game, was_over, &config, &store, &snapshot_tx, &event_tx);
                }
            }
        }
    }

    log::info!("session stopped (episode {})", game.episode_id());
    game
}

fn publish(
    game: &mut GameState,
    was_over: bool,
    config: &RuntimeConfig,
    store: &Arc<dyn ScoreStore>,
    snapshot_tx: &watch::Sender<GameSnapshot>,
    event_tx: &broadcast::Sender<SessionEvent>,
) {
    let episode_id = game.episode_id();

    for signal in game.take_signals() {
        // No subscribers is fine.
        let _ = event_tx.send(SessionEvent::Signal { episode_id, signal });
    }

    snapshot_tx.send_replace(game.snapshot());

    if was_over || !game.game_over() {
        return;
    }
    let Some(final_score) = game.final_score() else {
        return;
    };

    let _ = event_tx.send(SessionEvent::GameEnded {
        episode_id,
        final_score,
    });

    match config.user_id.clone() {
        Some(user) => hand_off(Arc::clone(store), user, episode_id, final_score, event_tx.clone()),
        None => log::debug!("no user configured, final score not persisted"),
    }
}

/// Persist on a separate task; the game loop never waits on storage.
fn hand_off(
    store: Arc<dyn ScoreStore>,
    user: String,
    episode_id: u32,
    final_score: FinalScore,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || {
            persist_final_score(store.as_ref(), &user, final_score)
        })
        .await
        .context("persistence task panicked")
        .and_then(|r| r);

        let event = match result {
            Ok(record) => SessionEvent::Persisted { episode_id, record },
            Err(err) => {
                log::error!("error updating game data: {err:#}");
                SessionEvent::PersistFailed {
                    episode_id,
                    message: format!("{err:#}"),
                }
            }
        };
        let _ = event_tx.send(event);
    });
}
