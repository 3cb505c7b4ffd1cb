//! Synchronous session wrapper.
//!
//! Bridges a sync front-end loop with the async session task by owning its own
//! tokio runtime.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::broadcast;

use crate::core::{EngineConfig, GameSnapshot};
use crate::gateway::ScoreStore;
use crate::session::{RuntimeConfig, Session, SessionEvent, SessionHandle};
use crate::types::GameAction;

/// Running session plus the runtime that drives it.
pub struct BlockingSession {
    rt: Runtime,
    handle: Option<SessionHandle>,
    events: broadcast::Receiver<SessionEvent>,
}

impl BlockingSession {
    /// Start a session configured from `BOOK_BLITZ_*` environment variables.
    pub fn start_from_env(store: Arc<dyn ScoreStore>) -> Result<Self> {
        let config = RuntimeConfig::from_env()?;
        let engine = EngineConfig::from_env()?;
        Self::start(config, engine, store)
    }

    pub fn start(
        config: RuntimeConfig,
        engine: EngineConfig,
        store: Arc<dyn ScoreStore>,
    ) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let handle = {
            let _guard = rt.enter();
            Session::spawn(config, engine, store)
        };
        let events = handle.subscribe();
        Ok(Self {
            rt,
            handle: Some(handle),
            events,
        })
    }

    fn handle(&self) -> Result<&SessionHandle> {
        self.handle.as_ref().context("session already shut down")
    }

    /// Queue an action; blocks only while the action queue is full.
    pub fn send(&self, action: GameAction) -> Result<()> {
        self.handle()?.blocking_send(action)
    }

    pub fn snapshot(&self) -> Result<GameSnapshot> {
        Ok(self.handle()?.snapshot())
    }

    /// Next pending event, without blocking.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        loop {
            match self.events.try_recv() {
                Ok(ev) => return Some(ev),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    log::warn!("front end fell behind, {n} session events dropped");
                }
                Err(_) => return None,
            }
        }
    }

    /// Stop the session loop and wait for it to finish.
    pub fn shutdown(mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            let game = self.rt.block_on(handle.shutdown())?;
            log::debug!("session closed at score {}", game.score());
        }
        Ok(())
    }
}
