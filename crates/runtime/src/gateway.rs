//! Score persistence gateway
//!
//! At game over the engine freezes a [`FinalScore`]. The gateway merges it into the
//! player's stored record and writes the result back. The storage medium is opaque:
//! anything that can load and save a [`ScoreRecord`] by user id implements [`ScoreStore`].
//!
//! Merge rules:
//! - `total_playtime` accumulates the session's play time
//! - `high_score` keeps the maximum
//! - `high_score_playtime` is overwritten only when the session set a strictly new high score

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::FinalScore;

/// Stored per-user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub total_playtime: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_score_playtime: Option<u32>,
}

impl ScoreRecord {
    /// Merge a finished session into this record.
    pub fn merge(&self, session: FinalScore) -> ScoreRecord {
        let new_high = session.score > self.high_score;
        ScoreRecord {
            high_score: self.high_score.max(session.score),
            total_playtime: self.total_playtime.saturating_add(session.total_play_time),
            high_score_playtime: if new_high {
                Some(session.total_play_time)
            } else {
                self.high_score_playtime
            },
        }
    }
}

/// Storage backend for score records
pub trait ScoreStore: Send + Sync {
    /// Load the record for `user`; `Ok(None)` when the user has no record.
    fn load(&self, user: &str) -> Result<Option<ScoreRecord>>;

    /// Overwrite the record for `user`.
    fn save(&self, user: &str, record: &ScoreRecord) -> Result<()>;
}

/// Load, merge and save in one step.
///
/// The game never creates user records: a missing record is an error.
pub fn persist_final_score(
    store: &dyn ScoreStore,
    user: &str,
    session: FinalScore,
) -> Result<ScoreRecord> {
    let current = store
        .load(user)
        .with_context(|| format!("loading score record for {user}"))?
        .ok_or_else(|| anyhow!("user record not found: {user}"))?;

    let merged = current.merge(session);
    store
        .save(user, &merged)
        .with_context(|| format!("saving score record for {user}"))?;

    log::info!(
        "persisted score for {user}: high {} total {}s",
        merged.high_score,
        merged.total_playtime
    );
    Ok(merged)
}

/// In-process store (tests, offline play)
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: Mutex<HashMap<String, ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an initial record
    pub fn insert(&self, user: impl Into<String>, record: ScoreRecord) -> Result<()> {
        self.lock()?.insert(user.into(), record);
        Ok(())
    }

    pub fn get(&self, user: &str) -> Result<Option<ScoreRecord>> {
        Ok(self.lock()?.get(user).copied())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, ScoreRecord>>> {
        self.records
            .lock()
            .map_err(|_| anyhow!("score store lock poisoned"))
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self, user: &str) -> Result<Option<ScoreRecord>> {
        self.get(user)
    }

    fn save(&self, user: &str, record: &ScoreRecord) -> Result<()> {
        self.insert(user, *record)
    }
}
