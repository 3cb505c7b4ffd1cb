//! Snapshot module - read-only copies of the game for presentation and persistence

use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;
use crate::types::{Phase, SHELF_SIZE};

/// Result of a finished game, frozen at the instant the clock ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: u32,
    /// Seconds played in the session.
    pub total_play_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub count: u32,
    pub window_ms: u32,
    pub last_correct_at_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub books: [u8; SHELF_SIZE],
    pub selection: Option<u8>,
    pub phase: Phase,
    pub episode_id: u32,
    pub seed: u32,
    pub clock_ms: u64,
    pub score: u32,
    pub time_left: u32,
    pub sorter_charges: u32,
    pub total_play_time: u32,
    pub completed_levels: u32,
    pub streak: StreakSnapshot,
    pub lamp_on: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.books = Puzzle::SORTED_BOOKS;
        self.selection = None;
        self.phase = Phase::Playing;
        self.episode_id = 0;
        self.seed = 0;
        self.clock_ms = 0;
        self.score = 0;
        self.time_left = 0;
        self.sorter_charges = 0;
        self.total_play_time = 0;
        self.completed_levels = 0;
        self.streak = StreakSnapshot {
            count: 0,
            window_ms: 0,
            last_correct_at_ms: None,
        };
        self.lamp_on = true;
    }

    pub fn playable(&self) -> bool {
        self.phase.playable()
    }

    /// The persistence pair, only once the game has ended
    pub fn final_score(&self) -> Option<FinalScore> {
        (self.phase == Phase::GameOver).then_some(FinalScore {
            score: self.score,
            total_play_time: self.total_play_time,
        })
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            books: Puzzle::SORTED_BOOKS,
            selection: None,
            phase: Phase::Playing,
            episode_id: 0,
            seed: 0,
            clock_ms: 0,
            score: 0,
            time_left: 0,
            sorter_charges: 0,
            total_play_time: 0,
            completed_levels: 0,
            streak: StreakSnapshot {
                count: 0,
                window_ms: 0,
                last_correct_at_ms: None,
            },
            lamp_on: true,
        }
    }
}
