//! Game state module - manages the complete game session
//!
//! This module ties together the shelf, the puzzle generator, scoring and the lamp.
//! It handles the game clock, streak decay, level progression and the game lifecycle.
//!
//! All timers are driven by [`GameState::tick`]; nothing here reads the wall clock.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::lamp::Lamp;
use crate::puzzle::Puzzle;
use crate::rng::PuzzleGenerator;
use crate::scoring::{add_time, earns_sorter, placement_score, subtract_time};
use crate::snapshot::{FinalScore, GameSnapshot, StreakSnapshot};
use crate::types::*;

/// Signals buffered between two [`GameState::take_signals`] calls.
pub const MAX_PENDING_SIGNALS: usize = 16;

pub type Signals = ArrayVec<Signal, MAX_PENDING_SIGNALS>;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    generator: PuzzleGenerator,
    puzzle: Puzzle,
    selection: Option<usize>,
    phase: Phase,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    score: u32,
    time_left: u32,
    sorter_charges: u32,
    total_play_time: u32,
    completed_levels: u32,
    streak_count: u32,
    streak_window_ms: u32,
    /// Engine clock of the last correct placement.
    last_correct_at_ms: Option<u64>,
    /// Engine clock: sum of all ticks since the episode started.
    clock_ms: u64,
    /// Partial game second carried between ticks.
    second_accum_ms: u32,
    transition_ms: u32,
    lamp: Lamp,
    final_score: Option<FinalScore>,
    signals: Signals,
}

impl GameState {
    /// Create a new game with the given RNG seed and default rules
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    /// Create a new game with explicit rules
    pub fn with_config(seed: u32, config: EngineConfig) -> Self {
        let mut generator = PuzzleGenerator::new(seed);
        let puzzle = generator.next_puzzle();
        Self::build(generator, puzzle, config)
    }

    /// Create a game starting from a known shelf (replays, tutorials, tests).
    ///
    /// Later levels are still generated from `seed`.
    pub fn with_puzzle(seed: u32, config: EngineConfig, puzzle: Puzzle) -> Self {
        Self::build(PuzzleGenerator::new(seed), puzzle, config)
    }

    fn build(generator: PuzzleGenerator, puzzle: Puzzle, config: EngineConfig) -> Self {
        Self {
            config,
            generator,
            puzzle,
            selection: None,
            phase: Phase::Playing,
            episode_id: 0,
            score: 0,
            time_left: config.start_time_secs,
            sorter_charges: 0,
            total_play_time: 0,
            completed_levels: 0,
            streak_count: 0,
            streak_window_ms: 0,
            last_correct_at_ms: None,
            clock_ms: 0,
            second_accum_ms: 0,
            transition_ms: 0,
            lamp: Lamp::new(),
            final_score: None,
            signals: Signals::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn sorter_charges(&self) -> u32 {
        self.sorter_charges
    }

    pub fn total_play_time(&self) -> u32 {
        self.total_play_time
    }

    pub fn completed_levels(&self) -> u32 {
        self.completed_levels
    }

    pub fn streak_count(&self) -> u32 {
        self.streak_count
    }

    pub fn streak_window_ms(&self) -> u32 {
        self.streak_window_ms
    }

    pub fn last_correct_at_ms(&self) -> Option<u64> {
        self.last_correct_at_ms
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn lamp(&self) -> &Lamp {
        &self.lamp
    }

    /// `(score, total_play_time)` frozen when the game ended; `None` while playing.
    pub fn final_score(&self) -> Option<FinalScore> {
        self.final_score
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.books = *self.puzzle.books();
        out.selection = self.selection.map(|s| s as u8);
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.seed = self.generator.seed();
        out.clock_ms = self.clock_ms;
        out.score = self.score;
        out.time_left = self.time_left;
        out.sorter_charges = self.sorter_charges;
        out.total_play_time = self.total_play_time;
        out.completed_levels = self.completed_levels;
        out.streak = StreakSnapshot {
            count: self.streak_count,
            window_ms: self.streak_window_ms,
            last_correct_at_ms: self.last_correct_at_ms,
        };
        out.lamp_on = self.lamp.is_on();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Take and clear the signals emitted since the last call.
    pub fn take_signals(&mut self) -> Signals {
        std::mem::take(&mut self.signals)
    }

    fn emit(&mut self, signal: Signal) {
        if self.signals.is_full() {
            // Oldest signal loses; callers drain every frame.
            let dropped = self.signals.remove(0);
            log::debug!("signal buffer full, dropping {}", dropped.as_str());
        }
        self.signals.push(signal);
    }

    /// Select the book at `index`.
    pub fn select(&mut self, index: usize) -> bool {
        if !self.phase.playable() || index >= SHELF_SIZE || self.selection == Some(index) {
            return false;
        }
        self.selection = Some(index);
        true
    }

    /// Move the selected book one slot left.
    ///
    /// Returns false when nothing happened (no selection, slot 0, game over).
    /// A rejected larger-over-smaller attempt returns true: it costs clock time.
    pub fn move_selected_left(&mut self) -> bool {
        if !self.phase.playable() {
            return false;
        }
        let Some(slot) = self.selection else {
            return false;
        };
        if slot == 0 {
            return false;
        }

        let books = self.puzzle.books();
        let current = books[slot];
        let left = books[slot - 1];

        if current >= left {
            self.time_left = subtract_time(self.time_left, self.config.invalid_move_penalty_secs);
            self.emit(Signal::InvalidMove);
            if self.time_left == 0 {
                self.enter_game_over();
            }
            return true;
        }

        self.puzzle.swap_left(slot);
        let landed = slot - 1;
        self.selection = Some(landed);

        if self.puzzle.is_placed(landed) {
            self.award_placement(current);
            if self.puzzle.front_is_placed(landed) {
                self.selection = None;
            }
        } else {
            // An unproductive move leaves the streak alone; only the window breaks it.
            self.emit(Signal::Moved { book: current });
        }

        if self.puzzle.is_sorted() {
            self.complete_level();
        }

        true
    }

    fn award_placement(&mut self, book: u8) {
        let streak_alive = self.streak_count > 0 && self.streak_window_ms > 0;
        let result = placement_score(self.streak_count, streak_alive);

        self.score = self.score.saturating_add(result.total);
        self.streak_count = result.streak_after;
        self.streak_window_ms = self.config.streak_window_ms;
        self.last_correct_at_ms = Some(self.clock_ms);

        if result.streak_bonus > 0 {
            self.emit(Signal::CorrectPlacement {
                book,
                bonus: result.streak_bonus,
                streak: result.streak_after,
            });
        } else {
            self.emit(Signal::StreakStarted { book });
        }
    }

    fn complete_level(&mut self) {
        self.time_left = add_time(
            self.time_left,
            self.config.level_bonus_secs,
            self.config.max_time_secs,
        );
        self.completed_levels += 1;
        self.streak_count = 0;
        self.streak_window_ms = 0;
        self.last_correct_at_ms = None;
        self.selection = None;
        self.emit(Signal::LevelComplete);

        if earns_sorter(self.completed_levels, self.config.levels_per_sorter) {
            self.sorter_charges += 1;
            self.emit(Signal::SorterEarned);
        }

        log::debug!(
            "level {} complete (score {}, {}s left)",
            self.completed_levels,
            self.score,
            self.time_left
        );

        // The sorted shelf stays up for the transition window; the next one is dealt after.
        self.transition_ms = self.config.level_transition_ms;
        if self.transition_ms > 0 {
            self.phase = Phase::LevelTransitioning;
        } else {
            self.deal_next_puzzle();
        }
    }

    fn deal_next_puzzle(&mut self) {
        self.puzzle = self.generator.next_puzzle();
        self.lamp.next_level();
        self.transition_ms = 0;
        self.phase = Phase::Playing;
    }

    /// Fire the sorter power-up: insertion-sort the shelf and complete the level.
    ///
    /// Only accepted while `Playing`: during the level-complete window the shelf is
    /// already solved and must not count as a second level.
    pub fn use_sorter(&mut self) -> bool {
        match self.phase {
            Phase::Playing => {}
            Phase::LevelTransitioning => return false,
            Phase::GameOver => {
                self.emit(Signal::GameOver);
                return false;
            }
        }
        if self.sorter_charges == 0 {
            self.emit(Signal::NoCharges);
            return false;
        }

        self.sorter_charges -= 1;
        let shifts = self.puzzle.insertion_sort();
        debug_assert!(self.puzzle.is_sorted());
        log::debug!("sorter fired after {shifts} shifts");

        self.score = self.score.saturating_add(self.config.sorter_bonus);
        self.time_left = add_time(
            self.time_left,
            self.config.sorter_time_bonus_secs,
            self.config.max_time_secs,
        );
        self.emit(Signal::SorterUsed {
            bonus: self.config.sorter_bonus,
        });

        self.complete_level();
        true
    }

    /// Main game tick - advance every timer by `elapsed_ms`.
    ///
    /// Returns true when anything observable changed. Does nothing once the game is over.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.game_over() || elapsed_ms == 0 {
            return false;
        }

        self.clock_ms += elapsed_ms as u64;
        self.lamp.advance(elapsed_ms);

        // Level-complete window
        if self.phase == Phase::LevelTransitioning {
            self.transition_ms = self.transition_ms.saturating_sub(elapsed_ms);
            if self.transition_ms == 0 {
                self.deal_next_puzzle();
            }
        }

        // Streak decay
        if self.streak_count > 0 {
            self.streak_window_ms = self.streak_window_ms.saturating_sub(elapsed_ms);
            if self.streak_window_ms == 0 {
                self.streak_count = 0;
                self.emit(Signal::StreakBroken);
            }
        }

        // Game clock
        self.second_accum_ms = self.second_accum_ms.saturating_add(elapsed_ms);
        while self.second_accum_ms >= CLOCK_STEP_MS {
            self.second_accum_ms -= CLOCK_STEP_MS;
            self.clock_second();
            if self.game_over() {
                break;
            }
        }

        true
    }

    fn clock_second(&mut self) {
        self.total_play_time += 1;
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.enter_game_over();
            return;
        }

        if self.config.lamp_enabled {
            let levels = self.completed_levels;
            if let Some(off_ms) = self.lamp.roll(self.generator.rng_mut(), levels) {
                self.emit(Signal::LampFlicker { off_ms });
            }
        }
    }

    fn enter_game_over(&mut self) {
        if self.game_over() {
            return;
        }
        self.phase = Phase::GameOver;
        self.selection = None;
        self.streak_count = 0;
        self.streak_window_ms = 0;
        self.transition_ms = 0;
        self.second_accum_ms = 0;
        self.lamp.reset();
        self.final_score = Some(FinalScore {
            score: self.score,
            total_play_time: self.total_play_time,
        });
        self.emit(Signal::GameOver);
        log::info!(
            "game over: score {} after {}s ({} levels)",
            self.score,
            self.total_play_time,
            self.completed_levels
        );
    }

    /// Reset the session and deal a fresh shelf. Always succeeds.
    pub fn restart(&mut self) -> bool {
        let next_episode = self.episode_id.wrapping_add(1);
        let config = self.config;
        let mut generator = std::mem::take(&mut self.generator);
        let puzzle = generator.next_puzzle();
        *self = Self::build(generator, puzzle, config);
        self.episode_id = next_episode;
        log::info!("episode {next_episode} started");
        true
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Select(index) => self.select(index as usize),
            GameAction::MoveLeft => self.move_selected_left(),
            GameAction::UseSorter => self.use_sorter(),
            GameAction::Restart => self.restart(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest() -> [u8; 9] {
        [4, 5, 6, 7, 8, 9, 10, 11, 12]
    }

    fn shelf(front: [u8; 3]) -> Puzzle {
        let mut books = [0u8; SHELF_SIZE];
        books[..3].copy_from_slice(&front);
        books[3..].copy_from_slice(&rest());
        Puzzle::new(books).unwrap()
    }

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            lamp_enabled: false,
            ..EngineConfig::default()
        }
    }

    fn game_with(front: [u8; 3]) -> GameState {
        GameState::with_puzzle(12345, quiet_config(), shelf(front))
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.sorter_charges, 0);
        assert_eq!(state.total_play_time, 0);
        assert_eq!(state.completed_levels, 0);
        assert_eq!(state.streak_count, 0);
        assert_eq!(state.episode_id, 0);
        assert!(state.selection.is_none());
        assert!(state.last_correct_at_ms.is_none());
        assert!(state.final_score.is_none());
        assert!(!state.puzzle.is_sorted());
    }

    #[test]
    fn test_select() {
        let mut state = GameState::new(1);
        assert!(state.select(3));
        assert_eq!(state.selection, Some(3));
        // Same index again is a no-op
        assert!(!state.select(3));
        // Out of range
        assert!(!state.select(SHELF_SIZE));
        assert_eq!(state.selection, Some(3));
    }

    #[test]
    fn test_move_without_selection_is_noop() {
        let mut state = game_with([3, 1, 2]);
        let before = state.snapshot();
        assert!(!state.move_selected_left());
        assert_eq!(state.snapshot(), before);
        assert!(state.take_signals().is_empty());
    }

    #[test]
    fn test_move_from_slot_zero_is_noop() {
        let mut state = game_with([3, 1, 2]);
        state.select(0);
        let before = state.snapshot();
        assert!(!state.move_selected_left());
        assert_eq!(state.snapshot(), before);
        assert!(state.take_signals().is_empty());
    }

    #[test]
    fn test_correct_placement_scores() {
        let mut state = game_with([3, 1, 2]);
        state.select(1);
        assert!(state.move_selected_left());

        assert_eq!(state.puzzle.as_slice()[..3], [1, 3, 2]);
        assert_eq!(state.score, 10);
        assert_eq!(state.streak_count, 1);
        assert_eq!(state.streak_window_ms, 2000);
        assert_eq!(state.last_correct_at_ms, Some(0));
        // Slot 0 completes the placed front, selection clears
        assert_eq!(state.selection, None);
        assert_eq!(
            state.take_signals().as_slice(),
            &[Signal::StreakStarted { book: 1 }]
        );
    }

    #[test]
    fn test_final_swap_completes_level() {
        let mut state = game_with([1, 3, 2]);
        state.select(2);
        assert!(state.move_selected_left());

        assert_eq!(state.completed_levels, 1);
        assert_eq!(state.selection, None);
        assert_eq!(state.phase, Phase::LevelTransitioning);
        assert_eq!(state.streak_count, 0);
        assert_eq!(state.streak_window_ms, 0);
        assert!(state.last_correct_at_ms.is_none());
        // Clock already at the cap stays there
        assert_eq!(state.time_left, 60);
        // The sorted shelf stays up until the window closes
        assert_eq!(state.puzzle, Puzzle::sorted());

        let signals = state.take_signals();
        assert_eq!(
            signals.as_slice(),
            &[Signal::StreakStarted { book: 2 }, Signal::LevelComplete]
        );
    }

    #[test]
    fn test_level_transition_ends_after_window() {
        let mut state = game_with([1, 3, 2]);
        state.select(2);
        state.move_selected_left();
        assert_eq!(state.phase, Phase::LevelTransitioning);

        state.tick(500);
        assert_eq!(state.phase, Phase::LevelTransitioning);
        assert!(state.puzzle.is_sorted());
        state.tick(500);
        assert_eq!(state.phase, Phase::Playing);
        assert!(!state.puzzle.is_sorted());
    }

    #[test]
    fn test_zero_transition_deals_immediately() {
        let config = EngineConfig {
            level_transition_ms: 0,
            ..quiet_config()
        };
        let mut state = GameState::with_puzzle(12345, config, shelf([1, 3, 2]));
        state.select(2);
        state.move_selected_left();
        assert_eq!(state.phase, Phase::Playing);
        assert!(!state.puzzle.is_sorted());
    }

    #[test]
    fn test_move_during_transition_uses_sorted_shelf() {
        let mut state = game_with([1, 3, 2]);
        state.time_left = 30;
        state.select(2);
        state.move_selected_left();
        state.take_signals();
        assert_eq!(state.time_left, 45);

        // Input is not gated: the shelf is [1..12], so any move is invalid.
        assert!(state.select(5));
        assert!(state.move_selected_left());
        assert_eq!(state.time_left, 42);
        assert_eq!(state.puzzle, Puzzle::sorted());
        assert_eq!(state.take_signals().as_slice(), &[Signal::InvalidMove]);
    }

    #[test]
    fn test_sorter_ignored_during_transition() {
        let config = EngineConfig {
            levels_per_sorter: 1,
            ..quiet_config()
        };
        let mut state = GameState::with_puzzle(12345, config, shelf([1, 3, 2]));
        state.time_left = 30;
        state.select(2);
        state.move_selected_left();
        state.take_signals();

        assert_eq!(state.phase, Phase::LevelTransitioning);
        assert_eq!(state.completed_levels, 1);
        assert_eq!(state.sorter_charges, 1);
        let before = state.snapshot();

        // The solved shelf is still up; firing now must not count it again.
        assert!(!state.use_sorter());
        assert_eq!(state.snapshot(), before);
        assert_eq!(state.score, 10);
        assert_eq!(state.time_left, 45);
        assert!(state.take_signals().is_empty());

        // Once the next shelf is dealt the charge works as usual.
        state.tick(1000);
        assert_eq!(state.phase, Phase::Playing);
        assert!(state.use_sorter());
        assert_eq!(state.completed_levels, 2);
        assert_eq!(state.score, 510);
    }

    #[test]
    fn test_huge_tick_with_carried_partial_second() {
        let mut state = GameState::with_config(1, quiet_config());
        state.tick(500);
        assert!(state.tick(u32::MAX));
        assert!(state.game_over());
        assert_eq!(state.time_left, 0);
        assert_eq!(state.total_play_time, 60);
    }

    #[test]
    fn test_level_bonus_is_capped() {
        let mut state = game_with([1, 3, 2]);
        state.time_left = 50;
        state.select(2);
        state.move_selected_left();
        assert_eq!(state.time_left, 60);

        let mut state = game_with([1, 3, 2]);
        state.time_left = 20;
        state.select(2);
        state.move_selected_left();
        assert_eq!(state.time_left, 35);
    }

    #[test]
    fn test_invalid_move_penalty() {
        let mut state = game_with([1, 3, 2]);
        // Book 3 over book 1 is not allowed
        state.select(1);
        assert!(state.move_selected_left());

        assert_eq!(state.puzzle.as_slice()[..3], [1, 3, 2]);
        assert_eq!(state.time_left, 57);
        assert_eq!(state.score, 0);
        assert_eq!(state.selection, Some(1));
        assert_eq!(state.take_signals().as_slice(), &[Signal::InvalidMove]);
    }

    #[test]
    fn test_invalid_move_at_low_clock_ends_game() {
        let mut state = game_with([1, 3, 2]);
        state.time_left = 2;
        state.select(1);
        state.move_selected_left();

        assert_eq!(state.time_left, 0);
        assert!(state.game_over());
        assert_eq!(
            state.final_score,
            Some(FinalScore {
                score: 0,
                total_play_time: 0
            })
        );
        assert_eq!(
            state.take_signals().as_slice(),
            &[Signal::InvalidMove, Signal::GameOver]
        );
    }

    #[test]
    fn test_streak_bonus_within_window() {
        let mut state = GameState::with_puzzle(
            7,
            quiet_config(),
            Puzzle::new([4, 1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap(),
        );

        // 1 -> slot 0 (correct, streak 1)
        state.select(1);
        state.move_selected_left();
        let first = state.score;
        assert_eq!(first, 10);

        state.tick(500);

        // [1, 4, 2, 3, ...]: 2 -> slot 1 (correct, streak 2)
        state.select(2);
        state.move_selected_left();
        let second = state.score - first;
        assert_eq!(second, 10 + 20);
        assert!(second > first);
        assert_eq!(state.streak_count, 2);
        assert_eq!(state.last_correct_at_ms, Some(500));
    }

    #[test]
    fn test_streak_restarts_after_window() {
        let mut state = GameState::with_puzzle(
            7,
            quiet_config(),
            Puzzle::new([4, 1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap(),
        );
        state.select(1);
        state.move_selected_left();
        state.take_signals();

        state.tick(2000);
        assert_eq!(state.streak_count, 0);
        assert_eq!(state.take_signals().as_slice(), &[Signal::StreakBroken]);

        // Further ticks do not re-break
        state.tick(100);
        assert!(state.take_signals().is_empty());

        let before = state.score;
        state.select(2);
        state.move_selected_left();
        assert_eq!(state.score - before, 10);
        assert_eq!(state.streak_count, 1);
    }

    #[test]
    fn test_unproductive_move_keeps_streak() {
        let mut state = GameState::with_puzzle(
            7,
            quiet_config(),
            Puzzle::new([4, 1, 3, 2, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap(),
        );
        state.select(1);
        state.move_selected_left();
        assert_eq!(state.streak_count, 1);

        // [1, 4, 3, 2, ...]: 2 -> slot 2 is not home
        state.select(3);
        state.move_selected_left();
        assert_eq!(state.streak_count, 1);
        assert_eq!(state.streak_window_ms, 2000);
        assert_eq!(state.selection, Some(2));
    }

    #[test]
    fn test_selection_kept_when_front_not_placed() {
        // [2, 1, 4, 3, ...]: 3 -> slot 2 is home but slots 0/1 are not.
        let mut state = GameState::with_puzzle(
            7,
            quiet_config(),
            Puzzle::new([2, 1, 4, 3, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap(),
        );
        state.select(3);
        state.move_selected_left();
        assert_eq!(state.score, 10);
        assert_eq!(state.selection, Some(2));
    }

    #[test]
    fn test_tick_counts_down_and_ends_game_once() {
        let mut state = GameState::with_config(1, quiet_config());
        state.time_left = 1;
        state.tick(1000);

        assert_eq!(state.time_left, 0);
        assert!(state.game_over());
        assert_eq!(state.total_play_time, 1);
        assert_eq!(state.take_signals().as_slice(), &[Signal::GameOver]);

        assert!(!state.tick(1000));
        assert_eq!(state.time_left, 0);
        assert_eq!(state.total_play_time, 1);
        assert!(state.take_signals().is_empty());
    }

    #[test]
    fn test_sub_second_ticks_accumulate() {
        let mut state = GameState::with_config(1, quiet_config());
        for _ in 0..9 {
            state.tick(100);
        }
        assert_eq!(state.time_left, 60);
        state.tick(100);
        assert_eq!(state.time_left, 59);
        assert_eq!(state.total_play_time, 1);
        assert_eq!(state.clock_ms, 1000);
    }

    #[test]
    fn test_sorter_without_charges() {
        let mut state = game_with([3, 1, 2]);
        let before = state.snapshot();
        assert!(!state.use_sorter());
        assert_eq!(state.snapshot(), before);
        assert_eq!(state.take_signals().as_slice(), &[Signal::NoCharges]);
    }

    #[test]
    fn test_sorter_after_game_over() {
        let mut state = game_with([3, 1, 2]);
        state.sorter_charges = 2;
        state.time_left = 1;
        state.tick(1000);
        state.take_signals();

        assert!(!state.use_sorter());
        assert_eq!(state.sorter_charges, 2);
        assert_eq!(state.take_signals().as_slice(), &[Signal::GameOver]);
    }

    #[test]
    fn test_sorter_sorts_and_completes_level() {
        let mut state = GameState::with_puzzle(
            3,
            quiet_config(),
            Puzzle::new([12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]).unwrap(),
        );
        state.sorter_charges = 1;
        state.time_left = 30;

        assert!(state.use_sorter());
        assert_eq!(state.puzzle, Puzzle::sorted());
        assert_eq!(state.sorter_charges, 0);
        assert_eq!(state.completed_levels, 1);
        assert_eq!(state.score, 500);
        // +5 sorter, +15 level
        assert_eq!(state.time_left, 50);
        assert_eq!(
            state.take_signals().as_slice(),
            &[Signal::SorterUsed { bonus: 500 }, Signal::LevelComplete]
        );
    }

    #[test]
    fn test_every_third_level_grants_sorter() {
        let mut state = GameState::with_config(3, quiet_config());
        state.sorter_charges = 3;
        for _ in 0..2 {
            state.use_sorter();
            state.tick(1000);
        }
        assert_eq!(state.completed_levels, 2);
        assert_eq!(state.sorter_charges, 1);

        state.take_signals();
        state.use_sorter();
        assert_eq!(state.completed_levels, 3);
        assert_eq!(state.sorter_charges, 1);
        assert!(state.take_signals().contains(&Signal::SorterEarned));
    }

    #[test]
    fn test_restart() {
        let mut state = game_with([3, 1, 2]);
        state.select(1);
        state.move_selected_left();
        state.sorter_charges = 2;
        state.time_left = 1;
        state.tick(1000);
        assert!(state.game_over());

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.completed_levels, 0);
        assert_eq!(state.streak_count, 0);
        assert_eq!(state.sorter_charges, 0);
        assert_eq!(state.total_play_time, 0);
        assert_eq!(state.episode_id, 1);
        assert!(state.final_score.is_none());
        assert!(state.selection.is_none());
        assert!(!state.puzzle.is_sorted());
        assert!(state.take_signals().is_empty());
    }

    #[test]
    fn test_actions_ignored_after_game_over() {
        let mut state = game_with([3, 1, 2]);
        state.time_left = 1;
        state.tick(1000);
        state.take_signals();

        assert!(!state.apply_action(GameAction::Select(1)));
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(state.selection.is_none());
    }

    #[test]
    fn test_signal_buffer_keeps_newest() {
        let mut state = game_with([1, 3, 2]);
        state.select(1);
        for _ in 0..(MAX_PENDING_SIGNALS + 4) {
            state.move_selected_left();
            if state.game_over() {
                break;
            }
        }
        let signals = state.take_signals();
        assert_eq!(signals.len(), MAX_PENDING_SIGNALS);
        assert_eq!(signals.last(), Some(&Signal::GameOver));
    }

    #[test]
    fn test_lamp_flickers_while_playing() {
        let mut state = GameState::new(9);
        let mut flickers = 0;
        for _ in 0..55 {
            state.tick(1000);
            flickers += state
                .take_signals()
                .iter()
                .filter(|s| matches!(s, Signal::LampFlicker { .. }))
                .count();
        }
        assert!(flickers <= LAMP_MAX_BLINKS as usize);
        assert_eq!(flickers as u8, state.lamp.blinks_this_level());
    }
}
