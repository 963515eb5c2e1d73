//! # Score
//!
//! Points, level and remaining lives.

use parking_lot::Mutex;

use crate::constants::PLAYER_LIVES;

/// Whether the round is still being played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameStatus {
    /// Aliens and player are alive.
    #[default]
    Playing,
    /// The player ran out of lives or the aliens landed.
    GameOver,
}

/// Plain-data view of the score board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreState {
    /// Points this game.
    pub current: u32,
    /// Best score seen since startup.
    pub high: u32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Mirror of the ship's extra lives.
    pub lives_left: u32,
    /// Playing or over.
    pub status: GameStatus,
}

impl ScoreState {
    fn fresh(high: u32) -> Self {
        Self {
            current: 0,
            high,
            level: 1,
            lives_left: PLAYER_LIVES,
            status: GameStatus::Playing,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::fresh(0)
    }
}

/// Score board guarded by a single lock.
#[derive(Debug, Default)]
pub struct Score {
    state: Mutex<ScoreState>,
}

impl Score {
    /// Zeroed score on level one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> ScoreState {
        *self.state.lock()
    }

    /// Adds `points` and raises the high score if beaten.
    ///
    /// Ignored once the game is over. Returns the new score.
    pub fn add(&self, points: u32) -> u32 {
        let mut state = self.state.lock();
        if state.status == GameStatus::Playing {
            state.current = state.current.saturating_add(points);
            state.high = state.high.max(state.current);
        }
        state.current
    }

    /// Mirrors the ship's extra lives.
    pub fn set_lives(&self, lives: u32) {
        self.state.lock().lives_left = lives;
    }

    /// Ends the game. Returns false if it was already over.
    pub fn game_over(&self) -> bool {
        let mut state = self.state.lock();
        std::mem::replace(&mut state.status, GameStatus::GameOver) == GameStatus::Playing
    }

    /// Returns true while the game is being played.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.lock().status == GameStatus::Playing
    }

    /// Moves to the next level and returns it.
    pub fn next_level(&self) -> u32 {
        let mut state = self.state.lock();
        state.level += 1;
        state.level
    }

    /// Starts a new game, keeping the high score.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        *state = ScoreState::fresh(state.high);
    }
}
