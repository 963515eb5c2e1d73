//! Formation sweep, level progression and invasion.

use std::sync::Arc;

use invaders_core::constants::BUNKER_POSITION_Y;
use invaders_core::{GameObjects, MatrixStep};

use crate::scheduler::PeriodicTask;

/// What one formation tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormationTick {
    /// The formation was stepped.
    Moved(MatrixStep),
    /// The cleared formation was revived for `level`; nothing moved.
    LevelStarted {
        /// The level now being played.
        level: u32,
    },
}

/// Sweeps the formation and advances levels.
pub struct AlienMatrixTask {
    objects: Arc<GameObjects>,
}

impl AlienMatrixTask {
    /// Creates the task.
    #[must_use]
    pub fn new(objects: Arc<GameObjects>) -> Self {
        Self { objects }
    }

    /// Runs one tick and reports what the formation did.
    ///
    /// A cleared formation spends the tick on the level change.
    pub fn step(&self) -> FormationTick {
        {
            let _round = self.objects.hold_round();
            if !self.objects.aliens().is_cleared() {
                return FormationTick::Moved(self.sweep());
            }
        }
        // The round is released: the level change needs it exclusively
        match self.objects.advance_level() {
            Some(level) => FormationTick::LevelStarted { level },
            None => FormationTick::Moved(MatrixStep::Idle),
        }
    }

    fn sweep(&self) -> MatrixStep {
        let aliens = self.objects.aliens();
        let score = self.objects.score();
        let step = aliens.step();
        if let MatrixStep::Dropped { direction, .. } = step {
            tracing::debug!(?direction, speed = aliens.speed(), "formation dropped");
        }

        #[allow(clippy::cast_precision_loss)]
        let invaded = aliens
            .lowest_edge()
            .is_some_and(|edge| edge >= BUNKER_POSITION_Y as f32);
        if invaded && score.game_over() {
            tracing::info!(score = score.snapshot().current, "game over: aliens reached the bunkers");
        }
        step
    }
}

impl PeriodicTask for AlienMatrixTask {
    fn tick(&mut self) {
        if self.objects.score().is_playing() {
            self.step();
        }
    }
}
