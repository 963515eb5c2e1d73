//! # Game Assembly
//!
//! Wires the entity directory, the periodic tasks and the presenter thread.
//!
//! ```text
//!                ┌────────────── Arc<GameObjects> ──────────────┐
//!                │                                              │
//! input (4) ─> Controls ─> ship (3)          alien_matrix (2)   │
//!                          player_bullet (3) alien_bullets (2)  │
//!                                                               │
//! screen (1): FrameOrchestrator ── Scene ── snapshot() <────────┘
//! ```
//!
//! Numbers are task priorities; threads start highest first.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use invaders_core::{GameObjects, GameSnapshot, ShutdownSignal};
use invaders_rendering::{
    Color, DrawBackend, FrameConfig, FrameOrchestrator, FrameStats, QueueStats, RenderQueue,
    RenderResult,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;
use crate::error::{InvadersError, InvadersResult};
use crate::input::{input_channel, Controls, InputHandle, InputTask};
use crate::scene::Scene;
use crate::scheduler::{spawn_named, Scheduler, TaskReport, TaskSpec};
use crate::tasks::{AlienBulletTask, AlienMatrixTask, PlayerBulletTask, ShipTask};

/// Priority of the input task.
pub const INPUT_PRIORITY: u8 = 4;
/// Priority of the ship and player bullet tasks.
pub const PLAYER_PRIORITY: u8 = 3;
/// Priority of the alien tasks.
pub const ALIEN_PRIORITY: u8 = 2;
/// Priority of the presenter.
pub const SCREEN_PRIORITY: u8 = 1;

/// Summary of a finished game.
#[derive(Debug, Clone)]
pub struct GameReport {
    /// One entry per gameplay task.
    pub tasks: Vec<TaskReport>,
    /// Presenter statistics.
    pub frames: FrameStats,
    /// Render queue counters.
    pub queue: QueueStats,
    /// Final state.
    pub snapshot: GameSnapshot,
    /// Milliseconds between construction and shutdown.
    pub uptime_ms: u64,
}

/// A running or ready-to-run game.
pub struct Game {
    config: GameConfig,
    objects: Arc<GameObjects>,
    controls: Arc<Controls>,
    queue: Arc<RenderQueue>,
    scheduler: Scheduler,
    input: InputHandle,
    input_task: Option<InputTask>,
    presenter: Option<JoinHandle<RenderResult<FrameStats>>>,
}

impl Game {
    /// Builds every entity and channel. No thread is started.
    ///
    /// # Errors
    ///
    /// Returns `Config` for invalid values and `Game` if the entities
    /// cannot be allocated.
    pub fn new(config: GameConfig) -> InvadersResult<Self> {
        config.validate()?;
        let objects = Arc::new(GameObjects::try_new()?);
        let scheduler = Scheduler::new(ShutdownSignal::new());
        let controls = Arc::new(Controls::default());
        let (input, input_task) = input_channel(
            config.input_queue_capacity,
            Arc::clone(&controls),
            scheduler.control(),
            Arc::clone(&objects),
        );
        let queue = Arc::new(RenderQueue::new(config.render_queue_capacity));

        Ok(Self {
            config,
            objects,
            controls,
            queue,
            scheduler,
            input,
            input_task: Some(input_task),
            presenter: None,
        })
    }

    /// Handle for player requests.
    #[must_use]
    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    /// The entity directory.
    #[must_use]
    pub const fn objects(&self) -> &Arc<GameObjects> {
        &self.objects
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns false once quit or shutdown was requested.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.scheduler.control().shutdown().is_triggered()
    }

    /// Returns true while gameplay is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// Milliseconds since construction.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick_count()
    }

    /// Starts every task and the presenter, which draws into `backend`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyStarted` on a second call and `TaskSpawn` if a
    /// thread cannot be created; threads already started are stopped.
    pub fn start<B>(&mut self, backend: B) -> InvadersResult<()>
    where
        B: DrawBackend + Send + 'static,
    {
        let input_task = self.input_task.take().ok_or(InvadersError::AlreadyStarted)?;
        self.add_tasks(input_task);
        self.scheduler.start()?;

        let control = self.scheduler.control();
        let shutdown = control.shutdown().clone();
        let scene = Scene::new(Arc::clone(&self.objects), control);
        let frames = FrameConfig {
            period: self.config.screen_period(),
            clear_color: Color::BLACK,
        };
        let queue = Arc::clone(&self.queue);
        let presenter = spawn_named("screen", self.config.task_stack_size, move || {
            FrameOrchestrator::new(queue, backend, scene, frames).run(&shutdown)
        });

        match presenter {
            Ok(handle) => {
                self.presenter = Some(handle);
                tracing::info!(priority = SCREEN_PRIORITY, "game started");
                Ok(())
            }
            Err(error) => {
                let _ = self.scheduler.shutdown_and_join();
                Err(error)
            }
        }
    }

    fn add_tasks(&mut self, input_task: InputTask) {
        let config = &self.config;
        let spec = |name: &str, priority: u8, period_ms: u64| {
            TaskSpec::new(name, priority, Duration::from_millis(period_ms), config.task_stack_size)
        };

        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let objects = &self.objects;
        let controls = &self.controls;
        self.scheduler.add(spec("input", INPUT_PRIORITY, config.input_period_ms), input_task);
        self.scheduler.add(
            spec("ship", PLAYER_PRIORITY, config.ship_period_ms),
            ShipTask::new(Arc::clone(objects), Arc::clone(controls), config.ship_speed),
        );
        self.scheduler.add(
            spec("player_bullet", PLAYER_PRIORITY, config.player_bullet_period_ms),
            PlayerBulletTask::new(Arc::clone(objects), Arc::clone(controls), config.bullet_speed),
        );
        self.scheduler.add(
            spec("alien_matrix", ALIEN_PRIORITY, config.alien_matrix_period_ms),
            AlienMatrixTask::new(Arc::clone(objects)),
        );
        self.scheduler.add(
            spec("alien_bullets", ALIEN_PRIORITY, config.alien_bullet_period_ms),
            AlienBulletTask::new(
                Arc::clone(objects),
                rng,
                config.shoot_chance,
                config.alien_bullet_speed,
            ),
        );
    }

    /// Stops every thread and reports.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the presenter failed and `TaskPanicked` if a
    /// thread panicked. Every thread is joined regardless.
    pub fn shutdown(mut self) -> InvadersResult<GameReport> {
        self.scheduler.control().shutdown().trigger();

        let frames = match self.presenter.take().map(JoinHandle::join) {
            None => Ok(FrameStats::default()),
            Some(Ok(result)) => result.map_err(InvadersError::from),
            Some(Err(_)) => Err(InvadersError::TaskPanicked { name: "screen".to_owned() }),
        };
        let tasks = self.scheduler.shutdown_and_join()?;
        let frames = frames?;

        let report = GameReport {
            tasks,
            frames,
            queue: self.queue.stats(),
            snapshot: self.objects.snapshot(),
            uptime_ms: self.scheduler.tick_count(),
        };
        tracing::info!(
            score = report.snapshot.score.current,
            frames = report.frames.frames,
            uptime_ms = report.uptime_ms,
            "game stopped"
        );
        Ok(report)
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.scheduler.control().shutdown().trigger();
        if let Some(presenter) = self.presenter.take() {
            let _ = presenter.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_rendering::NullBackend;

    fn fast_config() -> GameConfig {
        GameConfig {
            input_period_ms: 1,
            ship_period_ms: 1,
            player_bullet_period_ms: 1,
            alien_matrix_period_ms: 1,
            alien_bullet_period_ms: 1,
            screen_period_ms: 2,
            rng_seed: Some(3),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig { render_queue_capacity: 0, ..GameConfig::default() };
        assert!(matches!(Game::new(config), Err(InvadersError::Config(_))));
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut game = Game::new(fast_config()).unwrap();
        game.start(NullBackend::default()).unwrap();
        assert!(matches!(game.start(NullBackend::default()), Err(InvadersError::AlreadyStarted)));
        game.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_without_start() {
        let game = Game::new(GameConfig::default()).unwrap();
        let report = game.shutdown().unwrap();
        assert!(report.tasks.is_empty());
        assert_eq!(report.frames.frames, 0);
    }

    #[test]
    fn test_runs_and_reports() {
        let mut game = Game::new(fast_config()).unwrap();
        game.start(NullBackend::default()).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(game.is_running());

        let report = game.shutdown().unwrap();
        let names: Vec<_> = report.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["input", "ship", "player_bullet", "alien_matrix", "alien_bullets"]);
        assert!(report.frames.frames > 0);
        assert!(report.queue.drawn > 0);
    }

    #[test]
    fn test_small_render_queue_reports_truncated_frames() {
        let config = GameConfig { render_queue_capacity: 4, ..fast_config() };
        let mut game = Game::new(config).unwrap();
        game.start(NullBackend::default()).unwrap();
        std::thread::sleep(Duration::from_millis(30));

        let report = game.shutdown().unwrap();
        assert!(report.frames.frames > 0);
        assert_eq!(report.frames.truncated_frames, report.frames.frames);
        assert!(report.queue.dropped > 0);
    }
}
