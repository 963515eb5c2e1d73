//! # Frame Orchestrator
//!
//! The presenter thread's main loop.
//!
//! ```text
//!  INIT ──> LOOP ──────────────────────────────────────> STOPPED
//!   │        │ wait next tick                               ^
//!   │        │ clear                                        │
//!   │        │ FrameSource::submit_frame                    │
//!   │        │ drain queue into backend                     │
//!   │        │ present                                      │
//!   │        └──── shutdown signalled ──────────────────────┘
//!   └── bind presenter, first clear
//! ```

use std::sync::Arc;
use std::time::Duration;

use invaders_core::constants::SCREEN_PERIOD_MS;
use invaders_core::{PeriodicTimer, ShutdownSignal};

use crate::backend::DrawBackend;
use crate::command::Color;
use crate::error::RenderResult;
use crate::queue::{DrawSubmitter, Presenter, RenderQueue};
use crate::stats::FrameStats;

/// Producer of the scene drawn each frame.
pub trait FrameSource {
    /// Submits every draw command of frame `frame`.
    ///
    /// Called on the presenter thread between clear and flush. Submissions
    /// that hit a full queue are dropped by the queue itself.
    fn submit_frame(&mut self, frame: u64, submitter: &DrawSubmitter);
}

/// Configuration for the frame orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct FrameConfig {
    /// Time between frames.
    pub period: Duration,
    /// Background colour.
    pub clear_color: Color,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(SCREEN_PERIOD_MS),
            clear_color: Color::BLACK,
        }
    }
}

/// Lifecycle of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Not yet bound.
    Init,
    /// Presenting frames.
    Loop,
    /// Shut down.
    Stopped,
}

/// Owns clear and present, paced on absolute deadlines.
pub struct FrameOrchestrator<B, S> {
    queue: Arc<RenderQueue>,
    backend: B,
    source: S,
    config: FrameConfig,
    state: FrameState,
    stats: FrameStats,
}

impl<B: DrawBackend, S: FrameSource> FrameOrchestrator<B, S> {
    /// Creates an orchestrator in `Init`.
    #[must_use]
    pub fn new(queue: Arc<RenderQueue>, backend: B, source: S, config: FrameConfig) -> Self {
        Self {
            queue,
            backend,
            source,
            config,
            state: FrameState::Init,
            stats: FrameStats::default(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> FrameState {
        self.state
    }

    /// Statistics so far.
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs on the calling thread until `shutdown` is triggered.
    ///
    /// The calling thread becomes the presenter.
    ///
    /// # Errors
    ///
    /// Returns `PresenterAlreadyBound` if the queue already has a presenter
    /// and `Backend` if the backend fails its initial clear.
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> RenderResult<FrameStats> {
        let mut presenter = self.queue.bind_presenter()?;
        self.backend.clear(self.config.clear_color)?;
        self.state = FrameState::Loop;
        tracing::info!(period = ?self.config.period, "frame loop started");

        let submitter = self.queue.submitter();
        let mut timer = PeriodicTimer::new(self.config.period);
        while !shutdown.is_triggered() {
            timer.wait_next();
            if shutdown.is_triggered() {
                break;
            }
            self.frame(&mut presenter, &submitter)?;

            let late = timer.stats().late_ticks;
            if late > self.stats.late_frames {
                tracing::warn!(frame = self.stats.frames, late, "frame started late");
                self.stats.late_frames = late;
            }
        }

        self.state = FrameState::Stopped;
        tracing::info!(
            frames = self.stats.frames,
            dropped = self.stats.commands_dropped,
            truncated = self.stats.truncated_frames,
            "frame loop stopped"
        );
        Ok(self.stats)
    }

    fn frame(
        &mut self,
        presenter: &mut Presenter,
        submitter: &DrawSubmitter,
    ) -> RenderResult<()> {
        if let Err(error) = self.backend.clear(self.config.clear_color) {
            self.stats.backend_failures += 1;
            tracing::warn!(%error, "clear failed");
        }

        let dropped_before = self.queue.stats().dropped;
        self.source.submit_frame(self.stats.frames, submitter);
        let dropped = self.queue.stats().dropped;
        if dropped > dropped_before {
            self.stats.truncated_frames += 1;
            let lost = dropped - dropped_before;
            tracing::debug!(frame = self.stats.frames, lost, "frame truncated");
        }
        let report = presenter.flush(&mut self.backend)?;

        self.stats.frames += 1;
        self.stats.commands_drawn += report.drawn as u64;
        self.stats.backend_failures += report.failed as u64 + u64::from(!report.presented);
        self.stats.commands_dropped = dropped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::command::DrawCommand;
    use crate::error::RenderError;
    use invaders_core::Rect;

    /// Draws `per_frame` boxes and stops the loop after `frames` frames.
    struct Boxes {
        per_frame: i32,
        frames: u64,
        shutdown: ShutdownSignal,
    }

    impl FrameSource for Boxes {
        fn submit_frame(&mut self, frame: u64, submitter: &DrawSubmitter) {
            for x in 0..self.per_frame {
                let command = DrawCommand::filled_box(Rect::new(x, 0, 1, 1), Color::RED);
                let _ = submitter.submit(command);
            }
            if frame + 1 >= self.frames {
                self.shutdown.trigger();
            }
        }
    }

    fn fast() -> FrameConfig {
        FrameConfig { period: Duration::from_millis(1), ..FrameConfig::default() }
    }

    #[test]
    fn test_runs_until_shutdown() {
        let shutdown = ShutdownSignal::new();
        let queue = Arc::new(RenderQueue::new(64));
        let source = Boxes { per_frame: 3, frames: 5, shutdown: shutdown.clone() };
        let mut orchestrator =
            FrameOrchestrator::new(queue, RecordingBackend::new(2), source, fast());
        assert_eq!(orchestrator.state(), FrameState::Init);

        let stats = orchestrator.run(&shutdown).unwrap();
        assert_eq!(orchestrator.state(), FrameState::Stopped);
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.commands_drawn, 15);
        assert_eq!(stats.truncated_frames, 0);
        assert_eq!(orchestrator.backend().presented(), 5);
        assert_eq!(orchestrator.backend().last_frame().unwrap().clear, Some(Color::BLACK));
    }

    #[test]
    fn test_overfull_scene_is_truncated_not_blocked() {
        let shutdown = ShutdownSignal::new();
        let queue = Arc::new(RenderQueue::new(4));
        let source = Boxes { per_frame: 10, frames: 2, shutdown: shutdown.clone() };
        let mut orchestrator =
            FrameOrchestrator::new(Arc::clone(&queue), RecordingBackend::new(1), source, fast());

        let stats = orchestrator.run(&shutdown).unwrap();
        assert_eq!(stats.commands_drawn, 8);
        assert_eq!(stats.commands_dropped, 12);
        assert_eq!(stats.truncated_frames, 2);
        assert!(!stats.is_clean());
    }

    #[test]
    fn test_second_orchestrator_cannot_bind() {
        let shutdown = ShutdownSignal::new();
        let queue = Arc::new(RenderQueue::new(4));
        let _presenter = queue.bind_presenter().unwrap();
        let source = Boxes { per_frame: 0, frames: 1, shutdown: shutdown.clone() };
        let mut orchestrator =
            FrameOrchestrator::new(queue, RecordingBackend::new(1), source, fast());
        assert!(matches!(orchestrator.run(&shutdown), Err(RenderError::PresenterAlreadyBound)));
        assert_eq!(orchestrator.state(), FrameState::Init);
    }

    #[test]
    fn test_stops_immediately_when_already_shut_down() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();
        let queue = Arc::new(RenderQueue::new(4));
        let source = Boxes { per_frame: 1, frames: 100, shutdown: shutdown.clone() };
        let mut orchestrator =
            FrameOrchestrator::new(queue, RecordingBackend::new(1), source, fast());
        assert_eq!(orchestrator.run(&shutdown).unwrap().frames, 0);
        assert_eq!(orchestrator.state(), FrameState::Stopped);
    }
}
