//! # Drawing Backends
//!
//! The seam between the render queue and a real drawing library.
//!
//! A windowing backend implements [`DrawBackend`] outside this workspace.
//! Two backends ship here:
//! - [`RecordingBackend`]: keeps the most recent presented frames
//! - [`NullBackend`]: counts calls and draws nothing

use std::collections::VecDeque;

use thiserror::Error;

use crate::command::{Color, DrawCommand};

/// Failure reported by a drawing backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} failed: {reason}")]
pub struct BackendError {
    /// Operation that failed (`clear`, `draw`, `present`).
    pub operation: &'static str,
    /// Backend-specific description.
    pub reason: String,
}

impl BackendError {
    /// Creates an error for `operation`.
    #[must_use]
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self { operation, reason: reason.into() }
    }
}

/// A drawing library.
///
/// Only ever called from the bound presenter thread.
pub trait DrawBackend {
    /// Clears the back buffer.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the backend cannot clear.
    fn clear(&mut self, color: Color) -> Result<(), BackendError>;

    /// Draws one command into the back buffer.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the command cannot be drawn.
    fn draw(&mut self, command: &DrawCommand) -> Result<(), BackendError>;

    /// Shows the back buffer.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the frame cannot be presented.
    fn present(&mut self) -> Result<(), BackendError>;
}

impl<B: DrawBackend + ?Sized> DrawBackend for &mut B {
    fn clear(&mut self, color: Color) -> Result<(), BackendError> {
        (**self).clear(color)
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), BackendError> {
        (**self).draw(command)
    }

    fn present(&mut self) -> Result<(), BackendError> {
        (**self).present()
    }
}

/// A presented frame as recorded by [`RecordingBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedFrame {
    /// Colour of the last clear before the frame, if any.
    pub clear: Option<Color>,
    /// Commands in draw order.
    pub commands: Vec<DrawCommand>,
}

/// Backend that records frames instead of drawing them.
#[derive(Debug)]
pub struct RecordingBackend {
    /// Frames kept, oldest first.
    frames: VecDeque<RecordedFrame>,
    /// Frame being assembled.
    current: RecordedFrame,
    /// Frames kept before the oldest is discarded.
    retain: usize,
    /// Frames presented in total.
    presented: u64,
    /// Fail every draw call (for exercising error paths).
    fail_draws: bool,
}

impl RecordingBackend {
    /// Keeps the last `retain` frames.
    #[must_use]
    pub fn new(retain: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(retain),
            current: RecordedFrame::default(),
            retain,
            presented: 0,
            fail_draws: false,
        }
    }

    /// A recorder whose `draw` always fails.
    #[must_use]
    pub fn failing_draws(retain: usize) -> Self {
        Self { fail_draws: true, ..Self::new(retain) }
    }

    /// Retained frames, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &RecordedFrame> {
        self.frames.iter()
    }

    /// Most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.back()
    }

    /// Frames presented in total.
    #[must_use]
    pub const fn presented(&self) -> u64 {
        self.presented
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(8)
    }
}

impl DrawBackend for RecordingBackend {
    fn clear(&mut self, color: Color) -> Result<(), BackendError> {
        self.current.clear = Some(color);
        self.current.commands.clear();
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), BackendError> {
        if self.fail_draws {
            return Err(BackendError::new("draw", "recording backend set to fail"));
        }
        self.current.commands.push(command.clone());
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.presented += 1;
        if self.retain == 0 {
            self.current = RecordedFrame::default();
            return Ok(());
        }
        if self.frames.len() == self.retain {
            self.frames.pop_front();
        }
        self.frames.push_back(std::mem::take(&mut self.current));
        Ok(())
    }
}

/// Backend that discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullBackend {
    /// Draw calls received.
    pub draws: u64,
    /// Frames presented.
    pub presents: u64,
}

impl DrawBackend for NullBackend {
    fn clear(&mut self, _color: Color) -> Result<(), BackendError> {
        Ok(())
    }

    fn draw(&mut self, _command: &DrawCommand) -> Result<(), BackendError> {
        self.draws += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.presents += 1;
        Ok(())
    }
}
