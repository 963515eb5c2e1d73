//! # INVADERS Rendering
//!
//! Serializes draw commands from every task into one presenter thread.
//!
//! ## Architecture
//!
//! - [`RenderQueue`]: bounded queue; [`DrawSubmitter`] handles never block
//! - [`Presenter`]: consumer token bound to a single thread
//! - [`FrameOrchestrator`]: the presenter's clear/submit/flush/present loop
//! - [`DrawBackend`]: seam to the drawing library
//!
//! ## Usage
//!
//! ```rust,ignore
//! let queue = Arc::new(RenderQueue::new(1024));
//! let mut frames = FrameOrchestrator::new(queue, NullBackend::default(), scene, FrameConfig::default());
//! frames.run(&shutdown)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod command;
pub mod error;
pub mod frame;
pub mod queue;
pub mod stats;

pub use backend::{BackendError, DrawBackend, NullBackend, RecordedFrame, RecordingBackend};
pub use command::{Color, DrawCommand, Shape};
pub use error::{RenderError, RenderResult};
pub use frame::{FrameConfig, FrameOrchestrator, FrameSource, FrameState};
pub use queue::{DrawSubmitter, Presenter, RenderQueue};
pub use stats::{FlushReport, FrameStats, QueueStats};
