//! # INVADERS
//!
//! The game crate: periodic gameplay tasks over the shared entity
//! directory, drawn by a single presenter thread.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                              INVADERS                                │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │  ┌─────────────────┐     ┌──────────────────┐     ┌───────────────┐  │
//! │  │ invaders_core   │     │ invaders (this)  │     │ invaders_     │  │
//! │  │                 │<────│                  │────>│ rendering     │  │
//! │  │ • GameObjects   │     │ • Scheduler      │     │               │  │
//! │  │ • Entity locks  │     │ • Tasks          │     │ • RenderQueue │  │
//! │  │ • PeriodicTimer │     │ • Input, Scene   │     │ • Presenter   │  │
//! │  └─────────────────┘     └──────────────────┘     └───────────────┘  │
//! │                                                                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut game = Game::new(GameConfig::load(None)?)?;
//! game.start(NullBackend::default())?;
//! game.input().request_fire();
//! let report = game.shutdown()?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collision;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod scene;
pub mod scheduler;
pub mod tasks;

pub use invaders_core as core;
pub use invaders_rendering as rendering;

pub use config::{ConfigError, GameConfig};
pub use error::{InvadersError, InvadersResult};
pub use game::{Game, GameReport};
pub use input::{InputCommand, InputHandle, MoveDirection};
pub use scheduler::{PeriodicTask, Scheduler, TaskControl, TaskReport, TaskSpec};
