//! # Game Error Types
//!
//! Startup and shutdown failures of the assembled game.

use invaders_core::GameError;
use invaders_rendering::RenderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for game assembly.
pub type InvadersResult<T> = Result<T, InvadersError>;

/// Errors raised while assembling, running or stopping the game.
#[derive(Error, Debug)]
pub enum InvadersError {
    /// Entity store could not be built.
    #[error("game objects: {0}")]
    Game(#[from] GameError),

    /// The presenter failed.
    #[error("render: {0}")]
    Render(#[from] RenderError),

    /// Configuration could not be loaded.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// The OS refused to create a task thread.
    #[error("failed to spawn task {name}: {source}")]
    TaskSpawn {
        /// Task name.
        name: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// `start` was called on a game that is already running.
    #[error("game already started")]
    AlreadyStarted,

    /// A task thread panicked.
    #[error("task {name} panicked")]
    TaskPanicked {
        /// Task name.
        name: String,
    },
}
