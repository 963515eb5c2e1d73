//! # Core Error Types
//!
//! Errors raised while building the entity store.

use thiserror::Error;

/// Errors that can occur in the entity store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Storage for an entity collection could not be reserved.
    ///
    /// Only raised at startup. The game cannot run without its entities.
    #[error("allocation failure: could not reserve {requested} slots for {entity}")]
    AllocationFailure {
        /// Entity collection being built.
        entity: &'static str,
        /// Number of slots requested.
        requested: usize,
    },

    /// A fixed-size collection was requested with a zero dimension.
    #[error("invalid layout for {entity}: {reason}")]
    InvalidLayout {
        /// Entity collection being built.
        entity: &'static str,
        /// What was wrong.
        reason: &'static str,
    },
}

/// Result type for entity store operations.
pub type GameResult<T> = Result<T, GameError>;
