//! # INVADERS Core
//!
//! Entity store for a concurrent Space-Invaders-style game:
//! - One lock per mutable entity
//! - Fixed-size storage reserved once at startup
//! - Absolute-deadline timing for periodic tasks
//!
//! ## Architecture Rules
//!
//! 1. **No resizing after startup** - Removal is an active-flag transition
//! 2. **One lock at a time** - No operation holds two entity locks
//! 3. **Copy out, then act** - Readers take plain-data snapshots under a brief lock
//! 4. **Level changes own the round** - Gameplay ticks hold it shared, level changes exclusively
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use invaders_core::GameObjects;
//!
//! let objects = Arc::new(GameObjects::try_new()?);
//! objects.ship().shift(5);
//! let snapshot = objects.snapshot();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod constants;
pub mod directory;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod sync;

pub use directory::{GameObjects, GameSnapshot, Layout, RoundGuard};
pub use entities::{
    Alien, AlienBulletPool, AlienMatrix, AlienTier, Bullet, BulletState, Bunker, GameStatus,
    Heading, MatrixStep, Score, ScoreState, ShipHit, ShipState, Spaceship, SweepDirection,
};
pub use error::{GameError, GameResult};
pub use geometry::{Coord, CoordF, Rect};
pub use memory::{ActiveSet, FixedGrid};
pub use sync::{PeriodicTimer, ShutdownSignal, TimerStats};
