//! # Entities
//!
//! Every mutable game entity carries its own `parking_lot::Mutex`.
//! Fields are only read or written through methods that take that lock
//! for the duration of one short operation, and no method holds two
//! entity locks at once.

pub mod alien;
pub mod bullet;
pub mod bunker;
pub mod matrix;
pub mod score;
pub mod ship;

pub use alien::{Alien, AlienState, AlienTier, ImageHandle};
pub use bullet::{AlienBulletPool, Bullet, BulletState, Heading};
pub use bunker::{Bunker, BunkerCell, BunkerCells};
pub use matrix::{AlienColumn, AlienMatrix, AlienView, MatrixSnapshot, MatrixStep, SweepDirection};
pub use score::{GameStatus, Score, ScoreState};
pub use ship::{ShipHit, ShipState, Spaceship};
