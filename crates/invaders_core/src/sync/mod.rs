//! # Synchronization Primitives for Periodic Tasks
//!
//! ## The Problem
//!
//! ```text
//! Ship task:        MUTATE ship        (every 20ms)
//! Alien task:       MUTATE aliens      (every 10ms)
//! Screen task:      READ everything    (every 16ms)
//! ```
//!
//! Every task runs on its own thread, wakes on an absolute deadline and must
//! stop cleanly when the game shuts down.
//!
//! ## The Solution
//!
//! - [`PeriodicTimer`]: delay-until on absolute deadlines (`last_wake + period`),
//!   so jitter in one tick never accumulates into drift.
//! - [`ShutdownSignal`]: one shared flag checked by every task before it acts.

mod shutdown;
mod timer;

pub use shutdown::ShutdownSignal;
pub use timer::{PeriodicTimer, TimerStats};
