//! # Memory Management
//!
//! Fixed-capacity containers for the entity store.
//!
//! ## Design Philosophy
//!
//! All entity storage is reserved once at startup. During a run:
//! - Collections never grow or shrink
//! - "Destroyed" entities stay in place with their active flag cleared
//! - Index back-references remain valid for the whole run

mod active_set;
mod grid;

pub use active_set::ActiveSet;
pub use grid::{try_fixed_slice, FixedGrid};
