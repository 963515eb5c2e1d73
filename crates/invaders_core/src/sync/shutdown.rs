//! # Shutdown Signal
//!
//! Global stop flag shared by every periodic task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to a global shutdown flag.
///
/// Once triggered it stays triggered. Tasks check it after every wake-up
/// and leave their loop before acting.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown of every task sharing this signal.
    pub fn trigger(&self) {
        if !self.flag.swap(true, Ordering::AcqRel) {
            tracing::info!("shutdown requested");
        }
    }

    /// Returns true once shutdown has been requested.
    #[inline]
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_shared() {
        let signal = ShutdownSignal::new();
        let other = signal.clone();
        assert!(!other.is_triggered());

        signal.trigger();
        assert!(other.is_triggered());

        // Triggering twice is harmless
        other.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_visible_across_threads() {
        let signal = ShutdownSignal::new();
        let remote = signal.clone();
        std::thread::spawn(move || remote.trigger()).join().unwrap();
        assert!(signal.is_triggered());
    }
}
