//! Render queue and frame statistics.

/// Counters of the render queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Commands accepted into the queue.
    pub submitted: u64,
    /// Commands dropped because the queue was full.
    pub dropped: u64,
    /// Commands handed to the backend successfully.
    pub drawn: u64,
    /// Backend calls that failed during flushes.
    pub backend_failures: u64,
    /// Commands waiting for the next flush.
    pub pending: usize,
}

impl QueueStats {
    /// Share of submissions that were dropped, between 0 and 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn drop_ratio(&self) -> f64 {
        let offered = self.submitted + self.dropped;
        if offered == 0 {
            0.0
        } else {
            self.dropped as f64 / offered as f64
        }
    }
}

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Commands drawn.
    pub drawn: usize,
    /// Commands the backend refused.
    pub failed: usize,
    /// Whether the frame reached the screen.
    pub presented: bool,
}

/// Statistics of the frame orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames presented.
    pub frames: u64,
    /// Commands drawn across all frames.
    pub commands_drawn: u64,
    /// Commands dropped by the queue across all frames.
    pub commands_dropped: u64,
    /// Frames that lost at least one command to a full queue.
    pub truncated_frames: u64,
    /// Failed backend calls (clear, draw or present).
    pub backend_failures: u64,
    /// Frames that started more than one period late.
    pub late_frames: u64,
}

impl FrameStats {
    /// Average commands drawn per frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn commands_per_frame(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.commands_drawn as f64 / self.frames as f64
        }
    }

    /// Returns true if no frame was late and nothing was dropped.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.late_frames == 0 && self.commands_dropped == 0 && self.backend_failures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_ratio() {
        let stats = QueueStats { submitted: 3, dropped: 1, ..QueueStats::default() };
        assert!((stats.drop_ratio() - 0.25).abs() < f64::EPSILON);
        assert!(QueueStats::default().drop_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_commands_per_frame() {
        let stats = FrameStats { frames: 4, commands_drawn: 10, ..FrameStats::default() };
        assert!((stats.commands_per_frame() - 2.5).abs() < f64::EPSILON);
        assert!(stats.is_clean());
        assert!(!FrameStats { late_frames: 1, ..stats }.is_clean());
    }
}
