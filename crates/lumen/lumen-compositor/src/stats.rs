//! Frame timing
//!
//! Frames always run to completion; one that exceeds the budget is only
//! counted and reported.

use std::time::Duration;

/// Outcome of one [`crate::Compositor::draw`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Wall time spent drawing
    pub duration: Duration,
    /// Duration exceeded the slow-frame budget
    pub slow: bool,
    /// Successful element draw calls (both phases)
    pub drawn: usize,
    /// Element draw calls that returned an error
    pub failed: usize,
}

/// Rolling draw-time statistics
#[derive(Debug, Clone)]
pub struct FrameStats {
    frames: u64,
    slow_frames: u64,
    last: Duration,
    max: Duration,
    total: Duration,
    budget: Duration,
}

impl FrameStats {
    /// Empty statistics with the given slow-frame budget
    pub fn new(budget: Duration) -> Self {
        Self {
            frames: 0,
            slow_frames: 0,
            last: Duration::ZERO,
            max: Duration::ZERO,
            total: Duration::ZERO,
            budget,
        }
    }

    /// Record a frame; returns whether it was slow
    pub fn record(&mut self, duration: Duration) -> bool {
        self.frames = self.frames.saturating_add(1);
        self.last = duration;
        self.max = self.max.max(duration);
        self.total = self.total.saturating_add(duration);

        let slow = duration > self.budget;
        if slow {
            self.slow_frames = self.slow_frames.saturating_add(1);
            tracing::warn!(
                duration_ms = duration.as_secs_f64() * 1000.0,
                budget_ms = self.budget.as_secs_f64() * 1000.0,
                frame = self.frames,
                "slow frame"
            );
        }
        slow
    }

    /// Frames recorded
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames over budget
    pub fn slow_frames(&self) -> u64 {
        self.slow_frames
    }

    /// Most recent frame duration
    pub fn last(&self) -> Duration {
        self.last
    }

    /// Longest frame so far
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Mean frame duration
    pub fn average(&self) -> Duration {
        match u32::try_from(self.frames) {
            Ok(n) => self.total.checked_div(n).unwrap_or(Duration::ZERO),
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.frames as f64),
        }
    }

    /// Slow-frame threshold
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Change the slow-frame threshold
    pub fn set_budget(&mut self, budget: Duration) {
        self.budget = budget;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_average() {
        let mut stats = FrameStats::new(Duration::from_millis(16));
        assert_eq!(stats.average(), Duration::ZERO);

        assert!(!stats.record(Duration::from_millis(10)));
        assert!(stats.record(Duration::from_millis(30)));
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.slow_frames(), 1);
        assert_eq!(stats.last(), Duration::from_millis(30));
        assert_eq!(stats.max(), Duration::from_millis(30));
        assert_eq!(stats.average(), Duration::from_millis(20));
    }

    #[test]
    fn test_exactly_budget_is_not_slow() {
        let mut stats = FrameStats::new(Duration::from_millis(16));
        assert!(!stats.record(Duration::from_millis(16)));
    }
}
