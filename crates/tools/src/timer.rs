use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of recent frame times.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: VecDeque<Duration>,
    capacity: usize,
    last: Option<Instant>,
}

impl FrameTimer {
    /// A window of at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::new(),
            capacity,
            last: None,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(dt);
    }

    /// Record the time since the previous mark. The first mark only starts
    /// the clock.
    pub fn mark(&mut self, now: Instant) {
        if let Some(last) = self.last.replace(now) {
            self.record(now.saturating_duration_since(last));
        }
    }

    pub fn average(&self) -> Duration {
        if self.history.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.history.iter().sum();
        total / self.history.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.history.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.history.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames per second over the window, or zero with no samples.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn count(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_basic() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
        assert_eq!(timer.min(), Duration::from_millis(20));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn huge_window_grows_on_demand() {
        let mut timer = FrameTimer::new(usize::MAX);
        timer.record(Duration::from_millis(4));
        timer.record(Duration::from_millis(8));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(6));
    }

    #[test]
    fn mark_measures_between_calls() {
        let mut timer = FrameTimer::new(8);
        let t0 = Instant::now();
        timer.mark(t0);
        assert_eq!(timer.count(), 0);
        timer.mark(t0 + Duration::from_millis(20));
        assert_eq!(timer.count(), 1);
        assert!((timer.fps() - 50.0).abs() < 1e-6);
    }
}
