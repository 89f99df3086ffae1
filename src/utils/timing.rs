use std::time::Duration;

/// accumulates frame times and reports the average frame rate once per interval
#[derive(Debug, Clone)]
pub struct FrameCounter {
    frames: u32,
    accumulated: Duration,
    interval: Duration,
}

impl FrameCounter {
    /// creates a counter that reports every ``interval``
    pub fn new(interval: Duration) -> Self {
        Self {
            frames: 0,
            accumulated: Duration::ZERO,
            interval,
        }
    }

    /// accounts one frame that took ``elapsed``, yields the average fps when an interval is full
    pub fn tick(&mut self, elapsed: Duration) -> Option<f64> {
        self.frames += 1;
        self.accumulated += elapsed;
        if self.accumulated < self.interval || self.accumulated.is_zero() {
            return None;
        }
        let fps = self.frames as f64 / self.accumulated.as_secs_f64();
        self.frames = 0;
        self.accumulated = Duration::ZERO;
        log::info!("{fps:.1} fps");
        Some(fps)
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let mut counter = FrameCounter::default();
        let frame = Duration::from_millis(250);
        assert_eq!(counter.tick(frame), None);
        assert_eq!(counter.tick(frame), None);
        assert_eq!(counter.tick(frame), None);
        let fps = counter.tick(frame).unwrap();
        assert!((fps - 4.0).abs() < 1e-9);
        assert_eq!(counter.tick(frame), None);
    }

    #[test]
    fn slow_frame_reports_immediately() {
        let mut counter = FrameCounter::new(Duration::from_secs(1));
        let fps = counter.tick(Duration::from_secs(2)).unwrap();
        assert!((fps - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_interval_never_reports_infinite_rates() {
        let mut counter = FrameCounter::new(Duration::ZERO);
        assert_eq!(counter.tick(Duration::ZERO), None);
        assert_eq!(counter.tick(Duration::ZERO), None);
        let fps = counter.tick(Duration::from_millis(500)).unwrap();
        assert!(fps.is_finite());
        assert!((fps - 6.0).abs() < 1e-9);
    }
}
