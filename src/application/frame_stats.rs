use std::time::{Duration, Instant};

/// Counts presented frames and reports the rate once per interval.
#[derive(Debug)]
pub struct FrameStats {
    interval: Duration,
    window_start: Instant,
    frames_in_window: u32,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            window_start: now,
            frames_in_window: 0,
            total_frames: 0,
        }
    }

    /// Record one presented frame.
    ///
    /// Returns the frames per second over the last interval once the interval
    /// has elapsed, then starts a new interval.
    pub fn frame_presented(&mut self, now: Instant) -> Option<f64> {
        self.frames_in_window += 1;
        self.total_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let fps = self.frames_in_window as f64 / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames_in_window = 0;
        Some(fps)
    }

    /// Every frame presented since creation.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut stats = FrameStats::new(Duration::from_secs(1), start);

        for i in 1..60 {
            let now = start + Duration::from_millis(i * 16);
            assert_eq!(stats.frame_presented(now), None);
        }
        let fps = stats
            .frame_presented(start + Duration::from_secs(1))
            .unwrap();
        assert!((fps - 60.0).abs() < f64::EPSILON);
        assert_eq!(stats.total_frames(), 60);

        // the next interval starts empty
        assert_eq!(
            stats.frame_presented(start + Duration::from_millis(1500)),
            None
        );
        assert_eq!(stats.total_frames(), 61);
    }
}
