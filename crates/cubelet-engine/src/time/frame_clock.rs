use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the process is
/// paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (100µs .. 250ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Called after the surface is recreated so the first frame does not
    /// report the reconfiguration stall.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame times over a fixed reporting window.
///
/// `record` returns the mean frames-per-second each time the window elapses.
#[derive(Debug, Clone)]
pub struct FrameRate {
    window: f32,
    elapsed: f32,
    frames: u32,
}

impl FrameRate {
    pub fn new(window_secs: f32) -> Self {
        Self {
            window: window_secs.max(f32::EPSILON),
            elapsed: 0.0,
            frames: 0,
        }
    }

    pub fn record(&mut self, ft: &FrameTime) -> Option<f32> {
        self.elapsed += ft.dt;
        self.frames += 1;

        if self.elapsed < self.window {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed;
        self.elapsed = 0.0;
        self.frames = 0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_increments_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_minimum() {
        let mut clock = FrameClock::new();
        let now = clock.last;
        let ft = clock.tick_at(now);
        assert!((ft.dt - 0.0001).abs() < 1e-7);
    }

    #[test]
    fn dt_is_clamped_to_maximum_after_stall() {
        let mut clock = FrameClock::new();
        let later = clock.last + Duration::from_secs(5);
        assert!((clock.tick_at(later).dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn frame_rate_reports_once_per_window() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let mut rate = FrameRate::new(1.0);
        let start = clock.last;

        let mut reports = Vec::new();
        for i in 1..=120u64 {
            let ft = clock.tick_at(start + Duration::from_millis(i * 10));
            if let Some(fps) = rate.record(&ft) {
                reports.push(fps);
            }
        }

        assert_eq!(reports.len(), 1);
        assert!((reports[0] - 100.0).abs() < 0.5);
    }
}
