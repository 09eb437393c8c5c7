use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    pub now: Instant,

    /// Zero-based frame counter.
    pub frame_index: u64,

    /// Frames per second averaged over the last [`FrameClock::FPS_WINDOW`] frames.
    pub fps: f32,
}

/// Produces [`FrameTime`]s for a render loop.
///
/// `dt` is clamped so a debugger pause or minimised window does not produce
/// a huge step, and never reaches zero.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,

    window: [f32; Self::FPS_WINDOW],
    window_len: usize,
    window_sum: f32,
}

impl FrameClock {
    pub const FPS_WINDOW: usize = 60;

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Clock whose first tick measures from `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            window: [0.0; Self::FPS_WINDOW],
            window_len: 0,
            window_sum: 0.0,
        }
    }

    pub fn with_clamps(mut self, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        self.dt_min = dt_min;
        self.dt_max = dt_max;
        self
    }

    /// Restarts delta measurement, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();
        self.last = now;

        let slot = (self.frame_index % Self::FPS_WINDOW as u64) as usize;
        self.window_sum += dt - self.window[slot];
        self.window[slot] = dt;
        self.window_len = (self.window_len + 1).min(Self::FPS_WINDOW);

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
            fps: self.window_len as f32 / self.window_sum.max(f32::EPSILON),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_delta_between_ticks() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(32)).frame_index, 1);
    }

    #[test]
    fn clamps_long_stalls() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn never_returns_zero_dt() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert!(clock.tick_at(t0).dt > 0.0);
    }

    #[test]
    fn fps_averages_recent_frames() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let mut ft = None;
        for i in 1..=200u64 {
            ft = Some(clock.tick_at(t0 + Duration::from_millis(10 * i)));
        }
        let fps = ft.map(|f| f.fps).unwrap_or_default();
        assert!((fps - 100.0).abs() < 0.5, "fps {fps}");
    }
}
