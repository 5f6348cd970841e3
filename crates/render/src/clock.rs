use std::time::{Duration, Instant};

/// Longest frame step handed to update code, in seconds. Longer stalls
/// (window drags, debugger breaks) are clamped to this.
pub const MAX_DELTA_TIME: f32 = 0.0333;

/// Per-frame facts shared with every render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Monotonic frame counter at the time the frame began.
    pub frame_number: u64,
    /// Slot this frame's uniform block lives in.
    pub slot_index: usize,
    /// Clamped seconds since the previous frame.
    pub frame_time: f32,
}

/// Wall-clock frame timer.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            max_delta: MAX_DELTA_TIME,
        }
    }

    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Seconds since the previous tick, clamped to the maximum delta.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.clamp(elapsed)
    }

    pub fn clamp(&self, elapsed: Duration) -> f32 {
        elapsed.as_secs_f32().min(self.max_delta)
    }

    /// Clamp an externally supplied step into `0.0..=max_delta`. Negative and
    /// non-finite steps become zero.
    pub fn clamp_step(&self, seconds: f32) -> f32 {
        if seconds.is_finite() {
            seconds.clamp(0.0, self.max_delta)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_stalls_are_clamped() {
        let clock = FrameClock::new();
        assert_eq!(clock.clamp(Duration::from_secs(2)), MAX_DELTA_TIME);
        assert!((clock.clamp(Duration::from_millis(10)) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn fixed_steps_stay_within_range() {
        let clock = FrameClock::new();
        assert_eq!(clock.clamp_step(-0.5), 0.0);
        assert_eq!(clock.clamp_step(f32::NAN), 0.0);
        assert_eq!(clock.clamp_step(f32::INFINITY), 0.0);
        assert_eq!(clock.clamp_step(1.0), MAX_DELTA_TIME);
        assert_eq!(clock.clamp_step(0.01), 0.01);
    }

    #[test]
    fn tick_never_exceeds_max() {
        let mut clock = FrameClock::new().with_max_delta(0.001);
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.tick() <= 0.001);
        assert!(clock.tick() >= 0.0);
    }
}
