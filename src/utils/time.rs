#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Measures the time between successive ticks.
///
/// The first tick after construction (or [`DeltaClock::reset`]) reports zero,
/// and every delta is clamped to `max_delta` so a host that stalled (hidden
/// tab, debugger, suspended laptop) does not produce one enormous step.
#[derive(Debug, Clone)]
pub struct DeltaClock {
    last_tick: Option<Instant>,
    max_delta: Duration,
    /// Total number of ticks
    pub tick_count: u64,
}

impl DeltaClock {
    #[must_use]
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last_tick: None,
            max_delta,
            tick_count: 0,
        }
    }

    /// Records `now` and returns the clamped delta in seconds.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last))
            .min(self.max_delta);
        self.last_tick = Some(now);
        self.tick_count += 1;
        delta.as_secs_f32()
    }

    #[must_use]
    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    pub fn reset(&mut self) {
        self.last_tick = None;
    }
}
