use crate::config::InterpolationConfig;
use crate::scene::SceneManager;
use crate::utils::time::{DeltaClock, Duration, Instant};
use crate::viewer::reconciler::AssetReconciler;

/// Fixed-cadence stepper that eases points toward their targets.
///
/// Runs on its own clock, independent of reading arrival and of the render
/// loop. Each step closes `1 - (1 - blend)^(dt * 60)` of the remaining gap,
/// so the motion looks the same at any step rate and never overshoots.
#[derive(Debug)]
pub struct InterpolationDriver {
    clock: DeltaClock,
    blend_factor: f32,
    epsilon: f32,
    interval: Duration,
}

impl InterpolationDriver {
    #[must_use]
    pub fn new(config: &InterpolationConfig) -> Self {
        Self {
            clock: DeltaClock::new(Duration::from_secs_f32(config.max_step_seconds)),
            blend_factor: config.blend_factor.clamp(f32::EPSILON, 1.0),
            epsilon: config.epsilon,
            interval: Duration::from_secs_f32(1.0 / config.steps_per_second),
        }
    }

    #[inline]
    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Fraction of the gap to close after `dt` seconds.
    #[must_use]
    pub fn alpha(&self, dt: f32) -> f32 {
        1.0 - (1.0 - self.blend_factor).powf(dt * 60.0)
    }

    /// Steps the reconciler if at least one interval elapsed since the last
    /// step. Returns whether any point moved.
    ///
    /// The first call only primes the clock.
    pub fn tick(&mut self, now: Instant, reconciler: &mut AssetReconciler, scene: &mut SceneManager) -> bool {
        if let Some(last) = self.clock.last_tick()
            && now.saturating_duration_since(last) < self.interval
        {
            return false;
        }
        let dt = self.clock.tick(now);
        if dt <= 0.0 {
            return false;
        }
        reconciler.step_interpolation(scene, self.alpha(dt), self.epsilon)
    }

    /// Forgets the last step time, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.clock.reset();
    }
}
