use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use crate::config::OrbitConfig;
use crate::scene::camera::CameraManager;

/// Residual rotation (in pixels) below which damping is considered finished.
const SETTLE_PIXELS: f32 = 0.01;

/// Damped orbit camera controller.
///
/// Pointer drags and wheel ticks are accumulated by [`rotate`](Self::rotate),
/// [`pan`](Self::pan) and [`dolly`](Self::dolly); [`update`](Self::update)
/// applies them to the [`CameraManager`] once per frame. Rotation decays with
/// a frame-rate independent retention so the camera glides to a stop.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    radius: f32,
    theta: f32,
    phi: f32,

    rotate_delta: Vec2,
    pan_delta: Vec2,
    dolly_steps: f32,
}

impl OrbitControls {
    #[must_use]
    pub fn new(config: &OrbitConfig, min_distance: f32, max_distance: f32) -> Self {
        Self {
            rotate_speed: config.rotate_speed,
            zoom_speed: 0.05,
            pan_speed: config.pan_speed,
            damping_factor: config.damping_factor,
            enable_damping: config.enable_damping,
            min_distance,
            max_distance,

            radius: 1.0,
            theta: 0.0,
            phi: PI / 2.0,

            rotate_delta: Vec2::ZERO,
            pan_delta: Vec2::ZERO,
            dolly_steps: 0.0,
        }
    }

    /// Re-derives the spherical coordinates from the camera and drops any
    /// pending motion. Call after the camera was moved by something else.
    pub fn sync_from(&mut self, camera: &CameraManager) {
        let offset = camera.position() - camera.target();
        self.radius = offset.length().max(f32::EPSILON);
        self.theta = offset.x.atan2(offset.z);
        self.phi = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
        self.stop();
    }

    /// Cancels pending motion, including damped inertia.
    pub fn stop(&mut self) {
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
        self.dolly_steps = 0.0;
    }

    /// Accumulates a rotate drag in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.rotate_delta += delta;
    }

    /// Accumulates a pan drag in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_delta += delta;
    }

    /// Accumulates wheel ticks; positive moves closer.
    pub fn dolly(&mut self, steps: f32) {
        self.dolly_steps += steps;
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.rotate_delta == Vec2::ZERO && self.pan_delta == Vec2::ZERO && self.dolly_steps == 0.0
    }

    /// Applies pending input. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut CameraManager, dt: f32) -> bool {
        if self.is_settled() {
            return false;
        }
        let screen_height = camera.viewport().y.max(1.0);
        let mut center = camera.target();

        if self.rotate_delta != Vec2::ZERO {
            let rotate_per_pixel = 2.0 * PI / screen_height * self.rotate_speed;
            if self.enable_damping {
                let target_fps = 60.0;
                let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
                let applied = self.rotate_delta * (1.0 - retention);
                self.theta -= applied.x * rotate_per_pixel;
                self.phi -= applied.y * rotate_per_pixel;
                self.rotate_delta *= retention;
                if self.rotate_delta.length() < SETTLE_PIXELS {
                    self.rotate_delta = Vec2::ZERO;
                }
            } else {
                self.theta -= self.rotate_delta.x * rotate_per_pixel;
                self.phi -= self.rotate_delta.y * rotate_per_pixel;
                self.rotate_delta = Vec2::ZERO;
            }
        }

        const EPS: f32 = 0.0001;
        self.phi = self.phi.clamp(EPS, PI - EPS);

        if self.dolly_steps != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(self.dolly_steps.abs());
            if self.dolly_steps > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
            self.radius = self.radius.clamp(self.min_distance, self.max_distance);
            self.dolly_steps = 0.0;
        }

        let offset_dir = Vec3::new(
            self.phi.sin() * self.theta.sin(),
            self.phi.cos(),
            self.phi.sin() * self.theta.cos(),
        );

        if self.pan_delta != Vec2::ZERO {
            let half_fov = camera.camera().fov / 2.0;
            let target_world_height = 2.0 * self.radius * half_fov.tan();
            let pixels_to_world = target_world_height / screen_height;

            let forward = -offset_dir;
            let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
            let up = right.cross(forward).normalize();

            center += (right * -self.pan_delta.x + up * self.pan_delta.y) * pixels_to_world * self.pan_speed;
            self.pan_delta = Vec2::ZERO;
        }

        camera.set_position_and_target(center + offset_dir * self.radius, center);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn camera() -> CameraManager {
        CameraManager::new(&CameraConfig::default(), 800, 600)
    }

    #[test]
    fn sync_then_update_without_input_keeps_camera() {
        let mut cam = camera();
        let before = cam.position();
        let mut controls = OrbitControls::new(&OrbitConfig::default(), 1.0, 100.0);
        controls.sync_from(&cam);
        assert!(!controls.update(&mut cam, 1.0 / 60.0));
        assert_eq!(cam.position(), before);
    }

    #[test]
    fn damped_rotation_settles_and_keeps_distance() {
        let mut cam = camera();
        let distance = cam.distance();
        let mut controls = OrbitControls::new(&OrbitConfig::default(), 1.0, 100.0);
        controls.sync_from(&cam);
        controls.rotate(Vec2::new(120.0, 0.0));

        let mut frames = 0;
        while controls.update(&mut cam, 1.0 / 60.0) {
            frames += 1;
            assert!(frames < 1000, "orbit damping never settled");
        }
        assert!(controls.is_settled());
        assert!((cam.distance() - distance).abs() < 1e-3);
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&OrbitConfig::default(), 5.0, 30.0);
        controls.sync_from(&cam);
        controls.dolly(1000.0);
        controls.update(&mut cam, 1.0 / 60.0);
        assert!((cam.distance() - 5.0).abs() < 1e-3);
    }
}
