use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;
use crate::errors::ViewerError;
use crate::scene::camera::CameraManager;
use crate::utils::orbit_control::OrbitControls;

/// Canonical camera placements around the orbit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreset {
    #[default]
    Perspective,
    Top,
    Front,
    Side,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 4] = [Self::Perspective, Self::Top, Self::Front, Self::Side];

    /// Unit offset from the orbit target to the eye.
    #[must_use]
    pub fn direction(self) -> Vec3 {
        match self {
            Self::Perspective => Vec3::ONE.normalize(),
            Self::Top => Vec3::Y,
            Self::Front => Vec3::Z,
            Self::Side => Vec3::X,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Perspective => "perspective",
            Self::Top => "top",
            Self::Front => "front",
            Self::Side => "side",
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewPreset {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewerError::UnknownViewPreset(s.to_string()))
    }
}

/// View presets and stepped zoom.
///
/// Zoom is `base_distance / distance`, kept inside `[zoom.min, zoom.max]`.
/// Every operation re-syncs the orbit controls so damped inertia from a
/// previous drag cannot fight the new placement.
#[derive(Debug, Clone)]
pub struct ViewController {
    zoom: ZoomConfig,
    view: ViewPreset,
}

impl ViewController {
    #[must_use]
    pub fn new(zoom: ZoomConfig) -> Self {
        Self {
            zoom,
            view: ViewPreset::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> ViewPreset {
        self.view
    }

    /// Closest and farthest camera distances the zoom range allows.
    #[must_use]
    pub fn distance_limits(&self, base_distance: f32) -> (f32, f32) {
        (base_distance / self.zoom.max, base_distance / self.zoom.min)
    }

    /// Places the camera at the base distance along the preset direction.
    pub fn apply_preset(&mut self, preset: ViewPreset, camera: &mut CameraManager, orbit: &mut OrbitControls) {
        let position = camera.target() + preset.direction() * camera.base_distance();
        camera.set_position(position);
        orbit.sync_from(camera);
        self.view = preset;
        log::debug!("View preset '{preset}' applied");
    }

    /// Back to the perspective preset around the world origin.
    pub fn reset(&mut self, camera: &mut CameraManager, orbit: &mut OrbitControls) {
        camera.set_target(Vec3::ZERO);
        self.apply_preset(ViewPreset::Perspective, camera, orbit);
    }

    /// Moves closer by one step. Returns the new zoom factor.
    pub fn zoom_in(&self, camera: &mut CameraManager, orbit: &mut OrbitControls) -> f32 {
        let distance = camera.distance() / self.zoom.step;
        self.zoom_to(camera, orbit, distance)
    }

    /// Moves away by one step. Returns the new zoom factor.
    pub fn zoom_out(&self, camera: &mut CameraManager, orbit: &mut OrbitControls) -> f32 {
        let distance = camera.distance() * self.zoom.step;
        self.zoom_to(camera, orbit, distance)
    }

    fn zoom_to(&self, camera: &mut CameraManager, orbit: &mut OrbitControls, distance: f32) -> f32 {
        let (min, max) = self.distance_limits(camera.base_distance());
        let distance = distance.clamp(min, max);
        let target = camera.target();
        let direction = (camera.position() - target)
            .try_normalize()
            .unwrap_or_else(|| self.view.direction());
        camera.set_position(target + direction * distance);
        orbit.sync_from(camera);
        self.zoom_factor(camera)
    }

    /// Zoom factor of `camera`, reported inside `[zoom.min, zoom.max]`.
    ///
    /// The camera distance is clamped before the eye is rebuilt from its
    /// direction, so the re-measured ratio can be off by an ulp.
    #[must_use]
    pub fn zoom_factor(&self, camera: &CameraManager) -> f32 {
        camera.zoom_factor().clamp(self.zoom.min, self.zoom.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, OrbitConfig};

    fn setup() -> (ViewController, CameraManager, OrbitControls) {
        let camera = CameraManager::new(&CameraConfig::default(), 800, 600);
        let controller = ViewController::new(ZoomConfig::default());
        let (min, max) = controller.distance_limits(camera.base_distance());
        let mut orbit = OrbitControls::new(&OrbitConfig::default(), min, max);
        orbit.sync_from(&camera);
        (controller, camera, orbit)
    }

    #[test]
    fn top_preset_sits_above_target() {
        let (mut controller, mut camera, mut orbit) = setup();
        let d = camera.base_distance();
        controller.apply_preset(ViewPreset::Top, &mut camera, &mut orbit);
        assert!(camera.position().distance(Vec3::new(0.0, d, 0.0)) < 1e-4);
        assert_eq!(controller.view(), ViewPreset::Top);
        assert!(camera.view_projection().is_finite());
    }

    #[test]
    fn one_zoom_step_matches_step_factor() {
        let (controller, mut camera, mut orbit) = setup();
        let zoom = controller.zoom_in(&mut camera, &mut orbit);
        assert!((zoom - 1.2).abs() < 1e-4);
    }

    #[test]
    fn repeated_steps_never_report_past_limits() {
        let (controller, mut camera, mut orbit) = setup();
        let limits = ZoomConfig::default();
        for start in [Vec3::new(10.0, 10.0, 10.0), Vec3::new(3.0, -7.0, 1.5), Vec3::new(0.1, 0.2, 17.3)] {
            camera.set_position(start);
            orbit.sync_from(&camera);
            for _ in 0..30 {
                assert!(controller.zoom_in(&mut camera, &mut orbit) <= limits.max);
            }
            assert!(controller.zoom_factor(&camera) <= limits.max);
            for _ in 0..60 {
                assert!(controller.zoom_out(&mut camera, &mut orbit) >= limits.min);
            }
            assert!(controller.zoom_factor(&camera) >= limits.min);
        }
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("SIDE".parse::<ViewPreset>().unwrap(), ViewPreset::Side);
        assert!("iso".parse::<ViewPreset>().is_err());
    }
}
