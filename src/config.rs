//! Viewer Configuration
//!
//! All tunables of the viewer core in one plain, serde-friendly struct.
//! Every field has a default, so a dashboard only needs to send what it wants
//! to change:
//!
//! ```rust,ignore
//! use pointfield::config::ViewerConfig;
//!
//! let config = ViewerConfig::from_json_str(r#"{ "zoom": { "max": 8.0 } }"#)?;
//! assert_eq!(config.zoom.step, 1.2);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ViewerError};
use crate::render::render_loop::RenderMode;
use crate::scene::lighting::LightingPreset;
use crate::viewer::color::{ColorMode, ValueRange};

/// Camera placement and projection at mount time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial eye position; its distance to `target` becomes the base distance
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::ZERO,
        }
    }
}

/// Zoom limits, expressed as multiples of the base distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Distance factor applied per zoom step
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: 1.2,
            min: 0.25,
            max: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterpolationConfig {
    /// Fraction of the remaining gap closed per 1/60 s
    pub blend_factor: f32,
    /// Distance under which a point counts as settled
    pub epsilon: f32,
    pub steps_per_second: f32,
    /// Upper bound on a single measured step, so a stalled host does not teleport points
    pub max_step_seconds: f32,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            blend_factor: 0.15,
            epsilon: 0.001,
            steps_per_second: 60.0,
            max_step_seconds: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmphasisConfig {
    pub hovered_scale: f32,
    pub hovered_emissive: f32,
    pub selected_scale: f32,
    pub selected_emissive: f32,
}

impl Default for EmphasisConfig {
    fn default() -> Self {
        Self {
            hovered_scale: 1.3,
            hovered_emissive: 0.3,
            selected_scale: 1.5,
            selected_emissive: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelperConfig {
    pub show_grid: bool,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub grid_color: Vec3,
    pub show_axes: bool,
    pub axes_size: f32,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: 20.0,
            grid_divisions: 20,
            grid_color: Vec3::splat(0.35),
            show_axes: true,
            axes_size: 5.0,
        }
    }
}

/// Shape of the shared point primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            radius: 0.15,
            width_segments: 16,
            height_segments: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrbitConfig {
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            pan_speed: 1.0,
            damping_factor: 0.1,
            enable_damping: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub zoom: ZoomConfig,
    pub interpolation: InterpolationConfig,
    pub emphasis: EmphasisConfig,
    pub helpers: HelperConfig,
    pub point: PointConfig,
    pub orbit: OrbitConfig,
    pub lighting: LightingPreset,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    pub heatmap_range: ValueRange,
    /// Height of the plane drop-lines project onto
    pub ground_level: f32,
    /// Pointer travel (px) beyond which a press becomes a camera drag
    pub drag_threshold: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            zoom: ZoomConfig::default(),
            interpolation: InterpolationConfig::default(),
            emphasis: EmphasisConfig::default(),
            helpers: HelperConfig::default(),
            point: PointConfig::default(),
            orbit: OrbitConfig::default(),
            lighting: LightingPreset::Default,
            render_mode: RenderMode::OnDemand,
            color_mode: ColorMode::Heatmap,
            heatmap_range: ValueRange::default(),
            ground_level: 0.0,
            drag_threshold: 4.0,
        }
    }
}

impl ViewerConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid(format!("camera.fovDegrees must be in (0, 180), got {}", cam.fov_degrees)));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(invalid(format!(
                "camera clip range must satisfy 0 < near < far, got {}..{}",
                cam.near, cam.far
            )));
        }
        if !cam.position.is_finite() || !cam.target.is_finite() {
            return Err(invalid("camera position/target must be finite".to_string()));
        }
        if cam.position.distance(cam.target) <= f32::EPSILON {
            return Err(invalid("camera position must differ from its target".to_string()));
        }

        let zoom = &self.zoom;
        if zoom.step <= 1.0 {
            return Err(invalid(format!("zoom.step must be > 1, got {}", zoom.step)));
        }
        if !(zoom.min > 0.0 && zoom.min <= 1.0 && zoom.max >= 1.0) {
            return Err(invalid(format!(
                "zoom range must satisfy 0 < min <= 1 <= max, got {}..{}",
                zoom.min, zoom.max
            )));
        }

        let interp = &self.interpolation;
        if !(interp.blend_factor > 0.0 && interp.blend_factor <= 1.0) {
            return Err(invalid(format!(
                "interpolation.blendFactor must be in (0, 1], got {}",
                interp.blend_factor
            )));
        }
        if interp.epsilon <= 0.0 || interp.steps_per_second <= 0.0 || interp.max_step_seconds <= 0.0 {
            return Err(invalid("interpolation epsilon, rate and max step must be positive".to_string()));
        }

        if self.point.radius <= 0.0 {
            return Err(invalid(format!("point.radius must be positive, got {}", self.point.radius)));
        }
        if !(self.orbit.damping_factor > 0.0 && self.orbit.damping_factor <= 1.0) {
            return Err(invalid(format!(
                "orbit.dampingFactor must be in (0, 1], got {}",
                self.orbit.damping_factor
            )));
        }
        if self.heatmap_range.max <= self.heatmap_range.min {
            return Err(invalid("heatmapRange.max must exceed heatmapRange.min".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ViewerError {
    ViewerError::InvalidConfig(message)
}
