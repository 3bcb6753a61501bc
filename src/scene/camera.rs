use glam::{Affine3A, Mat4, Vec2, Vec3, Vec4Swizzles};
use uuid::Uuid;

use crate::config::CameraConfig;
use crate::scene::transform::Transform;
use crate::utils::ray::Ray;

/// Perspective projection component.
#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,

    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    // Cached matrices, read-only for the renderer
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            uuid: Uuid::new_v4(),
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        // WGPU clip space: depth in [0, 1]
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }
}

/// Snapshot of the orbit camera placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub orbit_target: Vec3,
    pub base_distance: f32,
}

/// Owns the projection camera, its placement around the orbit target and the
/// viewport it renders into.
///
/// The base distance is measured once from the initial placement and never
/// recomputed, so zoom factors stay comparable across view presets.
pub struct CameraManager {
    camera: Camera,
    transform: Transform,
    target: Vec3,
    base_distance: f32,
    viewport: Vec2,
}

impl CameraManager {
    #[must_use]
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let camera = Camera::new_perspective(config.fov_degrees, aspect, config.near, config.far);

        let mut base_distance = config.position.distance(config.target);
        if base_distance <= f32::EPSILON || !base_distance.is_finite() {
            log::warn!("Camera starts on its target, falling back to a base distance of 1");
            base_distance = 1.0;
        }

        let mut manager = Self {
            camera,
            transform: Transform::from_position(config.position),
            target: config.target,
            base_distance,
            viewport: Vec2::new(width as f32, height as f32),
        };
        manager.look_at_target();
        manager
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    #[must_use]
    pub fn base_distance(&self) -> f32 {
        self.base_distance
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    #[must_use]
    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.transform.position,
            orbit_target: self.target,
            base_distance: self.base_distance,
        }
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        self.transform.position.distance(self.target)
    }

    /// `base_distance / current_distance`; larger means closer.
    #[must_use]
    pub fn zoom_factor(&self) -> f32 {
        let distance = self.distance();
        if distance <= f32::EPSILON {
            return f32::INFINITY;
        }
        self.base_distance / distance
    }

    /// Resizes the viewport. Position and target are left untouched; a zero
    /// dimension keeps the previous aspect ratio.
    pub fn update_aspect(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect(width as f32 / height as f32);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.look_at_target();
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.look_at_target();
    }

    pub fn set_position_and_target(&mut self, position: Vec3, target: Vec3) {
        self.transform.position = position;
        self.target = target;
        self.look_at_target();
    }

    /// Re-aims the camera at the orbit target and refreshes its matrices.
    pub fn look_at_target(&mut self) {
        self.transform.look_at(self.target, Vec3::Y);
        self.transform.update_local_matrix();
        let local = *self.transform.local_matrix();
        self.transform.set_world_matrix(local);
        self.camera.update_view_projection(&local);
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.camera.view_projection_matrix
    }

    /// Converts viewport pixels (origin top-left) to normalized device coordinates.
    #[must_use]
    pub fn screen_to_ndc(&self, screen: Vec2) -> Option<Vec2> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (screen.x / self.viewport.x) * 2.0 - 1.0,
            -(screen.y / self.viewport.y) * 2.0 + 1.0,
        ))
    }

    /// World-space ray through a viewport pixel, built from the current matrices.
    #[must_use]
    pub fn ray_from_screen(&self, screen: Vec2) -> Option<Ray> {
        let ndc = self.screen_to_ndc(screen)?;
        let inverse = self.camera.view_projection_matrix.inverse();
        if !inverse.is_finite() {
            return None;
        }
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    /// Projects a world point to viewport pixels; `None` when behind the camera.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.camera.view_projection_matrix * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}
