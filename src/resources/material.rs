use glam::Vec3;
use uuid::Uuid;

/// Unlit/emissive material used by points, drop-lines and helpers.
///
/// Mutations go through setters so the version moves only on real change;
/// a GPU backend re-uploads uniforms when it sees a new version.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,

    color: Vec3,
    emissive: Vec3,
    emissive_intensity: f32,
    opacity: f32,
    /// Use per-vertex colors from the geometry instead of `color`
    vertex_colors: bool,

    version: u64,
}

impl Material {
    #[must_use]
    pub fn new(color: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            emissive: color,
            emissive_intensity: 0.0,
            opacity: 1.0,
            vertex_colors: false,
            version: 0,
        }
    }

    #[must_use]
    pub fn with_vertex_colors(mut self) -> Self {
        self.vertex_colors = true;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    #[inline]
    #[must_use]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    #[inline]
    #[must_use]
    pub fn emissive(&self) -> Vec3 {
        self.emissive
    }

    #[inline]
    #[must_use]
    pub fn emissive_intensity(&self) -> f32 {
        self.emissive_intensity
    }

    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    #[inline]
    #[must_use]
    pub fn vertex_colors(&self) -> bool {
        self.vertex_colors
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the base color; emissive follows it so highlights glow in the point's own hue.
    pub fn set_color(&mut self, color: Vec3) {
        if self.color != color {
            self.color = color;
            self.emissive = color;
            self.bump();
        }
    }

    pub fn set_emissive_intensity(&mut self, intensity: f32) {
        if self.emissive_intensity != intensity {
            self.emissive_intensity = intensity;
            self.bump();
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if self.opacity != opacity {
            self.opacity = opacity;
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
