use glam::Vec3;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub range: f32,
}

/// Light component kinds supported by the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Uniform light from every direction; position is ignored
    Ambient,
    /// Parallel rays travelling from the node position towards the origin
    Directional,
    Point(PointLight),
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
    /// Disabled lights are skipped when building frame uniforms
    pub enabled: bool,
}

impl Light {
    fn with_kind(color: Vec3, intensity: f32, kind: LightKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind,
            enabled: true,
        }
    }

    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Ambient)
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Directional)
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Point(PointLight { range }))
    }

    /// Discriminant used in the packed GPU light record.
    #[must_use]
    pub fn kind_index(&self) -> u32 {
        match self.kind {
            LightKind::Ambient => 0,
            LightKind::Directional => 1,
            LightKind::Point(_) => 2,
        }
    }
}
