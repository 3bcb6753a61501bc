use std::fmt;

use crate::viewer::reading::Reading;

pub type ReadingFilter = Box<dyn Fn(&Reading) -> bool>;

/// Per-layer presentation of the point cloud.
pub struct LayerStyle {
    /// Material opacity of every point, `0..=1`
    pub opacity: f32,
    /// Scale multiplier on the base point geometry
    pub point_size: f32,
    /// A disabled layer keeps its assets but hides the whole group
    pub enabled: bool,
    /// Readings rejected here are treated as absent from the batch
    pub filter: Option<ReadingFilter>,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            point_size: 1.0,
            enabled: true,
            filter: None,
        }
    }
}

impl fmt::Debug for LayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerStyle")
            .field("opacity", &self.opacity)
            .field("point_size", &self.point_size)
            .field("enabled", &self.enabled)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

impl LayerStyle {
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size.max(0.0);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Fn(&Reading) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    #[must_use]
    pub fn accepts(&self, reading: &Reading) -> bool {
        self.filter.as_ref().is_none_or(|f| f(reading))
    }
}
