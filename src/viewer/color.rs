use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use glam::Vec3;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::errors::ViewerError;
use crate::viewer::reading::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    /// Value mapped over [`ValueRange`], blue to green to red
    #[default]
    Heatmap,
    /// One stable color per sensor type
    SensorType,
}

impl ColorMode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap",
            Self::SensorType => "sensor-type",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heatmap" => Ok(Self::Heatmap),
            "sensor-type" | "sensortype" | "type" => Ok(Self::SensorType),
            _ => Err(ViewerError::UnknownColorMode(s.to_string())),
        }
    }
}

/// Value interval the heatmap spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

impl ValueRange {
    /// Position of `value` in the range, clamped to `0..=1`.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.5;
        }
        (((value - self.min) / span) as f32).clamp(0.0, 1.0)
    }
}

/// Maps a reading to a linear RGB color.
///
/// Closures `Fn(&Reading, ColorMode) -> Vec3` implement this directly.
pub trait ColorMapper {
    fn color(&self, reading: &Reading, mode: ColorMode) -> Vec3;
}

impl<F> ColorMapper for F
where
    F: Fn(&Reading, ColorMode) -> Vec3,
{
    fn color(&self, reading: &Reading, mode: ColorMode) -> Vec3 {
        self(reading, mode)
    }
}

const SENSOR_TYPE_PALETTE: [Vec3; 8] = [
    Vec3::new(0.12, 0.47, 0.71),
    Vec3::new(1.00, 0.50, 0.05),
    Vec3::new(0.17, 0.63, 0.17),
    Vec3::new(0.84, 0.15, 0.16),
    Vec3::new(0.58, 0.40, 0.74),
    Vec3::new(0.55, 0.34, 0.29),
    Vec3::new(0.89, 0.47, 0.76),
    Vec3::new(0.09, 0.75, 0.81),
];

const UNTYPED_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultColorMapper {
    pub range: ValueRange,
}

impl DefaultColorMapper {
    #[must_use]
    pub fn new(range: ValueRange) -> Self {
        Self { range }
    }

    /// Three-stop gradient: 0 blue, 0.5 green, 1 red.
    #[must_use]
    pub fn heatmap(t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            Vec3::new(0.0, 0.0, 1.0).lerp(Vec3::new(0.0, 1.0, 0.0), t * 2.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0).lerp(Vec3::new(1.0, 0.0, 0.0), (t - 0.5) * 2.0)
        }
    }

    /// Palette entry for a sensor type. `FxHasher` is unseeded, so the
    /// mapping is stable across runs.
    #[must_use]
    pub fn sensor_type_color(sensor_type: Option<&str>) -> Vec3 {
        let Some(sensor_type) = sensor_type.filter(|t| !t.is_empty()) else {
            return UNTYPED_COLOR;
        };
        let mut hasher = FxHasher::default();
        sensor_type.hash(&mut hasher);
        let index = (hasher.finish() % SENSOR_TYPE_PALETTE.len() as u64) as usize;
        SENSOR_TYPE_PALETTE[index]
    }
}

impl ColorMapper for DefaultColorMapper {
    fn color(&self, reading: &Reading, mode: ColorMode) -> Vec3 {
        match mode {
            ColorMode::Heatmap => Self::heatmap(self.range.normalize(reading.value)),
            ColorMode::SensorType => Self::sensor_type_color(reading.sensor_type.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_endpoints() {
        let mapper = DefaultColorMapper::new(ValueRange { min: 0.0, max: 10.0 });
        let cold = mapper.color(&Reading::new("a", -5.0, 0), ColorMode::Heatmap);
        let mid = mapper.color(&Reading::new("a", 5.0, 0), ColorMode::Heatmap);
        let hot = mapper.color(&Reading::new("a", 10.0, 0), ColorMode::Heatmap);
        assert_eq!(cold, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(mid, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(hot, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn sensor_type_palette_is_stable() {
        let a = DefaultColorMapper::sensor_type_color(Some("humidity"));
        let b = DefaultColorMapper::sensor_type_color(Some("humidity"));
        assert_eq!(a, b);
        assert_eq!(DefaultColorMapper::sensor_type_color(None), UNTYPED_COLOR);
    }

    #[test]
    fn closures_are_mappers() {
        let mapper = |_: &Reading, _: ColorMode| Vec3::X;
        assert_eq!(mapper.color(&Reading::new("a", 0.0, 0), ColorMode::SensorType), Vec3::X);
    }

    #[test]
    fn color_mode_parses_names() {
        assert_eq!("sensor-type".parse::<ColorMode>().unwrap(), ColorMode::SensorType);
        assert!("rainbow".parse::<ColorMode>().is_err());
    }
}
