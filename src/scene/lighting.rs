use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::ViewerError;
use crate::scene::NodeHandle;
use crate::scene::light::Light;
use crate::scene::manager::SceneManager;

/// Named intensity sets for the three fixed lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingPreset {
    #[default]
    Default,
    Dark,
    Bright,
    Dramatic,
}

/// Ambient, directional and point intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightIntensities {
    pub ambient: f32,
    pub directional: f32,
    pub point: f32,
}

impl LightingPreset {
    pub const ALL: [LightingPreset; 4] = [Self::Default, Self::Dark, Self::Bright, Self::Dramatic];

    #[must_use]
    pub fn intensities(self) -> LightIntensities {
        let (ambient, directional, point) = match self {
            Self::Default => (0.6, 0.8, 0.5),
            Self::Dark => (0.2, 0.4, 0.3),
            Self::Bright => (1.0, 1.2, 0.8),
            Self::Dramatic => (0.1, 1.5, 1.0),
        };
        LightIntensities {
            ambient,
            directional,
            point,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Bright => "bright",
            Self::Dramatic => "dramatic",
        }
    }
}

impl fmt::Display for LightingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightingPreset {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewerError::UnknownLightingPreset(s.to_string()))
    }
}

/// Owns one ambient, one directional and one point light.
///
/// Pure configuration surface: the only state is the currently applied
/// intensities and visibility flags, both stored on the light components.
pub struct LightingManager {
    ambient: Option<NodeHandle>,
    directional: Option<NodeHandle>,
    point: Option<NodeHandle>,
    preset: LightingPreset,
}

impl LightingManager {
    pub fn new(scene: &mut SceneManager, preset: LightingPreset) -> Self {
        let i = preset.intensities();
        let scene = scene.scene_mut();

        let ambient = scene.add_light(Light::new_ambient(Vec3::ONE, i.ambient), "AmbientLight");

        let directional = scene.add_light(Light::new_directional(Vec3::ONE, i.directional), "DirectionalLight");
        if let Some(node) = scene.get_node_mut(directional) {
            node.transform.position = Vec3::new(10.0, 20.0, 10.0);
        }

        let point = scene.add_light(Light::new_point(Vec3::ONE, i.point, 100.0), "PointLight");
        if let Some(node) = scene.get_node_mut(point) {
            node.transform.position = Vec3::new(-10.0, 10.0, -10.0);
        }

        Self {
            ambient: Some(ambient),
            directional: Some(directional),
            point: Some(point),
            preset,
        }
    }

    #[must_use]
    pub fn preset(&self) -> LightingPreset {
        self.preset
    }

    pub fn set_preset(&mut self, scene: &mut SceneManager, preset: LightingPreset) {
        let i = preset.intensities();
        self.set_ambient_intensity(scene, i.ambient);
        self.set_directional_intensity(scene, i.directional);
        self.set_point_intensity(scene, i.point);
        self.preset = preset;
        log::debug!("Lighting preset set to '{preset}'");
    }

    /// Name-based variant for dashboard input; unknown names leave lights untouched.
    pub fn set_preset_by_name(&mut self, scene: &mut SceneManager, name: &str) -> crate::errors::Result<()> {
        let preset = name.parse()?;
        self.set_preset(scene, preset);
        Ok(())
    }

    pub fn set_ambient_intensity(&mut self, scene: &mut SceneManager, intensity: f32) {
        Self::with_light(scene, self.ambient, |l| l.intensity = intensity);
    }

    pub fn set_directional_intensity(&mut self, scene: &mut SceneManager, intensity: f32) {
        Self::with_light(scene, self.directional, |l| l.intensity = intensity);
    }

    pub fn set_point_intensity(&mut self, scene: &mut SceneManager, intensity: f32) {
        Self::with_light(scene, self.point, |l| l.intensity = intensity);
    }

    pub fn toggle_ambient(&mut self, scene: &mut SceneManager, visible: bool) {
        Self::with_light(scene, self.ambient, |l| l.enabled = visible);
    }

    pub fn toggle_directional(&mut self, scene: &mut SceneManager, visible: bool) {
        Self::with_light(scene, self.directional, |l| l.enabled = visible);
    }

    pub fn toggle_point(&mut self, scene: &mut SceneManager, visible: bool) {
        Self::with_light(scene, self.point, |l| l.enabled = visible);
    }

    /// Currently applied intensities; a disposed light reports zero.
    #[must_use]
    pub fn intensities(&self, scene: &SceneManager) -> LightIntensities {
        let read = |node: Option<NodeHandle>| {
            node.and_then(|n| scene.scene().light(n))
                .map_or(0.0, |l| l.intensity)
        };
        LightIntensities {
            ambient: read(self.ambient),
            directional: read(self.directional),
            point: read(self.point),
        }
    }

    fn with_light(scene: &mut SceneManager, node: Option<NodeHandle>, f: impl FnOnce(&mut Light)) {
        if let Some(light) = node.and_then(|n| scene.scene_mut().light_mut(n)) {
            f(light);
        }
    }

    /// Removes the light nodes. Safe to call more than once.
    pub fn dispose(&mut self, scene: &mut SceneManager) {
        for node in [self.ambient.take(), self.directional.take(), self.point.take()]
            .into_iter()
            .flatten()
        {
            scene.remove_object(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_round_trip() {
        for preset in LightingPreset::ALL {
            assert_eq!(preset.name().parse::<LightingPreset>().unwrap(), preset);
        }
        assert!("neon".parse::<LightingPreset>().is_err());
    }
}
