//! Sensor id to visual asset table.
//!
//! Every batch is a full latest-state snapshot. Reconciling it against the
//! table has exactly three mutation paths: create on first sighting, update
//! on a later sighting, evict when a sensor is absent. All points share one
//! base geometry owned here; each point owns its material and, while
//! emphasized, an indicator line with its own geometry and material.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{EmphasisConfig, PointConfig};
use crate::resources::pool::{GeometryHandle, MaterialHandle, ResourcePool};
use crate::resources::primitives::{SphereOptions, create_line, create_sphere};
use crate::resources::{Material, Mesh};
use crate::scene::node::Node;
use crate::scene::{NodeHandle, Scene, SceneManager};
use crate::viewer::color::{ColorMapper, ColorMode};
use crate::viewer::interaction::{Emphasis, PickTarget, SelectionState};
use crate::viewer::layer::LayerStyle;
use crate::viewer::reading::{Reading, reduce_latest};

const INDICATOR_OPACITY: f32 = 0.6;
const INDICATOR_RENDER_ORDER: i32 = 1;

#[derive(Debug)]
struct IndicatorLine {
    node: NodeHandle,
    geometry: GeometryHandle,
    material: MaterialHandle,
}

/// One sensor's presence in the scene.
#[derive(Debug)]
pub struct VisualAsset {
    node: NodeHandle,
    material: MaterialHandle,
    indicator: Option<IndicatorLine>,
    target: Vec3,
    current: Vec3,
    last_reading: Reading,
    emphasis: Emphasis,
}

impl VisualAsset {
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    #[inline]
    #[must_use]
    pub fn target_position(&self) -> Vec3 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn current_position(&self) -> Vec3 {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn last_reading(&self) -> &Reading {
        &self.last_reading
    }

    #[inline]
    #[must_use]
    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    #[inline]
    #[must_use]
    pub fn indicator_node(&self) -> Option<NodeHandle> {
        self.indicator.as_ref().map(|l| l.node)
    }
}

/// Outcome of one [`AssetReconciler::reconcile`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub evicted: usize,
    /// Distinct sensors rejected by the layer filter
    pub filtered: usize,
    /// Whether an evicted sensor was the selected one
    pub selection_cleared: bool,
    /// Whether an evicted sensor was under the pointer
    pub hover_cleared: bool,
}

/// Shared inputs of a reconcile pass.
pub struct ReconcileContext<'a> {
    pub style: &'a LayerStyle,
    pub mapper: &'a dyn ColorMapper,
    pub mode: ColorMode,
}

pub struct AssetReconciler {
    assets: FxHashMap<String, VisualAsset>,
    group: Option<NodeHandle>,
    base_geometry: Option<GeometryHandle>,
    base_radius: f32,
    emphasis: EmphasisConfig,
    ground_level: f32,
    point_size: f32,
}

impl AssetReconciler {
    /// Creates the points group and the shared base geometry.
    pub fn new(scene: &mut SceneManager, point: &PointConfig, emphasis: EmphasisConfig, ground_level: f32) -> Self {
        let group = scene.add_object(Node::new("SensorPoints"));
        let base = create_sphere(&SphereOptions {
            radius: point.radius,
            width_segments: point.width_segments,
            height_segments: point.height_segments,
        });
        let base_radius = base.bounding_sphere().radius;
        let base_geometry = scene.resources_mut().add_geometry(base);

        Self {
            assets: FxHashMap::default(),
            group: Some(group),
            base_geometry: Some(base_geometry),
            base_radius,
            emphasis,
            ground_level,
            point_size: 1.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    #[must_use]
    pub fn asset(&self, sensor_id: &str) -> Option<&VisualAsset> {
        self.assets.get(sensor_id)
    }

    pub fn assets(&self) -> impl Iterator<Item = (&str, &VisualAsset)> {
        self.assets.iter().map(|(id, asset)| (id.as_str(), asset))
    }

    #[must_use]
    pub fn reading(&self, sensor_id: &str) -> Option<&Reading> {
        self.assets.get(sensor_id).map(|a| &a.last_reading)
    }

    #[inline]
    #[must_use]
    pub fn group(&self) -> Option<NodeHandle> {
        self.group
    }

    #[inline]
    #[must_use]
    pub fn base_geometry(&self) -> Option<GeometryHandle> {
        self.base_geometry
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.group.is_none()
    }

    /// Whether any point is still travelling toward its target.
    #[must_use]
    pub fn is_animating(&self, epsilon: f32) -> bool {
        self.assets.values().any(|a| a.current.distance(a.target) > epsilon)
    }

    /// Applies a full batch: create, update, evict, then re-emphasize.
    ///
    /// Evicted sensors are removed from `selection`.
    pub fn reconcile(
        &mut self,
        scene: &mut SceneManager,
        readings: &[Reading],
        ctx: &ReconcileContext<'_>,
        selection: &mut SelectionState,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let (Some(group), Some(base_geometry)) = (self.group, self.base_geometry) else {
            log::warn!("reconcile() on a disposed AssetReconciler is ignored");
            return stats;
        };

        let mut live: FxHashSet<&str> = FxHashSet::default();
        for reading in reduce_latest(readings) {
            if !ctx.style.accepts(reading) {
                stats.filtered += 1;
                continue;
            }
            live.insert(reading.sensor_id.as_str());
            let color = ctx.mapper.color(reading, ctx.mode);
            let target = reading.world_position();

            match self.assets.get_mut(reading.sensor_id.as_str()) {
                Some(asset) => {
                    if let Some(material) = scene.resources_mut().material_mut(asset.material) {
                        material.set_color(color);
                        material.set_opacity(ctx.style.opacity);
                    }
                    asset.target = target;
                    asset.last_reading = reading.clone();
                    stats.updated += 1;
                }
                None => {
                    let asset = Self::create_asset(scene, group, base_geometry, reading, color, ctx.style.opacity);
                    self.assets.insert(reading.sensor_id.clone(), asset);
                    stats.created += 1;
                }
            }
        }

        let stale: Vec<String> = self
            .assets
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for sensor_id in stale {
            if let Some(asset) = self.assets.remove(&sensor_id) {
                Self::release_asset(scene, asset);
            }
            let cleared = selection.forget(&sensor_id);
            stats.selection_cleared |= cleared.contains(Emphasis::SELECTED);
            stats.hover_cleared |= cleared.contains(Emphasis::HOVERED);
            stats.evicted += 1;
        }

        self.apply_style(scene, ctx.style);
        self.apply_emphasis(scene, selection);

        log::debug!(
            "Reconciled batch of {}: {} created, {} updated, {} evicted, {} filtered",
            readings.len(),
            stats.created,
            stats.updated,
            stats.evicted,
            stats.filtered
        );
        stats
    }

    fn create_asset(
        scene: &mut SceneManager,
        group: NodeHandle,
        base_geometry: GeometryHandle,
        reading: &Reading,
        color: Vec3,
        opacity: f32,
    ) -> VisualAsset {
        let position = reading.world_position();
        let (scene, resources) = scene.parts_mut();
        let material = resources.add_material(Material::new(color).with_opacity(opacity));
        let mesh = Mesh::new(base_geometry, material).with_name(reading.sensor_id.clone());
        let node = scene.add_mesh(mesh, Some(group));
        if let Some(n) = scene.get_node_mut(node) {
            n.transform.position = position;
        }

        VisualAsset {
            node,
            material,
            indicator: None,
            target: position,
            current: position,
            last_reading: reading.clone(),
            emphasis: Emphasis::empty(),
        }
    }

    fn release_asset(scene: &mut SceneManager, mut asset: VisualAsset) {
        Self::release_indicator(scene, &mut asset);
        scene.remove_object(asset.node);
        scene.resources_mut().dispose_material(asset.material);
    }

    fn release_indicator(scene: &mut SceneManager, asset: &mut VisualAsset) {
        if let Some(line) = asset.indicator.take() {
            scene.remove_object(line.node);
            let resources = scene.resources_mut();
            resources.dispose_geometry(line.geometry);
            resources.dispose_material(line.material);
        }
    }

    /// Pushes layer opacity, point size and visibility onto the scene.
    pub fn apply_style(&mut self, scene: &mut SceneManager, style: &LayerStyle) {
        if let Some(group) = self.group.and_then(|g| scene.scene_mut().get_node_mut(g)) {
            group.visible = style.enabled;
        }
        for asset in self.assets.values() {
            if let Some(material) = scene.resources_mut().material_mut(asset.material) {
                material.set_opacity(style.opacity);
            }
        }
        if self.point_size != style.point_size {
            self.point_size = style.point_size;
            let scales: Vec<(NodeHandle, f32)> = self
                .assets
                .values()
                .map(|a| (a.node, self.emphasis_scale(a.emphasis)))
                .collect();
            for (node, scale) in scales {
                if let Some(n) = scene.scene_mut().get_node_mut(node) {
                    n.transform.scale = Vec3::splat(scale);
                }
            }
        }
    }

    fn emphasis_scale(&self, emphasis: Emphasis) -> f32 {
        let factor = if emphasis.contains(Emphasis::SELECTED) {
            self.emphasis.selected_scale
        } else if emphasis.contains(Emphasis::HOVERED) {
            self.emphasis.hovered_scale
        } else {
            1.0
        };
        factor * self.point_size
    }

    fn emphasis_intensity(&self, emphasis: Emphasis) -> f32 {
        if emphasis.contains(Emphasis::SELECTED) {
            self.emphasis.selected_emissive
        } else if emphasis.contains(Emphasis::HOVERED) {
            self.emphasis.hovered_emissive
        } else {
            0.0
        }
    }

    /// Recomputes scale, glow and indicator lines from `selection`.
    ///
    /// Selected wins over hovered. Indicator lines are created on first
    /// emphasis and released as soon as a point is neither hovered nor selected.
    pub fn apply_emphasis(&mut self, scene: &mut SceneManager, selection: &SelectionState) {
        let Some(group) = self.group else {
            return;
        };
        let ground_level = self.ground_level;
        let ids: Vec<String> = self.assets.keys().cloned().collect();

        for sensor_id in ids {
            let emphasis = selection.emphasis(&sensor_id);
            let scale = self.emphasis_scale(emphasis);
            let intensity = self.emphasis_intensity(emphasis);
            let Some(asset) = self.assets.get_mut(&sensor_id) else {
                continue;
            };
            asset.emphasis = emphasis;

            if let Some(node) = scene.scene_mut().get_node_mut(asset.node) {
                node.transform.scale = Vec3::splat(scale);
            }
            let color = match scene.resources_mut().material_mut(asset.material) {
                Some(material) => {
                    material.set_emissive_intensity(intensity);
                    material.color()
                }
                None => Vec3::ONE,
            };

            if emphasis.is_empty() {
                Self::release_indicator(scene, asset);
            } else if let Some(line) = &asset.indicator {
                if let Some(material) = scene.resources_mut().material_mut(line.material) {
                    material.set_color(color);
                }
            } else {
                asset.indicator = Some(Self::create_indicator(scene, group, asset.current, color, ground_level));
            }
        }
    }

    fn create_indicator(
        scene: &mut SceneManager,
        group: NodeHandle,
        from: Vec3,
        color: Vec3,
        ground_level: f32,
    ) -> IndicatorLine {
        let (scene, resources) = scene.parts_mut();
        let geometry = resources.add_geometry(create_line(from, ground_point(from, ground_level)));
        let material = resources.add_material(Material::new(color).with_opacity(INDICATOR_OPACITY));
        let mesh = Mesh::new(geometry, material)
            .with_name("IndicatorLine")
            .with_render_order(INDICATOR_RENDER_ORDER);
        let node = scene.add_mesh(mesh, Some(group));
        IndicatorLine {
            node,
            geometry,
            material,
        }
    }

    /// Moves every unsettled point toward its target by `alpha` of the
    /// remaining gap. Returns whether anything moved.
    pub fn step_interpolation(&mut self, scene: &mut SceneManager, alpha: f32, epsilon: f32) -> bool {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return false;
        }
        let ground_level = self.ground_level;
        let mut moved = false;

        for asset in self.assets.values_mut() {
            if asset.current.distance(asset.target) <= epsilon {
                continue;
            }
            asset.current = asset.current.lerp(asset.target, alpha);
            moved = true;

            if let Some(node) = scene.scene_mut().get_node_mut(asset.node) {
                node.transform.position = asset.current;
            }
            if let Some(line) = &asset.indicator
                && let Some(geometry) = scene.resources_mut().geometry_mut(line.geometry)
            {
                geometry.update_positions(&[asset.current, ground_point(asset.current, ground_level)]);
            }
        }
        moved
    }

    /// World-space pick spheres of every visible point.
    ///
    /// World matrices must be current (see [`Scene::update_matrix_world`]).
    #[must_use]
    pub fn pick_targets<'a>(&'a self, scene: &Scene, resources: &ResourcePool) -> Vec<PickTarget<'a>> {
        let visible = self
            .group
            .and_then(|g| scene.get_node(g))
            .is_some_and(|g| g.visible);
        let Some(sphere) = self
            .base_geometry
            .and_then(|g| resources.geometry(g))
            .map(|g| g.bounding_sphere())
        else {
            return Vec::new();
        };
        if !visible {
            return Vec::new();
        }

        self.assets
            .iter()
            .filter_map(|(id, asset)| {
                let node = scene.get_node(asset.node)?;
                node.visible.then(|| PickTarget {
                    sensor_id: id.as_str(),
                    sphere: sphere.transform(node.world_matrix()),
                })
            })
            .collect()
    }

    /// Radius of the unscaled base point.
    #[must_use]
    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    /// Releases every asset, the shared geometry and the group. Idempotent.
    pub fn dispose(&mut self, scene: &mut SceneManager) {
        let Some(group) = self.group.take() else {
            return;
        };
        let count = self.assets.len();
        for (_, asset) in self.assets.drain() {
            Self::release_asset(scene, asset);
        }
        if let Some(geometry) = self.base_geometry.take() {
            scene.resources_mut().dispose_geometry(geometry);
        }
        scene.remove_object(group);
        log::debug!("AssetReconciler disposed ({count} assets released)");
    }
}

fn ground_point(from: Vec3, ground_level: f32) -> Vec3 {
    Vec3::new(from.x, ground_level, from.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::color::DefaultColorMapper;

    fn reconcile(
        reconciler: &mut AssetReconciler,
        scene: &mut SceneManager,
        batch: &[Reading],
        selection: &mut SelectionState,
    ) -> ReconcileStats {
        let style = LayerStyle::default();
        let mapper = DefaultColorMapper::default();
        let ctx = ReconcileContext {
            style: &style,
            mapper: &mapper,
            mode: ColorMode::Heatmap,
        };
        reconciler.reconcile(scene, batch, &ctx, selection)
    }

    #[test]
    fn update_keeps_current_position() {
        let mut scene = SceneManager::new();
        let mut reconciler = AssetReconciler::new(&mut scene, &PointConfig::default(), EmphasisConfig::default(), 0.0);

        let mut selection = SelectionState::default();
        let first = [Reading::new("a", 1.0, 1).with_position(1.0, 0.0, 0.0)];
        let second = [Reading::new("a", 1.0, 2).with_position(5.0, 0.0, 0.0)];
        reconcile(&mut reconciler, &mut scene, &first, &mut selection);
        let stats = reconcile(&mut reconciler, &mut scene, &second, &mut selection);
        assert_eq!(stats.updated, 1);

        let asset = reconciler.asset("a").unwrap();
        assert_eq!(asset.current_position(), Vec3::X);
        assert_eq!(asset.target_position(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn indicator_follows_interpolation() {
        let mut scene = SceneManager::new();
        let mut reconciler = AssetReconciler::new(&mut scene, &PointConfig::default(), EmphasisConfig::default(), -1.0);
        let mut selection = SelectionState {
            selected: Some("a".into()),
            hovered: None,
        };
        let first = [Reading::new("a", 1.0, 1).with_position(0.0, 2.0, 0.0)];
        let second = [Reading::new("a", 1.0, 2).with_position(4.0, 2.0, 0.0)];
        reconcile(&mut reconciler, &mut scene, &first, &mut selection);
        let line = reconciler.assets["a"].indicator.as_ref().unwrap().geometry;

        reconcile(&mut reconciler, &mut scene, &second, &mut selection);
        assert!(reconciler.step_interpolation(&mut scene, 0.5, 0.001));

        let positions = scene.resources().geometry(line).unwrap().positions().to_vec();
        assert_eq!(positions, vec![Vec3::new(2.0, 2.0, 0.0), Vec3::new(2.0, -1.0, 0.0)]);
    }
}
