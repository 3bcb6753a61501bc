//! Asset Reconciliation Tests
//!
//! Tests for:
//! - One asset per distinct sensor id, latest timestamp wins
//! - Creation without pop-in, updates that keep the current position
//! - Eviction: scene children and resources released, shared geometry kept
//! - Layer filter and malformed readings
//! - Emphasis and indicator line lifecycle
//! - Interpolation convergence

use glam::Vec3;

use pointfield::config::{EmphasisConfig, PointConfig};
use pointfield::scene::SceneManager;
use pointfield::viewer::color::{ColorMapper, ColorMode, DefaultColorMapper};
use pointfield::viewer::interaction::{Emphasis, SelectionState};
use pointfield::viewer::layer::LayerStyle;
use pointfield::viewer::reading::Reading;
use pointfield::viewer::reconciler::{AssetReconciler, ReconcileContext, ReconcileStats};

const EPSILON: f32 = 1e-5;

struct Fixture {
    scene: SceneManager,
    reconciler: AssetReconciler,
    selection: SelectionState,
    style: LayerStyle,
    mapper: DefaultColorMapper,
}

impl Fixture {
    fn new() -> Self {
        let mut scene = SceneManager::new();
        let reconciler = AssetReconciler::new(&mut scene, &PointConfig::default(), EmphasisConfig::default(), 0.0);
        Self {
            scene,
            reconciler,
            selection: SelectionState::default(),
            style: LayerStyle::default(),
            mapper: DefaultColorMapper::default(),
        }
    }

    fn apply(&mut self, batch: &[Reading]) -> ReconcileStats {
        let ctx = ReconcileContext {
            style: &self.style,
            mapper: &self.mapper,
            mode: ColorMode::Heatmap,
        };
        self.reconciler
            .reconcile(&mut self.scene, batch, &ctx, &mut self.selection)
    }

    fn color_of(&self, sensor_id: &str) -> Vec3 {
        let asset = self.reconciler.asset(sensor_id).unwrap();
        self.scene.resources().material(asset.material()).unwrap().color()
    }

    fn group_children(&self) -> usize {
        let group = self.reconciler.group().unwrap();
        self.scene.scene().get_node(group).unwrap().children().len()
    }
}

fn at(id: &str, value: f64, timestamp: i64, x: f64, y: f64, z: f64) -> Reading {
    Reading::new(id, value, timestamp).with_position(x, y, z)
}

fn heat(value: f64) -> Vec3 {
    DefaultColorMapper::default().color(&Reading::new("x", value, 0), ColorMode::Heatmap)
}

// ============================================================================
// Uniqueness & Latest-wins
// ============================================================================

#[test]
fn duplicate_sensor_ids_produce_one_asset() {
    let mut fx = Fixture::new();
    let stats = fx.apply(&[
        at("A", 1.0, 1, 0.0, 0.0, 0.0),
        at("A", 2.0, 2, 0.0, 0.0, 0.0),
        at("B", 3.0, 1, 1.0, 0.0, 0.0),
        at("A", 4.0, 3, 0.0, 0.0, 0.0),
    ]);
    assert_eq!(fx.reconciler.len(), 2);
    assert_eq!(stats.created, 2);
    assert_eq!(fx.group_children(), 2);
}

#[test]
fn later_timestamp_drives_target_and_color() {
    let mut fx = Fixture::new();
    fx.apply(&[
        at("A", 90.0, 200, 3.0, 0.0, 0.0),
        at("A", 10.0, 100, -3.0, 0.0, 0.0),
    ]);
    let asset = fx.reconciler.asset("A").unwrap();
    assert_eq!(asset.target_position(), Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(asset.last_reading().value, 90.0);
    assert_eq!(fx.color_of("A"), heat(90.0));
}

#[test]
fn missing_position_targets_origin() {
    let mut fx = Fixture::new();
    fx.apply(&[Reading::new("A", 1.0, 1)]);
    assert_eq!(fx.reconciler.asset("A").unwrap().target_position(), Vec3::ZERO);
}

#[test]
fn malformed_readings_do_not_stop_the_batch() {
    let mut fx = Fixture::new();
    fx.apply(&[
        Reading::new("", 1.0, 1),
        Reading::new("bad", f64::NAN, 1),
        at("good", 1.0, 1, 1.0, 1.0, 1.0),
    ]);
    assert_eq!(fx.reconciler.len(), 1);
    assert!(fx.reconciler.asset("good").is_some());
}

#[test]
fn coordinates_beyond_display_range_never_reach_the_scene() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 1.0, 1, 1.0, 0.0, 0.0)]);

    let stats = fx.apply(&[at("A", 1.0, 2, 1e300, 0.0, 0.0), at("B", 1.0, 2, 2.0, 0.0, 0.0)]);
    assert_eq!(stats.updated, 1);
    assert!(fx.reconciler.asset("A").is_none());

    for _ in 0..5 {
        fx.reconciler.step_interpolation(&mut fx.scene, 0.15, 0.001);
    }
    for (_, asset) in fx.reconciler.assets() {
        assert!(asset.target_position().is_finite());
        assert!(asset.current_position().is_finite());
    }
}

// ============================================================================
// Create / Update
// ============================================================================

#[test]
fn creation_has_no_pop_in() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 4.0, 5.0, 6.0)]);
    let asset = fx.reconciler.asset("A").unwrap();
    assert_eq!(asset.current_position(), asset.target_position());

    fx.scene.scene_mut().update_matrix_world();
    let node = fx.scene.scene().get_node(asset.node()).unwrap();
    let world = Vec3::from(node.world_matrix().translation);
    assert!(world.distance(Vec3::new(4.0, 5.0, 6.0)) < EPSILON);
}

#[test]
fn update_moves_target_only() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0)]);
    let node = fx.reconciler.asset("A").unwrap().node();

    let stats = fx.apply(&[at("A", 1.0, 2, 2.0, 0.0, 0.0)]);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.created, 0);

    let asset = fx.reconciler.asset("A").unwrap();
    assert_eq!(asset.node(), node);
    assert_eq!(asset.current_position(), Vec3::ZERO);
    assert_eq!(asset.target_position(), Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn all_points_share_one_base_geometry() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 1.0, 1, 1.0, 0.0, 0.0)]);
    let base = fx.reconciler.base_geometry().unwrap();
    for (_, asset) in fx.reconciler.assets() {
        let mesh = fx.scene.scene().mesh(asset.node()).unwrap();
        assert_eq!(mesh.geometry, base);
    }
    // one base geometry, two per-asset materials
    assert_eq!(fx.scene.resources().live_geometries(), 1);
    assert_eq!(fx.scene.resources().live_materials(), 2);
}

// ============================================================================
// Eviction
// ============================================================================

#[test]
fn absent_sensor_is_evicted_and_released() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 1.0, 1, 1.0, 0.0, 0.0)]);
    let node_a = fx.reconciler.asset("A").unwrap().node();
    let material_a = fx.reconciler.asset("A").unwrap().material();

    let stats = fx.apply(&[at("B", 1.0, 2, 1.0, 0.0, 0.0)]);
    assert_eq!(stats.evicted, 1);
    assert!(fx.reconciler.asset("A").is_none());
    assert!(!fx.scene.scene().contains(node_a));
    assert!(fx.scene.resources().material(material_a).is_none());
    assert_eq!(fx.group_children(), 1);
}

#[test]
fn empty_batch_evicts_everything_but_keeps_base_geometry() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 1.0, 1, 1.0, 0.0, 0.0)]);
    fx.apply(&[]);

    assert!(fx.reconciler.is_empty());
    assert_eq!(fx.group_children(), 0);
    assert_eq!(fx.scene.resources().live_materials(), 0);
    assert_eq!(fx.scene.resources().live_geometries(), 1);
    assert!(fx
        .scene
        .resources()
        .geometry(fx.reconciler.base_geometry().unwrap())
        .is_some());
}

#[test]
fn long_stream_does_not_grow_resources() {
    let mut fx = Fixture::new();
    for round in 0..50_i64 {
        let batch: Vec<Reading> = (0..10)
            .map(|i| at(&format!("S{}", round * 3 + i), 1.0, round, i as f64, 0.0, 0.0))
            .collect();
        fx.apply(&batch);
    }
    assert_eq!(fx.reconciler.len(), 10);
    assert_eq!(fx.scene.resources().live_materials(), 10);
    assert_eq!(fx.scene.resources().live_geometries(), 1);
    assert_eq!(fx.group_children(), 10);
}

#[test]
fn evicting_selected_sensor_clears_selection() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 1.0, 1, 1.0, 0.0, 0.0)]);
    fx.selection.selected = Some("A".into());
    fx.selection.hovered = Some("A".into());

    let stats = fx.apply(&[at("B", 1.0, 2, 1.0, 0.0, 0.0)]);
    assert!(stats.selection_cleared);
    assert_eq!(fx.selection, SelectionState::default());
}

#[test]
fn evicting_hovered_sensor_is_not_a_selection_change() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0)]);
    fx.selection.hovered = Some("A".into());

    let stats = fx.apply(&[]);
    assert!(!stats.selection_cleared);
    assert!(stats.hover_cleared);
    assert!(fx.selection.hovered.is_none());
}

// ============================================================================
// Layer Style
// ============================================================================

#[test]
fn filtered_readings_are_treated_as_absent() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 50.0, 1, 1.0, 0.0, 0.0)]);

    fx.style = LayerStyle::default().with_filter(|r| r.value > 10.0);
    let stats = fx.apply(&[at("A", 1.0, 2, 0.0, 0.0, 0.0), at("B", 50.0, 2, 1.0, 0.0, 0.0)]);

    assert_eq!(stats.filtered, 1);
    assert_eq!(stats.evicted, 1);
    assert!(fx.reconciler.asset("A").is_none());
    assert!(fx.reconciler.asset("B").is_some());
}

#[test]
fn disabled_layer_hides_group_and_point_size_scales() {
    let mut fx = Fixture::new();
    fx.style = LayerStyle::default().with_enabled(false).with_point_size(2.0).with_opacity(0.5);
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0)]);

    let group = fx.reconciler.group().unwrap();
    assert!(!fx.scene.scene().get_node(group).unwrap().visible);

    let asset = fx.reconciler.asset("A").unwrap();
    let node = fx.scene.scene().get_node(asset.node()).unwrap();
    assert_eq!(node.transform.scale, Vec3::splat(2.0));
    let material = fx.scene.resources().material(asset.material()).unwrap();
    assert!((material.opacity() - 0.5).abs() < EPSILON);
}

// ============================================================================
// Emphasis
// ============================================================================

#[test]
fn selected_wins_over_hovered() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 2.0, 0.0)]);
    fx.selection.hovered = Some("A".into());
    fx.selection.selected = Some("A".into());
    fx.reconciler.apply_emphasis(&mut fx.scene, &fx.selection);

    let emphasis = EmphasisConfig::default();
    let asset = fx.reconciler.asset("A").unwrap();
    assert_eq!(asset.emphasis(), Emphasis::HOVERED | Emphasis::SELECTED);
    let node = fx.scene.scene().get_node(asset.node()).unwrap();
    assert_eq!(node.transform.scale, Vec3::splat(emphasis.selected_scale));
    let material = fx.scene.resources().material(asset.material()).unwrap();
    assert!((material.emissive_intensity() - emphasis.selected_emissive).abs() < EPSILON);
}

#[test]
fn indicator_line_exists_only_while_emphasized() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 1.0, 3.0, 2.0)]);
    assert!(fx.reconciler.asset("A").unwrap().indicator_node().is_none());
    let baseline = fx.scene.resources().live_geometries();

    fx.selection.hovered = Some("A".into());
    fx.reconciler.apply_emphasis(&mut fx.scene, &fx.selection);
    let line = fx.reconciler.asset("A").unwrap().indicator_node().unwrap();
    assert!(fx.scene.scene().contains(line));
    assert_eq!(fx.scene.resources().live_geometries(), baseline + 1);

    let mesh = fx.scene.scene().mesh(line).unwrap();
    let positions = fx.scene.resources().geometry(mesh.geometry).unwrap().positions();
    assert_eq!(positions, &[Vec3::new(1.0, 3.0, 2.0), Vec3::new(1.0, 0.0, 2.0)]);

    fx.selection.hovered = None;
    fx.reconciler.apply_emphasis(&mut fx.scene, &fx.selection);
    assert!(fx.reconciler.asset("A").unwrap().indicator_node().is_none());
    assert!(!fx.scene.scene().contains(line));
    assert_eq!(fx.scene.resources().live_geometries(), baseline);
}

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn interpolation_converges_without_overshoot() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0)]);
    fx.apply(&[at("A", 1.0, 2, 10.0, 0.0, 0.0)]);

    let epsilon = 0.001;
    let mut steps = 0;
    let mut last_x = 0.0;
    while fx.reconciler.step_interpolation(&mut fx.scene, 0.15, epsilon) {
        let x = fx.reconciler.asset("A").unwrap().current_position().x;
        assert!(x >= last_x && x <= 10.0, "point overshot or moved backwards");
        last_x = x;
        steps += 1;
        assert!(steps < 1000, "interpolation never settled");
    }
    let asset = fx.reconciler.asset("A").unwrap();
    assert!(asset.current_position().distance(asset.target_position()) <= epsilon);
    assert!(!fx.reconciler.is_animating(epsilon));
}

#[test]
fn settled_points_do_not_request_motion() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 1.0, 0.0, 0.0)]);
    assert!(!fx.reconciler.step_interpolation(&mut fx.scene, 0.15, 0.001));
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn second_batch_updates_s1_and_creates_s2_in_place() {
    let mut fx = Fixture::new();
    fx.apply(&[at("S1", 80.0, 1, 1.0, 0.0, 0.0)]);
    fx.apply(&[at("S1", 82.0, 2, 1.0, 0.0, 0.0), at("S2", 10.0, 2, -1.0, 0.0, 0.0)]);

    assert_eq!(fx.reconciler.len(), 2);
    assert_eq!(fx.color_of("S1"), heat(82.0));
    assert_eq!(fx.color_of("S2"), heat(10.0));

    let s2 = fx.reconciler.asset("S2").unwrap();
    assert_eq!(s2.current_position(), Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(s2.target_position(), s2.current_position());
}

#[test]
fn dispose_releases_everything_once() {
    let mut fx = Fixture::new();
    fx.apply(&[at("A", 1.0, 1, 0.0, 0.0, 0.0), at("B", 1.0, 1, 1.0, 0.0, 0.0)]);
    fx.selection.selected = Some("A".into());
    fx.reconciler.apply_emphasis(&mut fx.scene, &fx.selection);

    fx.reconciler.dispose(&mut fx.scene);
    fx.reconciler.dispose(&mut fx.scene);

    assert!(fx.reconciler.is_disposed());
    assert_eq!(fx.scene.resources().live_geometries(), 0);
    assert_eq!(fx.scene.resources().live_materials(), 0);
    assert_eq!(fx.scene.scene().node_count(), 0);

    // batches after dispose are ignored
    let stats = fx.apply(&[at("C", 1.0, 1, 0.0, 0.0, 0.0)]);
    assert_eq!(stats, ReconcileStats::default());
}
