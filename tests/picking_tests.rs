//! Picking and Selection Tests
//!
//! Tests for:
//! - Hover follows the point under the pointer
//! - Click selects, click on empty space clears
//! - Drags never select
//! - Hidden layers and zero-sized viewports pick nothing
//! - Evicting the selected sensor notifies with `None`
//! - Evicting the hovered sensor resets the cursor

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::{Vec2, Vec3};

use pointfield::config::ViewerConfig;
use pointfield::render::headless::{ManualScheduler, RecordingTarget};
use pointfield::utils::time::Instant;
use pointfield::viewer::interaction::{CursorStyle, Emphasis, PointerButton};
use pointfield::viewer::layer::LayerStyle;
use pointfield::viewer::panel::Viewer3DPanel;
use pointfield::viewer::reading::Reading;

// ============================================================================
// Helper
// ============================================================================

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn mount() -> Viewer3DPanel {
    Viewer3DPanel::new(
        ViewerConfig::default(),
        Box::new(ManualScheduler::new()),
        Box::new(RecordingTarget::new()),
        WIDTH,
        HEIGHT,
    )
    .unwrap()
}

fn two_sensors() -> Vec<Reading> {
    vec![
        Reading::new("near", 20.0, 1).with_position(0.0, 0.0, 0.0),
        Reading::new("far", 70.0, 1).with_position(4.0, 0.0, -4.0),
    ]
}

fn screen_of(panel: &Viewer3DPanel, sensor_id: &str) -> Vec2 {
    let position = panel.reconciler().asset(sensor_id).unwrap().current_position();
    panel.camera().world_to_screen(position).unwrap()
}

fn click(panel: &mut Viewer3DPanel, at: Vec2) {
    panel.pointer_down(at.x, at.y, PointerButton::Primary);
    panel.pointer_up(at.x, at.y);
}

type Selections = Rc<RefCell<Vec<Option<String>>>>;

fn record_selections(panel: &mut Viewer3DPanel) -> Selections {
    let log: Selections = Rc::default();
    let sink = log.clone();
    panel.on_point_select(move |reading| sink.borrow_mut().push(reading.map(|r| r.sensor_id.clone())));
    log
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn hover_tracks_point_under_pointer() {
    let mut panel = mount();
    panel.set_readings(two_sensors());

    let near = screen_of(&panel, "near");
    panel.pointer_move(near.x, near.y);
    assert_eq!(panel.selection().hovered.as_deref(), Some("near"));
    assert_eq!(panel.cursor(), CursorStyle::Pointer);
    assert_eq!(panel.reconciler().asset("near").unwrap().emphasis(), Emphasis::HOVERED);

    let far = screen_of(&panel, "far");
    panel.pointer_move(far.x, far.y);
    assert_eq!(panel.selection().hovered.as_deref(), Some("far"));
    assert!(panel.reconciler().asset("near").unwrap().emphasis().is_empty());

    panel.pointer_move(1.0, 1.0);
    assert!(panel.selection().hovered.is_none());
    assert_eq!(panel.cursor(), CursorStyle::Grab);
}

#[test]
fn leaving_viewport_clears_hover() {
    let mut panel = mount();
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");
    panel.pointer_move(near.x, near.y);

    panel.pointer_leave();
    assert!(panel.selection().hovered.is_none());
    assert!(panel.reconciler().asset("near").unwrap().indicator_node().is_none());
}

#[test]
fn nearest_point_along_the_ray_wins() {
    let mut panel = mount();
    // both on the line from the default eye (10, 10, 10) to the origin
    panel.set_readings(vec![
        Reading::new("behind", 1.0, 1).with_position(0.0, 0.0, 0.0),
        Reading::new("front", 1.0, 1).with_position(3.0, 3.0, 3.0),
    ]);
    let at = screen_of(&panel, "behind");
    panel.pointer_move(at.x, at.y);
    assert_eq!(panel.selection().hovered.as_deref(), Some("front"));
}

// ============================================================================
// Click
// ============================================================================

#[test]
fn click_selects_and_reports_reading() {
    let mut panel = mount();
    let log = record_selections(&mut panel);
    panel.set_readings(two_sensors());

    let far = screen_of(&panel, "far");
    click(&mut panel, far);

    assert_eq!(panel.selection().selected.as_deref(), Some("far"));
    assert_eq!(panel.selected_reading().unwrap().value, 70.0);
    assert_eq!(*log.borrow(), vec![Some("far".to_string())]);

    let asset = panel.reconciler().asset("far").unwrap();
    assert!(asset.emphasis().contains(Emphasis::SELECTED));
    assert!(asset.indicator_node().is_some());
}

#[test]
fn click_on_empty_space_clears_selection() {
    let mut panel = mount();
    let log = record_selections(&mut panel);
    panel.set_readings(two_sensors());

    let near = screen_of(&panel, "near");
    click(&mut panel, near);
    click(&mut panel, Vec2::new(2.0, 2.0));

    assert!(panel.selection().selected.is_none());
    assert_eq!(*log.borrow(), vec![Some("near".to_string()), None]);
}

#[test]
fn drag_rotates_instead_of_selecting() {
    let mut panel = mount();
    let log = record_selections(&mut panel);
    panel.set_readings(two_sensors());
    let start = screen_of(&panel, "near");
    let before = panel.camera().position();
    let t0 = Instant::now();
    panel.frame(t0);

    panel.pointer_down(start.x, start.y, PointerButton::Primary);
    panel.pointer_move(start.x + 40.0, start.y);
    assert_eq!(panel.cursor(), CursorStyle::Grabbing);
    panel.pointer_up(start.x + 40.0, start.y);

    assert!(panel.selection().selected.is_none());
    assert!(log.borrow().is_empty());

    assert!(panel.frame(t0 + Duration::from_millis(16)));
    assert_ne!(panel.camera().position(), before);
}

#[test]
fn secondary_button_never_selects() {
    let mut panel = mount();
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");
    panel.pointer_down(near.x, near.y, PointerButton::Secondary);
    panel.pointer_up(near.x, near.y);
    assert!(panel.selection().selected.is_none());
}

// ============================================================================
// Degenerate cases
// ============================================================================

#[test]
fn hidden_layer_is_not_pickable() {
    let mut panel = mount();
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");

    panel.set_layer_style(LayerStyle::default().with_enabled(false));
    panel.pointer_move(near.x, near.y);
    assert!(panel.selection().hovered.is_none());
}

#[test]
fn zero_viewport_picks_nothing() {
    let mut panel = mount();
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");

    panel.resize(0, 0);
    panel.pointer_move(near.x, near.y);
    assert!(panel.selection().hovered.is_none());
}

#[test]
fn empty_scene_picks_nothing() {
    let mut panel = mount();
    let center = panel.camera().world_to_screen(Vec3::ZERO).unwrap();
    panel.pointer_move(center.x, center.y);
    assert!(panel.selection().hovered.is_none());
}

// ============================================================================
// Eviction
// ============================================================================

#[test]
fn evicting_selection_notifies_none() {
    let mut panel = mount();
    let log = record_selections(&mut panel);
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");
    click(&mut panel, near);

    panel.set_readings(vec![Reading::new("far", 71.0, 2).with_position(4.0, 0.0, -4.0)]);

    assert!(panel.selection().selected.is_none());
    assert!(panel.selected_reading().is_none());
    assert_eq!(*log.borrow(), vec![Some("near".to_string()), None]);
}

#[test]
fn evicting_other_sensor_keeps_selection() {
    let mut panel = mount();
    let log = record_selections(&mut panel);
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");
    click(&mut panel, near);

    panel.set_readings(vec![Reading::new("near", 25.0, 2).with_position(0.0, 0.0, 0.0)]);

    assert_eq!(panel.selection().selected.as_deref(), Some("near"));
    assert_eq!(panel.selected_reading().unwrap().value, 25.0);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn evicting_hovered_sensor_restores_grab_cursor() {
    let mut panel = mount();
    let log = record_selections(&mut panel);
    panel.set_readings(two_sensors());
    let near = screen_of(&panel, "near");
    panel.pointer_move(near.x, near.y);
    assert_eq!(panel.cursor(), CursorStyle::Pointer);

    panel.set_readings(vec![Reading::new("far", 71.0, 2).with_position(4.0, 0.0, -4.0)]);

    assert!(panel.selection().hovered.is_none());
    assert_eq!(panel.cursor(), CursorStyle::Grab);
    assert!(log.borrow().is_empty());
}
