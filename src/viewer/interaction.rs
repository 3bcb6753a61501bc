//! Pointer handling: hover, selection and drag detection.
//!
//! The controller never touches the scene. Callers pass the current camera
//! and the world-space pick targets for this instant, so a hit is always
//! computed against the transforms that will be drawn next.

use bitflags::bitflags;
use glam::Vec2;

use crate::resources::geometry::BoundingSphere;
use crate::scene::camera::CameraManager;

bitflags! {
    /// Emphasis applied to a single point.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Emphasis: u8 {
        const HOVERED  = 1 << 0;
        const SELECTED = 1 << 1;
    }
}

/// Which sensors are hovered and selected. Transient; only affects how
/// points are drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<String>,
    pub hovered: Option<String>,
}

impl SelectionState {
    #[must_use]
    pub fn emphasis(&self, sensor_id: &str) -> Emphasis {
        let mut emphasis = Emphasis::empty();
        if self.hovered.as_deref() == Some(sensor_id) {
            emphasis |= Emphasis::HOVERED;
        }
        if self.selected.as_deref() == Some(sensor_id) {
            emphasis |= Emphasis::SELECTED;
        }
        emphasis
    }

    /// Clears any reference to `sensor_id`; returns what was cleared.
    pub fn forget(&mut self, sensor_id: &str) -> Emphasis {
        let cleared = self.emphasis(sensor_id);
        if cleared.contains(Emphasis::HOVERED) {
            self.hovered = None;
        }
        if cleared.contains(Emphasis::SELECTED) {
            self.selected = None;
        }
        cleared
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// Empty space; a drag would orbit the camera
    #[default]
    Grab,
    /// Over a point
    Pointer,
    /// A camera drag is in progress
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pickable point in world space.
#[derive(Debug, Clone, Copy)]
pub struct PickTarget<'a> {
    pub sensor_id: &'a str,
    pub sphere: BoundingSphere,
}

/// What a pointer move meant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMotion {
    Idle,
    HoverChanged,
    /// Camera drag; `delta` is the motion in pixels since the last event
    Drag { button: PointerButton, delta: Vec2 },
}

/// A completed click and the selection it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    button: PointerButton,
    origin: Vec2,
    last: Vec2,
    dragging: bool,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    selection: SelectionState,
    cursor: CursorStyle,
    press: Option<Press>,
    drag_threshold: f32,
}

impl InteractionController {
    #[must_use]
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            drag_threshold: drag_threshold.max(0.0),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[inline]
    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    /// Nearest target under a viewport pixel.
    ///
    /// Returns `None` for an empty target list, a zero-sized viewport or a
    /// degenerate camera.
    #[must_use]
    pub fn pick<'a>(camera: &CameraManager, screen: Vec2, targets: &[PickTarget<'a>]) -> Option<&'a str> {
        if targets.is_empty() {
            return None;
        }
        let ray = camera.ray_from_screen(screen)?;
        targets
            .iter()
            .filter_map(|t| ray.intersect_sphere(t.sphere.center, t.sphere.radius).map(|d| (d, t.sensor_id)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    pub fn pointer_down(&mut self, position: Vec2, button: PointerButton) {
        self.press = Some(Press {
            button,
            origin: position,
            last: position,
            dragging: false,
        });
    }

    pub fn pointer_move(&mut self, position: Vec2, camera: &CameraManager, targets: &[PickTarget<'_>]) -> PointerMotion {
        if let Some(press) = self.press.as_mut() {
            if !press.dragging && position.distance(press.origin) > self.drag_threshold {
                press.dragging = true;
                press.last = press.origin;
                self.cursor = CursorStyle::Grabbing;
            }
            if press.dragging {
                let delta = position - press.last;
                press.last = position;
                return PointerMotion::Drag {
                    button: press.button,
                    delta,
                };
            }
            press.last = position;
        }

        let hit = Self::pick(camera, position, targets);
        self.cursor = if hit.is_some() {
            CursorStyle::Pointer
        } else {
            CursorStyle::Grab
        };
        if self.selection.hovered.as_deref() == hit {
            return PointerMotion::Idle;
        }
        self.selection.hovered = hit.map(str::to_owned);
        PointerMotion::HoverChanged
    }

    /// Ends a press. A primary press that never crossed the drag threshold is
    /// a click and replaces the selection (an empty hit clears it).
    pub fn pointer_up(&mut self, position: Vec2, camera: &CameraManager, targets: &[PickTarget<'_>]) -> Option<Click> {
        let press = self.press.take()?;
        let hit = Self::pick(camera, position, targets);
        self.cursor = if hit.is_some() {
            CursorStyle::Pointer
        } else {
            CursorStyle::Grab
        };
        if press.dragging || press.button != PointerButton::Primary {
            return None;
        }
        self.selection.selected = hit.map(str::to_owned);
        Some(Click {
            selected: self.selection.selected.clone(),
        })
    }

    /// Pointer left the viewport. Returns whether the hover changed.
    pub fn pointer_leave(&mut self) -> bool {
        self.press = None;
        self.cursor = CursorStyle::Grab;
        self.selection.hovered.take().is_some()
    }

    /// The hovered target vanished under a still pointer.
    pub fn hover_lost(&mut self) {
        if self.cursor == CursorStyle::Pointer {
            self.cursor = CursorStyle::Grab;
        }
    }

    pub fn clear(&mut self) {
        self.selection = SelectionState::default();
        self.press = None;
        self.cursor = CursorStyle::Grab;
    }
}
