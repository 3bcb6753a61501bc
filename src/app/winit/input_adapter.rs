//! Winit input adapter
//!
//! Translates winit window events into viewer pointer calls.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::window::CursorIcon;

use crate::viewer::interaction::{CursorStyle, PointerButton};
use crate::viewer::panel::Viewer3DPanel;

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 100.0;

#[must_use]
pub fn translate_mouse_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Back | MouseButton::Forward | MouseButton::Other(_) => None,
    }
}

/// Wheel notches; positive moves the camera closer.
#[must_use]
pub fn scroll_steps(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_NOTCH,
    }
}

#[must_use]
pub fn cursor_icon(style: CursorStyle) -> CursorIcon {
    match style {
        CursorStyle::Grab => CursorIcon::Grab,
        CursorStyle::Pointer => CursorIcon::Pointer,
        CursorStyle::Grabbing => CursorIcon::Grabbing,
    }
}

/// Tracks the last cursor position, since winit reports button events
/// without one.
#[derive(Debug, Default)]
pub struct InputAdapter {
    cursor: Vec2,
}

impl InputAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards `event` to the panel. Returns whether it was consumed.
    pub fn process_window_event(&mut self, panel: &mut Viewer3DPanel, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                panel.pointer_move(self.cursor.x, self.cursor.y);
            }
            WindowEvent::CursorLeft { .. } => panel.pointer_leave(),
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = translate_mouse_button(*button) else {
                    return false;
                };
                match state {
                    ElementState::Pressed => panel.pointer_down(self.cursor.x, self.cursor.y, button),
                    ElementState::Released => panel.pointer_up(self.cursor.x, self.cursor.y),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => panel.wheel(scroll_steps(delta)),
            WindowEvent::Resized(size) => panel.resize(size.width, size.height),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_buttons_map() {
        assert_eq!(translate_mouse_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(translate_mouse_button(MouseButton::Middle), Some(PointerButton::Middle));
        assert_eq!(translate_mouse_button(MouseButton::Back), None);
    }

    #[test]
    fn line_scroll_is_notches() {
        assert_eq!(scroll_steps(&MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
    }
}
