//! Input handling for the fly camera.
//!
//! The `Input` struct collects raw window and device events between frames.
//! The frame loop then polls it exactly once per frame: held keys become a
//! single [`Movement`], and the cursor becomes an absolute look position.
//!
//! While the cursor is grabbed, raw mouse motion is accumulated into a virtual
//! cursor that is free to leave the window bounds. Without a grab, the real
//! cursor position is used as is.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::camera::Movement;

/// Keyboard keys the demo cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W, A, S, D,

    // Arrows
    Up, Down, Left, Right,

    Escape,

    // Other
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyW => KeyCode::W,
            WinitKeyCode::KeyA => KeyCode::A,
            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::KeyD => KeyCode::D,

            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,

            WinitKeyCode::Escape => KeyCode::Escape,

            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Keys bound to each movement, in resolution priority order.
const MOVEMENT_BINDINGS: [(Movement, [KeyCode; 2]); 4] = [
    (Movement::Forward, [KeyCode::W, KeyCode::Up]),
    (Movement::Backward, [KeyCode::S, KeyCode::Down]),
    (Movement::StrafeRight, [KeyCode::D, KeyCode::Right]),
    (Movement::StrafeLeft, [KeyCode::A, KeyCode::Left]),
];

/// Keyboard and cursor state, polled once per frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,

    cursor_position: Vec2,
    cursor_grabbed: bool,

    window_size: (u32, u32),
}

impl Input {
    /// Create an input tracker for a window of the given size.
    ///
    /// The cursor starts at the window center, which maps to looking straight
    /// ahead.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cursor_position: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
            window_size: (width, height),
            ..Default::default()
        }
    }

    // ========== Key Queries ==========

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Whether the user asked to quit.
    pub fn exit_requested(&self) -> bool {
        self.key_held(KeyCode::Escape)
    }

    /// The single movement to apply this frame.
    ///
    /// Held keys are not additive: forward wins over backward, which wins over
    /// strafing right, which wins over strafing left.
    pub fn movement(&self) -> Option<Movement> {
        MOVEMENT_BINDINGS
            .iter()
            .find(|(_, keys)| keys.iter().any(|key| self.key_held(*key)))
            .map(|(movement, _)| *movement)
    }

    // ========== Cursor Queries ==========

    /// Absolute cursor position in window pixels.
    ///
    /// While grabbed this is a virtual position and may lie outside the window.
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn is_cursor_grabbed(&self) -> bool {
        self.cursor_grabbed
    }

    // ========== Event Intake ==========

    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Switch between raw-motion (grabbed) and absolute (free) cursor tracking.
    pub(crate) fn set_cursor_grabbed(&mut self, grabbed: bool) {
        self.cursor_grabbed = grabbed;
    }

    pub(crate) fn press(&mut self, key: KeyCode) {
        self.keys_held.insert(key);
    }

    pub(crate) fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Process a winit window event.
    pub(crate) fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if !self.cursor_grabbed {
                    self.cursor_position = Vec2::new(position.x as f32, position.y as f32);
                }
            }

            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }

            WindowEvent::Focused(false) => {
                // Key releases are lost while unfocused.
                self.keys_held.clear();
            }

            _ => {}
        }
    }

    /// Process a winit device event.
    pub(crate) fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_grabbed {
                self.cursor_position += Vec2::new(delta.0 as f32, delta.1 as f32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new(600, 600);

        assert!(!input.key_held(KeyCode::W));

        input.press(KeyCode::W);
        input.press(KeyCode::W);
        assert!(input.key_held(KeyCode::W));

        input.release(KeyCode::W);
        assert!(!input.key_held(KeyCode::W));
    }

    #[test]
    fn test_no_movement_without_keys() {
        let input = Input::new(600, 600);
        assert_eq!(input.movement(), None);
    }

    #[test]
    fn test_movement_bindings() {
        for (key, expected) in [
            (KeyCode::W, Movement::Forward),
            (KeyCode::Up, Movement::Forward),
            (KeyCode::S, Movement::Backward),
            (KeyCode::Down, Movement::Backward),
            (KeyCode::D, Movement::StrafeRight),
            (KeyCode::Right, Movement::StrafeRight),
            (KeyCode::A, Movement::StrafeLeft),
            (KeyCode::Left, Movement::StrafeLeft),
        ] {
            let mut input = Input::new(600, 600);
            input.press(key);
            assert_eq!(input.movement(), Some(expected), "{:?}", key);
        }
    }

    #[test]
    fn test_movement_priority_is_not_additive() {
        let mut input = Input::new(600, 600);
        input.press(KeyCode::A);
        input.press(KeyCode::D);
        assert_eq!(input.movement(), Some(Movement::StrafeRight));

        input.press(KeyCode::S);
        assert_eq!(input.movement(), Some(Movement::Backward));

        input.press(KeyCode::W);
        assert_eq!(input.movement(), Some(Movement::Forward));

        input.release(KeyCode::W);
        input.release(KeyCode::S);
        assert_eq!(input.movement(), Some(Movement::StrafeRight));
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut input = Input::new(600, 600);
        assert!(!input.exit_requested());
        input.press(KeyCode::Escape);
        assert!(input.exit_requested());
    }

    #[test]
    fn test_cursor_starts_centered() {
        let input = Input::new(800, 600);
        assert_eq!(input.cursor_position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_grabbed_motion_accumulates_past_window_edge() {
        let mut input = Input::new(600, 600);
        input.set_cursor_grabbed(true);
        for _ in 0..10 {
            input.handle_device_event(&DeviceEvent::MouseMotion { delta: (100.0, -50.0) });
        }
        assert_eq!(input.cursor_position(), Vec2::new(1300.0, -200.0));
    }

    #[test]
    fn test_motion_ignored_when_not_grabbed() {
        let mut input = Input::new(600, 600);
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (25.0, 25.0) });
        assert_eq!(input.cursor_position(), Vec2::new(300.0, 300.0));
    }
}
