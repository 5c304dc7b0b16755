//! Sampling window input into one snapshot per frame.

use std::collections::HashSet;
use winit::event::{
    WindowEvent,
    ElementState,
    MouseButton,
    MouseScrollDelta,
    VirtualKeyCode,
    KeyboardInput,
};
use vek::*;


/// Mouse button which drags the camera.
pub const PAN_BUTTON: MouseButton = MouseButton::Right;

/// Key which closes the window.
pub const EXIT_KEY: VirtualKeyCode = VirtualKeyCode::Escape;

/// Key which shows or hides the debug overlay.
pub const OVERLAY_KEY: VirtualKeyCode = VirtualKeyCode::F1;

/// Logical pixels per wheel line, for trackpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 16.0;

/// Pointer and keyboard input for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in logical pixels.
    pub cursor: Vec2<f32>,
    /// Cursor movement since the previous frame.
    pub cursor_delta: Vec2<f32>,
    /// Wheel movement in lines since the previous frame, positive away from
    /// the user.
    pub wheel: f32,
    /// Whether the pan button is held.
    pub panning: bool,
    /// Whether the overlay key was pressed an odd number of times.
    pub toggle_overlay: bool,
    /// Whether the window should close.
    pub close_requested: bool,
}

/// Accumulates window events between frames.
#[derive(Debug, Clone)]
pub struct InputState {
    scale: f32,
    cursor: Vec2<f32>,
    sampled_cursor: Vec2<f32>,
    wheel: f32,
    toggle_overlay: bool,
    close_requested: bool,
    pressed_keys: HashSet<VirtualKeyCode>,
    pressed_mouse_buttons: HashSet<MouseButton>,
}

impl InputState {
    pub fn new(scale: f32) -> Self {
        InputState {
            scale,
            cursor: Vec2::zero(),
            sampled_cursor: Vec2::zero(),
            wheel: 0.0,
            toggle_overlay: false,
            close_requested: false,
            pressed_keys: HashSet::new(),
            pressed_mouse_buttons: HashSet::new(),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn on_window_event(&mut self, event: &WindowEvent) {
        match event {
            &WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            &WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(button, state);
            }
            &WindowEvent::MouseWheel { delta, .. } => {
                self.on_wheel(delta);
            }
            &WindowEvent::KeyboardInput {
                input: KeyboardInput {
                    state,
                    virtual_keycode: Some(key),
                    ..
                },
                is_synthetic: false,
                ..
            } => {
                self.on_key(key, state);
            }
            &WindowEvent::Focused(false) => {
                // releases are not delivered to unfocused windows
                self.pressed_keys.clear();
                self.pressed_mouse_buttons.clear();
            }
            &WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale = scale_factor as f32;
            }
            &WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            _ => (),
        }
    }

    /// Cursor moved to the given position in physical pixels.
    pub fn on_cursor_moved(&mut self, physical: Vec2<f32>) {
        self.cursor = physical / self.scale;
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_mouse_buttons.insert(button);
            }
            ElementState::Released => {
                self.pressed_mouse_buttons.remove(&button);
            }
        }
    }

    pub fn on_wheel(&mut self, delta: MouseScrollDelta) {
        self.wheel += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / (PIXELS_PER_LINE * self.scale),
        };
    }

    pub fn on_key(&mut self, key: VirtualKeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // ignore key repeat
                if !self.pressed_keys.insert(key) {
                    return;
                }
                match key {
                    EXIT_KEY => self.close_requested = true,
                    OVERLAY_KEY => self.toggle_overlay = !self.toggle_overlay,
                    _ => (),
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    /// Take the input for this frame, resetting per-frame accumulators.
    pub fn sample(&mut self) -> FrameInput {
        let input = FrameInput {
            cursor: self.cursor,
            cursor_delta: self.cursor - self.sampled_cursor,
            wheel: self.wheel,
            panning: self.pressed_mouse_buttons.contains(&PAN_BUTTON),
            toggle_overlay: self.toggle_overlay,
            close_requested: self.close_requested,
        };
        self.sampled_cursor = self.cursor;
        self.wheel = 0.0;
        self.toggle_overlay = false;
        input
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn delta_is_relative_to_previous_sample() {
        let mut input = InputState::new(1.0);
        input.on_cursor_moved(Vec2::new(10.0, 10.0));
        input.on_cursor_moved(Vec2::new(15.0, 12.0));
        assert_eq!(input.sample().cursor_delta, Vec2::new(15.0, 12.0));

        input.on_cursor_moved(Vec2::new(20.0, 20.0));
        let frame = input.sample();
        assert_eq!(frame.cursor, Vec2::new(20.0, 20.0));
        assert_eq!(frame.cursor_delta, Vec2::new(5.0, 8.0));

        assert_eq!(input.sample().cursor_delta, Vec2::zero());
    }

    #[test]
    fn cursor_is_in_logical_pixels() {
        let mut input = InputState::new(2.0);
        input.on_cursor_moved(Vec2::new(800.0, 600.0));
        assert_eq!(input.sample().cursor, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn wheel_accumulates_until_sampled() {
        let mut input = InputState::new(2.0);
        input.on_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.on_wheel(MouseScrollDelta::LineDelta(0.0, -0.5));
        input.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 64.0)));
        assert_eq!(input.sample().wheel, 2.5);
        assert_eq!(input.sample().wheel, 0.0);
    }

    #[test]
    fn pan_follows_right_button() {
        let mut input = InputState::new(1.0);
        input.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(!input.sample().panning);
        input.on_mouse_button(PAN_BUTTON, ElementState::Pressed);
        assert!(input.sample().panning);
        assert!(input.sample().panning);
        input.on_mouse_button(PAN_BUTTON, ElementState::Released);
        assert!(!input.sample().panning);
    }

    #[test]
    fn keys_request_close_and_toggle_overlay() {
        let mut input = InputState::new(1.0);
        input.on_key(OVERLAY_KEY, ElementState::Pressed);
        // repeat while held
        input.on_key(OVERLAY_KEY, ElementState::Pressed);
        let frame = input.sample();
        assert!(frame.toggle_overlay);
        assert!(!frame.close_requested);
        assert!(!input.sample().toggle_overlay);

        input.on_key(OVERLAY_KEY, ElementState::Released);
        input.on_key(EXIT_KEY, ElementState::Pressed);
        assert!(input.sample().close_requested);
    }
}
