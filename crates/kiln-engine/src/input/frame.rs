use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Input deltas accumulated since the previous frame.
///
/// Cleared by the runtime after every `App::on_frame`.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Pointer travel in logical pixels.
    pub pointer_delta: (f32, f32),

    /// Wheel travel in lines.
    pub wheel_lines: f32,

    pub keys_pressed: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = 0.0;
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
