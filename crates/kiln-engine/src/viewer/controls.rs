use glam::Vec3;

use crate::input::{InputState, Key};

/// Actions bound to single key presses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ViewerCommand {
    ToggleFaces,
    ToggleEdges,
    ToggleRayTracing,
    Exit,
}

pub fn key_command(key: Key) -> Option<ViewerCommand> {
    match key {
        Key::F => Some(ViewerCommand::ToggleFaces),
        Key::E => Some(ViewerCommand::ToggleEdges),
        Key::R => Some(ViewerCommand::ToggleRayTracing),
        Key::Escape => Some(ViewerCommand::Exit),
        _ => None,
    }
}

/// View-space direction from the held arrow keys, zero when none (or opposing
/// pairs) are held.
pub fn orbit_direction(input: &InputState) -> Vec3 {
    let axis = |neg: Key, pos: Key| {
        let mut v = 0.0;
        if input.key_down(neg) {
            v -= 1.0;
        }
        if input.key_down(pos) {
            v += 1.0;
        }
        v
    };

    Vec3::new(
        axis(Key::ArrowLeft, Key::ArrowRight),
        axis(Key::ArrowDown, Key::ArrowUp),
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonState, InputEvent, InputFrame};

    fn hold(state: &mut InputState, key: Key) {
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Key { key, state: ButtonState::Pressed, repeat: false });
    }

    #[test]
    fn bound_keys_map_to_commands() {
        assert_eq!(key_command(Key::F), Some(ViewerCommand::ToggleFaces));
        assert_eq!(key_command(Key::E), Some(ViewerCommand::ToggleEdges));
        assert_eq!(key_command(Key::R), Some(ViewerCommand::ToggleRayTracing));
        assert_eq!(key_command(Key::Escape), Some(ViewerCommand::Exit));
        assert_eq!(key_command(Key::Q), None);
        assert_eq!(key_command(Key::Other(7)), None);
    }

    #[test]
    fn arrows_combine_into_direction() {
        let mut state = InputState::default();
        assert_eq!(orbit_direction(&state), Vec3::ZERO);

        hold(&mut state, Key::ArrowRight);
        hold(&mut state, Key::ArrowUp);
        assert_eq!(orbit_direction(&state), Vec3::new(1.0, 1.0, 0.0));

        hold(&mut state, Key::ArrowLeft);
        assert_eq!(orbit_direction(&state), Vec3::new(0.0, 1.0, 0.0));
    }
}
