//! Per-frame input resource.
//!
//! Hardware polling belongs to the host; each frame it hands the stage an
//! [`InputFrame`] of raw held states plus the cursor in world coordinates,
//! and [`crate::systems::input::update_input_state`] turns it into
//! [`InputState`] with press/release edges.
use bevy_ecs::prelude::*;
use glam::DVec2;

/// Boolean button state with edge flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the button is currently held.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Advance to this frame's held state, deriving the edges.
    pub fn update(&mut self, held: bool) {
        self.just_pressed = held && !self.active;
        self.just_released = !held && self.active;
        self.active = held;
    }
}

/// Raw held states for one frame, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub restart: bool,
    /// Primary mouse button: selects a piece.
    pub submit: bool,
    /// Secondary mouse button: grabs the selected piece.
    pub piece_action: bool,
    pub cursor: DVec2,
}

/// Resource capturing the per-frame input relevant to a stage.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub left: BoolState,
    pub right: BoolState,
    pub up: BoolState,
    pub down: BoolState,
    pub jump: BoolState,
    pub restart: BoolState,
    pub submit: BoolState,
    pub piece_action: BoolState,
    /// Cursor position in world coordinates.
    pub cursor: DVec2,
}

impl InputState {
    /// Any gameplay key held (directions or jump).
    pub fn any_key(&self) -> bool {
        [self.left, self.right, self.up, self.down, self.jump]
            .iter()
            .any(|b| b.active)
    }

    /// Any mouse button held.
    pub fn any_mouse(&self) -> bool {
        self.submit.active || self.piece_action.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert!(!bs.just_released);
    }

    #[test]
    fn edges_last_one_frame() {
        let mut bs = BoolState::default();
        bs.update(true);
        assert!(bs.active && bs.just_pressed);
        bs.update(true);
        assert!(bs.active && !bs.just_pressed);
        bs.update(false);
        assert!(!bs.active && bs.just_released);
        bs.update(false);
        assert!(!bs.just_released);
    }

    #[test]
    fn any_key_ignores_mouse_and_restart() {
        let mut input = InputState::default();
        input.submit.update(true);
        input.restart.update(true);
        assert!(!input.any_key());
        assert!(input.any_mouse());
        input.jump.update(true);
        assert!(input.any_key());
    }
}
