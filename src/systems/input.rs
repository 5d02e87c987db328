//! Input system.
//!
//! [`update_input_state`] takes the host's raw [`InputFrame`] for this
//! update and writes it into [`InputState`], deriving press/release edges
//! from the previous frame's held states.
use bevy_ecs::prelude::*;
use log::trace;

use crate::resources::input::{InputFrame, InputState};

/// Feed one frame of raw input into the `InputState` resource.
pub fn update_input_state(world: &mut World, frame: InputFrame) {
    let Some(mut input) = world.get_resource_mut::<InputState>() else {
        return;
    };

    // Directions
    input.left.update(frame.left);
    input.right.update(frame.right);
    input.up.update(frame.up);
    input.down.update(frame.down);
    // Actions
    input.jump.update(frame.jump);
    input.restart.update(frame.restart);
    // Mouse
    input.submit.update(frame.submit);
    input.piece_action.update(frame.piece_action);
    input.cursor = frame.cursor;

    if input.restart.just_pressed {
        trace!("restart pressed");
    }
}
