//! Stage mode transition event and observer.
//!
//! Systems request a change of [`StageMode`] by updating [`NextStageMode`].
//! [`check_pending_mode`](crate::systems::stagemode::check_pending_mode)
//! then emits a [`StageModeChangedEvent`], and the observer in this module
//! applies the transition to [`StageState`].
//!
//! Keeping the request apart from the application means a mode flips only
//! between systems, never half way through one.
use crate::resources::stagestate::NextStageModes::{Pending, Unchanged};
use crate::resources::stagestate::{NextStageMode, StageState};
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Event used to indicate that a pending stage mode transition should be
/// applied.
///
/// Emitting this event causes [`observe_stage_mode_change`] to read
/// [`NextStageMode`]. If it contains [`Pending`], the observer updates
/// [`StageState`] and clears the request; if it is [`Unchanged`], nothing
/// happens.
#[derive(Event, Debug, Clone, Copy)]
pub struct StageModeChangedEvent {}

/// Observer that applies a pending stage mode transition.
///
/// Contract
/// - Reads the intention from [`NextStageMode`].
/// - If pending, writes the new mode into [`StageState`], restarts the
///   ending animation clock and resets [`NextStageMode`] to [`Unchanged`].
/// - If any required resource is missing, logs a diagnostic and returns.
pub fn observe_stage_mode_change(
    _trigger: On<StageModeChangedEvent>,
    mut next_mode: Option<ResMut<NextStageMode>>,
    mut state: Option<ResMut<StageState>>,
) {
    debug!("StageModeChangedEvent triggered");

    let (Some(next_mode), Some(state)) = (next_mode.as_deref_mut(), state.as_deref_mut()) else {
        warn!(
            "One or more resources missing in observe_stage_mode_change. next_mode: {:?}, state: {:?}",
            next_mode.is_some(),
            state.is_some()
        );
        return;
    };

    match *next_mode.get() {
        Pending(new_mode) => {
            if new_mode != state.mode() {
                info!("Stage mode {:?} -> {:?}", state.mode(), new_mode);
                state.set_mode(new_mode);
                state.animation_time = 0.0;
            }
            next_mode.reset();
        }
        Unchanged => {
            debug!("No stage mode change pending.");
        }
    }
}
