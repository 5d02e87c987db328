//! End-of-round camera sequences.
//!
//! Clear zooms onto the first player and holds before asking the host for
//! the stage select; game over shakes the view briefly before asking for a
//! reload. Both only animate [`StageCamera`] and raise a flag on
//! [`StageState`]; loading is up to the host.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::info;

use crate::components::transformnode::TransformNode;
use crate::resources::camera2d::StageCamera;
use crate::resources::roster::StageRoster;
use crate::resources::stagestate::StageState;
use crate::resources::worldtime::WorldTime;

const CLEAR_ZOOM_TIME: f64 = 0.5;
const CLEAR_HOLD_TIME: f64 = 1.0;
const CLEAR_ZOOM: f64 = 3.0;
const SHAKE_TIME: f64 = 0.5;
const SHAKE_PERIOD: f64 = 0.1;
const SHAKE_AMPLITUDE: f64 = 5.0;

pub fn update_game_clear(
    time: Res<WorldTime>,
    roster: Res<StageRoster>,
    nodes: Query<&TransformNode>,
    mut state: ResMut<StageState>,
    mut camera: ResMut<StageCamera>,
) {
    if state.load_select_wait() {
        return;
    }
    state.animation_time += time.delta;
    let t = state.animation_time;

    let root = nodes
        .get(roster.root)
        .map(|n| n.world_position())
        .unwrap_or(DVec2::ZERO);
    let player = roster
        .players
        .first()
        .and_then(|&p| nodes.get(p).ok())
        .map_or(root, |n| n.world_position());

    if t < CLEAR_ZOOM_TIME {
        let a = t / CLEAR_ZOOM_TIME;
        camera.zoom = 1.0 + (CLEAR_ZOOM - 1.0) * a;
        camera.target = root.lerp(player, a);
    } else if t < CLEAR_ZOOM_TIME + CLEAR_HOLD_TIME {
        camera.zoom = CLEAR_ZOOM;
        camera.target = player;
    } else {
        info!("Clear sequence finished");
        state.raise_load_select();
    }
}

pub fn update_game_over(
    time: Res<WorldTime>,
    roster: Res<StageRoster>,
    nodes: Query<&TransformNode>,
    mut state: ResMut<StageState>,
    mut camera: ResMut<StageCamera>,
) {
    if state.load_stage_wait() {
        return;
    }
    state.animation_time += time.delta;

    let root = nodes
        .get(roster.root)
        .map(|n| n.world_position())
        .unwrap_or(DVec2::ZERO);

    if state.animation_time < SHAKE_TIME {
        camera.target = root + DVec2::new(time.triangle(SHAKE_PERIOD) * SHAKE_AMPLITUDE, 0.0);
    } else {
        camera.target = root;
        info!("Game over sequence finished: {:?}", state.game_over_cause());
        state.raise_load_stage();
    }
}
