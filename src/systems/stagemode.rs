//! Stage mode switching.
//!
//! [`change_mode`] reads the input and the round flags once per update and
//! requests the mode the stage should be in; [`check_pending_mode`] then
//! fires the event that applies it. The mode systems run after both, gated
//! by the `mode_is_*` conditions, so each update runs exactly one of them.
//!
//! Switching from play back to arrangement re-attaches gimmicks to the
//! pieces they sit on. Switching from arrangement to play commits the
//! arrangement: the ground is recomposed, buried gimmicks are disabled and
//! the rest are detached from their pieces.

use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::gimmick::Gimmick;
use crate::components::player::PlayerBody;
use crate::components::stagepiece::{PieceInteraction, StagePiece};
use crate::components::transformnode::TransformNode;
use crate::events::stagemode::StageModeChangedEvent;
use crate::geometry::{Circle, Quad};
use crate::resources::input::InputState;
use crate::resources::roster::{StageHitboxes, StageRoster};
use crate::resources::stagestate::{
    GameOverCause, NextStageMode, NextStageModes, StageMode, StageState,
};
use crate::systems::composer::rebuild_stage_hitboxes;
use crate::systems::hierarchy::{set_parent, world_pose};

pub fn check_pending_mode(mut commands: Commands, next_mode: Res<NextStageMode>) {
    if let NextStageModes::Pending(_new_mode) = next_mode.get() {
        commands.trigger(StageModeChangedEvent {});
    }
}

pub fn mode_is_arrangement(state: Res<StageState>) -> bool {
    state.mode() == StageMode::Arrangement
}

pub fn mode_is_play(state: Res<StageState>) -> bool {
    state.mode() == StageMode::Play
}

pub fn mode_is_clear(state: Res<StageState>) -> bool {
    state.mode() == StageMode::Clear
}

pub fn mode_is_gameover(state: Res<StageState>) -> bool {
    state.mode() == StageMode::GameOver
}

/// World-space collision circle of a gimmick node.
pub(crate) fn gimmick_circle(world: &World, gimmick: Entity) -> Option<Circle> {
    let g = world.get::<Gimmick>(gimmick)?;
    let node = world.get::<TransformNode>(gimmick)?;
    Some(g.collision(node))
}

/// World-space footprint of a piece node.
pub(crate) fn piece_footprint(world: &World, piece: Entity) -> Option<Quad> {
    let p = world.get::<StagePiece>(piece)?;
    let node = world.get::<TransformNode>(piece)?;
    Some(p.world_footprint(node))
}

/// Decide this update's mode and request it if it differs.
///
/// While the round runs, a mouse button switches to arrangement and a
/// gameplay key to play; the restart key ends the round. Once the round is
/// over the mode follows the outcome.
pub fn change_mode(world: &mut World) {
    let (restart, any_mouse, any_key) = {
        let input = world.resource::<InputState>();
        (input.restart.just_pressed, input.any_mouse(), input.any_key())
    };

    if restart {
        let mut state = world.resource_mut::<StageState>();
        if !state.is_round_over() {
            info!("Restart requested");
            state.set_game_over(GameOverCause::Restart);
        }
    }

    let (round_over, clear, piece_action) = {
        let state = world.resource::<StageState>();
        (state.is_round_over(), state.is_clear(), state.piece_action)
    };

    let target = if round_over {
        if clear {
            StageMode::Clear
        } else {
            StageMode::GameOver
        }
    } else {
        let mut piece_action = piece_action;
        if any_mouse {
            if !piece_action {
                attach_gimmicks(world);
            }
            piece_action = true;
        } else if any_key {
            if piece_action {
                commit_arrangement(world);
            }
            piece_action = false;
        }
        world.resource_mut::<StageState>().piece_action = piece_action;

        if piece_action {
            StageMode::Arrangement
        } else {
            StageMode::Play
        }
    };

    if world.resource::<StageState>().mode() != target {
        world.resource_mut::<NextStageMode>().set(target);
    }
}

/// Attach every active gimmick to the topmost piece under it, or hang it
/// from the stage root when no piece is.
pub fn attach_gimmicks(world: &mut World) {
    let Some(roster) = world.get_resource::<StageRoster>().cloned() else {
        warn!("attach_gimmicks: no stage roster");
        return;
    };
    let mut loose = roster.loose.clone();

    for gimmick in roster.gimmicks() {
        let Some(g) = world.get::<Gimmick>(gimmick) else {
            continue;
        };
        if !g.is_active() {
            continue;
        }
        let Some(circle) = gimmick_circle(world, gimmick) else {
            continue;
        };

        for &piece in &roster.pieces {
            if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
                p.gimmicks.retain(|&e| e != gimmick);
            }
        }
        loose.retain(|&e| e != gimmick);

        let host = roster
            .pieces
            .iter()
            .rev()
            .copied()
            .find(|&piece| piece_footprint(world, piece).is_some_and(|q| q.intersects_circle(&circle)));

        match host {
            Some(piece) => {
                set_parent(world, gimmick, Some(piece));
                if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
                    p.gimmicks.push(gimmick);
                }
                debug!("gimmick {:?} attached to piece {:?}", gimmick, piece);
            }
            None => {
                set_parent(world, gimmick, Some(roster.root));
                loose.push(gimmick);
            }
        }
    }

    world.resource_mut::<StageRoster>().loose = loose;
}

/// Recompute which gimmicks take part in play.
///
/// A gimmick is buried, and so inactive, when its collision circle shrunk
/// by one unit overlaps the footprint of a piece drawn above it or, for a
/// gimmick on a piece, the composed ground. Active gimmicks on pieces are
/// then detached to the stage root.
pub fn check_active_gimmicks(world: &mut World) {
    let Some(roster) = world.get_resource::<StageRoster>().cloned() else {
        warn!("check_active_gimmicks: no stage roster");
        return;
    };
    let Some(root_pose) = world_pose(world, roster.root) else {
        return;
    };
    let ground = world.resource::<StageHitboxes>().world(&root_pose);
    let footprints: Vec<Option<Quad>> = roster
        .pieces
        .iter()
        .map(|&piece| piece_footprint(world, piece))
        .collect();

    for &gimmick in &roster.loose {
        let Some(circle) = gimmick_circle(world, gimmick).map(|c| c.stretched(-1.0)) else {
            continue;
        };
        let buried = footprints
            .iter()
            .flatten()
            .any(|q| q.intersects_circle(&circle));
        if let Some(mut g) = world.get_mut::<Gimmick>(gimmick) {
            g.set_active(!buried);
        }
    }

    let mut detached = Vec::new();
    for (i, &piece) in roster.pieces.iter().enumerate() {
        let Some(gimmicks) = world.get::<StagePiece>(piece).map(|p| p.gimmicks.clone()) else {
            continue;
        };

        let mut kept = Vec::with_capacity(gimmicks.len());
        for gimmick in gimmicks {
            let Some(circle) = gimmick_circle(world, gimmick).map(|c| c.stretched(-1.0)) else {
                continue;
            };
            let buried = ground.iter().any(|p| p.intersects_circle(&circle))
                || footprints[i + 1..]
                    .iter()
                    .flatten()
                    .any(|q| q.intersects_circle(&circle));
            if let Some(mut g) = world.get_mut::<Gimmick>(gimmick) {
                g.set_active(!buried);
            }

            if buried {
                kept.push(gimmick);
            } else {
                set_parent(world, gimmick, Some(roster.root));
                detached.push(gimmick);
            }
        }

        if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
            p.gimmicks = kept;
        }
    }

    let active = roster
        .gimmicks()
        .filter(|&e| world.get::<Gimmick>(e).is_some_and(|g| g.is_active()))
        .count();
    debug!(
        "activation recheck: {} detached, {} active gimmicks",
        detached.len(),
        active
    );
    world.resource_mut::<StageRoster>().loose.extend(detached);
}

/// Leave arrangement: recompose the ground, recheck gimmicks, drop the
/// piece selection and turn every player to its current world angle.
pub fn commit_arrangement(world: &mut World) {
    rebuild_stage_hitboxes(world);
    check_active_gimmicks(world);

    let Some(roster) = world.get_resource::<StageRoster>().cloned() else {
        return;
    };
    for &piece in &roster.pieces {
        if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
            p.selected = false;
            p.interaction = PieceInteraction::Idle;
        }
    }
    for &player in &roster.players {
        let Some(angle) = world_pose(world, player).map(|p| p.angle) else {
            continue;
        };
        if let Some(mut body) = world.get_mut::<PlayerBody>(player) {
            body.update_direction(angle);
        }
    }
    info!("Arrangement committed");
}
