//! Piece arrangement with the mouse.
//!
//! The primary button selects the piece under the cursor. With a piece
//! selected, pressing the secondary button picks an action from where the
//! cursor sits relative to the piece's footprint:
//!
//! - inner band (footprint shrunk by a quarter of its shorter side): move
//! - rest of the footprint: scale
//! - ring of that same width around the footprint: rotate
//!
//! The action then follows the cursor until the secondary button is
//! released. Pieces are tested topmost first and the first one that reacts
//! becomes the only selected piece.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::debug;

use crate::components::stagepiece::{PieceInteraction, StagePiece};
use crate::components::transformnode::TransformNode;
use crate::geometry::segment::angle_between;
use crate::resources::input::InputState;
use crate::resources::roster::{CursorHint, CursorStyle, StageRoster};
use crate::systems::hierarchy::{set_local_scale, set_world_angle, set_world_position};

const MIN_PIECE_SCALE: f64 = 0.5;
const MAX_PIECE_SCALE: f64 = 2.0;

pub fn update_piece_action(world: &mut World) {
    let input = world.resource::<InputState>().clone();
    let pieces = world.resource::<StageRoster>().pieces.clone();

    let mut hint = CursorStyle::Arrow;
    let reacted = pieces
        .iter()
        .rev()
        .copied()
        .find(|&piece| update_piece(world, piece, &input, &mut hint));

    if let Some(selected) = reacted {
        for &piece in &pieces {
            if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
                p.selected = piece == selected;
            }
        }
    }
    world.resource_mut::<CursorHint>().0 = hint;
}

/// Returns true when the piece reacted to the cursor this update.
fn update_piece(
    world: &mut World,
    piece: Entity,
    input: &InputState,
    hint: &mut CursorStyle,
) -> bool {
    let Some(footprint) = world
        .get::<TransformNode>(piece)
        .zip(world.get::<StagePiece>(piece))
        .map(|(node, p)| p.world_footprint(node))
    else {
        return false;
    };

    let clicked = input.submit.just_pressed && footprint.contains(input.cursor);
    let Some(mut p) = world.get_mut::<StagePiece>(piece) else {
        return false;
    };
    if clicked {
        p.selected = true;
    }
    if !p.selected {
        return false;
    }

    if p.interaction != PieceInteraction::Idle {
        return process_action(world, piece, input, hint) || clicked;
    }
    check_action(world, piece, input, hint) || clicked
}

/// Pick the action under the cursor and start it on a secondary press.
fn check_action(
    world: &mut World,
    piece: Entity,
    input: &InputState,
    hint: &mut CursorStyle,
) -> bool {
    let Some(node) = world.get::<TransformNode>(piece).cloned() else {
        return false;
    };
    let Some(mut p) = world.get_mut::<StagePiece>(piece) else {
        return false;
    };

    let footprint = p.world_footprint(&node);
    let band = footprint.size().min_element() / 4.0;
    let inner = footprint.stretched(-band);
    let outer = footprint.stretched(band);
    let cursor = input.cursor;
    let caps = p.capabilities;

    let (style, action) = if inner.contains(cursor) {
        if caps.can_move && p.gimmicks.is_empty() {
            (CursorStyle::Cross, PieceInteraction::Moving)
        } else {
            (CursorStyle::NotAllowed, PieceInteraction::Idle)
        }
    } else if footprint.contains(cursor) {
        if caps.can_scale {
            (CursorStyle::ResizeAll, PieceInteraction::Scaling)
        } else {
            (CursorStyle::NotAllowed, PieceInteraction::Idle)
        }
    } else if outer.contains(cursor) {
        if caps.can_rotate {
            (CursorStyle::Hand, PieceInteraction::Rotating)
        } else {
            (CursorStyle::NotAllowed, PieceInteraction::Idle)
        }
    } else {
        return false;
    };
    *hint = style;

    let is_down = input.piece_action.just_pressed;
    if is_down {
        p.interaction = action;
        p.prev_cursor = cursor;
        debug!("piece {:?}: {:?}", piece, action);
    }
    is_down
}

/// Apply the running action to the piece; ends it on release.
fn process_action(
    world: &mut World,
    piece: Entity,
    input: &InputState,
    hint: &mut CursorStyle,
) -> bool {
    let Some(node) = world.get::<TransformNode>(piece).cloned() else {
        return false;
    };
    let Some(p) = world.get::<StagePiece>(piece) else {
        return false;
    };
    let (action, back_size, prev_cursor) = (p.interaction, p.back_size, p.prev_cursor);

    if input.piece_action.just_released {
        if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
            p.interaction = PieceInteraction::Idle;
        }
        return false;
    }

    let cursor = input.cursor;
    let center = node.world_position();
    match action {
        PieceInteraction::Moving => {
            *hint = CursorStyle::Cross;
            set_world_position(world, piece, cursor.round());
        }
        PieceInteraction::Scaling => {
            *hint = CursorStyle::ResizeAll;
            let half_diagonal = (back_size / 2.0).length();
            if half_diagonal > 0.0 {
                let ratio = (cursor - center).length() / half_diagonal;
                let scale = ((ratio * 10.0).round() / 10.0).clamp(MIN_PIECE_SCALE, MAX_PIECE_SCALE);
                set_local_scale(world, piece, DVec2::splat(scale));
            }
        }
        PieceInteraction::Rotating => {
            *hint = CursorStyle::Hand;
            let prev = prev_cursor - center;
            let current = cursor - center;
            if prev != DVec2::ZERO && current != DVec2::ZERO {
                let mut theta = angle_between(prev, current);
                if prev.perp().dot(current) < 0.0 {
                    theta = -theta;
                }
                set_world_angle(world, piece, node.world_angle() + theta);
            }
        }
        PieceInteraction::Idle => {}
    }

    if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
        p.prev_cursor = cursor;
    }
    true
}
