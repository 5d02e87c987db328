//! Player update for play mode.
//!
//! Each update, every enabled and active player:
//! 1. applies walk/jump/gravity controls to its speed,
//! 2. is swept through the composed ground by the resolver, with the
//!    remaining goals as touchable proxies,
//! 3. has its node moved to the resolved centre,
//! 4. turns its "down" to match a gravity piece it now overlaps.
//!
//! Then the round is checked: no goal left means clear, and a player
//! outside the playable area or shrunk too far means game over.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::{info, trace};

use crate::components::gimmick::Gimmick;
use crate::components::player::PlayerBody;
use crate::components::stagepiece::{PieceKind, StagePiece};
use crate::components::transformnode::TransformNode;
use crate::events::gimmick::GimmickContactEvent;
use crate::geometry::Circle;
use crate::resources::input::InputState;
use crate::resources::roster::{StageHitboxes, StageRoster};
use crate::resources::screensize::ScreenSize;
use crate::resources::stageconfig::StageConfig;
use crate::resources::stagestate::{GameOverCause, StageState};
use crate::resources::worldtime::WorldTime;
use crate::systems::hierarchy::{set_world_angle, set_world_position, world_pose};
use crate::systems::resolver::{SweepBody, sweep};
use crate::systems::stagemode::gimmick_circle;

const ANGLE_EPSILON: f64 = 1e-9;

pub fn update_player_action(world: &mut World) {
    let input = world.resource::<InputState>().clone();
    let config = world.resource::<StageConfig>().clone();
    let time = *world.resource::<WorldTime>();
    let roster = world.resource::<StageRoster>().clone();
    let Some(root_pose) = world_pose(world, roster.root) else {
        return;
    };

    let ground: Vec<Vec<DVec2>> = world
        .resource::<StageHitboxes>()
        .world(&root_pose)
        .into_iter()
        .flat_map(|p| p.rings().cloned().collect::<Vec<_>>())
        .collect();

    let goals: Vec<(Entity, Circle)> = roster
        .goals
        .iter()
        .filter(|&&e| {
            world
                .get::<Gimmick>(e)
                .is_some_and(|g| g.is_enabled() && g.is_active())
        })
        .filter_map(|&e| gimmick_circle(world, e).map(|c| (e, c)))
        .collect();
    let proxies: Vec<Circle> = goals.iter().map(|(_, c)| *c).collect();

    for &player in &roster.players {
        if !world
            .get::<Gimmick>(player)
            .is_some_and(|g| g.is_enabled() && g.is_active())
        {
            continue;
        }
        let Some(circle) = gimmick_circle(world, player) else {
            continue;
        };
        let Some(mut body) = world.get::<PlayerBody>(player).copied() else {
            continue;
        };

        body.apply_controls(&input, time.delta, &config);
        let mut sweep_body = SweepBody {
            center: circle.center,
            radius: circle.radius,
            down: body.down,
            right: body.right,
            speed: body.speed,
            grounded: body.grounded,
        };
        let report = sweep(&mut sweep_body, &ground, &proxies);
        trace!(
            "player {:?}: {} passes, moved {:?}",
            player, report.passes, report.displacement
        );

        set_world_position(world, player, sweep_body.center);
        body.speed = sweep_body.speed;
        body.grounded = sweep_body.grounded;
        body.select_frame(time.triangle(0.5));

        if let Some(angle) = gravity_angle(world, &roster.pieces, player)
            && (angle - body.facing_angle).abs() > ANGLE_EPSILON
        {
            set_world_angle(world, player, angle);
            body.update_direction(angle);
        }

        if let Some(mut stored) = world.get_mut::<PlayerBody>(player) {
            *stored = body;
        }

        for &i in &report.touched {
            world.trigger(GimmickContactEvent {
                player,
                gimmick: goals[i].0,
            });
        }
    }

    check_round(world, &roster, &config);
}

/// Angle of the gravity piece that decides the player's "down", if any.
///
/// Only the topmost non-void piece overlapping the player counts.
fn gravity_angle(world: &World, pieces: &[Entity], player: Entity) -> Option<f64> {
    let circle = gimmick_circle(world, player)?;
    pieces.iter().rev().find_map(|&piece| {
        let p = world.get::<StagePiece>(piece)?;
        let node = world.get::<TransformNode>(piece)?;
        if p.kind == PieceKind::Void || !p.world_footprint(node).intersects_circle(&circle) {
            return None;
        }
        Some((p.kind, node.world_angle()))
    })
    .and_then(|(kind, angle)| (kind == PieceKind::Gravity).then_some(angle))
}

fn check_round(world: &mut World, roster: &StageRoster, config: &StageConfig) {
    let goals_left = roster
        .goals
        .iter()
        .any(|&e| world.get::<Gimmick>(e).is_some_and(|g| g.is_enabled()));
    if !goals_left {
        info!("All goals collected");
        world.resource_mut::<StageState>().set_game_clear();
        return;
    }

    let bounds = world.resource::<ScreenSize>().bounds();
    for &player in &roster.players {
        let Some(g) = world.get::<Gimmick>(player) else {
            continue;
        };
        if !g.is_enabled() {
            continue;
        }
        let Some(node) = world.get::<TransformNode>(player) else {
            continue;
        };

        let cause = if !bounds.intersects_circle(&g.collision(node)) {
            Some(GameOverCause::FallOut)
        } else if node.world_scale().abs().min_element() < config.min_player_scale {
            Some(GameOverCause::ScaleOut)
        } else {
            None
        };

        if let Some(cause) = cause {
            info!("Player {:?} out: {:?}", player, cause);
            world.resource_mut::<StageState>().set_game_over(cause);
            return;
        }
    }
}
