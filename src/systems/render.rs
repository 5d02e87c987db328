//! Draw extraction.
//!
//! The stage never talks to a graphics API. [`extract_draw_list`] walks the
//! roster in draw order and produces a [`DrawList`] the host replays with
//! whatever renderer it uses. Everything is in world coordinates; the
//! camera is included so the host can set up its view.
//!
//! Order depends on the mode:
//! - arrangement: loose gimmicks, then per piece (by [`ZIndex`]) its back,
//!   attached gimmicks, tiles and, when selected, a selection frame;
//! - otherwise: buried loose gimmicks, pieces with their buried gimmicks,
//!   then every active player and goal on top.
//!
//! Disabled gimmicks (consumed goals) are never drawn.

use bevy_ecs::prelude::*;
use glam::IVec2;
use rustc_hash::FxHashSet;

use crate::components::gimmick::{Gimmick, GimmickKind};
use crate::components::player::PlayerBody;
use crate::components::stagepiece::{PieceKind, StagePiece};
use crate::components::tile::{Tile, TileShape};
use crate::components::transformnode::TransformNode;
use crate::components::zindex::ZIndex;
use crate::geometry::Quad;
use crate::resources::camera2d::StageCamera;
use crate::resources::roster::{CursorHint, CursorStyle, StageRoster};
use crate::resources::stagestate::{StageMode, StageState};

/// One thing to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A piece's background rectangle; `shade` darkens lower pieces.
    PieceBack {
        piece: Entity,
        kind: PieceKind,
        quad: Quad,
        shade: f64,
    },
    Tile {
        tile: Entity,
        shape: TileShape,
        uv: IVec2,
        quad: Quad,
    },
    Gimmick {
        gimmick: Entity,
        kind: GimmickKind,
        body: Quad,
        /// Sprite frame for players, 0 for goals.
        frame: u32,
        active: bool,
    },
    SelectionFrame {
        piece: Entity,
        quad: Quad,
    },
}

/// Snapshot of everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub mode: StageMode,
    pub camera: StageCamera,
    pub cursor: CursorStyle,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn gimmick_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Gimmick { .. }))
            .count()
    }
}

pub fn extract_draw_list(world: &World) -> DrawList {
    let mode = world
        .get_resource::<StageState>()
        .map_or(StageMode::Arrangement, |s| s.mode());
    let camera = world
        .get_resource::<StageCamera>()
        .copied()
        .unwrap_or_default();
    let cursor = world
        .get_resource::<CursorHint>()
        .map_or(CursorStyle::Arrow, |c| c.0);

    let mut list = DrawList {
        mode,
        camera,
        cursor,
        commands: Vec::new(),
    };
    let Some(roster) = world.get_resource::<StageRoster>() else {
        return list;
    };

    let mut pieces: Vec<(ZIndex, Entity)> = roster
        .pieces
        .iter()
        .filter_map(|&e| world.get::<ZIndex>(e).map(|z| (*z, e)))
        .collect();
    pieces.sort();
    let piece_count = pieces.len();

    let arranging = mode == StageMode::Arrangement;
    let mut drawn: FxHashSet<Entity> = FxHashSet::default();

    for &gimmick in &roster.loose {
        if arranging || !is_active(world, gimmick) {
            push_gimmick(world, gimmick, &mut list.commands, &mut drawn);
        }
    }

    for (index, &(_, piece)) in pieces.iter().enumerate() {
        let (Some(p), Some(node)) = (
            world.get::<StagePiece>(piece),
            world.get::<TransformNode>(piece),
        ) else {
            continue;
        };
        let footprint = p.world_footprint(node);

        list.commands.push(DrawCommand::PieceBack {
            piece,
            kind: p.kind,
            quad: footprint,
            shade: (piece_count - index - 1) as f64 * 0.05 + 0.5,
        });
        for &gimmick in &p.gimmicks {
            push_gimmick(world, gimmick, &mut list.commands, &mut drawn);
        }
        for &tile in &p.tiles {
            if let Some(cmd) = tile_command(world, tile) {
                list.commands.push(cmd);
            }
        }
        if arranging && p.selected {
            list.commands.push(DrawCommand::SelectionFrame {
                piece,
                quad: footprint,
            });
        }
    }

    if !arranging {
        for gimmick in roster.gimmicks() {
            if is_active(world, gimmick) {
                push_gimmick(world, gimmick, &mut list.commands, &mut drawn);
            }
        }
    }

    list
}

fn is_active(world: &World, gimmick: Entity) -> bool {
    world.get::<Gimmick>(gimmick).is_some_and(|g| g.is_active())
}

fn push_gimmick(
    world: &World,
    gimmick: Entity,
    commands: &mut Vec<DrawCommand>,
    drawn: &mut FxHashSet<Entity>,
) {
    let (Some(g), Some(node)) = (
        world.get::<Gimmick>(gimmick),
        world.get::<TransformNode>(gimmick),
    ) else {
        return;
    };
    if !g.is_enabled() || !drawn.insert(gimmick) {
        return;
    }
    let frame = world
        .get::<PlayerBody>(gimmick)
        .map_or(0, |b| b.animation_frame);
    commands.push(DrawCommand::Gimmick {
        gimmick,
        kind: g.kind,
        body: g.body(node),
        frame,
        active: g.is_active(),
    });
}

fn tile_command(world: &World, tile: Entity) -> Option<DrawCommand> {
    let t = world.get::<Tile>(tile)?;
    let pose = world.get::<TransformNode>(tile)?.world();
    // The node sits on the cell's corner and its scale is the cell size.
    let center = pose.transform_point(glam::DVec2::splat(0.5));
    Some(DrawCommand::Tile {
        tile,
        shape: t.shape,
        uv: t.uv,
        quad: Quad::from_center(center, pose.scale, pose.angle),
    })
}
