//! Hitbox composition.
//!
//! Turns per-tile shapes into a minimal set of non-overlapping ground
//! polygons, first per piece and then for the whole stage. Fusion is
//! "union, accepted only if it yields exactly one polygon"; after each
//! successful fuse the scan restarts, since the grown shape may now reach
//! polygons it missed before. That makes a piece O(n²) in its tile count,
//! which is fine for the few dozen tiles a piece holds.
//!
//! Composition runs when a piece is built and when an arrangement is
//! committed, never per frame.

use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::stagepiece::{PieceKind, StagePiece};
use crate::components::tile::Tile;
use crate::components::transformnode::TransformNode;
use crate::geometry::boolean::{subtract, union};
use crate::geometry::polygon::{Polygon, simplify_all};
use crate::resources::roster::{StageHitboxes, StageRoster};
use crate::resources::stageconfig::StageConfig;

/// Fuse `shape` into `set`, or append it if it fuses with nothing.
pub fn fuse_into(set: &mut Vec<Polygon>, shape: Polygon) {
    let mut shape = shape;
    loop {
        let fused = set.iter().enumerate().find_map(|(i, existing)| {
            let mut merged = union(existing, &shape);
            (merged.len() == 1).then(|| (i, merged.remove(0)))
        });

        match fused {
            Some((i, merged)) => {
                set.remove(i);
                shape = merged;
            }
            None => {
                set.push(shape);
                return;
            }
        }
    }
}

/// Fuse a piece's tile shapes and simplify the result.
pub fn compose_tiles(
    shapes: impl IntoIterator<Item = Polygon>,
    point_eps: f64,
    line_eps: f64,
) -> Vec<Polygon> {
    let mut set = Vec::new();
    for shape in shapes {
        fuse_into(&mut set, shape);
    }
    simplify_all(&mut set, point_eps, line_eps);
    set
}

/// One piece as seen by stage-level composition, in stage space.
#[derive(Debug, Clone)]
pub struct PieceLayer {
    pub kind: PieceKind,
    pub footprint: Polygon,
    pub hitboxes: Vec<Polygon>,
}

/// Compose the stage ground from pieces in draw order.
///
/// A solid piece cuts its footprint out of everything below it and then
/// adds its own ground; a void piece is skipped entirely.
pub fn compose_layers(layers: &[PieceLayer], line_eps: f64) -> Vec<Polygon> {
    let mut ground: Vec<Polygon> = Vec::new();

    for layer in layers {
        if layer.kind == PieceKind::Void {
            continue;
        }

        ground = ground
            .iter()
            .flat_map(|p| subtract(p, &layer.footprint))
            .collect();

        for hitbox in &layer.hitboxes {
            fuse_into(&mut ground, hitbox.clone());
        }
    }

    simplify_all(&mut ground, 0.0, line_eps);
    ground
}

/// Rebuild a piece's fused hitboxes from its tiles.
pub fn build_piece_hitboxes(world: &mut World, piece: Entity) {
    let (point_eps, line_eps) = {
        let config = world.resource::<StageConfig>();
        (config.tile_point_epsilon, config.line_epsilon)
    };

    let Some(tiles) = world.get::<StagePiece>(piece).map(|p| p.tiles.clone()) else {
        warn!("build_piece_hitboxes: {:?} is not a piece", piece);
        return;
    };

    let shapes: Vec<Polygon> = tiles
        .iter()
        .filter_map(|&e| {
            let tile = world.get::<Tile>(e)?;
            let node = world.get::<TransformNode>(e)?;
            Some(tile.local_hitbox(node))
        })
        .collect();

    let hitboxes = compose_tiles(shapes, point_eps, line_eps);
    debug!(
        "piece {:?}: {} tiles fused into {} hitboxes",
        piece,
        tiles.len(),
        hitboxes.len()
    );

    if let Some(mut p) = world.get_mut::<StagePiece>(piece) {
        p.hitboxes = hitboxes;
    }
}

/// Recompose the stage ground from every piece's current pose.
pub fn rebuild_stage_hitboxes(world: &mut World) {
    let line_eps = world.resource::<StageConfig>().line_epsilon;
    let pieces = world.resource::<StageRoster>().pieces.clone();

    let layers: Vec<PieceLayer> = pieces
        .iter()
        .filter_map(|&e| {
            let piece = world.get::<StagePiece>(e)?;
            let node = world.get::<TransformNode>(e)?;
            Some(PieceLayer {
                kind: piece.kind,
                footprint: piece.local_footprint(node).to_polygon(),
                hitboxes: piece.local_hitboxes(node),
            })
        })
        .collect();

    let ground = compose_layers(&layers, line_eps);
    info!(
        "Stage ground rebuilt: {} pieces -> {} polygons",
        layers.len(),
        ground.len()
    );
    world.resource_mut::<StageHitboxes>().local = ground;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn rect(min: DVec2, size: DVec2) -> Polygon {
        Polygon::new(vec![
            min,
            min + DVec2::new(size.x, 0.0),
            min + size,
            min + DVec2::new(0.0, size.y),
        ])
    }

    fn unit(x: f64, y: f64) -> Polygon {
        rect(DVec2::new(x, y), DVec2::ONE)
    }

    fn overlaps(a: &Polygon, b: &Polygon) -> bool {
        let merged: f64 = union(a, b).iter().map(Polygon::area).sum();
        merged + 1e-6 < a.area() + b.area()
    }

    #[test]
    fn adjacent_unit_squares_become_one_rectangle() {
        let set = compose_tiles([unit(0.0, 0.0), unit(1.0, 0.0)], 0.0, 1e-5);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].outer.len(), 4);
        assert!((set[0].area() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bridging_tile_merges_earlier_islands() {
        let set = compose_tiles([unit(0.0, 0.0), unit(2.0, 0.0), unit(1.0, 0.0)], 0.0, 1e-5);
        assert_eq!(set.len(), 1);
        assert!((set[0].area() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn separate_tiles_stay_separate() {
        let set = compose_tiles([unit(0.0, 0.0), unit(5.0, 5.0)], 0.0, 1e-5);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn void_layer_neither_cuts_nor_adds() {
        let floor = rect(DVec2::ZERO, DVec2::new(10.0, 1.0));
        let layers = [
            PieceLayer {
                kind: PieceKind::Normal,
                footprint: rect(DVec2::new(0.0, -4.0), DVec2::new(10.0, 5.0)),
                hitboxes: vec![floor.clone()],
            },
            PieceLayer {
                kind: PieceKind::Void,
                footprint: rect(DVec2::new(0.0, -4.0), DVec2::new(10.0, 5.0)),
                hitboxes: vec![rect(DVec2::new(0.0, -3.0), DVec2::new(2.0, 1.0))],
            },
        ];
        let ground = compose_layers(&layers, 1e-5);
        assert_eq!(ground.len(), 1);
        assert!((ground[0].area() - floor.area()).abs() < 1e-6);
    }

    #[test]
    fn solid_layer_on_top_removes_ground_beneath() {
        let layers = [
            PieceLayer {
                kind: PieceKind::Normal,
                footprint: rect(DVec2::new(0.0, -4.0), DVec2::new(10.0, 5.0)),
                hitboxes: vec![rect(DVec2::ZERO, DVec2::new(10.0, 1.0))],
            },
            PieceLayer {
                kind: PieceKind::Normal,
                footprint: rect(DVec2::new(0.0, -4.0), DVec2::new(10.0, 5.0)),
                hitboxes: vec![],
            },
        ];
        assert!(compose_layers(&layers, 1e-5).is_empty());
    }

    #[test]
    fn layered_ground_has_no_overlaps() {
        let layers = [
            PieceLayer {
                kind: PieceKind::Normal,
                footprint: rect(DVec2::ZERO, DVec2::new(10.0, 10.0)),
                hitboxes: vec![
                    rect(DVec2::new(0.0, 8.0), DVec2::new(10.0, 2.0)),
                    rect(DVec2::new(4.0, 4.0), DVec2::new(2.0, 4.0)),
                ],
            },
            PieceLayer {
                kind: PieceKind::Gravity,
                footprint: rect(DVec2::new(6.0, 6.0), DVec2::new(6.0, 6.0)),
                hitboxes: vec![rect(DVec2::new(6.0, 9.0), DVec2::new(6.0, 1.0))],
            },
            PieceLayer {
                kind: PieceKind::Normal,
                footprint: rect(DVec2::new(-3.0, 2.0), DVec2::new(5.0, 5.0)),
                hitboxes: vec![
                    rect(DVec2::new(-3.0, 6.0), DVec2::new(5.0, 1.0)),
                    rect(DVec2::new(1.0, 2.0), DVec2::new(1.0, 4.0)),
                ],
            },
        ];
        let ground = compose_layers(&layers, 1e-5);
        assert!(!ground.is_empty());
        for (i, a) in ground.iter().enumerate() {
            for b in &ground[i + 1..] {
                assert!(!overlaps(a, b));
            }
        }
    }
}
