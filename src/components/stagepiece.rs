//! Stage piece component.
//!
//! A piece is a rectangle of background (its footprint) carrying tiles and,
//! while the player arranges the stage, the gimmicks sitting on it. The
//! piece's node position is the footprint centre. Tiles and attached
//! gimmicks are child nodes, so moving, scaling or rotating the piece carries
//! them along.

use bevy_ecs::prelude::*;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::transformnode::TransformNode;
use crate::geometry::{Polygon, Quad};

/// Background type: decides how the piece takes part in ground composition
/// and whether it bends the player's gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PieceKind {
    #[default]
    Normal,
    /// See-through layer: neither occludes nor adds ground.
    Void,
    /// Standing on it turns the player's "down" to the piece's rotation.
    Gravity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceCapabilities {
    pub can_move: bool,
    pub can_scale: bool,
    pub can_rotate: bool,
}

/// What the cursor is currently doing to a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PieceInteraction {
    #[default]
    Idle,
    Moving,
    Scaling,
    Rotating,
}

#[derive(Component, Debug, Clone)]
pub struct StagePiece {
    pub kind: PieceKind,
    /// Footprint size at scale 1.
    pub back_size: DVec2,
    pub capabilities: PieceCapabilities,
    pub interaction: PieceInteraction,
    pub selected: bool,
    /// Fused tile shapes in piece space.
    pub hitboxes: Vec<Polygon>,
    pub tiles: Vec<Entity>,
    /// Gimmicks currently attached (children of this piece's node).
    pub gimmicks: Vec<Entity>,
    pub(crate) prev_cursor: DVec2,
}

impl StagePiece {
    pub fn new(kind: PieceKind, back_size: DVec2, capabilities: PieceCapabilities) -> Self {
        Self {
            kind,
            back_size,
            capabilities,
            interaction: PieceInteraction::Idle,
            selected: false,
            hitboxes: Vec::new(),
            tiles: Vec::new(),
            gimmicks: Vec::new(),
            prev_cursor: DVec2::ZERO,
        }
    }

    /// Hitboxes in the parent (stage) space.
    pub fn local_hitboxes(&self, node: &TransformNode) -> Vec<Polygon> {
        self.hitboxes
            .iter()
            .map(|p| p.transformed(node.local()))
            .collect()
    }

    pub fn world_hitboxes(&self, node: &TransformNode) -> Vec<Polygon> {
        self.hitboxes
            .iter()
            .map(|p| p.transformed(node.world()))
            .collect()
    }

    /// Footprint in the parent (stage) space.
    pub fn local_footprint(&self, node: &TransformNode) -> Quad {
        Quad::from_center(
            node.local_position(),
            node.local_scale() * self.back_size,
            node.local_angle(),
        )
    }

    pub fn world_footprint(&self, node: &TransformNode) -> Quad {
        Quad::from_center(
            node.world_position(),
            node.world_scale() * self.back_size,
            node.world_angle(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transformnode::Pose;
    use std::f64::consts::FRAC_PI_2;

    fn turned_node() -> TransformNode {
        TransformNode::new(Pose::new(
            DVec2::new(100.0, 50.0),
            DVec2::splat(2.0),
            FRAC_PI_2,
        ))
    }

    #[test]
    fn footprint_follows_scale_and_rotation() {
        let piece = StagePiece::new(
            PieceKind::Normal,
            DVec2::new(30.0, 10.0),
            PieceCapabilities::default(),
        );
        let quad = piece.world_footprint(&turned_node());

        assert_eq!(quad.size(), DVec2::new(60.0, 20.0));
        // Long side now runs along y.
        assert!(quad.contains(DVec2::new(110.0, 75.0)));
        assert!(!quad.contains(DVec2::new(130.0, 50.0)));
    }

    #[test]
    fn hitboxes_map_through_the_node_pose() {
        let mut piece = StagePiece::new(
            PieceKind::Gravity,
            DVec2::new(2.0, 2.0),
            PieceCapabilities::default(),
        );
        piece.hitboxes.push(Polygon::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ]));

        let mapped = piece.world_hitboxes(&turned_node());
        assert_eq!(mapped.len(), 1);
        assert!((mapped[0].area() - 4.0).abs() < 1e-9);
        assert!(mapped[0].contains_point(DVec2::new(99.0, 51.0)));
        assert!(!mapped[0].contains_point(DVec2::new(101.0, 51.0)));
    }
}
