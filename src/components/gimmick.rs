//! Gimmick component: players and goals.
//!
//! A gimmick is a node with a rectangular body and a circular collision
//! proxy. The closed set of kinds is dispatched with `match`; there is no
//! trait object per kind.

use bevy_ecs::prelude::*;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::transformnode::TransformNode;
use crate::geometry::{Circle, Quad};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GimmickKind {
    Player,
    Goal,
}

/// Interactive stage object.
///
/// `enabled` only ever goes from true to false (a consumed goal); `active`
/// is recomputed on every arrangement commit and is false while the gimmick
/// is buried under a later piece or the ground.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Gimmick {
    pub kind: GimmickKind,
    enabled: bool,
    active: bool,
    /// Body size at world scale 1.
    pub body_size: DVec2,
}

impl Gimmick {
    pub fn new(kind: GimmickKind, tile_size: f64) -> Self {
        Self {
            kind,
            enabled: true,
            active: true,
            body_size: Self::body_size_for(kind, tile_size),
        }
    }

    pub fn body_size_for(kind: GimmickKind, tile_size: f64) -> DVec2 {
        match kind {
            GimmickKind::Player => DVec2::new(tile_size, tile_size * 19.0 / 13.0),
            GimmickKind::Goal => DVec2::splat(tile_size),
        }
    }

    /// Offset from a descriptor's cell corner to the body centre, so the
    /// body stands on the bottom of its cell.
    pub fn anchor_offset(kind: GimmickKind, tile_size: f64) -> DVec2 {
        let body = Self::body_size_for(kind, tile_size);
        match kind {
            GimmickKind::Player => DVec2::new(tile_size / 2.0, tile_size - body.y / 2.0),
            GimmickKind::Goal => DVec2::splat(tile_size / 2.0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Mark the gimmick consumed. There is no way back.
    pub fn destroy(&mut self) {
        self.enabled = false;
    }

    pub fn body(&self, node: &TransformNode) -> Quad {
        Quad::from_center(
            node.world_position(),
            self.body_size * node.world_scale(),
            node.world_angle(),
        )
    }

    pub fn collision(&self, node: &TransformNode) -> Circle {
        let half = (self.body_size * node.world_scale()).abs() / 2.0;
        Circle::new(node.world_position(), half.max_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transformnode::Pose;

    #[test]
    fn destroy_is_one_way() {
        let mut goal = Gimmick::new(GimmickKind::Goal, 30.0);
        assert!(goal.is_enabled());
        goal.destroy();
        goal.set_active(true);
        assert!(!goal.is_enabled());
    }

    #[test]
    fn collision_radius_follows_world_scale() {
        let player = Gimmick::new(GimmickKind::Player, 26.0);
        let node = TransformNode::new(Pose::new(DVec2::new(5.0, 5.0), DVec2::splat(2.0), 0.0));
        let circle = player.collision(&node);
        assert_eq!(circle.center, DVec2::new(5.0, 5.0));
        assert!((circle.radius - 38.0).abs() < 1e-9);
    }

    #[test]
    fn player_stands_on_cell_bottom() {
        let offset = Gimmick::anchor_offset(GimmickKind::Player, 26.0);
        let body = Gimmick::body_size_for(GimmickKind::Player, 26.0);
        assert!((offset.y + body.y / 2.0 - 26.0).abs() < 1e-12);
    }
}
