//! Handles to every stage object, in a fixed order.
//!
//! Entity queries make no ordering promise, but layering, picking and goal
//! checks all depend on order, so the stage keeps its own lists.

use bevy_ecs::prelude::*;

use crate::components::transformnode::Pose;
use crate::geometry::Polygon;

#[derive(Resource, Debug, Clone)]
pub struct StageRoster {
    /// Node every piece and loose gimmick hangs from.
    pub root: Entity,
    /// Pieces in draw order; later entries are on top.
    pub pieces: Vec<Entity>,
    pub players: Vec<Entity>,
    pub goals: Vec<Entity>,
    /// Gimmicks not attached to any piece.
    pub loose: Vec<Entity>,
}

impl StageRoster {
    pub fn new(root: Entity) -> Self {
        Self {
            root,
            pieces: Vec::new(),
            players: Vec::new(),
            goals: Vec::new(),
            loose: Vec::new(),
        }
    }

    /// Players first, then goals.
    pub fn gimmicks(&self) -> impl Iterator<Item = Entity> + '_ {
        self.players.iter().chain(self.goals.iter()).copied()
    }
}

/// Composed ground in stage-root space.
#[derive(Resource, Debug, Clone, Default)]
pub struct StageHitboxes {
    pub local: Vec<Polygon>,
}

impl StageHitboxes {
    /// Ground mapped through the stage root's world pose.
    pub fn world(&self, root: &Pose) -> Vec<Polygon> {
        self.local.iter().map(|p| p.transformed(root)).collect()
    }
}

/// Cursor style the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorStyle {
    #[default]
    Arrow,
    /// Over the inner band of a movable piece.
    Cross,
    /// Over the footprint edge band of a scalable piece.
    ResizeAll,
    /// Just outside a rotatable piece.
    Hand,
    /// Over a band whose action the piece does not allow.
    NotAllowed,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CursorHint(pub CursorStyle);
