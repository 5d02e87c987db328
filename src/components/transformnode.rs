//! Hierarchical 2D pose.
//!
//! Every stage object (the stage root, pieces, tiles and gimmicks) carries a
//! [`TransformNode`]. Parent/child linkage lives in the ECS relationship
//! components [`ChildOf`](bevy_ecs::hierarchy::ChildOf) and
//! [`Children`](bevy_ecs::hierarchy::Children); the node itself only stores
//! its local pose and the cached world pose. The operations that keep the two
//! consistent are in [`crate::systems::hierarchy`].

use bevy_ecs::prelude::*;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Position, per-axis scale and rotation (radians).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec2,
    pub scale: DVec2,
    pub angle: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: DVec2::ZERO,
        scale: DVec2::ONE,
        angle: 0.0,
    };

    pub fn new(position: DVec2, scale: DVec2, angle: f64) -> Self {
        Self {
            position,
            scale,
            angle,
        }
    }

    pub fn from_position(position: DVec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Map a point from this pose's space: rotate, scale, then translate.
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        self.position + DVec2::from_angle(self.angle).rotate(p) * self.scale
    }

    /// Inverse of [`transform_point`](Self::transform_point).
    pub fn inverse_transform_point(&self, p: DVec2) -> DVec2 {
        DVec2::from_angle(-self.angle).rotate((p - self.position) / self.scale)
    }

    /// World pose of a child with `local` pose under a parent whose world
    /// pose is `self`.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            scale: self.scale * local.scale,
            angle: self.angle + local.angle,
        }
    }

    /// Local pose that yields `world` under a parent whose world pose is
    /// `self`. The parent scale must be non-zero on both axes.
    pub fn relative(&self, world: &Pose) -> Pose {
        Pose {
            position: self.inverse_transform_point(world.position),
            scale: world.scale / self.scale,
            angle: world.angle - self.angle,
        }
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Pose, epsilon: f64) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            && (self.angle - other.angle).abs() <= epsilon
    }
}

/// Local pose plus the cached world pose.
///
/// `world == parent.world.compose(local)` for a node with a parent, and
/// `world == local` otherwise. Mutate through the hierarchy functions so the
/// cache and the descendants stay in sync.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformNode {
    pub(crate) local: Pose,
    pub(crate) world: Pose,
}

impl TransformNode {
    /// Parentless node: world equals local.
    pub fn new(local: Pose) -> Self {
        Self {
            local,
            world: local,
        }
    }

    pub fn local(&self) -> &Pose {
        &self.local
    }
    pub fn world(&self) -> &Pose {
        &self.world
    }
    pub fn local_position(&self) -> DVec2 {
        self.local.position
    }
    pub fn local_scale(&self) -> DVec2 {
        self.local.scale
    }
    pub fn local_angle(&self) -> f64 {
        self.local.angle
    }
    pub fn world_position(&self) -> DVec2 {
        self.world.position
    }
    pub fn world_scale(&self) -> DVec2 {
        self.world.scale
    }
    pub fn world_angle(&self) -> f64 {
        self.world.angle
    }
}
