//! Transform hierarchy operations.
//!
//! Keeps every [`TransformNode`]'s cached world pose equal to its parent's
//! world pose composed with its own local pose. Linkage uses the ECS
//! [`ChildOf`] / [`Children`] relationship, so a node never owns its parent
//! or its children; the owning game object is the entity itself.
//!
//! Every mutation here recomputes the touched node and walks its descendants
//! depth first, so reads straight after a call already see consistent world
//! poses. There is no deferred propagation pass.
//!
//! Cycles are not detected: callers must not parent a node under one of its
//! own descendants.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::DVec2;
use log::warn;

use crate::components::transformnode::{Pose, TransformNode};

/// Spawn a node with `local` pose, optionally attached under `parent`.
///
/// The world pose is computed immediately. Returns the new entity so callers
/// can insert their own components next to the node.
pub fn spawn_node(world: &mut World, local: Pose, parent: Option<Entity>) -> Entity {
    let node = world.spawn(TransformNode::new(local)).id();
    if let Some(parent) = parent {
        if world.get::<TransformNode>(parent).is_some() {
            world.entity_mut(node).insert(ChildOf(parent));
            world.flush();
        } else {
            warn!("spawn_node: parent {:?} has no TransformNode, spawning as root", parent);
        }
    }
    propagate(world, node);
    node
}

pub fn parent_of(world: &World, node: Entity) -> Option<Entity> {
    world.get::<ChildOf>(node).map(|c| c.parent())
}

/// Children of `node` in attachment order.
pub fn children_of(world: &World, node: Entity) -> Vec<Entity> {
    world
        .get::<Children>(node)
        .map(|c| c.to_vec())
        .unwrap_or_default()
}

pub fn local_pose(world: &World, node: Entity) -> Option<Pose> {
    world.get::<TransformNode>(node).map(|t| t.local)
}

pub fn world_pose(world: &World, node: Entity) -> Option<Pose> {
    world.get::<TransformNode>(node).map(|t| t.world)
}

fn parent_world_pose(world: &World, node: Entity) -> Option<Pose> {
    parent_of(world, node).and_then(|p| world_pose(world, p))
}

/// Recompute `node`'s world pose from its parent, then every descendant.
pub fn propagate(world: &mut World, node: Entity) {
    let parent_world = parent_world_pose(world, node);
    {
        let Some(mut t) = world.get_mut::<TransformNode>(node) else {
            return;
        };
        t.world = match parent_world {
            Some(pw) => pw.compose(&t.local),
            None => t.local,
        };
    }
    for child in children_of(world, node) {
        propagate(world, child);
    }
}

/// Attach `node` under `parent`, or detach it with `None`.
///
/// The node's world pose is kept: its local pose is back-solved from the new
/// parent's world pose. The node is appended to the end of the new parent's
/// child list.
pub fn set_parent(world: &mut World, node: Entity, parent: Option<Entity>) {
    let Some(current_world) = world_pose(world, node) else {
        warn!("set_parent: {:?} is not a transform node", node);
        return;
    };

    let local = match parent {
        Some(parent) => {
            let Some(parent_world) = world_pose(world, parent) else {
                warn!("set_parent: parent {:?} is not a transform node", parent);
                return;
            };
            world.entity_mut(node).insert(ChildOf(parent));
            parent_world.relative(&current_world)
        }
        None => {
            world.entity_mut(node).remove::<ChildOf>();
            current_world
        }
    };
    world.flush();

    if let Some(mut t) = world.get_mut::<TransformNode>(node) {
        t.local = local;
    }
    propagate(world, node);
}

/// Despawn `node`, handing its children to its former parent.
///
/// Children keep their world pose; with no grandparent they become roots.
pub fn destroy_node(world: &mut World, node: Entity) {
    let parent = parent_of(world, node);
    for child in children_of(world, node) {
        set_parent(world, child, parent);
    }
    world.despawn(node);
}

fn modify_local(world: &mut World, node: Entity, f: impl FnOnce(&mut Pose)) {
    {
        let Some(mut t) = world.get_mut::<TransformNode>(node) else {
            return;
        };
        f(&mut t.local);
    }
    propagate(world, node);
}

fn modify_world(world: &mut World, node: Entity, f: impl FnOnce(&mut Pose)) {
    let parent_world = parent_world_pose(world, node);
    {
        let Some(mut t) = world.get_mut::<TransformNode>(node) else {
            return;
        };
        let mut target = t.world;
        f(&mut target);
        t.local = match parent_world {
            Some(pw) => pw.relative(&target),
            None => target,
        };
    }
    propagate(world, node);
}

pub fn set_local_position(world: &mut World, node: Entity, position: DVec2) {
    modify_local(world, node, |l| l.position = position);
}

pub fn set_local_scale(world: &mut World, node: Entity, scale: DVec2) {
    modify_local(world, node, |l| l.scale = scale);
}

pub fn set_local_angle(world: &mut World, node: Entity, angle: f64) {
    modify_local(world, node, |l| l.angle = angle);
}

pub fn set_world_position(world: &mut World, node: Entity, position: DVec2) {
    modify_world(world, node, |w| w.position = position);
}

pub fn set_world_scale(world: &mut World, node: Entity, scale: DVec2) {
    modify_world(world, node, |w| w.scale = scale);
}

pub fn set_world_angle(world: &mut World, node: Entity, angle: f64) {
    modify_world(world, node, |w| w.angle = angle);
}
