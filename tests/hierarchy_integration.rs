//! Integration tests for the transform node hierarchy.
//!
//! Tests are organized by operation group.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test hierarchy_integration
//! ```

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI};

use shardstage::components::transformnode::Pose;
use shardstage::systems::hierarchy::{
    children_of, destroy_node, local_pose, parent_of, set_local_angle, set_local_position,
    set_local_scale, set_parent, set_world_angle, set_world_position, set_world_scale,
    spawn_node, world_pose,
};

const EPSILON: f64 = 1e-9;

fn approx_vec(a: DVec2, b: DVec2) -> bool {
    (a - b).length() < EPSILON
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Every node's world pose must equal its parent's world pose composed with
/// its own local pose.
fn assert_consistent(world: &World, node: Entity) {
    let local = local_pose(world, node).unwrap();
    let actual = world_pose(world, node).unwrap();
    let expected = match parent_of(world, node) {
        Some(parent) => world_pose(world, parent).unwrap().compose(&local),
        None => local,
    };
    assert!(
        actual.approx_eq(&expected, 1e-6),
        "node {:?}: world {:?} != expected {:?}",
        node,
        actual,
        expected
    );
    for child in children_of(world, node) {
        assert_consistent(world, child);
    }
}

// =============================================================================
// Spawning and propagation
// =============================================================================

#[test]
fn root_world_equals_local() {
    let mut world = World::new();
    let pose = Pose::new(DVec2::new(10.0, 20.0), DVec2::splat(2.0), 0.3);
    let root = spawn_node(&mut world, pose, None);
    assert!(world_pose(&world, root).unwrap().approx_eq(&pose, EPSILON));
    assert_eq!(parent_of(&world, root), None);
}

#[test]
fn child_composes_translate_rotate_scale() {
    let mut world = World::new();
    let root = spawn_node(
        &mut world,
        Pose::new(DVec2::new(100.0, 50.0), DVec2::splat(2.0), FRAC_PI_2),
        None,
    );
    let child = spawn_node(&mut world, Pose::from_position(DVec2::new(10.0, 0.0)), Some(root));

    let w = world_pose(&world, child).unwrap();
    // (10, 0) rotated a quarter turn is (0, 10), doubled to (0, 20).
    assert!(approx_vec(w.position, DVec2::new(100.0, 70.0)));
    assert!(approx_vec(w.scale, DVec2::splat(2.0)));
    assert!(approx_eq(w.angle, FRAC_PI_2));
    assert_eq!(children_of(&world, root), vec![child]);
}

#[test]
fn local_changes_reach_grandchildren() {
    let mut world = World::new();
    let root = spawn_node(&mut world, Pose::IDENTITY, None);
    let mid = spawn_node(&mut world, Pose::from_position(DVec2::new(5.0, 0.0)), Some(root));
    let leaf = spawn_node(&mut world, Pose::from_position(DVec2::new(0.0, 5.0)), Some(mid));

    set_local_position(&mut world, root, DVec2::new(100.0, 100.0));
    assert!(approx_vec(world_pose(&world, leaf).unwrap().position, DVec2::new(105.0, 105.0)));

    set_local_scale(&mut world, root, DVec2::splat(3.0));
    assert!(approx_vec(world_pose(&world, leaf).unwrap().position, DVec2::new(115.0, 115.0)));

    set_local_angle(&mut world, mid, PI);
    assert!(approx_vec(world_pose(&world, leaf).unwrap().position, DVec2::new(115.0, 85.0)));
    assert_consistent(&world, root);
}

// =============================================================================
// World setters
// =============================================================================

#[test]
fn set_world_position_back_solves_local() {
    let mut world = World::new();
    let root = spawn_node(
        &mut world,
        Pose::new(DVec2::new(50.0, 0.0), DVec2::splat(2.0), FRAC_PI_2),
        None,
    );
    let child = spawn_node(&mut world, Pose::IDENTITY, Some(root));

    set_world_position(&mut world, child, DVec2::new(50.0, 20.0));
    assert!(approx_vec(world_pose(&world, child).unwrap().position, DVec2::new(50.0, 20.0)));
    // (0, 20) relative to the parent: unrotate a quarter turn and halve.
    assert!(approx_vec(local_pose(&world, child).unwrap().position, DVec2::new(10.0, 0.0)));
    assert_consistent(&world, root);
}

#[test]
fn set_world_scale_and_angle_under_parent() {
    let mut world = World::new();
    let root = spawn_node(&mut world, Pose::new(DVec2::ZERO, DVec2::splat(4.0), 0.5), None);
    let child = spawn_node(&mut world, Pose::IDENTITY, Some(root));

    set_world_scale(&mut world, child, DVec2::new(2.0, 8.0));
    set_world_angle(&mut world, child, 1.5);

    let local = local_pose(&world, child).unwrap();
    assert!(approx_vec(local.scale, DVec2::new(0.5, 2.0)));
    assert!(approx_eq(local.angle, 1.0));
    assert!(approx_eq(world_pose(&world, child).unwrap().angle, 1.5));
}

#[test]
fn set_world_on_root_moves_children() {
    let mut world = World::new();
    let root = spawn_node(&mut world, Pose::IDENTITY, None);
    let child = spawn_node(&mut world, Pose::from_position(DVec2::new(1.0, 1.0)), Some(root));

    set_world_position(&mut world, root, DVec2::new(10.0, 10.0));
    assert!(approx_vec(world_pose(&world, child).unwrap().position, DVec2::new(11.0, 11.0)));
}

// =============================================================================
// Reparenting
// =============================================================================

#[test]
fn reparent_preserves_world_pose() {
    let mut world = World::new();
    let a = spawn_node(
        &mut world,
        Pose::new(DVec2::new(100.0, 0.0), DVec2::splat(2.0), 0.7),
        None,
    );
    let b = spawn_node(
        &mut world,
        Pose::new(DVec2::new(-40.0, 30.0), DVec2::splat(0.5), -1.2),
        None,
    );
    let node = spawn_node(
        &mut world,
        Pose::new(DVec2::new(3.0, 4.0), DVec2::new(1.0, 1.5), 0.2),
        Some(a),
    );
    let before = world_pose(&world, node).unwrap();

    set_parent(&mut world, node, Some(b));

    assert!(world_pose(&world, node).unwrap().approx_eq(&before, 1e-6));
    assert_eq!(parent_of(&world, node), Some(b));
    assert!(children_of(&world, a).is_empty());
    assert_eq!(children_of(&world, b), vec![node]);
    assert_consistent(&world, b);
}

#[test]
fn detach_keeps_world_pose_as_local() {
    let mut world = World::new();
    let root = spawn_node(&mut world, Pose::new(DVec2::new(5.0, 5.0), DVec2::splat(3.0), 0.4), None);
    let child = spawn_node(&mut world, Pose::from_position(DVec2::new(2.0, 0.0)), Some(root));
    let before = world_pose(&world, child).unwrap();

    set_parent(&mut world, child, None);

    assert!(world.get::<ChildOf>(child).is_none());
    assert!(local_pose(&world, child).unwrap().approx_eq(&before, 1e-9));
    assert!(world_pose(&world, child).unwrap().approx_eq(&before, 1e-9));
}

#[test]
fn reparented_subtree_stays_consistent() {
    let mut world = World::new();
    let a = spawn_node(&mut world, Pose::new(DVec2::ZERO, DVec2::splat(2.0), 0.0), None);
    let b = spawn_node(&mut world, Pose::new(DVec2::new(10.0, 10.0), DVec2::ONE, PI), None);
    let node = spawn_node(&mut world, Pose::from_position(DVec2::new(1.0, 0.0)), Some(a));
    let leaf = spawn_node(&mut world, Pose::from_position(DVec2::new(0.0, 1.0)), Some(node));
    let leaf_before = world_pose(&world, leaf).unwrap();

    set_parent(&mut world, node, Some(b));
    assert!(world_pose(&world, leaf).unwrap().approx_eq(&leaf_before, 1e-6));

    set_local_position(&mut world, b, DVec2::new(20.0, 10.0));
    assert!(approx_vec(
        world_pose(&world, leaf).unwrap().position,
        leaf_before.position + DVec2::new(10.0, 0.0)
    ));
    assert_consistent(&world, b);
}

// =============================================================================
// Destruction
// =============================================================================

#[test]
fn destroy_hands_children_to_grandparent() {
    let mut world = World::new();
    let root = spawn_node(&mut world, Pose::from_position(DVec2::new(10.0, 0.0)), None);
    let mid = spawn_node(
        &mut world,
        Pose::new(DVec2::new(5.0, 5.0), DVec2::splat(2.0), 0.3),
        Some(root),
    );
    let c1 = spawn_node(&mut world, Pose::from_position(DVec2::new(1.0, 0.0)), Some(mid));
    let c2 = spawn_node(&mut world, Pose::from_position(DVec2::new(0.0, 1.0)), Some(mid));
    let before = [world_pose(&world, c1).unwrap(), world_pose(&world, c2).unwrap()];

    destroy_node(&mut world, mid);

    assert!(world.get_entity(mid).is_err());
    assert_eq!(parent_of(&world, c1), Some(root));
    assert_eq!(parent_of(&world, c2), Some(root));
    assert_eq!(children_of(&world, root), vec![c1, c2]);
    assert!(world_pose(&world, c1).unwrap().approx_eq(&before[0], 1e-6));
    assert!(world_pose(&world, c2).unwrap().approx_eq(&before[1], 1e-6));
    assert_consistent(&world, root);
}

#[test]
fn destroy_root_leaves_children_as_roots() {
    let mut world = World::new();
    let root = spawn_node(&mut world, Pose::new(DVec2::new(3.0, 3.0), DVec2::splat(2.0), 1.0), None);
    let child = spawn_node(&mut world, Pose::from_position(DVec2::new(1.0, 1.0)), Some(root));
    let before = world_pose(&world, child).unwrap();

    destroy_node(&mut world, root);

    assert_eq!(parent_of(&world, child), None);
    assert!(world_pose(&world, child).unwrap().approx_eq(&before, 1e-9));
    assert!(local_pose(&world, child).unwrap().approx_eq(&before, 1e-9));
}
