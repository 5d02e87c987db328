//! Shardstage library.
//!
//! The geometric core of a puzzle platformer whose stage is assembled from
//! movable, scalable and rotatable pieces. This module exposes the ECS
//! components, resources, systems and events, the plane geometry they are
//! built on, and the [`stage::Stage`] facade a host drives frame by frame.

pub mod components;
pub mod descriptor;
pub mod events;
pub mod geometry;
pub mod resources;
pub mod stage;
pub mod systems;
