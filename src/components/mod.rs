//! ECS components for stage entities.
//!
//! Every stage object is an entity carrying a
//! [`TransformNode`](transformnode::TransformNode); the other components
//! say what kind of object it is.
//!
//! Submodules overview:
//! - [`gimmick`] – players and goals with their body and collision circle
//! - [`player`] – direction vectors, speed and ground state of a player
//! - [`stagepiece`] – a movable piece of the stage with its tiles and hitboxes
//! - [`tile`] – one tile's collision shape and atlas cell
//! - [`transformnode`] – local and cached world pose of a hierarchy node
//! - [`zindex`] – draw order of pieces

pub mod gimmick;
pub mod player;
pub mod stagepiece;
pub mod tile;
pub mod transformnode;
pub mod zindex;
