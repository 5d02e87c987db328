//! Stage systems.
//!
//! Submodules overview
//! - [`composer`] – fuse tile shapes into piece hitboxes and the stage ground
//! - [`ending`] – camera sequences for clear and game over
//! - [`hierarchy`] – transform node operations keeping world poses consistent
//! - [`input`] – turn the host's raw input into [`crate::resources::input::InputState`]
//! - [`piece`] – select, move, scale and rotate pieces with the mouse
//! - [`player`] – player controls, collision sweep and round checks
//! - [`render`] – extract an ordered draw list
//! - [`resolver`] – sweep-and-slide collision of a circle against ground rings
//! - [`stagemode`] – mode switching, gimmick attachment and activation
//! - [`time`] – update simulation time and delta

pub mod composer;
pub mod ending;
pub mod hierarchy;
pub mod input;
pub mod piece;
pub mod player;
pub mod render;
pub mod resolver;
pub mod stagemode;
pub mod time;
