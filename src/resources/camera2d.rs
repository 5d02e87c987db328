//! Shared 2D camera resource.
//!
//! The stage does not render, but it does animate the view: the clear
//! sequence zooms onto the player and the game-over sequence shakes. Hosts
//! read this resource (or the copy in a draw list) to set up their own
//! camera.

use bevy_ecs::prelude::Resource;
use glam::DVec2;

/// World point shown at the centre of the view, and the zoom factor.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StageCamera {
    pub target: DVec2,
    pub zoom: f64,
}

impl StageCamera {
    pub fn new(target: DVec2) -> Self {
        Self { target, zoom: 1.0 }
    }
}

impl Default for StageCamera {
    fn default() -> Self {
        Self::new(DVec2::ZERO)
    }
}
