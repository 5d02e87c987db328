//! Playable area resource.
//!
//! The stage is laid out on a fixed-size area with the stage root at its
//! centre. A player whose collision circle leaves this rectangle has fallen
//! out of the stage.

use bevy_ecs::prelude::Resource;
use glam::DVec2;

use crate::geometry::Quad;

/// Playable area size in world units.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ScreenSize {
    /// Width in world units.
    pub w: f64,
    /// Height in world units.
    pub h: f64,
}

impl ScreenSize {
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.w, self.h) * 0.5
    }

    /// Bounds with the top-left corner at the origin.
    pub fn bounds(&self) -> Quad {
        Quad::from_min_size(DVec2::ZERO, DVec2::new(self.w, self.h))
    }
}
