//! Tile component.
//!
//! A tile is a child node of its piece. Its node's local scale is the tile
//! size, so its collision shape is defined on the unit cell and mapped
//! through the local pose into piece space.

use bevy_ecs::prelude::*;
use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::components::transformnode::TransformNode;
use crate::geometry::Polygon;

/// Collision shape of a tile on the unit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileShape {
    #[default]
    Square,
    /// Right triangle filling the lower-right half of the cell.
    Triangle,
}

impl TileShape {
    pub fn unit_polygon(self) -> Polygon {
        match self {
            TileShape::Square => Polygon::new(vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ]),
            TileShape::Triangle => Polygon::new(vec![
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ]),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub shape: TileShape,
    /// Cell of the tile atlas used when drawing.
    pub uv: IVec2,
}

impl Tile {
    /// Collision shape in the parent piece's space.
    ///
    /// The unit shape rotates about the cell origin (the tile's top-left
    /// corner), not its centre.
    pub fn local_hitbox(&self, node: &TransformNode) -> Polygon {
        self.shape.unit_polygon().transformed(node.local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transformnode::Pose;

    #[test]
    fn square_tile_covers_its_cell() {
        let tile = Tile {
            shape: TileShape::Square,
            uv: IVec2::ZERO,
        };
        let node = TransformNode::new(Pose::new(DVec2::new(60.0, 30.0), DVec2::splat(30.0), 0.0));
        let hitbox = tile.local_hitbox(&node);
        assert!((hitbox.area() - 900.0).abs() < 1e-9);
        assert!(hitbox.contains_point(DVec2::new(75.0, 45.0)));
    }

    #[test]
    fn triangle_is_half_a_cell() {
        assert!((TileShape::Triangle.unit_polygon().area() - 0.5).abs() < 1e-12);
    }
}
