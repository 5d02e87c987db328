//! Circles and oriented rectangles.
//!
//! Gimmicks collide as [`Circle`]s; piece footprints, gimmick bodies and the
//! playable bounds are [`Quad`]s (rectangles rotated about their centre).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::polygon::Polygon;

/// Circular collision proxy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Grow (or shrink, with a negative `amount`) the radius, never below zero.
    pub fn stretched(&self, amount: f64) -> Self {
        Self {
            center: self.center,
            radius: (self.radius + amount).max(0.0),
        }
    }

    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

/// Rectangle of `half_extents` rotated by `angle` radians about `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub center: DVec2,
    pub half_extents: DVec2,
    pub angle: f64,
}

impl Quad {
    /// Rectangle of full `size` centred on `center`, rotated about it.
    pub fn from_center(center: DVec2, size: DVec2, angle: f64) -> Self {
        Self {
            center,
            half_extents: size.abs() * 0.5,
            angle,
        }
    }

    /// Axis-aligned rectangle with its top-left corner at `min`.
    pub fn from_min_size(min: DVec2, size: DVec2) -> Self {
        Self::from_center(min + size * 0.5, size, 0.0)
    }

    pub fn size(&self) -> DVec2 {
        self.half_extents * 2.0
    }

    /// Move every side outward by `amount` (inward when negative).
    pub fn stretched(&self, amount: f64) -> Self {
        Self {
            center: self.center,
            half_extents: (self.half_extents + DVec2::splat(amount)).max(DVec2::ZERO),
            angle: self.angle,
        }
    }

    /// Corners in ring order: top-left, top-right, bottom-right, bottom-left
    /// before rotation.
    pub fn corners(&self) -> [DVec2; 4] {
        let rot = DVec2::from_angle(self.angle);
        let h = self.half_extents;
        [
            DVec2::new(-h.x, -h.y),
            DVec2::new(h.x, -h.y),
            DVec2::new(h.x, h.y),
            DVec2::new(-h.x, h.y),
        ]
        .map(|c| self.center + rot.rotate(c))
    }

    fn to_local(&self, p: DVec2) -> DVec2 {
        DVec2::from_angle(-self.angle).rotate(p - self.center)
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let local = self.to_local(p);
        local.x.abs() <= self.half_extents.x && local.y.abs() <= self.half_extents.y
    }

    /// True when the circle overlaps the rectangle's area.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let local = self.to_local(circle.center);
        let clamped = local.clamp(-self.half_extents, self.half_extents);
        local.distance_squared(clamped) <= circle.radius * circle.radius
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn stretched_circle_never_goes_negative() {
        let c = Circle::new(DVec2::ZERO, 0.5);
        assert_eq!(c.stretched(-1.0).radius, 0.0);
        assert_eq!(c.stretched(1.0).radius, 1.5);
    }

    #[test]
    fn rotated_quad_contains_its_center_and_not_its_old_corner() {
        let q = Quad::from_center(DVec2::new(10.0, 10.0), DVec2::new(4.0, 4.0), FRAC_PI_4);
        assert!(q.contains(DVec2::new(10.0, 10.0)));
        // Unrotated corner region is cut off by the 45 degree turn.
        assert!(!q.contains(DVec2::new(11.9, 11.9)));
        assert!(q.contains(DVec2::new(12.5, 10.0)));
    }

    #[test]
    fn quad_circle_overlap_includes_edges_and_containment() {
        let q = Quad::from_min_size(DVec2::ZERO, DVec2::new(10.0, 4.0));
        assert!(q.intersects_circle(&Circle::new(DVec2::new(5.0, 2.0), 0.1)));
        assert!(q.intersects_circle(&Circle::new(DVec2::new(5.0, -0.9), 1.0)));
        assert!(!q.intersects_circle(&Circle::new(DVec2::new(5.0, -1.1), 1.0)));
        assert!(q.intersects_circle(&Circle::new(DVec2::new(5.0, 2.0), 50.0)));
    }

    #[test]
    fn quad_polygon_has_positive_orientation() {
        let q = Quad::from_center(DVec2::ZERO, DVec2::new(2.0, 6.0), 0.3);
        let poly = q.to_polygon();
        assert!((poly.area() - 12.0).abs() < 1e-9);
        assert_eq!(poly.outer.len(), 4);
    }

    #[test]
    fn stretch_moves_every_side() {
        let q = Quad::from_min_size(DVec2::ZERO, DVec2::new(4.0, 2.0)).stretched(1.0);
        assert_eq!(q.size(), DVec2::new(6.0, 4.0));
        let shrunk = q.stretched(-5.0);
        assert_eq!(shrunk.size(), DVec2::ZERO);
    }
}
