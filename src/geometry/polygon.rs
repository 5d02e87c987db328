//! Polygons with holes.
//!
//! A [`Polygon`] is an outer [`Ring`] plus zero or more hole rings, each
//! implicitly closed. Rings are kept in a fixed orientation: the outer ring
//! has a positive shoelace area (clockwise on a y-down screen) and holes a
//! negative one, so [`outward_normal`](super::segment::outward_normal) on any
//! edge points away from solid material.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::segment::point_to_segment_distance;
use super::shapes::Circle;
use crate::components::transformnode::Pose;

/// Ordered vertex loop; the last vertex connects back to the first.
pub type Ring = Vec<DVec2>;

/// Shoelace signed area of a ring.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let n = ring.len();
    let twice: f64 = (0..n).map(|i| ring[i].perp_dot(ring[(i + 1) % n])).sum();
    twice * 0.5
}

/// Iterate the edges `(a, b)` of a closed ring.
pub fn ring_edges(ring: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Polygon without holes; the ring is re-oriented if needed.
    pub fn new(outer: Ring) -> Self {
        Self::with_holes(outer, Vec::new())
    }

    pub fn with_holes(outer: Ring, holes: Vec<Ring>) -> Self {
        let mut polygon = Self { outer, holes };
        polygon.normalize_orientation();
        polygon
    }

    pub fn normalize_orientation(&mut self) {
        if signed_area(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        for hole in &mut self.holes {
            if signed_area(hole) > 0.0 {
                hole.reverse();
            }
        }
    }

    /// Enclosed area (outer minus holes).
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.outer).abs() - holes
    }

    /// Outer ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Apply `f` to every vertex; orientation is restored afterwards since a
    /// mirrored mapping flips it.
    pub fn map_points(&self, f: impl Fn(DVec2) -> DVec2) -> Self {
        Self::with_holes(
            self.outer.iter().copied().map(&f).collect(),
            self.holes
                .iter()
                .map(|h| h.iter().copied().map(&f).collect())
                .collect(),
        )
    }

    pub fn rotated(&self, angle: f64) -> Self {
        let rot = DVec2::from_angle(angle);
        self.map_points(|p| rot.rotate(p))
    }

    pub fn scaled(&self, scale: DVec2) -> Self {
        self.map_points(|p| p * scale)
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Rotate, scale, then translate by `pose`, the same order a transform
    /// node composes a child's position.
    pub fn transformed(&self, pose: &Pose) -> Self {
        self.map_points(|p| pose.transform_point(p))
    }

    /// Even-odd point containment over all rings.
    pub fn contains_point(&self, p: DVec2) -> bool {
        let mut inside = false;
        for ring in self.rings() {
            for (a, b) in ring_edges(ring) {
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if p.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    /// True when the circle overlaps solid area (touching an edge counts).
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        if self.outer.len() < 3 {
            return false;
        }
        if self.contains_point(circle.center) {
            return true;
        }
        self.rings().any(|ring| {
            ring_edges(ring)
                .any(|(a, b)| point_to_segment_distance(a, b, circle.center).0 <= circle.radius)
        })
    }

    /// Remove redundant vertices from every ring.
    ///
    /// A vertex goes when it lies closer than `point_eps` to its successor or
    /// within `line_eps` of the segment joining its neighbours. Passes repeat
    /// until one removes nothing. Holes that fall under three vertices are
    /// dropped; returns `false` when the outer ring does, in which case the
    /// polygon should be discarded.
    pub fn simplify(&mut self, point_eps: f64, line_eps: f64) -> bool {
        simplify_ring(&mut self.outer, point_eps, line_eps);
        if self.outer.len() < 3 {
            self.outer.clear();
            self.holes.clear();
            return false;
        }
        for hole in &mut self.holes {
            simplify_ring(hole, point_eps, line_eps);
        }
        self.holes.retain(|h| h.len() >= 3);
        true
    }
}

fn simplify_ring(ring: &mut Ring, point_eps: f64, line_eps: f64) {
    loop {
        let mut removed = false;
        let mut i = 0;
        while i < ring.len() && ring.len() >= 3 {
            let n = ring.len();
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];

            let near_point = cur.distance(next) < point_eps;
            let near_line = point_to_segment_distance(prev, next, cur).0 < line_eps;

            if near_point || near_line {
                ring.remove(i);
                removed = true;
            } else {
                i += 1;
            }
        }
        if !removed || ring.len() < 3 {
            break;
        }
    }
}

/// Simplify every polygon in `set`, discarding the ones that collapse.
pub fn simplify_all(set: &mut Vec<Polygon>, point_eps: f64, line_eps: f64) {
    set.retain_mut(|p| p.simplify(point_eps, line_eps));
}
