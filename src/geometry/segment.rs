//! Segment and vector routines shared by the resolver and the overlap tests.

use glam::DVec2;

/// Tolerance applied to both fractional parameters of [`segment_intersect`].
///
/// Lets a ray that ends exactly on a ground vertex still register.
pub const INTERSECT_EPSILON: f64 = 0.001;

/// Intersection of segment `p1→p2` with segment `q1→q2`.
///
/// Returns the fraction `t` along `p1→p2` and the intersection point.
/// Parallel (or collinear) segments report no intersection.
pub fn segment_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> Option<(f64, DVec2)> {
    let v = q1 - p1;
    let d1 = p2 - p1;
    let d2 = q2 - q1;

    let crs = d1.perp_dot(d2);
    if crs == 0.0 {
        return None;
    }

    let t1 = v.perp_dot(d2) / crs;
    let t2 = v.perp_dot(d1) / crs;

    if t1 + INTERSECT_EPSILON < 0.0
        || t1 - INTERSECT_EPSILON > 1.0
        || t2 + INTERSECT_EPSILON < 0.0
        || t2 - INTERSECT_EPSILON > 1.0
    {
        return None;
    }

    Some((t1, p1 + d1 * t1))
}

/// Distance from `p` to the segment `a→b` and the nearest point on it.
///
/// When the projection of `p` falls outside the segment the matching
/// endpoint is returned. A zero-length segment behaves like the point `a`.
pub fn point_to_segment_distance(a: DVec2, b: DVec2, p: DVec2) -> (f64, DVec2) {
    let ab = b - a;

    if (p - a).dot(ab) < 0.0 {
        return (p.distance(a), a);
    }
    if (p - b).dot(a - b) < 0.0 {
        return (p.distance(b), b);
    }

    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (p.distance(a), a);
    }

    let nearest = a + ab * ((p - a).dot(ab) / len_sq);
    (p.distance(nearest), nearest)
}

/// Tangential part of `v` after removing its component along `normal`.
pub fn wall_scratch(v: DVec2, normal: DVec2) -> DVec2 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}

/// Outward normal of a ring edge `a→b`.
///
/// Rings are stored so that solid material lies on the right of travel in
/// y-down space, which puts `(dy, -dx)` on the empty side.
pub fn outward_normal(a: DVec2, b: DVec2) -> Option<DVec2> {
    let d = b - a;
    DVec2::new(d.y, -d.x).try_normalize()
}

/// Extend `a→b` by `amount` past both endpoints.
pub fn stretch_segment(a: DVec2, b: DVec2, amount: f64) -> (DVec2, DVec2) {
    let dir = (b - a).normalize_or_zero();
    (a - dir * amount, b + dir * amount)
}

/// Unsigned angle between two vectors, in radians.
///
/// The cosine is clamped before `acos` so rounding never produces `NaN`;
/// a zero vector yields an angle of zero.
pub fn angle_between(a: DVec2, b: DVec2) -> f64 {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}
