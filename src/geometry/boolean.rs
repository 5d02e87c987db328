//! Polygon boolean operations.
//!
//! Thin adapter over `i_overlay`: polygons go in as contour lists (outer ring
//! first, then holes) and every resulting shape comes back as a [`Polygon`]
//! with orientation restored. Even-odd filling is used so the orientation of
//! the input rings does not matter.

use glam::DVec2;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use super::polygon::Polygon;

fn to_contours(polygon: &Polygon) -> Vec<Vec<[f64; 2]>> {
    polygon
        .rings()
        .filter(|ring| ring.len() >= 3)
        .map(|ring| ring.iter().map(|p| [p.x, p.y]).collect())
        .collect()
}

fn from_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Polygon> {
    shapes
        .into_iter()
        .filter_map(|shape| {
            let mut rings = shape
                .into_iter()
                .filter(|contour| contour.len() >= 3)
                .map(|contour| contour.into_iter().map(|[x, y]| DVec2::new(x, y)).collect());
            let outer = rings.next()?;
            Some(Polygon::with_holes(outer, rings.collect()))
        })
        .collect()
}

fn overlay(a: &Polygon, b: &Polygon, rule: OverlayRule) -> Vec<Polygon> {
    let subject = to_contours(a);
    let clip = to_contours(b);

    if subject.is_empty() {
        return match rule {
            OverlayRule::Union if !clip.is_empty() => vec![b.clone()],
            _ => Vec::new(),
        };
    }
    if clip.is_empty() {
        return vec![a.clone()];
    }

    let shapes = subject.overlay(&clip, rule, FillRule::EvenOdd);
    from_shapes(shapes)
}

/// Union of two polygons: zero, one or several resulting polygons.
///
/// Callers treat the pair as fused only when exactly one polygon comes back.
pub fn union(a: &Polygon, b: &Polygon) -> Vec<Polygon> {
    overlay(a, b, OverlayRule::Union)
}

/// `a` with `b` cut away.
pub fn subtract(a: &Polygon, b: &Polygon) -> Vec<Polygon> {
    overlay(a, b, OverlayRule::Difference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(min: DVec2, size: DVec2) -> Polygon {
        Polygon::new(vec![
            min,
            min + DVec2::new(size.x, 0.0),
            min + size,
            min + DVec2::new(0.0, size.y),
        ])
    }

    #[test]
    fn union_with_itself_is_congruent() {
        let p = Polygon::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 4.0),
        ]);
        let fused = union(&p, &p);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].area() - p.area()).abs() < 1e-6);
        assert_eq!(fused[0].outer.len(), p.outer.len());
        for v in &p.outer {
            assert!(fused[0].outer.iter().any(|w| w.distance(*v) < 1e-6));
        }
    }

    #[test]
    fn adjacent_squares_fuse_into_one() {
        let a = rect(DVec2::ZERO, DVec2::ONE);
        let b = rect(DVec2::new(1.0, 0.0), DVec2::ONE);
        let fused = union(&a, &b);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].area() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_union_stays_separate() {
        let a = rect(DVec2::ZERO, DVec2::ONE);
        let b = rect(DVec2::new(3.0, 0.0), DVec2::ONE);
        assert_eq!(union(&a, &b).len(), 2);
    }

    #[test]
    fn subtract_cuts_and_can_split() {
        let long = rect(DVec2::ZERO, DVec2::new(9.0, 1.0));
        let middle = rect(DVec2::new(3.0, -1.0), DVec2::new(3.0, 3.0));
        let parts = subtract(&long, &middle);
        assert_eq!(parts.len(), 2);
        let total: f64 = parts.iter().map(Polygon::area).sum();
        assert!((total - 6.0).abs() < 1e-6);

        let everything = rect(DVec2::splat(-5.0), DVec2::splat(20.0));
        assert!(subtract(&long, &everything).is_empty());
    }

    #[test]
    fn subtract_inside_leaves_a_hole() {
        let outer = rect(DVec2::ZERO, DVec2::splat(6.0));
        let inner = rect(DVec2::splat(2.0), DVec2::splat(2.0));
        let parts = subtract(&outer, &inner);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].holes.len(), 1);
        assert!((parts[0].area() - 32.0).abs() < 1e-6);
    }
}
