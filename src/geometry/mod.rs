//! Plane geometry used by hitbox composition and the collision resolver.
//!
//! Everything here works in y-down screen space with `f64` vectors from
//! [`glam`]. Routines are total: degenerate input produces empty or `None`
//! results instead of errors.
//!
//! Submodules:
//! - [`polygon`] – polygons with holes, orientation and vertex simplification
//! - [`boolean`] – union and subtraction built on `i_overlay`
//! - [`segment`] – segment intersection, point/segment distance, slide vectors
//! - [`shapes`] – circles and oriented rectangles used for overlap tests
pub mod boolean;
pub mod polygon;
pub mod segment;
pub mod shapes;

pub use boolean::{subtract, union};
pub use polygon::{Polygon, Ring};
pub use segment::{point_to_segment_distance, segment_intersect};
pub use shapes::{Circle, Quad};
