//! Sweep-and-slide collision resolver.
//!
//! Moves a circular body along its velocity through ground rings, sliding
//! along whatever it hits, for at most [`MAX_PASSES`] passes per update.
//!
//! Each pass:
//! 1. casts the body's leading point (centre minus radius along each edge
//!    normal) against every edge facing the motion, edges stretched by the
//!    radius so corners are covered, and keeps the nearest hit;
//! 2. notes every gimmick circle the centre path touches before that hit;
//! 3. moves up to the hit and, if there was one, keeps only the tangential
//!    remainder of the velocity;
//! 4. zeroes the speed component the contact cancels (ground, wall or
//!    ceiling, judged against the body's "down").
//!
//! When two consecutive contacts face more than 90° apart (an inside
//! corner) the remainder is flipped once, and not again until a pass sees a
//! contact that does not diverge. This keeps bodies from jittering between
//! two walls; it is a tuned heuristic, kept as is.
//!
//! The resolver is a pure function of its inputs; applying the result to the
//! world is the caller's job.

use glam::DVec2;
use log::trace;
use smallvec::SmallVec;

use crate::geometry::polygon::ring_edges;
use crate::geometry::segment::{
    angle_between, outward_normal, point_to_segment_distance, segment_intersect, stretch_segment,
    wall_scratch,
};
use crate::geometry::Circle;

/// Upper bound on slide passes per update.
pub const MAX_PASSES: usize = 10;

const GROUND_ANGLE: f64 = 140.0 * std::f64::consts::PI / 180.0;
const WALL_ANGLE: f64 = 70.0 * std::f64::consts::PI / 180.0;
const REVERSE_ANGLE: f64 = std::f64::consts::FRAC_PI_2;

/// The moving body, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepBody {
    pub center: DVec2,
    pub radius: f64,
    pub down: DVec2,
    pub right: DVec2,
    /// `x` along `right`, `y` along `down`.
    pub speed: DVec2,
    pub grounded: bool,
}

impl SweepBody {
    pub fn velocity(&self) -> DVec2 {
        self.down * self.speed.y + self.right * self.speed.x
    }
}

/// How a contact was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Ground,
    Wall,
    Ceiling,
}

/// What happened during one [`sweep`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub passes: usize,
    pub contacts: SmallVec<[Contact; 4]>,
    /// Indices into the proxy slice, first touch first.
    pub touched: SmallVec<[usize; 4]>,
    /// Passes (1-based) that ended by flipping the remaining velocity.
    pub reversed_passes: SmallVec<[usize; 4]>,
    /// Total displacement applied to the body.
    pub displacement: DVec2,
}

struct Hit {
    travel: DVec2,
    distance: f64,
    normal: DVec2,
}

fn nearest_ground_hit(body: &SweepBody, velocity: DVec2, ground: &[Vec<DVec2>]) -> Option<Hit> {
    let speed_right = velocity.perp();
    let mut best: Option<Hit> = None;
    let mut max_distance = velocity.length();

    for ring in ground {
        if ring.len() < 2 {
            continue;
        }
        for (a, b) in ring_edges(ring) {
            let Some(normal) = outward_normal(a, b) else {
                continue;
            };
            if speed_right.perp_dot(normal) < 0.0 {
                continue;
            }

            let start = body.center - normal * body.radius;
            let (sa, sb) = stretch_segment(a, b, body.radius);
            let Some((t, _)) = segment_intersect(start, start + velocity, sa, sb) else {
                continue;
            };

            let travel = velocity * t.clamp(0.0, 1.0);
            let distance = travel.length();
            if distance >= max_distance {
                continue;
            }
            max_distance = distance;
            best = Some(Hit {
                travel,
                distance,
                normal,
            });
        }
    }
    best
}

fn classify(down: DVec2, normal: DVec2) -> Contact {
    let theta = angle_between(down, normal);
    if theta > GROUND_ANGLE {
        Contact::Ground
    } else if theta > WALL_ANGLE {
        Contact::Wall
    } else {
        Contact::Ceiling
    }
}

/// Move `body` through `ground` for one update.
///
/// `ground` holds closed rings (outer rings and holes alike) oriented so
/// their outward normals face empty space; a two-point ring is a segment
/// that blocks from both sides. `proxies` are gimmick circles the body may touch.
pub fn sweep(body: &mut SweepBody, ground: &[Vec<DVec2>], proxies: &[Circle]) -> SweepReport {
    let mut report = SweepReport::default();
    let mut velocity = body.velocity();

    if velocity == DVec2::ZERO {
        body.grounded = false;
        return report;
    }

    body.grounded = false;
    let mut reversed = false;
    let mut prev_normal: Option<DVec2> = None;

    while report.passes < MAX_PASSES {
        report.passes += 1;

        let hit = nearest_ground_hit(body, velocity, ground);
        let reach = hit.as_ref().map_or(velocity.length(), |h| h.distance);

        let path_end = body.center + velocity;
        for (i, proxy) in proxies.iter().enumerate() {
            let (distance, nearest) = point_to_segment_distance(body.center, path_end, proxy.center);
            if distance < body.radius + proxy.radius
                && (nearest - body.center).length() <= reach
                && !report.touched.contains(&i)
            {
                report.touched.push(i);
            }
        }

        let travel = hit.as_ref().map_or(velocity, |h| h.travel);
        body.center += travel;
        report.displacement += travel;

        let Some(hit) = hit else {
            break;
        };

        velocity = wall_scratch(velocity - travel, -hit.normal);

        let contact = classify(body.down, hit.normal);
        match contact {
            Contact::Ground => {
                body.grounded = true;
                body.speed.y = 0.0;
            }
            Contact::Wall => body.speed.x = 0.0,
            Contact::Ceiling => body.speed.y = 0.0,
        }
        report.contacts.push(contact);
        trace!(
            "sweep pass {}: {:?} normal={:?} rest={:?}",
            report.passes, contact, hit.normal, velocity
        );

        if velocity == DVec2::ZERO {
            break;
        }

        if let Some(prev) = prev_normal {
            if angle_between(prev, hit.normal) > REVERSE_ANGLE {
                if !reversed {
                    reversed = true;
                    velocity = -velocity;
                    report.reversed_passes.push(report.passes);
                }
            } else {
                reversed = false;
            }
        }
        prev_normal = Some(hit.normal);
    }

    report
}
