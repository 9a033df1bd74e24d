//! Convex quadrilateral overlap.
//!
//! The overlap metric is a containment ratio: the fraction of the *target*
//! quad's area that lies inside the *roi* quad. It is not symmetric and is not
//! an intersection-over-union.
//!
//! Clip boundaries must be wound clockwise in image coordinates (y down),
//! which is the order produced by [`Rect::corners`](crate::Rect::corners).
//! Reversed winding is not detected and yields a wrong (usually empty) clip.

use crate::types::{all_finite, Point2D, Quad};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Containment ratio above which two regions are considered the same target.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.8;

/// Quads with less area than this are treated as degenerate.
const MIN_AREA: f64 = 1e-9;

/// Cross products with magnitude at or below this are "on the edge".
const EDGE_EPS: f64 = 1e-9;

/// z-component of `(b - a) × (p - a)`.
#[inline]
fn edge_cross(a: &Point2D, b: &Point2D, p: &Point2D) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Shoelace area (absolute). Zero for fewer than 3 points.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (p, q) = (&points[i], &points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Intersection of segment `p1 → p2` with the infinite line through `c1 → c2`.
///
/// Nearly parallel lines fall back to the segment midpoint.
fn line_intersection(p1: &Point2D, p2: &Point2D, c1: &Point2D, c2: &Point2D) -> Point2D {
    let d1 = p2 - p1;
    let d2 = c2 - c1;
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < EDGE_EPS {
        return Point2::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
    }
    let t = ((c1.x - p1.x) * d2.y - (c1.y - p1.y) * d2.x) / denom;
    p1 + d1 * t
}

/// Sutherland-Hodgman: the part of `subject` inside the convex `boundary`.
///
/// Returns an empty polygon as soon as one boundary edge rejects everything.
pub fn clip_convex(subject: &Quad, boundary: &Quad) -> Vec<Point2D> {
    let mut poly: Vec<Point2D> = subject.to_vec();

    for i in 0..boundary.len() {
        let c1 = &boundary[i];
        let c2 = &boundary[(i + 1) % boundary.len()];
        let inside = |p: &Point2D| edge_cross(c1, c2, p) >= 0.0;

        let mut next = Vec::with_capacity(poly.len() + 1);
        let mut prev = match poly.last() {
            Some(p) => *p,
            None => break,
        };
        let mut prev_inside = inside(&prev);
        for curr in &poly {
            let curr_inside = inside(curr);
            if curr_inside != prev_inside {
                next.push(line_intersection(&prev, curr, c1, c2));
            }
            if curr_inside {
                next.push(*curr);
            }
            prev = *curr;
            prev_inside = curr_inside;
        }

        if next.is_empty() {
            log::debug!("clip edge {i} left no area");
            return next;
        }
        poly = next;
    }
    poly
}

/// Fraction of `target`'s area that lies inside `roi`, in `[0, 1]`.
///
/// Zero when either quad has a non-finite vertex or is degenerate.
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub fn containment_ratio(roi: &Quad, target: &Quad) -> f64 {
    if !all_finite(roi) || !all_finite(target) {
        return 0.0;
    }
    let roi_area = polygon_area(roi);
    let target_area = polygon_area(target);
    if roi_area < MIN_AREA || target_area < MIN_AREA {
        return 0.0;
    }

    let intersection = clip_convex(target, roi);
    let intersection_area = polygon_area(&intersection);
    log::debug!(
        "roi_area={roi_area:.3} target_area={target_area:.3} intersection: {} points, area {intersection_area:.3}",
        intersection.len()
    );
    intersection_area / target_area
}

/// `containment_ratio(roi, target) > threshold`.
pub fn is_overlapping(roi: &Quad, target: &Quad, threshold: f64) -> bool {
    let ratio = containment_ratio(roi, target);
    log::debug!("containment ratio {ratio:.4} (threshold {threshold})");
    ratio > threshold
}

/// Containment test for a convex quad of either winding.
///
/// Edges whose cross product is within `1e-9` of zero are inconclusive and
/// skipped, so points on an edge may go either way. A point for which every
/// edge is inconclusive is reported as outside.
pub fn point_in_convex_quad(quad: &Quad, p: &Point2D) -> bool {
    let mut sign = 0.0_f64;
    for i in 0..quad.len() {
        let cross = edge_cross(&quad[i], &quad[(i + 1) % quad.len()], p);
        if cross.abs() <= EDGE_EPS {
            continue;
        }
        let current = cross.signum();
        if sign == 0.0 {
            sign = current;
        } else if sign != current {
            return false;
        }
    }
    sign != 0.0
}
