// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Square-versus-circle tests and region classification.

use kurbo::{Circle, Point};

use crate::types::{Coverage, Region, Square, radius_squared};

/// Whether every corner of `square` lies strictly inside `circle`.
///
/// A corner exactly on the circle boundary is not inside. Since a disk is convex, four
/// inside corners imply the whole square is inside.
pub fn inside_circle(square: &Square, circle: &Circle) -> bool {
    let r2 = radius_squared(circle);
    square
        .corners()
        .iter()
        .all(|&c| (c - circle.center).hypot2() < r2)
}

/// Whether the point of `square` nearest to the circle center lies strictly within the radius.
///
/// This is a nearest-point-within-radius test, not a strict boundary crossing test: it is also
/// true when the square is entirely inside the circle. It only behaves as "overlaps, but is not
/// fully inside" when [`inside_circle`] has already been ruled out.
pub fn nearest_point_within(square: &Square, circle: &Circle) -> bool {
    let nearest = nearest_point(square, circle.center);
    (circle.center - nearest).hypot2() < radius_squared(circle)
}

/// Closest point of the square's box to `p`.
///
/// Written as `max(lo, min(p, hi))` rather than `f64::clamp`, which panics on inverted bounds
/// (negative sizes) and on NaN.
fn nearest_point(square: &Square, p: Point) -> Point {
    let x1 = square.position.x;
    let y1 = square.position.y;
    let x2 = x1 + square.size;
    let y2 = y1 + square.size;
    Point::new(p.x.min(x2).max(x1), p.y.min(y2).max(y1))
}

/// Classify `square` against the region.
///
/// The exclude circle is tested first: being inside it is the same as being outside the region,
/// and touching it makes the square unsure regardless of the include circle.
pub fn classify(square: &Square, region: &Region) -> Coverage {
    if inside_circle(square, &region.exclude) {
        Coverage::Outside
    } else if nearest_point_within(square, &region.exclude) {
        Coverage::Unsure
    } else if inside_circle(square, &region.include) {
        Coverage::Inside
    } else if nearest_point_within(square, &region.include) {
        Coverage::Unsure
    } else {
        Coverage::Outside
    }
}
