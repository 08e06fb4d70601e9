// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: squares, coverage states, accepted records, and the target region.

use kurbo::{Circle, Point, Rect, Vec2};

/// Classification of a square against the target region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Coverage {
    /// Neither fully inside nor fully outside; the trigger for subdivision.
    Unsure,
    /// Completely inside the include circle and clear of the exclude circle.
    Inside,
    /// Completely outside the target region (or completely inside the exclude circle).
    #[default]
    Outside,
}

/// Axis-aligned square, the unit of subdivision.
///
/// Coordinates follow Kurbo's y-down convention: `position` is the top-left corner and the
/// square extends to `position + (size, size)`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Square {
    /// Top-left corner.
    pub position: Point,
    /// Edge length.
    pub size: f64,
}

impl Square {
    /// Create a square from its top-left corner and edge length.
    pub const fn new(position: Point, size: f64) -> Self {
        Self { position, size }
    }

    /// Create a square of edge `size` centered on `center`.
    pub fn from_center(center: Point, size: f64) -> Self {
        let half = 0.5 * size;
        Self {
            position: center - Vec2::new(half, half),
            size,
        }
    }

    /// Bounding rectangle `[x, x + size] × [y, y + size]`.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.size,
            self.position.y + self.size,
        )
    }

    /// Center of the square.
    pub fn center(&self) -> Point {
        let half = 0.5 * self.size;
        self.position + Vec2::new(half, half)
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        let Point { x, y } = self.position;
        let s = self.size;
        [
            Point::new(x, y),
            Point::new(x + s, y),
            Point::new(x, y + s),
            Point::new(x + s, y + s),
        ]
    }

    /// Split into four quadrants of half the size.
    ///
    /// The quadrants are returned as top-left, top-right, bottom-left, bottom-right and
    /// tile the parent exactly.
    pub fn split(&self) -> [Self; 4] {
        let half = 0.5 * self.size;
        let Point { x, y } = self.position;
        [
            Self::new(Point::new(x, y), half),
            Self::new(Point::new(x + half, y), half),
            Self::new(Point::new(x, y + half), half),
            Self::new(Point::new(x + half, y + half), half),
        ]
    }
}

/// Value snapshot of a square accepted into the output.
///
/// Records are plain copies and hold no link into the traversal tree that produced them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AcceptedNode {
    /// Top-left corner at the time of acceptance.
    pub position: Point,
    /// Edge length at the time of acceptance.
    pub size: f64,
    /// Coverage at the time of acceptance.
    pub coverage: Coverage,
}

impl AcceptedNode {
    /// Snapshot a square with its coverage.
    pub const fn new(square: Square, coverage: Coverage) -> Self {
        Self {
            position: square.position,
            size: square.size,
            coverage,
        }
    }

    /// The recorded geometry as a square.
    pub const fn square(&self) -> Square {
        Square::new(self.position, self.size)
    }

    /// Visual anchor of the record: the center of its square.
    pub fn anchor(&self) -> Point {
        self.square().center()
    }

    /// Bounding rectangle of the record.
    pub fn rect(&self) -> Rect {
        self.square().rect()
    }
}

/// Target region: the include circle minus the exclude circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Squares must lie inside this circle to be accepted.
    pub include: Circle,
    /// Squares touching this circle are never accepted.
    pub exclude: Circle,
}

impl Region {
    /// Create a region from an include and an exclude circle.
    pub const fn new(include: Circle, exclude: Circle) -> Self {
        Self { include, exclude }
    }

    /// Region with only an include circle; the exclude circle is degenerate.
    pub fn include_only(include: Circle) -> Self {
        Self {
            include,
            exclude: Circle::new(include.center, 0.0),
        }
    }

    /// Whether `p` is strictly inside the include circle and not strictly inside the exclude circle.
    pub fn contains_point(&self, p: Point) -> bool {
        strictly_inside(&self.include, p) && !strictly_inside(&self.exclude, p)
    }
}

/// Squared radius with negative radii treated as zero.
#[inline]
pub(crate) fn radius_squared(circle: &Circle) -> f64 {
    let r = circle.radius.max(0.0);
    r * r
}

#[inline]
fn strictly_inside(circle: &Circle, p: Point) -> bool {
    (p - circle.center).hypot2() < radius_squared(circle)
}
