//! Axis-aligned rectangles and the overlap tests every navigation query relies on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Point;

/// Errors raised when constructing geometry from invalid parameters.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// Width or height was negative, infinite, or not a number.
    #[error("width/height must be non-negative and finite (got {width} x {height})")]
    InvalidDimensions {
        /// Width supplied to the constructor.
        width: f64,
        /// Height supplied to the constructor.
        height: f64,
    },
}

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// Edges are closed: two rectangles that merely touch along an edge or at a
/// corner are considered overlapping, and so is a segment that grazes an edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectRecord", into = "RectRecord")]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a rectangle, rejecting negative or non-finite dimensions.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        if !valid_extent(width) || !valid_extent(height) {
            return Err(GeometryError::InvalidDimensions { width, height });
        }

        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// One-by-one rectangle whose top-left corner is `origin`.
    #[must_use]
    pub const fn unit_at(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Geometric centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in clockwise order starting at the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Copy of the rectangle shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Moves the rectangle so its top-left corner sits at `origin`.
    pub fn move_to(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    /// Grows the rectangle along `vector`, keeping the opposite edges fixed.
    ///
    /// Negative components shift the origin backward so the rectangle extends
    /// toward the vector, which is how a hitbox is projected in a facing
    /// direction.
    pub fn extend(&mut self, vector: Point) {
        self.width += vector.x.abs();
        self.height += vector.y.abs();
        self.x += vector.x.min(0.0);
        self.y += vector.y.min(0.0);
    }

    /// Reports whether the two rectangles overlap, counting shared edges.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.bottom() < other.y
            || self.y > other.bottom()
            || self.right() < other.x
            || self.x > other.right())
    }

    /// Reports whether `other` lies entirely within this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Slab test between the closed rectangle and the segment `start..=end`.
    ///
    /// A zero-length segment intersects when its point lies on or inside the
    /// rectangle. Axis-parallel segments never divide by zero: the constant
    /// coordinate must fall within the matching slab.
    #[must_use]
    pub fn intersects_segment(&self, start: Point, end: Point) -> bool {
        let mut entry = 0.0_f64;
        let mut exit = 1.0_f64;

        clip_axis(
            start.x,
            end.x - start.x,
            self.x,
            self.right(),
            &mut entry,
            &mut exit,
        ) && clip_axis(
            start.y,
            end.y - start.y,
            self.y,
            self.bottom(),
            &mut entry,
            &mut exit,
        )
    }
}

/// Reports whether the segment between two points avoids every obstacle.
#[must_use]
pub fn has_line_of_sight(obstacles: &[Rect], from: Point, to: Point) -> bool {
    !obstacles
        .iter()
        .any(|obstacle| obstacle.intersects_segment(from, to))
}

fn valid_extent(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn clip_axis(
    origin: f64,
    delta: f64,
    low: f64,
    high: f64,
    entry: &mut f64,
    exit: &mut f64,
) -> bool {
    if delta == 0.0 {
        return origin >= low && origin <= high;
    }

    let first = (low - origin) / delta;
    let second = (high - origin) / delta;
    let (near, far) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };

    *entry = entry.max(near);
    *exit = exit.min(far);
    *entry <= *exit
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RectRecord {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl TryFrom<RectRecord> for Rect {
    type Error = GeometryError;

    fn try_from(record: RectRecord) -> Result<Self, Self::Error> {
        Rect::new(record.x, record.y, record.width, record.height)
    }
}

impl From<Rect> for RectRecord {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}
