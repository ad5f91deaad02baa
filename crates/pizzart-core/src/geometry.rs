#![forbid(unsafe_code)]

//! Geometric primitives for the preview surface.
//!
//! Coordinates are percentages of the pizza disc's bounding square:
//! `(0, 0)` is the top-left corner and `(100, 100)` the bottom-right.

/// A point in percentage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge, in percent.
    pub x: f32,
    /// Vertical offset from the top edge, in percent.
    pub y: f32,
}

impl Point {
    /// Centre of the disc.
    pub const CENTER: Point = Point::new(50.0, 50.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` along `angle` (radians, clockwise
    /// from the positive x axis in screen space).
    #[inline]
    pub fn from_polar(center: Point, radius: f32, angle: f32) -> Self {
        Self {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }

    /// Translate by the given offsets.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Clamp both axes into `bounds`.
    #[inline]
    #[must_use]
    pub fn clamp(self, bounds: Bounds) -> Self {
        Self {
            x: bounds.clamp(self.x),
            y: bounds.clamp(self.y),
        }
    }
}

/// A closed interval applied to each axis independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower edge (inclusive).
    pub min: f32,
    /// Upper edge (inclusive).
    pub max: f32,
}

impl Bounds {
    /// Create new bounds. `min` must not exceed `max`.
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a single coordinate.
    ///
    /// NaN input maps to `min` so a bad angle can never escape the disc.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    /// Check whether a point lies inside on both axes.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        (self.min..=self.max).contains(&point.x) && (self.min..=self.max).contains(&point.y)
    }

    /// Width of the interval.
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}
