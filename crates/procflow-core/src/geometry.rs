//! Geometric primitives for node placement.
//!
//! A node is positioned by its *gravity point*, which is not necessarily a
//! corner or the center of the node. The distance from the gravity point to
//! each edge of the node's box is described by [`Extents`], so boxes may be
//! asymmetric around their gravity point.

/// A gravity point in diagram coordinates.
///
/// `NaN` coordinates mark a point that has not been placed yet; see
/// [`Point::unset`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a point whose coordinates are both unset (`NaN`)
    pub fn unset() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns a copy of this point with the x-coordinate replaced
    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    /// Returns a copy of this point with the y-coordinate replaced
    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    /// Returns true if either coordinate is still unset
    pub fn is_unset(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Returns true if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Represents the dimensions of a node with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Distances from a gravity point to the four edges of a node's box.
///
/// All four values are expected to be finite and non-negative; see
/// [`Extents::is_valid`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extents {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Extents {
    /// Creates new extents with the given distance to each edge
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Creates extents with the same distance to every edge
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    /// Creates extents for a box of the given size centered on its gravity point
    pub fn centered(size: Size) -> Self {
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;
        Self {
            left: half_width,
            right: half_width,
            top: half_height,
            bottom: half_height,
        }
    }

    /// Returns the distance from the gravity point to the left edge
    pub fn left(self) -> f64 {
        self.left
    }

    /// Returns the distance from the gravity point to the right edge
    pub fn right(self) -> f64 {
        self.right
    }

    /// Returns the distance from the gravity point to the top edge
    pub fn top(self) -> f64 {
        self.top
    }

    /// Returns the distance from the gravity point to the bottom edge
    pub fn bottom(self) -> f64 {
        self.bottom
    }

    /// Returns the sum of left and right extents
    pub fn horizontal_sum(self) -> f64 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom extents
    pub fn vertical_sum(self) -> f64 {
        self.top + self.bottom
    }

    /// Returns the size of the box described by these extents
    pub fn to_size(self) -> Size {
        Size::new(self.horizontal_sum(), self.vertical_sum())
    }

    /// Returns true if every extent is finite and non-negative
    pub fn is_valid(self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from explicit minimum and maximum coordinates
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates the box of a node with the given gravity point and extents
    pub fn around(gravity: Point, extents: Extents) -> Self {
        Self {
            min_x: gravity.x() - extents.left(),
            min_y: gravity.y() - extents.top(),
            max_x: gravity.x() + extents.right(),
            max_y: gravity.y() + extents.bottom(),
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x(),
            min_y: self.min_y + offset.y(),
            max_x: self.max_x + offset.x(),
            max_y: self.max_y + offset.y(),
        }
    }

    /// Grows the bounds outwards by the given extents on each side.
    pub fn add_padding(&self, padding: Extents) -> Self {
        Self {
            min_x: self.min_x - padding.left(),
            min_y: self.min_y - padding.top(),
            max_x: self.max_x + padding.right(),
            max_y: self.max_y + padding.bottom(),
        }
    }

    /// Returns true if the interiors of the two bounds intersect.
    ///
    /// Boxes that merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        other.max_x > self.min_x
            && other.min_x < self.max_x
            && other.max_y > self.min_y
            && other.min_y < self.max_y
    }

    /// Returns true if the horizontal spans of the two bounds overlap
    pub fn overlaps_horizontally(&self, other: &Self) -> bool {
        other.max_x > self.min_x && other.min_x < self.max_x
    }
}
