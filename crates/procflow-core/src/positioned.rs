//! Provides [`Positioned`], the view the layout solver has of caller objects.

use crate::geometry::{Bounds, Extents, Point};

/// An object owned by the caller that has a gravity point and a fixed box.
///
/// The solver reads [`Positioned::position`] and [`Positioned::extents`] when
/// the object is wrapped into a layout node and writes the final gravity point
/// back through [`Positioned::set_position`] once layout has finished. An
/// unset position is reported with `NaN` coordinates (see [`Point::unset`]).
pub trait Positioned {
    /// Current gravity point of the object.
    fn position(&self) -> Point;

    /// Distances from the gravity point to the edges of the object's box.
    fn extents(&self) -> Extents;

    /// Stores a new gravity point on the object.
    fn set_position(&mut self, position: Point);

    /// Box of the object at its current position.
    fn bounds(&self) -> Bounds {
        Bounds::around(self.position(), self.extents())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    struct Marker {
        at: Point,
    }

    impl Positioned for Marker {
        fn position(&self) -> Point {
            self.at
        }

        fn extents(&self) -> Extents {
            Extents::new(1.0, 3.0, 2.0, 4.0)
        }

        fn set_position(&mut self, position: Point) {
            self.at = position;
        }
    }

    #[test]
    fn test_default_bounds_follow_position() {
        let mut marker = Marker {
            at: Point::new(10.0, 10.0),
        };
        marker.set_position(Point::new(20.0, 30.0));

        let bounds = marker.bounds();
        assert_approx_eq!(f64, bounds.min_x(), 19.0);
        assert_approx_eq!(f64, bounds.max_x(), 23.0);
        assert_approx_eq!(f64, bounds.min_y(), 28.0);
        assert_approx_eq!(f64, bounds.max_y(), 34.0);
    }
}
