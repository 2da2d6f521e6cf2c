//! 3-D Axis Aligned Bounding Boxes.

use super::{point3, Float, Point3f, Vector3f};

/// 3-D axis aligned bounding box containing `Float` points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// Creates a new 3-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns an inverted box that any point union turns into a valid one.
    fn empty() -> Self {
        Self {
            p_min: point3(Float::MAX, Float::MAX, Float::MAX),
            p_max: point3(Float::MIN, Float::MIN, Float::MIN),
        }
    }

    /// Returns the smallest box that encloses all given points or `None` if
    /// there are no points.
    ///
    /// * `points` - The points.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3f>,
    {
        let mut b = Self::empty();
        let mut any = false;
        for p in points {
            b = b.union_point(p);
            any = true;
        }
        any.then_some(b)
    }

    /// Returns a bounding box that also encloses the given point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns the size of the box along each axis, i.e. the diagonal from
    /// the minimum point to the maximum point.
    pub fn extents(&self) -> Vector3f {
        self.p_max - self.p_min
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector3;

    #[test]
    fn new_orders_corners() {
        let b = Bounds3f::new(point3(1.0, -1.0, 2.0), point3(-1.0, 1.0, 0.0));
        assert_eq!(b.p_min, point3(-1.0, -1.0, 0.0));
        assert_eq!(b.p_max, point3(1.0, 1.0, 2.0));
    }

    #[test]
    fn from_points_none_without_points() {
        let pts: Vec<Point3f> = vec![];
        assert!(Bounds3f::from_points(&pts).is_none());
    }

    #[test]
    fn extents_enclose_points() {
        let pts = vec![
            point3(0.0, 0.0, 0.0),
            point3(3.0, -2.0, 1.0),
            point3(1.0, 2.0, 5.0),
        ];
        let b = Bounds3f::from_points(&pts).unwrap();
        assert_eq!(b.extents(), vector3(3.0, 4.0, 5.0));
        assert_eq!(b.p_min, point3(0.0, -2.0, 0.0));
    }
}
