//! Transformations

use super::{
    matrix4x4, point3, vector3, Float, Matrix4x4, Point3f, Vector3f, IDENTITY_MATRIX,
};
use std::ops::Mul;

/// A transformation for mapping from points to points and vectors to vectors.
/// Both the matrix and its inverse are carried so that inverting a placement
/// never needs a general matrix inversion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// The transformation matrix.
    pub m: Matrix4x4,

    /// The inverse transformation matrix.
    pub m_inv: Matrix4x4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transformation.
    pub const IDENTITY: Transform = Transform {
        m: IDENTITY_MATRIX,
        m_inv: IDENTITY_MATRIX,
    };

    /// Create a transformation representing a translation.
    ///
    /// * `delta` -  Translation.
    #[rustfmt::skip]
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform {
            m: matrix4x4(
                1.0, 0.0, 0.0, delta.x,
                0.0, 1.0, 0.0, delta.y,
                0.0, 0.0, 1.0, delta.z,
                0.0, 0.0, 0.0, 1.0,
            ),
            m_inv: matrix4x4(
                1.0, 0.0, 0.0, -delta.x,
                0.0, 1.0, 0.0, -delta.y,
                0.0, 0.0, 1.0, -delta.z,
                0.0, 0.0, 0.0,  1.0,
            ),
        }
    }

    /// Create a transformation representing a non-uniform scale.
    ///
    /// * `s` -  Scaling factors along x, y and z axes.
    #[rustfmt::skip]
    pub fn scale(s: &Vector3f) -> Transform {
        Transform {
            m: matrix4x4(
                s.x, 0.0, 0.0, 0.0,
                0.0, s.y, 0.0, 0.0,
                0.0, 0.0, s.z, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            m_inv: matrix4x4(
                1.0 / s.x, 0.0,       0.0,       0.0,
                0.0,       1.0 / s.y, 0.0,       0.0,
                0.0,       0.0,       1.0 / s.z, 0.0,
                0.0,       0.0,       0.0,       1.0,
            ),
        }
    }

    /// Create a transformation representing rotation about the x-axis.
    ///
    /// * `theta` -  Angle in degrees.
    #[rustfmt::skip]
    pub fn rotate_x(theta: Float) -> Transform {
        let r = theta.to_radians();
        let sin_theta = r.sin();
        let cos_theta = r.cos();
        let m = matrix4x4(
            1.0, 0.0,        0.0,       0.0,
            0.0, cos_theta, -sin_theta, 0.0,
            0.0, sin_theta,  cos_theta, 0.0,
            0.0, 0.0,        0.0,       1.0,
        );
        Transform { m, m_inv: m.transpose() }
    }

    /// Create a transformation representing rotation about the y-axis.
    ///
    /// * `theta` -  Angle in degrees.
    #[rustfmt::skip]
    pub fn rotate_y(theta: Float) -> Transform {
        let r = theta.to_radians();
        let sin_theta = r.sin();
        let cos_theta = r.cos();
        let m = matrix4x4(
             cos_theta, 0.0, sin_theta, 0.0,
             0.0,       1.0, 0.0,       0.0,
            -sin_theta, 0.0, cos_theta, 0.0,
             0.0,       0.0, 0.0,       1.0,
        );
        Transform { m, m_inv: m.transpose() }
    }

    /// Create a transformation representing rotation about the z-axis.
    ///
    /// * `theta` -  Angle in degrees.
    #[rustfmt::skip]
    pub fn rotate_z(theta: Float) -> Transform {
        let r = theta.to_radians();
        let sin_theta = r.sin();
        let cos_theta = r.cos();
        let m = matrix4x4(
            cos_theta, -sin_theta, 0.0, 0.0,
            sin_theta,  cos_theta, 0.0, 0.0,
            0.0,        0.0,       1.0, 0.0,
            0.0,        0.0,       0.0, 1.0,
        );
        Transform { m, m_inv: m.transpose() }
    }

    /// Create a transformation representing rotation about an arbitrary axis.
    ///
    /// * `theta` - Angle in degrees.
    /// * `axis`  - Rotation axis. Does not need to be normalized.
    pub fn rotate(theta: Float, axis: &Vector3f) -> Transform {
        let a = axis.normalize();
        let r = theta.to_radians();
        let sin_theta = r.sin();
        let cos_theta = r.cos();
        let mut m = Matrix4x4::default();

        // Compute rotation of first basis vector
        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;
        m.m[0][3] = 0.0;

        // Compute rotations of second and third basis vectors
        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;
        m.m[1][3] = 0.0;

        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;
        m.m[2][3] = 0.0;

        Transform {
            m,
            m_inv: m.transpose(),
        }
    }

    /// Generate a camera-to-world transformation for a camera at `origin`
    /// looking towards `target`. The camera's local +z axis maps to the
    /// viewing direction.
    ///
    /// * `origin` - Position of camera.
    /// * `target` - Position to point towards.
    /// * `up`     - Used to orient the camera around its viewing direction.
    #[rustfmt::skip]
    pub fn look_at(origin: &Point3f, target: &Point3f, up: &Vector3f) -> Transform {
        let dir = (*target - *origin).normalize();
        let left = up.normalize().cross(&dir).normalize();
        let new_up = dir.cross(&left);

        let m = matrix4x4(
            left.x, new_up.x, dir.x, origin.x,
            left.y, new_up.y, dir.y, origin.y,
            left.z, new_up.z, dir.z, origin.z,
            0.0,    0.0,      0.0,   1.0,
        );

        // The upper 3x3 block is orthonormal so the inverse is its
        // transpose combined with the negated, rotated translation.
        let o = vector3(origin.x, origin.y, origin.z);
        let m_inv = matrix4x4(
            left.x,   left.y,   left.z,   -left.dot(&o),
            new_up.x, new_up.y, new_up.z, -new_up.dot(&o),
            dir.x,    dir.y,    dir.z,    -dir.dot(&o),
            0.0,      0.0,      0.0,      1.0,
        );

        Transform { m, m_inv }
    }

    /// Returns the inverse transformation.
    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Applies transformation to a given point.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m;
        let xp = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let yp = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let zp = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let wp = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];

        debug_assert!(wp != 0.0, "Transformation<Point3f>: wp is zero");

        if wp == 1.0 {
            point3(xp, yp, zp)
        } else {
            point3(xp / wp, yp / wp, zp / wp)
        }
    }

    /// Applies transformation to a given vector.
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m;
        vector3(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    /// Composes this transformation with another one. The result applies
    /// `other` first and then `self`.
    ///
    /// * `other` - The transformation to compose with.
    fn mul(self, other: &Transform) -> Transform {
        Transform {
            m: self.m * other.m,
            m_inv: other.m_inv * self.m_inv,
        }
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// Composes this transformation with another one. The result applies
    /// `other` first and then `self`.
    ///
    /// * `other` - The transformation to compose with.
    fn mul(self, other: Transform) -> Transform {
        &self * &other
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
#[macro_use]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use float_cmp::*;
    use proptest::prelude::*;

    fn approx_point(a: &Point3f, b: &Point3f, eps: Float) -> bool {
        approx_eq!(Float, a.x, b.x, epsilon = eps)
            && approx_eq!(Float, a.y, b.y, epsilon = eps)
            && approx_eq!(Float, a.z, b.z, epsilon = eps)
    }

    #[test]
    fn translate_moves_points() {
        let t = Transform::translate(&vector3(1.0, -2.0, 3.0));
        let p = t.transform_point(&point3(0.0, 0.0, 0.0));
        assert_eq!(p, point3(1.0, -2.0, 3.0));
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let t = Transform::rotate_z(90.0);
        let p = t.transform_point(&point3(1.0, 0.0, 0.0));
        assert!(approx_point(&p, &point3(0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn rotate_about_up_matches_rotate_z() {
        let a = Transform::rotate(37.0, &vector3(0.0, 0.0, 2.0));
        let b = Transform::rotate_z(37.0);
        let p = point3(3.0, -1.0, 0.5);
        assert!(approx_point(
            &a.transform_point(&p),
            &b.transform_point(&p),
            1e-5
        ));
    }

    #[test]
    fn composition_applies_right_to_left() {
        let t = Transform::translate(&vector3(5.0, 0.0, 0.0));
        let s = Transform::scale(&vector3(2.0, 2.0, 2.0));
        let p = point3(1.0, 1.0, 1.0);
        assert_eq!((t * s).transform_point(&p), point3(7.0, 2.0, 2.0));
        assert_eq!((s * t).transform_point(&p), point3(12.0, 2.0, 2.0));
    }

    #[test]
    fn look_at_places_camera_at_origin_facing_target() {
        let origin = point3(15.0, 0.0, 0.0);
        let target = point3(0.0, 0.0, 0.0);
        let t = Transform::look_at(&origin, &target, &vector3(0.0, 0.0, 1.0));

        assert_eq!(t.transform_point(&point3(0.0, 0.0, 0.0)), origin);

        let forward = t.transform_vector(&vector3(0.0, 0.0, 1.0));
        assert!(approx_eq!(Float, forward.x, -1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, forward.y, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, forward.z, 0.0, epsilon = 1e-6));

        let up = t.transform_vector(&vector3(0.0, 1.0, 0.0));
        assert!(approx_eq!(Float, up.z, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn look_at_inverse_maps_target_onto_view_axis() {
        let origin = point3(15.0, 0.0, 0.0);
        let target = point3(0.0, 0.0, 0.0);
        let t = Transform::look_at(&origin, &target, &vector3(0.0, 0.0, 1.0));
        let p = t.inverse().transform_point(&target);
        assert!(approx_point(&p, &point3(0.0, 0.0, 15.0), 1e-5));
    }

    prop_point3!(
        point3_f32,
        f32,
        -10.0..10.0f32,
        -10.0..10.0f32,
        -10.0..10.0f32
    );

    proptest! {
        #[test]
        fn inverse_round_trips(
            p in point3_f32(),
            rx in -180.0..180.0f32,
            ry in -180.0..180.0f32,
            s in 0.1..5.0f32,
        ) {
            let t = Transform::translate(&vector3(1.0, 2.0, 3.0))
                * Transform::scale(&vector3(s, s, s))
                * Transform::rotate_x(rx)
                * Transform::rotate_y(ry);
            let q = t.inverse().transform_point(&t.transform_point(&p));
            prop_assert!(approx_point(&q, &p, 1e-3));
        }

        #[test]
        fn rotation_preserves_length(p in point3_f32(), theta in -360.0..360.0f32) {
            let v = vector3(p.x, p.y, p.z);
            let r = Transform::rotate(theta, &vector3(0.3, 0.2, 1.0)).transform_vector(&v);
            prop_assert!((r.length() - v.length()).abs() < 1e-3);
        }
    }
}
