// Rotation utilities
//
// Fixed-angle rotations about the coordinate axes, applied in x -> y -> z
// order, with the inverse precomputed for transforming rays into object space.

use crate::{Aabb, Mat3, Vec3};

/// A rotation about the three coordinate axes by fixed angles.
///
/// The forward transform rotates about X first, then Y, then Z. The inverse
/// is the transpose of the forward matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    forward: Mat3,
    inverse: Mat3,
}

impl Rotation {
    /// Build a rotation from per-axis angles in degrees.
    pub fn from_degrees(angles: Vec3) -> Self {
        let radians = Vec3::new(
            angles.x.to_radians(),
            angles.y.to_radians(),
            angles.z.to_radians(),
        );
        let forward = Mat3::from_rotation_z(radians.z)
            * Mat3::from_rotation_y(radians.y)
            * Mat3::from_rotation_x(radians.x);

        Self {
            forward,
            inverse: forward.transpose(),
        }
    }

    pub const IDENTITY: Rotation = Rotation {
        forward: Mat3::IDENTITY,
        inverse: Mat3::IDENTITY,
    };

    /// Rotate a point or direction from object space to world space.
    #[inline]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        self.forward * v
    }

    /// Rotate a point or direction from world space back to object space.
    #[inline]
    pub fn apply_inverse(&self, v: Vec3) -> Vec3 {
        self.inverse * v
    }

    /// Bounding box of the rotated `aabb`.
    ///
    /// Computed from all 8 transformed corners, which is exact for an
    /// axis-aligned box child and conservative otherwise.
    pub fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut result = Aabb::EMPTY;
        for corner in aabb.corners() {
            result.extend(self.apply(corner));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rotation_identity() {
        let rotation = Rotation::from_degrees(Vec3::ZERO);
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert!(approx_eq(rotation.apply(point), point));
        assert_eq!(Rotation::IDENTITY.apply(point), point);
    }

    #[test]
    fn test_rotation_about_y() {
        let rotation = Rotation::from_degrees(Vec3::new(0.0, 90.0, 0.0));
        // +X rotates onto -Z for a right-handed rotation about +Y
        assert!(approx_eq(rotation.apply(Vec3::X), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_rotation_order_x_then_z() {
        let rotation = Rotation::from_degrees(Vec3::new(90.0, 0.0, 90.0));
        // X first: +Y -> +Z; then Z leaves +Z alone.
        assert!(approx_eq(rotation.apply(Vec3::Y), Vec3::Z));
        // X leaves +X alone; then Z: +X -> +Y.
        assert!(approx_eq(rotation.apply(Vec3::X), Vec3::Y));
    }

    #[test]
    fn test_rotation_inverse_round_trip() {
        let rotation = Rotation::from_degrees(Vec3::new(12.0, -47.0, 130.0));
        let point = Vec3::new(-3.0, 0.5, 8.0);
        assert!(approx_eq(rotation.apply_inverse(rotation.apply(point)), point));
        assert!(approx_eq(rotation.apply(rotation.apply_inverse(point)), point));
    }

    #[test]
    fn test_transform_aabb() {
        let rotation = Rotation::from_degrees(Vec3::new(0.0, 90.0, 0.0));
        let aabb = Aabb::from_corners(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rotated = rotation.transform_aabb(&aabb);

        assert!(approx_eq(rotated.min(), Vec3::new(0.0, 0.0, -2.0)));
        assert!(approx_eq(rotated.max(), Vec3::new(1.0, 1.0, 0.0)));
    }
}
