//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Check whether two scalars are equal within a margin.
pub fn scalars_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

/// Check whether two points have equal coordinates within machine epsilon.
///
/// Used by the point octree to match a removal request against stored
/// entries; coincident duplicates are not distinguished.
pub fn points_equal(a: &Point3f, b: &Point3f) -> bool {
    scalars_equal(a.x, b.x, f32::EPSILON)
        && scalars_equal(a.y, b.y, f32::EPSILON)
        && scalars_equal(a.z, b.z, f32::EPSILON)
}
