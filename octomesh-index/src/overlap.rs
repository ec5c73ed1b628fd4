//! Separating-axis box–triangle overlap test
//!
//! Predicate over an axis-aligned box (center + half extents) and a triangle.
//! Thirteen candidate separating axes are checked, short-circuiting on the
//! first one found: the triangle's face normal, the nine cross products of
//! the box axes with the triangle edges, and the three box axes against the
//! triangle's own extents.

use octomesh_core::{Point3f, Vector3f};

/// Does an axis-aligned box overlap the triangle `(v0, v1, v2)`?
///
/// Pure predicate; the dominant cost of triangle-octree construction. The
/// projection radius on each candidate axis is the sum of
/// `|coefficient| * half-extent` per box axis, compared against the projected
/// center-to-vertex distances.
pub fn tri_box_overlap(
    box_center: &Point3f,
    box_half: &Vector3f,
    v0: &Point3f,
    v1: &Point3f,
    v2: &Point3f,
) -> bool {
    // Move the triangle into the box's local frame
    let p0 = v0 - box_center;
    let p1 = v1 - box_center;
    let p2 = v2 - box_center;

    let e0 = p1 - p0;
    let e1 = p2 - p1;
    let e2 = p0 - p2;

    // Triangle face normal against the box
    let normal = e0.cross(&e1);
    if !plane_box_overlap(&normal, &p0, box_half) {
        return false;
    }

    // Projections of two triangle vertices on an edge-cross axis, against the
    // axis radius. Separated when both fall outside the same side.
    let separated = |a: f32, b: f32, rad: f32| a.min(b) > rad || a.max(b) < -rad;

    let f0 = e0.abs();
    let f1 = e1.abs();
    let f2 = e2.abs();

    // Edge e0 crossed with the x, y, z box axes
    if separated(
        e0.z * p0.y - e0.y * p0.z,
        e0.z * p2.y - e0.y * p2.z,
        f0.z * box_half.y + f0.y * box_half.z,
    ) {
        return false;
    }
    if separated(
        -e0.z * p0.x + e0.x * p0.z,
        -e0.z * p2.x + e0.x * p2.z,
        f0.z * box_half.x + f0.x * box_half.z,
    ) {
        return false;
    }
    if separated(
        e0.y * p1.x - e0.x * p1.y,
        e0.y * p2.x - e0.x * p2.y,
        f0.y * box_half.x + f0.x * box_half.y,
    ) {
        return false;
    }

    // Edge e1
    if separated(
        e1.z * p0.y - e1.y * p0.z,
        e1.z * p2.y - e1.y * p2.z,
        f1.z * box_half.y + f1.y * box_half.z,
    ) {
        return false;
    }
    if separated(
        -e1.z * p0.x + e1.x * p0.z,
        -e1.z * p2.x + e1.x * p2.z,
        f1.z * box_half.x + f1.x * box_half.z,
    ) {
        return false;
    }
    if separated(
        e1.y * p0.x - e1.x * p0.y,
        e1.y * p1.x - e1.x * p1.y,
        f1.y * box_half.x + f1.x * box_half.y,
    ) {
        return false;
    }

    // Edge e2
    if separated(
        e2.z * p0.y - e2.y * p0.z,
        e2.z * p1.y - e2.y * p1.z,
        f2.z * box_half.y + f2.y * box_half.z,
    ) {
        return false;
    }
    if separated(
        -e2.z * p0.x + e2.x * p0.z,
        -e2.z * p1.x + e2.x * p1.z,
        f2.z * box_half.x + f2.x * box_half.z,
    ) {
        return false;
    }
    if separated(
        e2.y * p1.x - e2.x * p1.y,
        e2.y * p2.x - e2.x * p2.y,
        f2.y * box_half.x + f2.x * box_half.y,
    ) {
        return false;
    }

    // Box axes against the triangle's axis-aligned extents
    for axis in 0..3 {
        let min = p0[axis].min(p1[axis]).min(p2[axis]);
        let max = p0[axis].max(p1[axis]).max(p2[axis]);
        if min > box_half[axis] || max < -box_half[axis] {
            return false;
        }
    }

    true
}

/// Does the plane `normal . x + d = 0` through `vert` cut the origin-centered
/// box with the given half extents?
fn plane_box_overlap(normal: &Vector3f, vert: &Vector3f, box_half: &Vector3f) -> bool {
    let mut vmin = Vector3f::zeros();
    let mut vmax = Vector3f::zeros();

    for axis in 0..3 {
        let v = vert[axis];
        if normal[axis] > 0.0 {
            vmin[axis] = -box_half[axis] - v;
            vmax[axis] = box_half[axis] - v;
        } else {
            vmin[axis] = box_half[axis] - v;
            vmax[axis] = -box_half[axis] - v;
        }
    }

    if normal.dot(&vmin) > 0.0 {
        return false;
    }
    normal.dot(&vmax) >= 0.0
}
