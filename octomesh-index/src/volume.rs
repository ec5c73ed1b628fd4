//! Axis-aligned cubic regions and octant arithmetic

use octomesh_core::{Point3f, Vector3f};

/// An axis-aligned cube `[origin, origin + length]` on every axis.
///
/// Octant indices pack the per-axis comparison against the cube center into
/// bit flags: bit 2 for x, bit 1 for y, bit 0 for z. A set bit means the
/// octant lies on the upper half of that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub origin: Point3f,
    pub length: f32,
}

impl Cube {
    pub fn new(origin: Point3f, length: f32) -> Self {
        Self { origin, length }
    }

    /// Center of the cube
    pub fn center(&self) -> Point3f {
        self.origin + Vector3f::repeat(self.length / 2.0)
    }

    /// Strict interior test; points on the boundary are outside.
    pub fn contains_exclusive(&self, point: &Point3f) -> bool {
        let end = self.origin + Vector3f::repeat(self.length);
        point.x > self.origin.x
            && point.x < end.x
            && point.y > self.origin.y
            && point.y < end.y
            && point.z > self.origin.z
            && point.z < end.z
    }

    /// Index of the octant containing `point`, relative to the cube center.
    pub fn octant_index(&self, point: &Point3f) -> usize {
        let center = self.center();
        let mut index = 0;
        if point.x - center.x >= 0.0 {
            index |= 4;
        }
        if point.y - center.y >= 0.0 {
            index |= 2;
        }
        if point.z - center.z >= 0.0 {
            index |= 1;
        }
        index
    }

    /// The sub-cube for octant `index`; half the side length, origin offset
    /// by 0 or `length / 2` per set bit.
    pub fn octant_cube(&self, index: usize) -> Cube {
        let half = self.length / 2.0;
        let mut origin = self.origin;
        if index & 4 != 0 {
            origin.x += half;
        }
        if index & 2 != 0 {
            origin.y += half;
        }
        if index & 1 != 0 {
            origin.z += half;
        }
        Cube::new(origin, half)
    }
}

/// Cubic volume covering all `vertices`, padded on every side so boundary
/// vertices land strictly inside it.
pub fn bounding_cube(vertices: &[Point3f], padding: f32) -> Cube {
    if vertices.is_empty() {
        return Cube::new(Point3f::new(-padding, -padding, -padding), 2.0 * padding);
    }

    let mut min = vertices[0];
    let mut max = vertices[0];
    for vertex in vertices {
        min.x = min.x.min(vertex.x);
        min.y = min.y.min(vertex.y);
        min.z = min.z.min(vertex.z);

        max.x = max.x.max(vertex.x);
        max.y = max.y.max(vertex.y);
        max.z = max.z.max(vertex.z);
    }

    let extent = (max.x - min.x).max(max.y - min.y).max(max.z - min.z);
    Cube::new(
        Point3f::new(min.x - padding, min.y - padding, min.z - padding),
        extent + 2.0 * padding,
    )
}
