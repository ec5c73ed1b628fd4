//! # octomesh-index
//!
//! Octree spatial indexing for triangle meshes: an adaptive point octree over
//! mesh vertices, an adaptive triangle octree, and parametric front-to-back
//! ray traversal shared by both. Construction is CPU bound and dominated by
//! the box-triangle overlap predicate; both builders emit `tracing` debug
//! events with their element counts, tree depth and elapsed time.

pub mod overlap;
pub mod point_octree;
mod traversal;
pub mod triangle_octree;
pub mod volume;

pub use overlap::*;
pub use point_octree::*;
pub use triangle_octree::*;
pub use volume::*;

use octomesh_core::{Point3f, Ray};
use std::time::Instant;
use tracing::debug;

/// Padding added around the mesh bounds when deriving the indexed volume,
/// keeping boundary vertices strictly inside it.
pub const VOLUME_PADDING: f32 = 0.2;

/// Build a point octree over `vertices`, one payload per vertex index.
pub fn build_point_index(vertices: &[Point3f]) -> PointOctree<usize> {
    let start = Instant::now();
    let cube = bounding_cube(vertices, VOLUME_PADDING);

    let mut octree = PointOctree::new(cube);
    for (index, vertex) in vertices.iter().enumerate() {
        octree.insert(*vertex, index);
    }

    debug!(
        vertices = vertices.len(),
        depth = octree.depth(),
        elapsed = ?start.elapsed(),
        "built point index"
    );
    octree
}

/// Build a triangle octree over `faces`; a triangle is indexed under every
/// leaf it overlaps.
pub fn build_triangle_index(vertices: &[Point3f], faces: &[[usize; 3]]) -> TriangleOctree {
    let start = Instant::now();
    let cube = bounding_cube(vertices, VOLUME_PADDING);

    let mut octree = TriangleOctree::new(cube);
    for triangle_id in 0..faces.len() {
        octree.insert(vertices, faces, triangle_id);
    }

    debug!(
        triangles = faces.len(),
        depth = octree.depth(),
        elapsed = ?start.elapsed(),
        "built triangle index"
    );
    octree
}

/// Vertex ids of every leaf the ray crosses, in front-to-back leaf order.
pub fn ray_cast_points(octree: &PointOctree<usize>, ray: &Ray) -> Vec<usize> {
    let mut results = Vec::new();
    octree.ray_cast(ray, &mut results);
    results
}

/// Candidate triangle ids from the first non-empty leaf along the ray.
pub fn ray_cast_triangles(
    octree: &TriangleOctree,
    vertices: &[Point3f],
    faces: &[[usize; 3]],
    ray: &Ray,
) -> Vec<usize> {
    let mut results = Vec::new();
    octree.ray_cast(vertices, faces, ray, &mut results);
    results
}
