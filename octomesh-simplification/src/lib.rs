//! Mesh simplification for octomesh
//!
//! Provides level-of-detail generation through octree vertex clustering:
//! vertices are grouped by a fixed-depth cut of a point octree, each group
//! collapses to its centroid, and degenerate triangles are discarded.

pub mod vertex_clustering;

pub use vertex_clustering::*;

use octomesh_core::{Result, TriangleMesh};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Produce a simplified, independent copy of `mesh`
    fn simplify(&self, mesh: &TriangleMesh) -> Result<TriangleMesh>;
}
