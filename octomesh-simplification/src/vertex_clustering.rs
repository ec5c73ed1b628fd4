//! Octree vertex-clustering simplification
//!
//! Groups the mesh vertices by a fixed-depth cut of a point octree, replaces
//! each group with its centroid, and remaps the faces. Triangles whose three
//! remapped corners are not pairwise distinct collapsed to a line or point
//! and are dropped.

use crate::MeshSimplifier;
use octomesh_core::{Error, Point3f, Result, TriangleMesh, Vector3f};
use octomesh_index::build_point_index;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Vertex-clustering mesh simplifier driven by an octree depth cut.
///
/// Smaller depths give exponentially coarser output; a typical LOD chain
/// drives the depth from 7 down to 3. The output mesh carries no reference
/// to the source and must be indexed on its own if further queries are
/// needed against it.
#[derive(Debug, Clone, Copy)]
pub struct VertexClusteringSimplifier {
    /// Octree depth at which the cluster partition is cut.
    pub depth: usize,
}

impl VertexClusteringSimplifier {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }
}

impl MeshSimplifier for VertexClusteringSimplifier {
    fn simplify(&self, mesh: &TriangleMesh) -> Result<TriangleMesh> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Mesh is empty".to_string()));
        }

        let start = Instant::now();

        let octree = build_point_index(&mesh.vertices);
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        octree.cluster(self.depth, &mut clusters);

        let mut simplified = TriangleMesh::new();
        let mut old_to_new: HashMap<usize, usize> = HashMap::new();

        // One centroid vertex per non-empty cluster, dense increasing ids
        for cluster in &clusters {
            if cluster.is_empty() {
                continue;
            }

            let mut mean = Vector3f::zeros();
            for &vertex_id in cluster {
                mean += mesh.vertices[vertex_id].coords;
            }
            mean /= cluster.len() as f32;

            let new_id = simplified.add_vertex(Point3f::from(mean));
            for &vertex_id in cluster {
                old_to_new.insert(vertex_id, new_id);
            }
        }

        // Remap faces; a face collapsing to fewer than three distinct
        // corners is a line or a point, not a triangle
        let mut dropped = 0usize;
        for face in &mesh.faces {
            match (
                old_to_new.get(&face[0]),
                old_to_new.get(&face[1]),
                old_to_new.get(&face[2]),
            ) {
                (Some(&a), Some(&b), Some(&c)) if a != b && b != c && a != c => {
                    simplified.add_face([a, b, c]);
                }
                _ => dropped += 1,
            }
        }

        debug!(
            depth = self.depth,
            old_faces = mesh.face_count(),
            new_faces = simplified.face_count(),
            dropped,
            elapsed = ?start.elapsed(),
            "vertex clustering"
        );

        Ok(simplified)
    }
}

/// Simplify `mesh` with a cluster cut at `depth`.
pub fn simplify(mesh: &TriangleMesh, depth: usize) -> Result<TriangleMesh> {
    VertexClusteringSimplifier::new(depth).simplify(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Axis-aligned unit cube: 8 vertices, 12 triangles.
    fn cube_mesh() -> TriangleMesh {
        let mut vertices = Vec::new();
        for x in [-0.5f32, 0.5] {
            for y in [-0.5f32, 0.5] {
                for z in [-0.5f32, 0.5] {
                    vertices.push(Point3f::new(x, y, z));
                }
            }
        }
        // Corner index bits: x=4, y=2, z=1
        let faces = vec![
            [0, 1, 3],
            [0, 3, 2],
            [4, 7, 5],
            [4, 6, 7],
            [0, 4, 5],
            [0, 5, 1],
            [2, 3, 7],
            [2, 7, 6],
            [0, 2, 6],
            [0, 6, 4],
            [1, 5, 7],
            [1, 7, 3],
        ];
        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let simplifier = VertexClusteringSimplifier::new(3);
        assert!(simplifier.simplify(&TriangleMesh::new()).is_err());
    }

    #[test]
    fn test_depth_zero_collapses_everything() {
        let mesh = cube_mesh();
        let result = simplify(&mesh, 0).unwrap();
        assert_eq!(result.vertex_count(), 1);
        assert_eq!(result.face_count(), 0);

        // The single representative is the centroid of all corners
        let centroid = result.vertices[0];
        assert_relative_eq!(centroid.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(centroid.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(centroid.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_full_depth_preserves_cube() {
        // Each corner sits in its own octant leaf, so a depth-1 cut keeps
        // every vertex and every face
        let mesh = cube_mesh();
        let result = simplify(&mesh, 1).unwrap();
        assert_eq!(result.vertex_count(), 8);
        assert_eq!(result.face_count(), 12);
    }

    #[test]
    fn test_lod_chain_is_monotonic() {
        let mesh = cube_mesh();
        let mut previous_vertices = 0;
        let mut previous_faces = 0;
        for depth in 0..4 {
            let result = simplify(&mesh, depth).unwrap();
            assert!(result.vertex_count() >= previous_vertices);
            assert!(result.face_count() >= previous_faces);
            previous_vertices = result.vertex_count();
            previous_faces = result.face_count();
        }
    }

    #[test]
    fn test_depth_beyond_tree_is_harmless() {
        // The cut terminates at the leaves, reproducing the mesh exactly as
        // the deepest available partition does
        let mesh = cube_mesh();
        let result = simplify(&mesh, 10).unwrap();
        assert_eq!(result.vertex_count(), 8);
        assert_eq!(result.face_count(), 12);
    }

    #[test]
    fn test_output_mesh_is_independent() {
        let mesh = cube_mesh();
        let mut result = simplify(&mesh, 1).unwrap();
        result.add_vertex(Point3f::new(9.0, 9.0, 9.0));
        assert_eq!(mesh.vertex_count(), 8);
    }

    #[test]
    fn test_partial_collapse_drops_degenerates() {
        // Two thin triangles whose right-hand vertices merge under a coarse
        // cut: vertex pairs far apart in x, close in y/z
        let vertices = vec![
            Point3f::new(-4.0, -0.1, 0.0),
            Point3f::new(-4.0, 0.1, 0.0),
            Point3f::new(4.0, -0.1, 0.0),
            Point3f::new(4.0, 0.1, 0.0),
        ];
        let faces = vec![[0, 2, 3], [0, 3, 1]];
        let mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);

        let result = simplify(&mesh, 1).unwrap();
        // Left pair and right pair each merge into one representative:
        // both faces lose a corner pair and collapse
        assert_eq!(result.vertex_count(), 2);
        assert_eq!(result.face_count(), 0);
    }
}
