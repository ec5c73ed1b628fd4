//! Adaptive octree over triangle ids
//!
//! Unlike the point octree, insertion recurses into every child octant whose
//! cube the triangle overlaps, so one triangle id can recur across sibling
//! leaves. `MAX_DEPTH` bounds the subdivision; a leaf at that depth grows
//! past `BUCKET_SIZE` instead of splitting.

use crate::overlap::tri_box_overlap;
use crate::traversal::{self, Crossing, EXIT};
use crate::volume::Cube;
use octomesh_core::{Point3f, Ray, Vector3f};
use tracing::warn;

fn overlaps(cube: &Cube, vertices: &[Point3f], face: &[usize; 3]) -> bool {
    let half = Vector3f::repeat(cube.length / 2.0);
    tri_box_overlap(
        &cube.center(),
        &half,
        &vertices[face[0]],
        &vertices[face[1]],
        &vertices[face[2]],
    )
}

#[derive(Debug)]
enum Node<const B: usize, const MAX_DEPTH: usize> {
    Leaf {
        cube: Cube,
        buckets: Vec<usize>,
    },
    Inner {
        cube: Cube,
        children: [Option<Box<Node<B, MAX_DEPTH>>>; 8],
    },
}

impl<const B: usize, const MAX_DEPTH: usize> Node<B, MAX_DEPTH> {
    fn leaf(cube: Cube) -> Self {
        Node::Leaf {
            cube,
            buckets: Vec::new(),
        }
    }

    fn inner(cube: Cube) -> Self {
        Node::Inner {
            cube,
            children: std::array::from_fn(|_| None),
        }
    }

    fn insert(
        self,
        vertices: &[Point3f],
        faces: &[[usize; 3]],
        triangle_id: usize,
        depth: usize,
    ) -> Self {
        match self {
            Node::Leaf { cube, mut buckets } => {
                if !overlaps(&cube, vertices, &faces[triangle_id]) {
                    return Node::Leaf { cube, buckets };
                }

                if buckets.len() < B || depth >= MAX_DEPTH {
                    buckets.push(triangle_id);
                    return Node::Leaf { cube, buckets };
                }

                let mut node = Node::inner(cube);
                for id in buckets {
                    node = node.insert(vertices, faces, id, depth + 1);
                }
                node.insert(vertices, faces, triangle_id, depth + 1)
            }
            Node::Inner { cube, mut children } => {
                for index in 0..8 {
                    let child_cube = cube.octant_cube(index);
                    if !overlaps(&child_cube, vertices, &faces[triangle_id]) {
                        continue;
                    }

                    let child = match children[index].take() {
                        Some(child) => *child,
                        None => Node::leaf(child_cube),
                    };
                    children[index] =
                        Some(Box::new(child.insert(vertices, faces, triangle_id, depth + 1)));
                }
                Node::Inner { cube, children }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Inner { children, .. } => {
                1 + children
                    .iter()
                    .flatten()
                    .map(|child| child.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Walk octants front to back; a leaf with any triangles ends the whole
    /// traversal by returning `true`.
    fn ray_cast(&self, crossing: &Crossing, mirror: usize, results: &mut Vec<usize>) -> bool {
        if crossing.behind() {
            return false;
        }
        match self {
            Node::Leaf { buckets, .. } => {
                results.extend_from_slice(buckets);
                !buckets.is_empty()
            }
            Node::Inner { children, .. } => {
                let tm = crossing.midpoints();
                let mut octant = traversal::first_octant(&crossing.t0, &tm);
                while octant < EXIT {
                    if let Some(child) = &children[octant ^ mirror] {
                        if child.ray_cast(&crossing.octant(octant, &tm), mirror, results) {
                            return true;
                        }
                    }
                    octant = traversal::next_octant(octant, &crossing.t1, &tm);
                }
                false
            }
        }
    }

    #[cfg(test)]
    fn count_leaves_containing(&self, triangle_id: usize) -> usize {
        match self {
            Node::Leaf { buckets, .. } => buckets.iter().filter(|&&id| id == triangle_id).count(),
            Node::Inner { children, .. } => children
                .iter()
                .flatten()
                .map(|child| child.count_leaves_containing(triangle_id))
                .sum(),
        }
    }

    #[cfg(test)]
    fn max_leaf_occupancy(&self) -> (usize, usize) {
        // (occupancy, leaf depth) of the fullest leaf
        match self {
            Node::Leaf { buckets, .. } => (buckets.len(), 0),
            Node::Inner { children, .. } => children
                .iter()
                .flatten()
                .map(|child| {
                    let (len, depth) = child.max_leaf_occupancy();
                    (len, depth + 1)
                })
                .max()
                .unwrap_or((0, 0)),
        }
    }
}

/// Octree storing triangle ids, one id potentially in many leaves.
#[derive(Debug)]
pub struct TriangleOctree<const BUCKET_SIZE: usize = 5, const MAX_DEPTH: usize = 19> {
    cube: Cube,
    root: Box<Node<BUCKET_SIZE, MAX_DEPTH>>,
}

impl<const BUCKET_SIZE: usize, const MAX_DEPTH: usize> TriangleOctree<BUCKET_SIZE, MAX_DEPTH> {
    /// Create an empty octree covering `cube`.
    pub fn new(cube: Cube) -> Self {
        Self {
            cube,
            root: Box::new(Node::leaf(cube)),
        }
    }

    pub fn origin(&self) -> Point3f {
        self.cube.origin
    }

    pub fn length(&self) -> f32 {
        self.cube.length
    }

    /// Insert triangle `triangle_id` of `faces` into every leaf whose cube it
    /// overlaps. Triangles entirely outside the indexed volume are rejected
    /// and logged.
    pub fn insert(&mut self, vertices: &[Point3f], faces: &[[usize; 3]], triangle_id: usize) {
        if !overlaps(&self.cube, vertices, &faces[triangle_id]) {
            warn!(triangle_id, "triangle is outside the octree region");
            return;
        }

        let root = std::mem::replace(&mut self.root, Box::new(Node::leaf(self.cube)));
        self.root = Box::new(root.insert(vertices, faces, triangle_id, 0));
    }

    /// Maximum node depth below the root; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Append the candidate triangle ids of the first non-empty leaf along
    /// the ray, halting the traversal there. Returns whether such a leaf was
    /// found.
    ///
    /// The candidates are not verified against the ray: every triangle in
    /// that leaf is reported, whether or not the ray actually intersects it.
    /// `vertices` and `faces` are taken for the eventual exact
    /// ray-triangle test.
    pub fn ray_cast(
        &self,
        _vertices: &[Point3f],
        _faces: &[[usize; 3]],
        ray: &Ray,
        results: &mut Vec<usize>,
    ) -> bool {
        match traversal::enter_volume(&self.cube, ray) {
            Some((crossing, mirror)) => self.root.ray_cast(&crossing, mirror, results),
            None => false,
        }
    }

    #[cfg(test)]
    fn count_leaves_containing(&self, triangle_id: usize) -> usize {
        self.root.count_leaves_containing(triangle_id)
    }

    #[cfg(test)]
    fn max_leaf_occupancy(&self) -> (usize, usize) {
        self.root.max_leaf_occupancy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume() -> Cube {
        Cube::new(Point3f::new(-2.0, -2.0, -2.0), 4.0)
    }

    /// Two triangles: 0 straddles the x midplane, 1 sits inside one octant.
    fn straddling_geometry() -> (Vec<Point3f>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3f::new(-1.0, 0.5, 0.5),
            Point3f::new(1.0, 0.5, 0.5),
            Point3f::new(0.0, 1.5, 0.5),
            Point3f::new(0.6, -1.2, -1.2),
            Point3f::new(1.2, -1.2, -1.2),
            Point3f::new(0.9, -0.8, -1.2),
        ];
        let faces = vec![[0, 1, 2], [3, 4, 5]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle_stays_in_root_leaf() {
        let (vertices, faces) = straddling_geometry();
        let mut octree: TriangleOctree<1, 19> = TriangleOctree::new(volume());
        octree.insert(&vertices, &faces, 0);
        assert_eq!(octree.depth(), 0);
    }

    #[test]
    fn test_straddling_triangle_lands_in_sibling_leaves() {
        let (vertices, faces) = straddling_geometry();
        let mut octree: TriangleOctree<1, 19> = TriangleOctree::new(volume());
        octree.insert(&vertices, &faces, 0);
        octree.insert(&vertices, &faces, 1);

        // The second insert overflowed the root leaf and forced a split
        assert!(octree.depth() >= 1);
        assert!(octree.count_leaves_containing(0) >= 2);
        assert_eq!(octree.count_leaves_containing(1), 1);
    }

    #[test]
    fn test_out_of_volume_triangle_rejected() {
        let vertices = vec![
            Point3f::new(10.0, 10.0, 10.0),
            Point3f::new(11.0, 10.0, 10.0),
            Point3f::new(10.0, 11.0, 10.0),
        ];
        let faces = vec![[0, 1, 2]];
        let mut octree: TriangleOctree = TriangleOctree::new(volume());
        octree.insert(&vertices, &faces, 0);
        assert_eq!(octree.depth(), 0);
        assert_eq!(octree.count_leaves_containing(0), 0);
    }

    #[test]
    fn test_capacity_respected_until_max_depth() {
        // Many coincident-ish triangles in one octant force splits; the
        // depth bound then allows oversized leaves
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for i in 0..6 {
            let z = -1.0 + i as f32 * 0.001;
            let base = vertices.len();
            vertices.push(Point3f::new(-1.1, -1.1, z));
            vertices.push(Point3f::new(-0.9, -1.1, z));
            vertices.push(Point3f::new(-1.0, -0.9, z));
            faces.push([base, base + 1, base + 2]);
        }

        let mut octree: TriangleOctree<2, 3> = TriangleOctree::new(volume());
        for id in 0..faces.len() {
            octree.insert(&vertices, &faces, id);
        }

        let (occupancy, depth) = octree.max_leaf_occupancy();
        assert!(occupancy > 2, "depth bound must allow oversized leaves");
        assert!(depth <= octree.depth());
        assert!(octree.depth() <= 3);
    }

    #[test]
    fn test_ray_miss_returns_nothing() {
        let (vertices, faces) = straddling_geometry();
        let mut octree: TriangleOctree = TriangleOctree::new(volume());
        octree.insert(&vertices, &faces, 0);

        let ray = Ray::new(Point3f::new(0.0, 10.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        let mut results = Vec::new();
        assert!(!octree.ray_cast(&vertices, &faces, &ray, &mut results));
        assert!(results.is_empty());
    }

    #[test]
    fn test_ray_returns_first_leaf_candidates() {
        let (vertices, faces) = straddling_geometry();
        let mut octree: TriangleOctree<1, 19> = TriangleOctree::new(volume());
        octree.insert(&vertices, &faces, 0);
        octree.insert(&vertices, &faces, 1);

        // Aim through the octant that holds triangle 1 only
        let ray = Ray::new(Point3f::new(0.9, -1.0, -5.0), Vector3f::new(0.01, 0.01, 1.0));
        let mut results = Vec::new();
        assert!(octree.ray_cast(&vertices, &faces, &ray, &mut results));
        assert_eq!(results, vec![1]);
    }

    #[test]
    fn test_ray_halts_after_first_hit_leaf() {
        let (vertices, faces) = straddling_geometry();
        let mut octree: TriangleOctree<1, 19> = TriangleOctree::new(volume());
        octree.insert(&vertices, &faces, 0);
        octree.insert(&vertices, &faces, 1);

        // A ray crossing several occupied leaves reports only the first one
        let ray = Ray::new(Point3f::new(-5.0, 0.5, 0.5), Vector3f::new(1.0, 0.005, 0.005));
        let mut results = Vec::new();
        assert!(octree.ray_cast(&vertices, &faces, &ray, &mut results));
        assert_eq!(results, vec![0]);
    }
}
