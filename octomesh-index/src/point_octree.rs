//! Adaptive point octree with bucketed leaves
//!
//! Every inserted point is routed to exactly one leaf by octant comparison
//! against each level's cube center. A leaf splits into an inner node when
//! its bucket would exceed `BUCKET_SIZE`; removal collapses emptied subtrees
//! back up the path.

use crate::traversal::{self, Crossing, EXIT};
use crate::volume::Cube;
use octomesh_core::{points_equal, Point3f, Ray};
use tracing::warn;

/// One stored entry: a position and its payload.
#[derive(Debug, Clone)]
struct Bucket<D> {
    point: Point3f,
    data: D,
}

#[derive(Debug)]
enum Node<D, const B: usize> {
    Leaf {
        cube: Cube,
        buckets: Vec<Bucket<D>>,
    },
    Inner {
        cube: Cube,
        children: [Option<Box<Node<D, B>>>; 8],
    },
}

impl<D: Clone, const B: usize> Node<D, B> {
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

    /// Insert consumes the node and returns its replacement; splitting a full
    /// leaf moves every entry into a fresh inner node.
    fn insert(self, point: Point3f, data: D) -> Self {
        match self {
            Node::Leaf { cube, mut buckets } => {
                if buckets.len() < B {
                    buckets.push(Bucket { point, data });
                    return Node::Leaf { cube, buckets };
                }

                let mut node = Node::inner(cube);
                for bucket in buckets {
                    node = node.insert(bucket.point, bucket.data);
                }
                node.insert(point, data)
            }
            Node::Inner { cube, mut children } => {
                let index = cube.octant_index(&point);
                let child = match children[index].take() {
                    Some(child) => *child,
                    None => Node::leaf(cube.octant_cube(index)),
                };
                children[index] = Some(Box::new(child.insert(point, data)));
                Node::Inner { cube, children }
            }
        }
    }

    /// Remove the first entry matching `point` within epsilon. Emptied leaves
    /// dissolve; an inner node whose children all dissolved dissolves too.
    fn remove(self, point: &Point3f) -> Option<Self> {
        match self {
            Node::Leaf { cube, mut buckets } => {
                if let Some(found) = buckets.iter().position(|b| points_equal(&b.point, point)) {
                    buckets.remove(found);
                }
                if buckets.is_empty() {
                    None
                } else {
                    Some(Node::Leaf { cube, buckets })
                }
            }
            Node::Inner { cube, mut children } => {
                let index = cube.octant_index(point);
                if let Some(child) = children[index].take() {
                    children[index] = child.remove(point).map(Box::new);
                }
                if children.iter().all(|c| c.is_none()) {
                    None
                } else {
                    Some(Node::Inner { cube, children })
                }
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

    fn ray_cast(&self, crossing: &Crossing, mirror: usize, results: &mut Vec<D>) {
        if crossing.behind() {
            return;
        }
        match self {
            Node::Leaf { buckets, .. } => {
                results.extend(buckets.iter().map(|b| b.data.clone()));
            }
            Node::Inner { children, .. } => {
                let tm = crossing.midpoints();
                let mut octant = traversal::first_octant(&crossing.t0, &tm);
                while octant < EXIT {
                    // The mirror flag maps the conceptual octant back to the
                    // actual child slot
                    if let Some(child) = &children[octant ^ mirror] {
                        child.ray_cast(&crossing.octant(octant, &tm), mirror, results);
                    }
                    octant = traversal::next_octant(octant, &crossing.t1, &tm);
                }
            }
        }
    }

    fn cluster_nodes(&self, depth: usize, current_depth: usize, clusters: &mut Vec<Vec<D>>) {
        match self {
            Node::Leaf { buckets, .. } => {
                // The tree is not deep enough here; the whole bucket forms
                // one cluster of its own
                clusters.push(buckets.iter().map(|b| b.data.clone()).collect());
            }
            Node::Inner { children, .. } => {
                if current_depth < depth {
                    for child in children.iter().flatten() {
                        child.cluster_nodes(depth, current_depth + 1, clusters);
                    }
                    return;
                }

                let mut cluster = Vec::new();
                for child in children.iter().flatten() {
                    child.gather(&mut cluster);
                }
                clusters.push(cluster);
            }
        }
    }

    fn gather(&self, cluster: &mut Vec<D>) {
        match self {
            Node::Leaf { buckets, .. } => {
                cluster.extend(buckets.iter().map(|b| b.data.clone()));
            }
            Node::Inner { children, .. } => {
                for child in children.iter().flatten() {
                    child.gather(cluster);
                }
            }
        }
    }

    #[cfg(test)]
    fn max_leaf_occupancy(&self) -> usize {
        match self {
            Node::Leaf { buckets, .. } => buckets.len(),
            Node::Inner { children, .. } => children
                .iter()
                .flatten()
                .map(|child| child.max_leaf_occupancy())
                .max()
                .unwrap_or(0),
        }
    }
}

/// Octree storing one payload per inserted point.
///
/// The indexed volume is fixed at construction and never grows; inserting a
/// point outside it is rejected with a warning. `BUCKET_SIZE` is the leaf
/// capacity before a split.
#[derive(Debug)]
pub struct PointOctree<D, const BUCKET_SIZE: usize = 1> {
    cube: Cube,
    root: Box<Node<D, BUCKET_SIZE>>,
}

impl<D: Clone, const BUCKET_SIZE: usize> PointOctree<D, BUCKET_SIZE> {
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

    /// Insert `data` at `point`. Points outside the indexed volume
    /// (boundary-exclusive) are rejected and logged.
    ///
    /// There is no depth cap: splitting assumes the points eventually
    /// separate into different octants. Up to `BUCKET_SIZE` entries may share
    /// one position, but inserting more coincident duplicates than that
    /// recurses without bound.
    pub fn insert(&mut self, point: Point3f, data: D) {
        if !self.cube.contains_exclusive(&point) {
            warn!(?point, "point is outside the octree region");
            return;
        }

        let root = std::mem::replace(&mut self.root, Box::new(Node::leaf(self.cube)));
        self.root = Box::new(root.insert(point, data));
    }

    /// Remove the entry stored at `point` (first epsilon match only). A
    /// silent no-op when the point is absent. The tree is never left
    /// rootless: an emptied root is replaced by a fresh leaf covering the
    /// whole volume.
    pub fn remove(&mut self, point: &Point3f) {
        let root = std::mem::replace(&mut self.root, Box::new(Node::leaf(self.cube)));
        self.root = match root.remove(point) {
            Some(node) => Box::new(node),
            None => Box::new(Node::leaf(self.cube)),
        };
    }

    /// Maximum node depth below the root; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Append the payloads of every leaf the ray crosses, in front-to-back
    /// leaf order. `results` is never cleared.
    pub fn ray_cast(&self, ray: &Ray, results: &mut Vec<D>) {
        if let Some((crossing, mirror)) = traversal::enter_volume(&self.cube, ray) {
            self.root.ray_cast(&crossing, mirror, results);
        }
    }

    /// Append one cluster per node reached after descending `depth` levels.
    /// Leaves reached earlier contribute their own bucket as a whole group;
    /// children are visited in fixed index order, depth first.
    pub fn cluster(&self, depth: usize, clusters: &mut Vec<Vec<D>>) {
        self.root.cluster_nodes(depth, 0, clusters);
    }

    #[cfg(test)]
    fn max_leaf_occupancy(&self) -> usize {
        self.root.max_leaf_occupancy()
    }
}
