//! Parametric ray traversal shared by both octrees
//!
//! Implements the front-to-back octant walk of Revelles, Ureña and Lastra's
//! "An Efficient Parametric Algorithm for Octree Traversal". Rays with
//! negative direction components are mirrored about the volume midpoint per
//! axis so the walk only ever deals with non-negative directions; the 3-bit
//! mirror flag is XOR-ed into each conceptual octant index to recover the
//! actual child slot.

use crate::volume::Cube;
use octomesh_core::Ray;

/// Sentinel octant index: the ray leaves the current node.
pub(crate) const EXIT: usize = 8;

/// Per-axis parametric entry (`t0`) and exit (`t1`) values of a ray crossing
/// a node's cube. Axes are ordered x, y, z.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crossing {
    pub t0: [f32; 3],
    pub t1: [f32; 3],
}

impl Crossing {
    /// The cube lies behind the ray origin on some axis.
    pub fn behind(&self) -> bool {
        self.t1[0] < 0.0 || self.t1[1] < 0.0 || self.t1[2] < 0.0
    }

    /// Parametric midpoints of the entry/exit interval per axis.
    pub fn midpoints(&self) -> [f32; 3] {
        [
            0.5 * (self.t0[0] + self.t1[0]),
            0.5 * (self.t0[1] + self.t1[1]),
            0.5 * (self.t0[2] + self.t1[2]),
        ]
    }

    /// Crossing of the conceptual (unmirrored) child octant: a set axis bit
    /// selects the upper parametric half of that axis.
    pub fn octant(&self, octant: usize, tm: &[f32; 3]) -> Crossing {
        let mut t0 = self.t0;
        let mut t1 = self.t1;
        for axis in 0..3 {
            if octant & (4 >> axis) != 0 {
                t0[axis] = tm[axis];
            } else {
                t1[axis] = tm[axis];
            }
        }
        Crossing { t0, t1 }
    }
}

/// Mirror the ray where its direction is negative and compute the root-level
/// crossing. Returns the crossing and the mirror flag, or `None` when the ray
/// misses the volume entirely.
///
/// Zero direction components produce signed infinities through the
/// reciprocal; such axes never constrain entry or exit within a finite cube.
pub(crate) fn enter_volume(cube: &Cube, ray: &Ray) -> Option<(Crossing, usize)> {
    let mut origin = ray.origin();
    let mut direction = ray.direction();
    let mut mirror = 0usize;

    let mid = cube.center();
    for axis in 0..3 {
        if direction[axis] < 0.0 {
            origin[axis] = 2.0 * mid[axis] - origin[axis];
            direction[axis] = -direction[axis];
            mirror |= 4 >> axis;
        }
    }

    let mut t0 = [0.0f32; 3];
    let mut t1 = [0.0f32; 3];
    for axis in 0..3 {
        let div = 1.0 / direction[axis];
        t0[axis] = (cube.origin[axis] - origin[axis]) * div;
        t1[axis] = (cube.origin[axis] + cube.length - origin[axis]) * div;
    }

    let entry = t0[0].max(t0[1]).max(t0[2]);
    let exit = t1[0].min(t1[1]).min(t1[2]);
    (entry < exit).then_some((Crossing { t0, t1 }, mirror))
}

/// First conceptual octant the ray enters, decided by the dominant entry
/// plane and the midpoints of the other two axes.
pub(crate) fn first_octant(t0: &[f32; 3], tm: &[f32; 3]) -> usize {
    let mut octant = 0;

    if t0[0] > t0[1] {
        if t0[0] > t0[2] {
            // Enters through the yz plane
            if tm[1] < t0[0] {
                octant |= 2;
            }
            if tm[2] < t0[0] {
                octant |= 1;
            }
            return octant;
        }
    } else if t0[1] > t0[2] {
        // Enters through the xz plane
        if tm[0] < t0[1] {
            octant |= 4;
        }
        if tm[2] < t0[1] {
            octant |= 1;
        }
        return octant;
    }

    // Enters through the xy plane
    if tm[0] < t0[2] {
        octant |= 4;
    }
    if tm[1] < t0[2] {
        octant |= 2;
    }
    octant
}

/// Next conceptual octant after `octant`, chosen by the smallest exit
/// parameter. A set axis bit means the ray would leave the parent on that
/// axis, yielding [`EXIT`].
pub(crate) fn next_octant(octant: usize, t1: &[f32; 3], tm: &[f32; 3]) -> usize {
    let (exit_x, next_x) = if octant & 4 != 0 {
        (t1[0], EXIT)
    } else {
        (tm[0], octant | 4)
    };
    let (exit_y, next_y) = if octant & 2 != 0 {
        (t1[1], EXIT)
    } else {
        (tm[1], octant | 2)
    };
    let (exit_z, next_z) = if octant & 1 != 0 {
        (t1[2], EXIT)
    } else {
        (tm[2], octant | 1)
    };

    if exit_x < exit_y {
        if exit_x < exit_z {
            return next_x;
        }
    } else if exit_y < exit_z {
        return next_y;
    }
    next_z
}
