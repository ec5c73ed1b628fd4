//! Ray type used for octree queries

use crate::point::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// A ray with an origin and a normalized direction.
///
/// The direction is normalized once at construction and never redone. The
/// caller is expected to express the ray in the same coordinate space as the
/// indexed geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    origin: Point3f,
    direction: Vector3f,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn origin(&self) -> Point3f {
        self.origin
    }

    pub fn direction(&self) -> Vector3f {
        self.direction
    }
}
