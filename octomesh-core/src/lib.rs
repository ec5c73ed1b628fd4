//! Core data structures for octomesh
//!
//! This crate provides the fundamental types shared by the spatial index and
//! the simplification layer: points, rays, triangle meshes, and errors.

pub mod error;
pub mod mesh;
pub mod point;
pub mod ray;

pub use error::*;
pub use mesh::*;
pub use point::*;
pub use ray::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

/// Common result type for octomesh operations
pub type Result<T> = std::result::Result<T, Error>;
