//! Shared types used across the dreamhall crates.

mod types;

pub use types::{Aabb, MaterialId, MeshId, Transform};
