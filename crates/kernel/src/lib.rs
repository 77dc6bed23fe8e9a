//! Scene kernel: the engine side of the walkthrough.
//!
//! Holds the static mesh graph, resolves collision-aware movement of the
//! player body against solid meshes, and keeps a registry of portrait
//! triggers populated as meshes are added.
//!
//! # Invariants
//! - Mesh ids are sequential; iteration follows construction order.
//! - Only meshes with `check_collisions` block movement.
//! - Intersection tests are bounding-box only (non-precise).

mod collision;
mod mesh;
mod scene;

pub use collision::Body;
pub use mesh::{MeshNode, MeshShape, PortraitTrigger};
pub use scene::{HemisphericLight, Scene, SceneEvent};
