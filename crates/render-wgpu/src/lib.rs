//! wgpu render backend for the walkthrough.
//!
//! Every scene mesh is drawn as a scaled instance of a procedural unit mesh
//! (box, cylinder, UV sphere, plane or ground quad). Shading is hemispheric:
//! `emissive + diffuse * hemi(n) * intensity`. Textures are not sampled.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Opaque instances are drawn before translucent ones.
//! - Frame planning is pure and runs without a GPU.

mod batch;
mod geometry;
mod gpu;
mod shaders;

pub use batch::{DrawCall, FramePlan, InstanceData, PLAYER_COLOR, plan_frame};
pub use geometry::{MeshKind, UnitMesh, Vertex};
pub use gpu::WgpuRenderer;
