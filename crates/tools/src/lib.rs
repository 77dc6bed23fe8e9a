//! Developer tooling: scene inspector used by the desktop HUD and the CLI.
//!
//! # Invariants
//! - Inspection never mutates the scene.

mod inspector;

pub use inspector::{MeshInfo, PlayerInfo, SceneInspector, SceneSummary};
