//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Render state derives from the scene and the camera view.
//!
//! The [`OrbitCamera`] drives both the text debug renderer here and the GPU
//! backend in `dreamhall-render-wgpu`.

mod camera;
mod renderer;

pub use camera::OrbitCamera;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "dreamhall-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
