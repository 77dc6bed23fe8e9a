use std::fmt::Write;

use dreamhall_kernel::Scene;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let c = scene.clear_color;
        let _ = writeln!(
            out,
            "=== Scene (meshes={}, triggers={}) ===",
            scene.mesh_count(),
            scene.trigger_count()
        );
        let _ = writeln!(
            out,
            "Clear: ({:.2}, {:.2}, {:.2})  Light: intensity={:.1}",
            c[0], c[1], c[2], scene.light.intensity
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        for (id, node) in scene.meshes() {
            let p = node.transform.position;
            let mut flags = String::new();
            if node.check_collisions {
                flags.push_str(" solid");
            }
            if let Some(portrait) = node.portrait {
                let d = portrait.destination;
                let _ = write!(flags, " tp->({:.0}, {:.0}, {:.0})", d.x, d.y, d.z);
            }
            let _ = writeln!(
                out,
                "  [{id:>4}] {:<20} {:<8} pos=({:.2}, {:.2}, {:.2}){flags}",
                node.name,
                node.shape.kind(),
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}
