use bytemuck::{Pod, Zeroable};
use dreamhall_assets::{MaterialStore, StandardMaterial};
use dreamhall_kernel::{Body, Scene};
use glam::Mat4;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::geometry::{MeshKind, shape_scale};

/// Diffuse colour of the player's box.
pub const PLAYER_COLOR: [f32; 3] = [0.2, 0.6, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    /// rgb plus material alpha.
    pub diffuse: [f32; 4],
    pub emissive: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, material: &StandardMaterial) -> Self {
        let cols = model.to_cols_array_2d();
        let [r, g, b] = material.diffuse_color;
        let [er, eg, eb] = material.emissive_color;
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            diffuse: [r, g, b, material.alpha],
            emissive: [er, eg, eb, 0.0],
        }
    }
}

/// A contiguous run of instances sharing one unit mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub kind: MeshKind,
    pub instances: Range<u32>,
    pub translucent: bool,
}

/// Everything one frame uploads and draws.
#[derive(Debug, Clone, Default)]
pub struct FramePlan {
    pub instances: Vec<InstanceData>,
    /// Opaque calls first, then translucent ones.
    pub draws: Vec<DrawCall>,
}

impl FramePlan {
    pub fn kinds(&self) -> impl Iterator<Item = MeshKind> + '_ {
        self.draws.iter().map(|d| d.kind)
    }
}

/// Group the scene's meshes (plus the player box) into per-mesh batches.
/// Meshes without a registered material render white.
pub fn plan_frame(scene: &Scene, materials: &MaterialStore, player: Option<&Body>) -> FramePlan {
    let fallback = StandardMaterial::default();
    let mut opaque: BTreeMap<MeshKind, Vec<InstanceData>> = BTreeMap::new();
    let mut translucent: BTreeMap<MeshKind, Vec<InstanceData>> = BTreeMap::new();

    for (_, node) in scene.meshes() {
        let material = node
            .material
            .and_then(|id| materials.get(id))
            .unwrap_or(&fallback);
        let model = node.transform.matrix() * shape_scale(&node.shape);
        let bucket = if material.is_translucent() {
            &mut translucent
        } else {
            &mut opaque
        };
        bucket
            .entry(MeshKind::of(&node.shape))
            .or_default()
            .push(InstanceData::new(model, material));
    }

    if let Some(body) = player {
        let material = StandardMaterial {
            diffuse_color: PLAYER_COLOR,
            ..StandardMaterial::named("player")
        };
        let model = Mat4::from_translation(body.position) * Mat4::from_scale(body.half_extents * 2.0);
        opaque
            .entry(MeshKind::Box)
            .or_default()
            .push(InstanceData::new(model, &material));
    }

    let mut plan = FramePlan::default();
    for (batches, is_translucent) in [(opaque, false), (translucent, true)] {
        for (kind, instances) in batches {
            let start = plan.instances.len() as u32;
            plan.instances.extend(instances);
            plan.draws.push(DrawCall {
                kind,
                instances: start..plan.instances.len() as u32,
                translucent: is_translucent,
            });
        }
    }
    plan
}
