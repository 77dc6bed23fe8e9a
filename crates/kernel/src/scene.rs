use dreamhall_common::{Aabb, MeshId};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::mesh::MeshNode;

/// An event record produced by scene mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Mesh was added under the given id.
    MeshAdded { id: MeshId, name: String },
    /// The player was relocated by a portrait trigger.
    Teleported {
        trigger: MeshId,
        from: Vec3,
        to: Vec3,
    },
}

/// Ambient light shining from `direction`, lerping between sky and ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HemisphericLight {
    pub direction: Vec3,
    pub intensity: f32,
}

impl Default for HemisphericLight {
    fn default() -> Self {
        Self {
            direction: Vec3::Y,
            intensity: 1.0,
        }
    }
}

/// The static scene graph.
///
/// Meshes are keyed by sequential ids in a BTreeMap, so iteration follows
/// construction order. Portrait triggers are registered on insertion and
/// queried through [`Scene::portrait_triggers`] without scanning the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub clear_color: [f32; 3],
    pub light: HemisphericLight,
    meshes: BTreeMap<MeshId, MeshNode>,
    triggers: Vec<MeshId>,
    next_id: u32,
    #[serde(skip)]
    event_log: Vec<SceneEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.2, 0.3],
            light: HemisphericLight::default(),
            meshes: BTreeMap::new(),
            triggers: Vec::new(),
            next_id: 0,
            event_log: Vec::new(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh and return its id.
    pub fn add_mesh(&mut self, node: MeshNode) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        if node.is_portrait() {
            self.triggers.push(id);
        }
        tracing::trace!(%id, name = %node.name, shape = node.shape.kind(), "mesh added");
        self.event_log.push(SceneEvent::MeshAdded {
            id,
            name: node.name.clone(),
        });
        self.meshes.insert(id, node);
        id
    }

    pub fn get(&self, id: MeshId) -> Option<&MeshNode> {
        self.meshes.get(&id)
    }

    /// First mesh with the given name, in construction order.
    pub fn find_by_name(&self, name: &str) -> Option<(MeshId, &MeshNode)> {
        self.meshes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, node)| (*id, node))
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &MeshNode)> {
        self.meshes.iter().map(|(id, node)| (*id, node))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// World-space bounds of a mesh.
    pub fn world_bounds(&self, id: MeshId) -> Option<Aabb> {
        self.meshes.get(&id).map(MeshNode::bounds)
    }

    /// Bounds of every mesh that blocks movement.
    pub fn solid_bounds(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.meshes
            .values()
            .filter(|node| node.check_collisions)
            .map(MeshNode::bounds)
    }

    /// Portrait triggers in registration order.
    pub fn portrait_triggers(&self) -> impl Iterator<Item = (MeshId, &MeshNode)> {
        self.triggers
            .iter()
            .filter_map(|id| self.meshes.get(id).map(|node| (*id, node)))
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Non-precise intersection: bounding boxes only.
    pub fn intersects_mesh(&self, bounds: &Aabb, id: MeshId) -> bool {
        self.world_bounds(id)
            .is_some_and(|mesh_bounds| mesh_bounds.intersects(bounds))
    }

    pub fn record_teleport(&mut self, trigger: MeshId, from: Vec3, to: Vec3) {
        self.event_log
            .push(SceneEvent::Teleported { trigger, from, to });
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }
}
