use dreamhall_common::MeshId;
use dreamhall_kernel::{Body, Scene};
use glam::Vec3;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the scene for debugging and the
/// development UI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        SceneSummary {
            mesh_count: scene.mesh_count(),
            solid_count: scene.meshes().filter(|(_, n)| n.check_collisions).count(),
            trigger_count: scene.trigger_count(),
            pending_events: scene.events().len(),
        }
    }

    pub fn inspect_mesh(scene: &Scene, id: MeshId) -> Option<MeshInfo> {
        scene.get(id).map(|node| MeshInfo {
            id,
            name: node.name.clone(),
            kind: node.shape.kind(),
            position: node.transform.position,
            solid: node.check_collisions,
            destination: node.portrait.map(|p| p.destination),
        })
    }

    /// Portrait triggers in registration order.
    pub fn list_triggers(scene: &Scene) -> Vec<MeshInfo> {
        scene
            .portrait_triggers()
            .filter_map(|(id, _)| Self::inspect_mesh(scene, id))
            .collect()
    }

    pub fn player_info(body: &Body) -> PlayerInfo {
        let bounds = body.bounds();
        PlayerInfo {
            position: body.position,
            feet: bounds.min.y,
        }
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub mesh_count: usize,
    pub solid_count: usize,
    pub trigger_count: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: meshes={} solid={} triggers={} pending_events={}",
            self.mesh_count, self.solid_count, self.trigger_count, self.pending_events
        )
    }
}

/// Detailed info about a single mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInfo {
    pub id: MeshId,
    pub name: String,
    pub kind: &'static str,
    pub position: Vec3,
    pub solid: bool,
    pub destination: Option<Vec3>,
}

impl std::fmt::Display for MeshInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mesh {} {} ({}) pos=({:.2}, {:.2}, {:.2})",
            self.id, self.name, self.kind, self.position.x, self.position.y, self.position.z
        )?;
        if self.solid {
            write!(f, " solid")?;
        }
        if let Some(d) = self.destination {
            write!(f, " -> ({:.0}, {:.0}, {:.0})", d.x, d.y, d.z)?;
        }
        Ok(())
    }
}

/// Where the player stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerInfo {
    pub position: Vec3,
    /// Height of the bottom of the collider.
    pub feet: f32,
}

impl std::fmt::Display for PlayerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player pos=({:.2}, {:.2}, {:.2}) feet={:.2}",
            self.position.x, self.position.y, self.position.z, self.feet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamhall_kernel::{MeshNode, MeshShape};

    fn slab() -> MeshShape {
        MeshShape::Box {
            width: 4.0,
            height: 6.0,
            depth: 0.3,
        }
    }

    fn gallery() -> (Scene, MeshId) {
        let mut scene = Scene::new();
        scene.add_mesh(MeshNode::at("floor", slab(), Vec3::ZERO).solid());
        let portrait = scene.add_mesh(
            MeshNode::at("portrait_0", slab(), Vec3::new(-14.5, 3.0, 20.0))
                .portrait(Vec3::new(1000.0, 2.0, 0.0)),
        );
        (scene, portrait)
    }

    #[test]
    fn summary_empty_scene() {
        let summary = SceneInspector::summary(&Scene::new());
        assert_eq!(summary.mesh_count, 0);
        assert_eq!(summary.trigger_count, 0);
        assert_eq!(summary.pending_events, 0);
    }

    #[test]
    fn summary_counts_solids_and_triggers() {
        let (mut scene, portrait) = gallery();
        scene.record_teleport(portrait, Vec3::ZERO, Vec3::new(1000.0, 2.0, 0.0));

        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.mesh_count, 2);
        assert_eq!(summary.solid_count, 1);
        assert_eq!(summary.trigger_count, 1);
        assert_eq!(summary.pending_events, 3); // 2 adds + 1 teleport
    }

    #[test]
    fn inspect_portrait() {
        let (scene, portrait) = gallery();
        let info = SceneInspector::inspect_mesh(&scene, portrait).unwrap();
        assert_eq!(info.name, "portrait_0");
        assert!(!info.solid);
        assert_eq!(info.destination, Some(Vec3::new(1000.0, 2.0, 0.0)));
        assert!(info.to_string().ends_with("-> (1000, 2, 0)"));
    }

    #[test]
    fn inspect_missing_mesh() {
        let (scene, _) = gallery();
        assert!(SceneInspector::inspect_mesh(&scene, MeshId(99)).is_none());
    }

    #[test]
    fn triggers_listed_in_order() {
        let (scene, portrait) = gallery();
        let triggers = SceneInspector::list_triggers(&scene);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].id, portrait);
    }

    #[test]
    fn player_feet_sit_below_centre() {
        let body = Body::new(Vec3::new(0.0, 1.0, 55.0));
        let info = SceneInspector::player_info(&body);
        assert_eq!(info.feet, 0.0);
        assert!(info.to_string().contains("feet=0.00"));
    }

    #[test]
    fn summary_display() {
        let summary = SceneInspector::summary(&Scene::new());
        assert!(summary.to_string().contains("meshes=0"));
    }
}
