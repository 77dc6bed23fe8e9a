use dreamhall_common::{Aabb, MeshId};
use dreamhall_kernel::{Body, Scene};
use dreamhall_render::OrbitCamera;
use glam::{Mat4, Vec3};

use crate::capability::{ControllerScene, PlayerRoot, TriggerRef, ViewCamera};

impl PlayerRoot for Body {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn bounds(&self) -> Aabb {
        Body::bounds(self)
    }
}

impl ControllerScene for Scene {
    type Root = Body;

    fn move_with_collisions(&self, root: &mut Body, displacement: Vec3) {
        Scene::move_with_collisions(self, root, displacement);
    }

    fn portrait_triggers(&self) -> impl Iterator<Item = TriggerRef<'_>> {
        Scene::portrait_triggers(self).filter_map(|(id, node)| {
            node.portrait.map(|portrait| TriggerRef {
                id,
                name: node.name.as_str(),
                destination: portrait.destination,
            })
        })
    }

    fn intersects(&self, root: &Body, trigger: MeshId) -> bool {
        self.intersects_mesh(&Body::bounds(root), trigger)
    }
}

impl ViewCamera for OrbitCamera {
    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn world_matrix(&self) -> Mat4 {
        OrbitCamera::world_matrix(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamhall_kernel::{MeshNode, MeshShape};

    #[test]
    fn scene_exposes_registered_portraits() {
        let mut scene = Scene::new();
        scene.add_mesh(MeshNode::at(
            "wall",
            MeshShape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Vec3::ZERO,
        ));
        let id = scene.add_mesh(
            MeshNode::at(
                "portrait_0",
                MeshShape::Box {
                    width: 4.0,
                    height: 6.0,
                    depth: 0.3,
                },
                Vec3::new(0.0, 3.0, 0.0),
            )
            .portrait(Vec3::new(1000.0, 2.0, 0.0)),
        );

        let triggers: Vec<TriggerRef<'_>> = ControllerScene::portrait_triggers(&scene).collect();
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].id, id);
        assert_eq!(triggers[0].name, "portrait_0");

        let body = Body::new(Vec3::new(0.0, 1.0, 0.0));
        assert!(ControllerScene::intersects(&scene, &body, id));
    }

    #[test]
    fn body_root_round_trips_position() {
        let mut body = Body::default();
        PlayerRoot::set_position(&mut body, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(PlayerRoot::position(&body), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn orbit_camera_world_matrix_matches() {
        let cam = OrbitCamera::default();
        assert_eq!(ViewCamera::world_matrix(&cam), cam.world_matrix());
    }
}
