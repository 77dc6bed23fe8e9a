//! Engine capabilities the controller depends on.

use dreamhall_common::{Aabb, MeshId};
use glam::{Mat4, Vec3};

/// The player's root transform.
pub trait PlayerRoot {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn bounds(&self) -> Aabb;
}

/// A portrait trigger as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerRef<'a> {
    pub id: MeshId,
    pub name: &'a str,
    pub destination: Vec3,
}

/// Scene-side services: collision-aware movement and trigger queries.
pub trait ControllerScene {
    type Root: PlayerRoot;

    /// Move `root` by `displacement`, resolving collisions against solid
    /// geometry.
    fn move_with_collisions(&self, root: &mut Self::Root, displacement: Vec3);

    /// Portrait triggers in a stable order.
    fn portrait_triggers(&self) -> impl Iterator<Item = TriggerRef<'_>>;

    /// Non-precise intersection between the root and a trigger mesh.
    fn intersects(&self, root: &Self::Root, trigger: MeshId) -> bool;
}

/// A camera with a target point and an orbit angle around the vertical.
pub trait ViewCamera {
    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, alpha: f32);
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    /// Camera-to-world transform: x column is right, -z column is forward.
    fn world_matrix(&self) -> Mat4;
}
