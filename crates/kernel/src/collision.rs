use dreamhall_common::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Scene;

/// Contact tolerance. Boxes closer than this count as touching.
const SKIN: f32 = 1e-4;

/// A movable collider: the player's root transform plus its box collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center of the collider.
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Maximum ledge height climbed while moving horizontally.
    pub step_offset: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            half_extents: Vec3::new(0.5, 1.0, 0.5),
            step_offset: 0.3,
        }
    }
}

impl Body {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

impl Scene {
    /// Move `body` by `displacement`, stopping at solid meshes and sliding
    /// along them. Climbs ledges up to the body's step offset.
    pub fn move_with_collisions(&self, body: &mut Body, displacement: Vec3) {
        let solids: Vec<Aabb> = self.solid_bounds().collect();
        depenetrate(body, &solids);

        let bounds = body.bounds();
        let mut offset = resolve(bounds, displacement, &solids);

        let horizontal = Vec3::new(displacement.x, 0.0, displacement.z);
        let wanted = horizontal.length();
        if body.step_offset > 0.0 && wanted > 0.0 && horizontal_len(offset) + SKIN < wanted {
            let lift = sweep_axis(&bounds, 1, body.step_offset, &solids);
            let raised = bounds.translated(Vec3::Y * lift);
            let stepped = resolve(raised, horizontal, &solids);
            let drop = sweep_axis(&raised.translated(stepped), 1, displacement.y - lift, &solids);
            let candidate = Vec3::new(stepped.x, lift + drop, stepped.z);
            if horizontal_len(candidate) > horizontal_len(offset) + SKIN {
                tracing::trace!(lift, "stepped up");
                offset = candidate;
            }
        }

        body.position += offset;
    }
}

fn horizontal_len(v: Vec3) -> f32 {
    Vec3::new(v.x, 0.0, v.z).length()
}

/// Sweep `bounds` along x, then y, then z. Returns the offset actually
/// travelled.
fn resolve(bounds: Aabb, delta: Vec3, solids: &[Aabb]) -> Vec3 {
    let mut offset = Vec3::ZERO;
    let mut current = bounds;
    for axis in 0..3 {
        let travelled = sweep_axis(&current, axis, delta[axis], solids);
        offset[axis] = travelled;
        let mut step = Vec3::ZERO;
        step[axis] = travelled;
        current = current.translated(step);
    }
    offset
}

fn sweep_axis(bounds: &Aabb, axis: usize, delta: f32, solids: &[Aabb]) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }
    let mut allowed = delta;
    for solid in solids {
        if !overlaps_across(bounds, solid, axis) {
            continue;
        }
        if delta > 0.0 && bounds.max[axis] <= solid.min[axis] + SKIN {
            allowed = allowed.min((solid.min[axis] - bounds.max[axis]).max(0.0));
        } else if delta < 0.0 && bounds.min[axis] >= solid.max[axis] - SKIN {
            allowed = allowed.max((solid.max[axis] - bounds.min[axis]).min(0.0));
        }
    }
    allowed
}

/// Strict overlap on the two axes other than `axis`.
fn overlaps_across(a: &Aabb, b: &Aabb, axis: usize) -> bool {
    (0..3)
        .filter(|&i| i != axis)
        .all(|i| a.min[i] < b.max[i] - SKIN && a.max[i] > b.min[i] + SKIN)
}

/// Push the body out of any solid it is embedded in, along the axis of least
/// penetration. Upward pushes win ties.
fn depenetrate(body: &mut Body, solids: &[Aabb]) {
    for solid in solids {
        let bounds = body.bounds();
        let embedded = (0..3).all(|i| {
            bounds.min[i] < solid.max[i] - SKIN && bounds.max[i] > solid.min[i] + SKIN
        });
        if !embedded {
            continue;
        }
        let mut push = Vec3::ZERO;
        let mut best = f32::INFINITY;
        for axis in [1, 0, 2] {
            for amount in [
                solid.max[axis] - bounds.min[axis],
                solid.min[axis] - bounds.max[axis],
            ] {
                if amount.abs() < best {
                    best = amount.abs();
                    push = Vec3::ZERO;
                    push[axis] = amount;
                }
            }
        }
        tracing::debug!(?push, "depenetrating body");
        body.position += push;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshNode, MeshShape};

    fn floor_scene() -> Scene {
        let mut s = Scene::new();
        s.add_mesh(
            MeshNode::at(
                "ground",
                MeshShape::Ground {
                    width: 100.0,
                    height: 100.0,
                },
                Vec3::ZERO,
            )
            .solid(),
        );
        s
    }

    fn wall(s: &mut Scene, x: f32) {
        s.add_mesh(
            MeshNode::at(
                "wall",
                MeshShape::Box {
                    width: 1.0,
                    height: 10.0,
                    depth: 20.0,
                },
                Vec3::new(x, 5.0, 0.0),
            )
            .solid(),
        );
    }

    #[test]
    fn gravity_stops_on_ground() {
        let s = floor_scene();
        let mut body = Body::new(Vec3::new(0.0, 1.01, 0.0));
        s.move_with_collisions(&mut body, Vec3::new(0.0, -0.02, 0.0));
        assert!((body.position.y - 1.0).abs() < 1e-5);
        s.move_with_collisions(&mut body, Vec3::new(0.0, -0.02, 0.0));
        assert!((body.position.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn free_movement_is_unchanged() {
        let s = floor_scene();
        let mut body = Body::new(Vec3::new(0.0, 1.0, 0.0));
        s.move_with_collisions(&mut body, Vec3::new(0.3, 0.0, -0.4));
        assert!((body.position - Vec3::new(0.3, 1.0, -0.4)).length() < 1e-5);
    }

    #[test]
    fn walls_block_and_allow_sliding() {
        let mut s = floor_scene();
        wall(&mut s, 2.0);
        // Wall face at x = 1.5, body half width 0.5.
        let mut body = Body::new(Vec3::new(0.9, 1.0, 0.0));
        s.move_with_collisions(&mut body, Vec3::new(0.5, 0.0, 0.5));
        assert!((body.position.x - 1.0).abs() < 1e-5);
        assert!((body.position.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn low_ledges_are_climbed() {
        let mut s = floor_scene();
        s.add_mesh(
            MeshNode::at(
                "step",
                MeshShape::Box {
                    width: 4.0,
                    height: 0.25,
                    depth: 4.0,
                },
                Vec3::new(0.0, 0.125, -3.0),
            )
            .solid(),
        );
        // Step front face at z = -1.
        let mut body = Body::new(Vec3::new(0.0, 1.0, -0.45));
        s.move_with_collisions(&mut body, Vec3::new(0.0, 0.0, -0.2));
        assert!((body.position.z + 0.65).abs() < 1e-4);
        assert!((body.position.y - 1.25).abs() < 1e-4);
    }

    #[test]
    fn walls_are_not_climbed() {
        let mut s = floor_scene();
        wall(&mut s, 2.0);
        let mut body = Body::new(Vec3::new(1.0, 1.0, 0.0));
        s.move_with_collisions(&mut body, Vec3::new(0.2, 0.0, 0.0));
        assert_eq!(body.position, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn embedded_body_is_pushed_up() {
        let mut s = Scene::new();
        s.add_mesh(
            MeshNode::at(
                "platform",
                MeshShape::Box {
                    width: 300.0,
                    height: 2.0,
                    depth: 300.0,
                },
                Vec3::new(1000.0, 2.0, 0.0),
            )
            .solid(),
        );
        let mut body = Body::new(Vec3::new(1000.0, 2.0, 0.0));
        s.move_with_collisions(&mut body, Vec3::ZERO);
        assert!((body.position.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn non_solid_meshes_do_not_block() {
        let mut s = floor_scene();
        s.add_mesh(MeshNode::at(
            "ghost",
            MeshShape::Box {
                width: 1.0,
                height: 10.0,
                depth: 10.0,
            },
            Vec3::new(1.5, 5.0, 0.0),
        ));
        let mut body = Body::new(Vec3::new(0.0, 1.0, 0.0));
        s.move_with_collisions(&mut body, Vec3::new(3.0, 0.0, 0.0));
        assert!((body.position.x - 3.0).abs() < 1e-5);
    }
}
