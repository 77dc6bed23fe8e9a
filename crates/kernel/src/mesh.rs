use dreamhall_common::{Aabb, MaterialId, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Primitive geometry a mesh is built from. Dimensions are in world units
/// before the node's own scale is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeshShape {
    Box { width: f32, height: f32, depth: f32 },
    Cylinder { diameter: f32, height: f32 },
    Sphere { diameter: f32, segments: u32 },
    /// Vertical quad in the local XY plane.
    Plane { width: f32, height: f32 },
    /// Horizontal quad in the local XZ plane.
    Ground { width: f32, height: f32 },
}

impl MeshShape {
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            MeshShape::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth) * 0.5,
            MeshShape::Cylinder { diameter, height } => {
                Vec3::new(diameter * 0.5, height * 0.5, diameter * 0.5)
            }
            MeshShape::Sphere { diameter, .. } => Vec3::splat(diameter * 0.5),
            MeshShape::Plane { width, height } => Vec3::new(width * 0.5, height * 0.5, 0.0),
            MeshShape::Ground { width, height } => Vec3::new(width * 0.5, 0.0, height * 0.5),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MeshShape::Box { .. } => "box",
            MeshShape::Cylinder { .. } => "cylinder",
            MeshShape::Sphere { .. } => "sphere",
            MeshShape::Plane { .. } => "plane",
            MeshShape::Ground { .. } => "ground",
        }
    }
}

/// Teleport metadata attached to a portrait mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortraitTrigger {
    pub destination: Vec3,
}

/// A mesh in the scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshNode {
    pub name: String,
    pub shape: MeshShape,
    pub transform: Transform,
    pub material: Option<MaterialId>,
    /// Solid meshes block collision-aware movement.
    pub check_collisions: bool,
    pub is_pickable: bool,
    pub portrait: Option<PortraitTrigger>,
}

impl MeshNode {
    /// A pickable, non-solid mesh with no material.
    pub fn new(name: impl Into<String>, shape: MeshShape, transform: Transform) -> Self {
        Self {
            name: name.into(),
            shape,
            transform,
            material: None,
            check_collisions: false,
            is_pickable: true,
            portrait: None,
        }
    }

    pub fn at(name: impl Into<String>, shape: MeshShape, position: Vec3) -> Self {
        Self::new(name, shape, Transform::from_position(position))
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn solid(mut self) -> Self {
        self.check_collisions = true;
        self
    }

    /// Tag as a teleport trigger: walk-through and not pickable.
    pub fn portrait(mut self, destination: Vec3) -> Self {
        self.check_collisions = false;
        self.is_pickable = false;
        self.portrait = Some(PortraitTrigger { destination });
        self
    }

    pub fn is_portrait(&self) -> bool {
        self.portrait.is_some()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::transformed(self.shape.half_extents(), &self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_is_flat() {
        let g = MeshShape::Ground {
            width: 300.0,
            height: 300.0,
        };
        assert_eq!(g.half_extents(), Vec3::new(150.0, 0.0, 150.0));
    }

    #[test]
    fn portrait_is_not_solid_or_pickable() {
        let node = MeshNode::at(
            "portrait_0",
            MeshShape::Box {
                width: 4.0,
                height: 6.0,
                depth: 0.3,
            },
            Vec3::ZERO,
        )
        .solid()
        .portrait(Vec3::new(1000.0, 2.0, 0.0));
        assert!(!node.check_collisions);
        assert!(!node.is_pickable);
        assert!(node.is_portrait());
    }

    #[test]
    fn bounds_follow_position() {
        let node = MeshNode::at(
            "step",
            MeshShape::Box {
                width: 10.0,
                height: 0.5,
                depth: 1.0,
            },
            Vec3::new(0.0, 1.0, 40.0),
        );
        let b = node.bounds();
        assert_eq!(b.min, Vec3::new(-5.0, 0.75, 39.5));
        assert_eq!(b.max, Vec3::new(5.0, 1.25, 40.5));
    }
}
