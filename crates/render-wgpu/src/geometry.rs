use bytemuck::{Pod, Zeroable};
use dreamhall_kernel::MeshShape;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Side subdivisions of the unit cylinder.
const CYLINDER_SEGMENTS: u32 = 24;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

fn vertex(position: Vec3, normal: Vec3) -> Vertex {
    Vertex {
        position: position.to_array(),
        normal: normal.to_array(),
    }
}

/// Which unit mesh a shape is drawn with. Spheres are keyed by their
/// tessellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeshKind {
    Box,
    Cylinder,
    Sphere { segments: u32 },
    Plane,
    Ground,
}

impl MeshKind {
    pub fn of(shape: &MeshShape) -> Self {
        match *shape {
            MeshShape::Box { .. } => MeshKind::Box,
            MeshShape::Cylinder { .. } => MeshKind::Cylinder,
            MeshShape::Sphere { segments, .. } => MeshKind::Sphere {
                segments: segments.max(3),
            },
            MeshShape::Plane { .. } => MeshKind::Plane,
            MeshShape::Ground { .. } => MeshKind::Ground,
        }
    }

    pub fn build(self) -> UnitMesh {
        match self {
            MeshKind::Box => unit_box(),
            MeshKind::Cylinder => unit_cylinder(CYLINDER_SEGMENTS),
            MeshKind::Sphere { segments } => unit_sphere(segments),
            MeshKind::Plane => unit_plane(),
            MeshKind::Ground => unit_ground(),
        }
    }
}

/// Scale taking the unit mesh of `shape` to its real dimensions.
pub(crate) fn shape_scale(shape: &MeshShape) -> Mat4 {
    let size = match *shape {
        MeshShape::Box {
            width,
            height,
            depth,
        } => Vec3::new(width, height, depth),
        MeshShape::Cylinder { diameter, height } => Vec3::new(diameter, height, diameter),
        MeshShape::Sphere { diameter, .. } => Vec3::splat(diameter),
        MeshShape::Plane { width, height } => Vec3::new(width, height, 1.0),
        MeshShape::Ground { width, height } => Vec3::new(width, 1.0, height),
    };
    Mat4::from_scale(size)
}

/// Indexed triangle list spanning [-0.5, 0.5] on every used axis.
/// Triangles wind counter-clockwise seen from outside.
#[derive(Debug, Clone, Default)]
pub struct UnitMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl UnitMesh {
    fn quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|&c| vertex(c, normal)));
        self.indices
            .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

fn unit_box() -> UnitMesh {
    let p = 0.5_f32;
    let mut mesh = UnitMesh::default();
    #[rustfmt::skip]
    let faces = [
        ([[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]], Vec3::Z),
        ([[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]], Vec3::NEG_Z),
        ([[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]], Vec3::X),
        ([[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]], Vec3::NEG_X),
        ([[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]], Vec3::Y),
        ([[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]], Vec3::NEG_Y),
    ];
    for (corners, normal) in faces {
        mesh.quad(corners.map(Vec3::from_array), normal);
    }
    mesh
}

/// Upright quad in the XY plane, visible from both sides.
fn unit_plane() -> UnitMesh {
    let p = 0.5_f32;
    let mut mesh = UnitMesh::default();
    mesh.quad(
        [
            Vec3::new(-p, -p, 0.0),
            Vec3::new(p, -p, 0.0),
            Vec3::new(p, p, 0.0),
            Vec3::new(-p, p, 0.0),
        ],
        Vec3::Z,
    );
    mesh.quad(
        [
            Vec3::new(p, -p, 0.0),
            Vec3::new(-p, -p, 0.0),
            Vec3::new(-p, p, 0.0),
            Vec3::new(p, p, 0.0),
        ],
        Vec3::NEG_Z,
    );
    mesh
}

/// Horizontal quad facing up.
fn unit_ground() -> UnitMesh {
    let p = 0.5_f32;
    let mut mesh = UnitMesh::default();
    mesh.quad(
        [
            Vec3::new(-p, 0.0, p),
            Vec3::new(p, 0.0, p),
            Vec3::new(p, 0.0, -p),
            Vec3::new(-p, 0.0, -p),
        ],
        Vec3::Y,
    );
    mesh
}

/// Ring point at angle `theta` in the XZ plane.
fn ring(theta: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(radius * theta.cos(), y, radius * theta.sin())
}

/// Connect two rings of `count + 1` vertices each (first and last coincide).
fn stitch(indices: &mut Vec<u32>, upper: u32, lower: u32, count: u32) {
    for i in 0..count {
        let (t0, t1) = (upper + i, upper + i + 1);
        let (b0, b1) = (lower + i, lower + i + 1);
        indices.extend([b0, t0, t1, b0, t1, b1]);
    }
}

fn unit_cylinder(segments: u32) -> UnitMesh {
    let r = 0.5_f32;
    let mut mesh = UnitMesh::default();
    let angle = |i: u32| i as f32 / segments as f32 * TAU;

    // Side
    let top = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let normal = ring(angle(i), 1.0, 0.0);
        mesh.vertices.push(vertex(ring(angle(i), r, r), normal));
    }
    let bottom = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let normal = ring(angle(i), 1.0, 0.0);
        mesh.vertices.push(vertex(ring(angle(i), r, -r), normal));
    }
    stitch(&mut mesh.indices, top, bottom, segments);

    // Caps
    for (y, normal) in [(r, Vec3::Y), (-r, Vec3::NEG_Y)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(vertex(Vec3::new(0.0, y, 0.0), normal));
        let rim = mesh.vertices.len() as u32;
        for i in 0..=segments {
            mesh.vertices.push(vertex(ring(angle(i), r, y), normal));
        }
        for i in 0..segments {
            let (a, b) = (rim + i, rim + i + 1);
            if y > 0.0 {
                mesh.indices.extend([center, b, a]);
            } else {
                mesh.indices.extend([center, a, b]);
            }
        }
    }
    mesh
}

/// UV sphere with `segments` latitude bands and twice as many longitude
/// bands.
fn unit_sphere(segments: u32) -> UnitMesh {
    let r = 0.5_f32;
    let rings = segments;
    let sectors = segments * 2;
    let mut mesh = UnitMesh::default();

    for j in 0..=rings {
        let phi = j as f32 / rings as f32 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for i in 0..=sectors {
            let theta = i as f32 / sectors as f32 * TAU;
            let normal = ring(theta, sin_phi, cos_phi);
            mesh.vertices.push(vertex(normal * r, normal));
        }
    }
    let stride = sectors + 1;
    for j in 0..rings {
        stitch(&mut mesh.indices, j * stride, (j + 1) * stride, sectors);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds() -> [MeshKind; 5] {
        [
            MeshKind::Box,
            MeshKind::Cylinder,
            MeshKind::Sphere { segments: 16 },
            MeshKind::Plane,
            MeshKind::Ground,
        ]
    }

    #[test]
    fn unit_meshes_fit_the_unit_cube() {
        for kind in kinds() {
            let mesh = kind.build();
            assert!(!mesh.indices.is_empty(), "{kind:?}");
            for v in &mesh.vertices {
                assert!(v.position.iter().all(|c| c.abs() <= 0.5 + 1e-5), "{kind:?}");
                assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-4, "{kind:?}");
            }
            let count = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < count), "{kind:?}");
            assert_eq!(mesh.indices.len() % 3, 0);
        }
    }

    #[test]
    fn triangles_face_outward() {
        for kind in kinds() {
            let mesh = kind.build();
            for tri in mesh.indices.chunks(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
                let (pa, pb, pc) = (
                    Vec3::from(a.position),
                    Vec3::from(b.position),
                    Vec3::from(c.position),
                );
                let face = (pb - pa).cross(pc - pa);
                let normal = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
                // Pole triangles of the sphere are degenerate.
                assert!(face.dot(normal) >= -1e-6, "{kind:?} winds inward");
            }
        }
    }

    #[test]
    fn sphere_tessellation_follows_segments() {
        let coarse = MeshKind::Sphere { segments: 4 }.build();
        let fine = MeshKind::Sphere { segments: 16 }.build();
        assert!(fine.indices.len() > coarse.indices.len());
        assert_eq!(coarse.vertices.len(), 5 * 9);
    }

    #[test]
    fn shapes_map_to_kinds() {
        let sphere = MeshShape::Sphere {
            diameter: 1.5,
            segments: 16,
        };
        assert_eq!(MeshKind::of(&sphere), MeshKind::Sphere { segments: 16 });
        let scale = shape_scale(&sphere);
        assert_eq!(scale.transform_point3(Vec3::splat(0.5)), Vec3::splat(0.75));

        let ground = MeshShape::Ground {
            width: 300.0,
            height: 200.0,
        };
        assert_eq!(MeshKind::of(&ground), MeshKind::Ground);
        assert_eq!(
            shape_scale(&ground).transform_point3(Vec3::new(0.5, 0.0, 0.5)),
            Vec3::new(150.0, 0.0, 100.0)
        );
    }
}
