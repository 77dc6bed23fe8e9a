//! Museum level construction.
//!
//! [`build_museum`] fills an empty [`Scene`] with the lobby ground, the
//! museum shell and its entrance stairs, three teleporting portraits on
//! pedestals, the dream platforms they lead to, and two lollipops.
//!
//! # Invariants
//! - Everything is solid except the portraits and the portrait back plane.
//! - Portraits are registered as triggers in order; portrait `i` leads to
//!   `DREAM_DESTINATIONS[i]`.
//! - No destination lies inside a portrait's bounds.
//! - The same seed yields the same materials and the same mesh order.

mod palette;

use dreamhall_assets::MaterialStore;
use dreamhall_common::{MeshId, Transform};
use dreamhall_kernel::{MeshNode, MeshShape, Scene};
use glam::Vec3;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, PI};

use palette::{CandyRng, Palette};

pub const MUSEUM_WIDTH: f32 = 40.0;
pub const MUSEUM_DEPTH: f32 = 80.0;
pub const MUSEUM_HEIGHT: f32 = 25.0;
pub const DOOR_WIDTH: f32 = 10.0;
pub const STEP_COUNT: usize = 6;

/// Where each portrait sends the player, by portrait index.
pub const DREAM_DESTINATIONS: [Vec3; 3] = [
    Vec3::new(1000.0, 2.0, 0.0),
    Vec3::new(2000.0, 2.0, 0.0),
    Vec3::new(3000.0, 2.0, 0.0),
];

/// Outside the entrance, facing the stairs.
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 1.0, 55.0);

const PORTRAIT_X: f32 = -MUSEUM_WIDTH / 2.0 + 5.5;
const PORTRAIT_START_Z: f32 = 20.0;
const PORTRAIT_SPACING: f32 = 12.0;

/// Handles into the built level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuseumLayout {
    /// Portrait meshes in trigger order.
    pub portraits: Vec<MeshId>,
    pub destinations: Vec<Vec3>,
    pub spawn: Vec3,
}

/// Build the level into `scene`, registering materials in `materials`.
/// `seed` drives the lollipop colours.
pub fn build_museum(scene: &mut Scene, materials: &mut MaterialStore, seed: u64) -> MuseumLayout {
    scene.clear_color = [1.0, 0.9, 1.0];
    scene.light.direction = Vec3::Y;
    scene.light.intensity = 1.2;

    let palette = Palette::register(materials);

    scene.add_mesh(
        MeshNode::at(
            "lobbyGround",
            MeshShape::Ground {
                width: 300.0,
                height: 300.0,
            },
            Vec3::ZERO,
        )
        .with_material(palette.ground)
        .solid(),
    );

    add_shell(scene, &palette);
    add_stairs(scene, &palette);
    let portraits = add_portraits(scene, materials);
    add_dream_platforms(scene, &palette);

    let mut rng = CandyRng::new(seed);
    add_lollipop(scene, materials, &mut rng, "lollipop1", Vec3::new(-10.0, 2.0, 35.0));
    add_lollipop(scene, materials, &mut rng, "lollipop2", Vec3::new(10.0, 2.0, 35.0));

    tracing::debug!(
        meshes = scene.mesh_count(),
        triggers = scene.trigger_count(),
        materials = materials.len(),
        "museum built"
    );

    MuseumLayout {
        portraits,
        destinations: DREAM_DESTINATIONS.to_vec(),
        spawn: SPAWN_POINT,
    }
}

fn cuboid(width: f32, height: f32, depth: f32) -> MeshShape {
    MeshShape::Box {
        width,
        height,
        depth,
    }
}

fn add_shell(scene: &mut Scene, palette: &Palette) {
    let wall_y = MUSEUM_HEIGHT / 2.0 + 0.5;
    let half_w = MUSEUM_WIDTH / 2.0;
    let half_d = MUSEUM_DEPTH / 2.0;
    let front_w = (MUSEUM_WIDTH - DOOR_WIDTH) / 2.0;
    let front_x = (MUSEUM_WIDTH + DOOR_WIDTH) / 4.0;

    let pieces = [
        (
            "floor",
            cuboid(MUSEUM_WIDTH, 1.0, MUSEUM_DEPTH),
            Vec3::new(0.0, 0.5, 0.0),
        ),
        (
            "leftWall",
            cuboid(1.0, MUSEUM_HEIGHT, MUSEUM_DEPTH),
            Vec3::new(-half_w, wall_y, 0.0),
        ),
        (
            "rightWall",
            cuboid(1.0, MUSEUM_HEIGHT, MUSEUM_DEPTH),
            Vec3::new(half_w, wall_y, 0.0),
        ),
        (
            "backWall",
            cuboid(MUSEUM_WIDTH, MUSEUM_HEIGHT, 1.0),
            Vec3::new(0.0, wall_y, -half_d),
        ),
        (
            "frontWallLeft",
            cuboid(front_w, MUSEUM_HEIGHT, 1.0),
            Vec3::new(-front_x, wall_y, half_d),
        ),
        (
            "frontWallRight",
            cuboid(front_w, MUSEUM_HEIGHT, 1.0),
            Vec3::new(front_x, wall_y, half_d),
        ),
        (
            "roof",
            cuboid(MUSEUM_WIDTH, 1.0, MUSEUM_DEPTH),
            Vec3::new(0.0, MUSEUM_HEIGHT + 0.5, 0.0),
        ),
    ];

    for (name, shape, position) in pieces {
        scene.add_mesh(
            MeshNode::at(name, shape, position)
                .with_material(palette.wall)
                .solid(),
        );
    }
}

fn add_stairs(scene: &mut Scene, palette: &Palette) {
    const STEP_HEIGHT: f32 = 0.5;
    const STEP_DEPTH: f32 = 1.0;
    let top_z = MUSEUM_DEPTH / 2.0;

    for i in 0..STEP_COUNT {
        let y = (i + 1) as f32 * STEP_HEIGHT / 2.0 - 0.7;
        let z = top_z + STEP_DEPTH * (STEP_COUNT - i) as f32 - STEP_DEPTH * 0.5;
        scene.add_mesh(
            MeshNode::at(
                format!("step_{i}"),
                cuboid(DOOR_WIDTH, STEP_HEIGHT, STEP_DEPTH),
                Vec3::new(0.0, y, z),
            )
            .with_material(palette.wall)
            .solid(),
        );
    }
}

fn add_portraits(scene: &mut Scene, materials: &mut MaterialStore) -> Vec<MeshId> {
    let mut portraits = Vec::with_capacity(DREAM_DESTINATIONS.len());

    for (i, destination) in DREAM_DESTINATIONS.into_iter().enumerate() {
        let z = PORTRAIT_START_Z - i as f32 * PORTRAIT_SPACING;
        let position = Vec3::new(PORTRAIT_X, 3.0, z);

        let material = materials.register(palette::portrait(i));
        let id = scene.add_mesh(
            MeshNode::new(
                format!("portrait_{i}"),
                cuboid(4.0, 6.0, 0.3),
                Transform::from_position(position).with_yaw(-FRAC_PI_2),
            )
            .with_material(material)
            .portrait(destination),
        );
        portraits.push(id);

        if i == 0 {
            let back = materials.register(palette::portrait_back(i));
            let mut node = MeshNode::new(
                format!("portrait_back_{i}"),
                MeshShape::Plane {
                    width: 4.0,
                    height: 6.0,
                },
                Transform::from_position(position + Vec3::new(0.15, 0.0, 0.0))
                    .with_yaw(-FRAC_PI_2 + PI),
            )
            .with_material(back);
            node.is_pickable = false;
            scene.add_mesh(node);
        }

        let pedestal = materials.register(palette::pedestal(i));
        scene.add_mesh(
            MeshNode::at(
                format!("socle_{i}"),
                MeshShape::Cylinder {
                    diameter: 2.5,
                    height: 0.4,
                },
                Vec3::new(PORTRAIT_X, 0.2, z),
            )
            .with_material(pedestal)
            .solid(),
        );
    }

    portraits
}

fn add_dream_platforms(scene: &mut Scene, palette: &Palette) {
    for (i, destination) in DREAM_DESTINATIONS.into_iter().enumerate() {
        scene.add_mesh(
            MeshNode::at(
                format!("dream_platform_{i}"),
                cuboid(300.0, 2.0, 300.0),
                destination,
            )
            .with_material(palette.ground)
            .solid(),
        );
    }
}

fn add_lollipop(
    scene: &mut Scene,
    materials: &mut MaterialStore,
    rng: &mut CandyRng,
    name: &str,
    position: Vec3,
) {
    let stick = materials.register(palette::stick(name));
    scene.add_mesh(
        MeshNode::at(
            format!("{name}_stick"),
            MeshShape::Cylinder {
                diameter: 0.2,
                height: 4.0,
            },
            position - Vec3::new(0.0, 2.0, 0.0),
        )
        .with_material(stick)
        .solid(),
    );

    let candy = materials.register(palette::candy(name, rng));
    scene.add_mesh(
        MeshNode::at(
            format!("{name}_head"),
            MeshShape::Sphere {
                diameter: 1.5,
                segments: 16,
            },
            position,
        )
        .with_material(candy)
        .solid(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamhall_controller::{Controller, ControllerConfig, Player};
    use dreamhall_kernel::Body;
    use dreamhall_render::OrbitCamera;

    fn museum(seed: u64) -> (Scene, MaterialStore, MuseumLayout) {
        let mut scene = Scene::new();
        let mut materials = MaterialStore::new();
        let layout = build_museum(&mut scene, &mut materials, seed);
        (scene, materials, layout)
    }

    fn count_prefix(scene: &Scene, prefix: &str) -> usize {
        scene
            .meshes()
            .filter(|(_, node)| node.name.starts_with(prefix))
            .count()
    }

    #[test]
    fn builds_every_piece() {
        let (scene, _, layout) = museum(0);
        assert_eq!(scene.clear_color, [1.0, 0.9, 1.0]);
        assert_eq!(scene.light.intensity, 1.2);
        assert_eq!(count_prefix(&scene, "step_"), STEP_COUNT);
        assert_eq!(count_prefix(&scene, "socle_"), 3);
        assert_eq!(count_prefix(&scene, "dream_platform_"), 3);
        assert_eq!(count_prefix(&scene, "lollipop"), 4);
        assert!(scene.find_by_name("portrait_back_0").is_some());
        assert!(scene.find_by_name("portrait_back_1").is_none());
        // ground, 7 shell pieces, 6 steps, 3 portraits, 1 back, 3 pedestals,
        // 3 platforms, 2 lollipops of 2 meshes each
        assert_eq!(scene.mesh_count(), 1 + 7 + 6 + 3 + 1 + 3 + 3 + 4);
        assert_eq!(layout.portraits.len(), 3);
        assert_eq!(scene.trigger_count(), 3);
        assert_eq!(layout.spawn, SPAWN_POINT);
    }

    #[test]
    fn only_portrait_meshes_are_walk_through() {
        let (scene, _, _) = museum(0);
        for (_, node) in scene.meshes() {
            let expect_solid = !node.name.starts_with("portrait");
            assert_eq!(node.check_collisions, expect_solid, "{}", node.name);
        }
        for (_, node) in scene.portrait_triggers() {
            assert!(!node.is_pickable);
        }
    }

    #[test]
    fn front_wall_leaves_a_door() {
        let (scene, _, _) = museum(0);
        let (_, left) = scene.find_by_name("frontWallLeft").unwrap();
        let (_, right) = scene.find_by_name("frontWallRight").unwrap();
        assert_eq!(left.transform.position.x, -12.5);
        assert_eq!(right.transform.position.x, 12.5);
        assert!((left.bounds().max.x + DOOR_WIDTH / 2.0).abs() < 1e-4);
        assert!((right.bounds().min.x - DOOR_WIDTH / 2.0).abs() < 1e-4);
    }

    #[test]
    fn stairs_descend_away_from_the_door() {
        let (scene, _, _) = museum(0);
        let (_, bottom) = scene.find_by_name("step_0").unwrap();
        let (_, top) = scene.find_by_name("step_5").unwrap();
        assert!((bottom.transform.position.y - -0.45).abs() < 1e-6);
        assert_eq!(bottom.transform.position.z, 45.5);
        assert!((top.transform.position.y - 0.8).abs() < 1e-6);
        assert_eq!(top.transform.position.z, 40.5);
    }

    #[test]
    fn portraits_lead_to_their_platforms() {
        let (scene, _, layout) = museum(0);
        let triggers: Vec<_> = scene.portrait_triggers().collect();
        for (i, (id, node)) in triggers.into_iter().enumerate() {
            assert_eq!(id, layout.portraits[i]);
            assert_eq!(node.name, format!("portrait_{i}"));
            assert_eq!(node.portrait.unwrap().destination, DREAM_DESTINATIONS[i]);
            let (_, platform) = scene.find_by_name(&format!("dream_platform_{i}")).unwrap();
            assert_eq!(platform.transform.position, DREAM_DESTINATIONS[i]);
        }
    }

    #[test]
    fn portraits_are_turned_to_face_the_room() {
        let (scene, _, layout) = museum(0);
        let bounds = scene.world_bounds(layout.portraits[0]).unwrap();
        // Width runs along z after the quarter turn.
        assert!((bounds.half_extents().z - 2.0).abs() < 1e-4);
        assert!((bounds.half_extents().x - 0.15).abs() < 1e-4);
        assert!((bounds.center() - Vec3::new(-14.5, 3.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn no_destination_is_inside_a_trigger() {
        let (scene, _, layout) = museum(0);
        for destination in &layout.destinations {
            for (id, _) in scene.portrait_triggers() {
                let bounds = scene.world_bounds(id).unwrap();
                assert!(!bounds.contains_point(*destination));
                let body = Body::new(*destination);
                assert!(!scene.intersects_mesh(&body.bounds(), id));
            }
        }
    }

    #[test]
    fn materials_are_shared_and_textured() {
        let (scene, materials, _) = museum(0);
        let (_, floor) = scene.find_by_name("floor").unwrap();
        let (_, roof) = scene.find_by_name("roof").unwrap();
        assert_eq!(floor.material, roof.material);

        let wall = materials.require(floor.material.unwrap()).unwrap();
        let diffuse = wall.diffuse_texture.as_ref().unwrap();
        assert_eq!((diffuse.u_scale, diffuse.v_scale), (6.0, 6.0));
        assert!(wall.bump_texture.is_some());

        let paths = materials.texture_paths();
        assert!(paths.contains(&"assets/textures/cake_base.jpg"));
        assert!(paths.contains(&"assets/textures/backDream1.png"));
    }

    #[test]
    fn lollipop_heads_follow_the_seed() {
        let head_colour = |seed| {
            let (scene, materials, _) = museum(seed);
            let (_, head) = scene.find_by_name("lollipop1_head").unwrap();
            let material = materials.require(head.material.unwrap()).unwrap();
            assert_eq!(material.alpha, 0.9);
            assert!(material.is_translucent());
            material.diffuse_color
        };
        assert_eq!(head_colour(42), head_colour(42));
        assert_ne!(head_colour(42), head_colour(43));
    }

    #[test]
    fn same_seed_same_scene() {
        let (a, ma, _) = museum(9);
        let (b, mb, _) = museum(9);
        let names = |s: &Scene| s.meshes().map(|(_, n)| n.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
        assert_eq!(ma.len(), mb.len());
    }

    fn standing_at(position: Vec3) -> Player<Body> {
        Player::new(Body::new(position))
    }

    #[test]
    fn each_portrait_teleports_in_one_update() {
        let (scene, _, layout) = museum(0);
        for (i, destination) in layout.destinations.iter().enumerate() {
            let z = PORTRAIT_START_Z - i as f32 * PORTRAIT_SPACING;
            let mut player = standing_at(Vec3::new(PORTRAIT_X, 2.0, z));
            let mut camera = OrbitCamera::default();
            let mut controller = Controller::new(ControllerConfig::default());

            let report = controller.update(&scene, &mut player, &mut camera);

            let teleport = report.teleport.expect("teleport");
            assert_eq!(teleport.trigger, layout.portraits[i]);
            assert_eq!(player.root.unwrap().position, *destination);
            assert_eq!(camera.target, *destination);
        }
    }

    #[test]
    fn landing_on_a_platform_settles_on_top() {
        let (scene, _, _) = museum(0);
        let mut player = standing_at(Vec3::new(PORTRAIT_X, 2.0, PORTRAIT_START_Z));
        let mut camera = OrbitCamera::default();
        let mut controller = Controller::new(ControllerConfig::default());

        controller.update(&scene, &mut player, &mut camera);
        let report = controller.update(&scene, &mut player, &mut camera);

        assert!(report.teleport.is_none());
        let body = player.root.unwrap();
        // Platform top is y=3; the body's centre sits one unit above it.
        assert!((body.position.y - 4.0).abs() < 1e-3);
        assert_eq!(body.position.x, 1000.0);
    }

    #[test]
    fn walks_up_the_stairs_into_the_museum() {
        let (scene, _, layout) = museum(0);
        let mut player = Player::new(Body::new(layout.spawn)).with_speed(0.1);
        let mut camera = OrbitCamera::default();
        let mut controller = Controller::new(ControllerConfig::default());

        controller.key_down("z", None);
        for _ in 0..200 {
            let report = controller.update(&scene, &mut player, &mut camera);
            assert!(report.teleport.is_none());
        }

        let body = player.root.unwrap();
        assert!(body.position.z < 40.0, "stuck at {}", body.position);
        // Standing on the museum floor, whose top is y=1.
        assert!((body.position.y - 2.0).abs() < 0.05, "at {}", body.position);
    }

    #[test]
    fn side_wall_stops_the_player() {
        let (scene, _, _) = museum(0);
        let mut player = standing_at(Vec3::new(0.0, 2.0, 30.0)).with_speed(0.5);
        let mut camera = OrbitCamera::default();
        let mut controller = Controller::new(ControllerConfig::default());

        controller.key_down("d", None);
        for _ in 0..100 {
            controller.update(&scene, &mut player, &mut camera);
        }

        let body = player.root.unwrap();
        // Right wall's inner face is x=19.5.
        assert!(body.position.x <= 19.0 + 1e-3);
        assert!(body.position.x > 18.9);
    }
}
