use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dreamhall_assets::MaterialStore;
use dreamhall_controller::{Controller, ControllerConfig, Player};
use dreamhall_input::HeadlessPointer;
use dreamhall_kernel::{Body, Scene};
use dreamhall_museum::{MuseumLayout, build_museum};
use dreamhall_render::{DebugTextRenderer, OrbitCamera, Renderer};
use dreamhall_tools::{MeshInfo, SceneInspector};
use glam::Vec3;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dreamhall-cli", about = "Headless tool for the dream museum")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed for the lollipop colours
    #[arg(long, default_value = "0", global = true)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and level statistics
    Info,
    /// Dump the built level
    Layout {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Hold keys for a number of frames and report where the player ends up
    Walk {
        /// Keys held for the whole walk, e.g. z,d
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u32,
        /// Start position x,y,z (defaults to the spawn point)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        start: Option<Vec<f32>>,
        /// Horizontal mouse motion per frame, in pixels; engages capture
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        turn: f32,
        /// Controller configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    layout: &'a MuseumLayout,
    clear_color: [f32; 3],
    meshes: Vec<MeshEntry>,
    textures: Vec<&'a str>,
}

#[derive(Serialize)]
struct MeshEntry {
    id: u32,
    name: String,
    kind: &'static str,
    position: Vec3,
    solid: bool,
    destination: Option<Vec3>,
}

impl From<MeshInfo> for MeshEntry {
    fn from(info: MeshInfo) -> Self {
        Self {
            id: info.id.0,
            name: info.name,
            kind: info.kind,
            position: info.position,
            solid: info.solid,
            destination: info.destination,
        }
    }
}

fn museum(seed: u64) -> (Scene, MaterialStore, MuseumLayout) {
    let mut scene = Scene::new();
    let mut materials = MaterialStore::new();
    let layout = build_museum(&mut scene, &mut materials, seed);
    (scene, materials, layout)
}

fn parse_start(start: Option<Vec<f32>>, spawn: Vec3) -> anyhow::Result<Vec3> {
    match start.as_deref() {
        None => Ok(spawn),
        Some(&[x, y, z]) => Ok(Vec3::new(x, y, z)),
        Some(other) => bail!("--start needs three values, got {}", other.len()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let (scene, materials, layout) = museum(cli.seed);
            println!("dreamhall-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", dreamhall_render::crate_info());
            println!("{}", SceneInspector::summary(&scene));
            println!(
                "materials={} textures={}",
                materials.len(),
                materials.texture_paths().len()
            );
            println!(
                "spawn=({:.1}, {:.1}, {:.1})",
                layout.spawn.x, layout.spawn.y, layout.spawn.z
            );
            for trigger in SceneInspector::list_triggers(&scene) {
                println!("  {trigger}");
            }
        }
        Commands::Layout { json } => {
            let (scene, materials, layout) = museum(cli.seed);
            if json {
                let dump = LayoutDump {
                    layout: &layout,
                    clear_color: scene.clear_color,
                    meshes: scene
                        .meshes()
                        .filter_map(|(id, _)| SceneInspector::inspect_mesh(&scene, id))
                        .map(MeshEntry::from)
                        .collect(),
                    textures: materials.texture_paths(),
                };
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                let mut camera = OrbitCamera::default();
                camera.target = layout.spawn;
                print!(
                    "{}",
                    DebugTextRenderer::new().render(&scene, &camera.render_view())
                );
            }
        }
        Commands::Walk {
            keys,
            frames,
            start,
            turn,
            config,
        } => {
            let config = match config {
                Some(path) => ControllerConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => ControllerConfig::default(),
            };
            let (mut scene, _, layout) = museum(cli.seed);
            let start = parse_start(start, layout.spawn)?;

            let mut pointer = HeadlessPointer::new();
            let mut controller = Controller::new(config);
            let mut player = Player::new(Body::new(start));
            let mut camera = OrbitCamera::default();

            if turn != 0.0 {
                let capture = controller.config().bindings.toggle_pointer_lock.clone();
                controller.key_down(&capture, Some(&mut pointer));
                controller.key_up(&capture);
            }
            for key in &keys {
                controller.key_down(key, Some(&mut pointer));
            }

            println!(
                "Walk: keys={:?} frames={frames} start=({:.2}, {:.2}, {:.2})",
                keys, start.x, start.y, start.z
            );
            for frame in 0..frames {
                controller.mouse_move(turn, &pointer, &mut camera);
                let report = controller.update(&scene, &mut player, &mut camera);
                if let Some(tp) = report.teleport {
                    println!(
                        "frame {frame}: {} -> ({:.0}, {:.0}, {:.0})",
                        tp.name, tp.destination.x, tp.destination.y, tp.destination.z
                    );
                    scene.record_teleport(tp.trigger, tp.from, tp.destination);
                }
            }

            if let Some(body) = &player.root {
                println!("{}", SceneInspector::player_info(body));
            }
            println!("{}", SceneInspector::summary(&scene));
        }
    }

    Ok(())
}
