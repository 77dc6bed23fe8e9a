mod pointer;

use anyhow::{Context, Result};
use clap::Parser;
use dreamhall_assets::MaterialStore;
use dreamhall_controller::{Controller, ControllerConfig, Player};
use dreamhall_input::PointerSurface;
use dreamhall_kernel::{Body, Scene, SceneEvent};
use dreamhall_museum::{MuseumLayout, build_museum};
use dreamhall_render::OrbitCamera;
use dreamhall_render_wgpu::WgpuRenderer;
use dreamhall_tools::SceneInspector;
use egui::Context as EguiContext;
use pointer::WindowPointer;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Teleports kept for the HUD.
const RECENT_TELEPORTS: usize = 5;

#[derive(Parser)]
#[command(name = "dreamhall-desktop", about = "Walk through the dream museum")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Controller configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mouse-look radians per pixel; overrides the config file
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Walking speed in units per frame; overrides the config file
    #[arg(long)]
    speed: Option<f32>,

    /// Seed for the lollipop colours
    #[arg(long, default_value = "0")]
    seed: u64,
}

impl Cli {
    fn controller_config(&self) -> Result<ControllerConfig> {
        let mut config = match &self.config {
            Some(path) => ControllerConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ControllerConfig::default(),
        };
        if let Some(sensitivity) = self.sensitivity {
            config.mouse_sensitivity = sensitivity;
        }
        if let Some(speed) = self.speed {
            config.default_speed = speed;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Identifier for a logical key. Characters keep their case so the capture
/// toggle can tell `j` from Shift+J; the key-state map lowercases them.
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(s) => Some(s.to_string()),
        Key::Named(named) => Some(format!("{named:?}").to_lowercase()),
        _ => None,
    }
}

/// Application state.
struct AppState {
    scene: Scene,
    materials: MaterialStore,
    layout: MuseumLayout,
    controller: Controller,
    player: Player<Body>,
    camera: OrbitCamera,
    show_hud: bool,
    recent_teleports: VecDeque<String>,
}

impl AppState {
    /// Forward a key release to the controller. Presses are ignored.
    fn release_key(&mut self, key: &Key, state: ElementState) {
        if state != ElementState::Released {
            return;
        }
        if let Some(name) = key_name(key) {
            self.controller.key_up(&name);
        }
    }

    fn new(config: ControllerConfig, seed: u64) -> Self {
        let mut scene = Scene::new();
        let mut materials = MaterialStore::new();
        let layout = build_museum(&mut scene, &mut materials, seed);
        // Construction events are not interesting to the HUD.
        scene.drain_events();

        let player = Player::new(Body::new(layout.spawn));
        let mut camera = OrbitCamera::default();
        camera.target = layout.spawn;

        Self {
            scene,
            materials,
            layout,
            controller: Controller::new(config),
            player,
            camera,
            show_hud: true,
            recent_teleports: VecDeque::new(),
        }
    }

    fn update(&mut self) {
        let report = self
            .controller
            .update(&self.scene, &mut self.player, &mut self.camera);
        if let Some(teleport) = report.teleport {
            self.scene
                .record_teleport(teleport.trigger, teleport.from, teleport.destination);
        }

        for event in self.scene.drain_events() {
            if let SceneEvent::Teleported { trigger, to, .. } = event {
                if self.recent_teleports.len() == RECENT_TELEPORTS {
                    self.recent_teleports.pop_front();
                }
                self.recent_teleports.push_back(format!(
                    "{trigger} -> ({:.0}, {:.0}, {:.0})",
                    to.x, to.y, to.z
                ));
            }
        }
    }

    fn draw_ui(&self, ctx: &EguiContext, pointer_locked: bool) {
        if !self.show_hud {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);

        egui::SidePanel::left("hud")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Dreamhall");
                ui.separator();
                ui.label(format!(
                    "Meshes: {}  Solid: {}  Portraits: {}",
                    summary.mesh_count, summary.solid_count, summary.trigger_count
                ));
                if let Some(body) = &self.player.root {
                    ui.label(SceneInspector::player_info(body).to_string());
                }
                ui.label(format!("Camera alpha: {:.2}", self.camera.alpha));
                ui.label(format!(
                    "Pointer: {}",
                    if pointer_locked { "captured" } else { "free" }
                ));
                ui.separator();

                ui.heading("Portraits");
                for (i, destination) in self.layout.destinations.iter().enumerate() {
                    ui.label(format!(
                        "portrait_{i} -> ({:.0}, {:.0}, {:.0})",
                        destination.x, destination.y, destination.z
                    ));
                }
                ui.separator();

                ui.heading("Teleports");
                if self.recent_teleports.is_empty() {
                    ui.label("none yet");
                }
                for line in &self.recent_teleports {
                    ui.label(line);
                }

                ui.separator();
                ui.small("F1: Toggle HUD | J: Capture mouse | Z/Q/S/D: Move");
            });
    }
}

/// Window, GPU and UI resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn init(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Dreamhall")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("dreamhall_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw(&mut self, state: &AppState, egui_ctx: &EguiContext, pointer_locked: bool) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            &state.scene,
            &state.materials,
            state.player.root.as_ref(),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, pointer_locked);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    pointer: Option<WindowPointer>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            pointer: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn pointer_locked(&self) -> bool {
        self.pointer.as_ref().is_some_and(|p| p.is_locked())
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.logical_key == Key::Named(NamedKey::F1) {
            if event.state == ElementState::Pressed && !event.repeat {
                self.state.show_hud = !self.state.show_hud;
            }
            return;
        }
        let Some(key) = key_name(&event.logical_key) else {
            return;
        };
        match event.state {
            ElementState::Pressed if !event.repeat => {
                let surface = self
                    .pointer
                    .as_mut()
                    .map(|p| p as &mut dyn PointerSurface);
                self.state.controller.key_down(&key, surface);
            }
            ElementState::Pressed => {}
            ElementState::Released => self.state.controller.key_up(&key),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::init(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.camera.aspect = gpu.aspect();
                self.pointer = Some(WindowPointer::new(gpu.window.clone()));
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize window: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            // Releases still reach the controller so no key stays held.
            if let WindowEvent::KeyboardInput { event, .. } = &event {
                self.state.release_key(&event.logical_key, event.state);
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.state.camera.aspect = gpu.aspect();
            }
            WindowEvent::Focused(false) => {
                // Losing focus releases capture, like a browser does.
                if let Some(pointer) = self.pointer.as_mut().filter(|p| p.is_locked()) {
                    if let Err(e) = pointer.exit_lock() {
                        tracing::warn!("pointer release failed: {e}");
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                let pointer_locked = self.pointer_locked();
                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&self.state, &self.egui_ctx, pointer_locked);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let (DeviceEvent::MouseMotion { delta }, Some(pointer)) = (event, &self.pointer) {
            self.state
                .controller
                .mouse_move(delta.0 as f32, pointer, &mut self.state.camera);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.controller_config()?;
    tracing::info!(?config, "dreamhall-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, cli.seed));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_keys_keep_their_case() {
        assert_eq!(key_name(&Key::Character("Z".into())).as_deref(), Some("Z"));
        assert_eq!(key_name(&Key::Character("q".into())).as_deref(), Some("q"));
    }

    #[test]
    fn named_keys_are_tracked() {
        assert_eq!(
            key_name(&Key::Named(NamedKey::Space)).as_deref(),
            Some("space")
        );
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "dreamhall-desktop",
            "--speed",
            "0.05",
            "--sensitivity",
            "0.01",
        ]);
        let config = cli.controller_config().unwrap();
        assert_eq!(config.default_speed, 0.05);
        assert_eq!(config.mouse_sensitivity, 0.01);
    }

    #[test]
    fn invalid_speed_is_rejected() {
        let cli = Cli::parse_from(["dreamhall-desktop", "--speed", "0"]);
        assert!(cli.controller_config().is_err());
    }

    #[test]
    fn release_reaches_controller_even_when_ui_has_focus() {
        let mut state = AppState::new(ControllerConfig::default(), 0);
        state.controller.key_down("z", None);

        state.release_key(&Key::Character("z".into()), ElementState::Pressed);
        assert!(state.controller.keys().is_held("z"));

        state.release_key(&Key::Character("Z".into()), ElementState::Released);
        assert!(!state.controller.keys().is_held("z"));
    }

    #[test]
    fn spawn_puts_camera_on_player() {
        let state = AppState::new(ControllerConfig::default(), 0);
        assert_eq!(state.camera.target, state.layout.spawn);
        assert!(state.scene.events().is_empty());
    }
}
