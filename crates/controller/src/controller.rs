use dreamhall_common::MeshId;
use dreamhall_input::{Action, KeyState, PointerSurface, toggle_pointer_lock};
use glam::Vec3;

use crate::capability::{ControllerScene, PlayerRoot, ViewCamera};
use crate::config::ControllerConfig;

/// The player handle: a root that may not be attached yet, and a speed.
#[derive(Debug, Clone)]
pub struct Player<R> {
    pub root: Option<R>,
    /// Units per frame. Falls back to the controller's default when unset.
    pub speed: Option<f32>,
}

impl<R> Default for Player<R> {
    fn default() -> Self {
        Self {
            root: None,
            speed: None,
        }
    }
}

impl<R> Player<R> {
    pub fn new(root: R) -> Self {
        Self {
            root: Some(root),
            speed: None,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// A relocation caused by a portrait trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Teleport {
    pub trigger: MeshId,
    pub name: String,
    pub from: Vec3,
    pub destination: Vec3,
}

/// What one update did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// True when the player root was absent and nothing ran.
    pub skipped: bool,
    /// Displacement passed to the collision move for held keys.
    pub movement: Vec3,
    /// Displacement passed to the collision move for gravity.
    pub gravity: Vec3,
    pub teleport: Option<Teleport>,
}

/// Owns the key-state map and runs the per-frame update.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    config: ControllerConfig,
    keys: KeyState,
    cooldown: u32,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            keys: KeyState::new(),
            cooldown: 0,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Mark `key` held. The toggle key also flips pointer capture on
    /// `surface`; without a surface the toggle does nothing.
    ///
    /// The toggle matches case-sensitively, so Shift+J does not toggle.
    pub fn key_down(&mut self, key: &str, surface: Option<&mut dyn PointerSurface>) {
        self.keys.press(key);
        let bindings = &self.config.bindings;
        if bindings.action_for(key) != Some(Action::TogglePointerLock)
            || key != bindings.key_for(Action::TogglePointerLock)
        {
            return;
        }
        let Some(surface) = surface else {
            return;
        };
        if let Err(e) = toggle_pointer_lock(surface) {
            tracing::warn!("pointer lock toggle failed: {e}");
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Orbit the camera by horizontal mouse motion while capture is engaged.
    /// Rightward motion decreases the angle.
    pub fn mouse_move<C: ViewCamera>(
        &self,
        dx: f32,
        surface: &dyn PointerSurface,
        camera: &mut C,
    ) {
        if !surface.is_locked() {
            return;
        }
        camera.set_alpha(camera.alpha() - dx * self.config.mouse_sensitivity);
    }

    /// Run one frame: follow, move, fall, then check portrait triggers.
    pub fn update<S, C>(
        &mut self,
        scene: &S,
        player: &mut Player<S::Root>,
        camera: &mut C,
    ) -> FrameReport
    where
        S: ControllerScene,
        C: ViewCamera,
    {
        let Some(root) = player.root.as_mut() else {
            return FrameReport {
                skipped: true,
                ..FrameReport::default()
            };
        };

        camera.set_target(root.position());

        let world = camera.world_matrix();
        let forward = horizontal(-world.z_axis.truncate());
        let right = horizontal(world.x_axis.truncate());
        let movement = self.movement(forward, right, player.speed);
        scene.move_with_collisions(root, movement);

        let gravity = Vec3::new(0.0, -self.config.gravity_step, 0.0);
        scene.move_with_collisions(root, gravity);

        let teleport = self.check_triggers(scene, root);

        // The target follows the root through this frame's moves.
        camera.set_target(root.position());

        FrameReport {
            skipped: false,
            movement,
            gravity,
            teleport,
        }
    }

    /// Actions bound to currently held keys.
    fn held_actions(&self) -> Vec<Action> {
        self.keys
            .held_keys()
            .filter_map(|key| self.config.bindings.action_for(key))
            .collect()
    }

    fn movement(&self, forward: Vec3, right: Vec3, speed: Option<f32>) -> Vec3 {
        let held = self.held_actions();
        let mut v = Vec3::ZERO;
        // Fixed order keeps the sum independent of map iteration order.
        for action in Action::MOVEMENT {
            if !held.contains(&action) {
                continue;
            }
            match action {
                Action::MoveForward => v += forward,
                Action::MoveBackward => v -= forward,
                Action::StrafeLeft => v -= right,
                Action::StrafeRight => v += right,
                Action::TogglePointerLock => {}
            }
        }
        if v != Vec3::ZERO {
            v = v.normalize_or_zero() * speed.unwrap_or(self.config.default_speed);
        }
        v
    }

    fn check_triggers<S: ControllerScene>(
        &mut self,
        scene: &S,
        root: &mut S::Root,
    ) -> Option<Teleport> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        let hit = {
            let root: &S::Root = root;
            scene
                .portrait_triggers()
                .find(|trigger| scene.intersects(root, trigger.id))?
        };

        let from = root.position();
        root.set_position(hit.destination);
        self.cooldown = self.config.teleport_cooldown_frames;
        tracing::info!(destination = ?hit.destination, "[TP] -> {}", hit.name);

        Some(Teleport {
            trigger: hit.id,
            name: hit.name.to_string(),
            from,
            destination: hit.destination,
        })
    }
}

/// Project onto the horizontal plane and normalize; zero when vertical.
fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}
