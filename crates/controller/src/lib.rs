//! Walkthrough controller: keyboard movement, mouse-look, pseudo-gravity and
//! portrait teleports, run once per rendered frame.
//!
//! The controller talks to the engine only through the traits in
//! [`capability`]. Adapters for the kernel scene, the kernel body and the
//! orbit camera live in the `adapters` module.
//!
//! # Invariants
//! - Movement is recomputed from held keys every frame; no momentum.
//! - Gravity is requested every frame, grounded or not.
//! - Mouse-look only applies while pointer capture is engaged.

mod adapters;
pub mod capability;
mod config;
mod controller;

pub use capability::{ControllerScene, PlayerRoot, TriggerRef, ViewCamera};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{Controller, FrameReport, Player, Teleport};
