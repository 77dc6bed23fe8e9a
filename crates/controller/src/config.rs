use std::path::Path;

use dreamhall_input::KeyBindings;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating controller configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// Controller tuning. Distances are in world units per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Radians of orbit per pixel of horizontal mouse motion.
    pub mouse_sensitivity: f32,
    /// Speed used when the player has none configured.
    pub default_speed: f32,
    /// Downward offset applied every frame.
    pub gravity_step: f32,
    pub bindings: KeyBindings,
    /// Frames after a teleport during which triggers are ignored.
    /// Zero re-arms triggers on the very next frame.
    pub teleport_cooldown_frames: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.005,
            default_speed: 0.015,
            gravity_step: 0.02,
            bindings: KeyBindings::default(),
            teleport_cooldown_frames: 0,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mouse_sensitivity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "mouse_sensitivity",
                value: self.mouse_sensitivity,
            });
        }
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_speed",
                value: self.default_speed,
            });
        }
        if !(self.gravity_step.is_finite() && self.gravity_step >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "gravity_step",
                value: self.gravity_step,
            });
        }
        Ok(())
    }
}
