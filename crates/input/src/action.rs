use serde::{Deserialize, Serialize};

/// A high-level intent produced from a held or pressed key.
///
/// Held keys are resolved to actions through [`KeyBindings::action_for`], so
/// rebinding keys (e.g. for a QWERTY layout) does not touch movement logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    /// Engage or release exclusive mouse capture.
    TogglePointerLock,
}

impl Action {
    pub const MOVEMENT: [Action; 4] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
    ];
}

/// Key assigned to each action. Keys are lowercased key identifiers as
/// reported by the platform's logical key (layout-aware).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub toggle_pointer_lock: String,
}

/// AZERTY layout: z/q/s/d to move, j to capture the mouse.
impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "z".into(),
            backward: "s".into(),
            left: "q".into(),
            right: "d".into(),
            toggle_pointer_lock: "j".into(),
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, action: Action) -> &str {
        match action {
            Action::MoveForward => &self.forward,
            Action::MoveBackward => &self.backward,
            Action::StrafeLeft => &self.left,
            Action::StrafeRight => &self.right,
            Action::TogglePointerLock => &self.toggle_pointer_lock,
        }
    }

    /// Action bound to `key`, if any. Movement bindings win over the toggle
    /// when a key is bound twice.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        Action::MOVEMENT
            .into_iter()
            .chain(std::iter::once(Action::TogglePointerLock))
            .find(|action| self.key_for(*action).eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_azerty() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("z"), Some(Action::MoveForward));
        assert_eq!(b.action_for("q"), Some(Action::StrafeLeft));
        assert_eq!(b.action_for("s"), Some(Action::MoveBackward));
        assert_eq!(b.action_for("d"), Some(Action::StrafeRight));
        assert_eq!(b.action_for("j"), Some(Action::TogglePointerLock));
    }

    #[test]
    fn unbound_keys_have_no_action() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("w"), None);
        assert_eq!(b.action_for("shift"), None);
    }

    #[test]
    fn lookup_ignores_case() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("J"), Some(Action::TogglePointerLock));
    }

    #[test]
    fn partial_bindings_fill_defaults() {
        let b: KeyBindings = serde_json::from_str(r#"{"forward": "w", "left": "a"}"#).unwrap();
        assert_eq!(b.key_for(Action::MoveForward), "w");
        assert_eq!(b.key_for(Action::StrafeLeft), "a");
        assert_eq!(b.key_for(Action::MoveBackward), "s");
    }
}
