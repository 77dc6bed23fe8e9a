use std::collections::HashMap;

/// Held state of every key seen so far, keyed by lowercased identifier.
///
/// Written by key-down/key-up handlers and read once per frame.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_lowercase(), true);
    }

    /// Mark the key released. The entry is kept.
    pub fn release(&mut self, key: &str) {
        self.held.insert(key.to_lowercase(), false);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held
            .get(key.to_lowercase().as_str())
            .copied()
            .unwrap_or(false)
    }

    /// Number of distinct keys ever seen.
    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn held_keys(&self) -> impl Iterator<Item = &str> {
        self.held
            .iter()
            .filter(|(_, held)| **held)
            .map(|(key, _)| key.as_str())
    }
}
