//! Material registry: content-addressed handles, texture references.
//!
//! Materials are identified by a hash of their contents. Meshes reference
//! materials by [`MaterialId`], never by value. Texture files are carried as
//! paths only; decoding them is the renderer's concern.

use dreamhall_common::MaterialId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// A texture file bound to a material slot, with its tiling factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    pub path: String,
    pub u_scale: f32,
    pub v_scale: f32,
}

impl TextureRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            u_scale: 1.0,
            v_scale: 1.0,
        }
    }

    pub fn tiled(mut self, u_scale: f32, v_scale: f32) -> Self {
        self.u_scale = u_scale;
        self.v_scale = v_scale;
        self
    }
}

/// Diffuse/emissive/specular surface description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardMaterial {
    pub name: String,
    pub diffuse_color: [f32; 3],
    pub emissive_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub alpha: f32,
    pub diffuse_texture: Option<TextureRef>,
    pub bump_texture: Option<TextureRef>,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            name: "default".into(),
            diffuse_color: [1.0, 1.0, 1.0],
            emissive_color: [0.0, 0.0, 0.0],
            specular_color: [1.0, 1.0, 1.0],
            alpha: 1.0,
            diffuse_texture: None,
            bump_texture: None,
        }
    }
}

impl StandardMaterial {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.alpha < 1.0
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("material not found: {0:?}")]
    NotFound(MaterialId),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Content-addressed material registry.
///
/// Registering identical materials twice yields the same id and a single
/// entry. The registry can be saved to disk as JSON for inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialStore {
    materials: BTreeMap<MaterialId, StandardMaterial>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and return its id.
    pub fn register(&mut self, material: StandardMaterial) -> MaterialId {
        let id = content_hash(&material);
        if self.materials.insert(id, material).is_none() {
            tracing::trace!(?id, "material registered");
        }
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&StandardMaterial> {
        self.materials.get(&id)
    }

    pub fn require(&self, id: MaterialId) -> Result<&StandardMaterial, AssetError> {
        self.get(id).ok_or(AssetError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &StandardMaterial)> {
        self.materials.iter().map(|(id, m)| (*id, m))
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Every texture path referenced by a registered material.
    pub fn texture_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .materials
            .values()
            .flat_map(|m| [m.diffuse_texture.as_ref(), m.bump_texture.as_ref()])
            .flatten()
            .map(|t| t.path.as_str())
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }

    /// Save the registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

fn content_hash(material: &StandardMaterial) -> MaterialId {
    let mut hasher = Sha256::new();
    hasher.update(material.name.as_bytes());
    for channel in material
        .diffuse_color
        .iter()
        .chain(&material.emissive_color)
        .chain(&material.specular_color)
        .chain(std::iter::once(&material.alpha))
    {
        hasher.update(channel.to_le_bytes());
    }
    for texture in [&material.diffuse_texture, &material.bump_texture] {
        match texture {
            Some(t) => {
                hasher.update([1u8]);
                hasher.update(t.path.as_bytes());
                hasher.update(t.u_scale.to_le_bytes());
                hasher.update(t.v_scale.to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    MaterialId(u64::from_le_bytes(bytes))
}
