use dreamhall_assets::{MaterialStore, StandardMaterial, TextureRef};
use dreamhall_common::MaterialId;

pub(crate) const GROUND_TEXTURE: &str = "assets/textures/cake_base.jpg";
pub(crate) const WALL_TEXTURE: &str = "assets/textures/granite_tile_diff_4k.jpg";
pub(crate) const WALL_BUMP: &str = "assets/textures/granite_tile_disp_4k.png";
pub(crate) const DREAM_TEXTURE: &str = "assets/textures/Dream1.png";
pub(crate) const DREAM_BACK_TEXTURE: &str = "assets/textures/backDream1.png";

/// Materials shared by several meshes.
pub(crate) struct Palette {
    pub ground: MaterialId,
    pub wall: MaterialId,
}

impl Palette {
    pub fn register(materials: &mut MaterialStore) -> Self {
        let ground = materials.register(StandardMaterial {
            diffuse_texture: Some(TextureRef::new(GROUND_TEXTURE).tiled(50.0, 50.0)),
            ..StandardMaterial::named("groundMat")
        });
        let wall = materials.register(StandardMaterial {
            diffuse_texture: Some(TextureRef::new(WALL_TEXTURE).tiled(6.0, 6.0)),
            bump_texture: Some(TextureRef::new(WALL_BUMP)),
            ..StandardMaterial::named("wallMat")
        });
        Self { ground, wall }
    }
}

/// Front face of a portrait: self-lit, no highlights.
pub(crate) fn portrait(index: usize) -> StandardMaterial {
    StandardMaterial {
        emissive_color: [1.0, 1.0, 1.0],
        specular_color: [0.0, 0.0, 0.0],
        diffuse_texture: (index == 0).then(|| TextureRef::new(DREAM_TEXTURE)),
        ..StandardMaterial::named(format!("portraitMat_{index}"))
    }
}

pub(crate) fn portrait_back(index: usize) -> StandardMaterial {
    StandardMaterial {
        specular_color: [0.0, 0.0, 0.0],
        diffuse_texture: Some(TextureRef::new(DREAM_BACK_TEXTURE)),
        ..StandardMaterial::named(format!("portraitBackMat_{index}"))
    }
}

pub(crate) fn pedestal(index: usize) -> StandardMaterial {
    StandardMaterial {
        diffuse_color: [0.6, 0.2, 0.2],
        ..StandardMaterial::named(format!("socleMat_{index}"))
    }
}

pub(crate) fn stick(name: &str) -> StandardMaterial {
    StandardMaterial {
        diffuse_color: [0.8, 0.8, 0.8],
        ..StandardMaterial::named(format!("{name}_stickMat"))
    }
}

pub(crate) fn candy(name: &str, rng: &mut CandyRng) -> StandardMaterial {
    StandardMaterial {
        diffuse_color: [rng.next_unit(), rng.next_unit(), rng.next_unit()],
        emissive_color: [1.0, 1.0, 1.0],
        alpha: 0.9,
        ..StandardMaterial::named(format!("{name}_mat"))
    }
}

/// Seeded colour source for the lollipop heads.
pub(crate) struct CandyRng {
    state: u64,
}

impl CandyRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> f32 {
        self.state = splitmix64(self.state);
        // Top 24 bits fill an f32 mantissa exactly.
        (self.state >> 40) as f32 / (1u64 << 24) as f32
    }
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candy_colours_are_reproducible() {
        let a: Vec<f32> = {
            let mut rng = CandyRng::new(7);
            (0..6).map(|_| rng.next_unit()).collect()
        };
        let b: Vec<f32> = {
            let mut rng = CandyRng::new(7);
            (0..6).map(|_| rng.next_unit()).collect()
        };
        assert_eq!(a, b);
        assert!(a.iter().all(|c| (0.0..1.0).contains(c)));
    }

    #[test]
    fn seeds_differ() {
        let mut a = CandyRng::new(1);
        let mut b = CandyRng::new(2);
        assert_ne!(a.next_unit(), b.next_unit());
    }

    #[test]
    fn only_first_portrait_is_textured() {
        assert!(portrait(0).diffuse_texture.is_some());
        assert!(portrait(1).diffuse_texture.is_none());
        assert_eq!(portrait(2).emissive_color, [1.0, 1.0, 1.0]);
    }
}
