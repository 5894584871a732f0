//! Scene model: what gets rendered
//!
//! Loaded once at startup. Afterwards only the mesh transform changes.

mod mesh;
pub mod obj;

pub use mesh::*;
pub use obj::{load_obj, parse_obj};

use crate::rasterizer::{Texture, Vec3};

/// Camera state (position only, looking down +Z)
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub position: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Single directional light
#[derive(Debug, Clone, Copy)]
pub struct Light {
    /// Direction the light travels, normalized
    pub direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        Self { direction: direction.normalize() }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 1.0))
    }
}

#[derive(Debug)]
pub struct Scene {
    pub mesh: Mesh,
    pub camera: Camera,
    pub light: Light,
    pub texture: Texture,
}
