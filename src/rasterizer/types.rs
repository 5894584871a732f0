//! Core types for the rasterizer

use super::math::{Vec2, Vec4};
use crate::error::AssetError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// RGBA color (0-255 per channel)
///
/// Buffers and textures store colors packed as `0xAARRGGBB`; this struct is
/// the unpacked form used for arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const GRID: Color = Color { r: 0x33, g: 0x33, b: 0x33, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Apply shading (multiply by intensity 0.0-1.0)
    ///
    /// The intensity is clamped to [0, 1] and every resulting channel to
    /// [0, 255]. Alpha is left untouched.
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        let channel = |c: u8| (c as f32 * i).clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn from_argb(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Convert to [u8; 4] in RGBA order (for the presenter)
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Scale the RGB channels of a packed color by a light intensity
///
/// `percentage_factor` is clamped to [0, 1] first, so negative or >1 factors
/// never wrap or overflow a channel.
pub fn light_apply_intensity(original_color: u32, percentage_factor: f32) -> u32 {
    Color::from_argb(original_color).shade(percentage_factor).to_argb()
}

/// Read-only texture, pixels packed as `0xAARRGGBB`, row-major, row 0 on top
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
    pub name: String,
}

impl Texture {
    /// Wrap already-decoded pixels.
    ///
    /// Panics if `pixels.len() != width * height` or either dimension is 0.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        assert!(width > 0 && height > 0, "texture dimensions must be non-zero");
        assert_eq!(pixels.len(), width * height, "texture pixel count mismatch");
        Self {
            width,
            height,
            pixels,
            name: String::new(),
        }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let texture = Self::from_image(img, name);
        log::info!("Loaded texture: {} ({}x{})", texture.name, texture.width, texture.height);
        Ok(texture)
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<u32> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]).to_argb())
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 8) + (y / 8)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 }.to_argb());
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Sample at UV coordinates (nearest texel, no filtering)
    ///
    /// `v = 0` is the bottom row of the image. Texel indices wrap around the
    /// texture dimensions, which absorbs interpolation overshoot past [0, 1].
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let tx = ((u * self.width as f32).floor() as i64).rem_euclid(self.width as i64) as usize;
        let ty = (((1.0 - v) * self.height as f32).floor() as i64).rem_euclid(self.height as i64) as usize;
        self.pixels[ty * self.width + tx]
    }
}

/// Screen-space triangle ready for rasterization
///
/// Rebuilt every frame. `points` hold pixel x/y, the NDC z and the
/// camera-space `w` kept from before the perspective divide.
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub texcoords: [Vec2; 3],
    /// Base color with lighting already applied
    pub color: u32,
    /// Flat light intensity, reused for texels
    pub intensity: f32,
    /// Mean camera-space z of the three vertices (painter's sort key)
    pub avg_depth: f32,
}

/// What gets drawn for each triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    Wireframe,
    WireframeVertices,
    #[default]
    Filled,
    FilledWireframe,
    Textured,
    TexturedWireframe,
}

impl RenderMode {
    pub const ALL: [RenderMode; 6] = [
        RenderMode::Wireframe,
        RenderMode::WireframeVertices,
        RenderMode::Filled,
        RenderMode::FilledWireframe,
        RenderMode::Textured,
        RenderMode::TexturedWireframe,
    ];

    pub fn draws_fill(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    pub fn draws_texture(self) -> bool {
        matches!(self, RenderMode::Textured | RenderMode::TexturedWireframe)
    }

    pub fn draws_wireframe(self) -> bool {
        matches!(
            self,
            RenderMode::Wireframe
                | RenderMode::WireframeVertices
                | RenderMode::FilledWireframe
                | RenderMode::TexturedWireframe
        )
    }

    pub fn draws_vertices(self) -> bool {
        self == RenderMode::WireframeVertices
    }
}

/// Face culling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullMode {
    None,
    #[default]
    Backface,
}

/// Occlusion strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthMode {
    /// Per-pixel depth test, submission order does not matter
    #[default]
    ZBuffer,
    /// Sort triangles far-to-near by average depth, no per-pixel test.
    /// Order between equal averages is unspecified.
    PainterSort,
}

impl DepthMode {
    pub fn toggled(self) -> Self {
        match self {
            DepthMode::ZBuffer => DepthMode::PainterSort,
            DepthMode::PainterSort => DepthMode::ZBuffer,
        }
    }
}

/// Per-frame render configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub render_mode: RenderMode,
    pub cull_mode: CullMode,
    pub depth_mode: DepthMode,
    /// Dotted background grid
    pub draw_grid: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Filled,
            cull_mode: CullMode::Backface,
            depth_mode: DepthMode::ZBuffer,
            draw_grid: true,
        }
    }
}
