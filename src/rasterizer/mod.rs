//! CPU software rasterizer
//!
//! Features:
//! - Perspective projection with a single y flip at the viewport
//! - Flat-lit filled triangles, perspective-correct texturing
//! - Wireframe and vertex overlays
//! - Z-buffer or painter's algorithm
//! - Backface culling

mod framebuffer;
mod math;
mod render;
mod triangle;
mod types;

pub use framebuffer::*;
pub use math::*;
pub use render::*;
pub use triangle::*;
pub use types::*;

/// Default window dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
