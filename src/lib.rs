//! softraster: CPU-only software 3D renderer
//!
//! Loads a triangle mesh, spins it in front of a fixed camera and
//! rasterizes it into a color buffer and depth buffer every frame. The
//! library has no windowing code; the binary presents the finished buffer.

pub mod config;
pub mod error;
pub mod rasterizer;
pub mod scene;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
