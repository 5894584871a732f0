//! Errors raised while loading scene assets and configuration
//!
//! Only startup work (reading meshes, textures and config files) can fail.
//! Everything that runs per frame guards its own edge cases instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("mesh {0} has no usable faces")]
    EmptyMesh(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io { path: path.into(), source }
    }
}
