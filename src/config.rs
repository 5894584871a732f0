//! Render configuration (RON)
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Paths are resolved relative to the working directory.

use crate::error::AssetError;
use crate::rasterizer::{Color, Lens, RenderSettings, Texture, Vec3, HEIGHT, WIDTH};
use crate::scene::{load_obj, Camera, Light, Mesh, Scene};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Window pixels per framebuffer pixel
    pub pixel_scale: u32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// 0 disables frame pacing
    pub target_fps: u32,
    /// OBJ file; the built-in cube when unset
    pub mesh: Option<PathBuf>,
    /// Image file; a generated checkerboard when unset
    pub texture: Option<PathBuf>,
    pub camera_position: Vec3,
    pub light_direction: Vec3,
    pub mesh_scale: Vec3,
    pub mesh_translation: Vec3,
    /// Radians added to the mesh rotation every frame
    pub rotation_per_frame: Vec3,
    pub settings: RenderSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: WIDTH as u32,
            window_height: HEIGHT as u32,
            pixel_scale: 1,
            fov_degrees: 60.0,
            znear: 0.1,
            zfar: 100.0,
            target_fps: 30,
            mesh: None,
            texture: None,
            camera_position: Vec3::ZERO,
            light_direction: Vec3::new(0.0, 0.0, 1.0),
            mesh_scale: Vec3::ONE,
            mesh_translation: Vec3::new(0.0, 0.0, 5.0),
            rotation_per_frame: Vec3::new(0.01, 0.01, 0.01),
            settings: RenderSettings::default(),
        }
    }
}

impl RenderConfig {
    pub fn lens(&self) -> Lens {
        Lens {
            fov: self.fov_degrees.to_radians(),
            znear: self.znear,
            zfar: self.zfar,
        }
    }

    /// Reject values that would break the projection matrix
    pub fn validate(&self) -> Result<(), AssetError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(AssetError::InvalidConfig(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.znear > 0.0) {
            return Err(AssetError::InvalidConfig(format!("znear must be positive, got {}", self.znear)));
        }
        if !(self.zfar > self.znear) {
            return Err(AssetError::InvalidConfig(format!(
                "zfar ({}) must be greater than znear ({})",
                self.zfar, self.znear
            )));
        }
        Ok(())
    }

    /// Framebuffer resolution for a window of the given size (at least 1x1)
    pub fn framebuffer_size(&self, window_width: f32, window_height: f32) -> (usize, usize) {
        let scale = self.pixel_scale.max(1) as f32;
        let w = (window_width / scale) as usize;
        let h = (window_height / scale) as usize;
        (w.max(1), h.max(1))
    }

    pub fn frame_time(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_secs_f64(1.0 / self.target_fps as f64))
    }

    /// Load the configured assets and place them
    pub fn build_scene(&self) -> Result<Scene, AssetError> {
        let mut mesh = match &self.mesh {
            Some(path) => load_obj(path)?,
            None => Mesh::cube(),
        };
        mesh.scale = self.mesh_scale;
        mesh.translation = self.mesh_translation;

        let texture = match &self.texture {
            Some(path) => Texture::from_file(path)?,
            None => Texture::checkerboard(64, 64, Color::WHITE, Color::new(0x40, 0x60, 0xC0)),
        };

        Ok(Scene {
            mesh,
            camera: Camera::new(self.camera_position),
            light: Light::new(self.light_direction),
            texture,
        })
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, AssetError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
    let config = load_config_from_str(&contents)?;
    log::info!("Loaded config: {}", path.display());
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), AssetError> {
    let path = path.as_ref();
    fs::write(path, config_to_string(config)?).map_err(|e| AssetError::io(path, e))?;
    Ok(())
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, AssetError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

pub fn config_to_string(config: &RenderConfig) -> Result<String, AssetError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(config, pretty)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{CullMode, DepthMode, RenderMode};

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = load_config_from_str(
            "(
                fov_degrees: 90.0,
                mesh: Some(\"assets/f22.obj\"),
                mesh_translation: (x: 0.0, y: 0.0, z: 8.0),
                settings: (render_mode: TexturedWireframe, depth_mode: PainterSort),
            )",
        )
        .unwrap();

        assert_eq!(config.fov_degrees, 90.0);
        assert_eq!(config.mesh, Some(PathBuf::from("assets/f22.obj")));
        assert_eq!(config.mesh_translation, Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(config.settings.render_mode, RenderMode::TexturedWireframe);
        assert_eq!(config.settings.depth_mode, DepthMode::PainterSort);
        assert_eq!(config.settings.cull_mode, CullMode::Backface);
        assert_eq!(config.window_width, 800);
        assert!(config.texture.is_none());
    }

    #[test]
    fn test_config_text_roundtrip() {
        let mut config = RenderConfig::default();
        config.pixel_scale = 2;
        config.settings.cull_mode = CullMode::None;
        let text = config_to_string(&config).unwrap();
        assert_eq!(load_config_from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let err = load_config_from_str("(fov_degrees: \"wide\")").unwrap_err();
        assert!(matches!(err, AssetError::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_lens_rejected() {
        for text in [
            "(znear: 0.0)",
            "(znear: -1.0)",
            "(znear: 5.0, zfar: 5.0)",
            "(zfar: 0.05)",
            "(fov_degrees: 0.0)",
            "(fov_degrees: 180.0)",
        ] {
            let err = load_config_from_str(text).unwrap_err();
            assert!(matches!(err, AssetError::InvalidConfig(_)), "{}", text);
        }
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_framebuffer_size() {
        let mut config = RenderConfig::default();
        assert_eq!(config.framebuffer_size(800.0, 600.0), (800, 600));
        config.pixel_scale = 3;
        assert_eq!(config.framebuffer_size(800.0, 600.0), (266, 200));
        assert_eq!(config.framebuffer_size(0.0, 0.0), (1, 1));
    }

    #[test]
    fn test_frame_time() {
        let mut config = RenderConfig::default();
        let t = config.frame_time().unwrap();
        assert!((t.as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
        config.target_fps = 0;
        assert!(config.frame_time().is_none());
    }

    #[test]
    fn test_default_scene() {
        let scene = RenderConfig::default().build_scene().unwrap();
        assert_eq!(scene.mesh.faces().len(), 12);
        assert_eq!(scene.mesh.translation, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(scene.texture.width, 64);
        assert_eq!(scene.camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_missing_mesh_is_an_error() {
        let config = RenderConfig {
            mesh: Some(PathBuf::from("does/not/exist.obj")),
            ..Default::default()
        };
        let err = config.build_scene().unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
