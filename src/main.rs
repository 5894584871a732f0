//! softraster viewer: window, input and frame pacing around the renderer

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use macroquad::prelude::*;
use softraster::config::{load_config, save_config, RenderConfig};
use softraster::rasterizer::{CullMode, Framebuffer, RenderMode, RenderSettings, Renderer};
use softraster::scene::Scene;
use softraster::VERSION;
use std::path::PathBuf;
use std::time::Instant;

/// softraster - software 3D renderer
#[derive(Parser, Debug)]
#[command(name = "softraster", version, about = "CPU-only software 3D renderer")]
struct Args {
    /// Path to a RON render config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ mesh to display (overrides the config)
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Texture image (overrides the config)
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Write the default config to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const MODE_KEYS: [KeyCode; 6] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
];

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if let Some(path) = &args.write_default_config {
        save_config(&RenderConfig::default(), path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if args.mesh.is_some() {
        config.mesh = args.mesh;
    }
    if args.texture.is_some() {
        config.texture = args.texture;
    }

    let scene = config.build_scene().context("failed to load scene")?;

    info!("=== softraster v{} ===", VERSION);
    macroquad::Window::from_config(window_conf(&config), run(config, scene));
    Ok(())
}

fn window_conf(config: &RenderConfig) -> Conf {
    Conf {
        window_title: format!("softraster v{}", VERSION),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

async fn run(config: RenderConfig, mut scene: Scene) {
    let (width, height) = config.framebuffer_size(screen_width(), screen_height());
    let mut renderer = Renderer::new(width, height, config.lens(), config.settings);
    let frame_time = config.frame_time();

    loop {
        let frame_start = Instant::now();

        if is_key_pressed(KeyCode::Escape) {
            info!("Quit");
            break;
        }
        handle_input(&mut renderer.settings);

        scene.mesh.rotation = scene.mesh.rotation + config.rotation_per_frame;

        // Buffers must match the window before anything is drawn into them
        let (width, height) = config.framebuffer_size(screen_width(), screen_height());
        renderer.resize(width, height);

        renderer.render_frame(&scene);
        present(renderer.framebuffer());

        if let Some(target) = frame_time {
            let elapsed = frame_start.elapsed();
            if elapsed < target {
                std::thread::sleep(target - elapsed);
            }
        }

        next_frame().await;
    }
}

fn handle_input(settings: &mut RenderSettings) {
    for (key, mode) in MODE_KEYS.into_iter().zip(RenderMode::ALL) {
        if is_key_pressed(key) {
            settings.render_mode = mode;
            log::debug!("Render mode: {:?}", mode);
        }
    }
    if is_key_pressed(KeyCode::C) {
        settings.cull_mode = CullMode::Backface;
        log::debug!("Backface culling on");
    }
    if is_key_pressed(KeyCode::X) {
        settings.cull_mode = CullMode::None;
        log::debug!("Backface culling off");
    }
    if is_key_pressed(KeyCode::Z) {
        settings.depth_mode = settings.depth_mode.toggled();
        log::debug!("Depth mode: {:?}", settings.depth_mode);
    }
}

/// Blit the color buffer scaled to the whole window
fn present(fb: &Framebuffer) {
    clear_background(BLACK);

    let texture = Texture2D::from_rgba8(fb.width() as u16, fb.height() as u16, &fb.to_rgba8());
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}
