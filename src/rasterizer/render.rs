//! Per-frame transform pipeline and the render context
//!
//! `Renderer` owns everything that lives across frames (buffers, projection,
//! settings). Each frame: `update` turns the scene into screen-space
//! triangles, `render` clears the buffers and rasterizes them.

use super::framebuffer::Framebuffer;
use super::math::{Mat4, Vec3, Vec4};
use super::triangle::{draw_filled_triangle, draw_textured_triangle};
use super::types::{
    light_apply_intensity, Color, CullMode, DepthMode, RenderSettings, Texture, Triangle,
};
use crate::scene::{Face, Scene};

/// Pixels between background grid dots
const GRID_SPACING: usize = 10;
/// Side of the square drawn on each vertex in `WireframeVertices` mode
const VERTEX_MARKER: i32 = 6;

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_3,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// Render context owned by the frame loop
pub struct Renderer {
    fb: Framebuffer,
    pub settings: RenderSettings,
    lens: Lens,
    projection: Mat4,
    triangles: Vec<Triangle>,
}

impl Renderer {
    pub fn new(width: usize, height: usize, lens: Lens, settings: RenderSettings) -> Self {
        Self {
            fb: Framebuffer::new(width, height),
            settings,
            lens,
            projection: projection_for(lens, width, height),
            triangles: Vec::new(),
        }
    }

    /// Reallocate the buffers and rebuild the projection for a new viewport
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.fb.width() && height == self.fb.height() {
            return;
        }
        self.fb.resize(width, height);
        self.projection = projection_for(self.lens, width, height);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Triangles built by the last `update`, in draw order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Update: transform, cull, light and project every face of the mesh
    pub fn update(&mut self, scene: &Scene) {
        self.triangles.clear();

        // Camera has no orientation, so the view transform is a translation
        // and the camera sits at the origin of camera space.
        let p = scene.camera.position;
        let world_view = Mat4::translation(-p.x, -p.y, -p.z) * scene.mesh.world_matrix();
        let vertices = scene.mesh.vertices();

        for face in scene.mesh.faces() {
            let camera_space = face
                .indices()
                .map(|i| (world_view * Vec4::from_vec3(vertices[i])).xyz());
            if let Some(tri) = self.build_triangle(face, camera_space, scene.light.direction) {
                self.triangles.push(tri);
            }
        }

        if self.settings.depth_mode == DepthMode::PainterSort {
            self.triangles
                .sort_by(|a, b| b.avg_depth.total_cmp(&a.avg_depth));
        }
    }

    fn build_triangle(&self, face: &Face, v: [Vec3; 3], light_dir: Vec3) -> Option<Triangle> {
        // No near-plane clipping: faces reaching behind it are skipped whole
        if v.iter().any(|p| p.z < self.lens.znear) {
            return None;
        }

        let normal = face_normal(v);
        let camera_ray = Vec3::ZERO - v[0];
        if self.settings.cull_mode == CullMode::Backface && normal.dot(camera_ray) < 0.0 {
            return None;
        }

        let intensity = -normal.dot(light_dir);
        let points = v.map(|p| self.project(p));

        Some(Triangle {
            points,
            texcoords: face.uvs(),
            color: light_apply_intensity(face.color, intensity),
            intensity: intensity.clamp(0.0, 1.0),
            avg_depth: (v[0].z + v[1].z + v[2].z) / 3.0,
        })
    }

    /// Camera space to pixel space; `w` keeps the camera-space depth
    ///
    /// NDC +y points up and screen +y points down: this is the only place
    /// the vertical axis is flipped.
    pub fn project(&self, v: Vec3) -> Vec4 {
        let half_w = self.fb.width() as f32 / 2.0;
        let half_h = self.fb.height() as f32 / 2.0;
        let mut p = self.projection.mul_vec4_project(Vec4::from_vec3(v));
        p.x = p.x * half_w + half_w;
        p.y = -p.y * half_h + half_h;
        p
    }

    /// Render: clear, then fill and outline every triangle from the last update
    pub fn render(&mut self, texture: &Texture) {
        let settings = self.settings;
        let mode = settings.render_mode;

        self.fb.clear(Color::BLACK.to_argb());
        self.fb.clear_depth();
        if settings.draw_grid {
            self.fb.draw_grid(GRID_SPACING, Color::GRID.to_argb());
        }

        for tri in &self.triangles {
            if mode.draws_fill() {
                draw_filled_triangle(&mut self.fb, tri, settings.depth_mode);
            }
            if mode.draws_texture() {
                draw_textured_triangle(&mut self.fb, tri, texture, settings.depth_mode);
            }
        }

        // Outlines go on top, without a depth test
        for tri in &self.triangles {
            let [a, b, c] = tri.points.map(|p| (p.x.floor() as i32, p.y.floor() as i32));
            if mode.draws_wireframe() {
                self.fb
                    .draw_triangle(a.0, a.1, b.0, b.1, c.0, c.1, Color::WHITE.to_argb());
            }
            if mode.draws_vertices() {
                for (x, y) in [a, b, c] {
                    let half = VERTEX_MARKER / 2;
                    self.fb
                        .draw_rect(x - half, y - half, VERTEX_MARKER, VERTEX_MARKER, Color::RED.to_argb());
                }
            }
        }
    }

    /// `update` followed by `render`
    pub fn render_frame(&mut self, scene: &Scene) {
        self.update(scene);
        self.render(&scene.texture);
    }
}

fn projection_for(lens: Lens, width: usize, height: usize) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective(lens.fov, aspect, lens.znear, lens.zfar)
}

/// Unit normal of a clockwise face: cross of the normalized edges AB and AC
pub fn face_normal(v: [Vec3; 3]) -> Vec3 {
    let ab = (v[1] - v[0]).normalize();
    let ac = (v[2] - v[0]).normalize();
    ab.cross(ac).normalize()
}
