//! Triangle scan conversion
//!
//! Triangles are filled top to bottom in two halves split at the middle
//! vertex: a flat-bottom half above it and a flat-top half below. Each
//! scanline span is found by walking the bounding edges' inverse slopes.
//! Per pixel, barycentric weights drive perspective-correct interpolation of
//! `1/w` and texture coordinates, and `1 - 1/w` is the value stored in the
//! depth buffer.

use super::framebuffer::Framebuffer;
use super::math::{Vec2, Vec3};
use super::types::{light_apply_intensity, DepthMode, Texture, Triangle};

/// Barycentric weights (alpha, beta, gamma) of `p` against triangle `abc`
///
/// Uses signed parallelogram areas: the whole triangle is `AC x AB`, alpha
/// is `PC x PB` and beta is `AC x AP`, each divided by the whole; gamma is
/// what remains. Returns `None` for a degenerate (zero-area) triangle.
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<Vec3> {
    let ac = c - a;
    let ab = b - a;
    let area = ac.cross(ab);
    if area.abs() < f32::EPSILON {
        return None;
    }

    let alpha = (c - p).cross(b - p) / area;
    let beta = ac.cross(p - a) / area;
    let gamma = 1.0 - alpha - beta;
    Some(Vec3::new(alpha, beta, gamma))
}

/// One triangle vertex snapped to the pixel grid, attributes carried along
#[derive(Debug, Clone, Copy)]
struct Corner {
    x: i32,
    y: i32,
    w: f32,
    u: f32,
    v: f32,
}

impl Corner {
    fn screen(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Corners ordered by ascending y; equal y keeps submission order
fn sorted_corners(tri: &Triangle) -> [Corner; 3] {
    let mut c = [0, 1, 2].map(|i| Corner {
        x: tri.points[i].x.floor() as i32,
        y: tri.points[i].y.floor() as i32,
        w: tri.points[i].w,
        u: tri.texcoords[i].x,
        v: tri.texcoords[i].y,
    });
    if c[0].y > c[1].y {
        c.swap(0, 1);
    }
    if c[1].y > c[2].y {
        c.swap(1, 2);
    }
    if c[0].y > c[1].y {
        c.swap(0, 1);
    }
    c
}

/// Δx/Δy of an edge; horizontal edges are never walked so they get 0
fn inv_slope(from: &Corner, to: &Corner) -> f32 {
    if to.y != from.y {
        (to.x as f32 - from.x as f32) / (to.y as f32 - from.y as f32)
    } else {
        0.0
    }
}

/// x where the edge leaving `from` with slope `slope` crosses row `y`
fn edge_x(from: &Corner, slope: f32, y: i32) -> f32 {
    from.x as f32 + (y as f32 - from.y as f32) * slope
}

fn span(y: i32, a: f32, b: f32) -> (i32, i32, i32) {
    let (mut x_start, mut x_end) = (a as i32, b as i32);
    if x_start > x_end {
        std::mem::swap(&mut x_start, &mut x_end);
    }
    (y, x_start, x_end)
}

/// Scanline spans `(y, x_start, x_end)` covering the triangle, `x_end` exclusive
///
/// Only rows in `[0, height)` are produced.
fn spans(c: &[Corner; 3], height: i32) -> impl Iterator<Item = (i32, i32, i32)> {
    let (c0, c1, c2) = (c[0], c[1], c[2]);
    let long_slope = inv_slope(&c0, &c2);
    let top_slope = inv_slope(&c0, &c1);
    let bottom_slope = inv_slope(&c1, &c2);

    let rows = move |from: i32, to: i32| from.max(0)..=to.min(height - 1);
    // Row y1 belongs to the bottom half when there is one
    let top_end = if c2.y != c1.y { c1.y.saturating_sub(1) } else { c1.y };
    let top_rows = if c1.y != c0.y { rows(c0.y, top_end) } else { rows(1, 0) };
    let bottom_rows = if c2.y != c1.y { rows(c1.y, c2.y) } else { rows(1, 0) };

    let top = top_rows.map(move |y| {
        span(y, edge_x(&c1, top_slope, y), edge_x(&c0, long_slope, y))
    });
    let bottom = bottom_rows.map(move |y| {
        span(y, edge_x(&c1, bottom_slope, y), edge_x(&c0, long_slope, y))
    });
    top.chain(bottom)
}

/// Walk every covered pixel, depth test it and write what `shade` returns
///
/// `shade` receives the sorted corners, the pixel's barycentric weights and
/// the interpolated `1/w`.
fn rasterize<F>(fb: &mut Framebuffer, tri: &Triangle, depth_mode: DepthMode, mut shade: F)
where
    F: FnMut(&[Corner; 3], Vec3, f32) -> u32,
{
    let c = sorted_corners(tri);
    let (a, b, cc) = (c[0].screen(), c[1].screen(), c[2].screen());
    if (cc - a).cross(b - a).abs() < f32::EPSILON {
        return;
    }
    // A zero w would put the vertex at infinity
    if c.iter().any(|corner| corner.w == 0.0) {
        return;
    }

    let width = fb.width() as i32;
    let height = fb.height() as i32;

    for (y, x_start, x_end) in spans(&c, height) {
        for x in x_start.max(0)..x_end.min(width) {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(weights) = barycentric_weights(a, b, cc, p) else {
                continue;
            };

            // 1/w is linear in screen space, w is not
            let inv_w = weights.x / c[0].w + weights.y / c[1].w + weights.z / c[2].w;
            let depth = 1.0 - inv_w;

            match depth_mode {
                DepthMode::ZBuffer => {
                    if fb.depth_at(x, y).map_or(true, |stored| depth >= stored) {
                        continue;
                    }
                    let color = shade(&c, weights, inv_w);
                    fb.set_pixel_with_depth(x, y, depth, color);
                }
                DepthMode::PainterSort => {
                    let color = shade(&c, weights, inv_w);
                    fb.set_pixel(x, y, color);
                }
            }
        }
    }
}

/// Fill a triangle with its (already lit) solid color
pub fn draw_filled_triangle(fb: &mut Framebuffer, tri: &Triangle, depth_mode: DepthMode) {
    let color = tri.color;
    rasterize(fb, tri, depth_mode, |_, _, _| color);
}

/// Fill a triangle with perspective-correct texture samples, lit by the
/// triangle's flat intensity
pub fn draw_textured_triangle(
    fb: &mut Framebuffer,
    tri: &Triangle,
    texture: &Texture,
    depth_mode: DepthMode,
) {
    let intensity = tri.intensity;
    rasterize(fb, tri, depth_mode, |c, bc, inv_w| {
        let u = (bc.x * c[0].u / c[0].w + bc.y * c[1].u / c[1].w + bc.z * c[2].u / c[2].w) / inv_w;
        let v = (bc.x * c[0].v / c[0].w + bc.y * c[1].v / c[1].w + bc.z * c[2].v / c[2].w) / inv_w;
        light_apply_intensity(texture.sample(u, v), intensity)
    });
}
