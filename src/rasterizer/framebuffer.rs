//! Color and depth buffers plus the 2D drawing primitives
//!
//! Every pixel address goes through `Framebuffer::index`, which is the only
//! place the `y * width + x` layout is spelled out.

use super::types::Color;

/// Depth value of an empty pixel (`1 - 1/w` as `w` goes to infinity)
pub const FAR_DEPTH: f32 = 1.0;

/// Framebuffer for software rendering
///
/// Owns a packed `0xAARRGGBB` color buffer and a parallel depth buffer of
/// the same dimensions. Smaller depth values are nearer.
pub struct Framebuffer {
    pixels: Vec<u32>,
    zbuffer: Vec<f32>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK.to_argb(); width * height],
            zbuffer: vec![FAR_DEPTH; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate both buffers together; a no-op when the size is unchanged
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        log::debug!("Framebuffer resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.pixels = vec![Color::BLACK.to_argb(); width * height];
        self.zbuffer = vec![FAR_DEPTH; width * height];
        self.width = width;
        self.height = height;
    }

    /// Buffer offset of (x, y), or `None` when outside the buffer
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Fill the whole color buffer
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Reset every depth value to `FAR_DEPTH`
    pub fn clear_depth(&mut self) {
        self.zbuffer.fill(FAR_DEPTH);
    }

    /// Bounds-checked pixel write; out-of-range coordinates are dropped
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.zbuffer[idx])
    }

    /// Write `color` only if `depth` is nearer than the stored value
    ///
    /// Returns true when the pixel was written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        if let Some(idx) = self.index(x, y) {
            if depth < self.zbuffer[idx] {
                self.zbuffer[idx] = depth;
                self.pixels[idx] = color;
                return true;
            }
        }
        false
    }

    /// Read-only view of the finished color buffer
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn depth(&self) -> &[f32] {
        &self.zbuffer
    }

    /// Color buffer as RGBA bytes, 4 per pixel (for texture upload)
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| Color::from_argb(p).to_bytes())
            .collect()
    }

    /// Dotted grid, one pixel every `spacing` pixels
    pub fn draw_grid(&mut self, spacing: usize, color: u32) {
        let spacing = spacing.max(1);
        for y in (0..self.height).step_by(spacing) {
            for x in (0..self.width).step_by(spacing) {
                self.set_pixel(x as i32, y as i32, color);
            }
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) with a DDA walk along the longer axis
    ///
    /// The line is clipped to the buffer first, so only visible pixels are walked.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let Some((x0, y0, x1, y1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.set_pixel(x0, y0, color);
            return;
        }

        let x_inc = dx as f32 / steps as f32;
        let y_inc = dy as f32 / steps as f32;
        let mut x = x0 as f32;
        let mut y = y0 as f32;
        for _ in 0..=steps {
            self.set_pixel(x.round() as i32, y.round() as i32, color);
            x += x_inc;
            y += y_inc;
        }
    }

    /// Liang-Barsky clip against the buffer rectangle
    fn clip_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
        let x_max = (self.width - 1) as f64;
        let y_max = (self.height - 1) as f64;
        let (dx, dy) = (x1 - x0, y1 - y0);

        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| ((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32);
        let (a, b) = (at(t0), at(t1));
        Some((a.0, a.1, b.0, b.1))
    }

    /// Filled axis-aligned rectangle, clipped to the buffer
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        let rows = y.max(0)..y.saturating_add(height).min(self.height as i32);
        let cols = x.max(0)..x.saturating_add(width).min(self.width as i32);
        for j in rows {
            for i in cols.clone() {
                self.set_pixel(i, j, color);
            }
        }
    }

    /// Triangle outline
    pub fn draw_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
        self.draw_line(x0, y0, x1, y1, color);
        self.draw_line(x1, y1, x2, y2, color);
        self.draw_line(x2, y2, x0, y0, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = Color::RED.to_argb();

    #[test]
    fn test_out_of_bounds_writes_are_dropped() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(-1, 0, RED);
        fb.set_pixel(4, 0, RED);
        fb.set_pixel(0, 3, RED);
        fb.set_pixel(0, -7, RED);
        assert!(fb.pixels().iter().all(|&p| p == Color::BLACK.to_argb()));
        assert_eq!(fb.get_pixel(4, 0), None);

        fb.set_pixel(3, 2, RED);
        assert_eq!(fb.pixels()[2 * 4 + 3], RED);
    }

    #[test]
    fn test_clear_and_depth_reset() {
        let mut fb = Framebuffer::new(3, 3);
        assert!(fb.set_pixel_with_depth(1, 1, 0.5, RED));
        assert!(!fb.set_pixel_with_depth(1, 1, 0.7, Color::BLUE.to_argb()));
        assert_eq!(fb.get_pixel(1, 1), Some(RED));

        fb.clear(Color::GREEN.to_argb());
        fb.clear_depth();
        assert!(fb.pixels().iter().all(|&p| p == Color::GREEN.to_argb()));
        assert!(fb.depth().iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn test_resize_reallocates_both_buffers() {
        let mut fb = Framebuffer::new(2, 2);
        fb.resize(5, 7);
        assert_eq!((fb.width(), fb.height()), (5, 7));
        assert_eq!(fb.pixels().len(), 35);
        assert_eq!(fb.depth().len(), 35);
        assert_eq!(fb.index(4, 6), Some(34));
        assert_eq!(fb.index(5, 6), None);
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut fb = Framebuffer::new(10, 10);
        fb.draw_line(1, 1, 8, 4, RED);
        assert_eq!(fb.get_pixel(1, 1), Some(RED));
        assert_eq!(fb.get_pixel(8, 4), Some(RED));
        let lit = fb.pixels().iter().filter(|&&p| p == RED).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn test_draw_line_clipped_to_buffer() {
        let mut fb = Framebuffer::new(16, 8);
        fb.draw_line(-1_000_000_000, 2, 1_000_000_000, 2, RED);
        for x in 0..16 {
            assert_eq!(fb.get_pixel(x, 2), Some(RED), "x {}", x);
        }
        assert_eq!(fb.pixels().iter().filter(|&&p| p == RED).count(), 16);

        let mut fb = Framebuffer::new(16, 8);
        fb.draw_line(-5, -5, -1, 20, RED);
        assert!(fb.pixels().iter().all(|&p| p != RED));
    }

    #[test]
    fn test_draw_rect_clipped() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_rect(-3, 6, 6, i32::MAX, RED);
        assert_eq!(fb.pixels().iter().filter(|&&p| p == RED).count(), 3 * 2);
        assert_eq!(fb.get_pixel(2, 7), Some(RED));
        assert_eq!(fb.get_pixel(3, 7), Some(Color::BLACK.to_argb()));
    }

    #[test]
    fn test_grid_dots() {
        let mut fb = Framebuffer::new(25, 12);
        fb.draw_grid(10, RED);
        let dots: Vec<usize> = (0..fb.pixels().len()).filter(|&i| fb.pixels()[i] == RED).collect();
        assert_eq!(dots, vec![0, 10, 20, 250, 260, 270]);
    }

    #[test]
    fn test_rgba_bytes() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(Color::with_alpha(1, 2, 3, 4).to_argb());
        assert_eq!(fb.to_rgba8(), vec![1, 2, 3, 4]);
    }
}
