//! Vector and matrix math for the transform pipeline
//!
//! Conventions (fixed for the whole crate):
//! - Left-handed space, +Z points into the screen.
//! - Column vectors: a matrix transforms a vector as `M * v`.
//! - Rotations are in radians; looking down an axis towards the origin a
//!   positive angle turns clockwise. The same convention is used by the
//!   matrix builders and the direct-formula `Vec3::rotate_*` helpers.
//!
//! Vector operations are pure: they take `self` by value and return a new
//! vector.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// 2D Vector (screen points, texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Z component of the 3D cross product, i.e. the signed parallelogram area
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn rotate_x(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3 {
            x: self.x,
            y: self.y * c - self.z * s,
            z: self.y * s + self.z * c,
        }
    }

    pub fn rotate_y(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3 {
            x: self.x * c + self.z * s,
            y: self.y,
            z: -self.x * s + self.z * c,
        }
    }

    pub fn rotate_z(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3 {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
            z: self.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

/// Homogeneous 4D vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Point with `w = 1`
    pub fn from_vec3(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 1.0 }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// 4x4 matrix, row-major storage: `m[row][col]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = sx;
        out.m[1][1] = sy;
        out.m[2][2] = sz;
        out
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][3] = tx;
        out.m[1][3] = ty;
        out.m[2][3] = tz;
        out
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[1][1] = c;
        out.m[1][2] = -s;
        out.m[2][1] = s;
        out.m[2][2] = c;
        out
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0][0] = c;
        out.m[0][2] = s;
        out.m[2][0] = -s;
        out.m[2][2] = c;
        out
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0][0] = c;
        out.m[0][1] = -s;
        out.m[1][0] = s;
        out.m[1][1] = c;
        out
    }

    /// Perspective projection.
    ///
    /// `fov` is the vertical field of view in radians, `aspect` is
    /// width / height. The result maps a camera-space point to clip space
    /// with `w` equal to the camera-space `z`, so dividing by `w` yields
    /// normalized device coordinates while `w` itself keeps the linear depth
    /// needed for perspective-correct interpolation. Clip `z` is remapped so
    /// that `z/w` runs from 0 at `znear` to 1 at `zfar`.
    pub fn perspective(fov: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let f = 1.0 / (fov / 2.0).tan();
        let mut out = Mat4 { m: [[0.0; 4]; 4] };
        out.m[0][0] = f / aspect;
        out.m[1][1] = f;
        out.m[2][2] = zfar / (zfar - znear);
        out.m[2][3] = (-zfar * znear) / (zfar - znear);
        out.m[3][2] = 1.0;
        out
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            w: m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        }
    }

    /// Multiply, then perspective-divide `x`, `y` and `z` by `w`.
    ///
    /// The returned `w` is the undivided clip-space `w` (camera-space depth
    /// for a projection matrix). A zero `w` leaves the components undivided.
    pub fn mul_vec4_project(&self, v: Vec4) -> Vec4 {
        let mut out = self.mul_vec4(v);
        if out.w != 0.0 {
            out.x /= out.w;
            out.y /= out.w;
            out.z /= out.w;
        }
        out
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut out = Mat4 { m: [[0.0; 4]; 4] };
        for row in 0..4 {
            for col in 0..4 {
                out.m[row][col] = (0..4).map(|k| self.m[row][k] * other.m[k][col]).sum();
            }
        }
        out
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.mul_vec4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 0.0001;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.len() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_matrix_matches_direct_formula() {
        let v = Vec3::new(0.3, -1.2, 2.5);
        let angle = 0.7;
        let p = Vec4::from_vec3(v);
        assert!(close((Mat4::rotation_x(angle) * p).xyz(), v.rotate_x(angle)));
        assert!(close((Mat4::rotation_y(angle) * p).xyz(), v.rotate_y(angle)));
        assert!(close((Mat4::rotation_z(angle) * p).xyz(), v.rotate_z(angle)));
    }

    #[test]
    fn test_quarter_turns() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        assert!(close(x.rotate_z(FRAC_PI_2), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(x.rotate_y(FRAC_PI_2), Vec3::new(0.0, 0.0, -1.0)));
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert!(close(y.rotate_x(FRAC_PI_2), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_matrix_product_order() {
        // Scale first, then translate
        let m = Mat4::translation(1.0, 0.0, 0.0) * Mat4::scale(2.0, 2.0, 2.0);
        let p = m * Vec4::from_vec3(Vec3::new(1.0, 1.0, 1.0));
        assert!(close(p.xyz(), Vec3::new(3.0, 2.0, 2.0)));

        let m = Mat4::scale(2.0, 2.0, 2.0) * Mat4::translation(1.0, 0.0, 0.0);
        let p = m * Vec4::from_vec3(Vec3::new(1.0, 1.0, 1.0));
        assert!(close(p.xyz(), Vec3::new(4.0, 2.0, 2.0)));
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = Mat4::rotation_y(0.4) * Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(Mat4::identity() * m, m);
        assert_eq!(m * Mat4::identity(), m);
    }

    #[test]
    fn test_project_keeps_camera_depth_in_w() {
        let proj = Mat4::perspective(FRAC_PI_2, 1.0, 0.1, 100.0);
        let p = proj.mul_vec4_project(Vec4::new(2.0, -1.0, 4.0, 1.0));
        assert!((p.w - 4.0).abs() < EPS);
        // fov 90 deg => f = 1, so ndc = x / z
        assert!((p.x - 0.5).abs() < EPS);
        assert!((p.y + 0.25).abs() < EPS);
    }

    #[test]
    fn test_projected_z_spans_near_to_far() {
        let proj = Mat4::perspective(1.0, 1.5, 0.5, 50.0);
        let near = proj.mul_vec4_project(Vec4::new(0.0, 0.0, 0.5, 1.0));
        let far = proj.mul_vec4_project(Vec4::new(0.0, 0.0, 50.0, 1.0));
        assert!(near.z.abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }
}
