//! Triangle meshes with a per-instance transform

use crate::rasterizer::{Color, Mat4, Vec2, Vec3};

/// A triangle face: 0-based vertex indices, per-corner UVs and a base color
///
/// Corners are listed clockwise as seen from the front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub a_uv: Vec2,
    pub b_uv: Vec2,
    pub c_uv: Vec2,
    pub color: u32,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            a_uv: Vec2::default(),
            b_uv: Vec2::default(),
            c_uv: Vec2::default(),
            color: Color::WHITE.to_argb(),
        }
    }

    pub fn with_uvs(mut self, a_uv: Vec2, b_uv: Vec2, c_uv: Vec2) -> Self {
        self.a_uv = a_uv;
        self.b_uv = b_uv;
        self.c_uv = c_uv;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    pub fn uvs(&self) -> [Vec2; 3] {
        [self.a_uv, self.b_uv, self.c_uv]
    }
}

/// Vertex and face data plus the transform applied every frame
///
/// `vertices` and `faces` are fixed once built; only `rotation`, `scale` and
/// `translation` change afterwards. Every face index is a valid position in
/// `vertices` (enforced by `Mesh::new`).
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
    pub translation: Vec3,
}

impl Mesh {
    /// Build a mesh, dropping faces that reference missing vertices
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        let count = vertices.len();
        let total = faces.len();
        let faces: Vec<Face> = faces
            .into_iter()
            .filter(|f| f.indices().iter().all(|&i| i < count))
            .collect();
        if faces.len() != total {
            log::warn!("Dropped {} faces with out-of-range vertex indices", total - faces.len());
        }

        Self {
            vertices,
            faces,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Local-to-camera matrix: scale, then rotate Z, Y, X, then translate
    pub fn world_matrix(&self) -> Mat4 {
        let mut world = Mat4::identity();
        world = Mat4::scale(self.scale.x, self.scale.y, self.scale.z) * world;
        world = Mat4::rotation_z(self.rotation.z) * world;
        world = Mat4::rotation_y(self.rotation.y) * world;
        world = Mat4::rotation_x(self.rotation.x) * world;
        world = Mat4::translation(self.translation.x, self.translation.y, self.translation.z) * world;
        world
    }

    /// Axis-aligned unit cube (corners at +-1): 8 vertices, 12 faces
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];

        // Each side is two triangles: (p, q, r) and (p, r, s) going clockwise
        // from the bottom-left corner, UVs (0,0) (0,1) (1,1) (1,0).
        let sides = [
            [0, 1, 2, 3], // front
            [3, 2, 4, 5], // right
            [5, 4, 6, 7], // back
            [7, 6, 1, 0], // left
            [1, 6, 4, 2], // top
            [5, 7, 0, 3], // bottom
        ];
        let bl = Vec2::new(0.0, 0.0);
        let tl = Vec2::new(0.0, 1.0);
        let tr = Vec2::new(1.0, 1.0);
        let br = Vec2::new(1.0, 0.0);

        let mut faces = Vec::with_capacity(sides.len() * 2);
        for [p, q, r, s] in sides {
            faces.push(Face::new(p, q, r).with_uvs(bl, tl, tr));
            faces.push(Face::new(p, r, s).with_uvs(bl, tr, br));
        }

        Self::new(vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vec4;

    const EPS: f32 = 0.0001;

    #[test]
    fn test_cube_shape() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 12);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube();
        for face in cube.faces() {
            let [a, b, c] = face.indices().map(|i| cube.vertices()[i]);
            let normal = (b - a).cross(c - a).normalize();
            let center = (a + b + c).scale(1.0 / 3.0);
            assert!(normal.dot(center) > 0.0, "face {:?} faces inward", face);
        }
    }

    #[test]
    fn test_invalid_faces_dropped() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::ONE, Vec3::new(1.0, 0.0, 0.0)],
            vec![Face::new(0, 1, 2), Face::new(0, 1, 3)],
        );
        assert_eq!(mesh.faces().len(), 1);
    }

    #[test]
    fn test_world_matrix_order() {
        let mut mesh = Mesh::cube();
        mesh.scale = Vec3::new(2.0, 1.0, 1.0);
        mesh.rotation = Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        mesh.translation = Vec3::new(0.0, 0.0, 5.0);

        // Scale stretches x first, rotating Z turns +x into +y, then translate
        let p = mesh.world_matrix() * Vec4::from_vec3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert!((p.z - 5.0).abs() < EPS);
    }

    #[test]
    fn test_world_matrix_rotates_z_before_x() {
        let mut mesh = Mesh::cube();
        let half = std::f32::consts::FRAC_PI_2;
        mesh.rotation = Vec3::new(half, 0.0, half);

        // Z first: +x -> +y, then X: +y -> +z
        let p = mesh.world_matrix() * Vec4::from_vec3(Vec3::new(1.0, 0.0, 0.0));
        let expected = Vec3::new(1.0, 0.0, 0.0).rotate_z(half).rotate_x(half);
        assert!((p.xyz() - expected).len() < EPS);
        assert!((p.z - 1.0).abs() < EPS);
    }
}
