//! Wavefront OBJ ingestion
//!
//! Reads `v`, `vt` and `f` records; everything else is ignored. A malformed
//! record is skipped with a warning instead of failing the whole load.
//! Polygons with more than three corners are split into a triangle fan.
//! Indices are 1-based in the file and 0-based in the resulting `Mesh`.

use super::mesh::{Face, Mesh};
use crate::error::AssetError;
use crate::rasterizer::{Vec2, Vec3};
use std::fs;
use std::path::Path;

/// Load a mesh from an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = parse_obj(&contents, &path.display().to_string())?;
    log::info!(
        "Loaded mesh: {} ({} vertices, {} faces)",
        path.display(),
        mesh.vertices().len(),
        mesh.faces().len()
    );
    Ok(mesh)
}

/// Parse OBJ text; `name` is only used in messages
pub fn parse_obj(contents: &str, name: &str) -> Result<Mesh, AssetError> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line_no, line) in contents.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let parsed = match tokens.next() {
            Some("v") => parse_floats::<3>(tokens).map(|[x, y, z]| vertices.push(Vec3::new(x, y, z))),
            // Third texture component is optional and unused
            Some("vt") => parse_floats::<2>(tokens).map(|[u, v]| texcoords.push(Vec2::new(u, v))),
            Some("f") => parse_face(tokens, vertices.len(), &texcoords).map(|polygon| faces.extend(polygon)),
            _ => Some(()),
        };
        if parsed.is_none() {
            log::warn!("{}:{}: skipping malformed line: {}", name, line_no + 1, line.trim());
        }
    }

    if faces.is_empty() {
        return Err(AssetError::EmptyMesh(name.to_string()));
    }
    Ok(Mesh::new(vertices, faces))
}

/// First `N` tokens as floats, extra tokens ignored
fn parse_floats<'a, const N: usize>(mut tokens: impl Iterator<Item = &'a str>) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(out)
}

/// One `f` record as a triangle fan; `None` if any corner is unusable
fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    vertex_count: usize,
    texcoords: &[Vec2],
) -> Option<Vec<Face>> {
    let corners: Vec<(usize, Vec2)> = tokens
        .map(|token| parse_corner(token, vertex_count, texcoords))
        .collect::<Option<_>>()?;
    if corners.len() < 3 {
        return None;
    }

    let (first, first_uv) = corners[0];
    let fan = corners.windows(2).skip(1).map(|pair| {
        let (b, b_uv) = pair[0];
        let (c, c_uv) = pair[1];
        Face::new(first, b, c).with_uvs(first_uv, b_uv, c_uv)
    });
    Some(fan.collect())
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn` with 1-based indices
fn parse_corner(token: &str, vertex_count: usize, texcoords: &[Vec2]) -> Option<(usize, Vec2)> {
    let mut parts = token.split('/');
    let vertex = to_zero_based(parts.next()?, vertex_count)?;
    let uv = match parts.next() {
        Some(t) if !t.is_empty() => *texcoords.get(to_zero_based(t, texcoords.len())?)?,
        _ => Vec2::default(),
    };
    Some((vertex, uv))
}

fn to_zero_based(token: &str, count: usize) -> Option<usize> {
    let index: usize = token.parse().ok()?;
    if index == 0 || index > count {
        return None;
    }
    Some(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit quad
o quad
v -1 -1 0
v -1 1 0
v 1 1 0
v 1 -1 0
vt 0 0
vt 0 1
vt 1 1
vt 1 0
vn 0 0 -1
s off
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn test_parse_quad() {
        let mesh = parse_obj(QUAD, "quad").unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.faces().len(), 2);

        let f = mesh.faces()[1];
        assert_eq!(f.indices(), [0, 2, 3]);
        assert_eq!(f.uvs(), [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_polygon_fan() {
        let text = "v 0 0 0\nv 0 1 0\nv 1 1 0\nv 1 0 0\nv 2 0 0\nf 1 2 3 4 5\n";
        let mesh = parse_obj(text, "pentagon").unwrap();
        let faces: Vec<[usize; 3]> = mesh.faces().iter().map(|f| f.indices()).collect();
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
    }

    #[test]
    fn test_vertex_normal_only_corners() {
        let text = "v 0 0 0\nv 0 1 0\nv 1 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(text, "tri").unwrap();
        assert_eq!(mesh.faces()[0].indices(), [0, 1, 2]);
        assert_eq!(mesh.faces()[0].a_uv, Vec2::default());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "\
v 0 0 0
v 0 1 0
v nope 1 0
v 1 1 0
v 1 0
f 1 2
f 1 2 9
f 1 2 3
f a b c
";
        let mesh = parse_obj(text, "broken").unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.faces()[0].indices(), [0, 1, 2]);
    }

    #[test]
    fn test_no_faces_is_an_error() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\n", "points").unwrap_err();
        assert!(matches!(err, AssetError::EmptyMesh(_)));
    }
}
