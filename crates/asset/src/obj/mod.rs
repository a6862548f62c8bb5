//! OBJ loader supporting positions, texture coordinates, normals and
//! triangle/polygon faces.
//!
//! Faces are expanded into a flat per-corner vertex stream with a sequential
//! index buffer unless [`ObjLoadOptions::deduplicate`] is set.

mod document;
mod statement;

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use glam::Vec3;

use crate::{
    error::{ObjError, ObjResult},
    mesh::{DEFAULT_COLOR, Mesh, MeshBuilder, MeshVertex},
};

pub use document::{Corner, ObjDocument, Triangle};
pub use statement::{CornerRef, Statement, parse_line, parse_line_bytes};

/// Fallback when a corner has no normal and its triangle is degenerate.
const FALLBACK_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjLoadOptions {
    /// Share one output vertex between corners with identical attributes.
    pub deduplicate: bool,
    /// Colour written to every vertex.
    pub default_color: [f32; 4],
}

impl Default for ObjLoadOptions {
    fn default() -> Self {
        Self {
            deduplicate: false,
            default_color: DEFAULT_COLOR,
        }
    }
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>, options: &ObjLoadOptions) -> ObjResult<Mesh> {
    let path = path.as_ref();
    log::info!("Loading OBJ mesh from {:?}", path);

    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_obj_from_reader(BufReader::new(file), options)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R, options: &ObjLoadOptions) -> ObjResult<Mesh> {
    let doc = ObjDocument::parse(reader)?;
    build_mesh(&doc, options)
}

/// Convenience helper to parse an OBJ string literal with default options.
pub fn load_obj_from_str(contents: &str) -> ObjResult<Mesh> {
    build_mesh(&ObjDocument::parse_str(contents)?, &ObjLoadOptions::default())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
enum NormalKey {
    Index(usize),
    Flat([u32; 3]),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Key(usize, Option<usize>, NormalKey);

/// Expand the triangles of `doc` into a renderable mesh.
pub fn build_mesh(doc: &ObjDocument, options: &ObjLoadOptions) -> ObjResult<Mesh> {
    let corner_count = doc.corner_count();
    let mut builder = MeshBuilder::new();
    builder.reserve_vertex_space(corner_count);
    let mut unique: HashMap<Key, u32> = HashMap::new();

    for tri in &doc.triangles {
        let [a, b, c] = tri.corners;
        let positions = [
            doc.position(&a, tri.line)?,
            doc.position(&b, tri.line)?,
            doc.position(&c, tri.line)?,
        ];
        let mut flat_normal = None;

        for (corner, position) in tri.corners.iter().zip(positions) {
            let uv = doc.texcoord(corner, tri.line)?.unwrap_or([0.0, 0.0]);
            let (normal, normal_key) = match (doc.normal(corner, tri.line)?, corner.normal) {
                (Some(n), Some(i)) => (n, NormalKey::Index(i)),
                _ => {
                    let n = *flat_normal.get_or_insert_with(|| face_normal(positions));
                    (n, NormalKey::Flat(n.map(f32::to_bits)))
                }
            };
            let vertex = MeshVertex::new(position, normal, uv, options.default_color);

            let index = if options.deduplicate {
                let key = Key(corner.position, corner.texcoord, normal_key);
                match unique.get(&key) {
                    Some(&idx) => idx,
                    None => {
                        let idx = builder.add_vertex(vertex)?;
                        unique.insert(key, idx);
                        idx
                    }
                }
            } else {
                builder.add_vertex(vertex)?
            };
            builder.add_index(index);
        }
    }

    if doc.triangles.is_empty() {
        log::warn!("OBJ source contained no faces; mesh is empty");
    } else if options.deduplicate {
        log::debug!(
            "Deduplicated {} corners into {} vertices",
            corner_count,
            builder.vertex_count()
        );
    }

    let mesh = builder.bake()?;
    log::info!(
        "Loaded mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Unit normal of a counter-clockwise triangle.
fn face_normal([a, b, c]: [[f32; 3]; 3]) -> [f32; 3] {
    let (a, b, c) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
    let n = (b - a).cross(c - a).normalize_or_zero();
    if n == Vec3::ZERO {
        FALLBACK_NORMAL
    } else {
        n.to_array()
    }
}
