//! Asset loading: OBJ meshes into renderable vertex/index buffers.
//!
//! ```no_run
//! let mesh = asset::load_mesh("models/tank.obj")?;
//! println!("{} triangles", mesh.triangle_count());
//! # Ok::<(), asset::ObjError>(())
//! ```

pub mod error;
pub mod mesh;
pub mod obj;

use std::path::Path;

pub use error::{ObjError, ObjErrorKind, ObjResult, Pool};
pub use mesh::{Bounds, DEFAULT_COLOR, Mesh, MeshBuilder, MeshVertex, VertexAttribute};
pub use obj::{ObjDocument, ObjLoadOptions};

/// Load an OBJ file with default options (per-corner vertices, white color).
pub fn load_mesh(path: impl AsRef<Path>) -> ObjResult<Mesh> {
    obj::load_obj_from_path(path, &ObjLoadOptions::default())
}
