//! CPU-side mesh representation produced by loaders.

use std::{mem, sync::Arc};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::{ObjError, ObjResult};

/// Opaque white.
pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Interleaved vertex: position/normal/uv/color. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// One attribute inside the interleaved [`MeshVertex`] layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VertexAttribute {
    pub name: &'static str,
    /// Byte offset from the start of the vertex.
    pub offset: usize,
    /// Number of `f32` components.
    pub components: u32,
}

impl MeshVertex {
    pub const STRIDE: usize = mem::size_of::<MeshVertex>();

    pub const ATTRIBUTES: [VertexAttribute; 4] = [
        VertexAttribute {
            name: "position",
            offset: mem::offset_of!(MeshVertex, position),
            components: 3,
        },
        VertexAttribute {
            name: "normal",
            offset: mem::offset_of!(MeshVertex, normal),
            components: 3,
        },
        VertexAttribute {
            name: "uv",
            offset: mem::offset_of!(MeshVertex, uv),
            components: 2,
        },
        VertexAttribute {
            name: "color",
            offset: mem::offset_of!(MeshVertex, color),
            components: 4,
        },
    ];

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            uv,
            color,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    pub fn size(&self) -> [f32; 3] {
        (Vec3::from(self.max) - Vec3::from(self.min)).to_array()
    }

    pub fn center(&self) -> [f32; 3] {
        ((Vec3::from(self.min) + Vec3::from(self.max)) * 0.5).to_array()
    }
}

/// Accumulates vertices and indices, then bakes them into an immutable [`Mesh`].
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve_vertex_space(&mut self, additional: usize) {
        self.vertices.reserve(additional);
        self.indices.reserve(additional);
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: MeshVertex) -> ObjResult<u32> {
        let idx = u32::try_from(self.vertices.len()).map_err(|_| ObjError::TooManyVertices)?;
        self.vertices.push(vertex);
        Ok(idx)
    }

    pub fn add_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Finish building. Fails if any index points past the vertex buffer.
    pub fn bake(self) -> ObjResult<Mesh> {
        let vertex_count = self.vertices.len();
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(ObjError::IndexPastVertices {
                index,
                vertex_count,
            });
        }

        log::debug!(
            "Baked mesh: {} vertices, {} indices",
            vertex_count,
            self.indices.len()
        );

        Ok(Mesh {
            inner: Arc::new(MeshStorage {
                vertices: self.vertices,
                indices: self.indices,
            }),
        })
    }
}

#[derive(Debug, PartialEq)]
struct MeshStorage {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

/// Immutable indexed triangle mesh. Clones share the same storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    inner: Arc<MeshStorage>,
}

impl Mesh {
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.inner.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.inner.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.inner.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.inner.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.inner.vertices.is_empty() || self.inner.indices.is_empty()
    }

    /// Vertex buffer as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.inner.vertices)
    }

    /// Index buffer as raw bytes (`u32` little/native endian).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.inner.indices)
    }

    /// Bounding box of all vertex positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.inner.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Bounds {
            min: min.to_array(),
            max: max.to_array(),
        })
    }
}
