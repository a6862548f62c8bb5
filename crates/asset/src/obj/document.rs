//! Attribute pools and face list collected from an OBJ source.

use std::io::{self, BufRead};

use crate::{
    error::{ObjError, ObjResult, Pool},
    obj::statement::{CornerRef, Statement, parse_line_bytes},
};

/// Face corner with 0-based pool offsets.
///
/// Negative (relative) indices are already resolved against the pool size at
/// the point the face was read. Positive indices are not yet bounds-checked;
/// see [`ObjDocument::position`] and friends.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Corner {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// One triangle in file order. Polygons are fan-triangulated on read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Triangle {
    /// 1-based source line of the face.
    pub line: usize,
    pub corners: [Corner; 3],
}

/// Raw data of an OBJ file: three attribute pools plus triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjDocument {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<Triangle>,
    /// Number of `f` lines (a quad counts once here, twice in `triangles`).
    pub face_count: usize,
    /// Directives that were recognised but not used.
    pub ignored: usize,
}

impl ObjDocument {
    pub fn parse<R: BufRead>(reader: R) -> ObjResult<Self> {
        let mut doc = ObjDocument::default();

        for (idx, line) in reader.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| ObjError::Read {
                line: line_no,
                source,
            })?;

            match parse_line_bytes(&line, line_no)? {
                None => {}
                Some(Statement::Position(p)) => doc.positions.push(p),
                Some(Statement::TexCoord(t)) => doc.texcoords.push(t),
                Some(Statement::Normal(n)) => doc.normals.push(n),
                Some(Statement::Face(corners)) => doc.push_face(&corners, line_no)?,
                Some(Statement::Other(tag)) => {
                    log::trace!("Ignoring '{}' directive on line {}", tag, line_no);
                    doc.ignored += 1;
                }
            }
        }

        log::debug!(
            "OBJ pools: {} positions, {} texcoords, {} normals; {} faces -> {} triangles; {} ignored directives",
            doc.positions.len(),
            doc.texcoords.len(),
            doc.normals.len(),
            doc.face_count,
            doc.triangles.len(),
            doc.ignored
        );

        Ok(doc)
    }

    pub fn parse_str(contents: &str) -> ObjResult<Self> {
        Self::parse(io::Cursor::new(contents))
    }

    /// Total number of triangle corners, i.e. the vertex count of the
    /// expanded stream.
    pub fn corner_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn position(&self, corner: &Corner, line: usize) -> ObjResult<[f32; 3]> {
        lookup(&self.positions, corner.position, Pool::Position, line)
    }

    pub fn texcoord(&self, corner: &Corner, line: usize) -> ObjResult<Option<[f32; 2]>> {
        corner
            .texcoord
            .map(|i| lookup(&self.texcoords, i, Pool::TexCoord, line))
            .transpose()
    }

    pub fn normal(&self, corner: &Corner, line: usize) -> ObjResult<Option<[f32; 3]>> {
        corner
            .normal
            .map(|i| lookup(&self.normals, i, Pool::Normal, line))
            .transpose()
    }

    fn push_face(&mut self, refs: &[CornerRef], line: usize) -> ObjResult<()> {
        let corners = refs
            .iter()
            .map(|r| self.resolve_corner(r, line))
            .collect::<ObjResult<Vec<_>>>()?;

        // Triangulate fan
        for tri in 1..(corners.len() - 1) {
            self.triangles.push(Triangle {
                line,
                corners: [corners[0], corners[tri], corners[tri + 1]],
            });
        }
        self.face_count += 1;
        Ok(())
    }

    fn resolve_corner(&self, r: &CornerRef, line: usize) -> ObjResult<Corner> {
        Ok(Corner {
            position: resolve_index(r.position, self.positions.len(), Pool::Position, line)?,
            texcoord: r
                .texcoord
                .map(|i| resolve_index(i, self.texcoords.len(), Pool::TexCoord, line))
                .transpose()?,
            normal: r
                .normal
                .map(|i| resolve_index(i, self.normals.len(), Pool::Normal, line))
                .transpose()?,
        })
    }
}

/// Convert a 1-based or negative (relative) OBJ index to a 0-based offset.
fn resolve_index(raw: i64, len: usize, pool: Pool, line: usize) -> ObjResult<usize> {
    if raw == 0 {
        return Err(ObjError::ZeroIndex { line, pool });
    }
    if raw > 0 {
        return usize::try_from(raw - 1).map_err(|_| ObjError::IndexOutOfRange {
            line,
            pool,
            index: raw,
            len,
        });
    }

    let idx = len as i64 + raw;
    if idx < 0 {
        return Err(ObjError::IndexOutOfRange {
            line,
            pool,
            index: raw,
            len,
        });
    }
    Ok(idx as usize)
}

fn lookup<T: Copy>(pool: &[T], idx: usize, kind: Pool, line: usize) -> ObjResult<T> {
    pool.get(idx).copied().ok_or(ObjError::IndexOutOfRange {
        line,
        pool: kind,
        index: idx as i64 + 1,
        len: pool.len(),
    })
}
