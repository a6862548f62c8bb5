//! Errors produced while loading OBJ files and baking meshes.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Attribute pool a face corner indexes into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Pool {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pool::Position => "position",
            Pool::TexCoord => "texture coordinate",
            Pool::Normal => "normal",
        })
    }
}

/// Coarse classification of [`ObjError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ObjErrorKind {
    /// The source could not be opened or read.
    FileAccess,
    /// A recognised line had missing or non-numeric fields.
    Parse,
    /// An index pointed outside its pool (or outside the vertex buffer).
    IndexRange,
}

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to open OBJ file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("missing {what} on line {line}")]
    MissingField { line: usize, what: &'static str },

    #[error("invalid {what} '{token}' on line {line}")]
    InvalidNumber {
        line: usize,
        what: &'static str,
        token: String,
    },

    #[error("line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("malformed face corner '{token}' on line {line}")]
    MalformedCorner { line: usize, token: String },

    #[error("face on line {line} has {count} corners, at least 3 are required")]
    TooFewCorners { line: usize, count: usize },

    #[error("{pool} index 0 on line {line} (OBJ indices are 1-based)")]
    ZeroIndex { line: usize, pool: Pool },

    #[error("{pool} index {index} on line {line} is out of range (pool has {len} entries)")]
    IndexOutOfRange {
        line: usize,
        pool: Pool,
        index: i64,
        len: usize,
    },

    #[error("index {index} references a missing vertex (mesh has {vertex_count} vertices)")]
    IndexPastVertices { index: u32, vertex_count: usize },

    #[error("too many vertices for 32-bit indices (>{max})", max = u32::MAX)]
    TooManyVertices,
}

impl ObjError {
    pub fn kind(&self) -> ObjErrorKind {
        match self {
            ObjError::Open { .. } | ObjError::Read { .. } => ObjErrorKind::FileAccess,
            ObjError::MissingField { .. }
            | ObjError::InvalidNumber { .. }
            | ObjError::InvalidUtf8 { .. }
            | ObjError::MalformedCorner { .. }
            | ObjError::TooFewCorners { .. } => ObjErrorKind::Parse,
            ObjError::ZeroIndex { .. }
            | ObjError::IndexOutOfRange { .. }
            | ObjError::IndexPastVertices { .. }
            | ObjError::TooManyVertices => ObjErrorKind::IndexRange,
        }
    }

    /// 1-based source line the error was raised on, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::Read { line, .. }
            | ObjError::MissingField { line, .. }
            | ObjError::InvalidNumber { line, .. }
            | ObjError::InvalidUtf8 { line }
            | ObjError::MalformedCorner { line, .. }
            | ObjError::TooFewCorners { line, .. }
            | ObjError::ZeroIndex { line, .. }
            | ObjError::IndexOutOfRange { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type ObjResult<T> = Result<T, ObjError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let open = ObjError::Open {
            path: "missing.obj".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(open.kind(), ObjErrorKind::FileAccess);
        assert_eq!(open.line(), None);

        let parse = ObjError::InvalidNumber {
            line: 7,
            what: "x coordinate",
            token: "abc".into(),
        };
        assert_eq!(parse.kind(), ObjErrorKind::Parse);
        assert_eq!(parse.line(), Some(7));

        let range = ObjError::ZeroIndex {
            line: 2,
            pool: Pool::Normal,
        };
        assert_eq!(range.kind(), ObjErrorKind::IndexRange);
    }

    #[test]
    fn messages_name_line_and_token() {
        let err = ObjError::IndexOutOfRange {
            line: 10,
            pool: Pool::Position,
            index: 4,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "position index 4 on line 10 is out of range (pool has 3 entries)"
        );

        let err = ObjError::InvalidNumber {
            line: 3,
            what: "u coordinate",
            token: "1.x".into(),
        };
        assert_eq!(err.to_string(), "invalid u coordinate '1.x' on line 3");
    }
}
