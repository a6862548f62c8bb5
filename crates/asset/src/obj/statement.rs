//! Line tokenizer: turns one OBJ line into a typed statement.
//!
//! No index resolution happens here; corner indices are kept exactly as written
//! (1-based, possibly negative).

use std::{num::IntErrorKind, str::SplitWhitespace};

use crate::error::{ObjError, ObjResult};

/// Index triple of a face corner as written in the file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CornerRef {
    pub position: i64,
    pub texcoord: Option<i64>,
    pub normal: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement<'a> {
    Position([f32; 3]),
    TexCoord([f32; 2]),
    Normal([f32; 3]),
    Face(Vec<CornerRef>),
    /// Recognised as a directive but not used (`o`, `g`, `usemtl`, ...).
    Other(&'a str),
}

/// Tokenize a single line. `line_no` is 1-based. Blank lines and comments
/// yield `Ok(None)`.
pub fn parse_line(line: &str, line_no: usize) -> ObjResult<Option<Statement<'_>>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut parts = trimmed.split_whitespace();
    let Some(tag) = parts.next() else {
        return Ok(None);
    };

    let statement = match tag {
        "v" => Statement::Position(parse_floats(
            &mut parts,
            line_no,
            ["x coordinate", "y coordinate", "z coordinate"],
        )?),
        "vt" => Statement::TexCoord(parse_floats(
            &mut parts,
            line_no,
            ["u coordinate", "v coordinate"],
        )?),
        "vn" => Statement::Normal(parse_floats(
            &mut parts,
            line_no,
            ["nx coordinate", "ny coordinate", "nz coordinate"],
        )?),
        "f" => {
            let corners = parts
                .map(|token| parse_corner(token, line_no))
                .collect::<ObjResult<Vec<_>>>()?;
            if corners.len() < 3 {
                return Err(ObjError::TooFewCorners {
                    line: line_no,
                    count: corners.len(),
                });
            }
            Statement::Face(corners)
        }
        other => Statement::Other(other),
    };

    Ok(Some(statement))
}

/// Tokenize a raw line that may not be valid UTF-8.
///
/// Comments and unrecognised directives are skipped without decoding; only a
/// `v`/`vt`/`vn`/`f` line with invalid UTF-8 is an error.
pub fn parse_line_bytes(bytes: &[u8], line_no: usize) -> ObjResult<Option<Statement<'_>>> {
    if let Ok(line) = std::str::from_utf8(bytes) {
        return parse_line(line, line_no);
    }

    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() || trimmed.starts_with(b"#") {
        return Ok(None);
    }
    let tag = trimmed
        .split(|b| b.is_ascii_whitespace())
        .next()
        .unwrap_or(trimmed);
    match tag {
        b"v" | b"vt" | b"vn" | b"f" => Err(ObjError::InvalidUtf8 { line: line_no }),
        other => Ok(Some(Statement::Other(
            std::str::from_utf8(other).unwrap_or("<non-utf8>"),
        ))),
    }
}

fn parse_floats<const N: usize>(
    parts: &mut SplitWhitespace<'_>,
    line_no: usize,
    names: [&'static str; N],
) -> ObjResult<[f32; N]> {
    let mut values = [0.0; N];
    for (value, what) in values.iter_mut().zip(names) {
        let token = parts.next().ok_or(ObjError::MissingField {
            line: line_no,
            what,
        })?;
        *value = token.parse::<f32>().map_err(|_| ObjError::InvalidNumber {
            line: line_no,
            what,
            token: token.to_string(),
        })?;
    }
    // Trailing fields (e.g. the optional `w`) are ignored.
    Ok(values)
}

fn parse_corner(token: &str, line_no: usize) -> ObjResult<CornerRef> {
    let malformed = || ObjError::MalformedCorner {
        line: line_no,
        token: token.to_string(),
    };

    let mut split = token.split('/');
    let position = match split.next() {
        Some(value) if !value.is_empty() => parse_index(value, line_no, "position index")?,
        _ => return Err(malformed()),
    };
    let texcoord = match split.next() {
        Some(value) if !value.is_empty() => {
            Some(parse_index(value, line_no, "texture coordinate index")?)
        }
        _ => None,
    };
    let normal = match split.next() {
        Some(value) if !value.is_empty() => Some(parse_index(value, line_no, "normal index")?),
        _ => None,
    };
    if split.next().is_some() {
        return Err(malformed());
    }

    Ok(CornerRef {
        position,
        texcoord,
        normal,
    })
}

fn parse_index(token: &str, line_no: usize, what: &'static str) -> ObjResult<i64> {
    match token.parse::<i64>() {
        Ok(value) => Ok(value),
        // Saturated values never resolve, so index validation rejects them.
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        Err(_) => Err(ObjError::InvalidNumber {
            line: line_no,
            what,
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObjErrorKind;

    fn corner(position: i64, texcoord: Option<i64>, normal: Option<i64>) -> CornerRef {
        CornerRef {
            position,
            texcoord,
            normal,
        }
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(parse_line("   \t ", 2).unwrap(), None);
        assert_eq!(parse_line("  # v 1 2 3", 3).unwrap(), None);
    }

    #[test]
    fn parses_attribute_lines() {
        assert_eq!(
            parse_line("  v 1.5 -2 3e1  ", 1).unwrap(),
            Some(Statement::Position([1.5, -2.0, 30.0]))
        );
        assert_eq!(
            parse_line("vt 0.25 0.75", 1).unwrap(),
            Some(Statement::TexCoord([0.25, 0.75]))
        );
        assert_eq!(
            parse_line("vn 0 0 1", 1).unwrap(),
            Some(Statement::Normal([0.0, 0.0, 1.0]))
        );
    }

    #[test]
    fn ignores_trailing_w_component() {
        assert_eq!(
            parse_line("v 1 2 3 1.0", 1).unwrap(),
            Some(Statement::Position([1.0, 2.0, 3.0]))
        );
        assert_eq!(
            parse_line("vt 0.5 0.5 0", 1).unwrap(),
            Some(Statement::TexCoord([0.5, 0.5]))
        );
    }

    #[test]
    fn tag_must_be_a_whole_token() {
        assert_eq!(
            parse_line("vp 0.1 0.2", 1).unwrap(),
            Some(Statement::Other("vp"))
        );
        assert_eq!(
            parse_line("usemtl hull", 1).unwrap(),
            Some(Statement::Other("usemtl"))
        );
    }

    #[test]
    fn parses_all_corner_forms() {
        let stmt = parse_line("f 1/2/3 4//5 6/7 -1", 1).unwrap();
        assert_eq!(
            stmt,
            Some(Statement::Face(vec![
                corner(1, Some(2), Some(3)),
                corner(4, None, Some(5)),
                corner(6, Some(7), None),
                corner(-1, None, None),
            ]))
        );
    }

    #[test]
    fn reports_bad_number_with_line() {
        let err = parse_line("v 1 two 3", 12).unwrap_err();
        assert_eq!(err.kind(), ObjErrorKind::Parse);
        match err {
            ObjError::InvalidNumber { line, what, token } => {
                assert_eq!(line, 12);
                assert_eq!(what, "y coordinate");
                assert_eq!(token, "two");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_missing_field() {
        let err = parse_line("vn 0 1", 4).unwrap_err();
        assert!(matches!(
            err,
            ObjError::MissingField {
                line: 4,
                what: "nz coordinate"
            }
        ));
    }

    #[test]
    fn rejects_short_and_malformed_faces() {
        let err = parse_line("f 1/1/1 2/2/2", 5).unwrap_err();
        assert!(matches!(err, ObjError::TooFewCorners { line: 5, count: 2 }));

        let err = parse_line("f 1/1/1/1 2/2/2 3/3/3", 6).unwrap_err();
        assert!(matches!(err, ObjError::MalformedCorner { line: 6, .. }));

        let err = parse_line("f /1/1 2/2/2 3/3/3", 7).unwrap_err();
        assert!(matches!(err, ObjError::MalformedCorner { line: 7, .. }));

        let err = parse_line("f 1/a/1 2/2/2 3/3/3", 8).unwrap_err();
        assert!(matches!(
            err,
            ObjError::InvalidNumber {
                line: 8,
                what: "texture coordinate index",
                ..
            }
        ));
    }

    #[test]
    fn oversized_index_saturates() {
        let stmt = parse_line("f 1 2 99999999999999999999", 1).unwrap();
        let Some(Statement::Face(corners)) = stmt else {
            panic!("expected a face");
        };
        assert_eq!(corners[2].position, i64::MAX);

        let stmt = parse_line("f 1//-99999999999999999999 2 3", 1).unwrap();
        let Some(Statement::Face(corners)) = stmt else {
            panic!("expected a face");
        };
        assert_eq!(corners[0].normal, Some(i64::MIN));
    }

    #[test]
    fn non_utf8_comment_and_directive_are_skipped() {
        assert_eq!(parse_line_bytes(b"  # Cr\xe9\xe9 par exporter", 1).unwrap(), None);
        assert_eq!(
            parse_line_bytes(b"o caf\xe9", 2).unwrap(),
            Some(Statement::Other("o"))
        );
        assert_eq!(
            parse_line_bytes(b"v 1 2 3\r", 3).unwrap(),
            Some(Statement::Position([1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn non_utf8_geometry_line_is_parse_error() {
        let err = parse_line_bytes(b"v 1 \xe9 3", 9).unwrap_err();
        assert_eq!(err.kind(), ObjErrorKind::Parse);
        assert!(matches!(err, ObjError::InvalidUtf8 { line: 9 }));
    }
}
