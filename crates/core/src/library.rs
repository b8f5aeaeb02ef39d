//! Piece library - named, coloured block shapes the queue draws from
//!
//! Libraries are plain JSON arrays:
//!
//! ```json
//! [
//!   { "name": "I", "color": [0, 240, 240],
//!     "blocks": [[0, 1, 1], [1, 1, 1], [2, 1, 1], [3, 1, 1]],
//!     "center": [1, 1] }
//! ]
//! ```
//!
//! `blocks` are `[col, row, density]` triples. `center` is optional; when it
//! is missing or malformed the pivot falls back to the shape's centroid.
//! A library must contain at least one well-formed record, otherwise loading
//! fails before any engine is built.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::mino::Mino;
use crate::types::{Rgb, EMPTY_COLOR};

/// One piece as written in a library file.
#[derive(Debug, Clone, Deserialize)]
pub struct PieceRecord {
    pub name: String,
    pub color: Rgb,
    pub blocks: Vec<[f64; 3]>,
    #[serde(default)]
    pub center: Option<serde_json::Value>,
}

impl PieceRecord {
    /// Explicit pivot cell, if `center` is a well-formed `[col, row]` pair.
    pub fn center_cell(&self) -> Option<(f64, f64)> {
        let pair = self.center.as_ref()?.as_array()?;
        match pair.as_slice() {
            [x, y] => Some((x.as_f64()?, y.as_f64()?)),
            _ => None,
        }
    }

    fn to_mino(&self, index: usize) -> Result<Mino, LibraryError> {
        let malformed = |reason: &'static str| LibraryError::MalformedRecord {
            index,
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(malformed("name is empty"));
        }
        if self.color == EMPTY_COLOR {
            return Err(malformed("color collides with the empty-cell color"));
        }
        if self
            .blocks
            .iter()
            .flatten()
            .any(|value| !value.is_finite())
        {
            return Err(malformed("block values must be finite"));
        }
        if self
            .blocks
            .iter()
            .any(|&[_, _, density]| !(0.0..=1.0).contains(&density))
        {
            return Err(malformed("block density outside 0..=1"));
        }

        let cells: Vec<(f64, f64, f64)> = self
            .blocks
            .iter()
            .map(|&[col, row, density]| (col, row, density))
            .collect();

        Mino::new(self.name.clone(), &cells, self.color, self.center_cell())
            .ok_or_else(|| malformed("piece has no blocks"))
    }
}

/// Errors that make a piece library unusable
#[derive(Debug)]
pub enum LibraryError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Empty,
    MalformedRecord {
        index: usize,
        name: String,
        reason: &'static str,
    },
}

impl LibraryError {
    pub fn code(&self) -> &'static str {
        match self {
            LibraryError::Io { .. } | LibraryError::Empty => "missing_piece_library",
            LibraryError::Parse(_) | LibraryError::MalformedRecord { .. } => {
                "malformed_piece_record"
            }
        }
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Io { path, source } => {
                write!(f, "cannot read piece library {}: {}", path.display(), source)
            }
            LibraryError::Parse(e) => write!(f, "invalid piece library JSON: {}", e),
            LibraryError::Empty => f.write_str("piece library has no pieces"),
            LibraryError::MalformedRecord {
                index,
                name,
                reason,
            } => write!(f, "piece #{} ({:?}): {}", index, name, reason),
        }
    }
}

impl std::error::Error for LibraryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LibraryError::Io { source, .. } => Some(source),
            LibraryError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// The seven tetrominoes at full density, in spawn orientation.
const STANDARD: [(&str, Rgb, [(i8, i8); 4]); 7] = [
    ("I", [0, 240, 240], [(0, 1), (1, 1), (2, 1), (3, 1)]),
    ("O", [240, 240, 0], [(1, 0), (2, 0), (1, 1), (2, 1)]),
    ("T", [160, 0, 240], [(1, 0), (0, 1), (1, 1), (2, 1)]),
    ("S", [0, 240, 0], [(1, 0), (2, 0), (0, 1), (1, 1)]),
    ("Z", [240, 0, 0], [(0, 0), (1, 0), (1, 1), (2, 1)]),
    ("J", [0, 0, 240], [(0, 0), (0, 1), (1, 1), (2, 1)]),
    ("L", [240, 160, 0], [(2, 0), (0, 1), (1, 1), (2, 1)]),
];

/// An ordered, non-empty list of pieces
#[derive(Debug, Clone, PartialEq)]
pub struct PieceLibrary {
    minos: Vec<Mino>,
}

impl PieceLibrary {
    /// Build from parsed records; every record must be well formed.
    pub fn from_records(records: &[PieceRecord]) -> Result<Self, LibraryError> {
        let minos = records
            .iter()
            .enumerate()
            .map(|(i, record)| record.to_mino(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_minos(minos)
    }

    pub fn from_minos(minos: Vec<Mino>) -> Result<Self, LibraryError> {
        if minos.is_empty() {
            return Err(LibraryError::Empty);
        }
        Ok(Self { minos })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LibraryError> {
        let records: Vec<PieceRecord> = serde_json::from_str(json).map_err(LibraryError::Parse)?;
        Self::from_records(&records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The built-in tetromino set; needs no file.
    pub fn standard() -> Self {
        let minos = STANDARD
            .iter()
            .filter_map(|(name, color, shape)| {
                let cells: Vec<(f64, f64, f64)> = shape
                    .iter()
                    .map(|&(x, y)| (f64::from(x), f64::from(y), 1.0))
                    .collect();
                Mino::new(*name, &cells, *color, None)
            })
            .collect();
        Self { minos }
    }

    pub fn minos(&self) -> &[Mino] {
        &self.minos
    }

    pub fn len(&self) -> usize {
        self.minos.len()
    }

    /// Always false for a constructed library; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.minos.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.minos.iter().map(Mino::name)
    }
}

impl Default for PieceLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn standard_library_has_seven_pieces() {
        let lib = PieceLibrary::standard();
        assert_eq!(lib.len(), 7);
        assert_eq!(
            lib.names().collect::<Vec<_>>(),
            ["I", "O", "T", "S", "Z", "J", "L"]
        );
        assert!(lib.minos().iter().all(|m| m.blocks().len() == 4));
    }

    #[test]
    fn parses_records_with_and_without_center() {
        let lib = PieceLibrary::from_json_str(
            r#"[
                {"name": "I", "color": [0, 255, 255],
                 "blocks": [[0, 0, 1], [0, 1, 1], [0, 2, 1], [0, 3, 1]],
                 "center": [0, 0]},
                {"name": "half", "color": [10, 10, 200], "blocks": [[0, 0, 0.5]]}
            ]"#,
        )
        .unwrap();

        assert_eq!(lib.len(), 2);
        assert_eq!(lib.minos()[0].pivot(), Point::new(0.5, 0.5));
        assert_eq!(lib.minos()[1].pivot(), Point::new(0.5, 0.5));
        assert_eq!(lib.minos()[1].blocks()[0].density, 0.5);
    }

    #[test]
    fn malformed_center_falls_back_to_centroid() {
        let lib = PieceLibrary::from_json_str(
            r#"[{"name": "D", "color": [1, 2, 3],
                 "blocks": [[0, 0, 1], [1, 0, 1]], "center": "middle"}]"#,
        )
        .unwrap();
        assert_eq!(lib.minos()[0].pivot(), Point::new(1.0, 0.5));
    }

    #[test]
    fn empty_library_is_rejected() {
        let err = PieceLibrary::from_json_str("[]").unwrap_err();
        assert!(matches!(err, LibraryError::Empty));
        assert_eq!(err.code(), "missing_piece_library");
    }

    #[test]
    fn bad_density_is_malformed() {
        let err = PieceLibrary::from_json_str(
            r#"[{"name": "X", "color": [1, 2, 3], "blocks": [[0, 0, 1.5]]}]"#,
        )
        .unwrap_err();
        match &err {
            LibraryError::MalformedRecord { index, name, .. } => {
                assert_eq!(*index, 0);
                assert_eq!(name, "X");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.code(), "malformed_piece_record");
    }

    #[test]
    fn record_without_blocks_is_malformed() {
        let err =
            PieceLibrary::from_json_str(r#"[{"name": "X", "color": [1, 2, 3], "blocks": []}]"#)
                .unwrap_err();
        assert!(matches!(err, LibraryError::MalformedRecord { .. }));
    }

    #[test]
    fn sentinel_color_is_malformed() {
        let err = PieceLibrary::from_json_str(
            r#"[{"name": "X", "color": [20, 20, 20], "blocks": [[0, 0, 1]]}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, LibraryError::MalformedRecord { .. }));
    }

    #[test]
    fn out_of_range_color_is_a_parse_error() {
        let err = PieceLibrary::from_json_str(
            r#"[{"name": "X", "color": [256, 0, 0], "blocks": [[0, 0, 1]]}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, LibraryError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PieceLibrary::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }
}
