//! Song datasets: the CSV tables read as input and written as output.
//!
//! Tables are comma-delimited UTF-8 with a header row. A leading BOM is
//! accepted on read and always written on output.

mod reader;
mod writer;

pub use reader::Dataset;
pub use writer::DatasetWriter;

use crate::labels::LabelResult;
use std::path::PathBuf;
use thiserror::Error;

pub const LANGUAGE_COLUMN: &str = "language";
pub const EMOTION_COLUMN: &str = "emotion";

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset contains no records")]
    Empty,

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Record {record} has {found} fields but the header has only {expected}")]
    ExtraFields {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("Existing output header {found:?} does not match expected {expected:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Existing output {0:?} ends with a partially written record")]
    TruncatedOutput(PathBuf),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Names of the input columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub title: String,
    pub artist: String,
    /// Optional column, blank album when absent.
    pub album: String,
    /// Identifier column used for playlist plans; optional.
    pub track_id: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            title: "title".to_string(),
            artist: "artist".to_string(),
            album: "album".to_string(),
            track_id: "song_id".to_string(),
        }
    }
}

/// One catalog entry.
///
/// `cells` holds every value of the row in header order, so that columns
/// the pipeline doesn't understand survive unchanged. A cell is `None` when
/// the row was shorter than the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    cells: Vec<Option<String>>,
}

impl SongRecord {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        cells: Vec<Option<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            cells,
        }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// Blank-titled rows carry no information worth sending to the model.
    pub fn is_classifiable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Row values padded to `width`, absent cells written as empty.
    pub fn to_row(&self, width: usize) -> Vec<String> {
        let mut row: Vec<String> = self
            .cells
            .iter()
            .map(|c| c.clone().unwrap_or_default())
            .collect();
        row.resize(width, String::new());
        row
    }
}

/// Position of the two label columns within an output header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelColumns {
    pub language: usize,
    pub emotion: usize,
    pub width: usize,
}

impl LabelColumns {
    /// Returns the output header for `headers`: the input columns followed by
    /// `language` and `emotion`, each appended only if not already present.
    pub fn extend(headers: &[String]) -> (Vec<String>, LabelColumns) {
        let mut out = headers.to_vec();
        let mut position = |name: &str| match out.iter().position(|h| h == name) {
            Some(i) => i,
            None => {
                out.push(name.to_string());
                out.len() - 1
            }
        };
        let language = position(LANGUAGE_COLUMN);
        let emotion = position(EMOTION_COLUMN);
        let width = out.len();
        (
            out,
            LabelColumns {
                language,
                emotion,
                width,
            },
        )
    }

    /// Builds the output row for `song` carrying `labels`.
    pub fn merge(&self, song: &SongRecord, labels: &LabelResult) -> Vec<String> {
        let mut row = song.to_row(self.width);
        row[self.language] = labels.language.to_string();
        row[self.emotion] = labels.emotion.to_string();
        row
    }
}
