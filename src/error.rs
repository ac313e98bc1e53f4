// src/error.rs

use std::path::PathBuf;

/// Failures raised while turning report text into rows.
///
/// Only `Segmentation` and `ColumnCount` ever leave the table builder; the
/// ingestor logs them and skips the enclosing section.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No whitespace column is shared by every line of the block.
    #[error("no gutter columns found across {lines} line(s)")]
    Segmentation { lines: usize },

    /// The block splits into more fields than the section layout holds.
    #[error("expected at most {expected} numeric columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// Header text is not registered for this report.
    #[error("unrecognized section header {header:?} for report {report}")]
    UnrecognizedSection { report: String, header: String },

    /// A single cell could not be read as a number.
    #[error("could not parse {raw:?} as a number")]
    NumericCoercion { raw: String },
}

/// Failures fetching one day's report. A missing report is not an error.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transient failure fetching {url}: {reason}")]
    Transient { url: String, reason: String },

    #[error("invalid report url: {0}")]
    Url(#[from] url::ParseError),
}

/// Failures reading or replacing the persisted dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file on disk changed between our read and the atomic replace.
    #[error("dataset `{}` changed since it was read", path.display())]
    PersistenceConflict { path: PathBuf },

    #[error("dataset column `{column}` is missing or has the wrong type")]
    Schema { column: String },

    #[error("dataset io on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}
