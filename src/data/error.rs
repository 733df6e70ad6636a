use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning partition files into a
/// [`Dataset`](super::model::Dataset). Any of these aborts the run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("partition not found: {}", .0.display())]
    MissingPartition(PathBuf),

    #[error("unsupported file extension '.{ext}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, ext: String },

    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: column '{column}' has unsupported type {found}", path.display())]
    ColumnType {
        path: PathBuf,
        column: &'static str,
        found: String,
    },

    #[error("{}, row {row}: cannot parse timestamp '{text}'", path.display())]
    Timestamp {
        path: PathBuf,
        row: usize,
        text: String,
    },

    #[error("{}, row {row}: null value in column '{column}'", path.display())]
    NullValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },

    #[error("{}: malformed CSV", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: malformed JSON", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: unreadable parquet", path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("{}: bad arrow record batch", path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{}: I/O error", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
