// File: crates/timeline-core/src/error.rs
// Summary: Error type shared by the corpus model, aggregation and control panel.

use arrow::error::ArrowError;
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    #[error("column '{0}' is not datetime-typed")]
    NotDatetime(String),
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedFrame { column: String, expected: usize, found: usize },
    #[error("corpus '{0}' not found")]
    UnknownCorpus(String),
    #[error("corpus '{0}' already exists")]
    DuplicateCorpus(String),
    #[error("'{0}' is not one of the available options")]
    UnknownOption(String),
    #[error("bucket count must be a positive integer, got {0}")]
    InvalidBucketCount(i64),
    #[error("unknown bucket unit '{0}'")]
    UnknownBucketUnit(String),
    #[error("no date bounds: select a datetime column first")]
    NoDateBounds,
    #[error("timestamp {0} cannot be bucketed")]
    OutOfRange(NaiveDateTime),
    #[error("arrow: {0}")]
    Arrow(#[from] ArrowError),
    #[error("chart rendering failed")]
    Render(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
