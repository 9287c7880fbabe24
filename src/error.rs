// src/error.rs

use thiserror::Error;

/// Errors raised by the snapshot container (read and write paths).
///
/// A malformed snapshot is fatal to the batch: the renderer propagates the
/// first failure instead of skipping the file.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a snapshot file (bad magic line: {0:?})")]
    BadMagic(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("missing dataset: {0}")]
    MissingDataset(&'static str),

    #[error("dataset {name} has {got} samples, expected {expected}")]
    ShapeMismatch {
        name: String,
        got: usize,
        expected: usize,
    },

    #[error("endianness check value mismatch (read {0})")]
    BadCheckValue(f64),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
