//! Error type shared by the whole crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Two operands of a matrix operation have incompatible shapes.
    #[error("shape mismatch in {op}: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid network topology: {0}")]
    InvalidTopology(String),

    /// `back_propagate` was called before any `forward_propagate`.
    #[error("backward pass requested before any forward pass")]
    StaleCache,

    #[error("dataset contains no samples")]
    EmptyDataset,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file does not follow the IDX layout.
    #[error("malformed data file: {0}")]
    Format(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for caller defects (bad shapes, indices, topology or arguments),
    /// false for resource problems at the ingestion boundary.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Error::ShapeMismatch { .. }
                | Error::IndexOutOfBounds { .. }
                | Error::InvalidTopology(_)
                | Error::StaleCache
                | Error::EmptyDataset
                | Error::InvalidConfig(_)
        )
    }
}
