//! Error types for specgrid-core.

use thiserror::Error;

/// Result type alias for specgrid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for specgrid operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid pixel coordinate (must lie in [1, 11] on both axes).
    #[error("invalid pixel coordinate: ({x}, {y})")]
    InvalidCoordinate { x: u8, y: u8 },

    /// Invalid linear pixel position (must lie in [0, 121)).
    #[error("invalid linear pixel position: {0}")]
    InvalidPixelPosition(usize),

    /// A table does not have exactly one row per detector pixel.
    #[error("row count mismatch: expected {expected} pixel rows, found {found}")]
    RowCountMismatch { expected: usize, found: usize },

    /// A module block ended before the full pixel grid was read.
    #[error("truncated module {module}: expected {expected} data rows after marker, found {found}")]
    TruncatedModule {
        module: usize,
        expected: usize,
        found: usize,
    },

    /// A bin cell could not be parsed as a count.
    #[error("invalid bin value {value:?} at row {row}, column {column}")]
    InvalidBinValue {
        row: usize,
        column: usize,
        value: String,
    },
}
