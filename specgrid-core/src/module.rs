//! Raw module tables carved out of an instrument export.

use crate::error::{Error, Result};
use crate::grid::PIXEL_COUNT;

/// One raw detector readout block, as found in the delimited stream.
///
/// Rows are pixels in stream order; columns are spectral bins named by the
/// header row that anchored the block. The number of bin columns varies by
/// source file and is not assumed fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModule {
    /// 0-based row index of the header row in the source stream.
    pub marker_row: usize,
    /// Bin column names from the header row, in stream order.
    pub bin_columns: Vec<String>,
    /// Pixel-id index column values, one per data row, as raw text.
    pub index_values: Vec<String>,
    /// Bin counts, one row per pixel, in `bin_columns` order.
    pub rows: Vec<Vec<u64>>,
}

impl RawModule {
    /// Number of data rows in this module.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of bin columns in this module.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.bin_columns.len()
    }

    /// Checks that the module holds exactly one row per detector pixel.
    ///
    /// # Errors
    /// Returns `RowCountMismatch` otherwise.
    pub fn check_complete(&self) -> Result<()> {
        if self.row_count() != PIXEL_COUNT {
            return Err(Error::RowCountMismatch {
                expected: PIXEL_COUNT,
                found: self.row_count(),
            });
        }
        Ok(())
    }
}
