//! Canonical per-pixel tables.

use crate::error::{Error, Result};
use crate::grid::{PixelCoord, PIXEL_COUNT};
use crate::pixel::PixelRecord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The canonical per-pixel table for one module.
///
/// Always exactly 121 records, ordered by linear pixel position so that
/// record `p` carries `pixel_id == p + 1`. Once produced the table is plain
/// read-only data; the peak-metric passes are the only sanctioned mutation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelTable {
    records: Vec<PixelRecord>,
}

impl PixelTable {
    /// Builds a table from records already in linear pixel order.
    ///
    /// # Errors
    /// Returns `RowCountMismatch` unless exactly 121 records are supplied.
    pub fn from_records(records: Vec<PixelRecord>) -> Result<Self> {
        if records.len() != PIXEL_COUNT {
            return Err(Error::RowCountMismatch {
                expected: PIXEL_COUNT,
                found: records.len(),
            });
        }
        Ok(Self { records })
    }

    /// Number of records in the table (always 121).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns all records in linear pixel order.
    #[must_use]
    pub fn records(&self) -> &[PixelRecord] {
        &self.records
    }

    /// Mutable access for the peak-metric passes. The slice length is fixed.
    pub fn records_mut(&mut self) -> &mut [PixelRecord] {
        &mut self.records
    }

    /// Looks up a record by 1-based pixel id.
    #[must_use]
    pub fn get(&self, pixel_id: u16) -> Option<&PixelRecord> {
        if pixel_id == 0 {
            return None;
        }
        self.records.get(pixel_id as usize - 1)
    }

    /// Looks up a record by grid coordinate.
    #[must_use]
    pub fn at(&self, coord: PixelCoord) -> Option<&PixelRecord> {
        self.records.get(coord.linear())
    }

    /// Number of spectral bins per pixel in this table.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.records.first().map_or(0, PixelRecord::bin_count)
    }

    /// Maximum `total_count` across all pixels.
    #[must_use]
    pub fn max_total_count(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.total_count)
            .max()
            .unwrap_or(0)
    }

    /// Sum of `total_count` across all pixels.
    #[must_use]
    pub fn sum_total_count(&self) -> u64 {
        self.records.iter().map(|r| r.total_count).sum()
    }

    /// True once the peak-count pass has run.
    #[must_use]
    pub fn has_peak_counts(&self) -> bool {
        self.records.iter().all(|r| r.peak_count.is_some())
    }

    /// True once the bin-max pass has run.
    #[must_use]
    pub fn has_bin_max(&self) -> bool {
        self.records.iter().all(|r| r.bin_max.is_some())
    }

    /// Records on the outer ring of the grid.
    pub fn edge_records(&self) -> impl Iterator<Item = &PixelRecord> {
        self.records.iter().filter(|r| r.is_edge)
    }

    /// Records in the interior of the grid.
    pub fn interior_records(&self) -> impl Iterator<Item = &PixelRecord> {
        self.records.iter().filter(|r| !r.is_edge)
    }

    /// Element-wise sum of all 121 pixel spectra (the module's summed
    /// spectrum, used for average-spectrum plots).
    #[must_use]
    pub fn summed_spectrum(&self) -> Vec<u64> {
        let mut summed = vec![0u64; self.bin_count()];
        for record in &self.records {
            for (acc, &value) in summed.iter_mut().zip(&record.array_bins) {
                *acc += value;
            }
        }
        summed
    }
}
