//! Per-module summary statistics and heatmap pivots.

use ndarray::Array2;
use specgrid_core::{PixelRecord, PixelTable, GRID_DIM};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which per-pixel value a heatmap pivot reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeatmapValue {
    /// Total counts per pixel.
    TotalCount,
    /// Total counts normalized to the table maximum.
    TotalCountsNorm,
    /// Counts inside the peak window.
    PeakCount,
    /// Counts outside the peak window.
    NonPeakCount,
    /// The linear pixel id (layout sanity map).
    PixelId,
    /// Bin index of the detected peak.
    BinMax,
}

impl HeatmapValue {
    #[allow(clippy::cast_precision_loss)]
    fn of(self, record: &PixelRecord) -> f64 {
        match self {
            Self::TotalCount => record.total_count as f64,
            Self::TotalCountsNorm => record.total_counts_norm,
            Self::PeakCount => record.peak_count.map_or(f64::NAN, |v| v as f64),
            Self::NonPeakCount => record.non_peak_count.map_or(f64::NAN, |v| v as f64),
            Self::PixelId => f64::from(record.pixel_id),
            Self::BinMax => record.bin_max.map_or(f64::NAN, |v| v as f64),
        }
    }
}

/// Pivots a canonical table into an 11x11 grid of the selected value.
///
/// Element `[y - 1, x - 1]` holds the value for pixel `(x, y)`, matching the
/// heatmap orientation of the plotting layer. Values from a pass that has
/// not run yet are NaN.
#[must_use]
pub fn heatmap(table: &PixelTable, value: HeatmapValue) -> Array2<f64> {
    let mut grid = Array2::from_elem((GRID_DIM, GRID_DIM), f64::NAN);
    for record in table.records() {
        let x = record.x_index() as usize - 1;
        let y = record.y_index() as usize - 1;
        grid[[y, x]] = value.of(record);
    }
    grid
}

/// Rounds an average to 1 decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Summary statistics for one module's canonical table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleSummary {
    /// Maximum total counts over all pixels.
    pub max_total_counts: u64,
    /// Sum of total counts over all pixels.
    pub sum_total_counts: u64,
    /// Mean total counts, rounded to 1 decimal.
    pub avg_total_counts: f64,
    /// Number of edge pixels (always 40 for a full grid).
    pub edge_pixels: usize,
    /// Number of interior pixels (always 81 for a full grid).
    pub interior_pixels: usize,
    /// Mean peak counts, when the peak pass has run.
    pub avg_peak_counts: Option<f64>,
    /// Mean non-peak counts, when the peak pass has run.
    pub avg_non_peak_counts: Option<f64>,
}

impl ModuleSummary {
    /// Computes the summary for a canonical table.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_table(table: &PixelTable) -> Self {
        let len = table.len() as f64;
        let avg_total = round1(table.sum_total_count() as f64 / len);

        let mean = |values: Vec<u64>| round1(values.iter().map(|&v| v as f64).sum::<f64>() / len);
        let (avg_peak, avg_non_peak) = if table.has_peak_counts() {
            let peak: Vec<u64> = table.records().iter().filter_map(|r| r.peak_count).collect();
            let non_peak: Vec<u64> = table
                .records()
                .iter()
                .filter_map(|r| r.non_peak_count)
                .collect();
            (Some(mean(peak)), Some(mean(non_peak)))
        } else {
            (None, None)
        };

        Self {
            max_total_counts: table.max_total_count(),
            sum_total_counts: table.sum_total_count(),
            avg_total_counts: avg_total,
            edge_pixels: table.edge_records().count(),
            interior_pixels: table.interior_records().count(),
            avg_peak_counts: avg_peak,
            avg_non_peak_counts: avg_non_peak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::{add_peak_counts, PeakWindow};
    use approx::assert_relative_eq;
    use specgrid_core::{PixelCoord, PixelRecord, PIXEL_COUNT};

    fn make_table() -> PixelTable {
        let records = (0..PIXEL_COUNT)
            .map(|p| {
                let coord = PixelCoord::from_linear(p).unwrap();
                let bins = vec![p as u64, 2];
                PixelRecord::new(coord, bins, p as u64 + 2, 1.0)
            })
            .collect();
        PixelTable::from_records(records).unwrap()
    }

    #[test]
    fn test_heatmap_orientation() {
        let table = make_table();
        let grid = heatmap(&table, HeatmapValue::PixelId);
        assert_eq!(grid.dim(), (11, 11));
        // Pixel 1 is (x=1, y=1); pixel 12 is (x=2, y=1).
        assert_relative_eq!(grid[[0, 0]], 1.0);
        assert_relative_eq!(grid[[0, 1]], 12.0);
        assert_relative_eq!(grid[[10, 10]], 121.0);
    }

    #[test]
    fn test_heatmap_missing_pass_is_nan() {
        let table = make_table();
        let grid = heatmap(&table, HeatmapValue::PeakCount);
        assert!(grid[[0, 0]].is_nan());
    }

    #[test]
    fn test_summary_totals() {
        let table = make_table();
        let summary = ModuleSummary::from_table(&table);
        // Totals are 2..=122.
        assert_eq!(summary.max_total_counts, 122);
        assert_eq!(summary.sum_total_counts, (2..=122).sum::<u64>());
        assert_relative_eq!(summary.avg_total_counts, 62.0);
        assert_eq!(summary.edge_pixels, 40);
        assert_eq!(summary.interior_pixels, 81);
        assert!(summary.avg_peak_counts.is_none());
    }

    #[test]
    fn test_summary_peak_averages() {
        let mut table = make_table();
        // Window [1, 3) truncates to [1, 2): only the constant bin valued 2.
        add_peak_counts(&mut table, PeakWindow::new(2, 1));
        let summary = ModuleSummary::from_table(&table);
        assert_relative_eq!(summary.avg_peak_counts.unwrap(), 2.0);
        assert_relative_eq!(summary.avg_non_peak_counts.unwrap(), 60.0);
    }
}
