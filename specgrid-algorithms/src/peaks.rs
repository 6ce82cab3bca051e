//! Peak-window metrics over pixel spectra.
//!
//! The peak window is the half-open bin range `[center - halfwidth,
//! center + halfwidth)`. Windows that overhang the spectrum truncate
//! silently at the array bounds; they never error.

use specgrid_core::PixelTable;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A peak integration window over bin indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakWindow {
    /// Center bin index of the peak.
    pub center: usize,
    /// Half-width of the window in bins.
    pub halfwidth: usize,
}

impl PeakWindow {
    /// Creates a new peak window.
    #[must_use]
    pub fn new(center: usize, halfwidth: usize) -> Self {
        Self { center, halfwidth }
    }

    /// Window bounds truncated to a spectrum of `len` bins.
    ///
    /// Returns `(start, end)` with `start <= end <= len`; the window may be
    /// empty when the center lies at or beyond the end of the spectrum.
    #[must_use]
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = self.center.saturating_sub(self.halfwidth).min(len);
        let end = self.center.saturating_add(self.halfwidth).min(len);
        (start, end)
    }

    /// Crops a spectrum to this window.
    #[must_use]
    pub fn crop<'a>(&self, bins: &'a [u64]) -> &'a [u64] {
        let (start, end) = self.bounds(bins.len());
        &bins[start..end]
    }

    /// Sum of counts inside the window.
    #[must_use]
    pub fn count(&self, bins: &[u64]) -> u64 {
        self.crop(bins).iter().sum()
    }

    /// Maximum value inside the window, or 0 for an empty window.
    #[must_use]
    pub fn height(&self, bins: &[u64]) -> u64 {
        self.crop(bins).iter().copied().max().unwrap_or(0)
    }

    /// Global bin index of the first maximum inside the window.
    ///
    /// An empty window reports the truncated window start.
    #[must_use]
    pub fn peak_bin(&self, bins: &[u64]) -> usize {
        let (start, _) = self.bounds(bins.len());
        let cropped = self.crop(bins);
        if cropped.is_empty() {
            return start;
        }
        let mut best = 0;
        for (offset, &value) in cropped.iter().enumerate() {
            if value > cropped[best] {
                best = offset;
            }
        }
        start + best
    }
}

/// Configuration for the peak-analysis passes.
///
/// `halfwidth` defaults to 25 bins. With no `threshold` the bin-max pass is
/// skipped entirely by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakConfig {
    /// Center bin of the expected peak.
    pub bin_peak: usize,
    /// Half-width of the integration window.
    pub bin_width: usize,
    /// Detection threshold gating `bin_max` (never `peak_height`).
    pub threshold: Option<u64>,
}

impl PeakConfig {
    /// Creates a configuration for a peak centered at `bin_peak`.
    #[must_use]
    pub fn new(bin_peak: usize) -> Self {
        Self {
            bin_peak,
            bin_width: 25,
            threshold: None,
        }
    }

    /// Sets the window half-width.
    #[must_use]
    pub fn with_bin_width(mut self, bin_width: usize) -> Self {
        self.bin_width = bin_width;
        self
    }

    /// Sets the bin-max detection threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// The integration window described by this configuration.
    #[must_use]
    pub fn window(&self) -> PeakWindow {
        PeakWindow::new(self.bin_peak, self.bin_width)
    }
}

/// Adds `peak_count` and `non_peak_count` to every record of the table.
pub fn add_peak_counts(table: &mut PixelTable, window: PeakWindow) {
    for record in table.records_mut() {
        let peak = window.count(&record.array_bins);
        record.peak_count = Some(peak);
        record.non_peak_count = Some(record.total_count - peak);
    }
}

/// Adds `bin_max` and `peak_height` to every record of the table.
///
/// `peak_height` is always the true window maximum. `bin_max` is the global
/// index of that maximum, except when the maximum falls below `threshold`:
/// then the window's truncated lower bound is reported as a "no significant
/// peak" sentinel. The asymmetry is deliberate.
pub fn add_bin_max(table: &mut PixelTable, window: PeakWindow, threshold: u64) {
    for record in table.records_mut() {
        let height = window.height(&record.array_bins);
        let (start, _) = window.bounds(record.array_bins.len());
        record.peak_height = Some(height);
        record.bin_max = Some(if height < threshold {
            start
        } else {
            window.peak_bin(&record.array_bins)
        });
    }
}
