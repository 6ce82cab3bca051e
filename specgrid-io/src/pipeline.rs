//! End-to-end analysis pipeline.
//!
//! Ties the scan, extract, transform and peak passes together the way a
//! dashboard render cycle consumes them: one source, one ordered collection
//! of canonical tables, plus label-keyed metadata lookups.

use crate::{DataSource, ExtractorConfig, ModuleExtractor, Result, RowScanner};
use log::info;
use specgrid_algorithms::{add_bin_max, add_peak_counts, transform_modules, PeakConfig};
use specgrid_core::PixelTable;
use std::path::Path;

/// Metadata labels conventionally present in instrument exports.
pub mod labels {
    /// Stage x position in millimeters.
    pub const STAGE_X_MM: &str = "stage_x_mm:";
    /// Stage y position in millimeters.
    pub const STAGE_Y_MM: &str = "stage_y_mm:";
    /// Stage x position in pixels.
    pub const STAGE_X_PX: &str = "stage_x_px:";
    /// Stage y position in pixels.
    pub const STAGE_Y_PX: &str = "stage_y_px:";
    /// Source height above the detector.
    pub const HEIGHT: &str = "height:";
}

/// Configuration for a full analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Module extraction settings (marker, rows per module).
    pub extractor: ExtractorConfig,
    /// Peak analysis settings; `None` skips the peak passes.
    pub peak: Option<PeakConfig>,
    /// Number of leading modules to drop (e.g. background captures).
    pub skip_modules: usize,
}

/// One-source analysis session.
///
/// The analyzer owns the source, so every operation scans from the start of
/// the stream; callers never manage cursor positions.
pub struct Analyzer {
    source: DataSource,
    config: AnalysisConfig,
}

impl Analyzer {
    /// Opens a file-backed analysis session.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P, config: AnalysisConfig) -> Result<Self> {
        Ok(Self {
            source: DataSource::open(path)?,
            config,
        })
    }

    /// Starts an analysis session over an uploaded in-memory stream.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>, config: AnalysisConfig) -> Self {
        Self {
            source: DataSource::from_bytes(bytes),
            config,
        }
    }

    /// Returns the underlying source.
    #[must_use]
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Extracts and transforms all modules, applying the configured peak
    /// passes.
    ///
    /// A source with zero marker rows yields an empty collection; callers
    /// present that as a "no data" state rather than an error.
    ///
    /// # Errors
    /// Returns structural errors (truncated module, unparsable cells) with
    /// module context.
    pub fn run(&self) -> Result<Vec<PixelTable>> {
        let extractor = ModuleExtractor::new()
            .with_target(self.config.extractor.target.clone())
            .with_pixel_count(self.config.extractor.pixel_count);

        let mut modules = extractor.extract(&self.source)?;
        if modules.is_empty() {
            return Ok(Vec::new());
        }
        if self.config.skip_modules > 0 {
            let skip = self.config.skip_modules.min(modules.len());
            modules.drain(..skip);
        }
        info!("transforming {} module(s)", modules.len());

        let mut tables = transform_modules(&modules)?;
        if let Some(peak) = self.config.peak {
            for table in &mut tables {
                add_peak_counts(table, peak.window());
                if let Some(threshold) = peak.threshold {
                    add_bin_max(table, peak.window(), threshold);
                }
            }
        }
        Ok(tables)
    }

    /// All values for a metadata label, in row order.
    ///
    /// # Errors
    /// Returns an error for an empty label or an unreadable row.
    pub fn metadata_values(&self, label: &str) -> Result<Vec<Option<String>>> {
        RowScanner::find_label_values(&self.source, label)
    }

    /// The Nth (0-based) value for a metadata label.
    ///
    /// # Errors
    /// Returns an error for an empty label or an unreadable row.
    pub fn metadata_value(&self, label: &str, occurrence: usize) -> Result<Option<String>> {
        RowScanner::find_label_value(&self.source, label, occurrence)
    }
}
