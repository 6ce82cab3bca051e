//! specgrid-algorithms: Transform and peak-analysis passes.
//!
//! This crate turns raw module tables into canonical per-pixel tables and
//! augments them with peak-window metrics and per-module summaries.
//!

pub mod peaks;
pub mod stats;
pub mod transform;

pub use peaks::{add_bin_max, add_peak_counts, PeakConfig, PeakWindow};
pub use stats::{heatmap, HeatmapValue, ModuleSummary};
pub use transform::{transform, transform_modules};
