//! Raw module to canonical per-pixel table transform.

use rayon::prelude::*;
use specgrid_core::{PixelCoord, PixelRecord, PixelTable, RawModule, Result};

/// Rounds a normalized count to 3 decimal places.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Transforms a raw module into the canonical per-pixel table.
///
/// Record `p` (0-based row order of the module) gets `x_index = p / 11 + 1`,
/// `y_index = p % 11 + 1` and `pixel_id = p + 1`, regardless of the raw
/// index-column text. `total_counts_norm` is defined as 0.0 for an all-zero
/// module rather than dividing by zero.
///
/// # Errors
/// Returns `RowCountMismatch` unless the module has exactly 121 rows.
pub fn transform(module: &RawModule) -> Result<PixelTable> {
    module.check_complete()?;

    let totals: Vec<u64> = module.rows.iter().map(|bins| bins.iter().sum()).collect();
    let max_total = totals.iter().copied().max().unwrap_or(0);

    let records: Vec<PixelRecord> = module
        .rows
        .iter()
        .zip(&totals)
        .enumerate()
        .map(|(position, (bins, &total))| {
            let coord = PixelCoord::from_linear(position)?;
            #[allow(clippy::cast_precision_loss)]
            let norm = if max_total == 0 {
                0.0
            } else {
                round3(total as f64 / max_total as f64)
            };
            Ok(PixelRecord::new(coord, bins.clone(), total, norm))
        })
        .collect::<Result<_>>()?;

    PixelTable::from_records(records)
}

/// Transforms a list of independent modules, in order.
///
/// Modules are processed in parallel; the output order mirrors the input
/// order. An empty input yields an empty output.
///
/// # Errors
/// Returns an error if any module fails to transform.
pub fn transform_modules(modules: &[RawModule]) -> Result<Vec<PixelTable>> {
    modules.par_iter().map(transform).collect()
}
