//! Module extraction: carving fixed-size pixel blocks out of the stream.

use crate::{DataSource, Error, Result, RowScanner};
use log::{debug, info};
use specgrid_core::{RawModule, PIXEL_COUNT};

/// Default marker naming the pixel-id column in instrument exports.
pub const DEFAULT_MARKER: &str = "H3D_Pixel";

/// Configuration for module extraction.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Marker substring identifying a module header row.
    pub target: String,
    /// Number of data rows per module.
    pub pixel_count: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_MARKER.to_string(),
            pixel_count: PIXEL_COUNT,
        }
    }
}

/// Extracts raw module tables from a delimited source.
///
/// Extraction is two-phase: a discovery pass collects marker row indices,
/// then one bounded parse pass per marker reads the header row and exactly
/// `pixel_count` data rows after it. Module order mirrors marker order.
pub struct ModuleExtractor {
    config: ExtractorConfig,
}

impl Default for ModuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleExtractor {
    /// Creates an extractor with the default marker and pixel count.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// Sets the marker substring.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    /// Sets the number of data rows per module.
    #[must_use]
    pub fn with_pixel_count(mut self, pixel_count: usize) -> Self {
        self.config.pixel_count = pixel_count;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts all modules from the source.
    ///
    /// Zero markers yields an empty vec, not an error.
    ///
    /// # Errors
    /// Returns `TruncatedModule` when fewer than `pixel_count` rows follow a
    /// marker, and a parse error for unparsable bin cells.
    pub fn extract(&self, source: &DataSource) -> Result<Vec<RawModule>> {
        let markers = RowScanner::find_marker_rows(source, &self.config.target)?;
        if markers.is_empty() {
            info!("no marker rows for {:?}: zero modules", self.config.target);
            return Ok(Vec::new());
        }

        let mut modules = Vec::with_capacity(markers.len());
        for (module, &marker_row) in markers.iter().enumerate() {
            debug!("extracting module {module} at row {marker_row}");
            modules.push(self.extract_at(source, module, marker_row)?);
        }
        Ok(modules)
    }

    /// Parses one module block whose header sits at `marker_row`.
    fn extract_at(
        &self,
        source: &DataSource,
        module: usize,
        marker_row: usize,
    ) -> Result<RawModule> {
        let mut rows = source.rows().into_records();

        let header = rows
            .nth(marker_row)
            .transpose()?
            .ok_or_else(|| Error::InvalidFormat(format!("marker row {marker_row} out of range")))?;

        // The pixel-id index column is the first header cell containing the
        // marker; the remaining non-empty cells name the bin columns.
        let index_position = header
            .iter()
            .position(|cell| cell.contains(&self.config.target))
            .ok_or_else(|| {
                Error::InvalidFormat(format!("header row {marker_row} lost its marker cell"))
            })?;

        let mut bin_positions = Vec::with_capacity(header.len().saturating_sub(1));
        let mut bin_columns = Vec::with_capacity(header.len().saturating_sub(1));
        for (position, cell) in header.iter().enumerate() {
            if position != index_position && !cell.is_empty() {
                bin_positions.push(position);
                bin_columns.push(cell.to_string());
            }
        }

        let mut index_values = Vec::with_capacity(self.config.pixel_count);
        let mut data = Vec::with_capacity(self.config.pixel_count);

        for offset in 0..self.config.pixel_count {
            let row_index = marker_row + 1 + offset;
            let Some(record) = rows.next().transpose()? else {
                return Err(specgrid_core::Error::TruncatedModule {
                    module,
                    expected: self.config.pixel_count,
                    found: offset,
                }
                .into());
            };

            let index_value = record.get(index_position).ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "row {row_index} has no value in the pixel-id column"
                ))
            })?;
            index_values.push(index_value.to_string());

            let mut bins = Vec::with_capacity(bin_positions.len());
            for &position in &bin_positions {
                let cell = record.get(position).unwrap_or("");
                let value = cell.trim().parse::<u64>().map_err(|_| {
                    specgrid_core::Error::InvalidBinValue {
                        row: row_index,
                        column: position,
                        value: cell.to_string(),
                    }
                })?;
                bins.push(value);
            }
            data.push(bins);
        }

        Ok(RawModule {
            marker_row,
            bin_columns,
            index_values,
            rows: data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn module_text(marker: &str, pixel_rows: usize, bins: usize) -> String {
        let mut text = String::new();
        write!(text, "{marker}").unwrap();
        for b in 0..bins {
            write!(text, ",bin_{b}").unwrap();
        }
        text.push('\n');
        for p in 0..pixel_rows {
            write!(text, "{}", p + 1).unwrap();
            for b in 0..bins {
                write!(text, ",{}", p + b).unwrap();
            }
            text.push('\n');
        }
        text
    }

    fn extractor(pixel_count: usize) -> ModuleExtractor {
        ModuleExtractor::new()
            .with_target("Pix_Id")
            .with_pixel_count(pixel_count)
    }

    #[test]
    fn test_extract_single_module() {
        let mut text = String::from("some,free,text\nmeta,row\n");
        text.push_str(&module_text("Pix_Id", 4, 3));
        let source = DataSource::from_bytes(text.into_bytes());

        let modules = extractor(4).extract(&source).unwrap();
        assert_eq!(modules.len(), 1);

        let module = &modules[0];
        assert_eq!(module.marker_row, 2);
        assert_eq!(module.bin_columns, vec!["bin_0", "bin_1", "bin_2"]);
        assert_eq!(module.index_values, vec!["1", "2", "3", "4"]);
        assert_eq!(module.rows[0], vec![0, 1, 2]);
        assert_eq!(module.rows[3], vec![3, 4, 5]);
    }

    #[test]
    fn test_extract_modules_in_marker_order() {
        let mut text = module_text("Pix_Id", 2, 1);
        text.push_str("interlude,row\n");
        text.push_str(&module_text("Pix_Id", 2, 1));
        let source = DataSource::from_bytes(text.into_bytes());

        let modules = extractor(2).extract(&source).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].marker_row, 0);
        assert_eq!(modules[1].marker_row, 4);
    }

    #[test]
    fn test_extract_no_markers_is_empty() {
        let source = DataSource::from_bytes(b"a,b\nc,d\n".to_vec());
        let modules = extractor(4).extract(&source).unwrap();
        assert!(modules.is_empty());
    }

    #[test]
    fn test_truncated_module_is_fatal() {
        let text = module_text("Pix_Id", 3, 2);
        let source = DataSource::from_bytes(text.into_bytes());

        let err = extractor(5).extract(&source).unwrap_err();
        match err {
            Error::CoreError(specgrid_core::Error::TruncatedModule {
                module,
                expected,
                found,
            }) => {
                assert_eq!(module, 0);
                assert_eq!(expected, 5);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_bin_cell_is_fatal() {
        let text = "Pix_Id,bin_0\n1,12\n2,oops\n";
        let source = DataSource::from_bytes(text.as_bytes().to_vec());

        let err = extractor(2).extract(&source).unwrap_err();
        match err {
            Error::CoreError(specgrid_core::Error::InvalidBinValue { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, 1);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_empty_header_cells_skipped() {
        // A trailing comma in the header produces an empty cell, not a bin.
        let text = "Pix_Id,bin_0,\n1,7,\n2,8,\n";
        let source = DataSource::from_bytes(text.as_bytes().to_vec());

        let modules = extractor(2).extract(&source).unwrap();
        assert_eq!(modules[0].bin_columns, vec!["bin_0"]);
        assert_eq!(modules[0].rows, vec![vec![7], vec![8]]);
    }
}
