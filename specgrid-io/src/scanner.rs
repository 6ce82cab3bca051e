//! Row scanner for marker discovery and labeled metadata extraction.
//!
//! The instrument export has no declared schema; structure is located by
//! scanning cell text for marker substrings.

use crate::{DataSource, Error, Result};
use log::debug;

/// How many leading cells of a row are examined for metadata labels.
/// Labels appear near the start of metadata rows by convention.
const LABEL_CELL_PREFIX: usize = 3;

/// Scanner for discovering markers and label values in a delimited source.
pub struct RowScanner;

impl RowScanner {
    /// Finds the 0-based row indices whose cells contain `target` as a
    /// substring, in ascending order. A row contributes at most one index.
    ///
    /// Zero matches is an empty result, not an error.
    ///
    /// # Errors
    /// Returns an error for an empty target or an unreadable row.
    pub fn find_marker_rows(source: &DataSource, target: &str) -> Result<Vec<usize>> {
        if target.is_empty() {
            return Err(Error::InvalidFormat(
                "marker target must not be empty".into(),
            ));
        }

        let mut indices = Vec::new();
        for (row, record) in source.rows().records().enumerate() {
            let record = record?;
            if record.iter().any(|cell| cell.contains(target)) {
                indices.push(row);
            }
        }
        debug!("found {} marker row(s) for {target:?}", indices.len());
        Ok(indices)
    }

    /// Collects the values following `label` across the whole source.
    ///
    /// For each row, the first 3 cells (fewer for shorter rows) are tested;
    /// each cell containing `label` as a substring contributes the next
    /// cell's text, or `None` when the matching cell is last in its row.
    /// A missing label yields an empty list, not an error.
    ///
    /// # Errors
    /// Returns an error for an empty label or an unreadable row.
    pub fn find_label_values(source: &DataSource, label: &str) -> Result<Vec<Option<String>>> {
        if label.is_empty() {
            return Err(Error::InvalidFormat("label must not be empty".into()));
        }

        let mut values = Vec::new();
        for record in source.rows().records() {
            let record = record?;
            for cell in 0..record.len().min(LABEL_CELL_PREFIX) {
                if record[cell].contains(label) {
                    values.push(record.get(cell + 1).map(str::to_string));
                }
            }
        }
        Ok(values)
    }

    /// Returns the value for the Nth (0-based) occurrence of `label`, or
    /// `None` when there are fewer occurrences.
    ///
    /// # Errors
    /// Returns an error for an empty label or an unreadable row.
    pub fn find_label_value(
        source: &DataSource,
        label: &str,
        occurrence: usize,
    ) -> Result<Option<String>> {
        if label.is_empty() {
            return Err(Error::InvalidFormat("label must not be empty".into()));
        }

        let mut found = 0;
        for record in source.rows().records() {
            let record = record?;
            for cell in 0..record.len().min(LABEL_CELL_PREFIX) {
                if record[cell].contains(label) {
                    if found == occurrence {
                        return Ok(record.get(cell + 1).map(str::to_string));
                    }
                    found += 1;
                }
            }
        }
        Ok(None)
    }

    /// Counts the rows in the source.
    ///
    /// # Errors
    /// Returns an error for an unreadable row.
    pub fn count_rows(source: &DataSource) -> Result<usize> {
        let mut count = 0;
        for record in source.rows().records() {
            record?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> DataSource {
        DataSource::from_bytes(text.as_bytes().to_vec())
    }

    #[test]
    fn test_marker_rows_ascending() {
        let src = source("noise,x\nPix_Id,bin_0\n1,5\nPix_Id,bin_0\n2,6\n");
        let rows = RowScanner::find_marker_rows(&src, "Pix_Id").unwrap();
        assert_eq!(rows, vec![1, 3]);
    }

    #[test]
    fn test_marker_substring_match_once_per_row() {
        // Two matching cells in one row still yield a single index.
        let src = source("Pix_Id,Pix_Id_copy\n");
        let rows = RowScanner::find_marker_rows(&src, "Pix_Id").unwrap();
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn test_marker_absent_is_empty() {
        let src = source("a,b\nc,d\n");
        assert!(RowScanner::find_marker_rows(&src, "Pix_Id")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_marker_empty_target_rejected() {
        let src = source("a,b\n");
        assert!(RowScanner::find_marker_rows(&src, "").is_err());
    }

    #[test]
    fn test_label_values_in_row_order() {
        let src = source("height:,1.5\nother,row\nheight:,2.5\nheight:,3.5\n");
        let values = RowScanner::find_label_values(&src, "height:").unwrap();
        assert_eq!(
            values,
            vec![
                Some("1.5".to_string()),
                Some("2.5".to_string()),
                Some("3.5".to_string())
            ]
        );
    }

    #[test]
    fn test_label_beyond_prefix_ignored() {
        // Label in the 4th cell is outside the scanned prefix.
        let src = source("a,b,c,height:,9\n");
        assert!(RowScanner::find_label_values(&src, "height:")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_label_in_last_cell_yields_none() {
        let src = source("pad,height:\n");
        let values = RowScanner::find_label_values(&src, "height:").unwrap();
        assert_eq!(values, vec![None]);
    }

    #[test]
    fn test_label_occurrence_lookup() {
        let src = source("stage_x_mm:,10.0\nstage_x_mm:,20.0\n");
        let first = RowScanner::find_label_value(&src, "stage_x_mm:", 0).unwrap();
        assert_eq!(first.as_deref(), Some("10.0"));
        let second = RowScanner::find_label_value(&src, "stage_x_mm:", 1).unwrap();
        assert_eq!(second.as_deref(), Some("20.0"));
        let third = RowScanner::find_label_value(&src, "stage_x_mm:", 2).unwrap();
        assert!(third.is_none());
    }

    #[test]
    fn test_count_rows() {
        let src = source("a\nb,c\nd\n");
        assert_eq!(RowScanner::count_rows(&src).unwrap(), 3);
    }
}
