//! Delimited-text export of canonical pixel tables.

use crate::Result;
use specgrid_core::PixelTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writer for the canonical-table download artifact.
///
/// The `array_bins` column is omitted: a sequence-valued column has no flat
/// delimited representation. Peak-metric columns are written only once their
/// pass has run on the table.
pub struct TableWriter<W: Write> {
    writer: W,
}

impl TableWriter<BufWriter<File>> {
    /// Creates a file-backed writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl<W: Write> TableWriter<W> {
    /// Wraps an arbitrary writer (e.g. an in-memory buffer for uploads).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one canonical table as delimited text.
    ///
    /// # Errors
    /// Returns an error on write failure.
    pub fn write_table(&mut self, table: &PixelTable) -> Result<()> {
        let with_peaks = table.has_peak_counts();
        let with_bin_max = table.has_bin_max();

        let mut header =
            String::from("pixel_id,x_index,y_index,total_count,total_counts_norm,is_edge");
        if with_peaks {
            header.push_str(",peak_count,non_peak_count");
        }
        if with_bin_max {
            header.push_str(",bin_max,peak_height");
        }
        writeln!(self.writer, "{header}")?;

        for record in table.records() {
            write!(
                self.writer,
                "{},{},{},{},{:.3},{}",
                record.pixel_id,
                record.x_index(),
                record.y_index(),
                record.total_count,
                record.total_counts_norm,
                record.is_edge
            )?;
            if with_peaks {
                write!(
                    self.writer,
                    ",{},{}",
                    record.peak_count.unwrap_or(0),
                    record.non_peak_count.unwrap_or(0)
                )?;
            }
            if with_bin_max {
                write!(
                    self.writer,
                    ",{},{}",
                    record.bin_max.unwrap_or(0),
                    record.peak_height.unwrap_or(0)
                )?;
            }
            writeln!(self.writer)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specgrid_algorithms::{add_peak_counts, transform, PeakWindow};
    use specgrid_core::{RawModule, PIXEL_COUNT};
    use tempfile::NamedTempFile;

    fn make_table() -> PixelTable {
        let module = RawModule {
            marker_row: 0,
            bin_columns: vec!["bin_0".into(), "bin_1".into()],
            index_values: (1..=PIXEL_COUNT).map(|i| i.to_string()).collect(),
            rows: (0..PIXEL_COUNT as u64).map(|p| vec![p, 3]).collect(),
        };
        transform(&module).unwrap()
    }

    #[test]
    fn test_write_base_columns() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = TableWriter::create(file.path()).unwrap();
        writer.write_table(&make_table()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "pixel_id,x_index,y_index,total_count,total_counts_norm,is_edge"
        );
        assert_eq!(lines.next().unwrap(), "1,1,1,3,0.024,true");
        assert_eq!(content.lines().count(), PIXEL_COUNT + 1);
        assert!(!content.contains("array_bins"));
    }

    #[test]
    fn test_write_peak_columns_when_present() {
        let mut table = make_table();
        add_peak_counts(&mut table, PeakWindow::new(1, 1));

        let mut buffer = Vec::new();
        TableWriter::new(&mut buffer).write_table(&table).unwrap();
        let content = String::from_utf8(buffer).unwrap();

        let header = content.lines().next().unwrap();
        assert!(header.ends_with("peak_count,non_peak_count"));
        assert!(!header.contains("bin_max"));

        // Pixel 1: bins [0, 3], window [0, 2) sums to 3.
        assert!(content.lines().nth(1).unwrap().ends_with(",3,0"));
    }
}
