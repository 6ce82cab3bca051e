//! Data sources for delimited instrument exports.
//!

use crate::Result;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A delimited-text source, either a memory-mapped file or an in-memory
/// buffer (e.g. an uploaded stream).
///
/// The source owns the full byte range of the export. Scan passes never
/// share a cursor: each pass builds a fresh reader over [`Self::as_bytes`],
/// so re-scans are always positioned at the start regardless of call order.
pub enum DataSource {
    /// Memory-mapped file source.
    Mapped {
        /// The mapping itself.
        mmap: Mmap,
        /// Path the mapping was opened from.
        path: PathBuf,
    },
    /// In-memory byte buffer source.
    Memory(Vec<u8>),
}

impl DataSource {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::Mapped {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Wraps an in-memory buffer, such as an uploaded file body.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::Memory(bytes)
    }

    /// Returns the source contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Mapped { mmap, .. } => &mmap[..],
            Self::Memory(bytes) => bytes,
        }
    }

    /// Returns the source size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Returns the file path for mapped sources.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Mapped { path, .. } => Some(path),
            Self::Memory(_) => None,
        }
    }

    /// Starts a fresh single-pass row reader over the whole source.
    ///
    /// Rows are ragged (no header inference); structure is discovered by the
    /// scanner, not declared by the file.
    pub(crate) fn rows(&self) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.as_bytes())
    }
}
