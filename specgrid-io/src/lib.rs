//! specgrid-io: Delimited-stream extraction and export.
//!
//! This crate locates module blocks inside semi-structured instrument
//! exports, carves them into raw module tables, recovers labeled metadata
//! values, and serializes canonical tables back to delimited text.
//!
//! Sources are memory-mapped files or in-memory byte buffers. Every scan
//! pass reads the source from the start through a fresh reader, so repeated
//! passes never observe a stale cursor position.

mod error;
mod extract;
mod pipeline;
mod scanner;
mod source;
mod writer;

pub use error::{Error, Result};
pub use extract::{ExtractorConfig, ModuleExtractor, DEFAULT_MARKER};
pub use pipeline::{labels, AnalysisConfig, Analyzer};
pub use scanner::RowScanner;
pub use source::DataSource;
pub use writer::TableWriter;
