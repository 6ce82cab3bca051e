//! specgrid-core: Core types for pixel-detector spectrum grid analysis.
//!
//! This crate provides the foundational data model: grid coordinates for the
//! fixed 11x11 detector array, raw module tables carved out of an instrument
//! export, and the canonical per-pixel table produced by the transform stage.
//!

pub mod error;
pub mod grid;
pub mod module;
pub mod pixel;
pub mod table;

pub use error::{Error, Result};
pub use grid::{PixelCoord, GRID_DIM, PIXEL_COUNT};
pub use module::RawModule;
pub use pixel::PixelRecord;
pub use table::PixelTable;
