//! Error types for tessera-core
//!
//! Every fallible raster operation returns [`Result`]. Variants carry the
//! offending values so that callers can report them without re-deriving
//! context.

use thiserror::Error;

use crate::{Dimensions, SampleType};

/// tessera-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A plane index component exceeds the plane counts of the raster
    #[error("{axis} index {index} out of range (count {count})")]
    PlaneIndexOutOfRange {
        axis: &'static str,
        index: usize,
        count: usize,
    },

    /// Raster or plane dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Rasters with different (c, z, t) plane counts
    #[error(
        "plane count mismatch: expected c={}, z={}, t={}, got c={}, z={}, t={}",
        .expected.channels, .expected.slices, .expected.frames,
        .actual.channels, .actual.slices, .actual.frames
    )]
    PlaneCountMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },

    /// Planes of different sample types cannot be mixed in one raster
    #[error("sample type mismatch: expected {expected:?}, got {actual:?}")]
    SampleTypeMismatch {
        expected: SampleType,
        actual: SampleType,
    },

    /// Operation not supported
    #[error("operation not supported: {0}")]
    NotSupported(String),
}

/// Result type alias for tessera-core operations
pub type Result<T> = std::result::Result<T, Error>;
