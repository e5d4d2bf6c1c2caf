//! tessera-core - Raster data model for the tessera transform kernels
//!
//! This crate provides the data structures the geometric-transform kernels
//! operate on:
//!
//! - [`Raster`] / [`RasterMut`] - Multi-plane image container (immutable / mutable)
//! - [`Plane`] - A single 2D sample grid of one [`SampleType`]
//! - [`PlaneIndex`] / [`Dimensions`] - `(z, c, t)` plane addressing
//! - [`Rect`] - Integer rectangle regions
//! - [`Calibration`] - Physical pixel size carried through transforms
//! - [`FillValue`] - Constant used for borders and backgrounds
//! - [`Progress`] - Progress reporting and cooperative cancellation

pub mod error;
pub mod index;
pub mod progress;
pub mod raster;
pub mod rect;

pub use error::{Error, Result};
pub use index::{Dimensions, PlaneIndex};
pub use progress::{NoProgress, Progress, ProgressCounter, ProgressInfo};
pub use raster::{
    Calibration, FillValue, Plane, PlaneData, Raster, RasterMut, SampleType,
    consensus_sample_type,
};
pub use rect::Rect;

/// Helpers for packed 8-bit RGB samples.
///
/// # Pixel format
///
/// RGB samples are stored as `0x00RRGGBB` (red in bits 16..24).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 16;
    pub const GREEN_SHIFT: u32 = 8;
    pub const BLUE_SHIFT: u32 = 0;

    /// Extract red component from a packed pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a packed pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a packed pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Compose a packed RGB pixel.
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT)
    }

    /// Extract RGB values from a packed pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Unweighted grey value `(r + g + b) / 3`.
    #[inline]
    pub fn mean_gray(r: u8, g: u8, b: u8) -> u8 {
        ((r as u32 + g as u32 + b as u32) / 3) as u8
    }

}
