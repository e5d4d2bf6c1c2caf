//! tessera-test - Regression test framework for tessera
//!
//! Provides [`RegParams`], which counts comparisons and collects failures
//! across a regression test, and deterministic synthetic rasters to feed
//! the kernels with. Every sample of a generated raster depends on its
//! position and plane, so misplaced pixels show up as mismatches.
//!
//! # Usage
//!
//! ```ignore
//! use tessera_test::RegParams;
//!
//! let mut rp = RegParams::new("tile");
//! rp.compare_values(9.0, tiles.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to print raster summaries

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use tessera_core::{Dimensions, Plane, PlaneData, Raster, SampleType, color};

/// Build a plane whose samples encode their position and `seed`.
///
/// - `Gray8`: `(7x + 13y + 31 seed) mod 256`
/// - `Gray16`: `(257x + 509y + 1021 seed) mod 65536`
/// - `Gray32`: `0.5 (x + y w) + seed`
/// - `Rgb`: `(x, y, x + y + seed)` with each component `mod 256`
pub fn gradient_plane(width: u32, height: u32, sample_type: SampleType, seed: u32) -> TestResult<Plane> {
    let n = (width as usize) * (height as usize);
    let pos = |i: usize| ((i % width as usize) as u64, (i / width as usize) as u64);
    let seed64 = seed as u64;
    let data = match sample_type {
        SampleType::Gray8 => PlaneData::Gray8(
            (0..n)
                .map(|i| {
                    let (x, y) = pos(i);
                    ((7 * x + 13 * y + 31 * seed64) % 256) as u8
                })
                .collect(),
        ),
        SampleType::Gray16 => PlaneData::Gray16(
            (0..n)
                .map(|i| {
                    let (x, y) = pos(i);
                    ((257 * x + 509 * y + 1021 * seed64) % 65536) as u16
                })
                .collect(),
        ),
        SampleType::Gray32 => PlaneData::Gray32(
            (0..n).map(|i| 0.5 * i as f32 + seed as f32).collect(),
        ),
        SampleType::Rgb => PlaneData::Rgb(
            (0..n)
                .map(|i| {
                    let (x, y) = pos(i);
                    color::compose_rgb(
                        (x % 256) as u8,
                        (y % 256) as u8,
                        ((x + y + seed64) % 256) as u8,
                    )
                })
                .collect(),
        ),
    };
    Ok(Plane::from_data(width, height, data)?)
}

/// Build a raster of gradient planes, each seeded with its stack position.
pub fn gradient_raster(
    width: u32,
    height: u32,
    sample_type: SampleType,
    dims: Dimensions,
) -> TestResult<Raster> {
    let planes = (0..dims.plane_count() as u32)
        .map(|seed| gradient_plane(width, height, sample_type, seed))
        .collect::<TestResult<Vec<_>>>()?;
    Ok(Raster::from_planes(dims, planes)?)
}

/// Build a single-plane raster filled with one grey value.
pub fn constant_raster(width: u32, height: u32, sample_type: SampleType, value: f32) -> TestResult<Raster> {
    let mut m = Raster::new(width, height, sample_type, Dimensions::SINGLE)?.to_mut();
    m.fill(&tessera_core::FillValue::gray(value));
    Ok(m.into())
}

/// One-line summary of a raster for log output.
pub fn describe(raster: &Raster) -> String {
    let dims = raster.dimensions();
    format!(
        "{}x{} {:?} (c={}, z={}, t={})",
        raster.width(),
        raster.height(),
        raster.sample_type(),
        dims.channels,
        dims.slices,
        dims.frames
    )
}
