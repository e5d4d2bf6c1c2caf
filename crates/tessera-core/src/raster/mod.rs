//! Raster - the multi-plane image container
//!
//! A `Raster` is a `width x height` grid with one or more planes addressed
//! by [`PlaneIndex`]. All planes share width, height and [`SampleType`].
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `RasterMut` via [`Raster::try_into_mut`]
//! or [`Raster::to_mut`], then convert back with `Into<Raster>`.

mod clip;
mod convert;
mod plane;
mod slices;

pub use convert::consensus_sample_type;
pub use plane::{Plane, PlaneData};

use crate::color;
use crate::error::{Error, Result};
use crate::index::{Dimensions, PlaneIndex};
use std::sync::Arc;

/// Sample type shared by all planes of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// 8-bit unsigned grey
    Gray8,
    /// 16-bit unsigned grey
    Gray16,
    /// 32-bit float grey
    Gray32,
    /// Packed 8-bit RGB
    Rgb,
}

impl SampleType {
    /// Conventional bit depth: 8, 16, 32, or 24 for RGB.
    pub fn bit_depth(self) -> u32 {
        match self {
            SampleType::Gray8 => 8,
            SampleType::Gray16 => 16,
            SampleType::Gray32 => 32,
            SampleType::Rgb => 24,
        }
    }

    /// Create a sample type from its conventional bit depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] for depths other than 8, 16, 24, 32.
    pub fn from_bit_depth(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(SampleType::Gray8),
            16 => Ok(SampleType::Gray16),
            24 => Ok(SampleType::Rgb),
            32 => Ok(SampleType::Gray32),
            _ => Err(Error::NotSupported(format!("bit depth {}", bits))),
        }
    }

    /// Whether samples are packed RGB.
    #[inline]
    pub fn is_rgb(self) -> bool {
        self == SampleType::Rgb
    }
}

/// Physical pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Pixel width in `unit`
    pub pixel_width: f64,
    /// Pixel height in `unit`
    pub pixel_height: f64,
    /// Voxel depth in `unit`
    pub pixel_depth: f64,
    /// Length unit, e.g. "µm"
    pub unit: String,
}

impl Calibration {
    /// Create an isotropic calibration.
    pub fn isotropic(size: f64, unit: impl Into<String>) -> Self {
        Self {
            pixel_width: size,
            pixel_height: size,
            pixel_depth: size,
            unit: unit.into(),
        }
    }
}

/// Constant written into border, background or uncovered pixels.
///
/// Grey planes use `gray`; RGB planes use `rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FillValue {
    /// Value for grey planes
    pub gray: f32,
    /// Triple for RGB planes
    pub rgb: (u8, u8, u8),
}

impl FillValue {
    /// Black for every sample type.
    pub const BLACK: FillValue = FillValue {
        gray: 0.0,
        rgb: (0, 0, 0),
    };

    /// Create a fill value with independent grey and RGB parts.
    pub fn new(gray: f32, rgb: (u8, u8, u8)) -> Self {
        Self { gray, rgb }
    }

    /// Grey fill; RGB planes receive the clamped grey triple.
    pub fn gray(value: f32) -> Self {
        let g = plane::clamp_round(value, 255.0) as u8;
        Self {
            gray: value,
            rgb: (g, g, g),
        }
    }

    /// Color fill; grey planes receive the unweighted mean.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            gray: color::mean_gray(r, g, b) as f32,
            rgb: (r, g, b),
        }
    }

    #[inline]
    pub(crate) fn packed_rgb(&self) -> u32 {
        color::compose_rgb(self.rgb.0, self.rgb.1, self.rgb.2)
    }
}

/// Internal raster data
#[derive(Debug, Clone)]
struct RasterData {
    width: u32,
    height: u32,
    sample_type: SampleType,
    dims: Dimensions,
    calibration: Option<Calibration>,
    /// Planes in stack order
    planes: Vec<Plane>,
}

/// Multi-plane raster image
///
/// # Examples
///
/// ```
/// use tessera_core::{Dimensions, Raster, SampleType};
///
/// let raster = Raster::new(640, 480, SampleType::Gray8, Dimensions::SINGLE).unwrap();
/// assert_eq!(raster.width(), 640);
/// assert_eq!(raster.plane_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a zero-filled raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, sample_type: SampleType, dims: Dimensions) -> Result<Self> {
        let plane = Plane::new(width, height, sample_type)?;
        let planes = vec![plane; dims.plane_count()];
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                sample_type,
                dims,
                calibration: None,
                planes,
            }),
        })
    }

    /// Build a raster from planes in stack order.
    ///
    /// # Errors
    ///
    /// Returns an error if the plane count does not match `dims`, or if the
    /// planes differ in size or sample type.
    pub fn from_planes(dims: Dimensions, planes: Vec<Plane>) -> Result<Self> {
        let first = planes
            .first()
            .ok_or_else(|| Error::InvalidParameter("raster needs at least one plane".into()))?;
        if planes.len() != dims.plane_count() {
            return Err(Error::InvalidParameter(format!(
                "{} planes cannot fill c={} z={} t={}",
                planes.len(),
                dims.channels,
                dims.slices,
                dims.frames
            )));
        }
        let (width, height, sample_type) = (first.width(), first.height(), first.sample_type());
        for plane in &planes {
            check_plane(width, height, sample_type, plane)?;
        }
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                sample_type,
                dims,
                calibration: None,
                planes,
            }),
        })
    }

    /// Wrap a single plane.
    pub fn from_plane(plane: Plane) -> Self {
        Raster {
            inner: Arc::new(RasterData {
                width: plane.width(),
                height: plane.height(),
                sample_type: plane.sample_type(),
                dims: Dimensions::SINGLE,
                calibration: None,
                planes: vec![plane],
            }),
        }
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the sample type.
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.inner.sample_type
    }

    /// Get the plane counts.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.inner.dims
    }

    /// Get the total number of planes.
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.inner.planes.len()
    }

    /// Get the calibration, if any.
    #[inline]
    pub fn calibration(&self) -> Option<&Calibration> {
        self.inner.calibration.as_ref()
    }

    /// All planes in stack order.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.inner.planes
    }

    /// Get a plane by its `(z, c, t)` index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaneIndexOutOfRange`] if the index is outside the
    /// plane counts.
    pub fn plane(&self, index: PlaneIndex) -> Result<&Plane> {
        let i = index.to_zero_based(&self.inner.dims)?;
        Ok(&self.inner.planes[i])
    }

    /// Get the plane closest to `index` (components clamped to the counts).
    pub fn closest_plane(&self, index: PlaneIndex) -> &Plane {
        let clamped = index.clamp_to(&self.inner.dims);
        let i = clamped.t * self.inner.dims.channels * self.inner.dims.slices
            + clamped.z * self.inner.dims.channels
            + clamped.c;
        &self.inner.planes[i]
    }

    /// Iterate `(index, plane)` pairs in stack order.
    pub fn indexed_planes(&self) -> impl Iterator<Item = (PlaneIndex, &Plane)> {
        self.inner.dims.indices().zip(self.inner.planes.iter())
    }

    /// Check if two rasters have the same width, height and sample type.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.sample_type == other.inner.sample_type
    }

    /// Check two rasters for identical geometry, plane counts and samples.
    ///
    /// Calibration is not compared.
    pub fn equals(&self, other: &Raster) -> bool {
        self.sizes_equal(other)
            && self.inner.dims == other.inner.dims
            && self
                .inner
                .planes
                .iter()
                .zip(other.inner.planes.iter())
                .all(|(a, b)| a.equals(b))
    }

    /// Create a zero-filled raster with the same plane counts, sample type
    /// and calibration but a different size.
    pub fn create_template(&self, width: u32, height: u32) -> Result<Raster> {
        let mut out = Raster::new(width, height, self.inner.sample_type, self.inner.dims)?
            .to_mut();
        out.set_calibration(self.inner.calibration.clone());
        Ok(out.into())
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Create a deep copy of this raster.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Raster {
            inner: Arc::new((*self.inner).clone()),
        }
    }

    /// Try to get mutable access to the raster.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Get mutable access, copying only if the data is shared.
    pub fn into_mut(self) -> RasterMut {
        match self.try_into_mut() {
            Ok(m) => m,
            Err(shared) => shared.to_mut(),
        }
    }
}

/// Mutable raster
///
/// Allows modification of plane data. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the sample type.
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.inner.sample_type
    }

    /// Get the plane counts.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.inner.dims
    }

    /// Set or remove the calibration.
    pub fn set_calibration(&mut self, calibration: Option<Calibration>) {
        self.inner.calibration = calibration;
    }

    /// Copy calibration from another raster.
    pub fn copy_calibration_from(&mut self, src: &Raster) {
        self.inner.calibration = src.inner.calibration.clone();
    }

    /// All planes in stack order.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.inner.planes
    }

    /// Mutable access to all planes in stack order.
    ///
    /// Plane sizes and types must not be changed through this slice.
    #[inline]
    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.inner.planes
    }

    /// Get a mutable plane by index.
    pub fn plane_mut(&mut self, index: PlaneIndex) -> Result<&mut Plane> {
        let i = index.to_zero_based(&self.inner.dims)?;
        Ok(&mut self.inner.planes[i])
    }

    /// Replace one plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] or [`Error::SampleTypeMismatch`]
    /// before writing anything if the plane does not fit this raster.
    pub fn set_plane(&mut self, index: PlaneIndex, plane: Plane) -> Result<()> {
        check_plane(self.inner.width, self.inner.height, self.inner.sample_type, &plane)?;
        *self.plane_mut(index)? = plane;
        Ok(())
    }

    /// Fill every plane with a constant.
    pub fn fill(&mut self, fill: &FillValue) {
        for plane in &mut self.inner.planes {
            plane.fill(fill);
        }
    }
}

impl From<RasterMut> for Raster {
    fn from(raster_mut: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster_mut.inner),
        }
    }
}

fn check_plane(width: u32, height: u32, sample_type: SampleType, plane: &Plane) -> Result<()> {
    if plane.width() != width || plane.height() != height {
        return Err(Error::DimensionMismatch {
            expected: (width, height),
            actual: (plane.width(), plane.height()),
        });
    }
    if plane.sample_type() != sample_type {
        return Err(Error::SampleTypeMismatch {
            expected: sample_type,
            actual: plane.sample_type(),
        });
    }
    Ok(())
}
