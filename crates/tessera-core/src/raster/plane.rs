//! Plane - a single 2D sample grid
//!
//! Samples are stored row-major without padding. Grey samples are read and
//! written as `f32`; integer types round and clamp on write. RGB samples are
//! packed `0x00RRGGBB` words (see [`crate::color`]).

use super::{FillValue, SampleType};
use crate::color;
use crate::error::{Error, Result};

/// Typed sample storage of a [`Plane`].
#[derive(Debug, Clone)]
pub enum PlaneData {
    /// 8-bit unsigned grey samples
    Gray8(Vec<u8>),
    /// 16-bit unsigned grey samples
    Gray16(Vec<u16>),
    /// 32-bit float grey samples
    Gray32(Vec<f32>),
    /// Packed 8-bit RGB samples
    Rgb(Vec<u32>),
}

impl PlaneData {
    fn zeroed(sample_type: SampleType, len: usize) -> Self {
        match sample_type {
            SampleType::Gray8 => PlaneData::Gray8(vec![0; len]),
            SampleType::Gray16 => PlaneData::Gray16(vec![0; len]),
            SampleType::Gray32 => PlaneData::Gray32(vec![0.0; len]),
            SampleType::Rgb => PlaneData::Rgb(vec![0; len]),
        }
    }

    /// Sample type of this storage.
    pub fn sample_type(&self) -> SampleType {
        match self {
            PlaneData::Gray8(_) => SampleType::Gray8,
            PlaneData::Gray16(_) => SampleType::Gray16,
            PlaneData::Gray32(_) => SampleType::Gray32,
            PlaneData::Rgb(_) => SampleType::Rgb,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            PlaneData::Gray8(v) => v.len(),
            PlaneData::Gray16(v) => v.len(),
            PlaneData::Gray32(v) => v.len(),
            PlaneData::Rgb(v) => v.len(),
        }
    }

    /// Whether the storage holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Round and clamp a grey value into `[0, max]`.
#[inline]
pub(crate) fn clamp_round(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    (value + 0.5).floor().clamp(0.0, max)
}

/// A 2D grid of samples of one [`SampleType`].
#[derive(Debug, Clone)]
pub struct Plane {
    width: u32,
    height: u32,
    data: PlaneData,
}

impl Plane {
    /// Create a zero-filled plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, sample_type: SampleType) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            data: PlaneData::zeroed(sample_type, len),
        })
    }

    /// Wrap existing sample storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or do not match the
    /// number of samples.
    pub fn from_data(width: u32, height: u32, data: PlaneData) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "plane {}x{} needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Get the plane width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the plane height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the sample type.
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.data.sample_type()
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn data(&self) -> &PlaneData {
        &self.data
    }

    /// Get mutable access to the samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut PlaneData {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[inline]
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Get a grey value at (x, y).
    ///
    /// RGB samples are reported as their unweighted mean.
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get_value(&self, x: u32, y: u32) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| self.get_value_unchecked(x, y))
    }

    /// Get a grey value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_value_unchecked(&self, x: u32, y: u32) -> f32 {
        let i = self.offset(x, y);
        match &self.data {
            PlaneData::Gray8(v) => v[i] as f32,
            PlaneData::Gray16(v) => v[i] as f32,
            PlaneData::Gray32(v) => v[i],
            PlaneData::Rgb(v) => {
                let (r, g, b) = color::extract_rgb(v[i]);
                color::mean_gray(r, g, b) as f32
            }
        }
    }

    /// Set a grey value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the coordinates are out of bounds.
    pub fn set_value(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Error::InvalidParameter(format!(
                "pixel ({}, {}) outside {}x{} plane",
                x, y, self.width, self.height
            )));
        }
        self.set_value_unchecked(x, y, value);
        Ok(())
    }

    /// Set a grey value without bounds checking.
    ///
    /// Integer types round and clamp; RGB planes receive a grey triple.
    #[inline]
    pub fn set_value_unchecked(&mut self, x: u32, y: u32, value: f32) {
        let i = self.offset(x, y);
        match &mut self.data {
            PlaneData::Gray8(v) => v[i] = clamp_round(value, 255.0) as u8,
            PlaneData::Gray16(v) => v[i] = clamp_round(value, 65535.0) as u16,
            PlaneData::Gray32(v) => v[i] = value,
            PlaneData::Rgb(v) => {
                let g = clamp_round(value, 255.0) as u8;
                v[i] = color::compose_rgb(g, g, g);
            }
        }
    }

    /// Get RGB values at (x, y).
    ///
    /// Grey samples are reported as a clamped grey triple.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some(match &self.data {
            PlaneData::Rgb(v) => color::extract_rgb(v[i]),
            _ => {
                let g = clamp_round(self.get_value_unchecked(x, y), 255.0) as u8;
                (g, g, g)
            }
        })
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Grey planes receive the unweighted mean of the triple.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Error::InvalidParameter(format!(
                "pixel ({}, {}) outside {}x{} plane",
                x, y, self.width, self.height
            )));
        }
        let i = self.offset(x, y);
        if let PlaneData::Rgb(v) = &mut self.data {
            v[i] = color::compose_rgb(r, g, b);
        } else {
            self.set_value_unchecked(x, y, color::mean_gray(r, g, b) as f32);
        }
        Ok(())
    }

    /// Copy the sample at `(sx, sy)` to `(dx, dy)` within this plane.
    ///
    /// The sample is copied bit-for-bit regardless of its type.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of bounds.
    #[inline]
    pub fn copy_pixel(&mut self, sx: u32, sy: u32, dx: u32, dy: u32) {
        let s = self.offset(sx, sy);
        let d = self.offset(dx, dy);
        match &mut self.data {
            PlaneData::Gray8(v) => v[d] = v[s],
            PlaneData::Gray16(v) => v[d] = v[s],
            PlaneData::Gray32(v) => v[d] = v[s],
            PlaneData::Rgb(v) => v[d] = v[s],
        }
    }

    /// Fill the whole plane with a constant.
    pub fn fill(&mut self, fill: &FillValue) {
        match &mut self.data {
            PlaneData::Gray8(v) => v.fill(clamp_round(fill.gray, 255.0) as u8),
            PlaneData::Gray16(v) => v.fill(clamp_round(fill.gray, 65535.0) as u16),
            PlaneData::Gray32(v) => v.fill(fill.gray),
            PlaneData::Rgb(v) => v.fill(fill.packed_rgb()),
        }
    }

    /// Minimum and maximum grey value over the plane.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for y in 0..self.height {
            for x in 0..self.width {
                let v = self.get_value_unchecked(x, y);
                if v.is_nan() {
                    continue;
                }
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min, max)
    }

    /// Check two planes for identical size, type and samples.
    ///
    /// Float samples are compared bit-for-bit.
    pub fn equals(&self, other: &Plane) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        match (&self.data, &other.data) {
            (PlaneData::Gray8(a), PlaneData::Gray8(b)) => a == b,
            (PlaneData::Gray16(a), PlaneData::Gray16(b)) => a == b,
            (PlaneData::Gray32(a), PlaneData::Gray32(b)) => a
                .iter()
                .zip(b.iter())
                .all(|(p, q)| p.to_bits() == q.to_bits()),
            (PlaneData::Rgb(a), PlaneData::Rgb(b)) => a == b,
            _ => false,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_right(&self) -> Plane {
        self.remap_quarter(true)
    }

    /// Rotate 90 degrees counter-clockwise.
    pub fn rotate_left(&self) -> Plane {
        self.remap_quarter(false)
    }

    fn remap_quarter(&self, clockwise: bool) -> Plane {
        let w = self.width as usize;
        let h = self.height as usize;
        // Output is h wide and w tall
        let dst_index = |x: usize, y: usize| -> usize {
            let (nx, ny) = if clockwise {
                (h - 1 - y, x)
            } else {
                (y, w - 1 - x)
            };
            ny * h + nx
        };
        let data = match &self.data {
            PlaneData::Gray8(v) => PlaneData::Gray8(remap(v, w, h, dst_index)),
            PlaneData::Gray16(v) => PlaneData::Gray16(remap(v, w, h, dst_index)),
            PlaneData::Gray32(v) => PlaneData::Gray32(remap(v, w, h, dst_index)),
            PlaneData::Rgb(v) => PlaneData::Rgb(remap(v, w, h, dst_index)),
        };
        Plane {
            width: self.height,
            height: self.width,
            data,
        }
    }
}

fn remap<T: Copy + Default>(
    src: &[T],
    w: usize,
    h: usize,
    dst_index: impl Fn(usize, usize) -> usize,
) -> Vec<T> {
    let mut out = vec![T::default(); src.len()];
    for y in 0..h {
        for x in 0..w {
            out[dst_index(x, y)] = src[y * w + x];
        }
    }
    out
}
