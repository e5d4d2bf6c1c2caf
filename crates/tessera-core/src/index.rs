//! Plane addressing for multi-plane rasters
//!
//! A raster holds `channels * slices * frames` planes. Planes are stored in
//! stack order: frame-major, then slice, then channel. The one-based stack
//! number of plane `(z, c, t)` is `t*C*Z + z*C + c + 1`.

use std::fmt;

use crate::error::{Error, Result};

/// Plane counts of a raster along the channel, slice (Z) and frame (T) axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Number of channels (C)
    pub channels: usize,
    /// Number of Z slices
    pub slices: usize,
    /// Number of time frames (T)
    pub frames: usize,
}

impl Dimensions {
    /// A single 2D plane.
    pub const SINGLE: Dimensions = Dimensions {
        channels: 1,
        slices: 1,
        frames: 1,
    };

    /// Create plane counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any count is zero.
    pub fn new(channels: usize, slices: usize, frames: usize) -> Result<Self> {
        if channels == 0 || slices == 0 || frames == 0 {
            return Err(Error::InvalidParameter(format!(
                "plane counts must be positive: c={}, z={}, t={}",
                channels, slices, frames
            )));
        }
        Ok(Self {
            channels,
            slices,
            frames,
        })
    }

    /// Total number of planes.
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.channels * self.slices * self.frames
    }

    /// Component-wise maximum of two plane counts.
    pub fn max(&self, other: &Dimensions) -> Dimensions {
        Dimensions {
            channels: self.channels.max(other.channels),
            slices: self.slices.max(other.slices),
            frames: self.frames.max(other.frames),
        }
    }

    /// Iterate all plane indices in stack order.
    pub fn indices(&self) -> impl Iterator<Item = PlaneIndex> + use<> {
        let dims = *self;
        (0..dims.plane_count()).map(move |i| PlaneIndex::from_zero_based(i, &dims))
    }

    /// Check whether an index addresses an existing plane.
    pub fn contains(&self, index: &PlaneIndex) -> bool {
        index.c < self.channels && index.z < self.slices && index.t < self.frames
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Zero-based `(z, c, t)` address of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PlaneIndex {
    /// Z slice
    pub z: usize,
    /// Channel
    pub c: usize,
    /// Time frame
    pub t: usize,
}

impl PlaneIndex {
    /// Create a plane index.
    pub const fn new(z: usize, c: usize, t: usize) -> Self {
        Self { z, c, t }
    }

    /// One-based stack number of this plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaneIndexOutOfRange`] naming the first axis whose
    /// component exceeds `dims`.
    pub fn to_stack_number(&self, dims: &Dimensions) -> Result<usize> {
        self.check(dims)?;
        Ok(self.t * dims.channels * dims.slices + self.z * dims.channels + self.c + 1)
    }

    /// Zero-based position of this plane in stack order.
    pub fn to_zero_based(&self, dims: &Dimensions) -> Result<usize> {
        Ok(self.to_stack_number(dims)? - 1)
    }

    /// Inverse of [`PlaneIndex::to_stack_number`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaneIndexOutOfRange`] if `number` is zero or larger
    /// than the plane count.
    pub fn from_stack_number(number: usize, dims: &Dimensions) -> Result<Self> {
        if number == 0 || number > dims.plane_count() {
            return Err(Error::PlaneIndexOutOfRange {
                axis: "stack",
                index: number,
                count: dims.plane_count(),
            });
        }
        Ok(Self::from_zero_based(number - 1, dims))
    }

    #[inline]
    fn from_zero_based(i: usize, dims: &Dimensions) -> Self {
        let c = i % dims.channels;
        let z = (i / dims.channels) % dims.slices;
        let t = i / (dims.channels * dims.slices);
        Self { z, c, t }
    }

    /// Clamp every component into `dims`, selecting the closest existing plane.
    pub fn clamp_to(&self, dims: &Dimensions) -> Self {
        Self {
            z: self.z.min(dims.slices - 1),
            c: self.c.min(dims.channels - 1),
            t: self.t.min(dims.frames - 1),
        }
    }

    fn check(&self, dims: &Dimensions) -> Result<()> {
        if self.c >= dims.channels {
            return Err(Error::PlaneIndexOutOfRange {
                axis: "channel",
                index: self.c,
                count: dims.channels,
            });
        }
        if self.z >= dims.slices {
            return Err(Error::PlaneIndexOutOfRange {
                axis: "slice",
                index: self.z,
                count: dims.slices,
            });
        }
        if self.t >= dims.frames {
            return Err(Error::PlaneIndexOutOfRange {
                axis: "frame",
                index: self.t,
                count: dims.frames,
            });
        }
        Ok(())
    }
}

impl fmt::Display for PlaneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z={}, c={}, t={}", self.z, self.c, self.t)
    }
}
