//! Rectangular crop and paste
//!
//! Both operations clip the requested region against the plane bounds and
//! copy whole row spans.

use super::{Plane, PlaneData, Raster, RasterMut};
use crate::error::{Error, Result};
use crate::rect::Rect;

impl Plane {
    /// Extract the part of `rect` that lies inside this plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the rectangle does not
    /// intersect the plane.
    pub fn crop(&self, rect: &Rect) -> Result<Plane> {
        let clipped = clip_to_plane(self, rect)?;
        let (w, h) = (clipped.w as usize, clipped.h as usize);
        let sw = self.width() as usize;
        let (x0, y0) = (clipped.x as usize, clipped.y as usize);

        let data = match self.data() {
            PlaneData::Gray8(v) => PlaneData::Gray8(crop_rows(v, sw, x0, y0, w, h)),
            PlaneData::Gray16(v) => PlaneData::Gray16(crop_rows(v, sw, x0, y0, w, h)),
            PlaneData::Gray32(v) => PlaneData::Gray32(crop_rows(v, sw, x0, y0, w, h)),
            PlaneData::Rgb(v) => PlaneData::Rgb(crop_rows(v, sw, x0, y0, w, h)),
        };
        Plane::from_data(w as u32, h as u32, data)
    }

    /// Paste `src` with its top-left corner at `(x, y)`.
    ///
    /// Parts of `src` falling outside this plane are dropped; a paste that
    /// misses the plane entirely writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTypeMismatch`] if the sample types differ.
    pub fn insert(&mut self, src: &Plane, x: i32, y: i32) -> Result<()> {
        if src.sample_type() != self.sample_type() {
            return Err(Error::SampleTypeMismatch {
                expected: self.sample_type(),
                actual: src.sample_type(),
            });
        }
        let target = Rect::new_unchecked(x, y, src.width() as i32, src.height() as i32);
        let Some(dst_rect) = Rect::full(self.width(), self.height()).intersect(&target) else {
            return Ok(());
        };
        let span = Span {
            src_x: (dst_rect.x - x) as usize,
            src_y: (dst_rect.y - y) as usize,
            src_w: src.width() as usize,
            dst_x: dst_rect.x as usize,
            dst_y: dst_rect.y as usize,
            dst_w: self.width() as usize,
            w: dst_rect.w as usize,
            h: dst_rect.h as usize,
        };
        match (self.data_mut(), src.data()) {
            (PlaneData::Gray8(d), PlaneData::Gray8(s)) => span.copy(s, d),
            (PlaneData::Gray16(d), PlaneData::Gray16(s)) => span.copy(s, d),
            (PlaneData::Gray32(d), PlaneData::Gray32(s)) => span.copy(s, d),
            (PlaneData::Rgb(d), PlaneData::Rgb(s)) => span.copy(s, d),
            _ => unreachable!("sample types checked above"),
        }
        Ok(())
    }
}

impl Raster {
    /// Crop every plane to `rect`, keeping plane counts and calibration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the rectangle does not
    /// intersect the raster.
    pub fn crop(&self, rect: &Rect) -> Result<Raster> {
        let planes = self
            .planes()
            .iter()
            .map(|p| p.crop(rect))
            .collect::<Result<Vec<_>>>()?;
        let mut out = Raster::from_planes(self.dimensions(), planes)?.into_mut();
        out.copy_calibration_from(self);
        Ok(out.into())
    }
}

impl RasterMut {
    /// Paste every plane of `src` into the matching plane of this raster.
    ///
    /// # Errors
    ///
    /// - [`Error::PlaneCountMismatch`] if the plane counts differ
    /// - [`Error::SampleTypeMismatch`] if the sample types differ
    pub fn insert(&mut self, src: &Raster, x: i32, y: i32) -> Result<()> {
        if src.dimensions() != self.dimensions() {
            return Err(Error::PlaneCountMismatch {
                expected: self.dimensions(),
                actual: src.dimensions(),
            });
        }
        for (dst, plane) in self.planes_mut().iter_mut().zip(src.planes()) {
            dst.insert(plane, x, y)?;
        }
        Ok(())
    }
}

fn clip_to_plane(plane: &Plane, rect: &Rect) -> Result<Rect> {
    Rect::full(plane.width(), plane.height())
        .intersect(rect)
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "crop region {:?} does not intersect {}x{} plane",
                rect,
                plane.width(),
                plane.height()
            ))
        })
}

fn crop_rows<T: Copy>(src: &[T], sw: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(w * h);
    for y in y0..y0 + h {
        let start = y * sw + x0;
        out.extend_from_slice(&src[start..start + w]);
    }
    out
}

struct Span {
    src_x: usize,
    src_y: usize,
    src_w: usize,
    dst_x: usize,
    dst_y: usize,
    dst_w: usize,
    w: usize,
    h: usize,
}

impl Span {
    fn copy<T: Copy>(&self, src: &[T], dst: &mut [T]) {
        for row in 0..self.h {
            let s = (self.src_y + row) * self.src_w + self.src_x;
            let d = (self.dst_y + row) * self.dst_w + self.dst_x;
            dst[d..d + self.w].copy_from_slice(&src[s..s + self.w]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Calibration, Dimensions, SampleType};

    fn ramp(w: u32, h: u32) -> Plane {
        let data = (0..w * h).map(|i| i as u16).collect();
        Plane::from_data(w, h, PlaneData::Gray16(data)).unwrap()
    }

    #[test]
    fn test_crop_inside() {
        let p = ramp(5, 4);
        let c = p.crop(&Rect::new_unchecked(1, 1, 2, 2)).unwrap();
        assert_eq!((c.width(), c.height()), (2, 2));
        assert_eq!(c.get_value(0, 0), Some(6.0));
        assert_eq!(c.get_value(1, 1), Some(12.0));
    }

    #[test]
    fn test_crop_clips_to_bounds() {
        let p = ramp(5, 4);
        let c = p.crop(&Rect::new_unchecked(-2, 3, 4, 10)).unwrap();
        assert_eq!((c.width(), c.height()), (2, 1));
        assert_eq!(c.get_value(0, 0), Some(15.0));
    }

    #[test]
    fn test_crop_outside_fails() {
        let p = ramp(5, 4);
        assert!(p.crop(&Rect::new_unchecked(5, 0, 2, 2)).is_err());
    }

    #[test]
    fn test_insert_clipped() {
        let mut dst = Plane::new(4, 4, SampleType::Gray16).unwrap();
        let src = ramp(3, 3);
        dst.insert(&src, -1, 2).unwrap();
        // src (1,0) lands at (0,2)
        assert_eq!(dst.get_value(0, 2), Some(1.0));
        assert_eq!(dst.get_value(1, 3), Some(5.0));
        assert_eq!(dst.get_value(0, 0), Some(0.0));

        // Entirely outside is a no-op
        dst.insert(&src, 10, 10).unwrap();

        // So is a paste whose far edge lies beyond i32::MAX
        dst.insert(&src, i32::MAX - 1, 0).unwrap();
        assert_eq!(dst.get_value(0, 3), Some(4.0));
    }

    #[test]
    fn test_insert_type_mismatch() {
        let mut dst = Plane::new(4, 4, SampleType::Gray8).unwrap();
        assert!(matches!(
            dst.insert(&ramp(2, 2), 0, 0),
            Err(Error::SampleTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_raster_insert_plane_count_mismatch() {
        let two = Raster::new(4, 4, SampleType::Gray8, Dimensions::new(2, 1, 1).unwrap()).unwrap();
        let mut one = Raster::new(4, 4, SampleType::Gray8, Dimensions::SINGLE)
            .unwrap()
            .to_mut();
        let err = one.insert(&two, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::PlaneCountMismatch { expected, actual }
                if expected == Dimensions::SINGLE && actual.channels == 2
        ));
    }

    #[test]
    fn test_raster_crop_keeps_calibration() {
        let dims = Dimensions::new(2, 1, 1).unwrap();
        let mut m = Raster::new(6, 6, SampleType::Gray8, dims).unwrap().to_mut();
        m.set_calibration(Some(Calibration::isotropic(2.0, "mm")));
        let r: Raster = m.into();
        let c = r.crop(&Rect::new_unchecked(2, 2, 3, 3)).unwrap();
        assert_eq!(c.plane_count(), 2);
        assert_eq!(c.width(), 3);
        assert_eq!(c.calibration().unwrap().unit, "mm");
    }
}
