//! Raster rotation
//!
//! Multiples of 90 degrees are exact sample permutations. Any other angle
//! resamples each plane with bilinear interpolation about the raster
//! center, optionally growing the canvas to the rotated bounding box.
//!
//! Positive angles rotate clockwise on screen (y grows downward).

use tessera_core::color;
use tessera_core::{FillValue, Plane, PlaneData, Progress, Raster, Rect};

use crate::planes::map_planes;
use crate::{TransformError, TransformResult};

/// Options for [`rotate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateOptions {
    /// Grow the canvas to the rotated bounding box instead of clipping
    pub expand_canvas: bool,
    /// Value for pixels not covered by the rotated source
    pub fill: FillValue,
    /// Report the covered region in [`RotateOutput::region`]
    pub emit_region: bool,
}

impl Default for RotateOptions {
    fn default() -> Self {
        Self {
            expand_canvas: true,
            fill: FillValue::BLACK,
            emit_region: false,
        }
    }
}

impl RotateOptions {
    /// Keep the source canvas size; corners that rotate out of frame are lost.
    pub fn clipped() -> Self {
        Self {
            expand_canvas: false,
            ..Default::default()
        }
    }

    /// Set whether the canvas grows to fit.
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand_canvas = expand;
        self
    }

    /// Set the background fill.
    pub fn fill(mut self, fill: FillValue) -> Self {
        self.fill = fill;
        self
    }

    /// Set whether the covered region is reported.
    pub fn emit_region(mut self, emit: bool) -> Self {
        self.emit_region = emit;
        self
    }
}

/// Region of the output covered by rotated source content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRegion {
    /// Axis-aligned region (no rotation or quarter turns)
    Rect(Rect),
    /// Rotated source rectangle, corners in canvas coordinates
    Polygon(Vec<(i32, i32)>),
}

impl ContentRegion {
    /// Whether the center of pixel `(x, y)` lies inside the region.
    ///
    /// Polygons use the even-odd rule.
    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        match self {
            ContentRegion::Rect(r) => r.contains_point(x, y),
            ContentRegion::Polygon(points) => {
                polygon_contains(points, x as f64 + 0.5, y as f64 + 0.5)
            }
        }
    }

    /// Smallest rectangle enclosing the region.
    pub fn bounds(&self) -> Rect {
        match self {
            ContentRegion::Rect(r) => *r,
            ContentRegion::Polygon(points) => {
                let (mut x0, mut y0) = (i32::MAX, i32::MAX);
                let (mut x1, mut y1) = (i32::MIN, i32::MIN);
                for &(x, y) in points {
                    x0 = x0.min(x);
                    y0 = y0.min(y);
                    x1 = x1.max(x);
                    y1 = y1.max(y);
                }
                if x0 > x1 {
                    return Rect::default();
                }
                Rect::new_unchecked(x0, y0, x1 - x0, y1 - y0)
            }
        }
    }
}

fn polygon_contains(points: &[(i32, i32)], px: f64, py: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (points[i].0 as f64, points[i].1 as f64);
        let (xj, yj) = (points[j].0 as f64, points[j].1 as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Result of [`rotate`]
#[derive(Debug, Clone)]
pub struct RotateOutput {
    /// The rotated raster
    pub raster: Raster,
    /// Covered region, present when [`RotateOptions::emit_region`] is set
    pub region: Option<ContentRegion>,
}

/// Rotate every plane of a raster by `degrees` (clockwise positive).
///
/// - `0` and whole turns return an unmodified copy.
/// - Other multiples of 90 permute samples exactly; odd quarter-turn counts
///   swap width and height.
/// - Any other angle resamples bilinearly. With
///   [`RotateOptions::expand_canvas`] the output is the bounding box of the
///   rotated source, otherwise it keeps the source size. Pixels whose
///   center lies outside the rotated source rectangle are set to
///   [`RotateOptions::fill`].
///
/// Plane counts, sample type and calibration are preserved.
///
/// # Errors
///
/// - [`TransformError::InvalidParameters`] if `degrees` is not finite
/// - [`TransformError::Cancelled`] if `progress` requests it
///
/// # Examples
///
/// ```
/// use tessera_core::{Dimensions, NoProgress, Raster, SampleType};
/// use tessera_transform::{RotateOptions, rotate};
///
/// let src = Raster::new(40, 10, SampleType::Gray8, Dimensions::SINGLE).unwrap();
/// let out = rotate(&src, 90.0, &RotateOptions::default(), &NoProgress).unwrap();
/// assert_eq!((out.raster.width(), out.raster.height()), (10, 40));
/// ```
pub fn rotate(
    src: &Raster,
    degrees: f64,
    options: &RotateOptions,
    progress: &dyn Progress,
) -> TransformResult<RotateOutput> {
    if !degrees.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "rotation angle must be finite, got {}",
            degrees
        )));
    }

    let (w, h) = (src.width(), src.height());
    if degrees % 90.0 == 0.0 {
        let turns = ((degrees / 90.0) % 4.0) as i64;
        let turns = turns.rem_euclid(4);
        tracing::debug!(degrees, turns, "rotate by quarter turns");
        let raster = match turns {
            0 => src.clone(),
            1 => map_planes(src, "rotate", progress, |p| Ok(p.rotate_right()))?,
            2 => map_planes(src, "rotate", progress, |p| {
                Ok(p.rotate_right().rotate_right())
            })?,
            _ => map_planes(src, "rotate", progress, |p| Ok(p.rotate_left()))?,
        };
        let region = options
            .emit_region
            .then(|| ContentRegion::Rect(Rect::full(raster.width(), raster.height())));
        return Ok(RotateOutput { raster, region });
    }

    let geometry = Geometry::new(w, h, degrees, options.expand_canvas)?;
    tracing::debug!(
        degrees,
        width = w,
        height = h,
        out_width = geometry.width,
        out_height = geometry.height,
        expand = options.expand_canvas,
        "rotate"
    );

    let raster = map_planes(src, "rotate", progress, |plane| {
        rotate_plane(plane, &geometry, &options.fill)
    })?;
    let region = options
        .emit_region
        .then(|| ContentRegion::Polygon(geometry.polygon.clone()));
    Ok(RotateOutput { raster, region })
}

/// Output canvas and inverse mapping for an arbitrary angle.
struct Geometry {
    width: u32,
    height: u32,
    sin: f64,
    cos: f64,
    /// Source center in source coordinates
    src_center: (f64, f64),
    /// Source center in canvas coordinates
    dst_center: (f64, f64),
    /// Rotated source rectangle in canvas coordinates
    polygon: Vec<(i32, i32)>,
    region: ContentRegion,
}

impl Geometry {
    fn new(w: u32, h: u32, degrees: f64, expand: bool) -> TransformResult<Self> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);

        // Corners in edge coordinates, rotated about the center
        let corners = [(0.0, 0.0), (w as f64, 0.0), (w as f64, h as f64), (0.0, h as f64)]
            .map(|(x, y)| {
                let (dx, dy) = (x - cx, y - cy);
                (dx * cos - dy * sin + cx, dx * sin + dy * cos + cy)
            });

        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
        let (bx, by) = (min_x.floor(), min_y.floor());
        let (bw, bh) = (max_x.ceil() - bx, max_y.ceil() - by);
        if bw > i32::MAX as f64 || bh > i32::MAX as f64 {
            return Err(TransformError::InvalidParameters(format!(
                "rotated size {}x{} is too large",
                bw, bh
            )));
        }

        let (shift_x, shift_y) = if expand {
            (bx as i32, by as i32)
        } else {
            (0, 0)
        };
        let polygon: Vec<(i32, i32)> = corners
            .iter()
            .map(|&(x, y)| (x.floor() as i32 - shift_x, y.floor() as i32 - shift_y))
            .collect();

        let (width, height) = if expand {
            (bw as u32, bh as u32)
        } else {
            (w, h)
        };

        Ok(Self {
            width,
            height,
            sin,
            cos,
            src_center: (cx, cy),
            dst_center: (cx - shift_x as f64, cy - shift_y as f64),
            region: ContentRegion::Polygon(polygon.clone()),
            polygon,
        })
    }

    /// Source sample position (pixel index space) of output pixel `(x, y)`.
    #[inline]
    fn source_position(&self, x: u32, y: u32) -> (f64, f64) {
        let x_rel = x as f64 + 0.5 - self.dst_center.0;
        let y_rel = y as f64 + 0.5 - self.dst_center.1;
        let sx = x_rel * self.cos + y_rel * self.sin + self.src_center.0;
        let sy = -x_rel * self.sin + y_rel * self.cos + self.src_center.1;
        (sx - 0.5, sy - 0.5)
    }
}

fn rotate_plane(plane: &Plane, geometry: &Geometry, fill: &FillValue) -> TransformResult<Plane> {
    let mut out = Plane::new(geometry.width, geometry.height, plane.sample_type())?;
    out.fill(fill);

    let max_x = plane.width() as f64 - 0.5;
    let max_y = plane.height() as f64 - 0.5;
    for y in 0..geometry.height {
        for x in 0..geometry.width {
            if !geometry.region.contains_pixel(x as i32, y as i32) {
                continue;
            }
            let (sx, sy) = geometry.source_position(x, y);
            if sx < -0.5 || sy < -0.5 || sx > max_x || sy > max_y {
                continue;
            }
            let taps = Taps::new(plane, sx, sy);
            match plane.data() {
                PlaneData::Rgb(v) => {
                    let (r, g, b) = taps.rgb(v, plane.width());
                    out.set_rgb(x, y, r, g, b)?;
                }
                _ => out.set_value_unchecked(x, y, taps.gray(plane)),
            }
        }
    }
    Ok(out)
}

/// The four neighbours of a fractional position, clamped to the plane.
struct Taps {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    fx: f32,
    fy: f32,
}

impl Taps {
    fn new(plane: &Plane, sx: f64, sy: f64) -> Self {
        let max_x = plane.width() as i64 - 1;
        let max_y = plane.height() as i64 - 1;
        let fx0 = sx.floor();
        let fy0 = sy.floor();
        let (x0, y0) = (fx0 as i64, fy0 as i64);
        Self {
            x0: x0.clamp(0, max_x) as u32,
            y0: y0.clamp(0, max_y) as u32,
            x1: (x0 + 1).clamp(0, max_x) as u32,
            y1: (y0 + 1).clamp(0, max_y) as u32,
            fx: (sx - fx0) as f32,
            fy: (sy - fy0) as f32,
        }
    }

    fn gray(&self, plane: &Plane) -> f32 {
        interpolate(
            plane.get_value_unchecked(self.x0, self.y0),
            plane.get_value_unchecked(self.x1, self.y0),
            plane.get_value_unchecked(self.x0, self.y1),
            plane.get_value_unchecked(self.x1, self.y1),
            self.fx,
            self.fy,
        )
    }

    fn rgb(&self, data: &[u32], width: u32) -> (u8, u8, u8) {
        let at = |x: u32, y: u32| color::extract_rgb(data[(y * width + x) as usize]);
        let p00 = at(self.x0, self.y0);
        let p10 = at(self.x1, self.y0);
        let p01 = at(self.x0, self.y1);
        let p11 = at(self.x1, self.y1);
        let channel = |c: fn((u8, u8, u8)) -> u8| {
            let v = interpolate(
                c(p00) as f32,
                c(p10) as f32,
                c(p01) as f32,
                c(p11) as f32,
                self.fx,
                self.fy,
            );
            v.round().clamp(0.0, 255.0) as u8
        };
        (channel(|p| p.0), channel(|p| p.1), channel(|p| p.2))
    }
}

#[inline]
fn interpolate(p00: f32, p10: f32, p01: f32, p11: f32, fx: f32, fy: f32) -> f32 {
    let top = p00 * (1.0 - fx) + p10 * fx;
    let bottom = p01 * (1.0 - fx) + p11 * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Calibration, Dimensions, NoProgress, ProgressInfo, SampleType};

    // 0 1 2
    // 3 4 5
    fn small() -> Raster {
        let data = (0..6u8).collect();
        Raster::from_plane(Plane::from_data(3, 2, PlaneData::Gray8(data)).unwrap())
    }

    fn constant(w: u32, h: u32, value: f32) -> Raster {
        let mut r = Raster::new(w, h, SampleType::Gray8, Dimensions::SINGLE)
            .unwrap()
            .into_mut();
        r.fill(&FillValue::gray(value));
        r.into()
    }

    fn rot(src: &Raster, degrees: f64) -> Raster {
        rotate(src, degrees, &RotateOptions::default(), &NoProgress)
            .unwrap()
            .raster
    }

    #[test]
    fn test_zero_is_copy() {
        let src = small();
        let out = rotate(
            &src,
            0.0,
            &RotateOptions::default().emit_region(true),
            &NoProgress,
        )
        .unwrap();
        assert!(out.raster.equals(&src));
        assert_eq!(out.region, Some(ContentRegion::Rect(Rect::full(3, 2))));
    }

    #[test]
    fn test_quarter_turn() {
        let out = rot(&small(), 90.0);
        assert_eq!((out.width(), out.height()), (2, 3));
        let p = &out.planes()[0];
        // Clockwise: left column becomes the top row
        assert_eq!(p.get_value(0, 0), Some(3.0));
        assert_eq!(p.get_value(1, 0), Some(0.0));
        assert_eq!(p.get_value(1, 2), Some(2.0));
    }

    #[test]
    fn test_four_quarter_turns_identity() {
        let src = small();
        let mut r = src.clone();
        for _ in 0..4 {
            r = rot(&r, 90.0);
        }
        assert!(r.equals(&src));
        assert!(rot(&src, 360.0).equals(&src));
        assert!(rot(&src, -720.0).equals(&src));
    }

    #[test]
    fn test_negative_quarter_turns() {
        let src = small();
        assert!(rot(&src, -90.0).equals(&rot(&src, 270.0)));
        assert!(rot(&src, 180.0).equals(&rot(&src, -180.0)));
        assert!(rot(&src, 450.0).equals(&rot(&src, 90.0)));
    }

    #[test]
    fn test_non_finite_rejected() {
        for degrees in [f64::NAN, f64::INFINITY] {
            let err = rotate(&small(), degrees, &RotateOptions::default(), &NoProgress)
                .unwrap_err();
            assert!(matches!(err, TransformError::InvalidParameters(_)));
        }
    }

    #[test]
    fn test_expand_canvas_size() {
        let src = constant(10, 10, 100.0);
        // Corners at 5 +- 7.07 -> floor -3, ceil 13
        assert_eq!((rot(&src, 45.0).width(), rot(&src, 45.0).height()), (16, 16));
        let clipped = rotate(&src, 45.0, &RotateOptions::clipped(), &NoProgress)
            .unwrap()
            .raster;
        assert_eq!((clipped.width(), clipped.height()), (10, 10));
    }

    #[test]
    fn test_fill_outside_rotated_rect() {
        let src = constant(10, 10, 100.0);
        let options = RotateOptions::default().fill(FillValue::gray(200.0));
        let out = rotate(&src, 45.0, &options, &NoProgress).unwrap().raster;
        let p = &out.planes()[0];
        assert_eq!(p.get_value(0, 0), Some(200.0));
        assert_eq!(p.get_value(15, 15), Some(200.0));
        assert_eq!(p.get_value(8, 8), Some(100.0));
        assert_eq!(p.get_value(7, 7), Some(100.0));
    }

    #[test]
    fn test_region_polygon() {
        let src = constant(10, 10, 1.0);
        let options = RotateOptions::default().emit_region(true);
        let out = rotate(&src, 45.0, &options, &NoProgress).unwrap();
        let region = out.region.unwrap();
        let ContentRegion::Polygon(points) = &region else {
            panic!("expected polygon, got {:?}", region);
        };
        assert_eq!(points.len(), 4);
        assert!(region.contains_pixel(8, 8));
        assert!(!region.contains_pixel(0, 0));
        let bounds = region.bounds();
        assert!(bounds.w >= 13 && bounds.w <= 16);
    }

    #[test]
    fn test_region_corners_floored() {
        let src = constant(40, 20, 1.0);
        let options = RotateOptions::clipped().emit_region(true);
        let out = rotate(&src, 30.0, &options, &NoProgress).unwrap();
        // Exact corners (7.68, -8.66) (42.32, 11.34) (32.32, 28.66) (-2.32, 8.66)
        assert_eq!(
            out.region,
            Some(ContentRegion::Polygon(vec![(7, -9), (42, 11), (32, 28), (-3, 8)]))
        );
    }

    #[test]
    fn test_thin_raster_keeps_content() {
        // The bounding box is narrower than the source at 60 degrees
        let src = constant(100, 2, 50.0);
        let out = rot(&src, 60.0);
        assert!(out.width() < 100);
        let center = out.planes()[0]
            .get_value(out.width() / 2, out.height() / 2)
            .unwrap();
        assert_eq!(center, 50.0);
    }

    #[test]
    fn test_rgb_interpolation() {
        let mut r = Raster::new(8, 8, SampleType::Rgb, Dimensions::SINGLE)
            .unwrap()
            .into_mut();
        r.fill(&FillValue::rgb(10, 20, 30));
        let src: Raster = r.into();
        let out = rot(&src, 30.0);
        let p = &out.planes()[0];
        assert_eq!(
            p.get_rgb(out.width() / 2, out.height() / 2),
            Some((10, 20, 30))
        );
        assert_eq!(p.get_rgb(0, 0), Some((0, 0, 0)));
    }

    #[test]
    fn test_calibration_and_planes_preserved() {
        let dims = Dimensions::new(2, 3, 1).unwrap();
        let mut r = Raster::new(6, 4, SampleType::Gray16, dims)
            .unwrap()
            .into_mut();
        r.set_calibration(Some(Calibration::isotropic(0.5, "um")));
        let src: Raster = r.into();
        for degrees in [90.0, 33.0] {
            let out = rot(&src, degrees);
            assert_eq!(out.dimensions(), dims);
            assert_eq!(out.sample_type(), SampleType::Gray16);
            assert_eq!(out.calibration(), src.calibration());
        }
    }

    #[test]
    fn test_cancelled() {
        let progress = ProgressInfo::new("rotate");
        progress.cancel();
        for degrees in [90.0, 12.5] {
            let err = rotate(&small(), degrees, &RotateOptions::default(), &progress)
                .unwrap_err();
            assert!(matches!(err, TransformError::Cancelled));
        }
    }
}
