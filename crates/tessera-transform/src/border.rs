//! Border synthesis
//!
//! Grows a raster by independent left/top/right/bottom margins and fills the
//! new pixels according to a [`BoundaryPolicy`].

use tessera_core::{FillValue, Plane, Progress, Raster};

use crate::planes::map_planes;
use crate::{BoundaryPolicy, TransformError, TransformResult};

/// Border widths on each side, in pixels.
///
/// Fields are signed so that negative values can be reported instead of
/// wrapping; every transform rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    /// Create margins from the four sides.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same margin on every side.
    pub const fn uniform(size: i32) -> Self {
        Self::new(size, size, size, size)
    }

    /// Whether every side is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> TransformResult<()> {
        if self.left < 0 || self.top < 0 || self.right < 0 || self.bottom < 0 {
            return Err(TransformError::InvalidParameters(format!(
                "margins must be non-negative: left={}, top={}, right={}, bottom={}",
                self.left, self.top, self.right, self.bottom
            )));
        }
        Ok(())
    }

    /// Size of a `width x height` raster after adding these margins.
    fn grown(&self, width: u32, height: u32) -> TransformResult<(u32, u32)> {
        let w = (width as u64) + (self.left as u64) + (self.right as u64);
        let h = (height as u64) + (self.top as u64) + (self.bottom as u64);
        if w > i32::MAX as u64 || h > i32::MAX as u64 {
            return Err(TransformError::InvalidParameters(format!(
                "bordered size {}x{} is too large",
                w, h
            )));
        }
        Ok((w as u32, h as u32))
    }
}

/// Add a border around every plane of a raster.
///
/// The output is `(w + left + right) x (h + top + bottom)` with the same
/// plane counts, sample type and calibration. The source lands at
/// `(left, top)`. With [`BoundaryPolicy::Constant`] the border is `fill`;
/// with any other policy each border pixel copies the already written
/// output pixel that the policy resolves it to, per axis, inside the
/// pasted rectangle.
///
/// # Arguments
///
/// * `src` - Input raster
/// * `margins` - Border widths, all `>= 0`
/// * `policy` - How border pixels are synthesized
/// * `fill` - Border value for [`BoundaryPolicy::Constant`]
/// * `progress` - Polled once per plane
///
/// # Errors
///
/// - [`TransformError::InvalidParameters`] for negative margins, before
///   anything is allocated
/// - [`TransformError::Cancelled`] if `progress` requests it
///
/// # Examples
///
/// ```
/// use tessera_core::{Dimensions, FillValue, NoProgress, Raster, SampleType};
/// use tessera_transform::{BoundaryPolicy, Margins, add_border};
///
/// let src = Raster::new(100, 80, SampleType::Gray8, Dimensions::SINGLE).unwrap();
/// let out = add_border(
///     &src,
///     Margins::new(10, 5, 10, 5),
///     BoundaryPolicy::Mirror,
///     &FillValue::BLACK,
///     &NoProgress,
/// )
/// .unwrap();
/// assert_eq!((out.width(), out.height()), (120, 90));
/// ```
pub fn add_border(
    src: &Raster,
    margins: Margins,
    policy: BoundaryPolicy,
    fill: &FillValue,
    progress: &dyn Progress,
) -> TransformResult<Raster> {
    margins.validate()?;
    let (new_w, new_h) = margins.grown(src.width(), src.height())?;

    tracing::debug!(
        width = src.width(),
        height = src.height(),
        planes = src.plane_count(),
        ?margins,
        %policy,
        "add_border"
    );

    map_planes(src, "add_border", progress, |plane| {
        border_plane(plane, new_w, new_h, margins, policy, fill)
    })
}

fn border_plane(
    plane: &Plane,
    new_w: u32,
    new_h: u32,
    margins: Margins,
    policy: BoundaryPolicy,
    fill: &FillValue,
) -> TransformResult<Plane> {
    if margins.is_zero() {
        return Ok(plane.clone());
    }

    let mut out = Plane::new(new_w, new_h, plane.sample_type())?;
    if policy == BoundaryPolicy::Constant {
        out.fill(fill);
    }
    out.insert(plane, margins.left, margins.top)?;
    if policy == BoundaryPolicy::Constant {
        return Ok(out);
    }

    let (x0, x1) = (margins.left, margins.left + plane.width() as i32);
    let (y0, y1) = (margins.top, margins.top + plane.height() as i32);
    for y in 0..new_h as i32 {
        let Some(sy) = policy.resolve(y, y0, y1) else {
            continue;
        };
        let row_inside = y >= y0 && y < y1;
        for x in 0..new_w as i32 {
            if row_inside && x >= x0 && x < x1 {
                continue;
            }
            let Some(sx) = policy.resolve(x, x0, x1) else {
                continue;
            };
            out.copy_pixel(sx as u32, sy as u32, x as u32, y as u32);
        }
    }
    Ok(out)
}
