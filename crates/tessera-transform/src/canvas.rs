//! Anchor-relative canvas resizing

use tessera_core::{FillValue, Progress, Raster, Rect};

use crate::border::add_border;
use crate::{Anchor, BoundaryPolicy, Margins, TransformError, TransformResult};

/// Enlarge the canvas to `new_width x new_height`, placing the source by
/// `anchor` and filling the rest with `fill`.
///
/// Equivalent to [`add_border`] with [`BoundaryPolicy::Constant`], the
/// left/top margins taken from the anchor offsets and the right/bottom
/// margins covering the remainder.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if either new dimension is
/// smaller than the source.
pub fn expand_canvas(
    src: &Raster,
    new_width: u32,
    new_height: u32,
    anchor: Anchor,
    fill: &FillValue,
    progress: &dyn Progress,
) -> TransformResult<Raster> {
    if new_width < src.width() || new_height < src.height() {
        return Err(TransformError::InvalidParameters(format!(
            "cannot expand {}x{} canvas to {}x{}",
            src.width(),
            src.height(),
            new_width,
            new_height
        )));
    }
    let margins = anchored_margins(src, new_width, new_height, anchor)?;
    tracing::debug!(new_width, new_height, %anchor, "expand_canvas");
    add_border(src, margins, BoundaryPolicy::Constant, fill, progress)
}

/// Shrink the canvas to `new_width x new_height`, keeping the part of the
/// source selected by `anchor`.
///
/// This is the inverse of [`expand_canvas`] with the same anchor.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if either new dimension is
/// zero or larger than the source.
pub fn crop_canvas(
    src: &Raster,
    new_width: u32,
    new_height: u32,
    anchor: Anchor,
) -> TransformResult<Raster> {
    if new_width == 0
        || new_height == 0
        || new_width > src.width()
        || new_height > src.height()
    {
        return Err(TransformError::InvalidParameters(format!(
            "cannot crop {}x{} canvas to {}x{}",
            src.width(),
            src.height(),
            new_width,
            new_height
        )));
    }
    let (x, y) = anchor.offsets(
        new_width as i32,
        new_height as i32,
        src.width() as i32,
        src.height() as i32,
    );
    tracing::debug!(new_width, new_height, %anchor, x, y, "crop_canvas");
    Ok(src.crop(&Rect::new(x, y, new_width as i32, new_height as i32)?)?)
}

fn anchored_margins(
    src: &Raster,
    new_width: u32,
    new_height: u32,
    anchor: Anchor,
) -> TransformResult<Margins> {
    let (old_w, old_h) = (src.width() as i32, src.height() as i32);
    let new_w = i32::try_from(new_width)
        .map_err(|_| TransformError::InvalidParameters(format!("width {} too large", new_width)))?;
    let new_h = i32::try_from(new_height).map_err(|_| {
        TransformError::InvalidParameters(format!("height {} too large", new_height))
    })?;
    let (left, top) = anchor.offsets(old_w, old_h, new_w, new_h);
    Ok(Margins::new(
        left,
        top,
        new_w - old_w - left,
        new_h - old_h - top,
    ))
}
