//! Rect - integer rectangle regions
//!
//! Used as crop/paste targets and as tile footprints.

use crate::error::{Error, Result};

/// A rectangle region
///
/// A small `Copy` type; coordinates may be negative (paste targets partially
/// outside a canvas), sizes may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "rect dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a rectangle without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering a whole `width x height` raster
    pub fn full(width: u32, height: u32) -> Self {
        Self::new_unchecked(0, 0, width as i32, height as i32)
    }

    /// Get the right x coordinate (exclusive), saturating at `i32::MAX`
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Get the bottom y coordinate (exclusive), saturating at `i32::MAX`
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Check if the rectangle is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle contains another one
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Shrink the rectangle by `dx` on the left and right and `dy` on the
    /// top and bottom.
    ///
    /// Returns `None` if nothing would remain.
    pub fn inset(&self, dx: i32, dy: i32) -> Option<Rect> {
        let w = self.w as i64 - 2 * dx as i64;
        let h = self.h as i64 - 2 * dy as i64;
        if w <= 0 || h <= 0 {
            return None;
        }
        Some(Rect {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            w: w as i32,
            h: h as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_new_rejects_negative() {
        assert!(Rect::new(0, 0, -1, 4).is_err());
        assert!(Rect::new(-3, -3, 2, 2).is_ok());
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new_unchecked(0, 0, 10, 10);
        let b = Rect::new_unchecked(5, -5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new_unchecked(5, 0, 5, 5)));

        let c = Rect::new_unchecked(10, 0, 3, 3);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_inset() {
        let r = Rect::new_unchecked(0, 0, 20, 10);
        assert_eq!(r.inset(2, 1), Some(Rect::new_unchecked(2, 1, 16, 8)));
        assert_eq!(r.inset(10, 0), None);
        assert_eq!(r.inset(i32::MAX, 0), None);
    }

    #[test]
    fn test_far_edge_saturates() {
        let far = Rect::new_unchecked(i32::MAX - 1, 0, 4, 4);
        assert_eq!(far.right(), i32::MAX);
        let canvas = Rect::full(10, 10);
        assert_eq!(canvas.intersect(&far), None);
        assert!(!far.contains_point(0, 0));
    }

    #[test]
    fn test_contains() {
        let r = Rect::full(4, 3);
        assert!(r.contains_point(3, 2));
        assert!(!r.contains_point(4, 0));
        assert!(r.contains_rect(&Rect::new_unchecked(1, 1, 3, 2)));
        assert!(!r.contains_rect(&Rect::new_unchecked(1, 1, 4, 2)));
    }
}
