//! Anchor-relative placement
//!
//! Computes where a `old_w x old_h` rectangle lands inside a
//! `new_w x new_h` canvas for one of nine anchors. The same offsets
//! apply when the canvas is smaller than the rectangle; they then come
//! out negative.

use std::fmt;
use std::str::FromStr;

use crate::TransformError;

/// Placement along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisAnchor {
    /// Left or top edge
    Start,
    /// Centered, rounding towards the start
    Center,
    /// Right or bottom edge
    End,
}

/// Offset of a range of `old_size` inside a range of `new_size`.
///
/// `Center` uses floor division, so an odd leftover puts the extra pixel
/// after the content.
#[inline]
pub fn compute_offset(old_size: i32, new_size: i32, anchor: AxisAnchor) -> i32 {
    match anchor {
        AxisAnchor::Start => 0,
        AxisAnchor::Center => (new_size - old_size).div_euclid(2),
        AxisAnchor::End => new_size - old_size,
    }
}

/// Reference point of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    CenterCenter,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// All anchors, row by row.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::CenterCenter,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Horizontal component.
    pub fn horizontal(self) -> AxisAnchor {
        match self {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => AxisAnchor::Start,
            Anchor::TopCenter | Anchor::CenterCenter | Anchor::BottomCenter => AxisAnchor::Center,
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => AxisAnchor::End,
        }
    }

    /// Vertical component.
    pub fn vertical(self) -> AxisAnchor {
        match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => AxisAnchor::Start,
            Anchor::CenterLeft | Anchor::CenterCenter | Anchor::CenterRight => AxisAnchor::Center,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => AxisAnchor::End,
        }
    }

    /// Top-left position of the old rectangle inside the new canvas.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_transform::Anchor;
    ///
    /// assert_eq!(Anchor::CenterCenter.offsets(10, 10, 15, 14), (2, 2));
    /// assert_eq!(Anchor::BottomRight.offsets(10, 10, 15, 14), (5, 4));
    /// ```
    pub fn offsets(self, old_w: i32, old_h: i32, new_w: i32, new_h: i32) -> (i32, i32) {
        (
            compute_offset(old_w, new_w, self.horizontal()),
            compute_offset(old_h, new_h, self.vertical()),
        )
    }

    /// Canonical name, e.g. `"TopLeft"`.
    pub fn name(self) -> &'static str {
        match self {
            Anchor::TopLeft => "TopLeft",
            Anchor::TopCenter => "TopCenter",
            Anchor::TopRight => "TopRight",
            Anchor::CenterLeft => "CenterLeft",
            Anchor::CenterCenter => "CenterCenter",
            Anchor::CenterRight => "CenterRight",
            Anchor::BottomLeft => "BottomLeft",
            Anchor::BottomCenter => "BottomCenter",
            Anchor::BottomRight => "BottomRight",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Anchor {
    type Err = TransformError;

    /// Parse an anchor name. Case, spaces, `-` and `_` are ignored, so
    /// `"top-left"` and `"TopLeft"` are the same anchor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        Anchor::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| TransformError::UnsupportedAnchor(s.to_string()))
    }
}
