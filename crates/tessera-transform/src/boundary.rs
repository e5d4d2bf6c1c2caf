//! Boundary policies
//!
//! A boundary policy maps a coordinate that falls outside a valid range
//! `[min, max_exclusive)` back into the range. It is evaluated per axis.
//!
//! ```text
//! range:     [a b c d]
//! Repeat:  a a [a b c d] d d
//! Mirror:  b a [a b c d] d c
//! Tile:    c d [a b c d] a b
//! ```

use std::fmt;
use std::str::FromStr;

use crate::TransformError;

/// How pixels beyond the edge of a raster are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryPolicy {
    /// Out-of-range pixels take a fixed fill value
    #[default]
    Constant,
    /// Nearest edge pixel is replicated
    Repeat,
    /// Reflection about the edge, edge pixel duplicated
    Mirror,
    /// Periodic wrap-around
    Tile,
}

impl BoundaryPolicy {
    /// All policies, in declaration order.
    pub const ALL: [BoundaryPolicy; 4] = [
        BoundaryPolicy::Constant,
        BoundaryPolicy::Repeat,
        BoundaryPolicy::Mirror,
        BoundaryPolicy::Tile,
    ];

    /// Map `coordinate` into `[min, max_exclusive)`.
    ///
    /// Returns `None` for [`BoundaryPolicy::Constant`] and for an empty
    /// range. Coordinates already in range are returned unchanged. Every
    /// other case is answered in constant time, however far the coordinate
    /// lies outside the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_transform::BoundaryPolicy;
    ///
    /// assert_eq!(BoundaryPolicy::Mirror.resolve(-1, 0, 4), Some(0));
    /// assert_eq!(BoundaryPolicy::Tile.resolve(-1, 0, 4), Some(3));
    /// assert_eq!(BoundaryPolicy::Repeat.resolve(9, 0, 4), Some(3));
    /// assert_eq!(BoundaryPolicy::Constant.resolve(9, 0, 4), None);
    /// ```
    pub fn resolve(self, coordinate: i32, min: i32, max_exclusive: i32) -> Option<i32> {
        if max_exclusive <= min || self == BoundaryPolicy::Constant {
            return None;
        }
        if coordinate >= min && coordinate < max_exclusive {
            return Some(coordinate);
        }

        // i64 keeps 2 * width and far-away coordinates from overflowing
        let c = coordinate as i64 - min as i64;
        let n = max_exclusive as i64 - min as i64;
        let offset = match self {
            BoundaryPolicy::Repeat => c.clamp(0, n - 1),
            BoundaryPolicy::Tile => c.rem_euclid(n),
            BoundaryPolicy::Mirror => {
                let r = c.rem_euclid(2 * n);
                if r < n { r } else { 2 * n - 1 - r }
            }
            BoundaryPolicy::Constant => return None,
        };
        Some((min as i64 + offset) as i32)
    }

    /// Canonical name of the policy.
    pub fn name(self) -> &'static str {
        match self {
            BoundaryPolicy::Constant => "Constant",
            BoundaryPolicy::Repeat => "Repeat",
            BoundaryPolicy::Mirror => "Mirror",
            BoundaryPolicy::Tile => "Tile",
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryPolicy {
    type Err = TransformError;

    /// Parse a policy name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoundaryPolicy::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransformError::UnsupportedPolicy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: [BoundaryPolicy; 3] = [
        BoundaryPolicy::Repeat,
        BoundaryPolicy::Mirror,
        BoundaryPolicy::Tile,
    ];

    #[test]
    fn test_resolve_stays_in_range() {
        for policy in POLICIES {
            for (min, max) in [(0, 1), (0, 4), (3, 10), (-5, 2)] {
                let n = max - min;
                for c in (min - 3 * n)..(max + 3 * n) {
                    let r = policy.resolve(c, min, max).unwrap();
                    assert!(
                        r >= min && r < max,
                        "{} resolved {} to {} outside [{}, {})",
                        policy,
                        c,
                        r,
                        min,
                        max
                    );
                }
            }
        }
    }

    #[test]
    fn test_resolve_identity_in_range() {
        for policy in POLICIES {
            for c in 2..9 {
                assert_eq!(policy.resolve(c, 2, 9), Some(c));
            }
        }
    }

    #[test]
    fn test_resolve_idempotent() {
        for policy in POLICIES {
            for c in -20..20 {
                let once = policy.resolve(c, 0, 5).unwrap();
                assert_eq!(policy.resolve(once, 0, 5), Some(once));
            }
        }
    }

    #[test]
    fn test_tile_periodic() {
        for c in -12..12 {
            assert_eq!(
                BoundaryPolicy::Tile.resolve(c, 1, 5),
                BoundaryPolicy::Tile.resolve(c + 4, 1, 5)
            );
        }
    }

    #[test]
    fn test_mirror_symmetric() {
        // Reflection about the lower edge: min - 1 - k <-> min + k
        for k in 0..4 {
            assert_eq!(BoundaryPolicy::Mirror.resolve(-1 - k, 0, 4), Some(k));
        }
        // And about the upper edge: max + k <-> max - 1 - k
        for k in 0..4 {
            assert_eq!(BoundaryPolicy::Mirror.resolve(4 + k, 0, 4), Some(3 - k));
        }
        // Period 2n
        for c in -16..16 {
            assert_eq!(
                BoundaryPolicy::Mirror.resolve(c, 0, 4),
                BoundaryPolicy::Mirror.resolve(c + 8, 0, 4)
            );
        }
    }

    #[test]
    fn test_repeat_clamps() {
        assert_eq!(BoundaryPolicy::Repeat.resolve(-100, 0, 4), Some(0));
        assert_eq!(BoundaryPolicy::Repeat.resolve(100, 0, 4), Some(3));
    }

    #[test]
    fn test_far_coordinates() {
        assert_eq!(BoundaryPolicy::Tile.resolve(i32::MIN, 0, 3), Some(1));
        let m = BoundaryPolicy::Mirror.resolve(i32::MAX, 0, 7).unwrap();
        assert!((0..7).contains(&m));
    }

    #[test]
    fn test_constant_and_empty() {
        assert_eq!(BoundaryPolicy::Constant.resolve(2, 0, 4), None);
        for policy in POLICIES {
            assert_eq!(policy.resolve(0, 3, 3), None);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("mirror".parse::<BoundaryPolicy>().unwrap(), BoundaryPolicy::Mirror);
        assert_eq!("TILE".parse::<BoundaryPolicy>().unwrap(), BoundaryPolicy::Tile);
        assert!(matches!(
            "wrap".parse::<BoundaryPolicy>(),
            Err(TransformError::UnsupportedPolicy(_))
        ));
        for p in BoundaryPolicy::ALL {
            assert_eq!(p.to_string().parse::<BoundaryPolicy>().unwrap(), p);
        }
    }
}
