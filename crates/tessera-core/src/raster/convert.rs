//! Sample-type coercion
//!
//! Promotions copy values. Demotions either clamp or, when scaling is
//! requested, map the raster-wide `[min, max]` onto the target range.
//! RGB participates through its unweighted grey mean on the way down and
//! through an 8-bit grey triple on the way up.

use super::plane::clamp_round;
use super::{Plane, Raster, SampleType};
use crate::error::Result;

/// Pick the sample type able to hold every input.
///
/// Any `Rgb` input wins; otherwise the widest grey type is chosen.
/// Returns `None` for an empty input.
pub fn consensus_sample_type<I>(types: I) -> Option<SampleType>
where
    I: IntoIterator<Item = SampleType>,
{
    let mut result: Option<SampleType> = None;
    for st in types {
        result = Some(match result {
            None => st,
            Some(SampleType::Rgb) => SampleType::Rgb,
            Some(_) if st == SampleType::Rgb => SampleType::Rgb,
            Some(cur) if st.bit_depth() > cur.bit_depth() => st,
            Some(cur) => cur,
        });
    }
    result
}

/// Value range used by a scaled demotion.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f32,
    max: f32,
}

impl Range {
    /// Map a value into the 8-bit range.
    ///
    /// 16-bit sources use the `256 / (max - min + 1)` bin width, float
    /// sources the `255 / (max - min)` scale with rounding.
    fn to_u8(self, v: f32, from: SampleType) -> f32 {
        let scaled = match from {
            SampleType::Gray32 => {
                let span = self.max - self.min;
                if span > 0.0 {
                    ((v - self.min) * 255.0 / span + 0.5).floor()
                } else {
                    0.0
                }
            }
            _ => ((v - self.min) * 256.0 / (self.max - self.min + 1.0)).floor(),
        };
        scaled.clamp(0.0, 255.0)
    }

    fn to_u16(self, v: f32) -> f32 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((v - self.min) * 65535.0 / span + 0.5).floor().clamp(0.0, 65535.0)
        } else {
            0.0
        }
    }
}

impl Raster {
    /// Convert every plane to `target`.
    ///
    /// With `scale`, demotions stretch the raster-wide value range onto the
    /// target range; without it values are clamped. Converting to the
    /// current sample type returns a shared copy.
    pub fn convert_to(&self, target: SampleType, scale: bool) -> Result<Raster> {
        let from = self.sample_type();
        if from == target {
            return Ok(self.clone());
        }

        let range = if scale { Some(self.value_range()) } else { None };
        let planes = self
            .planes()
            .iter()
            .map(|p| convert_plane(p, target, range))
            .collect::<Result<Vec<_>>>()?;

        let mut out = Raster::from_planes(self.dimensions(), planes)?.into_mut();
        out.copy_calibration_from(self);
        Ok(out.into())
    }

    /// Minimum and maximum grey value across all planes.
    pub fn value_range(&self) -> (f32, f32) {
        let r = self.planes().iter().map(Plane::min_max).fold(
            Range {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |acc, (lo, hi)| Range {
                min: acc.min.min(lo),
                max: acc.max.max(hi),
            },
        );
        (r.min, r.max)
    }
}

fn convert_plane(src: &Plane, target: SampleType, range: Option<(f32, f32)>) -> Result<Plane> {
    let from = src.sample_type();
    let range = range.map(|(min, max)| Range { min, max });
    let mut out = Plane::new(src.width(), src.height(), target)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            let v = src.get_value_unchecked(x, y);
            match target {
                SampleType::Rgb => {
                    let g = clamp_round(gray_to_u8(v, from, range), 255.0) as u8;
                    out.set_rgb(x, y, g, g, g)?;
                }
                SampleType::Gray8 => {
                    let g = if from == SampleType::Rgb {
                        v
                    } else {
                        gray_to_u8(v, from, range)
                    };
                    out.set_value_unchecked(x, y, g);
                }
                SampleType::Gray16 => {
                    let g = match (from, range) {
                        (SampleType::Gray32, Some(r)) => r.to_u16(v),
                        _ => v,
                    };
                    out.set_value_unchecked(x, y, g);
                }
                SampleType::Gray32 => out.set_value_unchecked(x, y, v),
            }
        }
    }
    Ok(out)
}

fn gray_to_u8(v: f32, from: SampleType, range: Option<Range>) -> f32 {
    match (from, range) {
        (SampleType::Gray8 | SampleType::Rgb, _) | (_, None) => v,
        (_, Some(r)) => r.to_u8(v, from),
    }
}
