//! Plane-map merging and plane-count adjustment

use std::collections::{BTreeMap, BTreeSet};

use super::{Plane, Raster, consensus_sample_type};
use crate::error::{Error, Result};
use crate::index::{Dimensions, PlaneIndex};

impl Raster {
    /// Combine planes keyed by possibly discontinuous indices into a raster.
    ///
    /// The distinct `z`, `c` and `t` values found in the map are re-numbered
    /// densely in sorted order, so `{(0,0,0), (4,0,0)}` becomes two slices.
    /// With `equalize`, planes are first converted (scaled) to the consensus
    /// sample type; otherwise mixed types are an error.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if the map is empty or does not cover
    ///   the full Z×C×T grid of its distinct indices
    /// - [`Error::DimensionMismatch`] if the planes differ in size
    /// - [`Error::SampleTypeMismatch`] if types differ and `equalize` is off
    pub fn from_plane_map(map: BTreeMap<PlaneIndex, Plane>, equalize: bool) -> Result<Raster> {
        let Some(first) = map.values().next() else {
            return Err(Error::InvalidParameter("no planes to combine".into()));
        };
        let (width, height) = (first.width(), first.height());
        for plane in map.values() {
            if plane.width() != width || plane.height() != height {
                return Err(Error::DimensionMismatch {
                    expected: (width, height),
                    actual: (plane.width(), plane.height()),
                });
            }
        }

        let zs = dense_positions(map.keys().map(|k| k.z));
        let cs = dense_positions(map.keys().map(|k| k.c));
        let ts = dense_positions(map.keys().map(|k| k.t));
        let dims = Dimensions::new(cs.len(), zs.len(), ts.len())?;
        if dims.plane_count() != map.len() {
            return Err(Error::InvalidParameter(format!(
                "{} planes do not fill a {}x{}x{} (z, c, t) grid",
                map.len(),
                dims.slices,
                dims.channels,
                dims.frames
            )));
        }

        let target = if equalize {
            consensus_sample_type(map.values().map(Plane::sample_type))
        } else {
            None
        };

        let mut slots: Vec<Option<Plane>> = vec![None; dims.plane_count()];
        for (index, plane) in map {
            let dense = PlaneIndex::new(zs[&index.z], cs[&index.c], ts[&index.t]);
            let plane = match target {
                Some(st) if st != plane.sample_type() => {
                    let converted = Raster::from_plane(plane).convert_to(st, true)?;
                    converted.planes()[0].clone()
                }
                _ => plane,
            };
            slots[dense.to_zero_based(&dims)?] = Some(plane);
        }

        // Every slot is filled: indices are distinct and the count matches
        let planes = slots.into_iter().flatten().collect();
        Raster::from_planes(dims, planes)
    }

    /// Resize the plane counts to `dims`.
    ///
    /// Existing planes keep their index. New planes either repeat the
    /// closest existing plane (`copy_planes`) or are zero-filled.
    /// Calibration is kept.
    pub fn ensure_dimensions(&self, dims: Dimensions, copy_planes: bool) -> Result<Raster> {
        if dims == self.dimensions() {
            return Ok(self.clone());
        }
        let old = self.dimensions();
        let blank = Plane::new(self.width(), self.height(), self.sample_type())?;
        let planes = dims
            .indices()
            .map(|index| {
                if old.contains(&index) || copy_planes {
                    self.closest_plane(index).clone()
                } else {
                    blank.clone()
                }
            })
            .collect();

        let mut out = Raster::from_planes(dims, planes)?.into_mut();
        out.copy_calibration_from(self);
        Ok(out.into())
    }
}

/// Map each distinct value to its rank.
fn dense_positions(values: impl Iterator<Item = usize>) -> BTreeMap<usize, usize> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(rank, v)| (v, rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleType;

    fn filled(value: f32, st: SampleType) -> Plane {
        let mut p = Plane::new(2, 2, st).unwrap();
        p.set_value(0, 0, value).unwrap();
        p
    }

    #[test]
    fn test_from_plane_map_discontinuous() {
        let mut map = BTreeMap::new();
        map.insert(PlaneIndex::new(3, 0, 0), filled(1.0, SampleType::Gray8));
        map.insert(PlaneIndex::new(7, 0, 0), filled(2.0, SampleType::Gray8));
        map.insert(PlaneIndex::new(3, 5, 0), filled(3.0, SampleType::Gray8));
        map.insert(PlaneIndex::new(7, 5, 0), filled(4.0, SampleType::Gray8));

        let r = Raster::from_plane_map(map, false).unwrap();
        assert_eq!(r.dimensions(), Dimensions::new(2, 2, 1).unwrap());
        let p = r.plane(PlaneIndex::new(1, 1, 0)).unwrap();
        assert_eq!(p.get_value(0, 0), Some(4.0));
        let p = r.plane(PlaneIndex::new(0, 1, 0)).unwrap();
        assert_eq!(p.get_value(0, 0), Some(3.0));
    }

    #[test]
    fn test_from_plane_map_incomplete_grid() {
        let mut map = BTreeMap::new();
        map.insert(PlaneIndex::new(0, 0, 0), filled(1.0, SampleType::Gray8));
        map.insert(PlaneIndex::new(1, 1, 0), filled(1.0, SampleType::Gray8));
        assert!(matches!(
            Raster::from_plane_map(map, false),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_plane_map_size_mismatch() {
        let mut map = BTreeMap::new();
        map.insert(PlaneIndex::new(0, 0, 0), filled(1.0, SampleType::Gray8));
        map.insert(
            PlaneIndex::new(1, 0, 0),
            Plane::new(3, 2, SampleType::Gray8).unwrap(),
        );
        assert!(matches!(
            Raster::from_plane_map(map, false),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_plane_map_equalize() {
        let mut map = BTreeMap::new();
        map.insert(PlaneIndex::new(0, 0, 0), filled(9.0, SampleType::Gray8));
        map.insert(PlaneIndex::new(1, 0, 0), filled(500.0, SampleType::Gray16));

        assert!(Raster::from_plane_map(map.clone(), false).is_err());
        let r = Raster::from_plane_map(map, true).unwrap();
        assert_eq!(r.sample_type(), SampleType::Gray16);
        assert_eq!(r.planes()[0].get_value(0, 0), Some(9.0));
    }

    #[test]
    fn test_ensure_dimensions() {
        let dims = Dimensions::new(1, 2, 1).unwrap();
        let mut m = Raster::new(2, 2, SampleType::Gray8, dims).unwrap().to_mut();
        m.planes_mut()[1].set_value(0, 0, 7.0).unwrap();
        let r: Raster = m.into();

        let grown = Dimensions::new(1, 4, 1).unwrap();
        let copied = r.ensure_dimensions(grown, true).unwrap();
        assert_eq!(copied.plane_count(), 4);
        assert_eq!(copied.planes()[3].get_value(0, 0), Some(7.0));

        let blank = r.ensure_dimensions(grown, false).unwrap();
        assert_eq!(blank.planes()[1].get_value(0, 0), Some(7.0));
        assert_eq!(blank.planes()[3].get_value(0, 0), Some(0.0));

        let shrunk = r.ensure_dimensions(Dimensions::SINGLE, false).unwrap();
        assert_eq!(shrunk.plane_count(), 1);
    }
}
