//! Untiling
//!
//! Reassembles tiles produced by [`crate::tile`] (or any tiles carrying the
//! same placement metadata) into one raster. Tiles may differ in sample type
//! and plane counts; the output takes the consensus sample type and the
//! largest plane counts.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tessera_core::{
    Dimensions, Plane, Progress, ProgressCounter, Raster, Rect, SampleType, consensus_sample_type,
};

use crate::tile::{Tile, TileDescriptor, keys};
use crate::{TransformError, TransformResult};

/// Where a tile goes in the reassembled raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TilePlacement {
    /// X of the tile content in the output
    pub real_x: u32,
    /// Y of the tile content in the output
    pub real_y: u32,
    /// Pixels cropped from the left and right before pasting
    pub inset_x: u32,
    /// Pixels cropped from the top and bottom before pasting
    pub inset_y: u32,
    /// Output width, if known
    pub original_width: Option<u32>,
    /// Output height, if known
    pub original_height: Option<u32>,
}

impl TilePlacement {
    /// Create a placement at `(real_x, real_y)` without inset.
    pub fn at(real_x: u32, real_y: u32) -> Self {
        Self {
            real_x,
            real_y,
            ..Default::default()
        }
    }

    /// Set the inset
    pub fn inset(mut self, inset_x: u32, inset_y: u32) -> Self {
        self.inset_x = inset_x;
        self.inset_y = inset_y;
        self
    }

    /// Set the original raster size
    pub fn original_size(mut self, width: u32, height: u32) -> Self {
        self.original_width = Some(width);
        self.original_height = Some(height);
        self
    }

    /// Read a placement from string annotations.
    ///
    /// `Original X` and `Original Y` are required; insets default to 0 and
    /// the original size is optional.
    ///
    /// # Errors
    ///
    /// - [`TransformError::MissingMetadata`] if a required key is absent
    /// - [`TransformError::InvalidParameters`] if a value is not an
    ///   unsigned integer
    pub fn from_annotations(annotations: &BTreeMap<String, String>) -> TransformResult<Self> {
        let get = |key: &'static str| -> TransformResult<Option<u32>> {
            annotations
                .get(key)
                .map(|v| {
                    v.trim().parse::<u32>().map_err(|_| {
                        TransformError::InvalidParameters(format!(
                            "annotation '{}' is not a pixel count: '{}'",
                            key, v
                        ))
                    })
                })
                .transpose()
        };
        Ok(Self {
            real_x: get(keys::ORIGINAL_X)?.ok_or(TransformError::MissingMetadata(keys::ORIGINAL_X))?,
            real_y: get(keys::ORIGINAL_Y)?.ok_or(TransformError::MissingMetadata(keys::ORIGINAL_Y))?,
            inset_x: get(keys::INSET_X)?.unwrap_or(0),
            inset_y: get(keys::INSET_Y)?.unwrap_or(0),
            original_width: get(keys::ORIGINAL_WIDTH)?,
            original_height: get(keys::ORIGINAL_HEIGHT)?,
        })
    }
}

impl From<&TileDescriptor> for TilePlacement {
    fn from(d: &TileDescriptor) -> Self {
        Self {
            real_x: d.real_x,
            real_y: d.real_y,
            inset_x: d.inset_x,
            inset_y: d.inset_y,
            original_width: Some(d.original_width),
            original_height: Some(d.original_height),
        }
    }
}

/// A tile raster with its placement, the input unit of [`untile`].
#[derive(Debug, Clone)]
pub struct PlacedTile {
    pub raster: Raster,
    pub placement: TilePlacement,
}

impl PlacedTile {
    /// Pair a raster with a placement.
    pub fn new(raster: Raster, placement: TilePlacement) -> Self {
        Self { raster, placement }
    }

    /// Pair a raster with a placement read from annotations.
    pub fn from_annotations(
        raster: Raster,
        annotations: &BTreeMap<String, String>,
    ) -> TransformResult<Self> {
        Ok(Self::new(raster, TilePlacement::from_annotations(annotations)?))
    }
}

impl From<Tile> for PlacedTile {
    fn from(tile: Tile) -> Self {
        let placement = TilePlacement::from(&tile.descriptor);
        Self::new(tile.raster, placement)
    }
}

/// Reassemble tiles into one raster.
///
/// 1. Each tile loses `inset_x` pixels on the left and right and `inset_y`
///    on the top and bottom.
/// 2. The canvas size is taken per axis from the tiles' original size when
///    any tile carries one (all carried values must agree), otherwise from
///    the furthest tile edge.
/// 3. Tiles are converted (scaled) to the consensus sample type and pasted
///    at their real position into every plane index they have. The output
///    has the largest plane counts found among the tiles; planes no tile
///    covers stay zero.
/// 4. The calibration of the last tile is kept.
///
/// # Errors
///
/// - [`TransformError::InvalidParameters`] for no tiles, an inset that
///   leaves nothing of a tile, or a tile whose far edge lies beyond
///   `i32::MAX`
/// - [`TransformError::InconsistentMetadata`] if tiles disagree on the
///   original size
/// - [`TransformError::Cancelled`] if `progress` requests it
pub fn untile<I, T>(tiles: I, progress: &dyn Progress) -> TransformResult<Raster>
where
    I: IntoIterator<Item = T>,
    T: Into<PlacedTile>,
{
    let tiles: Vec<PlacedTile> = tiles.into_iter().map(Into::into).collect();
    if tiles.is_empty() {
        return Err(TransformError::InvalidParameters("no tiles to untile".into()));
    }

    let width = resolve_extent(
        keys::ORIGINAL_WIDTH,
        tiles.iter().map(|t| t.placement.original_width),
        tiles
            .iter()
            .map(|t| extent(t.placement.real_x, t.raster.width(), t.placement.inset_x)),
    )?;
    let height = resolve_extent(
        keys::ORIGINAL_HEIGHT,
        tiles.iter().map(|t| t.placement.original_height),
        tiles
            .iter()
            .map(|t| extent(t.placement.real_y, t.raster.height(), t.placement.inset_y)),
    )?;
    let sample_type = consensus_sample_type(tiles.iter().map(|t| t.raster.sample_type()))
        .unwrap_or(SampleType::Gray8);
    let dims = tiles
        .iter()
        .map(|t| t.raster.dimensions())
        .fold(Dimensions::SINGLE, |acc, d| acc.max(&d));

    tracing::debug!(
        tiles = tiles.len(),
        width,
        height,
        ?sample_type,
        channels = dims.channels,
        slices = dims.slices,
        frames = dims.frames,
        "untile"
    );

    let counter = ProgressCounter::new(progress, tiles.len());
    let mut prepared = Vec::with_capacity(tiles.len());
    for tile in &tiles {
        if counter.is_cancelled() {
            tracing::warn!(op = "untile", done = prepared.len(), "cancelled");
            return Err(TransformError::Cancelled);
        }
        prepared.push(prepare(tile, sample_type)?);
        counter.step();
    }

    let planes = dims
        .indices()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|index| {
            let mut plane = Plane::new(width, height, sample_type)?;
            for (raster, x, y) in &prepared {
                if raster.dimensions().contains(&index) {
                    plane.insert(raster.plane(index)?, *x, *y)?;
                }
            }
            tracing::trace!(plane = %index, "untile plane assembled");
            Ok(plane)
        })
        .collect::<TransformResult<Vec<_>>>()?;

    let mut out = Raster::from_planes(dims, planes)?.into_mut();
    if let Some(last) = tiles.last() {
        out.copy_calibration_from(&last.raster);
    }
    Ok(out.into())
}

/// Crop the inset and convert to the output type. Returns the raster and
/// its paste position.
fn prepare(tile: &PlacedTile, sample_type: SampleType) -> TransformResult<(Raster, i32, i32)> {
    let p = &tile.placement;
    let far_x = extent(p.real_x, tile.raster.width(), p.inset_x);
    let far_y = extent(p.real_y, tile.raster.height(), p.inset_y);
    if far_x > i32::MAX as u64 || far_y > i32::MAX as u64 {
        return Err(TransformError::InvalidParameters(format!(
            "tile at ({}, {}) extends to ({}, {}), beyond the addressable canvas",
            p.real_x, p.real_y, far_x, far_y
        )));
    }

    let mut raster = tile.raster.clone();
    if p.inset_x > 0 || p.inset_y > 0 {
        let inset = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        let inner = Rect::full(raster.width(), raster.height())
            .inset(inset(p.inset_x), inset(p.inset_y))
            .ok_or_else(|| {
                TransformError::InvalidParameters(format!(
                    "inset {}x{} leaves nothing of a {}x{} tile",
                    p.inset_x,
                    p.inset_y,
                    raster.width(),
                    raster.height()
                ))
            })?;
        raster = raster.crop(&inner)?;
    }

    let from = raster.sample_type();
    if from != sample_type {
        if is_lossy(from, sample_type) {
            tracing::warn!(
                ?from,
                to = ?sample_type,
                real_x = p.real_x,
                real_y = p.real_y,
                "lossy tile coercion"
            );
        }
        raster = raster.convert_to(sample_type, true)?;
    }

    // Both far edges fit in i32, so the origins do too
    Ok((raster, p.real_x as i32, p.real_y as i32))
}

/// Whether converting `from` into the consensus type `to` can lose
/// information. Grey promotions copy values exactly; only wide grey into
/// 8-bit RGB is rescaled.
fn is_lossy(from: SampleType, to: SampleType) -> bool {
    to == SampleType::Rgb && matches!(from, SampleType::Gray16 | SampleType::Gray32)
}

/// Far edge of a tile's content.
fn extent(real: u32, size: u32, inset: u32) -> u64 {
    real as u64 + (size as u64).saturating_sub(2 * inset as u64)
}

/// Pick the canvas size along one axis.
fn resolve_extent(
    field: &'static str,
    explicit: impl Iterator<Item = Option<u32>>,
    inferred: impl Iterator<Item = u64>,
) -> TransformResult<u32> {
    let mut chosen: Option<u32> = None;
    for value in explicit.flatten() {
        match chosen {
            None => chosen = Some(value),
            Some(first) if first != value => {
                return Err(TransformError::InconsistentMetadata {
                    field,
                    first,
                    second: value,
                });
            }
            Some(_) => {}
        }
    }
    let size = match chosen {
        Some(v) => v as u64,
        None => inferred.max().unwrap_or(0),
    };
    if size == 0 || size > i32::MAX as u64 {
        return Err(TransformError::InvalidParameters(format!(
            "{} of {} is not usable",
            field, size
        )));
    }
    Ok(size as u32)
}
