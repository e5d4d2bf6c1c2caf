//! Tiling
//!
//! Splits a raster into a grid of equally sized tiles with optional overlap.
//! The raster is first padded to a whole number of tiles plus the overlap on
//! every side, so every tile has the same size and edge tiles are filled
//! according to the [`BoundaryPolicy`].
//!
//! ```text
//!   +--------------------------+
//!   | overlap                  |
//!   |   +------+------+---+..  |
//!   |   | 0,0  | 1,0  |2,0:  : |  each tile: tile_w + 2*overlap_x wide,
//!   |   +------+------+---+..  |  origin at (tx*tile_w, ty*tile_h) in the
//!   |   | 0,1  | 1,1  |2,1:  : |  padded raster
//!   |   +------+------+---+..  |
//!   +--------------------------+
//! ```

use std::collections::BTreeMap;

use rayon::prelude::*;
use tessera_core::{FillValue, Progress, ProgressCounter, Raster, Rect};

use crate::border::add_border;
use crate::{BoundaryPolicy, Margins, TransformError, TransformResult};

/// Annotation keys written by [`TileDescriptor::to_annotations`].
pub mod keys {
    pub const TILE_X: &str = "Tile X";
    pub const TILE_Y: &str = "Tile Y";
    pub const NUM_TILES_X: &str = "Num Tiles X";
    pub const NUM_TILES_Y: &str = "Num Tiles Y";
    /// Tile origin in the original raster, X
    pub const ORIGINAL_X: &str = "Original X";
    /// Tile origin in the original raster, Y
    pub const ORIGINAL_Y: &str = "Original Y";
    pub const ORIGINAL_WIDTH: &str = "Original width";
    pub const ORIGINAL_HEIGHT: &str = "Original height";
    pub const INSET_X: &str = "Inset X";
    pub const INSET_Y: &str = "Inset Y";
}

/// Options for [`tile`] and [`tile_all`].
#[derive(Debug, Clone)]
pub struct TileOptions {
    /// Tile width without overlap
    pub tile_width: u32,
    /// Tile height without overlap
    pub tile_height: u32,
    /// Extra pixels on the left and right of every tile
    pub overlap_x: u32,
    /// Extra pixels above and below every tile
    pub overlap_y: u32,
    /// How padding pixels are synthesized
    pub policy: BoundaryPolicy,
    /// Padding value for [`BoundaryPolicy::Constant`]
    pub fill: FillValue,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            tile_width: 512,
            tile_height: 512,
            overlap_x: 0,
            overlap_y: 0,
            policy: BoundaryPolicy::Constant,
            fill: FillValue::BLACK,
        }
    }
}

impl TileOptions {
    /// Create options for `tile_width x tile_height` tiles
    pub fn with_tile_size(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            ..Default::default()
        }
    }

    /// Set the overlap
    pub fn overlap(mut self, overlap_x: u32, overlap_y: u32) -> Self {
        self.overlap_x = overlap_x;
        self.overlap_y = overlap_y;
        self
    }

    /// Set the boundary policy for padding
    pub fn policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the fill value for constant padding
    pub fn fill(mut self, fill: FillValue) -> Self {
        self.fill = fill;
        self
    }

    fn validate(&self) -> TransformResult<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(TransformError::InvalidParameters(format!(
                "tile size must be positive: {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        let too_big = |v: u32| v > (i32::MAX as u32) / 4;
        if too_big(self.tile_width)
            || too_big(self.tile_height)
            || too_big(self.overlap_x)
            || too_big(self.overlap_y)
        {
            return Err(TransformError::InvalidParameters(format!(
                "tile geometry out of range: {}x{} overlap {}x{}",
                self.tile_width, self.tile_height, self.overlap_x, self.overlap_y
            )));
        }
        Ok(())
    }
}

/// Placement of one tile in the tile grid and in the original raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileDescriptor {
    /// Column in the tile grid
    pub tile_x: u32,
    /// Row in the tile grid
    pub tile_y: u32,
    pub num_tiles_x: u32,
    pub num_tiles_y: u32,
    /// Width of the raster before padding
    pub original_width: u32,
    /// Height of the raster before padding
    pub original_height: u32,
    /// Overlap baked into the left and right edges
    pub inset_x: u32,
    /// Overlap baked into the top and bottom edges
    pub inset_y: u32,
    /// X of the tile content (inside the inset) in the original raster
    pub real_x: u32,
    /// Y of the tile content (inside the inset) in the original raster
    pub real_y: u32,
}

impl TileDescriptor {
    /// Serialize as string annotations using the keys in [`keys`].
    pub fn to_annotations(&self) -> BTreeMap<String, String> {
        [
            (keys::TILE_X, self.tile_x),
            (keys::TILE_Y, self.tile_y),
            (keys::NUM_TILES_X, self.num_tiles_x),
            (keys::NUM_TILES_Y, self.num_tiles_y),
            (keys::ORIGINAL_X, self.real_x),
            (keys::ORIGINAL_Y, self.real_y),
            (keys::ORIGINAL_WIDTH, self.original_width),
            (keys::ORIGINAL_HEIGHT, self.original_height),
            (keys::INSET_X, self.inset_x),
            (keys::INSET_Y, self.inset_y),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

/// A tile raster and its placement.
#[derive(Debug, Clone)]
pub struct Tile {
    pub raster: Raster,
    pub descriptor: TileDescriptor,
}

/// Grid geometry shared by the lazy and the parallel tilers.
#[derive(Debug, Clone, Copy)]
struct Grid {
    num_x: u32,
    num_y: u32,
    tile_w: u32,
    tile_h: u32,
    overlap_x: u32,
    overlap_y: u32,
    original_w: u32,
    original_h: u32,
}

impl Grid {
    fn new(src: &Raster, options: &TileOptions) -> Self {
        Self {
            num_x: src.width().div_ceil(options.tile_width),
            num_y: src.height().div_ceil(options.tile_height),
            tile_w: options.tile_width,
            tile_h: options.tile_height,
            overlap_x: options.overlap_x,
            overlap_y: options.overlap_y,
            original_w: src.width(),
            original_h: src.height(),
        }
    }

    fn count(&self) -> usize {
        (self.num_x as usize) * (self.num_y as usize)
    }

    /// Border that pads the source to the tile grid plus overlap.
    fn margins(&self) -> TransformResult<Margins> {
        let padded_w = self.num_x as i64 * self.tile_w as i64;
        let padded_h = self.num_y as i64 * self.tile_h as i64;
        let right = padded_w - self.original_w as i64 + self.overlap_x as i64;
        let bottom = padded_h - self.original_h as i64 + self.overlap_y as i64;
        let to_i32 = |v: i64| {
            i32::try_from(v).map_err(|_| {
                TransformError::InvalidParameters(format!("tile padding {} out of range", v))
            })
        };
        Ok(Margins::new(
            to_i32(self.overlap_x as i64)?,
            to_i32(self.overlap_y as i64)?,
            to_i32(right)?,
            to_i32(bottom)?,
        ))
    }

    fn descriptor(&self, index: usize) -> TileDescriptor {
        let tile_x = (index % self.num_x as usize) as u32;
        let tile_y = (index / self.num_x as usize) as u32;
        TileDescriptor {
            tile_x,
            tile_y,
            num_tiles_x: self.num_x,
            num_tiles_y: self.num_y,
            original_width: self.original_w,
            original_height: self.original_h,
            inset_x: self.overlap_x,
            inset_y: self.overlap_y,
            real_x: tile_x * self.tile_w,
            real_y: tile_y * self.tile_h,
        }
    }

    /// Crop tile `index` (row-major) out of the padded raster.
    fn cut(&self, padded: &Raster, index: usize) -> TransformResult<Tile> {
        let descriptor = self.descriptor(index);
        let rect = Rect::new(
            descriptor.real_x as i32,
            descriptor.real_y as i32,
            (self.tile_w + 2 * self.overlap_x) as i32,
            (self.tile_h + 2 * self.overlap_y) as i32,
        )?;
        let raster = padded.crop(&rect)?;
        tracing::trace!(
            tile_x = descriptor.tile_x,
            tile_y = descriptor.tile_y,
            "tile cut"
        );
        Ok(Tile { raster, descriptor })
    }
}

/// Lazy tile sequence returned by [`tile`].
///
/// Yields tiles in row-major order, one crop per call to `next`. After an
/// error (including cancellation) the iterator is exhausted. To restart,
/// call [`tile`] again.
pub struct Tiles<'a> {
    padded: Raster,
    grid: Grid,
    cursor: usize,
    counter: ProgressCounter<'a, dyn Progress + 'a>,
}

impl Tiles<'_> {
    /// Number of tile columns.
    pub fn num_tiles_x(&self) -> u32 {
        self.grid.num_x
    }

    /// Number of tile rows.
    pub fn num_tiles_y(&self) -> u32 {
        self.grid.num_y
    }

    /// The padded raster the tiles are cut from.
    pub fn padded(&self) -> &Raster {
        &self.padded
    }
}

impl Iterator for Tiles<'_> {
    type Item = TransformResult<Tile>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.grid.count() {
            return None;
        }
        if self.counter.is_cancelled() {
            tracing::warn!(op = "tile", done = self.cursor, "cancelled");
            self.cursor = self.grid.count();
            return Some(Err(TransformError::Cancelled));
        }
        let result = self.grid.cut(&self.padded, self.cursor);
        self.cursor = if result.is_ok() {
            self.counter.step();
            self.cursor + 1
        } else {
            self.grid.count()
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.grid.count() - self.cursor;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Tiles<'_> {}

/// Split a raster into tiles, lazily.
///
/// Padding happens eagerly; tiles are cropped on demand.
///
/// # Arguments
///
/// * `src` - Input raster
/// * `options` - Tile size, overlap and padding policy
/// * `progress` - Polled while padding (per plane) and before every tile
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] for a zero tile size.
///
/// # Examples
///
/// ```
/// use tessera_core::{Dimensions, NoProgress, Raster, SampleType};
/// use tessera_transform::{TileOptions, tile};
///
/// let src = Raster::new(10, 10, SampleType::Gray8, Dimensions::SINGLE).unwrap();
/// let tiles = tile(&src, &TileOptions::with_tile_size(4, 4), &NoProgress).unwrap();
/// assert_eq!(tiles.len(), 9);
/// ```
pub fn tile<'a>(
    src: &Raster,
    options: &TileOptions,
    progress: &'a dyn Progress,
) -> TransformResult<Tiles<'a>> {
    let (padded, grid) = pad(src, options, progress)?;
    Ok(Tiles {
        padded,
        grid,
        cursor: 0,
        counter: ProgressCounter::new(progress, grid.count()),
    })
}

/// Split a raster into tiles, cropping all tiles in parallel.
///
/// Same output as collecting [`tile`], in the same row-major order.
pub fn tile_all(
    src: &Raster,
    options: &TileOptions,
    progress: &dyn Progress,
) -> TransformResult<Vec<Tile>> {
    let (padded, grid) = pad(src, options, progress)?;
    let counter = ProgressCounter::new(progress, grid.count());
    let tiles = (0..grid.count())
        .into_par_iter()
        .map(|index| {
            if counter.is_cancelled() {
                return Err(TransformError::Cancelled);
            }
            let tile = grid.cut(&padded, index)?;
            counter.step();
            Ok(tile)
        })
        .collect::<TransformResult<Vec<_>>>();
    if let Err(TransformError::Cancelled) = &tiles {
        tracing::warn!(op = "tile_all", "cancelled");
    }
    tiles
}

fn pad(
    src: &Raster,
    options: &TileOptions,
    progress: &dyn Progress,
) -> TransformResult<(Raster, Grid)> {
    options.validate()?;
    let grid = Grid::new(src, options);
    let margins = grid.margins()?;
    tracing::debug!(
        width = src.width(),
        height = src.height(),
        tiles_x = grid.num_x,
        tiles_y = grid.num_y,
        tile_width = options.tile_width,
        tile_height = options.tile_height,
        overlap_x = options.overlap_x,
        overlap_y = options.overlap_y,
        policy = %options.policy,
        "tile"
    );
    let padded = if margins.is_zero() {
        src.clone()
    } else {
        add_border(src, margins, options.policy, &options.fill, progress)?
    };
    Ok((padded, grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Dimensions, NoProgress, Plane, PlaneData, SampleType};

    fn ramp(w: u32, h: u32) -> Raster {
        let data = (0..w * h).map(|i| (i % 251) as u8).collect();
        Raster::from_plane(Plane::from_data(w, h, PlaneData::Gray8(data)).unwrap())
    }

    #[test]
    fn test_options_default() {
        let o = TileOptions::default();
        assert_eq!((o.tile_width, o.tile_height), (512, 512));
        assert_eq!((o.overlap_x, o.overlap_y), (0, 0));
        assert_eq!(o.policy, BoundaryPolicy::Constant);
        assert_eq!(o.fill, FillValue::BLACK);
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let r = ramp(4, 4);
        let err = tile(&r, &TileOptions::with_tile_size(0, 4), &NoProgress).err();
        assert!(matches!(err, Some(TransformError::InvalidParameters(_))));
    }

    #[test]
    fn test_grid_and_fill() {
        let r = ramp(10, 10);
        let opts = TileOptions::with_tile_size(4, 4).fill(FillValue::gray(255.0));
        let tiles: Vec<Tile> = tile(&r, &opts, &NoProgress)
            .unwrap()
            .collect::<TransformResult<_>>()
            .unwrap();
        assert_eq!(tiles.len(), 9);
        let last = &tiles[8];
        assert_eq!((last.descriptor.tile_x, last.descriptor.tile_y), (2, 2));
        assert_eq!((last.descriptor.real_x, last.descriptor.real_y), (8, 8));
        let p = &last.raster.planes()[0];
        assert_eq!((p.width(), p.height()), (4, 4));
        // (8, 8) of the source, then padding
        assert_eq!(p.get_value(0, 0), Some(88.0));
        assert_eq!(p.get_value(2, 0), Some(255.0));
        assert_eq!(p.get_value(0, 2), Some(255.0));
    }

    #[test]
    fn test_overlap_padding() {
        let r = ramp(8, 8);
        let opts = TileOptions::with_tile_size(4, 4)
            .overlap(2, 1)
            .policy(BoundaryPolicy::Repeat);
        let tiles = tile(&r, &opts, &NoProgress).unwrap();
        assert_eq!((tiles.padded().width(), tiles.padded().height()), (12, 10));
        let tiles: Vec<Tile> = tiles.collect::<TransformResult<_>>().unwrap();
        let t = &tiles[0];
        assert_eq!((t.raster.width(), t.raster.height()), (8, 6));
        assert_eq!(t.descriptor.inset_x, 2);
        // Repeat padding: corner replicates source (0, 0)
        assert_eq!(t.raster.planes()[0].get_value(0, 0), Some(0.0));
        // Tile content starts at the inset
        assert_eq!(t.raster.planes()[0].get_value(2, 1), Some(0.0));
        assert_eq!(t.raster.planes()[0].get_value(3, 1), Some(1.0));
    }

    #[test]
    fn test_tile_all_matches_lazy() {
        let dims = Dimensions::new(2, 1, 1).unwrap();
        let r = Raster::new(9, 7, SampleType::Gray16, dims).unwrap();
        let opts = TileOptions::with_tile_size(4, 3).overlap(1, 1);
        let lazy: Vec<Tile> = tile(&r, &opts, &NoProgress)
            .unwrap()
            .collect::<TransformResult<_>>()
            .unwrap();
        let all = tile_all(&r, &opts, &NoProgress).unwrap();
        assert_eq!(lazy.len(), all.len());
        for (a, b) in lazy.iter().zip(&all) {
            assert_eq!(a.descriptor, b.descriptor);
            assert!(a.raster.equals(&b.raster));
        }
    }

    #[test]
    fn test_annotations() {
        let r = ramp(10, 6);
        let tiles = tile_all(&r, &TileOptions::with_tile_size(4, 4), &NoProgress).unwrap();
        let ann = tiles[1].descriptor.to_annotations();
        assert_eq!(ann[keys::TILE_X], "1");
        assert_eq!(ann[keys::ORIGINAL_X], "4");
        assert_eq!(ann[keys::NUM_TILES_X], "3");
        assert_eq!(ann[keys::NUM_TILES_Y], "2");
        assert_eq!(ann[keys::ORIGINAL_WIDTH], "10");
        assert_eq!(ann[keys::INSET_Y], "0");
        assert_eq!(ann.len(), 10);
    }
}
