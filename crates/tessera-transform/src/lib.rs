//! tessera-transform - Geometric transform kernels for multi-plane rasters
//!
//! This crate provides the geometric operations over
//! [`tessera_core::Raster`]:
//!
//! - Boundary policies for out-of-range coordinates (constant, repeat, mirror, tile)
//! - Border synthesis with independent margins per side
//! - Anchor-relative canvas expansion and cropping
//! - Tiling into overlapping, annotated tiles
//! - Reassembly of annotated tiles into one raster
//! - Rotation (quarter turns and arbitrary angles)
//!
//! Every kernel works plane by plane on the rayon pool and polls a
//! [`tessera_core::Progress`] for cancellation.

pub mod anchor;
pub mod border;
pub mod boundary;
pub mod canvas;
mod error;
mod planes;
pub mod rotate;
pub mod tile;
pub mod untile;

pub use anchor::{Anchor, AxisAnchor, compute_offset};
pub use border::{Margins, add_border};
pub use boundary::BoundaryPolicy;
pub use canvas::{crop_canvas, expand_canvas};
pub use error::{TransformError, TransformResult};
pub use rotate::{ContentRegion, RotateOptions, RotateOutput, rotate};
pub use tile::{Tile, TileDescriptor, TileOptions, Tiles, keys, tile, tile_all};
pub use untile::{PlacedTile, TilePlacement, untile};
