//! Tessera - Geometric transforms for multi-plane rasters
//!
//! A raster is a stack of equally sized 2D planes addressed by
//! `(slice, channel, frame)`. This crate bundles the data model and the
//! transform kernels that operate on it.
//!
//! # Overview
//!
//! - Border synthesis under constant, repeat, mirror and tile policies
//! - Anchor-relative canvas expansion
//! - Tiling with overlap and annotated reassembly
//! - Rotation by quarter turns and arbitrary angles
//!
//! # Example
//!
//! ```
//! use tessera::transform::{TileOptions, tile_all, untile};
//! use tessera::{Dimensions, NoProgress, Raster, SampleType};
//!
//! let raster = Raster::new(100, 60, SampleType::Gray16, Dimensions::SINGLE).unwrap();
//! let tiles = tile_all(&raster, &TileOptions::with_tile_size(32, 32).overlap(4, 4), &NoProgress)
//!     .unwrap();
//! assert_eq!(tiles.len(), 8);
//! let back = untile(tiles, &NoProgress).unwrap();
//! assert!(back.equals(&raster));
//! ```

// Re-export core types (the data model used everywhere)
pub use tessera_core::*;

// Kernels live under their own module to keep names apart
pub use tessera_transform as transform;
