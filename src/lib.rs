//! Raster block partitioning and capacity-constrained redistribution.
//!
//! Two engines over in-memory grids, `no_std` compatible with `alloc`:
//!
//! - [`find_blocks`] partitions a raster of categorical values into
//!   rectangular blocks of uniform value, close to a nominal block shape.
//! - [`inlay`](fn@inlay) spreads the quantity of one block over its cells so that
//!   quantity plus a constraints grid never exceeds a per-cell capacity;
//!   [`imprint_constraints`] does so for many regions and reports the
//!   outcome of each.
//!
//! # Modules
//!
//! - [`grid`]: Owned grids, rectangles, region views
//! - [`counts`]: Same-value run counts
//! - [`blocks`]: Candidate location and classification
//! - [`split`]: Splitting oversized blocks into nominal pieces
//! - [`overloaded`]: Resolving candidates that enclose other values
//! - [`partition`]: The partition driver
//! - [`inlay`](mod@inlay): Redistribution within one region
//! - [`batch`]: Redistribution over many regions
//!
//! # Example
//!
//! ```
//! use zeninlay::{BlockShape, Grid, InlayConfig, find_blocks, imprint_constraints};
//!
//! let landuse = Grid::filled(4, 4, 2u8);
//! let mut raster = Grid::filled(4, 4, 30u8);
//! let constraints = Grid::from_rows([
//!     [0u8, 0, 90, 90],
//!     [0, 0, 90, 90],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//! ]).unwrap();
//!
//! let blocks = find_blocks(&landuse, &BlockShape::new(2, 2), 0).unwrap();
//! let imprint = imprint_constraints(
//!     &mut raster,
//!     &constraints,
//!     blocks.iter().map(|b| b.rect),
//!     &InlayConfig::new(1, 100),
//! )
//! .unwrap();
//! assert_eq!(imprint.report.len(), 4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod batch;
pub mod blocks;
pub mod counts;
pub mod grid;
pub mod inlay;
pub mod overloaded;
pub mod partition;
pub mod split;

// Re-exports: grid types
pub use grid::{Grid, GridError, Rect, View, ViewMut};

// Re-exports: partitioning
pub use blocks::{BlockKind, BlockShape, Candidates, Classified, classify, separate};
pub use counts::run_counts;
pub use overloaded::{resolve_overloaded, split_overloaded};
pub use partition::{Block, Origin, PartitionError, find_blocks};
pub use split::{breakdown_multiblocks, split_multiblock};

// Re-exports: redistribution
pub use batch::{Imprint, InlayReport, disjoint, imprint_constraints};
pub use inlay::{CapacityUnit, InlayConfig, InlayError, InlayOutcome, InvalidCells, inlay};
