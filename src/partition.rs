//! Partitioning a raster into uniform rectangular blocks.
//!
//! [`find_blocks`] repeats a pass until every non-sentinel cell belongs to a
//! block:
//!
//! 1. count runs over the cells that are still live,
//! 2. locate and classify candidates,
//! 3. resolve overloaded candidates until none remain,
//! 4. trim multi-blocks to a splittable size and split them,
//! 5. commit: consume the cells of every proposed block that is still fully
//!    live and uniform.
//!
//! Consumed cells act as sentinels in later passes, so residual runs left
//! behind by trimmed or deferred blocks show up as fresh starts. Proposals
//! that overlap a block committed earlier in the same pass are dropped and
//! found again next pass.
//!
//! # Example
//!
//! ```
//! use zeninlay::{BlockShape, Grid, Origin, find_blocks};
//!
//! let raster = Grid::from_rows([
//!     [0, 0, 0, 0],
//!     [0, 3, 3, 0],
//!     [0, 3, 3, 0],
//! ]).unwrap();
//! let blocks = find_blocks(&raster, &BlockShape::new(2, 2), 0).unwrap();
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].origin, Origin::Found);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::blocks::{BlockShape, Candidates, separate};
use crate::counts::run_counts;
use crate::grid::{Grid, Rect};
use crate::overloaded::resolve_overloaded;
use crate::split::{split_multiblock, splittable};

/// How a block came out of the partition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Classified ordinary as located.
    Found,
    /// A piece of a split multi-block.
    Split,
}

/// A uniform rectangular block of the raster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub rect: Rect,
    pub origin: Origin,
}

/// Partitioning error.
///
/// `SplitResidue` and `Stalled` never come out of [`find_blocks`] for valid
/// input; seeing one there means a broken invariant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    /// Block height or width is zero.
    #[error("block shape must have non-zero height and width")]
    ZeroBlockShape,
    /// The residue of a split does not fit within the tolerance.
    #[error("extent {extent} cannot be split into blocks of {nominal} (+{tolerance})")]
    SplitResidue {
        extent: usize,
        nominal: usize,
        tolerance: usize,
    },
    /// A pass committed no block although live cells remain.
    #[error("partition pass {pass} made no progress with {remaining} cells left")]
    Stalled { pass: usize, remaining: usize },
}

/// Partition `raster` into uniform blocks.
///
/// Every cell not equal to `outvalue` ends up in exactly one block; cells
/// equal to `outvalue` are in none. The result is deterministic for a given
/// input but not minimal in block count.
pub fn find_blocks<T: Copy + PartialEq>(
    raster: &Grid<T>,
    shape: &BlockShape,
    outvalue: T,
) -> Result<Vec<Block>, PartitionError> {
    shape.validate()?;

    let mut live = raster.map(|&v| (v != outvalue).then_some(v));
    let mut remaining = live.as_slice().iter().filter(|v| v.is_some()).count();
    let mut blocks = Vec::new();
    let mut pass = 0;

    while remaining > 0 {
        pass += 1;
        let proposals = propose(&live, shape)?;

        let committed_before = blocks.len();
        for (rect, origin) in proposals {
            if consume(&mut live, rect) {
                log::trace!("pass {pass}: committed {origin:?} block {rect:?}");
                remaining -= rect.area();
                blocks.push(Block { rect, origin });
            } else {
                log::trace!("pass {pass}: deferred {origin:?} block {rect:?}");
            }
        }

        let committed = blocks.len() - committed_before;
        log::debug!("pass {pass}: committed {committed} blocks, {remaining} cells left");
        if committed == 0 {
            return Err(PartitionError::Stalled { pass, remaining });
        }
    }
    Ok(blocks)
}

/// One pass worth of proposed blocks, found blocks first.
fn propose<T: Copy + PartialEq>(
    live: &Grid<Option<T>>,
    shape: &BlockShape,
) -> Result<Vec<(Rect, Origin)>, PartitionError> {
    let view = live.as_view();
    let counts = run_counts(&view, &None);
    let mut classified = separate(&view, &counts, Candidates::new(view, &counts), shape);

    let resolved = resolve_overloaded(&view, core::mem::take(&mut classified.overloaded), shape);
    classified.extend(resolved);

    let mut proposals: Vec<(Rect, Origin)> = classified
        .ordinary
        .into_iter()
        .map(|rect| (rect, Origin::Found))
        .collect();
    for multi in classified.multi {
        let pieces = split_multiblock(splittable(multi, shape), shape)?;
        proposals.extend(pieces.into_iter().map(|rect| (rect, Origin::Split)));
    }
    Ok(proposals)
}

/// Consume `rect` if all of its cells are live and equal.
fn consume<T: Copy + PartialEq>(live: &mut Grid<Option<T>>, rect: Rect) -> bool {
    if rect.is_empty() || !rect.fits_within(live.height(), live.width()) {
        return false;
    }
    let first = live[(rect.row, rect.col)];
    if first.is_none() || rect.cells().any(|cell| live[cell] != first) {
        return false;
    }
    for cell in rect.cells() {
        live[cell] = None;
    }
    true
}
