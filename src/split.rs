//! Splitting oversized uniform blocks into nominal-shaped pieces.
//!
//! Each axis is cut into `extent / nominal` pieces of the nominal extent. The
//! residue goes one cell at a time to the trailing pieces, last piece first,
//! wrapping around until no piece has grown by more than the tolerance.
//!
//! ```text
//!     extent 11, nominal 3, tolerance 1
//!     3 + 3 + 3 = 9, residue 2  →  [3, 4, 4]
//! ```
//!
//! An axis shorter than its nominal extent stays whole: the block is thin on
//! that axis and becomes a single undersized piece there.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::blocks::BlockShape;
use crate::grid::Rect;
use crate::partition::PartitionError;

/// Piece extents along one axis, in order.
pub fn axis_sizes(
    extent: usize,
    nominal: usize,
    tolerance: usize,
) -> Result<Vec<usize>, PartitionError> {
    if nominal == 0 {
        return Err(PartitionError::ZeroBlockShape);
    }
    if extent == 0 {
        return Ok(Vec::new());
    }
    if extent < nominal {
        return Ok(alloc::vec![extent]);
    }

    let pieces = extent / nominal;
    let mut residue = extent % nominal;
    if residue > pieces * tolerance {
        return Err(PartitionError::SplitResidue {
            extent,
            nominal,
            tolerance,
        });
    }

    let mut sizes = alloc::vec![nominal; pieces];
    'spread: for _ in 0..tolerance {
        for size in sizes.iter_mut().rev() {
            if residue == 0 {
                break 'spread;
            }
            *size += 1;
            residue -= 1;
        }
    }
    debug_assert_eq!(residue, 0);
    Ok(sizes)
}

/// Largest extent `<= extent` that [`axis_sizes`] accepts.
///
/// Extents below the nominal one are accepted as they are.
pub fn splittable_extent(extent: usize, nominal: usize, tolerance: usize) -> usize {
    if nominal == 0 || extent < nominal {
        return extent;
    }
    let pieces = extent / nominal;
    extent.min(pieces * (nominal + tolerance))
}

/// Trim `rect` from the bottom and right to the largest splittable size.
pub fn splittable(rect: Rect, shape: &BlockShape) -> Rect {
    Rect {
        height: splittable_extent(rect.height, shape.height, shape.tolerance),
        width: splittable_extent(rect.width, shape.width, shape.tolerance),
        ..rect
    }
}

/// Split a uniform, oversized block into pieces, row-major.
///
/// The pieces cover `rect` exactly. Fails when the residue on either axis
/// cannot be absorbed within the tolerance.
pub fn split_multiblock(rect: Rect, shape: &BlockShape) -> Result<Vec<Rect>, PartitionError> {
    let heights = axis_sizes(rect.height, shape.height, shape.tolerance)?;
    let widths = axis_sizes(rect.width, shape.width, shape.tolerance)?;

    let mut pieces = Vec::with_capacity(heights.len() * widths.len());
    let mut row = rect.row;
    for &height in &heights {
        let mut col = rect.col;
        for &width in &widths {
            pieces.push(Rect::new(row, col, height, width));
            col += width;
        }
        row += height;
    }
    Ok(pieces)
}

/// Split every multi-block in `multiblocks`.
pub fn breakdown_multiblocks(
    multiblocks: impl IntoIterator<Item = Rect>,
    shape: &BlockShape,
) -> Result<Vec<Rect>, PartitionError> {
    let mut pieces = Vec::new();
    for rect in multiblocks {
        pieces.extend(split_multiblock(rect, shape)?);
    }
    Ok(pieces)
}
