//! Same-value run counts, the geometry signal behind block detection.
//!
//! For every cell the count combines the length of the same-valued run
//! ending at the cell along its row with the number of same-valued cells
//! stacked directly above it. The top-left corner of a uniform block whose
//! left and upper neighbours differ counts `1`; the count then rises by one
//! per step right or down, so cell `(i, j)` of such a block counts `i + j + 1`.
//!
//! ```text
//!     raster        counts (outvalue 0)
//!     0 5 5 5       0 1 2 3
//!     0 5 5 5       0 2 3 4
//!     7 7 0 0       1 2 0 0
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::grid::{Grid, View};

/// Run counts for `raster`, in the view's local coordinates.
///
/// Cells equal to `outvalue` count `0` and break runs.
pub fn run_counts<T: PartialEq>(raster: &View<'_, T>, outvalue: &T) -> Grid<u32> {
    let (height, width) = (raster.height(), raster.width());
    let mut counts = Grid::filled(height, width, 0u32);
    if height == 0 || width == 0 {
        return counts;
    }

    // Along each row: extend the run from the left neighbour while the value holds.
    for r in 0..height {
        for c in 0..width {
            let value = raster.get(r, c);
            let carried = if c > 0 && raster.get(r, c - 1) == value {
                counts[(r, c - 1)]
            } else {
                0
            };
            counts[(r, c)] = carried + u32::from(value != outvalue);
        }
    }

    // Down each column: add the height of the same-valued stack above.
    let mut above: Vec<u32> = (0..width)
        .map(|c| u32::from(raster.get(0, c) != outvalue))
        .collect();
    for r in 1..height {
        for (c, stack) in above.iter_mut().enumerate() {
            let value = raster.get(r, c);
            if value != raster.get(r - 1, c) {
                *stack = 0;
            }
            counts[(r, c)] += *stack;
            if value != outvalue {
                *stack += 1;
            }
        }
    }
    counts
}
