//! Block candidates: locating them from run counts and classifying them.
//!
//! A *candidate* grows from every start cell (run count `1`) along its top row
//! and left column for as long as the value holds and the count keeps rising.
//! The resulting rectangle is then one of:
//!
//! - [`BlockKind::Ordinary`]: a single value, no larger than the nominal
//!   [`BlockShape`] plus tolerance.
//! - [`BlockKind::Multi`]: a single value, but oversized. Split into ordinary
//!   blocks by [`split`](crate::split).
//! - [`BlockKind::Overloaded`]: the value holds on the top row and left
//!   column only; other values sit inside. Resolved by
//!   [`overloaded`](crate::overloaded).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::grid::{Grid, Rect, View};
use crate::partition::PartitionError;

/// Nominal block extents plus the accepted growth per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockShape {
    /// Nominal block height in cells.
    pub height: usize,
    /// Nominal block width in cells.
    pub width: usize,
    /// Accepted increase of height and of width per block.
    pub tolerance: usize,
}

impl BlockShape {
    /// Nominal `height × width` blocks with a tolerance of one cell.
    pub const fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            tolerance: 1,
        }
    }

    /// Set the accepted increase per axis.
    pub const fn tolerance(mut self, tolerance: usize) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Largest run count a single block may contain before it is oversized.
    ///
    /// Tolerance counts twice, once per axis.
    pub fn ok_max(&self) -> u32 {
        let max = self.height + self.width + 2 * self.tolerance;
        u32::try_from(max).unwrap_or(u32::MAX)
    }

    pub(crate) fn validate(&self) -> Result<(), PartitionError> {
        if self.height == 0 || self.width == 0 {
            return Err(PartitionError::ZeroBlockShape);
        }
        Ok(())
    }
}

/// Classification of a candidate rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Single value, within `ok_max`.
    Ordinary,
    /// Single value, oversized.
    Multi,
    /// More than one value inside.
    Overloaded,
}

/// Candidate rectangles sorted by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classified {
    /// Uniform and within `ok_max`; usable as blocks.
    pub ordinary: Vec<Rect>,
    /// Uniform but oversized; to be split.
    pub multi: Vec<Rect>,
    /// Enclosing other values; to be resolved.
    pub overloaded: Vec<Rect>,
}

impl Classified {
    /// File `rect` under the list for `kind`.
    pub fn push(&mut self, kind: BlockKind, rect: Rect) {
        match kind {
            BlockKind::Ordinary => self.ordinary.push(rect),
            BlockKind::Multi => self.multi.push(rect),
            BlockKind::Overloaded => self.overloaded.push(rect),
        }
    }

    /// Move everything from `other` into `self`.
    pub fn extend(&mut self, other: Classified) {
        self.ordinary.extend(other.ordinary);
        self.multi.extend(other.multi);
        self.overloaded.extend(other.overloaded);
    }
}

/// Lazy sequence of candidate rectangles, in raster-scan order of their starts.
///
/// Rects are in the view's local coordinates. Cloning yields an independent
/// iterator from the same position, so a fresh clone restarts the scan.
#[derive(Debug)]
pub struct Candidates<'a, T> {
    raster: View<'a, T>,
    counts: &'a Grid<u32>,
    next: usize,
}

impl<T> Clone for Candidates<'_, T> {
    fn clone(&self) -> Self {
        Self {
            raster: self.raster,
            counts: self.counts,
            next: self.next,
        }
    }
}

impl<'a, T: PartialEq> Candidates<'a, T> {
    /// `counts` must come from [`run_counts`](crate::counts::run_counts) over `raster`.
    pub fn new(raster: View<'a, T>, counts: &'a Grid<u32>) -> Self {
        debug_assert_eq!(counts.shape(), (raster.height(), raster.width()));
        Self {
            raster,
            counts,
            next: 0,
        }
    }

    /// Grow the candidate whose top-left corner is `(row, col)`.
    fn grow(&self, row: usize, col: usize) -> Rect {
        let (height, width) = (self.raster.height(), self.raster.width());
        let value = self.raster.get(row, col);

        let mut w = 0;
        while col + w + 1 < width
            && self.counts[(row, col + w + 1)] > self.counts[(row, col + w)]
            && self.raster.get(row, col + w + 1) == value
        {
            w += 1;
        }

        let mut h = 0;
        while row + h + 1 < height
            && self.counts[(row + h + 1, col)] > self.counts[(row + h, col)]
            && self.raster.get(row + h + 1, col) == value
        {
            h += 1;
        }

        Rect::new(row, col, h + 1, w + 1)
    }
}

impl<T: PartialEq> Iterator for Candidates<'_, T> {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        let width = self.counts.width();
        let cells = self.counts.as_slice();
        while self.next < cells.len() {
            let index = self.next;
            self.next += 1;
            if cells[index] == 1 {
                return Some(self.grow(index / width, index % width));
            }
        }
        None
    }
}

/// Whether every cell of `rect` (local to `raster`) holds the same value.
pub fn is_uniform<T: PartialEq>(raster: &View<'_, T>, rect: Rect) -> bool {
    let mut cells = rect.cells().map(|(r, c)| raster.get(r, c));
    match cells.next() {
        Some(first) => cells.all(|v| v == first),
        None => true,
    }
}

/// Classify `rect` against the run counts it was located with.
pub fn classify<T: PartialEq>(
    raster: &View<'_, T>,
    counts: &Grid<u32>,
    rect: Rect,
    ok_max: u32,
) -> BlockKind {
    if !is_uniform(raster, rect) {
        return BlockKind::Overloaded;
    }
    let max_count = rect.cells().map(|cell| counts[cell]).max().unwrap_or(0);
    if max_count <= ok_max {
        BlockKind::Ordinary
    } else {
        BlockKind::Multi
    }
}

/// Classify every candidate into ordinary, multi and overloaded lists.
pub fn separate<T: PartialEq>(
    raster: &View<'_, T>,
    counts: &Grid<u32>,
    candidates: impl IntoIterator<Item = Rect>,
    shape: &BlockShape,
) -> Classified {
    let ok_max = shape.ok_max();
    let mut classified = Classified::default();
    for rect in candidates {
        classified.push(classify(raster, counts, rect, ok_max), rect);
    }
    classified
}
