//! Owned 2D grids, rectangles, and region views into them.
//!
//! A [`Grid`] is a row-major buffer addressed by `(row, col)`. Regions are
//! windows ([`View`], [`ViewMut`]) over that single buffer: they carry an
//! offset and a shape and never copy cells. All in-place mutation of a region
//! goes through [`ViewMut`], so the borrow checker keeps region writers
//! exclusive.
//!
//! # Example
//!
//! ```
//! use zeninlay::{Grid, Rect};
//!
//! let mut grid = Grid::filled(4, 5, 0u8);
//! let mut region = grid.view_mut(Rect::new(1, 2, 2, 3)).unwrap();
//! region.set(0, 0, 7);
//! assert_eq!(grid[(1, 2)], 7);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::ops::{Index, IndexMut};

/// Axis-aligned rectangle in cell coordinates.
///
/// `row`/`col` address the top-left cell; `height`/`width` are extents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// Rect with top-left corner `start` and extents `shape`, both `(rows, cols)`.
    pub const fn from_start_shape(start: (usize, usize), shape: (usize, usize)) -> Self {
        Self::new(start.0, start.1, shape.0, shape.1)
    }

    /// Translate by `(rows, cols)`.
    ///
    /// Used to bring a rect found inside another region back to the
    /// coordinates of the enclosing grid.
    pub const fn offset(self, rows: usize, cols: usize) -> Self {
        Self::new(self.row + rows, self.col + cols, self.height, self.width)
    }

    /// Grow by `padding` cells on every side, clamped to a `height × width` grid.
    pub fn pad(self, padding: usize, height: usize, width: usize) -> Self {
        let row = self.row.saturating_sub(padding);
        let col = self.col.saturating_sub(padding);
        let bottom = self.bottom().saturating_add(padding).min(height);
        let right = self.right().saturating_add(padding).min(width);
        Self::new(
            row,
            col,
            bottom.saturating_sub(row),
            right.saturating_sub(col),
        )
    }

    /// One past the last row, saturating at `usize::MAX`.
    pub const fn bottom(&self) -> usize {
        self.row.saturating_add(self.height)
    }

    /// One past the last column, saturating at `usize::MAX`.
    pub const fn right(&self) -> usize {
        self.col.saturating_add(self.width)
    }

    /// Number of cells covered.
    pub const fn area(&self) -> usize {
        self.height * self.width
    }

    pub const fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Whether `(row, col)` lies inside this rect.
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.bottom() && col >= self.col && col < self.right()
    }

    /// Whether the two rects share at least one cell.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.row < other.bottom()
            && other.row < self.bottom()
            && self.col < other.right()
            && other.col < self.right()
    }

    /// Whether this rect lies entirely inside a `height × width` grid.
    pub const fn fits_within(&self, height: usize, width: usize) -> bool {
        let bottom_fits = match self.row.checked_add(self.height) {
            Some(bottom) => bottom <= height,
            None => false,
        };
        let right_fits = match self.col.checked_add(self.width) {
            Some(right) => right <= width,
            None => false,
        };
        bottom_fits && right_fits
    }

    /// Absolute coordinates of every covered cell, row-major.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.row..self.bottom()).flat_map(move |r| (self.col..self.right()).map(move |c| (r, c)))
    }
}

/// Grid construction or windowing error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Buffer length does not match `height × width`.
    #[error("grid of {height}x{width} needs {expected} cells, got {found}")]
    CellCount {
        height: usize,
        width: usize,
        expected: usize,
        found: usize,
    },
    /// Row `row` has a different length than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A window does not fit inside the grid.
    #[error("region {rect:?} exceeds grid of {height}x{width}")]
    OutOfBounds {
        rect: Rect,
        height: usize,
        width: usize,
    },
    /// Two grids that must share a shape do not.
    #[error("grid shapes differ: {expected:?} vs {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Owned row-major 2D grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap a row-major buffer.
    pub fn from_vec(height: usize, width: usize, cells: Vec<T>) -> Result<Self, GridError> {
        let expected = height * width;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                height,
                width,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Build from a list of equally long rows.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, GridError>
    where
        R: IntoIterator<Item = T>,
    {
        let mut cells = Vec::new();
        let mut height = 0;
        let mut width = 0;
        for (row, values) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(values);
            let found = cells.len() - before;
            if row == 0 {
                width = found;
            } else if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            height += 1;
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Rect covering the whole grid.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.height, self.width)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.height && col < self.width {
            self.cells.get_mut(row * self.width + col)
        } else {
            None
        }
    }

    /// Cells in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            height: self.height,
            width: self.width,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Shared window over `rect`.
    pub fn view(&self, rect: Rect) -> Result<View<'_, T>, GridError> {
        self.check(rect)?;
        Ok(View { grid: self, rect })
    }

    /// Shared window over the whole grid.
    pub fn as_view(&self) -> View<'_, T> {
        View {
            grid: self,
            rect: self.bounds(),
        }
    }

    /// Exclusive window over `rect`.
    pub fn view_mut(&mut self, rect: Rect) -> Result<ViewMut<'_, T>, GridError> {
        self.check(rect)?;
        Ok(ViewMut { grid: self, rect })
    }

    /// Error unless `other` has the same shape.
    pub fn ensure_same_shape<U>(&self, other: &Grid<U>) -> Result<(), GridError> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }

    fn check(&self, rect: Rect) -> Result<(), GridError> {
        if rect.fits_within(self.height, self.width) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                rect,
                height: self.height,
                width: self.width,
            })
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Grid of `height × width` copies of `value`.
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            height,
            width,
            cells: alloc::vec![value; height * width],
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.height && col < self.width,
            "({row},{col}) out of bounds {}x{}",
            self.height,
            self.width
        );
        &self.cells[row * self.width + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.height && col < self.width,
            "({row},{col}) out of bounds {}x{}",
            self.height,
            self.width
        );
        &mut self.cells[row * self.width + col]
    }
}

/// Shared window into a [`Grid`]. Coordinates are local to the window.
#[derive(Debug)]
pub struct View<'a, T> {
    grid: &'a Grid<T>,
    rect: Rect,
}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for View<'_, T> {}

impl<'a, T> View<'a, T> {
    pub fn height(&self) -> usize {
        self.rect.height
    }

    pub fn width(&self) -> usize {
        self.rect.width
    }

    /// Window position in the backing grid.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Cell at local `(row, col)`. Panics outside the window.
    pub fn get(&self, row: usize, col: usize) -> &'a T {
        assert!(
            row < self.rect.height && col < self.rect.width,
            "({row},{col}) outside view {:?}",
            self.rect
        );
        &self.grid[(self.rect.row + row, self.rect.col + col)]
    }

    /// Window over `rect`, given in this view's local coordinates.
    pub fn sub(&self, rect: Rect) -> Result<View<'a, T>, GridError> {
        if !rect.fits_within(self.rect.height, self.rect.width) {
            return Err(GridError::OutOfBounds {
                rect,
                height: self.rect.height,
                width: self.rect.width,
            });
        }
        Ok(View {
            grid: self.grid,
            rect: rect.offset(self.rect.row, self.rect.col),
        })
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + use<'a, T> {
        let grid = self.grid;
        self.rect.cells().map(move |(r, c)| &grid[(r, c)])
    }
}

/// Exclusive window into a [`Grid`]. Coordinates are local to the window.
#[derive(Debug)]
pub struct ViewMut<'a, T> {
    grid: &'a mut Grid<T>,
    rect: Rect,
}

impl<T> ViewMut<'_, T> {
    pub fn height(&self) -> usize {
        self.rect.height
    }

    pub fn width(&self) -> usize {
        self.rect.width
    }

    /// Window position in the backing grid.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Cell at local `(row, col)`. Panics outside the window.
    pub fn get(&self, row: usize, col: usize) -> &T {
        assert!(
            row < self.rect.height && col < self.rect.width,
            "({row},{col}) outside view {:?}",
            self.rect
        );
        &self.grid[(self.rect.row + row, self.rect.col + col)]
    }

    /// Overwrite the cell at local `(row, col)`. Panics outside the window.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.rect.height && col < self.rect.width,
            "({row},{col}) outside view {:?}",
            self.rect
        );
        self.grid[(self.rect.row + row, self.rect.col + col)] = value;
    }

    /// Reborrow as a shared view of the same window.
    pub fn as_view(&self) -> View<'_, T> {
        View {
            grid: self.grid,
            rect: self.rect,
        }
    }

    /// Overwrite the window row-major from `values`.
    ///
    /// Stops early if `values` runs out.
    pub fn apply(&mut self, values: impl IntoIterator<Item = T>) {
        for ((r, c), value) in self.rect.cells().zip(values) {
            self.grid[(r, c)] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rect ────────────────────────────────────────────────────────────

    #[test]
    fn rect_offset_translates_start_only() {
        let r = Rect::new(1, 2, 3, 4).offset(10, 20);
        assert_eq!(r, Rect::new(11, 22, 3, 4));
    }

    #[test]
    fn rect_pad_clamps_to_grid() {
        let r = Rect::new(1, 0, 2, 2).pad(2, 5, 3);
        assert_eq!(r, Rect::new(0, 0, 5, 3));
        let inner = Rect::new(3, 3, 1, 1).pad(1, 10, 10);
        assert_eq!(inner, Rect::new(2, 2, 3, 3));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 3, 3);
        assert!(a.intersects(&Rect::new(2, 2, 3, 3)));
        assert!(!a.intersects(&Rect::new(3, 0, 1, 3)));
        assert!(!a.intersects(&Rect::new(0, 3, 3, 1)));
        assert!(!a.intersects(&Rect::new(1, 1, 0, 4)));
        assert!(!a.intersects(&Rect::new(usize::MAX, 0, 2, 2)));
    }

    #[test]
    fn rect_near_usize_max_never_fits() {
        assert!(!Rect::new(usize::MAX, 0, 2, 1).fits_within(4, 4));
        assert!(!Rect::new(0, usize::MAX - 1, 1, 3).fits_within(4, 4));
        assert!(!Rect::new(1, 1, usize::MAX, 1).fits_within(usize::MAX, usize::MAX));
        assert_eq!(Rect::new(usize::MAX, 0, 2, 1).bottom(), usize::MAX);
    }

    #[test]
    fn rect_cells_row_major() {
        let cells: Vec<_> = Rect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    // ── Grid ────────────────────────────────────────────────────────────

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(2, 3, vec![0; 6]).is_ok());
        assert_eq!(
            Grid::from_vec(2, 3, vec![0; 5]),
            Err(GridError::CellCount {
                height: 2,
                width: 3,
                expected: 6,
                found: 5
            })
        );
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = Grid::from_rows([vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn view_out_of_bounds() {
        let grid = Grid::filled(3, 3, 0u8);
        assert!(grid.view(Rect::new(1, 1, 2, 2)).is_ok());
        assert!(matches!(
            grid.view(Rect::new(2, 2, 2, 1)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.view(Rect::new(usize::MAX, 0, 2, 1)),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn sub_view_composes_offsets() {
        let grid = Grid::from_rows([[0, 1, 2], [3, 4, 5], [6, 7, 8]]).unwrap();
        let view = grid.view(Rect::new(1, 0, 2, 3)).unwrap();
        let sub = view.sub(Rect::new(0, 1, 2, 2)).unwrap();
        assert_eq!(sub.rect(), Rect::new(1, 1, 2, 2));
        assert_eq!(*sub.get(1, 1), 8);
        let all: Vec<_> = sub.iter().copied().collect();
        assert_eq!(all, vec![4, 5, 7, 8]);
    }

    #[test]
    fn view_mut_writes_into_backing_grid() {
        let mut grid = Grid::filled(3, 4, 0u8);
        {
            let mut region = grid.view_mut(Rect::new(1, 1, 2, 2)).unwrap();
            region.apply([1, 2, 3, 4]);
            region.set(0, 0, 9);
        }
        assert_eq!(
            grid.as_slice(),
            &[0, 0, 0, 0, 0, 9, 2, 0, 0, 3, 4, 0]
        );
    }

    #[test]
    fn shape_mismatch() {
        let a = Grid::filled(2, 2, 0u8);
        let b = Grid::filled(2, 3, 0u8);
        assert!(a.ensure_same_shape(&a.clone()).is_ok());
        assert_eq!(
            a.ensure_same_shape(&b),
            Err(GridError::ShapeMismatch {
                expected: (2, 2),
                found: (2, 3)
            })
        );
    }
}
