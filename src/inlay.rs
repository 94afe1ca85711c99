//! Capacity-constrained redistribution of one block's quantity.
//!
//! Every valid cell of a block can hold `cell_max`. Part of that is already
//! taken by the constraints grid; the rest is the block's capacity:
//!
//! ```text
//!     capacity = cell_max × valid_cells − (Σ raster + Σ constraints)
//! ```
//!
//! With capacity to spare, the block's raster quantity is wiped and
//! deposited again one `cell_unit` at a time, always into the valid cell
//! whose `raster + constraint` load is lowest (first such cell in row-major
//! order on ties). A unit that does not fit its cell fills it to the brim and
//! the rest moves on to the next least-loaded cell. Nothing is created or
//! lost.
//!
//! Without it the block is *jammed*: every valid cell is filled to
//! `cell_max − constraint` and the returned capacity is the negative excess
//! that could not be placed.
//!
//! # Example
//!
//! ```
//! use zeninlay::{Grid, InlayConfig, InlayOutcome, inlay};
//!
//! let mut raster = Grid::filled(2, 2, 50u8);
//! let constraints = Grid::from_rows([[0u8, 100], [50, 50]]).unwrap();
//! let config = InlayConfig::new(1, 100);
//!
//! let bounds = raster.bounds();
//! let outcome = inlay(
//!     &mut raster.view_mut(bounds).unwrap(),
//!     &constraints.as_view(),
//!     &config,
//! )
//! .unwrap();
//!
//! assert_eq!(outcome, InlayOutcome::Fitted { capacity: 0.0 });
//! assert_eq!(raster.as_slice(), &[100, 0, 50, 50]);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use alloc::collections::BinaryHeap;
use core::cmp::Ordering;

use num_traits::{Float, NumCast, ToPrimitive};

use crate::grid::{GridError, Rect, View, ViewMut};

/// Which grid marks cells excluded from redistribution, and with what value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InvalidCells<T> {
    /// Every cell takes part.
    #[default]
    Disabled,
    /// Raster cells equal to the value are excluded.
    InRaster(T),
    /// Cells whose constraint equals the value are excluded.
    InConstraints(T),
}

/// Unit of the capacity reported by [`inlay`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapacityUnit {
    /// Raw quantity, in the same units as the grids.
    #[default]
    Total,
    /// Raw quantity divided by the number of valid cells.
    PerCell,
}

/// Redistribution parameters.
///
/// ```
/// use zeninlay::{CapacityUnit, InlayConfig, InvalidCells};
///
/// let config = InlayConfig::new(1u8, 100)
///     .invalid_cells(InvalidCells::InConstraints(255))
///     .capacity_unit(CapacityUnit::PerCell);
/// assert_eq!(config.cell_max, 100);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InlayConfig<T> {
    /// Smallest quantity moved at a time.
    pub cell_unit: T,
    /// Capacity of a single cell.
    pub cell_max: T,
    /// Cells excluded from redistribution and capacity accounting.
    pub invalid_cells: InvalidCells<T>,
    /// Unit of the reported capacity.
    pub capacity_unit: CapacityUnit,
}

impl<T> InlayConfig<T> {
    /// Every cell valid, capacity reported as a raw quantity.
    pub const fn new(cell_unit: T, cell_max: T) -> Self {
        Self {
            cell_unit,
            cell_max,
            invalid_cells: InvalidCells::Disabled,
            capacity_unit: CapacityUnit::Total,
        }
    }

    pub fn cell_unit(mut self, cell_unit: T) -> Self {
        self.cell_unit = cell_unit;
        self
    }

    pub fn cell_max(mut self, cell_max: T) -> Self {
        self.cell_max = cell_max;
        self
    }

    pub fn invalid_cells(mut self, invalid_cells: InvalidCells<T>) -> Self {
        self.invalid_cells = invalid_cells;
        self
    }

    pub fn capacity_unit(mut self, capacity_unit: CapacityUnit) -> Self {
        self.capacity_unit = capacity_unit;
        self
    }
}

/// Unit steps of 1 into cells of 100, with constraint cells of 254 masked.
impl<T: From<u8>> Default for InlayConfig<T> {
    fn default() -> Self {
        Self::new(T::from(1), T::from(100)).invalid_cells(InvalidCells::InConstraints(T::from(254)))
    }
}

/// Result of redistributing one region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InlayOutcome {
    /// Quantity redistributed; `capacity >= 0` is what is left.
    Fitted { capacity: f64 },
    /// Not enough room; `capacity < 0` is the quantity that was clipped.
    Jammed { capacity: f64 },
    /// No valid cell in the region; nothing was touched.
    Ignored,
}

impl InlayOutcome {
    /// Remaining capacity, absent for ignored regions.
    pub fn capacity(&self) -> Option<f64> {
        match *self {
            Self::Fitted { capacity } | Self::Jammed { capacity } => Some(capacity),
            Self::Ignored => None,
        }
    }
}

/// Redistribution error. Coordinates are absolute in the backing grid.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum InlayError {
    /// Valid raster cells hold more than one value.
    #[error("region {region:?} holds more than one raster value")]
    MultiValued { region: Rect },
    /// A valid cell is already over capacity from its constraint alone.
    #[error("constraint {value} at ({row},{col}) exceeds cell capacity {cell_max}")]
    ConstraintOverCapacity {
        row: usize,
        col: usize,
        value: f64,
        cell_max: f64,
    },
    /// Quantity is left to deposit but every cell is full.
    #[error("deposit at ({row},{col}) would exceed cell capacity {cell_max}")]
    CeilingExceeded {
        row: usize,
        col: usize,
        cell_max: f64,
    },
    /// `cell_unit` or `cell_max` is not a positive number.
    #[error("cell unit and cell capacity must be positive")]
    InvalidConfig,
    /// A value cannot be represented in the grid's element type.
    #[error("value {value} at ({row},{col}) is not representable in the grid")]
    NotRepresentable { row: usize, col: usize, value: f64 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A valid cell: local position and constraint load.
#[derive(Copy, Clone, Debug)]
struct Cell {
    row: usize,
    col: usize,
    load: f64,
}

/// Redistribute the quantity of `raster` within its own region.
///
/// `raster` and `constraints` are views of the same shape. The raster view
/// is only written to once every new value is known, so an error leaves it
/// untouched.
pub fn inlay<T: NumCast + Copy + PartialEq>(
    raster: &mut ViewMut<'_, T>,
    constraints: &View<'_, T>,
    config: &InlayConfig<T>,
) -> Result<InlayOutcome, InlayError> {
    let region = raster.rect();
    let shape = (raster.height(), raster.width());
    if (constraints.height(), constraints.width()) != shape {
        return Err(GridError::ShapeMismatch {
            expected: shape,
            found: (constraints.height(), constraints.width()),
        }
        .into());
    }

    let cell_unit = config.cell_unit.to_f64().ok_or(InlayError::InvalidConfig)?;
    let cell_max = config.cell_max.to_f64().ok_or(InlayError::InvalidConfig)?;
    if !(cell_unit > 0.0 && cell_max > 0.0) {
        return Err(InlayError::InvalidConfig);
    }

    let mut cells = Vec::new();
    let mut block_value = None;
    for (row, col) in Rect::new(0, 0, shape.0, shape.1).cells() {
        let value = *raster.get(row, col);
        let constraint = *constraints.get(row, col);
        let valid = match config.invalid_cells {
            InvalidCells::Disabled => true,
            InvalidCells::InRaster(marker) => value != marker,
            InvalidCells::InConstraints(marker) => constraint != marker,
        };
        if !valid {
            continue;
        }
        match block_value {
            None => block_value = Some(value),
            Some(first) if first != value => return Err(InlayError::MultiValued { region }),
            Some(_) => {}
        }
        let load = to_f64(constraint, region, row, col)?;
        if load > cell_max {
            return Err(InlayError::ConstraintOverCapacity {
                row: region.row + row,
                col: region.col + col,
                value: load,
                cell_max,
            });
        }
        cells.push(Cell { row, col, load });
    }

    let Some(block_value) = block_value else {
        return Ok(InlayOutcome::Ignored);
    };
    let (first_row, first_col) = (cells[0].row, cells[0].col);
    let block_value = to_f64(block_value, region, first_row, first_col)?;

    let valid = cells.len() as f64;
    let raster_total = block_value * valid;
    let constraint_total: f64 = cells.iter().map(|c| c.load).sum();
    let form_max = cell_max * valid;
    let capacity = form_max - (raster_total + constraint_total);

    if raster_total > form_max {
        log::warn!(
            "region {region:?}: quantity {raster_total} exceeds the form capacity {form_max} even without constraints"
        );
    }

    let jammed = capacity < 0.0;
    let new_values = if jammed {
        log::warn!("region {region:?}: jammed, {} could not be placed", -capacity);
        cells.iter().map(|c| cell_max - c.load).collect()
    } else {
        fill(&cells, raster_total, cell_unit, cell_max, region)?
    };

    let converted = cells
        .iter()
        .zip(&new_values)
        .map(|(cell, &value)| {
            T::from(value).ok_or(InlayError::NotRepresentable {
                row: region.row + cell.row,
                col: region.col + cell.col,
                value,
            })
        })
        .collect::<Result<Vec<T>, _>>()?;
    for (cell, value) in cells.iter().zip(converted) {
        raster.set(cell.row, cell.col, value);
    }

    let capacity = match config.capacity_unit {
        CapacityUnit::Total => capacity,
        CapacityUnit::PerCell => capacity / valid,
    };
    Ok(if jammed {
        InlayOutcome::Jammed { capacity }
    } else {
        InlayOutcome::Fitted { capacity }
    })
}

/// A cell in the fill queue. Orders so that the lowest load, then the
/// lowest index, is the heap's maximum.
#[derive(Copy, Clone, Debug)]
struct Slot {
    load: f64,
    index: usize,
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .load
            .total_cmp(&self.load)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Slot {}

/// Deposit `total` over `cells`, a unit at a time, least-loaded cell first.
///
/// A trailing remainder smaller than one unit goes to the next least-loaded
/// cell. A step larger than the room left in its cell tops that cell up and
/// carries the rest on to the next least-loaded cell. Returns the deposit per
/// cell.
fn fill(
    cells: &[Cell],
    total: f64,
    cell_unit: f64,
    cell_max: f64,
    region: Rect,
) -> Result<Vec<f64>, InlayError> {
    let mut queue: BinaryHeap<Slot> = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| Slot {
            load: cell.load,
            index,
        })
        .collect();
    let mut deposits = alloc::vec![0.0; cells.len()];

    let units = Float::floor(total / cell_unit);
    let remainder = total - units * cell_unit;
    let steps = (0..units as u64)
        .map(|_| cell_unit)
        .chain((remainder > 0.0).then_some(remainder));

    for amount in steps {
        let mut pending = amount;
        while pending > 0.0 {
            let Some(mut slot) = queue.peek_mut() else {
                break;
            };
            let room = cell_max - slot.load;
            // The least-loaded cell is full, so every cell is.
            if room <= 0.0 {
                let cell = cells[slot.index];
                return Err(InlayError::CeilingExceeded {
                    row: region.row + cell.row,
                    col: region.col + cell.col,
                    cell_max,
                });
            }
            let placed = pending.min(room);
            slot.load += placed;
            deposits[slot.index] += placed;
            pending -= placed;
        }
    }
    Ok(deposits)
}

fn to_f64<T: ToPrimitive>(value: T, region: Rect, row: usize, col: usize) -> Result<f64, InlayError> {
    value.to_f64().ok_or(InlayError::NotRepresentable {
        row: region.row + row,
        col: region.col + col,
        value: f64::NAN,
    })
}
