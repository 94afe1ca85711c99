//! Redistribution over many regions of one raster.
//!
//! [`imprint_constraints`] runs [`inlay`] on each region in turn, against
//! the matching region of the constraints grid. A region that fails is
//! recorded and left as it was; the others proceed.

use alloc::collections::BTreeMap;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use num_traits::NumCast;

use crate::grid::{Grid, GridError, Rect};
use crate::inlay::{InlayConfig, InlayError, InlayOutcome, inlay};

/// Region indices by outcome, in region order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlayReport {
    /// Redistributed within capacity.
    pub ok: Vec<usize>,
    /// Clipped to capacity.
    pub jammed: Vec<usize>,
    /// No valid cell.
    pub ignored: Vec<usize>,
    /// Rejected with an error; see [`Imprint::errors`].
    pub failed: Vec<usize>,
}

impl InlayReport {
    /// Number of regions processed.
    pub fn len(&self) -> usize {
        self.ok.len() + self.jammed.len() + self.ignored.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything [`imprint_constraints`] learned about the regions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Imprint {
    pub report: InlayReport,
    /// Capacity of every fitted or jammed region, by region index.
    pub capacities: BTreeMap<usize, f64>,
    /// Error of every failed region, by region index.
    pub errors: BTreeMap<usize, InlayError>,
}

/// Redistribute each region of `raster` around `constraints`.
///
/// Region indices in the result follow the iteration order of `regions`.
/// Regions should be disjoint (see [`disjoint`]); overlapping regions are
/// processed in order, each seeing the writes of those before it.
///
/// Only a grid mismatch aborts the whole run. A region that does not fit the
/// grid fails on its own with [`InlayError::Grid`].
pub fn imprint_constraints<T: NumCast + Copy + PartialEq>(
    raster: &mut Grid<T>,
    constraints: &Grid<T>,
    regions: impl IntoIterator<Item = Rect>,
    config: &InlayConfig<T>,
) -> Result<Imprint, GridError> {
    raster.ensure_same_shape(constraints)?;

    let mut imprint = Imprint::default();
    for (index, rect) in regions.into_iter().enumerate() {
        match inlay_region(raster, constraints, rect, config) {
            Ok(InlayOutcome::Fitted { capacity }) => {
                imprint.report.ok.push(index);
                imprint.capacities.insert(index, capacity);
            }
            Ok(InlayOutcome::Jammed { capacity }) => {
                imprint.report.jammed.push(index);
                imprint.capacities.insert(index, capacity);
            }
            Ok(InlayOutcome::Ignored) => {
                log::trace!("region {index} {rect:?}: no valid cells");
                imprint.report.ignored.push(index);
            }
            Err(error) => {
                log::warn!("region {index} {rect:?}: {error}");
                imprint.report.failed.push(index);
                imprint.errors.insert(index, error);
            }
        }
    }

    let report = &imprint.report;
    log::debug!(
        "imprinted {} regions: {} ok, {} jammed, {} ignored, {} failed",
        report.len(),
        report.ok.len(),
        report.jammed.len(),
        report.ignored.len(),
        report.failed.len()
    );
    Ok(imprint)
}

fn inlay_region<T: NumCast + Copy + PartialEq>(
    raster: &mut Grid<T>,
    constraints: &Grid<T>,
    rect: Rect,
    config: &InlayConfig<T>,
) -> Result<InlayOutcome, InlayError> {
    let limits = constraints.view(rect)?;
    let mut target = raster.view_mut(rect)?;
    inlay(&mut target, &limits, config)
}

/// Whether no two regions share a cell.
pub fn disjoint(regions: &[Rect]) -> bool {
    regions
        .iter()
        .enumerate()
        .all(|(i, a)| regions[i + 1..].iter().all(|b| !a.intersects(b)))
}
