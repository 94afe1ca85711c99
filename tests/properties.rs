//! Property-based tests for partition and redistribution invariants.

use proptest::prelude::*;
use zeninlay::split::splittable;
use zeninlay::*;

const MARKER: u16 = 255;
const CELL_MAX: u16 = 100;

fn raster_strategy() -> impl Strategy<Value = Grid<u8>> {
    (1usize..10, 1usize..10).prop_flat_map(|(h, w)| {
        prop::collection::vec(0u8..4, h * w).prop_map(move |cells| Grid::from_vec(h, w, cells).unwrap())
    })
}

fn shape_strategy() -> impl Strategy<Value = BlockShape> {
    (1usize..5, 1usize..5, 0usize..3).prop_map(|(h, w, t)| BlockShape::new(h, w).tolerance(t))
}

/// Constraints in `0..=CELL_MAX`, some cells marked invalid.
fn constraints_strategy() -> impl Strategy<Value = Grid<u16>> {
    (1usize..7, 1usize..7).prop_flat_map(|(h, w)| {
        prop::collection::vec(prop_oneof![4 => 0u16..=CELL_MAX, 1 => Just(MARKER)], h * w)
            .prop_map(move |cells| Grid::from_vec(h, w, cells).unwrap())
    })
}

fn config() -> InlayConfig<u16> {
    InlayConfig::new(1, CELL_MAX).invalid_cells(InvalidCells::InConstraints(MARKER))
}

fn run(raster: &mut Grid<u16>, constraints: &Grid<u16>) -> Result<InlayOutcome, InlayError> {
    let bounds = raster.bounds();
    let mut view = raster.view_mut(bounds).unwrap();
    inlay(&mut view, &constraints.as_view(), &config())
}

fn valid_sum(raster: &Grid<u16>, constraints: &Grid<u16>) -> u32 {
    raster
        .as_slice()
        .iter()
        .zip(constraints.as_slice())
        .filter(|&(_, &c)| c != MARKER)
        .map(|(&v, _)| u32::from(v))
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every non-sentinel cell lies in exactly one uniform block.
    #[test]
    fn partition_covers_each_cell_once(raster in raster_strategy(), shape in shape_strategy()) {
        let blocks = find_blocks(&raster, &shape, 0).unwrap();
        let mut cover = Grid::filled(raster.height(), raster.width(), 0u32);
        for block in &blocks {
            let value = raster[(block.rect.row, block.rect.col)];
            for cell in block.rect.cells() {
                prop_assert_eq!(raster[cell], value);
                cover[cell] += 1;
            }
        }
        for cell in raster.bounds().cells() {
            prop_assert_eq!(cover[cell], u32::from(raster[cell] != 0));
        }
    }

    /// Split pieces stay within the nominal shape plus tolerance.
    #[test]
    fn split_pieces_within_tolerance(raster in raster_strategy(), shape in shape_strategy()) {
        let blocks = find_blocks(&raster, &shape, 0).unwrap();
        for block in blocks.iter().filter(|b| b.origin == Origin::Split) {
            prop_assert!(block.rect.height <= shape.height + shape.tolerance);
            prop_assert!(block.rect.width <= shape.width + shape.tolerance);
        }
    }

    /// Blocks taken as found never exceed the classification bound.
    #[test]
    fn found_blocks_within_ok_max(raster in raster_strategy(), shape in shape_strategy()) {
        let blocks = find_blocks(&raster, &shape, 0).unwrap();
        let ok_max = shape.ok_max() as usize;
        for block in blocks.iter().filter(|b| b.origin == Origin::Found) {
            prop_assert!(block.rect.height + block.rect.width - 1 <= ok_max);
        }
    }

    /// Pieces of a trimmed multi-block tile it, each axis between the nominal
    /// extent and the tolerance above it, unless that axis was short to
    /// begin with.
    #[test]
    fn split_pieces_bounded_both_ways(
        height in 1usize..30,
        width in 1usize..30,
        shape in shape_strategy(),
    ) {
        let rect = splittable(Rect::new(2, 3, height, width), &shape);
        let pieces = split_multiblock(rect, &shape).unwrap();
        prop_assert_eq!(pieces.iter().map(Rect::area).sum::<usize>(), rect.area());
        prop_assert!(disjoint(&pieces));
        for piece in &pieces {
            prop_assert!(piece.bottom() <= rect.bottom() && piece.right() <= rect.right());
            if rect.height >= shape.height {
                prop_assert!(piece.height >= shape.height);
                prop_assert!(piece.height <= shape.height + shape.tolerance);
            } else {
                prop_assert_eq!(piece.height, rect.height);
            }
            if rect.width >= shape.width {
                prop_assert!(piece.width >= shape.width);
                prop_assert!(piece.width <= shape.width + shape.tolerance);
            } else {
                prop_assert_eq!(piece.width, rect.width);
            }
        }
    }

    /// Any unit and ceiling: a region with room keeps its quantity and no
    /// cell goes over capacity.
    #[test]
    fn fitted_with_any_unit(
        constraints in constraints_strategy(),
        value in 0u16..=CELL_MAX,
        unit in 1u16..=40,
        cell_max in 1u16..=CELL_MAX,
    ) {
        let constraints = constraints.map(|&c| if c == MARKER { 0 } else { c.min(cell_max) });
        let mut raster = Grid::filled(constraints.height(), constraints.width(), value);
        let before = valid_sum(&raster, &constraints);
        let bounds = raster.bounds();
        let mut view = raster.view_mut(bounds).unwrap();
        let outcome = inlay(&mut view, &constraints.as_view(), &InlayConfig::new(unit, cell_max)).unwrap();
        if !matches!(outcome, InlayOutcome::Fitted { .. }) {
            return Ok(());
        }
        prop_assert_eq!(valid_sum(&raster, &constraints), before);
        for (&v, &c) in raster.as_slice().iter().zip(constraints.as_slice()) {
            prop_assert!(v + c <= cell_max);
        }
    }

    /// A fitted region keeps its quantity and no cell exceeds capacity.
    #[test]
    fn fitted_conserves_and_respects_ceiling(
        constraints in constraints_strategy(),
        value in 0u16..=CELL_MAX,
    ) {
        let mut raster = Grid::filled(constraints.height(), constraints.width(), value);
        let before = valid_sum(&raster, &constraints);
        let outcome = run(&mut raster, &constraints).unwrap();
        if !matches!(outcome, InlayOutcome::Fitted { .. }) {
            return Ok(());
        }

        prop_assert_eq!(valid_sum(&raster, &constraints), before);
        for (&v, &c) in raster.as_slice().iter().zip(constraints.as_slice()) {
            if c != MARKER {
                prop_assert!(v + c <= CELL_MAX);
            }
        }
    }

    /// A jammed region fills every valid cell to the brim, and the negative
    /// capacity accounts for what was clipped.
    #[test]
    fn jammed_fills_to_capacity(
        constraints in constraints_strategy(),
        value in 0u16..=CELL_MAX,
    ) {
        let mut raster = Grid::filled(constraints.height(), constraints.width(), value);
        let before = valid_sum(&raster, &constraints);
        let outcome = run(&mut raster, &constraints).unwrap();
        let InlayOutcome::Jammed { capacity } = outcome else {
            return Ok(());
        };

        prop_assert!(capacity < 0.0);
        for (&v, &c) in raster.as_slice().iter().zip(constraints.as_slice()) {
            if c != MARKER {
                prop_assert_eq!(v, CELL_MAX - c);
            }
        }
        let after = f64::from(valid_sum(&raster, &constraints));
        prop_assert_eq!(f64::from(before), after - capacity);
    }

    /// Invalid cells are never written, whatever the outcome.
    #[test]
    fn invalid_cells_untouched(
        constraints in constraints_strategy(),
        value in 0u16..=CELL_MAX,
    ) {
        let mut raster = Grid::filled(constraints.height(), constraints.width(), value);
        let outcome = run(&mut raster, &constraints).unwrap();
        for (&v, &c) in raster.as_slice().iter().zip(constraints.as_slice()) {
            if c == MARKER {
                prop_assert_eq!(v, value);
            }
        }
        if constraints.as_slice().iter().all(|&c| c == MARKER) {
            prop_assert_eq!(outcome, InlayOutcome::Ignored);
        }
    }
}
