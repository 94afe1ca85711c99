//! Resolving overloaded candidates.
//!
//! An overloaded candidate holds its value `v` on the top row and left
//! column but other values inside. Counting runs again inside the rectangle,
//! with `v` as the local outvalue, exposes the inner blocks:
//!
//! ```text
//!     v v v v v      top strip: rows above the first inner start
//!     v a a b b
//!     v a a b b      left strip: columns left of the leftmost inner start,
//!     v c c c v                  below the top strip
//! ```
//!
//! Both strips hold `v` only and leave as multi-blocks. Every inner
//! candidate is classified on its own; inner overloaded candidates go back
//! onto the worklist. `v` cells inside the inner area are left for the next
//! partition pass.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::blocks::{BlockShape, Candidates, Classified, classify};
use crate::counts::run_counts;
use crate::grid::{Rect, View};

/// Split one overloaded rectangle of `live` into classified rectangles.
///
/// `live` holds `None` for sentinel and already-consumed cells. Returned
/// rects are in `live`'s coordinates.
pub fn split_overloaded<T: Copy + PartialEq>(
    live: &View<'_, Option<T>>,
    rect: Rect,
    shape: &BlockShape,
) -> Classified {
    let mut classified = Classified::default();
    let Ok(local) = live.sub(rect) else {
        return classified;
    };
    if rect.is_empty() {
        return classified;
    }
    let value = *local.get(0, 0);
    let counts = run_counts(&local, &value);
    let inner: Vec<Rect> = Candidates::new(local, &counts).collect();

    // Minimum row and column are taken independently, so the order in which
    // starts are found cannot move the strips.
    let (Some(top), Some(left)) = (
        inner.iter().map(|r| r.row).min(),
        inner.iter().map(|r| r.col).min(),
    ) else {
        // Nothing but `value` inside: the whole rect is one uniform block.
        classified.multi.push(rect);
        return classified;
    };

    let top_strip = Rect::new(rect.row, rect.col, top, rect.width);
    let left_strip = Rect::new(rect.row + top, rect.col, rect.height - top, left);
    for strip in [top_strip, left_strip] {
        if !strip.is_empty() {
            classified.multi.push(strip);
        }
    }

    let ok_max = shape.ok_max();
    for candidate in inner {
        if local.get(candidate.row, candidate.col).is_none() {
            continue;
        }
        let kind = classify(&local, &counts, candidate, ok_max);
        classified.push(kind, candidate.offset(rect.row, rect.col));
    }
    classified
}

/// Resolve overloaded rectangles until none remain.
///
/// Works through an explicit stack: inner overloaded rects found while
/// resolving are pushed back and resolved in turn. Each inner rect lies
/// strictly inside its parent, so the stack drains. The returned
/// `overloaded` list is always empty.
pub fn resolve_overloaded<T: Copy + PartialEq>(
    live: &View<'_, Option<T>>,
    overloaded: impl IntoIterator<Item = Rect>,
    shape: &BlockShape,
) -> Classified {
    let mut resolved = Classified::default();
    let mut pending: Vec<Rect> = overloaded.into_iter().collect();
    while let Some(rect) = pending.pop() {
        let found = split_overloaded(live, rect, shape);
        resolved.ordinary.extend(found.ordinary);
        resolved.multi.extend(found.multi);
        pending.extend(found.overloaded);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn live(rows: &[&[u8]], outvalue: u8) -> Grid<Option<u8>> {
        Grid::from_rows(
            rows.iter()
                .map(move |r| r.iter().map(move |&v| (v != outvalue).then_some(v))),
        )
        .unwrap()
    }

    #[test]
    fn strips_and_inner_block() {
        let g = live(&[&[5, 5, 5], &[5, 7, 7], &[5, 7, 7]], 0);
        let found = split_overloaded(&g.as_view(), Rect::new(0, 0, 3, 3), &BlockShape::new(2, 2));
        assert_eq!(found.multi, [Rect::new(0, 0, 1, 3), Rect::new(1, 0, 2, 1)]);
        assert_eq!(found.ordinary, [Rect::new(1, 1, 2, 2)]);
        assert!(found.overloaded.is_empty());
    }

    #[test]
    fn offsets_back_to_absolute_coordinates() {
        let g = live(
            &[
                &[0, 0, 0, 0, 0],
                &[0, 5, 5, 5, 5],
                &[0, 5, 5, 8, 8],
                &[0, 5, 5, 8, 8],
            ],
            0,
        );
        let found = split_overloaded(&g.as_view(), Rect::new(1, 1, 3, 4), &BlockShape::new(2, 2));
        assert_eq!(found.multi, [Rect::new(1, 1, 1, 4), Rect::new(2, 1, 2, 2)]);
        assert_eq!(found.ordinary, [Rect::new(2, 3, 2, 2)]);
    }

    #[test]
    fn sentinel_starts_are_skipped() {
        let g = live(&[&[5, 5, 5], &[5, 0, 0], &[5, 0, 9]], 0);
        let found = split_overloaded(&g.as_view(), Rect::new(0, 0, 3, 3), &BlockShape::new(2, 2));
        assert_eq!(found.multi, [Rect::new(0, 0, 1, 3), Rect::new(1, 0, 2, 1)]);
        assert_eq!(found.ordinary, [Rect::new(2, 2, 1, 1)]);
        assert!(found.overloaded.is_empty());
    }

    #[test]
    fn nested_overload_resolves_to_fixed_point() {
        let g = live(
            &[
                &[1, 1, 1, 1, 1],
                &[1, 2, 2, 2, 2],
                &[1, 2, 3, 3, 3],
                &[1, 2, 3, 3, 3],
            ],
            0,
        );
        let view = g.as_view();
        let shape = BlockShape::new(2, 2);
        let first = split_overloaded(&view, Rect::new(0, 0, 4, 5), &shape);
        assert_eq!(first.overloaded, [Rect::new(1, 1, 3, 4)]);

        let resolved = resolve_overloaded(&view, [Rect::new(0, 0, 4, 5)], &shape);
        assert!(resolved.overloaded.is_empty());
        assert!(resolved.ordinary.contains(&Rect::new(2, 2, 2, 3)));
        assert!(resolved.multi.contains(&Rect::new(0, 0, 1, 5)));
        assert!(resolved.multi.contains(&Rect::new(1, 1, 1, 4)));
        assert!(resolved.multi.contains(&Rect::new(2, 1, 2, 1)));
    }

    #[test]
    fn uniform_rect_falls_back_to_multi() {
        let g = live(&[&[4, 4], &[4, 4]], 0);
        let found = split_overloaded(&g.as_view(), Rect::new(0, 0, 2, 2), &BlockShape::new(1, 1));
        assert_eq!(found.multi, [Rect::new(0, 0, 2, 2)]);
        assert!(found.ordinary.is_empty());
    }
}
