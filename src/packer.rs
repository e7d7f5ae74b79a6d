//! The iterative packing search: size a candidate area, run a full placement
//! attempt over a fresh matrix, adjust the candidate from the outcome, and
//! keep the smallest bounding box any attempt produced.

use std::borrow::Borrow;

use crate::{
    error::PackError,
    geometry::Rect,
    matrix::{Extent, PackingMatrix},
    types::{InputItem, OutputItem, PackOutput, PackRect},
};

/// Greedy rectangle packer over a splittable occupancy grid.
///
/// The search starts from an unbounded strip exactly as tall as the tallest
/// rectangle, then alternates between pulling the candidate width in after
/// successful attempts and growing the candidate height after failed ones.
/// The result is the smallest bounding box seen across all attempts, which is
/// close to, but not guaranteed to be, the minimal one.
pub struct GridPacker {
    max_attempts: u32,
}

impl GridPacker {
    pub fn new() -> Self {
        Self { max_attempts: 1000 }
    }

    /// Overrides how many placement attempts the search may spend before
    /// settling for the best packing found so far.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Packs the given items and returns their placements together with the
    /// bounding box they all fit in.
    ///
    /// Accepts anything that can turn into an iterator of `InputItem` or
    /// `&InputItem`. The inputs are not mutated; placements are reported on
    /// the returned [`PackOutput`](struct.PackOutput.html).
    pub fn pack<I>(&self, items: I) -> Result<PackOutput, PackError>
    where
        I: IntoIterator,
        I::Item: Borrow<InputItem>,
    {
        let mut rects: Vec<PackRect> = items
            .into_iter()
            .map(|item| PackRect::new(item.borrow()))
            .collect();

        if rects.is_empty() {
            return Err(PackError::EmptyInput);
        }

        for rect in &rects {
            let (width, height) = rect.size();
            if width == 0 || height == 0 {
                return Err(PackError::DegenerateItem {
                    id: rect.id(),
                    width,
                    height,
                });
            }
        }

        log::trace!("Packing {} items", rects.len());

        // Tallest first. The sort is stable, so rectangles of equal height
        // keep their input order as the tie break.
        rects.sort_by(|a, b| b.height().cmp(&a.height()));

        // The candidate area starts as an unbounded strip exactly as tall as
        // the tallest rectangle. That height is also the floor the shrinking
        // width runs down to; once the candidate is narrower than that, the
        // search is over.
        let tallest = rects[0].height();
        let mut candidate = Candidate {
            width: Extent::Infinite,
            height: tallest,
        };

        let mut best: Option<BestPack> = None;
        let mut attempts_left = self.max_attempts;

        while candidate.width > Extent::Finite(tallest) && attempts_left > 0 {
            attempts_left -= 1;

            match run_attempt(&mut rects, candidate) {
                Attempt::Fit { width, height } => {
                    log::trace!("Attempt fit into {}x{}", width, height);

                    // Anything beyond the effective width was slack; pull the
                    // candidate in before shrinking further.
                    candidate.width = Extent::Finite(width);

                    let area = u64::from(width) * u64::from(height);
                    offer_best(&mut best, area, (width, height), &rects);

                    // Shrink the width for the next attempt, and make room
                    // vertically for the rectangles that will be displaced
                    // from the right edge.
                    candidate.shrink_width();

                    let mut grow = 1;
                    for rect in &rects {
                        if rect.right() == width {
                            grow = grow.max(rect.height());
                        }
                    }
                    candidate.grow_height(i64::from(grow));
                }
                Attempt::NoFit {
                    placed,
                    in_first_column,
                } => {
                    log::trace!("Attempt failed with {} of {} placed", placed, rects.len());

                    // Grow the height by whichever is smaller: enough to fit
                    // the first rectangle that missed, or enough to stack one
                    // more rectangle into the first column. The stacking
                    // delta can be zero or negative, in which case the
                    // candidate height holds or even shrinks.
                    let missed = i64::from(rects[placed].height());

                    let mut stacked = -i64::from(candidate.height);
                    for rect in &rects[..=in_first_column] {
                        stacked += i64::from(rect.height());
                    }

                    candidate.grow_height(missed.min(stacked));
                }
            }
        }

        let best = match best {
            Some(best) => best,
            None => return Err(PackError::NoFit),
        };

        let BestPack {
            area,
            size,
            positions,
        } = best;

        let items: Vec<OutputItem> = rects
            .iter()
            .zip(positions)
            .map(|(rect, position)| OutputItem {
                id: rect.id(),
                rect: Rect {
                    pos: position,
                    size: rect.size(),
                },
            })
            .collect();

        debug_assert!(
            items.iter().enumerate().all(|(index, a)| {
                items[index + 1..]
                    .iter()
                    .all(|b| !a.rect.intersects(&b.rect))
            }),
            "placed rectangles must not overlap"
        );

        log::trace!(
            "Packed {} items into {}x{} (area {})",
            items.len(),
            size.0,
            size.1,
            area
        );

        Ok(PackOutput { size, area, items })
    }
}

/// Candidate packing area for one attempt. The width only ever shrinks once
/// it becomes finite; the height moves in both directions as the search feels
/// out the boundary between fitting and not fitting.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    width: Extent,
    height: u32,
}

impl Candidate {
    fn shrink_width(&mut self) {
        self.width = self.width - 1;
    }

    fn grow_height(&mut self, delta: i64) {
        // The stacking delta always includes the tallest rectangle's height,
        // so the result stays positive.
        let next = i64::from(self.height) + delta;
        debug_assert!(next > 0, "candidate height must stay positive");
        self.height = next.max(1) as u32;
    }
}

/// Outcome of one full placement pass at a fixed candidate size.
enum Attempt {
    Fit {
        width: u32,
        height: u32,
    },
    NoFit {
        placed: usize,
        in_first_column: usize,
    },
}

/// Tries to place every rectangle into a fresh matrix of the candidate size.
///
/// Fails at the first rectangle that exhausts every grid position, reporting
/// how many rectangles made it in before that and how many of those landed in
/// the first column. On success, reports the effective size of the layout.
fn run_attempt(rects: &mut [PackRect], candidate: Candidate) -> Attempt {
    let mut matrix = PackingMatrix::new(candidate.width, candidate.height);
    let mut placed = 0;
    let mut in_first_column = 0;

    for rect in rects.iter_mut() {
        rect.unplace();

        match place_first_fit(&mut matrix, rect) {
            Some(column) => {
                placed += 1;
                if column == 0 {
                    in_first_column += 1;
                }
            }
            None => {
                return Attempt::NoFit {
                    placed,
                    in_first_column,
                };
            }
        }
    }

    let (width, height) = matrix.effective_size();
    Attempt::Fit { width, height }
}

/// Scans grid positions in row-major order and places the rectangle at the
/// first one that fits, returning the column index it landed in.
fn place_first_fit(matrix: &mut PackingMatrix, rect: &mut PackRect) -> Option<usize> {
    for row in 0..matrix.row_count() {
        for column in 0..matrix.column_count() {
            if matrix.try_place(rect, column, row) {
                return Some(column);
            }
        }
    }

    None
}

/// Records the layout as the new best if its area strictly improves on the
/// best seen so far.
fn offer_best(best: &mut Option<BestPack>, area: u64, size: (u32, u32), rects: &[PackRect]) {
    let improved = match best {
        Some(current) => area < current.area,
        None => true,
    };

    if improved {
        log::trace!("New best packing: {}x{} (area {})", size.0, size.1, area);

        *best = Some(BestPack {
            area,
            size,
            positions: rects.iter().map(|rect| (rect.left(), rect.top())).collect(),
        });
    }
}

/// The minimum-area layout recorded across attempts, with one position per
/// rectangle in priority order.
#[derive(Debug)]
struct BestPack {
    area: u64,
    size: (u32, u32),
    positions: Vec<(u32, u32)>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn overlap(a: &OutputItem, b: &OutputItem) -> bool {
        let (a_min, a_max) = (a.min(), a.max());
        let (b_min, b_max) = (b.min(), b.max());

        a_min.0 < b_max.0 && a_max.0 > b_min.0 && a_min.1 < b_max.1 && a_max.1 > b_min.1
    }

    fn assert_disjoint_and_contained(output: &PackOutput) {
        let (width, height) = output.size();

        for (index, a) in output.items().iter().enumerate() {
            let max = a.max();
            assert!(
                max.0 <= width && max.1 <= height,
                "item {:?} sticks out of the {}x{} bounding box",
                a,
                width,
                height
            );

            for b in &output.items()[index + 1..] {
                assert!(!overlap(a, b), "items {:?} and {:?} overlap", a, b);
            }
        }
    }

    #[test]
    fn single_rect() {
        let output = GridPacker::new().pack(&[InputItem::new((5, 5))]).unwrap();

        assert_eq!(output.area(), 25);
        assert_eq!(output.size(), (5, 5));
        assert_eq!(output.items().len(), 1);
        assert_eq!(output.items()[0].position(), (0, 0));
    }

    #[test]
    fn two_equal_squares() {
        let items = [InputItem::new((10, 10)), InputItem::new((10, 10))];
        let output = GridPacker::new().pack(&items).unwrap();

        assert_eq!(output.area(), 200);
        assert!(output.size() == (20, 10) || output.size() == (10, 20));
        assert_disjoint_and_contained(&output);
    }

    #[test]
    fn tall_rect_with_two_squares() {
        let items = [
            InputItem::new((10, 20)),
            InputItem::new((10, 10)),
            InputItem::new((10, 10)),
        ];
        let output = GridPacker::new().pack(&items).unwrap();

        assert!(output.area() <= 400, "area was {}", output.area());
        assert_eq!(output.items().len(), 3);
        assert_disjoint_and_contained(&output);
    }

    #[test]
    fn mixed_sizes_pack_disjoint() {
        let sizes = [
            (12, 30),
            (40, 8),
            (7, 7),
            (7, 7),
            (25, 16),
            (3, 42),
            (18, 18),
            (9, 4),
        ];
        let items: Vec<_> = sizes.iter().map(|&size| InputItem::new(size)).collect();

        let output = GridPacker::new().pack(&items).unwrap();

        assert_eq!(output.items().len(), sizes.len());
        assert_disjoint_and_contained(&output);

        // The packing can never beat the total area of the items themselves.
        let lower_bound: u64 = sizes
            .iter()
            .map(|&(w, h)| u64::from(w) * u64::from(h))
            .sum();
        assert!(output.area() >= lower_bound);
    }

    #[test]
    fn ids_survive_to_output() {
        let items = [InputItem::new((4, 6)), InputItem::new((3, 9))];
        let output = GridPacker::new().pack(&items).unwrap();

        for item in &items {
            let placed = output.items().iter().find(|out| out.id() == item.id());
            assert_eq!(placed.map(|out| out.size()), Some(item.size()));
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        let result = GridPacker::new().pack(Vec::<InputItem>::new());

        assert!(matches!(result, Err(PackError::EmptyInput)));
    }

    #[test]
    fn zero_sized_input_is_an_error() {
        let items = [InputItem::new((10, 0))];
        let result = GridPacker::new().pack(&items);

        assert!(matches!(result, Err(PackError::DegenerateItem { .. })));
    }

    #[test]
    fn exhausted_attempt_budget_reports_no_fit() {
        let items = [InputItem::new((5, 5))];
        let result = GridPacker::new().max_attempts(0).pack(&items);

        assert!(matches!(result, Err(PackError::NoFit)));
    }

    #[test]
    fn best_pack_only_accepts_improvements() {
        let rects = vec![PackRect::new(&InputItem::new((2, 2)))];
        let mut best = None;

        offer_best(&mut best, 100, (10, 10), &rects);
        assert_eq!(best.as_ref().map(|b| b.area), Some(100));

        // A larger area never replaces the recorded best.
        offer_best(&mut best, 120, (12, 10), &rects);
        assert_eq!(best.as_ref().map(|b| b.area), Some(100));

        // Neither does an equal one; only strict improvement counts.
        offer_best(&mut best, 100, (4, 25), &rects);
        assert_eq!(best.as_ref().map(|b| b.size), Some((10, 10)));

        offer_best(&mut best, 64, (8, 8), &rects);
        assert_eq!(best.as_ref().map(|b| b.area), Some(64));
    }

    #[test]
    fn failed_attempts_can_shrink_the_candidate_height() {
        // The height correction after a failed attempt is the smaller of two
        // deltas, and the stacking delta can come out negative. That shrinks
        // the candidate rather than growing it, which is part of how the
        // search converges.
        let mut candidate = Candidate {
            width: Extent::Finite(40),
            height: 30,
        };

        candidate.grow_height(-5);
        assert_eq!(candidate.height, 25);

        candidate.grow_height(0);
        assert_eq!(candidate.height, 25);

        candidate.grow_height(12);
        assert_eq!(candidate.height, 37);
    }

    #[test]
    fn shrinking_an_unbounded_width_keeps_it_unbounded() {
        let mut candidate = Candidate {
            width: Extent::Infinite,
            height: 10,
        };

        candidate.shrink_width();
        assert_eq!(candidate.width, Extent::Infinite);
    }

    #[test]
    fn packing_is_deterministic() {
        let sizes = [(10, 20), (30, 10), (5, 5), (16, 16)];

        let first_items: Vec<_> = sizes.iter().map(|&size| InputItem::new(size)).collect();
        let second_items: Vec<_> = sizes.iter().map(|&size| InputItem::new(size)).collect();

        let first = GridPacker::new().pack(&first_items).unwrap();
        let second = GridPacker::new().pack(&second_items).unwrap();

        assert_eq!(first.size(), second.size());
        assert_eq!(first.area(), second.area());

        let first_positions: Vec<_> = first.items().iter().map(|item| item.position()).collect();
        let second_positions: Vec<_> = second.items().iter().map(|item| item.position()).collect();
        assert_eq!(first_positions, second_positions);
    }
}
