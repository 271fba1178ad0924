use gm_core::GridView;

use crate::GrainError;
use crate::grain::{Grain, GrainRegistry};
use crate::label::LabelGrid;

/// Default minimum claim size (interior plus absorbed boundary pixels) for a
/// grain to survive segmentation.
pub const DEFAULT_MIN_GRAIN_SIZE: usize = 10;

/// Segments every non-boundary pixel of `mask` into grains.
///
/// `field` is the cropped scalar field (e.g. per-pixel max shear) and must
/// match the mask shape; each claimed pixel records a scalar sample into its
/// grain. Labeling is deterministic: seeds are taken in row-major order and
/// the frontier expands right, left, down, up.
///
/// Boundary pixels are absorbed into a growing grain only when they lie
/// strictly forward (larger x or larger y) of the frontier pixel touching
/// them. On a unit-width skeleton this lets exactly one of two adjacent
/// grains claim each separating pixel, so boundaries still separate regions
/// while counting toward one grain's area.
///
/// Grains whose total claim is below `min_grain_size` are rolled back to
/// [`LabelGrid::DISCARDED`] and consume no label; survivors get contiguous
/// labels from 1. An all-boundary mask yields an empty registry.
pub fn segment(
    mask: &GridView<'_, u8>,
    field: &GridView<'_, f32>,
    min_grain_size: usize,
) -> Result<GrainRegistry, GrainError> {
    if mask.width() != field.width() || mask.height() != field.height() {
        return Err(GrainError::ShapeMismatch {
            mask: (mask.width(), mask.height()),
            field: (field.width(), field.height()),
        });
    }

    let width = mask.width();
    let height = mask.height();
    let mut labels = LabelGrid::from_boundary_mask(mask);
    let mut grains: Vec<Grain> = Vec::new();

    // Labels only ever move away from UNKNOWN, so a monotone row-major
    // cursor finds every remaining seed.
    let mut cursor = 0usize;
    let total = width * height;
    let mut next_label = 1i32;

    while cursor < total {
        if labels.grid().data()[cursor] != LabelGrid::UNKNOWN {
            cursor += 1;
            continue;
        }

        let seed = (cursor % width, cursor / width);
        let grain = flood_fill(&mut labels, field, seed, next_label);

        if grain.len() < min_grain_size {
            for &(x, y) in grain.coords() {
                labels.set(x, y, LabelGrid::DISCARDED);
            }
        } else {
            grains.push(grain);
            next_label += 1;
        }
    }

    Ok(GrainRegistry::new(grains, labels))
}

/// Breadth-first 4-connected fill from `seed`, claiming interior pixels and
/// forward boundary pixels under `label`.
fn flood_fill(
    labels: &mut LabelGrid,
    field: &GridView<'_, f32>,
    seed: (usize, usize),
    label: i32,
) -> Grain {
    let width = labels.width();
    let height = labels.height();

    let mut grain = Grain::new();
    let seed_sample = *field.get(seed.0, seed.1).expect("seed within field");
    grain.push(seed, seed_sample);
    labels.set(seed.0, seed.1, label);

    let mut frontier = vec![seed];
    let mut next_frontier = Vec::new();

    while !frontier.is_empty() {
        next_frontier.clear();

        for &(x, y) in &frontier {
            // Absorbed neighbors record the sample at the frontier pixel
            // that claimed them, not their own.
            let sample = *field.get(x, y).expect("frontier within field");

            for (nx, ny) in moves(x, y, width, height) {
                match labels.get(nx, ny).expect("move within grid") {
                    LabelGrid::UNKNOWN => {
                        grain.push((nx, ny), sample);
                        next_frontier.push((nx, ny));
                        labels.set(nx, ny, label);
                    }
                    LabelGrid::BOUNDARY if nx > x || ny > y => {
                        grain.push((nx, ny), sample);
                        labels.set(nx, ny, label);
                    }
                    _ => {}
                }
            }
        }

        std::mem::swap(&mut frontier, &mut next_frontier);
    }

    grain
}

/// 4-connected candidate moves in fixed order: right, left, down, up.
/// Edge pixels simply get fewer candidates.
fn moves(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let right = (x + 1 < width).then(|| (x + 1, y));
    let left = (x > 0).then(|| (x - 1, y));
    let down = (y + 1 < height).then(|| (x, y + 1));
    let up = (y > 0).then(|| (x, y - 1));

    [right, left, down, up].into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use gm_core::Grid;

    use super::segment;
    use crate::GrainError;
    use crate::label::LabelGrid;

    fn field_like(mask: &Grid<u8>) -> Grid<f32> {
        // Distinct per-pixel values so sample bookkeeping is observable.
        let data = (0..mask.width() * mask.height())
            .map(|i| i as f32 * 0.5)
            .collect();
        Grid::from_vec(mask.width(), mask.height(), data).expect("valid field")
    }

    fn vertical_line_mask(width: usize, height: usize, col: usize) -> Grid<u8> {
        let mut mask = Grid::new_fill(width, height, 0u8);
        for y in 0..height {
            *mask.get_mut(col, y).expect("in bounds") = 255;
        }
        mask
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mask = Grid::new_fill(4, 4, 0u8);
        let field = Grid::new_fill(5, 4, 0.0f32);
        let err = segment(&mask.as_view(), &field.as_view(), 1).unwrap_err();
        assert!(matches!(err, GrainError::ShapeMismatch { .. }));
    }

    #[test]
    fn all_boundary_mask_yields_empty_registry() {
        let mask = Grid::new_fill(6, 6, 255u8);
        let field = field_like(&mask);
        let registry = segment(&mask.as_view(), &field.as_view(), 1).expect("valid input");

        assert!(registry.is_empty());
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(registry.labels().get(x, y), Some(LabelGrid::BOUNDARY));
            }
        }
    }

    #[test]
    fn two_blocks_split_by_column_boundary() {
        // 10x10, column 5 all boundary, minimum size 5.
        let mask = vertical_line_mask(10, 10, 5);
        let field = field_like(&mask);
        let registry = segment(&mask.as_view(), &field.as_view(), 5).expect("valid input");

        assert_eq!(registry.len(), 2);

        // The left grain reaches the boundary from the left, so every
        // boundary pixel is forward of its frontier and joins grain 1.
        assert_eq!(registry.grains()[0].len(), 60);
        assert_eq!(registry.grains()[1].len(), 40);

        for y in 0..10 {
            for x in 0..10 {
                let expected = if x <= 5 { 1 } else { 2 };
                assert_eq!(registry.labels().get(x, y), Some(expected), "at ({x},{y})");
            }
        }
    }

    #[test]
    fn each_boundary_pixel_claimed_exactly_once() {
        // Two 5x5 blocks and a single-pixel separating line.
        let mask = vertical_line_mask(11, 5, 5);
        let field = field_like(&mask);
        let registry = segment(&mask.as_view(), &field.as_view(), 1).expect("valid input");

        assert_eq!(registry.len(), 2);

        let mut claims = vec![0usize; 5];
        for (gi, grain) in registry.grains().iter().enumerate() {
            for &(x, y) in grain.coords() {
                if x == 5 {
                    claims[y] += 1;
                    assert_eq!(gi, 0, "boundary pixel ({x},{y}) claimed by wrong grain");
                }
            }
        }
        assert!(claims.iter().all(|&c| c == 1), "claims: {claims:?}");
    }

    #[test]
    fn undersized_regions_are_discarded_without_consuming_labels() {
        // 9x5: boundary columns 2 and 6 carve out a 2-wide middle strip
        // (undersized at min 12) between two larger blocks.
        let mut mask = Grid::new_fill(9, 5, 0u8);
        for y in 0..5 {
            *mask.get_mut(2, y).expect("in bounds") = 255;
            *mask.get_mut(6, y).expect("in bounds") = 255;
        }
        let field = field_like(&mask);
        let registry = segment(&mask.as_view(), &field.as_view(), 12).expect("valid input");

        // Left block claims 2x5 interior + 5 absorbed = 15, middle claims
        // 3x5 + 5 = 20; both survive at min 12. The right block has 10
        // interior pixels and nothing left to absorb, so it is discarded.
        assert_eq!(registry.len(), 2);
        let n = registry.len() as i32;

        let mut seen_labels = std::collections::BTreeSet::new();
        for y in 0..5 {
            for x in 0..9 {
                let v = registry.labels().get(x, y).expect("in bounds");
                assert_ne!(v, LabelGrid::UNKNOWN, "uncovered pixel at ({x},{y})");
                if v > 0 {
                    assert!(v <= n, "gap in label numbering: {v}");
                    seen_labels.insert(v);
                }
            }
        }
        assert_eq!(seen_labels.len(), registry.len());

        // Right block pixels were rolled back.
        for y in 0..5 {
            for x in 7..9 {
                assert_eq!(registry.labels().get(x, y), Some(LabelGrid::DISCARDED));
            }
        }

        // Size floor holds for survivors.
        for grain in registry.grains() {
            assert!(grain.len() >= 12);
        }
    }

    #[test]
    fn segmentation_is_deterministic() {
        let mut mask = Grid::new_fill(16, 12, 0u8);
        for y in 0..12 {
            *mask.get_mut(7, y).expect("in bounds") = 255;
        }
        for x in 0..16 {
            *mask.get_mut(x, 5).expect("in bounds") = 255;
        }
        let field = field_like(&mask);

        let a = segment(&mask.as_view(), &field.as_view(), 4).expect("valid input");
        let b = segment(&mask.as_view(), &field.as_view(), 4).expect("valid input");

        assert_eq!(a.labels().grid().data(), b.labels().grid().data());
        assert_eq!(a.len(), b.len());
        for (ga, gb) in a.grains().iter().zip(b.grains()) {
            assert_eq!(ga.coords(), gb.coords());
            assert_eq!(ga.samples(), gb.samples());
        }
    }

    #[test]
    fn samples_follow_the_claiming_frontier_pixel() {
        // 3x1, no boundary: seed (0,0) claims (1,0) with the seed's sample,
        // then (1,0) claims (2,0) with its own.
        let mask = Grid::new_fill(3, 1, 0u8);
        let field = Grid::from_vec(3, 1, vec![10.0f32, 20.0, 30.0]).expect("valid field");
        let registry = segment(&mask.as_view(), &field.as_view(), 1).expect("valid input");

        assert_eq!(registry.len(), 1);
        let grain = &registry.grains()[0];
        assert_eq!(grain.coords(), &[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(grain.samples(), &[10.0, 10.0, 20.0]);
    }
}
