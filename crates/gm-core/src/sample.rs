use crate::border::{BorderMode, map_index};
use crate::grid::GridView;

/// Round-to-nearest sampling. Returns the stored value untouched, which is
/// what keeps integer label grids intact under geometric warping: labels are
/// picked, never blended.
pub fn sample_nearest<T: Copy>(grid: &GridView<'_, T>, x: f32, y: f32, border: BorderMode<T>) -> T {
    let xi = x.round() as isize;
    let yi = y.round() as isize;

    if grid.width() == 0 || grid.height() == 0 {
        if let BorderMode::Constant(v) = border {
            return v;
        }
        panic!("cannot sample an empty grid with non-constant border");
    }

    match border {
        BorderMode::Constant(v) => {
            if xi < 0 || yi < 0 || xi >= grid.width() as isize || yi >= grid.height() as isize {
                return v;
            }
            // SAFETY: Bounds are checked immediately above.
            unsafe { *grid.get_unchecked(xi as usize, yi as usize) }
        }
        mode @ BorderMode::Clamp => {
            let mx =
                map_index(xi, grid.width(), &mode).expect("valid mapped index for non-empty grid");
            let my =
                map_index(yi, grid.height(), &mode).expect("valid mapped index for non-empty grid");
            // SAFETY: `map_index` returns indices in `[0, len)` for non-empty grids.
            unsafe { *grid.get_unchecked(mx, my) }
        }
    }
}

pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    grid: &GridView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode<f32>,
) -> f32 {
    if grid.width() == 0 || grid.height() == 0 {
        if let BorderMode::Constant(v) = border {
            return v;
        }
        panic!("cannot sample an empty grid with non-constant border");
    }

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = sample_at_f32(grid, x0, y0, &border);
    let p10 = sample_at_f32(grid, x1, y0, &border);
    let p01 = sample_at_f32(grid, x0, y1, &border);
    let p11 = sample_at_f32(grid, x1, y1, &border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

fn sample_at_f32<T: Copy + Into<f32>>(
    grid: &GridView<'_, T>,
    x: isize,
    y: isize,
    border: &BorderMode<f32>,
) -> f32 {
    match border {
        BorderMode::Constant(c) => {
            if x < 0 || y < 0 || x >= grid.width() as isize || y >= grid.height() as isize {
                *c
            } else {
                // SAFETY: Bounds are checked immediately above.
                unsafe { (*grid.get_unchecked(x as usize, y as usize)).into() }
            }
        }
        BorderMode::Clamp => {
            let xi = map_index(x, grid.width(), border).expect("mapped x index should exist");
            let yi = map_index(y, grid.height(), border).expect("mapped y index should exist");
            // SAFETY: `map_index` returns indices in `[0, len)` for non-empty grids.
            unsafe { (*grid.get_unchecked(xi, yi)).into() }
        }
    }
}
