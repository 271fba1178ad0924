use gm_core::{Grid, GridView};

const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const DIRS_C4: [u8; 4] = [0, 2, 4, 6];
const DIRS_C8: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    C4,
    C8,
}

fn dirs_for(connectivity: Connectivity) -> &'static [u8] {
    match connectivity {
        Connectivity::C4 => &DIRS_C4,
        Connectivity::C8 => &DIRS_C8,
    }
}

fn neighbor(p: usize, dir: u8, width: usize, height: usize) -> Option<usize> {
    let x = (p % width) as isize + DX[dir as usize];
    let y = (p / width) as isize + DY[dir as usize];
    if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
        return None;
    }
    Some(y as usize * width + x as usize)
}

/// Clears connected components with fewer than `min_size` pixels.
///
/// A thinned boundary skeleton picks up isolated specks from interpolation
/// noise at the warp threshold; those must not seed spurious grains.
pub fn remove_small_objects(
    src: &GridView<'_, u8>,
    min_size: usize,
    connectivity: Connectivity,
) -> Grid<u8> {
    let width = src.width();
    let height = src.height();
    let mut out = Grid::new_fill(width, height, 0u8);

    let n = match width.checked_mul(height) {
        Some(0) | None => return out,
        Some(v) => v,
    };

    let mut raw = vec![0u8; n];
    for y in 0..height {
        for (x, &v) in src.row(y).iter().enumerate() {
            if v > 0 {
                raw[y * width + x] = 1;
            }
        }
    }

    let min_size = min_size.max(1);
    if min_size <= 1 {
        for i in 0..n {
            if raw[i] != 0 {
                out.data_mut()[i] = 255;
            }
        }
        return out;
    }

    let dirs = dirs_for(connectivity);
    let mut seen = vec![0u8; n];
    let mut stack = Vec::new();
    let mut component = Vec::new();

    for i in 0..n {
        if raw[i] == 0 || seen[i] != 0 {
            continue;
        }

        stack.clear();
        component.clear();
        seen[i] = 1;
        stack.push(i);

        while let Some(p) = stack.pop() {
            component.push(p);
            for &dir in dirs {
                let Some(nb) = neighbor(p, dir, width, height) else {
                    continue;
                };
                if raw[nb] != 0 && seen[nb] == 0 {
                    seen[nb] = 1;
                    stack.push(nb);
                }
            }
        }

        if component.len() >= min_size {
            for &p in &component {
                out.data_mut()[p] = 255;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use gm_core::Grid;

    use super::{Connectivity, remove_small_objects};

    #[test]
    fn clears_speck_keeps_line() {
        let mut data = vec![0u8; 100];
        // 8-pixel horizontal line on row 2
        for x in 1..9 {
            data[2 * 10 + x] = 255;
        }
        // isolated speck
        data[7 * 10 + 7] = 255;
        let grid = Grid::from_vec(10, 10, data).expect("valid grid");

        let out = remove_small_objects(&grid.as_view(), 5, Connectivity::C8);
        for x in 1..9 {
            assert_eq!(out.data()[2 * 10 + x], 255);
        }
        assert_eq!(out.data()[7 * 10 + 7], 0);
    }

    #[test]
    fn diagonal_chain_counts_as_one_component_under_c8() {
        let mut data = vec![0u8; 36];
        for i in 0..6 {
            data[i * 6 + i] = 255;
        }
        let grid = Grid::from_vec(6, 6, data).expect("valid grid");

        let c8 = remove_small_objects(&grid.as_view(), 6, Connectivity::C8);
        assert_eq!(c8.data().iter().filter(|&&v| v == 255).count(), 6);

        // Under C4 the diagonal falls apart into single pixels.
        let c4 = remove_small_objects(&grid.as_view(), 2, Connectivity::C4);
        assert!(c4.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn min_size_one_keeps_everything() {
        let grid = Grid::from_vec(2, 2, vec![255u8, 0, 0, 255]).expect("valid grid");
        let out = remove_small_objects(&grid.as_view(), 1, Connectivity::C4);
        assert_eq!(out.data(), &[255, 0, 0, 255]);
    }
}
