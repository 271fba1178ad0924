use gm_core::{Grid, GridView};

/// Thins a binary mask to a unit-width skeleton (Zhang-Suen).
///
/// Two subiterations per pass, each marking deletable contour pixels and
/// clearing them together, repeated until a full pass changes nothing. The
/// result is 8-connected and at most one pixel wide, which is what the
/// directional absorption rule in the segmenter relies on. Open line ends
/// retract by up to two pixels; boundary networks that terminate at the
/// grid edge or at junctions are unaffected.
pub fn skeletonize(src: &GridView<'_, u8>) -> Grid<u8> {
    let width = src.width();
    let height = src.height();

    let mut mask = vec![0u8; width * height];
    for y in 0..height {
        for (x, &v) in src.row(y).iter().enumerate() {
            if v > 0 {
                mask[y * width + x] = 1;
            }
        }
    }

    let mut to_clear: Vec<usize> = Vec::new();
    loop {
        let mut changed = false;

        for pass in 0..2 {
            to_clear.clear();
            for y in 0..height {
                for x in 0..width {
                    if mask[y * width + x] == 1 && deletable(&mask, width, height, x, y, pass) {
                        to_clear.push(y * width + x);
                    }
                }
            }

            if !to_clear.is_empty() {
                changed = true;
                for &p in &to_clear {
                    mask[p] = 0;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let mut out = Grid::new_fill(width, height, 0u8);
    for (i, &v) in mask.iter().enumerate() {
        if v != 0 {
            out.data_mut()[i] = 255;
        }
    }
    out
}

fn at(mask: &[u8], width: usize, height: usize, x: isize, y: isize) -> u8 {
    if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
        return 0;
    }
    mask[y as usize * width + x as usize]
}

fn deletable(mask: &[u8], width: usize, height: usize, x: usize, y: usize, pass: usize) -> bool {
    let (xi, yi) = (x as isize, y as isize);

    // p2..p9 clockwise from north.
    let p = [
        at(mask, width, height, xi, yi - 1),
        at(mask, width, height, xi + 1, yi - 1),
        at(mask, width, height, xi + 1, yi),
        at(mask, width, height, xi + 1, yi + 1),
        at(mask, width, height, xi, yi + 1),
        at(mask, width, height, xi - 1, yi + 1),
        at(mask, width, height, xi - 1, yi),
        at(mask, width, height, xi - 1, yi - 1),
    ];

    let b: u8 = p.iter().sum();
    if !(2..=6).contains(&b) {
        return false;
    }

    // Number of 0->1 transitions around the ring.
    let mut a = 0;
    for i in 0..8 {
        if p[i] == 0 && p[(i + 1) % 8] == 1 {
            a += 1;
        }
    }
    if a != 1 {
        return false;
    }

    let (p2, p4, p6, p8) = (p[0], p[2], p[4], p[6]);
    if pass == 0 {
        p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0
    } else {
        p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0
    }
}

#[cfg(test)]
mod tests {
    use gm_core::Grid;

    use super::skeletonize;

    fn count_set(grid: &Grid<u8>) -> usize {
        grid.data().iter().filter(|&&v| v != 0).count()
    }

    #[test]
    fn thick_bar_thins_to_unit_width() {
        // 3-pixel-thick horizontal bar across a 12x9 grid.
        let mut data = vec![0u8; 12 * 9];
        for y in 3..6 {
            for x in 0..12 {
                data[y * 12 + x] = 255;
            }
        }
        let grid = Grid::from_vec(12, 9, data).expect("valid grid");

        let skel = skeletonize(&grid.as_view());

        // The bar collapses onto its middle row. Open line ends retract by
        // up to two pixels, as is usual for this thinning scheme, leaving
        // columns 1..=9 occupied.
        for y in 0..9 {
            for x in 0..12 {
                let set = skel.data()[y * 12 + x] != 0;
                let expected = y == 4 && (1..=9).contains(&x);
                assert_eq!(set, expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn thin_line_is_stable() {
        let mut data = vec![0u8; 100];
        for x in 2..8 {
            data[4 * 10 + x] = 255;
        }
        let grid = Grid::from_vec(10, 10, data).expect("valid grid");

        let once = skeletonize(&grid.as_view());
        let twice = skeletonize(&once.as_view());
        assert_eq!(once.data(), twice.data());
        assert!(count_set(&once) >= 4);
    }

    #[test]
    fn empty_mask_stays_empty() {
        let grid = Grid::new_fill(5, 5, 0u8);
        let skel = skeletonize(&grid.as_view());
        assert!(skel.data().iter().all(|&v| v == 0));
    }
}
