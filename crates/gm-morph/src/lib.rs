//! Binary morphology for boundary-mask conditioning.
//!
//! Pixels are treated as binary with threshold `> 0`. Outputs are `0` or
//! `255` in `u8`. The warped reference boundary indicator passes through
//! [`threshold_above`], [`skeletonize`] and [`remove_small_objects`] before
//! segmentation sees it.

mod components;
mod thin;

use gm_core::{Grid, GridView};

pub use components::{Connectivity, remove_small_objects};
pub use thin::skeletonize;

/// Binarizes a float grid: 255 where `v > threshold`, 0 elsewhere.
pub fn threshold_above(src: &GridView<'_, f32>, threshold: f32) -> Grid<u8> {
    let mut out = Grid::new_fill(src.width(), src.height(), 0u8);
    for y in 0..src.height() {
        for (x, &v) in src.row(y).iter().enumerate() {
            if v > threshold {
                *out.get_mut(x, y).expect("in-bounds write in threshold_above") = 255;
            }
        }
    }
    out
}
