use gm_core::{BorderMode, Grid, GridView, sample_bilinear_f32, sample_nearest};

use crate::AffineTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Round-to-nearest source pixel. The only mode valid for label grids.
    Nearest,
    /// Floor-based 2x2 interpolation. For float fields only.
    Bilinear,
}

/// Grid resampling through a geometric transform.
///
/// `map` takes **output** coordinates into **source** coordinates (the
/// inverse-map convention), so callers pass the forward deformed->reference
/// transform when producing a deformed-frame canvas from reference data and
/// vice versa. Samples outside the source read as zero.
pub trait Warper {
    fn warp_f32(
        &self,
        src: &GridView<'_, f32>,
        map: &AffineTransform,
        out_width: usize,
        out_height: usize,
        interp: Interpolation,
    ) -> Grid<f32>;

    /// Nearest-only resampling for integer label grids. Labels are picked
    /// from the source, never blended, so the output can hold no label the
    /// source did not.
    fn warp_labels(
        &self,
        src: &GridView<'_, i32>,
        map: &AffineTransform,
        out_width: usize,
        out_height: usize,
    ) -> Grid<i32>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AffineWarper;

impl Warper for AffineWarper {
    fn warp_f32(
        &self,
        src: &GridView<'_, f32>,
        map: &AffineTransform,
        out_width: usize,
        out_height: usize,
        interp: Interpolation,
    ) -> Grid<f32> {
        let mut out = Grid::new_fill(out_width, out_height, 0.0f32);
        for y in 0..out_height {
            for x in 0..out_width {
                let [sx, sy] = map.apply([x as f64, y as f64]);
                let v = match interp {
                    Interpolation::Nearest => {
                        sample_nearest(src, sx as f32, sy as f32, BorderMode::Constant(0.0))
                    }
                    Interpolation::Bilinear => {
                        sample_bilinear_f32(src, sx as f32, sy as f32, BorderMode::Constant(0.0))
                    }
                };
                *out.get_mut(x, y).expect("in-bounds write in warp_f32") = v;
            }
        }
        out
    }

    fn warp_labels(
        &self,
        src: &GridView<'_, i32>,
        map: &AffineTransform,
        out_width: usize,
        out_height: usize,
    ) -> Grid<i32> {
        let mut out = Grid::new_fill(out_width, out_height, 0i32);
        for y in 0..out_height {
            for x in 0..out_width {
                let [sx, sy] = map.apply([x as f64, y as f64]);
                let v = sample_nearest(src, sx as f32, sy as f32, BorderMode::Constant(0));
                *out.get_mut(x, y).expect("in-bounds write in warp_labels") = v;
            }
        }
        out
    }
}
