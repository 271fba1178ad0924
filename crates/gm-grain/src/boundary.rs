use gm_core::{Grid, GridView, binarize_to_f32};
use gm_morph::{Connectivity, remove_small_objects, skeletonize, threshold_above};
use gm_register::{AffineTransform, Interpolation, PixelShift, Warper};

/// Tuning for boundary-mask extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConfig {
    /// Warped-indicator threshold. Interpolation smears the binary
    /// indicator, so anything meaningfully above zero counts as boundary.
    pub threshold: f32,
    /// Minimum connected-component size (C8) kept after thinning.
    pub min_object_size: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            min_object_size: 10,
        }
    }
}

/// Builds the deformed-frame boundary mask from the reference map's
/// boundary indicator (`> 0` = boundary).
///
/// The indicator is warped into a canvas of the cropped shape grown by the
/// pixel shift, the first `shift` rows/columns are dropped, and the result
/// is thresholded, thinned to unit width and despeckled. Pure function of
/// its inputs; transform validity is the registrar's concern.
pub fn extract_boundary_mask(
    indicator: &GridView<'_, u8>,
    transform: &AffineTransform,
    shift: PixelShift,
    cropped_width: usize,
    cropped_height: usize,
    warper: &dyn Warper,
    cfg: &BoundaryConfig,
) -> Grid<u8> {
    let indicator_f = binarize_to_f32(indicator);

    let canvas = warper.warp_f32(
        &indicator_f.as_view(),
        transform,
        cropped_width + shift.x,
        cropped_height + shift.y,
        Interpolation::Bilinear,
    );

    let cropped = canvas
        .as_view()
        .subview(shift.x, shift.y, cropped_width, cropped_height)
        .expect("shifted canvas contains the cropped window")
        .to_grid();

    let mask = threshold_above(&cropped.as_view(), cfg.threshold);
    let thinned = skeletonize(&mask.as_view());
    remove_small_objects(&thinned.as_view(), cfg.min_object_size, Connectivity::C8)
}

#[cfg(test)]
mod tests {
    use gm_core::Grid;
    use gm_register::{AffineTransform, AffineWarper, PixelShift};

    use super::{BoundaryConfig, extract_boundary_mask};

    #[test]
    fn thick_line_becomes_unit_width_and_speck_is_dropped() {
        // 20x14 indicator: 3-thick horizontal boundary band plus a speck.
        let mut indicator = Grid::new_fill(20, 14, 0u8);
        for y in 5..8 {
            for x in 0..20 {
                *indicator.get_mut(x, y).expect("in bounds") = 255;
            }
        }
        *indicator.get_mut(2, 11).expect("in bounds") = 255;

        let mask = extract_boundary_mask(
            &indicator.as_view(),
            &AffineTransform::identity(),
            PixelShift::default(),
            20,
            14,
            &AffineWarper,
            &BoundaryConfig::default(),
        );

        assert_eq!(mask.width(), 20);
        assert_eq!(mask.height(), 14);

        // Unit width: interior columns hold exactly one boundary pixel.
        for x in 2..18 {
            let col = (0..14).filter(|&y| *mask.get(x, y).unwrap() != 0).count();
            assert_eq!(col, 1, "column {x}");
        }
        // The speck fell below min_object_size.
        assert_eq!(*mask.get(2, 11).unwrap(), 0);
    }

    #[test]
    fn pixel_shift_drops_leading_rows_and_columns() {
        // Vertical 1-px indicator line at x = 6; identity transform with a
        // (2, 1) shift reads the indicator offset by the shift, so the line
        // lands at x = 6 - 2 = 4 in the cropped mask.
        let mut indicator = Grid::new_fill(16, 12, 0u8);
        for y in 0..12 {
            *indicator.get_mut(6, y).expect("in bounds") = 255;
        }

        let cfg = BoundaryConfig {
            threshold: 0.1,
            min_object_size: 3,
        };
        let mask = extract_boundary_mask(
            &indicator.as_view(),
            &AffineTransform::identity(),
            PixelShift::new(2, 1),
            10,
            8,
            &AffineWarper,
            &cfg,
        );

        assert_eq!(mask.width(), 10);
        assert_eq!(mask.height(), 8);
        for y in 0..8 {
            for x in 0..10 {
                let expected = if x == 4 { 255 } else { 0 };
                assert_eq!(*mask.get(x, y).unwrap(), expected, "at ({x},{y})");
            }
        }
    }
}
