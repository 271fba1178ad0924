use gm_core::{Grid, GridView};

/// Per-pixel grain labels over the cropped working region.
///
/// Sentinels: [`UNKNOWN`](Self::UNKNOWN) pixels are not yet claimed,
/// [`BOUNDARY`](Self::BOUNDARY) pixels came from the boundary mask,
/// [`DISCARDED`](Self::DISCARDED) pixels belonged to an undersized grain.
/// Positive `k` means grain `k`, registry index `k - 1`. After segmentation
/// completes no pixel is `UNKNOWN`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGrid {
    inner: Grid<i32>,
}

impl LabelGrid {
    pub const UNKNOWN: i32 = 0;
    pub const BOUNDARY: i32 = -1;
    pub const DISCARDED: i32 = -2;

    /// Casts a binary boundary mask (`> 0` = boundary) to the initial
    /// `{UNKNOWN, BOUNDARY}` state.
    pub fn from_boundary_mask(mask: &GridView<'_, u8>) -> Self {
        let mut inner = Grid::new_fill(mask.width(), mask.height(), Self::UNKNOWN);
        for y in 0..mask.height() {
            for (x, &v) in mask.row(y).iter().enumerate() {
                if v > 0 {
                    *inner
                        .get_mut(x, y)
                        .expect("in-bounds write in from_boundary_mask") = Self::BOUNDARY;
                }
            }
        }
        Self { inner }
    }

    pub fn width(&self) -> usize {
        self.inner.width()
    }

    pub fn height(&self) -> usize {
        self.inner.height()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        self.inner.get(x, y).copied()
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, label: i32) {
        *self
            .inner
            .get_mut(x, y)
            .expect("label write within grid bounds") = label;
    }

    pub fn grid(&self) -> &Grid<i32> {
        &self.inner
    }

    pub fn as_view(&self) -> GridView<'_, i32> {
        self.inner.as_view()
    }
}
