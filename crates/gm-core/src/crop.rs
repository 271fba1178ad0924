use crate::Error;
use crate::grid::GridView;

/// Margins trimmed off a full-size grid to get the working region.
///
/// Displacement-correlation data is unreliable near the field edges, so all
/// segmentation runs in cropped coordinates. Cropped dimensions are the full
/// dimensions minus the opposing margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropWindow {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl CropWindow {
    pub fn new(left: usize, right: usize, top: usize, bottom: usize) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn cropped_width(&self, full_width: usize) -> Result<usize, Error> {
        self.left
            .checked_add(self.right)
            .and_then(|m| full_width.checked_sub(m))
            .ok_or(Error::MarginsExceedGrid)
    }

    pub fn cropped_height(&self, full_height: usize) -> Result<usize, Error> {
        self.top
            .checked_add(self.bottom)
            .and_then(|m| full_height.checked_sub(m))
            .ok_or(Error::MarginsExceedGrid)
    }

    /// Applies the window to a full-size view. Zero-copy: the result is a
    /// strided view into the same buffer.
    pub fn view<'a, T>(&self, full: &GridView<'a, T>) -> Result<GridView<'a, T>, Error> {
        let w = self.cropped_width(full.width())?;
        let h = self.cropped_height(full.height())?;
        full.subview(self.left, self.top, w, h)
    }
}
