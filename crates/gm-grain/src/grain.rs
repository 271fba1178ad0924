use gm_core::Grid;

use crate::GrainError;
use crate::label::LabelGrid;

/// One segmented grain: pixel coordinates in discovery order with the scalar
/// sample recorded when each pixel was claimed.
///
/// Coordinate content is fixed once segmentation returns; the only later
/// mutation is the one-time attachment of the corresponding reference-map
/// grain by correspondence resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Grain {
    coords: Vec<(usize, usize)>,
    samples: Vec<f32>,
    reference_grain: Option<usize>,
}

impl Grain {
    pub(crate) fn new() -> Self {
        Self {
            coords: Vec::new(),
            samples: Vec::new(),
            reference_grain: None,
        }
    }

    pub(crate) fn push(&mut self, coord: (usize, usize), sample: f32) {
        self.coords.push(coord);
        self.samples.push(sample);
    }

    pub(crate) fn set_reference_grain(&mut self, index: usize) {
        self.reference_grain = Some(index);
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Pixel coordinates in flood-fill discovery order, not spatially sorted.
    pub fn coords(&self) -> &[(usize, usize)] {
        &self.coords
    }

    /// Scalar samples parallel to [`coords`](Self::coords).
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Index of the corresponding reference-map grain, once resolved.
    pub fn reference_grain(&self) -> Option<usize> {
        self.reference_grain
    }

    /// `(x0, y0, x1, y1)` min/max over the coordinate list.
    pub fn bounding_box(&self) -> Result<(usize, usize, usize, usize), GrainError> {
        let (&(fx, fy), rest) = self.coords.split_first().ok_or(GrainError::EmptyGrain)?;

        let mut bb = (fx, fy, fx, fy);
        for &(x, y) in rest {
            bb.0 = bb.0.min(x);
            bb.1 = bb.1.min(y);
            bb.2 = bb.2.max(x);
            bb.3 = bb.3.max(y);
        }
        Ok(bb)
    }

    /// Dense raster of the grain footprint over its bounding box:
    /// `foreground` on grain pixels, `background` elsewhere.
    pub fn outline(&self, background: i32, foreground: i32) -> Result<Grid<i32>, GrainError> {
        let (x0, y0, x1, y1) = self.bounding_box()?;
        let mut out = Grid::new_fill(x1 - x0 + 1, y1 - y0 + 1, background);

        for &(x, y) in &self.coords {
            *out.get_mut(x - x0, y - y0)
                .expect("grain pixel within its bounding box") = foreground;
        }
        Ok(out)
    }
}

/// All surviving grains plus the final label grid.
///
/// Label `k` in the grid corresponds to `grains()[k - 1]`; labels are
/// contiguous from 1 with no gaps. Read-only after segmentation apart from
/// reference-grain attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct GrainRegistry {
    grains: Vec<Grain>,
    labels: LabelGrid,
}

impl GrainRegistry {
    pub(crate) fn new(grains: Vec<Grain>, labels: LabelGrid) -> Self {
        Self { grains, labels }
    }

    pub fn len(&self) -> usize {
        self.grains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }

    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub fn labels(&self) -> &LabelGrid {
        &self.labels
    }

    /// Fails fast on an empty registry instead of handing back a degenerate
    /// answer from a later geometric query.
    pub fn grain(&self, index: usize) -> Result<&Grain, GrainError> {
        if self.grains.is_empty() {
            return Err(GrainError::EmptyRegistry);
        }
        self.grains
            .get(index)
            .ok_or(GrainError::GrainIndexOutOfRange {
                index,
                len: self.grains.len(),
            })
    }

    pub(crate) fn grain_mut(&mut self, index: usize) -> Option<&mut Grain> {
        self.grains.get_mut(index)
    }
}
