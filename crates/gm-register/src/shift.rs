/// Integer per-axis offset applied on top of the affine warp.
///
/// Compensates a systematic pixel offset between frames that the affine fit
/// does not absorb. Boundary extraction and correspondence resolution must
/// use the same shift; the grain engine takes it as a shared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelShift {
    pub x: usize,
    pub y: usize,
}

impl PixelShift {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Overrides either axis; a `None` axis keeps its previous value.
    pub fn set(&mut self, dx: Option<usize>, dy: Option<usize>) {
        if let Some(dx) = dx {
            self.x = dx;
        }
        if let Some(dy) = dy {
            self.y = dy;
        }
    }
}
