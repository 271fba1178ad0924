//! Foundational primitives for the `grain-metrology` workspace.
//!
//! ## Grids and Stride
//! Grids use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`,
//! which lets [`CropWindow`] hand out borrowed views over a full-size field
//! without copying.
//!
//! ## Sampling Coordinates
//! Sampling uses pixel-center coordinates where integer coordinates refer to
//! pixel centers. Nearest-neighbor uses round-to-nearest integer indices and
//! never blends stored values; bilinear uses the standard floor-based 2x2
//! interpolation neighborhood.

mod border;
mod crop;
mod error;
mod grid;
mod sample;

pub use border::{BorderMode, map_index};
pub use crop::CropWindow;
pub use error::Error;
pub use grid::{Grid, GridView, binarize_to_f32};
pub use sample::{sample_bilinear_f32, sample_nearest};
