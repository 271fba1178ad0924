//! Affine registration between the deformed (strain) frame and the
//! reference microstructure frame.
//!
//! The transform is estimated by least squares from manually identified
//! homologous point pairs. `estimate` recomputes from the current point
//! lists every time, so point edits cannot leave a stale transform alive.
//! Warping follows the inverse-map convention: the transform handed to a
//! [`Warper`] maps output coordinates into source coordinates.

mod affine;
mod error;
mod shift;
mod warp;

pub use nalgebra;

pub use affine::{AffineTransform, HomologousPoints};
pub use error::RegisterError;
pub use shift::PixelShift;
pub use warp::{AffineWarper, Interpolation, Warper};
