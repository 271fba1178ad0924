//! Umbrella crate for the `grain-metrology` workspace.
//!
//! Re-exports the grid primitives, morphology, registration and grain
//! engine crates under one roof.

pub use gm_core::*;
pub use gm_grain::*;
pub use gm_morph::*;
pub use gm_register::*;
