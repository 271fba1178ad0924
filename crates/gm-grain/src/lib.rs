//! Grain segmentation and cross-map correspondence for strain fields.
//!
//! The pipeline turns the reference map's boundary indicator into grains of
//! the deformed map and links them back to the reference microstructure:
//! - [`extract_boundary_mask`]: warp, threshold, thin and despeckle the
//!   indicator into a unit-width boundary mask in the deformed frame.
//! - [`segment`]: flood-fill every non-boundary pixel into grains, with a
//!   directional boundary-absorption rule and an undersized-region purge.
//! - [`resolve_correspondence`]: warp the final label grid into the
//!   reference frame and vote each grain onto its modal reference grain.
//!
//! Everything is single-threaded and deterministic. The [`LabelGrid`] is
//! mutated only inside one `segment` call; afterwards it and the
//! [`GrainRegistry`] are read-only and freely shareable.

mod boundary;
mod correspond;
mod error;
mod grain;
mod label;
mod segment;

pub use boundary::{BoundaryConfig, extract_boundary_mask};
pub use correspond::resolve_correspondence;
pub use error::GrainError;
pub use grain::{Grain, GrainRegistry};
pub use label::LabelGrid;
pub use segment::{DEFAULT_MIN_GRAIN_SIZE, segment};
