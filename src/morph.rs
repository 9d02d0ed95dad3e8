//! Cocoon-to-flower vertex deformation.
//!
//! A [`ShapeMorph`] is built once per frame from an immutable [`MorphParams`] snapshot and then
//! evaluated independently for every vertex of the base sphere.

mod evaluator;
mod params;

pub use evaluator::{FlowerPose, MorphedVertex, ShapeMorph, Vertex, evaluate};
pub use params::{ArtTuning, MorphParams};
