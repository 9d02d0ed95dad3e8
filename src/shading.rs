//! Surface coloring of the morphed mesh.

mod color;
mod gradient;
mod shader;

pub use color::Color;
pub use gradient::{ColorStop, GradientMap};
pub use shader::{Fragment, ShadingParams, SurfaceShader};
