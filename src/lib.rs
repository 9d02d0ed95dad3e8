//! Cocoon is a procedural mesh morph that turns a noisy, stretched cocoon into an open flower.
//!
//! The core is a pure per-vertex evaluator ([`ShapeMorph`]) driven by a per-frame
//! [`MorphParams`] snapshot. Around it sit the pieces needed to look at the result:
//!
//! - Load and validate a [`SceneConfig`]
//! - Create a [`RenderSession`]
//! - Render single frames, stream a range into a [`FrameSink`], or export a frame's
//!   [`DeformedMesh`] as OBJ
#![forbid(unsafe_code)]

pub mod config;
pub mod export;
pub mod foundation;
pub mod mesh;
pub mod morph;
pub mod noise;
pub mod render;
pub mod session;
pub mod shading;
pub mod sink;
pub mod timeline;

pub use crate::config::SceneConfig;
pub use crate::export::write_obj;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Quat, Vec2, Vec3};
pub use crate::foundation::error::{CocoonError, CocoonResult};
pub use crate::mesh::{MeshData, SphereSpec};
pub use crate::morph::{ArtTuning, MorphParams, MorphedVertex, ShapeMorph, Vertex, evaluate};
pub use crate::render::{
    BackendKind, BloomSettings, Camera, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::session::{DeformedMesh, RenderSession, RenderSessionOpts, RenderStats};
pub use crate::shading::{Color, GradientMap, ShadingParams, SurfaceShader};
pub use crate::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::timeline::{Ease, IdleSpin, MorphTimeline, ProgressCurve};
