//! Rasterization of the morphed surface into RGBA frames.

pub mod backend;
pub mod bloom;
pub mod camera;
pub mod cpu;

pub use backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, SurfaceDraw, create_backend,
};
pub use bloom::BloomSettings;
pub use camera::Camera;
pub use cpu::CpuRasterizer;
