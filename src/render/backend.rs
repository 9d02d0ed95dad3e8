use crate::foundation::core::{Canvas, Quat};
use crate::foundation::error::CocoonResult;
use crate::morph::{MorphedVertex, Vertex};
use crate::render::bloom::BloomSettings;
use crate::render::camera::Camera;
use crate::shading::{Color, SurfaceShader};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, top row first.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha. Frames composited over an opaque background are
    /// fully opaque, so both interpretations agree.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Everything a backend needs to draw one frame of the surface.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceDraw<'a> {
    /// Undeformed mesh vertices (normals and uvs are taken from here).
    pub base: &'a [Vertex],
    /// Morphed positions and masks, parallel to `base`.
    pub morphed: &'a [MorphedVertex],
    /// Triangle list into both vertex slices.
    pub indices: &'a [u32],
    /// Model rotation.
    pub rotation: Quat,
    /// Scene time in seconds.
    pub time: f32,
    /// Sanitized morph progress.
    pub morph_progress: f32,
}

/// A renderer that turns a [`SurfaceDraw`] into a [`FrameRGBA`].
///
/// Backends are immutable once built so a single instance can serve parallel frame workers.
pub trait RenderBackend: Send + Sync {
    /// Draw one frame.
    fn render_surface(&self, draw: &SurfaceDraw<'_>) -> CocoonResult<FrameRGBA>;
}

/// Available backend kinds.
///
/// - `Cpu` is always available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Scanline rasterizer with a depth buffer.
    #[default]
    Cpu,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Output size.
    pub canvas: Canvas,
    /// Viewpoint.
    pub camera: Camera,
    /// Surface shading.
    pub shader: SurfaceShader,
    /// Clear color.
    pub background: Color,
    /// Optional glow pass.
    pub bloom: Option<BloomSettings>,
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    settings: RenderSettings,
) -> CocoonResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuRasterizer::new(settings)?)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
