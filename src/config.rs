//! JSON scene description.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{CocoonError, CocoonResult};
use crate::mesh::SphereSpec;
use crate::morph::MorphParams;
use crate::render::{BloomSettings, Camera};
use crate::shading::{Color, GradientMap, ShadingParams, SurfaceShader};
use crate::timeline::{IdleSpin, ProgressCurve};

/// Everything needed to render the cocoon-flower scene.
///
/// Every field has a default, so `{}` is a valid scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Scene length in frames.
    pub duration_frames: u64,
    /// Clear color behind the surface.
    pub background: Color,
    pub camera: Camera,
    pub sphere: SphereSpec,
    /// Static morph parameters; `time` and `morph_progress` are overridden per frame.
    pub morph: MorphParams,
    /// Morph progress over time.
    pub timeline: ProgressCurve,
    pub spin: IdleSpin,
    pub gradient: GradientMap,
    pub shading: ShadingParams,
    /// Glow pass, off when absent.
    pub bloom: Option<BloomSettings>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            duration_frames: 300,
            background: Color::rgba(5.0 / 255.0, 5.0 / 255.0, 5.0 / 255.0, 1.0),
            camera: Camera::default(),
            sphere: SphereSpec::default(),
            morph: MorphParams::default(),
            timeline: ProgressCurve::default(),
            spin: IdleSpin::default(),
            gradient: GradientMap::default(),
            shading: ShadingParams::default(),
            bloom: None,
        }
    }
}

impl SceneConfig {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CocoonResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CocoonError::config(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CocoonResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CocoonError::config(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            CocoonError::config(format!("parse scene JSON '{}': {e}", path.display()))
        })
    }

    pub fn validate(&self) -> CocoonResult<()> {
        self.canvas.validate()?;
        self.fps.validate()?;
        if self.duration_frames == 0 {
            return Err(CocoonError::validation("duration_frames must be > 0"));
        }
        if !self.background.is_finite() {
            return Err(CocoonError::validation("background must be finite"));
        }
        self.camera.validate()?;
        self.sphere.validate()?;
        self.morph.validate()?;
        self.timeline.validate()?;
        self.spin.validate()?;
        self.gradient.validate()?;
        self.shading.validate()?;
        if let Some(bloom) = &self.bloom {
            bloom.validate()?;
        }
        Ok(())
    }

    /// Scene length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration_frames)
    }

    pub fn shader(&self) -> SurfaceShader {
        SurfaceShader::new(self.shading, self.gradient.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
