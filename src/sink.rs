//! Frame consumers for range renders.

use std::path::{Path, PathBuf};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CocoonError, CocoonResult};
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a range render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order within the
/// requested render range, between one `begin` and one `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> CocoonResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CocoonResult<()>;
    fn end(&mut self) -> CocoonResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CocoonResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CocoonResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CocoonResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes each frame as `frame_00000.png`, `frame_00001.png`, ... into a directory.
///
/// File numbers are the absolute frame indices, not positions within the range.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written since the last `begin`.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> CocoonResult<()> {
        self.written.clear();
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CocoonError::io(format!("create output dir '{}': {e}", self.dir.display()))
        })
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CocoonResult<()> {
        let path = self.frame_path(idx);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            CocoonError::Other(
                anyhow::Error::new(e).context(format!("write png '{}'", path.display())),
            )
        })?;
        tracing::trace!(path = %path.display(), "frame written");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> CocoonResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/sink.rs"]
mod tests;
