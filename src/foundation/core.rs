use crate::foundation::error::{CocoonError, CocoonResult};

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Absolute 0-based frame index on the scene timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> CocoonResult<Self> {
        if start.0 > end.0 {
            return Err(CocoonError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Split into consecutive sub-ranges of at most `chunk` frames.
    pub fn chunks(self, chunk: u64) -> impl Iterator<Item = FrameRange> {
        let chunk = chunk.max(1);
        let end = self.end.0;
        (self.start.0..end).step_by(chunk as usize).map(move |s| FrameRange {
            start: FrameIndex(s),
            end: FrameIndex(s.saturating_add(chunk).min(end)),
        })
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> CocoonResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    /// Check that both terms are non-zero.
    pub fn validate(self) -> CocoonResult<()> {
        if self.den == 0 {
            return Err(CocoonError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(CocoonError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Scene time in seconds at which `frame` is sampled.
    ///
    /// Computed in `f64` and narrowed once so long timelines do not accumulate drift.
    pub fn frame_time_secs(self, frame: FrameIndex) -> f32 {
        self.frames_to_secs(frame.0) as f32
    }
}

/// Largest accepted canvas area, one 8K UHD frame.
pub const MAX_CANVAS_PIXELS: u64 = 7680 * 4320;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

impl Canvas {
    /// Check both dimensions are non-zero and the area stays within [`MAX_CANVAS_PIXELS`].
    pub fn validate(self) -> CocoonResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CocoonError::validation("canvas width/height must be > 0"));
        }
        let pixels = u64::from(self.width) * u64::from(self.height);
        if pixels > MAX_CANVAS_PIXELS {
            return Err(CocoonError::validation(format!(
                "canvas {}x{} exceeds {MAX_CANVAS_PIXELS} pixels",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Total number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Width divided by height.
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
