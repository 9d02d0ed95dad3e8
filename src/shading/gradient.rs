use glam::{Vec2, Vec3};

use crate::foundation::error::{CocoonError, CocoonResult};
use crate::foundation::math::mix_vec3;
use crate::shading::color::Color;

/// One color stop of a [`GradientMap`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f32,
    /// Stop color.
    pub color: Color,
}

/// Vertical linear gradient used as the surface's base color.
///
/// Offset 0 is the top of the texture (uv `v = 1`, the north pole), matching a canvas gradient
/// drawn top to bottom and uploaded with a vertical flip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct GradientMap {
    stops: Vec<ColorStop>,
}

impl Default for GradientMap {
    fn default() -> Self {
        let stop = |offset, hex| ColorStop {
            offset,
            color: Color::from_hex(hex).unwrap_or(Color::rgba(1.0, 1.0, 1.0, 1.0)),
        };
        Self {
            stops: vec![
                stop(0.0, "#b084cc"),
                stop(0.4, "#ffffff"),
                stop(0.8, "#64ffda"),
                stop(1.0, "#b084cc"),
            ],
        }
    }
}

impl GradientMap {
    /// Build and validate a gradient from stops.
    pub fn new(stops: Vec<ColorStop>) -> CocoonResult<Self> {
        let g = Self { stops };
        g.validate()?;
        Ok(g)
    }

    /// Stops in ascending offset order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Require at least one stop, offsets within `[0, 1]` and non-decreasing.
    pub fn validate(&self) -> CocoonResult<()> {
        if self.stops.is_empty() {
            return Err(CocoonError::validation("gradient needs at least one stop"));
        }
        for s in &self.stops {
            if !(0.0..=1.0).contains(&s.offset) {
                return Err(CocoonError::validation(format!(
                    "gradient stop offset {} outside [0, 1]",
                    s.offset
                )));
            }
            if !s.color.is_finite() {
                return Err(CocoonError::validation("gradient stop color must be finite"));
            }
        }
        if self.stops.windows(2).any(|w| w[1].offset < w[0].offset) {
            return Err(CocoonError::validation(
                "gradient stop offsets must be non-decreasing",
            ));
        }
        Ok(())
    }

    /// RGB at gradient position `t`, clamped to the end stops.
    pub fn sample(&self, t: f32) -> Vec3 {
        let Some(first) = self.stops.first() else {
            return Vec3::ONE;
        };
        if t <= first.offset {
            return first.color.rgb();
        }
        for w in self.stops.windows(2) {
            let (a, b) = (w[0], w[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color.rgb();
                }
                return mix_vec3(a.color.rgb(), b.color.rgb(), (t - a.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color.rgb()
    }

    /// RGB at texture coordinate `uv`; only `v` matters.
    pub fn sample_uv(&self, uv: Vec2) -> Vec3 {
        self.sample((1.0 - uv.y).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shading/gradient.rs"]
mod tests;
