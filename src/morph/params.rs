use crate::foundation::error::{CocoonError, CocoonResult};

/// Per-frame morph inputs.
///
/// `time` and `morph_progress` are advanced by the caller every frame; the remaining fields are
/// look parameters that usually stay fixed for a scene.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphParams {
    /// Scene time in seconds.
    pub time: f32,
    /// 0 = cocoon, 1 = flower. Values outside `[0, 1]` are clamped at evaluation.
    pub morph_progress: f32,
    /// Number of petals around the azimuth. Clamped to at least 1 at evaluation.
    pub petal_count: u32,
    /// Radial scale applied to petal zones.
    pub petal_spread: f32,
    /// Lift of petals proportional to distance from the axis.
    pub petal_thickness: f32,
    /// Quadratic upward curl of petal tips.
    pub petal_curl: f32,
    /// Amplitude of the cocoon's noise displacement.
    pub distort_amount: f32,
    /// Height fraction (from the top pole) that forms the flower center.
    pub center_size: f32,
    /// Shape coefficients.
    pub tuning: ArtTuning,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            time: 0.0,
            morph_progress: 0.0,
            petal_count: 6,
            petal_spread: 2.2,
            petal_thickness: 0.35,
            petal_curl: 0.5,
            distort_amount: 0.4,
            center_size: 0.35,
            tuning: ArtTuning::default(),
        }
    }
}

impl MorphParams {
    /// Copy with `time` and `morph_progress` replaced.
    pub fn at(self, time: f32, morph_progress: f32) -> Self {
        Self {
            time,
            morph_progress,
            ..self
        }
    }

    /// Clamp the inputs the evaluator cannot handle verbatim.
    ///
    /// `morph_progress` goes to `[0, 1]` (spring drivers overshoot) and `petal_count` to `>= 1`.
    /// NaN progress is left untouched.
    pub fn sanitized(self) -> Self {
        Self {
            morph_progress: self.morph_progress.clamp(0.0, 1.0),
            petal_count: self.petal_count.max(1),
            ..self
        }
    }

    /// Strict check used when parameters come from configuration.
    pub fn validate(&self) -> CocoonResult<()> {
        let named = [
            ("time", self.time),
            ("morph_progress", self.morph_progress),
            ("petal_spread", self.petal_spread),
            ("petal_thickness", self.petal_thickness),
            ("petal_curl", self.petal_curl),
            ("distort_amount", self.distort_amount),
            ("center_size", self.center_size),
        ];
        for (name, v) in named {
            if !v.is_finite() {
                return Err(CocoonError::validation(format!(
                    "morph.{name} must be finite"
                )));
            }
        }
        if self.petal_count == 0 {
            return Err(CocoonError::validation("morph.petal_count must be >= 1"));
        }
        if self.petal_spread < 1.0 {
            return Err(CocoonError::validation("morph.petal_spread must be >= 1"));
        }
        if !(self.center_size > 0.0 && self.center_size < 1.0) {
            return Err(CocoonError::validation(
                "morph.center_size must be in (0, 1)",
            ));
        }
        self.tuning.validate()
    }
}

/// Shape coefficients of the cocoon and flower poses.
///
/// Defaults reproduce the reference look. They are art parameters, not invariants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArtTuning {
    /// Vertical stretch of the cocoon.
    pub cocoon_stretch: f32,
    /// Spatial frequency of the cocoon noise.
    pub noise_frequency: f32,
    /// Temporal drift of the cocoon noise.
    pub noise_speed: f32,
    /// Fraction of the distortion removed at full progress.
    pub distort_fade: f32,
    /// Breathing angular speed (rad/s).
    pub breathe_speed: f32,
    /// Breathing scale amplitude.
    pub breathe_amount: f32,
    /// Normalized petal half-width at which the petal mask reaches 0.
    pub petal_falloff: f32,
    /// Smoothstep edges on normalized height for the upper (petal) zone.
    pub upper_zone: [f32; 2],
    /// Smoothstep edges on normalized height for the bottom zone (descending).
    pub bottom_zone: [f32; 2],
    /// Height scale of the flattened upper hemisphere.
    pub flatten: f32,
    /// How far the bottom zone is pulled to `bottom_floor`.
    pub bottom_curl: f32,
    /// Height the bottom zone tucks under to.
    pub bottom_floor: f32,
    /// Radial squeeze of the bottom zone.
    pub bottom_flatten: f32,
    /// Radial scale of the gaps between petals.
    pub gap_inward: f32,
    /// Height added to the center dome.
    pub center_raise: f32,
    /// Parabolic bulge of the center dome.
    pub center_bulge: f32,
    /// Height of the per-petal ripple.
    pub ripple_amount: f32,
    /// Angular speed of the per-petal ripple.
    pub ripple_speed: f32,
    /// Amplitude of the whole-flower sway.
    pub sway_amount: f32,
    /// Angular speeds of the sway on x and z.
    pub sway_speed: [f32; 2],
}

impl Default for ArtTuning {
    fn default() -> Self {
        Self {
            cocoon_stretch: 1.8,
            noise_frequency: 2.0,
            noise_speed: 2.0,
            distort_fade: 0.5,
            breathe_speed: 1.5,
            breathe_amount: 0.02,
            petal_falloff: 0.6,
            upper_zone: [-0.1, 0.4],
            bottom_zone: [0.0, -0.3],
            flatten: 0.08,
            bottom_curl: 0.9,
            bottom_floor: -0.1,
            bottom_flatten: 0.3,
            gap_inward: 0.7,
            center_raise: 0.4,
            center_bulge: 0.15,
            ripple_amount: 0.03,
            ripple_speed: 0.8,
            sway_amount: 0.03,
            sway_speed: [0.4, 0.5],
        }
    }
}

impl ArtTuning {
    /// Reject non-finite coefficients and zero-width smoothstep zones.
    pub fn validate(&self) -> CocoonResult<()> {
        let scalars = [
            self.cocoon_stretch,
            self.noise_frequency,
            self.noise_speed,
            self.distort_fade,
            self.breathe_speed,
            self.breathe_amount,
            self.petal_falloff,
            self.flatten,
            self.bottom_curl,
            self.bottom_floor,
            self.bottom_flatten,
            self.gap_inward,
            self.center_raise,
            self.center_bulge,
            self.ripple_amount,
            self.ripple_speed,
            self.sway_amount,
        ];
        let pairs = [self.upper_zone, self.bottom_zone, self.sway_speed];
        if scalars
            .iter()
            .chain(pairs.iter().flatten())
            .any(|v| !v.is_finite())
        {
            return Err(CocoonError::validation(
                "morph.tuning coefficients must be finite",
            ));
        }
        if self.petal_falloff <= 0.0 {
            return Err(CocoonError::validation(
                "morph.tuning.petal_falloff must be > 0",
            ));
        }
        if self.upper_zone[0] == self.upper_zone[1] {
            return Err(CocoonError::validation(
                "morph.tuning.upper_zone edges must differ",
            ));
        }
        if self.bottom_zone[0] == self.bottom_zone[1] {
            return Err(CocoonError::validation(
                "morph.tuning.bottom_zone edges must differ",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/morph/params.rs"]
mod tests;
