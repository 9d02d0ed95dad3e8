//! Drives `time` and `morph_progress` for each frame.
//!
//! Everything here is a pure function of scene time so frames can be rendered in any order.

mod curve;
mod ease;
mod spin;

pub use curve::ProgressCurve;
pub use ease::Ease;
pub use spin::IdleSpin;

use crate::foundation::core::Quat;
use crate::foundation::error::CocoonResult;
use crate::morph::MorphParams;

/// Curve, static look parameters and idle spin of one scene.
#[derive(Clone, Debug)]
pub struct MorphTimeline {
    curve: ProgressCurve,
    base: MorphParams,
    spin: IdleSpin,
    freeze_at: Option<f32>,
}

impl MorphTimeline {
    /// Build a timeline covering `[0, horizon_secs]`.
    ///
    /// The spin freeze time is searched once here.
    pub fn new(
        curve: ProgressCurve,
        base: MorphParams,
        spin: IdleSpin,
        horizon_secs: f32,
    ) -> CocoonResult<Self> {
        curve.validate()?;
        spin.validate()?;
        let freeze_at = curve.first_reach(spin.freeze_threshold, horizon_secs);
        tracing::debug!(?freeze_at, "timeline spin freeze");
        Ok(Self {
            curve,
            base,
            spin,
            freeze_at,
        })
    }

    /// Raw (unclamped) morph progress at `time`.
    pub fn progress_at(&self, time: f32) -> f32 {
        self.curve.progress_at(time)
    }

    /// Parameter snapshot for the frame sampled at `time`.
    pub fn params_at(&self, time: f32) -> MorphParams {
        self.base.at(time, self.curve.progress_at(time))
    }

    /// Model rotation at `time`.
    pub fn rotation_at(&self, time: f32) -> Quat {
        self.spin.rotation(time, self.freeze_at)
    }

    /// Time at which the idle spin stops, if the curve ever gets there.
    pub fn freeze_at(&self) -> Option<f32> {
        self.freeze_at
    }
}

#[cfg(test)]
#[path = "../tests/unit/timeline/timeline.rs"]
mod tests;
