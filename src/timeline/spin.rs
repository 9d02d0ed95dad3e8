use glam::{EulerRot, Quat};

use crate::foundation::error::{CocoonError, CocoonResult};

/// Slow idle rotation of the cocoon.
///
/// The mesh pitches by `sin(t / tilt_period) * tilt_amount` and yaws at `yaw_speed` rad/s until
/// progress first reaches `freeze_threshold`; after that it holds the pose it had at that moment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IdleSpin {
    /// Pitch amplitude in radians.
    pub tilt_amount: f32,
    /// Pitch time divisor in seconds.
    pub tilt_period: f32,
    /// Yaw rate in radians per second.
    pub yaw_speed: f32,
    /// Progress at which the spin freezes.
    pub freeze_threshold: f32,
}

impl Default for IdleSpin {
    fn default() -> Self {
        Self {
            tilt_amount: 0.2,
            tilt_period: 4.0,
            yaw_speed: 0.1,
            freeze_threshold: 0.1,
        }
    }
}

impl IdleSpin {
    /// No rotation at all.
    pub fn disabled() -> Self {
        Self {
            tilt_amount: 0.0,
            yaw_speed: 0.0,
            ..Self::default()
        }
    }

    /// Check constants.
    pub fn validate(&self) -> CocoonResult<()> {
        if !(self.tilt_period.is_finite() && self.tilt_period > 0.0) {
            return Err(CocoonError::validation("spin.tilt_period must be > 0"));
        }
        if !self.tilt_amount.is_finite()
            || !self.yaw_speed.is_finite()
            || !self.freeze_threshold.is_finite()
        {
            return Err(CocoonError::validation("spin values must be finite"));
        }
        Ok(())
    }

    /// Euler angles `(pitch, yaw)` at `time`, holding at `freeze_at` if given.
    pub fn angles(&self, time: f32, freeze_at: Option<f32>) -> (f32, f32) {
        let t = freeze_at.map_or(time, |f| time.min(f));
        ((t / self.tilt_period).sin() * self.tilt_amount, t * self.yaw_speed)
    }

    /// Model rotation (pitch about x, then yaw about y, intrinsic XYZ order).
    pub fn rotation(&self, time: f32, freeze_at: Option<f32>) -> Quat {
        let (pitch, yaw) = self.angles(time, freeze_at);
        Quat::from_euler(EulerRot::XYZ, pitch, yaw, 0.0)
    }
}
