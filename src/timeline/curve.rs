use crate::foundation::error::{CocoonError, CocoonResult};
use crate::timeline::ease::Ease;

const BISECT_ITERS: u32 = 64;
/// Damping ratios within this distance of 1 use the critically damped form.
const CRITICAL_EPS: f32 = 1e-4;

/// Morph progress as a function of scene time.
///
/// Values are raw: spring curves overshoot past 1 and the evaluator clamps.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressCurve {
    /// Constant progress.
    Hold {
        /// Progress value.
        value: f32,
    },
    /// Eased 0→1 transition.
    Ease {
        /// Transition start (seconds).
        start: f32,
        /// Transition length (seconds); 0 is a hard cut.
        duration: f32,
        /// Easing curve.
        ease: Ease,
    },
    /// Unit step response of a unit-mass damped spring released at `start`.
    Spring {
        /// Release time (seconds).
        start: f32,
        /// Spring constant, > 0.
        stiffness: f32,
        /// Damping coefficient, >= 0. Below `2 * sqrt(stiffness)` the curve overshoots.
        damping: f32,
    },
}

impl Default for ProgressCurve {
    fn default() -> Self {
        Self::Ease {
            start: 1.0,
            duration: 3.0,
            ease: Ease::InOutCubic,
        }
    }
}

impl ProgressCurve {
    /// Check the curve's constants.
    pub fn validate(&self) -> CocoonResult<()> {
        match *self {
            Self::Hold { value } => {
                if !value.is_finite() {
                    return Err(CocoonError::validation("hold value must be finite"));
                }
            }
            Self::Ease {
                start, duration, ..
            } => {
                if !start.is_finite() || !duration.is_finite() || duration < 0.0 {
                    return Err(CocoonError::validation(
                        "ease curve needs finite start and duration >= 0",
                    ));
                }
            }
            Self::Spring {
                start,
                stiffness,
                damping,
            } => {
                if !start.is_finite() || !(stiffness.is_finite() && stiffness > 0.0) {
                    return Err(CocoonError::validation(
                        "spring curve needs finite start and stiffness > 0",
                    ));
                }
                if !(damping.is_finite() && damping >= 0.0) {
                    return Err(CocoonError::validation("spring damping must be >= 0"));
                }
            }
        }
        Ok(())
    }

    /// Progress at scene time `t`.
    pub fn progress_at(&self, t: f32) -> f32 {
        match *self {
            Self::Hold { value } => value,
            Self::Ease {
                start,
                duration,
                ease,
            } => {
                if duration <= 0.0 {
                    return if t >= start { 1.0 } else { 0.0 };
                }
                ease.apply((t - start) / duration)
            }
            Self::Spring {
                start,
                stiffness,
                damping,
            } => {
                let tau = t - start;
                if tau <= 0.0 {
                    return 0.0;
                }
                spring_step(stiffness, damping, tau)
            }
        }
    }

    /// Earliest time in `[0, horizon]` at which progress reaches `threshold`.
    ///
    /// Each curve is monotonic up to its first crossing of any reachable threshold, so the
    /// search brackets that stretch directly and bisects it.
    pub fn first_reach(&self, threshold: f32, horizon: f32) -> Option<f32> {
        if self.progress_at(0.0) >= threshold {
            return Some(0.0);
        }
        if !(horizon.is_finite() && horizon > 0.0) {
            return None;
        }

        let (lo, hi) = match *self {
            Self::Hold { .. } => return None,
            Self::Ease {
                start, duration, ..
            } => (start.max(0.0), (start + duration.max(0.0)).min(horizon)),
            Self::Spring {
                start,
                stiffness,
                damping,
            } => {
                let w0 = stiffness.sqrt();
                let zeta = damping / (2.0 * w0);
                if zeta < 1.0 - CRITICAL_EPS {
                    // Rises on [start + 2mh, start + (2m+1)h] with peaks shrinking in m, so
                    // only the first rise ending at or after t = 0 can reach the threshold.
                    let half = std::f32::consts::PI / (w0 * (1.0 - zeta * zeta).sqrt());
                    let m = ((-start / half - 1.0) / 2.0).ceil().max(0.0);
                    let rise_start = start + 2.0 * m * half;
                    (rise_start.max(0.0), (rise_start + half).min(horizon))
                } else if threshold >= 1.0 {
                    return None;
                } else {
                    (start.max(0.0), horizon)
                }
            }
        };
        if lo > hi || self.progress_at(hi) < threshold {
            return None;
        }
        Some(self.bisect(threshold, lo, hi))
    }

    /// Smallest `t` in `[lo, hi]` with progress at or above `threshold`, assuming progress is
    /// non-decreasing there and reaches it by `hi`.
    fn bisect(&self, threshold: f32, mut lo: f32, mut hi: f32) -> f32 {
        if self.progress_at(lo) >= threshold {
            return lo;
        }
        for _ in 0..BISECT_ITERS {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            if self.progress_at(mid) >= threshold {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi
    }
}

fn spring_step(stiffness: f32, damping: f32, tau: f32) -> f32 {
    let w0 = stiffness.sqrt();
    let zeta = damping / (2.0 * w0);

    if (zeta - 1.0).abs() < CRITICAL_EPS {
        return 1.0 - (-w0 * tau).exp() * (1.0 + w0 * tau);
    }
    if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * w0 * tau).exp();
        return 1.0 - decay * ((wd * tau).cos() + (zeta * w0 / wd) * (wd * tau).sin());
    }
    let root = (zeta * zeta - 1.0).sqrt();
    let r1 = -w0 * (zeta - root);
    let r2 = -w0 * (zeta + root);
    1.0 + (r2 * (r1 * tau).exp() - r1 * (r2 * tau).exp()) / (r1 - r2)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/curve.rs"]
mod tests;
