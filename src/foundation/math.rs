//! Scalar helpers with GLSL semantics.

use glam::Vec3;

/// Cubic Hermite step between `e0` and `e1`.
///
/// Descending edges (`e0 > e1`) yield a falling curve: 1 at or below `e1`, 0 at or above `e0`.
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend `a * (1 - t) + b * t`.
///
/// Exact at both endpoints for finite inputs.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Component-wise [`mix`].
#[inline]
pub fn mix_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Floored modulo: result has the sign of `y`.
#[inline]
pub fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
