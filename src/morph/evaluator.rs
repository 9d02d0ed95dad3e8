use std::f32::consts::{PI, TAU};

use rayon::prelude::*;

use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::math::{glsl_mod, mix, mix_vec3, smoothstep};
use crate::morph::params::MorphParams;
use crate::noise::simplex3;

/// One vertex of the base mesh.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    /// Object-space position, on the unit sphere for the reference mesh.
    pub position: Vec3,
    /// Unit normal.
    pub normal: Vec3,
    /// Texture coordinate; `v = 1` at the north pole.
    pub uv: Vec2,
}

impl Vertex {
    /// Project `p` onto the unit sphere and derive the matching normal and uv.
    ///
    /// Zero-length input maps to the north pole.
    pub fn on_unit_sphere(p: Vec3) -> Self {
        let position = p.try_normalize().unwrap_or(Vec3::Y);
        let u = glsl_mod(position.z.atan2(-position.x) / TAU, 1.0);
        let v = position.y.clamp(-1.0, 1.0).acos() / PI;
        Self {
            position,
            normal: position,
            uv: Vec2::new(u, 1.0 - v),
        }
    }
}

/// Displaced vertex plus the shading masks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MorphedVertex {
    /// Blended object-space position.
    pub position: Vec3,
    /// Petal weight in `[0, 1]`, scaled by eased progress.
    pub petal_mask: f32,
    /// Center weight in `[0, 1]`, scaled by eased progress.
    pub center_mask: f32,
}

/// Flower pose of a single vertex with unscaled masks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowerPose {
    /// Object-space position of the fully formed flower.
    pub position: Vec3,
    /// Petal weight in `[0, 1]`.
    pub petal_mask: f32,
    /// Center weight in `[0, 1]`.
    pub center_mask: f32,
}

/// Per-frame evaluator.
///
/// Construction sanitizes the parameters and hoists every term that does not depend on the vertex.
#[derive(Clone, Debug)]
pub struct ShapeMorph {
    params: MorphParams,
    petal_count: f32,
    sector: f32,
    half_sector: f32,
    progress: f32,
    distortion: f32,
    breathe: f32,
    noise_offset: Vec3,
    ripple_phase: f32,
    sway: Vec3,
}

impl ShapeMorph {
    /// Build an evaluator for one frame.
    pub fn new(params: &MorphParams) -> Self {
        let params = params.sanitized();
        let t = &params.tuning;
        let petal_count = params.petal_count as f32;
        let morph = params.morph_progress;

        Self {
            petal_count,
            sector: TAU / petal_count,
            half_sector: PI / petal_count,
            progress: smoothstep(0.0, 1.0, morph),
            distortion: params.distort_amount * (1.0 - morph * t.distort_fade),
            breathe: 1.0 + (params.time * t.breathe_speed).sin() * t.breathe_amount * (1.0 - morph),
            noise_offset: Vec3::splat(params.time * t.noise_speed),
            ripple_phase: params.time * t.ripple_speed,
            sway: Vec3::new(
                (params.time * t.sway_speed[0]).sin() * t.sway_amount,
                0.0,
                (params.time * t.sway_speed[1]).cos() * t.sway_amount,
            ),
            params,
        }
    }

    /// Sanitized parameters this evaluator was built from.
    pub fn params(&self) -> &MorphParams {
        &self.params
    }

    /// Eased blend weight of the flower pose.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Stretched, noise-distorted, breathing sphere.
    pub fn cocoon_pose(&self, v: &Vertex) -> Vec3 {
        let t = &self.params.tuning;
        let mut pos = v.position;
        pos.y *= t.cocoon_stretch;

        let n = simplex3(v.position * t.noise_frequency + self.noise_offset);
        pos += v.normal * n * self.distortion;
        pos * self.breathe
    }

    /// Petaled disc derived from the undeformed position.
    pub fn flower_pose(&self, v: &Vertex) -> FlowerPose {
        let t = &self.params.tuning;
        let p = v.position;

        let theta = p.x.atan2(p.z);
        let normalized_y = p.y / p.length();

        let petal_angle = glsl_mod(theta + PI, self.sector) - self.half_sector;
        let petal_shape =
            1.0 - smoothstep(0.0, t.petal_falloff, petal_angle.abs() / self.half_sector);

        let upper = smoothstep(t.upper_zone[0], t.upper_zone[1], normalized_y);
        let center = smoothstep(1.0 - self.params.center_size, 1.0, normalized_y);
        let bottom = smoothstep(t.bottom_zone[0], t.bottom_zone[1], normalized_y);
        let petal = upper * (1.0 - center) * petal_shape;
        let between = upper * (1.0 - center) * (1.0 - petal_shape);

        let mut f = p;

        // Upper hemisphere collapses into a disc.
        f.y *= mix(1.0, t.flatten, upper);

        // Bottom tucks under and narrows.
        f.y = mix(f.y, t.bottom_floor, bottom * t.bottom_curl);
        let tuck = 1.0 - bottom * t.bottom_flatten * 0.5;
        f.x *= tuck;
        f.z *= tuck;

        // Petals reach out, gaps pull in.
        let spread = mix(1.0, self.params.petal_spread, petal);
        f.x *= spread;
        f.z *= spread;
        let gap = mix(1.0, t.gap_inward, between * (1.0 - center));
        f.x *= gap;
        f.z *= gap;

        let axis_dist = Vec2::new(p.x, p.z).length();
        f.y += petal * self.params.petal_thickness * axis_dist;
        f.y += petal * self.params.petal_curl * axis_dist * axis_dist;

        // Center dome.
        f.y += center * t.center_raise;
        f.y += (1.0 - axis_dist * 2.0) * center * t.center_bulge;

        // Idle motion.
        f.y += (theta * self.petal_count * 2.0 + self.ripple_phase).sin() * t.ripple_amount * petal;
        f += self.sway;

        FlowerPose {
            position: f,
            petal_mask: petal,
            center_mask: center,
        }
    }

    /// Blend both poses by eased progress.
    pub fn evaluate(&self, v: &Vertex) -> MorphedVertex {
        let cocoon = self.cocoon_pose(v);
        let flower = self.flower_pose(v);
        MorphedVertex {
            position: mix_vec3(cocoon, flower.position, self.progress),
            petal_mask: flower.petal_mask * self.progress,
            center_mask: flower.center_mask * self.progress,
        }
    }

    /// Evaluate every vertex in parallel; output order matches input order.
    pub fn deform(&self, vertices: &[Vertex]) -> Vec<MorphedVertex> {
        vertices.par_iter().map(|v| self.evaluate(v)).collect()
    }
}

/// One-off evaluation of a single vertex.
pub fn evaluate(vertex: &Vertex, params: &MorphParams) -> MorphedVertex {
    ShapeMorph::new(params).evaluate(vertex)
}

#[cfg(test)]
#[path = "../../tests/unit/morph/evaluator.rs"]
mod tests;
