use glam::{Vec2, Vec3, Vec4};

use crate::foundation::error::{CocoonError, CocoonResult};
use crate::foundation::math::mix_vec3;
use crate::shading::gradient::GradientMap;

/// Lighting and tint coefficients of the cocoon surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadingParams {
    /// Direction towards the key light (normalized at use).
    pub light_dir: Vec3,
    /// Constant light term.
    pub ambient: f32,
    /// Lambert term weight.
    pub diffuse: f32,
    /// Exponent of the rim term.
    pub fresnel_power: f32,
    /// Weight of the rim color.
    pub fresnel_strength: f32,
    /// Rim color.
    pub rim_color: Vec3,
    /// Multiplier applied to petals.
    pub petal_tint: Vec3,
    /// Blend weight of `petal_tint` at full petal mask.
    pub petal_tint_strength: f32,
    /// Multiplier applied to the center.
    pub center_tint: Vec3,
    /// Blend weight of `center_tint` at full center mask.
    pub center_tint_strength: f32,
    /// Specular exponent of the clearcoat highlight.
    pub clearcoat_power: f32,
    /// Clearcoat highlight weight.
    pub clearcoat_strength: f32,
    /// Shimmer stripe frequencies along u and v.
    pub shimmer_frequency: Vec2,
    /// Shimmer amplitude.
    pub shimmer_amount: f32,
    /// Fraction of the shimmer removed at full progress.
    pub shimmer_fade: f32,
    /// Surface opacity facing the camera.
    pub base_alpha: f32,
    /// Extra opacity at grazing angles.
    pub fresnel_alpha: f32,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            light_dir: Vec3::ONE,
            ambient: 0.35,
            diffuse: 0.65,
            fresnel_power: 3.0,
            fresnel_strength: 0.25,
            rim_color: Vec3::new(0.7, 0.9, 1.0),
            petal_tint: Vec3::new(1.0, 0.85, 0.9),
            petal_tint_strength: 0.3,
            center_tint: Vec3::new(1.0, 0.95, 0.7),
            center_tint_strength: 0.5,
            clearcoat_power: 32.0,
            clearcoat_strength: 0.4,
            shimmer_frequency: Vec2::new(30.0, 20.0),
            shimmer_amount: 0.05,
            shimmer_fade: 0.5,
            base_alpha: 0.92,
            fresnel_alpha: 0.08,
        }
    }
}

impl ShadingParams {
    /// Reject non-finite values and a zero light direction.
    pub fn validate(&self) -> CocoonResult<()> {
        let vectors = [
            self.light_dir,
            self.rim_color,
            self.petal_tint,
            self.center_tint,
        ];
        let scalars = [
            self.ambient,
            self.diffuse,
            self.fresnel_power,
            self.fresnel_strength,
            self.petal_tint_strength,
            self.center_tint_strength,
            self.clearcoat_power,
            self.clearcoat_strength,
            self.shimmer_frequency.x,
            self.shimmer_frequency.y,
            self.shimmer_amount,
            self.shimmer_fade,
            self.base_alpha,
            self.fresnel_alpha,
        ];
        if !vectors.iter().all(|v| v.is_finite()) || !scalars.iter().all(|v| v.is_finite()) {
            return Err(CocoonError::validation("shading values must be finite"));
        }
        if self.light_dir.length_squared() == 0.0 {
            return Err(CocoonError::validation("shading.light_dir must be non-zero"));
        }
        Ok(())
    }
}

/// Interpolated surface sample handed to the shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    /// World-space position.
    pub position: Vec3,
    /// World-space normal (need not be normalized).
    pub normal: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
    /// Progress-scaled petal mask.
    pub petal_mask: f32,
    /// Progress-scaled center mask.
    pub center_mask: f32,
}

/// Gradient-mapped surface with diffuse, rim, clearcoat and shimmer terms.
#[derive(Clone, Debug)]
pub struct SurfaceShader {
    params: ShadingParams,
    light_dir: Vec3,
    gradient: GradientMap,
}

impl SurfaceShader {
    /// Build a shader; the light direction is normalized here.
    pub fn new(params: ShadingParams, gradient: GradientMap) -> Self {
        Self {
            light_dir: params.light_dir.try_normalize().unwrap_or(Vec3::Y),
            params,
            gradient,
        }
    }

    /// Coefficients in use.
    pub fn params(&self) -> &ShadingParams {
        &self.params
    }

    /// Straight-alpha color of one fragment.
    ///
    /// The RGB part is unclamped; highlights may exceed 1 and are left for bloom and output
    /// quantization to handle.
    pub fn shade(&self, frag: &Fragment, camera: Vec3, time: f32, morph_progress: f32) -> Vec4 {
        let p = &self.params;
        let l = self.light_dir;
        let n = frag.normal.normalize_or_zero();
        let view = (camera - frag.position).normalize_or_zero();

        let light = p.ambient + n.dot(l).max(0.0) * p.diffuse;
        let fresnel = (1.0 - n.dot(view).max(0.0)).powf(p.fresnel_power);

        let mut base = self.gradient.sample_uv(frag.uv);
        base = mix_vec3(
            base,
            base * p.petal_tint,
            frag.petal_mask * p.petal_tint_strength,
        );
        base = mix_vec3(
            base,
            base * p.center_tint,
            frag.center_mask * p.center_tint_strength,
        );

        // reflect(-l, n)
        let reflected = -l + n * (2.0 * n.dot(l));
        let clearcoat = reflected.dot(view).max(0.0).powf(p.clearcoat_power);
        let shimmer = (frag.uv.x * p.shimmer_frequency.x + frag.uv.y * p.shimmer_frequency.y + time)
            .sin()
            * p.shimmer_amount;

        let color = base * light
            + p.rim_color * (fresnel * p.fresnel_strength)
            + Vec3::splat(clearcoat * p.clearcoat_strength)
            + Vec3::splat(shimmer * (1.0 - morph_progress * p.shimmer_fade));
        let alpha = p.base_alpha + fresnel * p.fresnel_alpha;

        color.extend(alpha)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shading/shader.rs"]
mod tests;
