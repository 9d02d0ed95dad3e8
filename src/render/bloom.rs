use rayon::prelude::*;

use crate::foundation::core::Vec3;
use crate::foundation::error::{CocoonError, CocoonResult};
use crate::foundation::math::smoothstep;

const LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Largest accepted blur kernel radius in pixels.
pub const MAX_BLOOM_RADIUS: u32 = 256;

/// Glow pass applied to the linear image before quantization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Luminance where the glow mask starts rising.
    pub threshold: f32,
    /// Width of the soft knee above `threshold`.
    pub smoothing: f32,
    /// Scale of the blurred glow added back onto the image.
    pub intensity: f32,
    /// Blur kernel radius in pixels.
    pub radius: u32,
    /// Gaussian sigma in pixels.
    pub sigma: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            smoothing: 0.9,
            intensity: 2.0,
            radius: 16,
            sigma: 6.0,
        }
    }
}

impl BloomSettings {
    pub fn validate(&self) -> CocoonResult<()> {
        if !(self.threshold.is_finite() && self.smoothing.is_finite() && self.intensity.is_finite())
        {
            return Err(CocoonError::validation("bloom values must be finite"));
        }
        if self.smoothing < 0.0 {
            return Err(CocoonError::validation("bloom.smoothing must be >= 0"));
        }
        if self.intensity < 0.0 {
            return Err(CocoonError::validation("bloom.intensity must be >= 0"));
        }
        if self.radius > MAX_BLOOM_RADIUS {
            return Err(CocoonError::validation(format!(
                "bloom.radius must be <= {MAX_BLOOM_RADIUS}"
            )));
        }
        if self.radius > 0 && !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(CocoonError::validation("bloom.sigma must be > 0"));
        }
        Ok(())
    }

    /// Glow weight of a pixel with the given linear color.
    pub fn mask(&self, rgb: Vec3) -> f32 {
        let luma = rgb.dot(LUMA);
        if self.smoothing <= 0.0 {
            return if luma >= self.threshold { 1.0 } else { 0.0 };
        }
        smoothstep(self.threshold, self.threshold + self.smoothing, luma)
    }

    /// Add the blurred bright parts of `image` back onto it, in place.
    pub fn apply(&self, image: &mut [Vec3], width: u32, height: u32) -> CocoonResult<()> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CocoonError::render("bloom buffer size overflow"))?;
        if image.len() != expected {
            return Err(CocoonError::render(
                "bloom expects an image matching width*height",
            ));
        }
        if self.intensity == 0.0 || expected == 0 {
            return Ok(());
        }

        let bright: Vec<Vec3> = image.par_iter().map(|&c| c * self.mask(c)).collect();
        let glow = blur_rgb(&bright, width, height, self.radius, self.sigma)?;
        image
            .par_iter_mut()
            .zip(glow.par_iter())
            .for_each(|(px, g)| *px += *g * self.intensity);
        Ok(())
    }
}

/// Separable Gaussian blur of a linear RGB image with clamp-to-edge sampling.
pub fn blur_rgb(
    src: &[Vec3],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CocoonResult<Vec<Vec3>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| CocoonError::render("blur buffer size overflow"))?;
    if src.len() != expected {
        return Err(CocoonError::render(
            "blur_rgb expects src matching width*height",
        ));
    }
    if radius == 0 || expected == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel(radius, sigma)?;
    let mut tmp = vec![Vec3::ZERO; expected];
    let mut out = vec![Vec3::ZERO; expected];
    horizontal_pass(src, &mut tmp, width as usize, &kernel);
    vertical_pass(&tmp, &mut out, width as usize, height as usize, &kernel);
    Ok(out)
}

fn gaussian_kernel(radius: u32, sigma: f32) -> CocoonResult<Vec<f32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CocoonError::validation("blur sigma must be > 0"));
    }
    if radius > MAX_BLOOM_RADIUS {
        return Err(CocoonError::validation(format!(
            "blur radius must be <= {MAX_BLOOM_RADIUS}"
        )));
    }
    let r = radius as i64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(CocoonError::render("gaussian kernel sum is zero"));
    }
    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

fn horizontal_pass(src: &[Vec3], dst: &mut [Vec3], width: usize, k: &[f32]) {
    let radius = (k.len() / 2) as isize;
    let max_x = width as isize - 1;
    dst.par_chunks_mut(width)
        .zip(src.par_chunks(width))
        .for_each(|(out_row, in_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                let mut acc = Vec3::ZERO;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x as isize + ki as isize - radius).clamp(0, max_x);
                    acc += in_row[sx as usize] * kw;
                }
                *out = acc;
            }
        });
}

fn vertical_pass(src: &[Vec3], dst: &mut [Vec3], width: usize, height: usize, k: &[f32]) {
    let radius = (k.len() / 2) as isize;
    let max_y = height as isize - 1;
    dst.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                let mut acc = Vec3::ZERO;
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as isize + ki as isize - radius).clamp(0, max_y);
                    acc += src[sy as usize * width + x] * kw;
                }
                *out = acc;
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/render/bloom.rs"]
mod tests;
