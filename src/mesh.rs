//! Base sphere tessellation and normal recomputation.

use std::f32::consts::{PI, TAU};

use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::error::{CocoonError, CocoonResult};
use crate::morph::Vertex;

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex attributes.
    pub vertices: Vec<Vertex>,
    /// Triangle list, counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

/// Upper bound on either segment count of a UV sphere.
pub const MAX_SPHERE_SEGMENTS: u32 = 4096;

/// Sphere tessellation settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SphereSpec {
    /// Sphere radius; the morph expects 1.
    pub radius: f32,
    /// Longitudinal segments.
    pub width_segments: u32,
    /// Latitudinal segments.
    pub height_segments: u32,
}

impl Default for SphereSpec {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 64,
            height_segments: 64,
        }
    }
}

impl SphereSpec {
    /// Check the radius and segment counts.
    pub fn validate(&self) -> CocoonResult<()> {
        validate_sphere(self.radius, self.width_segments, self.height_segments)
    }

    /// Build the sphere.
    pub fn build(&self) -> CocoonResult<MeshData> {
        MeshData::uv_sphere(self.radius, self.width_segments, self.height_segments)
    }
}

impl MeshData {
    /// Latitude/longitude sphere with a duplicated seam column and degenerate pole rows.
    ///
    /// Produces `(w + 1) * (h + 1)` vertices. Segment counts are clamped to `w >= 3`, `h >= 2`
    /// and must not exceed [`MAX_SPHERE_SEGMENTS`].
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> CocoonResult<Self> {
        validate_sphere(radius, width_segments, height_segments)?;
        let w = width_segments.max(3);
        let h = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
        for iy in 0..=h {
            let v = iy as f32 / h as f32;

            // Pole rows shift u by half a segment so their triangles map to the middle of the cell.
            let u_offset = if iy == 0 {
                0.5 / w as f32
            } else if iy == h {
                -0.5 / w as f32
            } else {
                0.0
            };

            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let (sin_u, cos_u) = (u * TAU).sin_cos();
                let (sin_v, cos_v) = (v * PI).sin_cos();

                let position = Vec3::new(
                    -radius * cos_u * sin_v,
                    radius * cos_v,
                    radius * sin_u * sin_v,
                );
                let pole = if iy == 0 { Vec3::Y } else { Vec3::NEG_Y };
                let normal = position.try_normalize().unwrap_or(pole);
                vertices.push(Vertex {
                    position,
                    normal,
                    uv: Vec2::new(u + u_offset, 1.0 - v),
                });
            }
        }

        let row = w + 1;
        let mut indices = Vec::with_capacity((w * (h - 1) * 6) as usize);
        for iy in 0..h {
            for ix in 0..w {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Ok(Self { vertices, indices })
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn validate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> CocoonResult<()> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(CocoonError::validation("sphere radius must be > 0"));
    }
    if width_segments > MAX_SPHERE_SEGMENTS || height_segments > MAX_SPHERE_SEGMENTS {
        return Err(CocoonError::validation(format!(
            "sphere segments must be <= {MAX_SPHERE_SEGMENTS}, \
             got {width_segments}x{height_segments}"
        )));
    }
    Ok(())
}

/// Area-weighted vertex normals for deformed positions.
///
/// Vertices referenced by no triangle, or only by degenerate ones, get `Vec3::Y`.
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(pa), Some(pb), Some(pc)) = (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        // Cross product length is twice the triangle area.
        let n = (*pb - *pa).cross(*pc - *pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/mesh/sphere.rs"]
mod tests;
