use rayon::prelude::*;

use crate::foundation::core::{Mat4, Vec2, Vec3, Vec4};
use crate::foundation::error::{CocoonError, CocoonResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings, SurfaceDraw};
use crate::shading::Fragment;

/// Depth-buffered triangle rasterizer with deferred shading.
///
/// Only the nearest surface layer is shaded per pixel and composited over the clear color, so
/// the output is always opaque.
pub struct CpuRasterizer {
    settings: RenderSettings,
    view_proj: Mat4,
}

#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    xy: Vec2,
    z: f32,
    inv_w: f32,
    visible: bool,
}

/// Nearest triangle at a pixel and its perspective-correct barycentrics.
#[derive(Clone, Copy, Debug)]
struct Hit {
    tri: u32,
    bary: Vec3,
}

impl CpuRasterizer {
    pub fn new(settings: RenderSettings) -> CocoonResult<Self> {
        settings.canvas.validate()?;
        settings.camera.validate()?;
        if let Some(bloom) = &settings.bloom {
            bloom.validate()?;
        }
        let view_proj = settings.camera.view_proj(settings.canvas.aspect());
        Ok(Self {
            settings,
            view_proj,
        })
    }

    fn project(&self, world: &[Vec3]) -> Vec<ScreenVertex> {
        let w = self.settings.canvas.width as f32;
        let h = self.settings.canvas.height as f32;
        world
            .par_iter()
            .map(|p| {
                let clip = self.view_proj * p.extend(1.0);
                if clip.w <= 1e-6 || !clip.is_finite() {
                    return ScreenVertex {
                        xy: Vec2::ZERO,
                        z: 0.0,
                        inv_w: 0.0,
                        visible: false,
                    };
                }
                let inv_w = 1.0 / clip.w;
                let ndc = clip.truncate() * inv_w;
                ScreenVertex {
                    xy: Vec2::new((ndc.x * 0.5 + 0.5) * w, (0.5 - ndc.y * 0.5) * h),
                    z: ndc.z,
                    inv_w,
                    visible: true,
                }
            })
            .collect()
    }

    fn rasterize(&self, screen: &[ScreenVertex], indices: &[u32]) -> Vec<Option<Hit>> {
        let width = self.settings.canvas.width as usize;
        let height = self.settings.canvas.height as usize;
        let mut depth = vec![f32::INFINITY; width * height];
        let mut hits: Vec<Option<Hit>> = vec![None; width * height];

        for (tri, face) in indices.chunks_exact(3).enumerate() {
            let a = screen[face[0] as usize];
            let b = screen[face[1] as usize];
            let c = screen[face[2] as usize];
            if !(a.visible && b.visible && c.visible) {
                continue;
            }
            let area = edge(a.xy, b.xy, c.xy);
            if area.abs() <= f32::EPSILON {
                continue;
            }

            let min = a.xy.min(b.xy).min(c.xy);
            let max = a.xy.max(b.xy).max(c.xy);
            let x0 = (min.x - 0.5).ceil().max(0.0) as usize;
            let y0 = (min.y - 0.5).ceil().max(0.0) as usize;
            let x1 = ((max.x - 0.5).floor() + 1.0).clamp(0.0, width as f32) as usize;
            let y1 = ((max.y - 0.5).floor() + 1.0).clamp(0.0, height as f32) as usize;

            for y in y0..y1 {
                for x in x0..x1 {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let l = Vec3::new(edge(b.xy, c.xy, p), edge(c.xy, a.xy, p), edge(a.xy, b.xy, p))
                        / area;
                    if l.min_element() < 0.0 {
                        continue;
                    }
                    let z = l.x * a.z + l.y * b.z + l.z * c.z;
                    if !(-1.0..=1.0).contains(&z) {
                        continue;
                    }
                    let idx = y * width + x;
                    if z < depth[idx] {
                        depth[idx] = z;
                        let pw = l * Vec3::new(a.inv_w, b.inv_w, c.inv_w);
                        let sum = pw.x + pw.y + pw.z;
                        let bary = if sum > 0.0 { pw / sum } else { l };
                        hits[idx] = Some(Hit {
                            tri: tri as u32,
                            bary,
                        });
                    }
                }
            }
        }
        hits
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn validate_draw(draw: &SurfaceDraw<'_>) -> CocoonResult<()> {
    if draw.base.len() != draw.morphed.len() {
        return Err(CocoonError::render(format!(
            "vertex count mismatch: {} base vs {} morphed",
            draw.base.len(),
            draw.morphed.len()
        )));
    }
    if draw.indices.len() % 3 != 0 {
        return Err(CocoonError::render(
            "index count must be a multiple of 3",
        ));
    }
    let n = draw.base.len();
    if let Some(&bad) = draw.indices.iter().find(|&&i| i as usize >= n) {
        return Err(CocoonError::render(format!(
            "index {bad} out of range for {n} vertices"
        )));
    }
    if !draw.rotation.is_finite() {
        return Err(CocoonError::render("model rotation must be finite"));
    }
    Ok(())
}

impl RenderBackend for CpuRasterizer {
    fn render_surface(&self, draw: &SurfaceDraw<'_>) -> CocoonResult<FrameRGBA> {
        validate_draw(draw)?;

        let rotation = draw.rotation;
        let world: Vec<Vec3> = draw
            .morphed
            .par_iter()
            .map(|v| rotation * v.position)
            .collect();
        let screen = self.project(&world);
        let hits = self.rasterize(&screen, draw.indices);

        let width = self.settings.canvas.width as usize;
        let background = self.settings.background.rgb();
        let eye = self.settings.camera.position;
        let shader = &self.settings.shader;

        let mut linear = vec![background; hits.len()];
        linear
            .par_chunks_mut(width)
            .zip(hits.par_chunks(width))
            .for_each(|(out_row, hit_row)| {
                for (out, hit) in out_row.iter_mut().zip(hit_row) {
                    let Some(hit) = hit else { continue };
                    let base = hit.tri as usize * 3;
                    let ids = [
                        draw.indices[base] as usize,
                        draw.indices[base + 1] as usize,
                        draw.indices[base + 2] as usize,
                    ];
                    let w = hit.bary.to_array();
                    let mut frag = Fragment {
                        position: Vec3::ZERO,
                        normal: Vec3::ZERO,
                        uv: Vec2::ZERO,
                        petal_mask: 0.0,
                        center_mask: 0.0,
                    };
                    for (&i, &wi) in ids.iter().zip(&w) {
                        frag.position += world[i] * wi;
                        frag.normal += rotation * draw.base[i].normal * wi;
                        frag.uv += draw.base[i].uv * wi;
                        frag.petal_mask += draw.morphed[i].petal_mask * wi;
                        frag.center_mask += draw.morphed[i].center_mask * wi;
                    }
                    let color: Vec4 = shader.shade(&frag, eye, draw.time, draw.morph_progress);
                    let alpha = color.w.clamp(0.0, 1.0);
                    *out = background + (color.truncate() - background) * alpha;
                }
            });

        if let Some(bloom) = &self.settings.bloom {
            bloom.apply(
                &mut linear,
                self.settings.canvas.width,
                self.settings.canvas.height,
            )?;
        }

        let data = linear.iter().flat_map(|c| quantize(*c)).collect();
        Ok(FrameRGBA {
            width: self.settings.canvas.width,
            height: self.settings.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn quantize(c: Vec3) -> [u8; 4] {
    let to_u8 = |v: f32| {
        if v.is_nan() {
            0
        } else {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    };
    [to_u8(c.x), to_u8(c.y), to_u8(c.z), 255]
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
