//! Session-oriented rendering of the cocoon-flower scene.

use rayon::prelude::*;

use crate::config::SceneConfig;
use crate::foundation::core::{FrameIndex, FrameRange, Quat, Vec2, Vec3};
use crate::foundation::error::{CocoonError, CocoonResult};
use crate::mesh::{MeshData, smooth_normals};
use crate::morph::{MorphParams, ShapeMorph};
use crate::render::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, SurfaceDraw, create_backend,
};
use crate::sink::{FrameSink, SinkConfig};
use crate::timeline::MorphTimeline;

/// Options controlling `RenderSession` range rendering behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Enable frame-level parallelism (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Frames rendered per batch before they are handed to the sink.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Batches the range was split into.
    pub chunks: u64,
}

/// Deformed surface of one frame, in model space (before the idle spin rotation).
#[derive(Clone, Debug, PartialEq)]
pub struct DeformedMesh {
    /// Scene time of the frame in seconds.
    pub time: f32,
    /// Clamped morph progress of the frame.
    pub progress: f32,
    /// Idle spin rotation of the frame.
    pub rotation: Quat,
    pub positions: Vec<Vec3>,
    /// Recomputed from the deformed positions.
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub petal_mask: Vec<f32>,
    pub center_mask: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Renders frames of one scene.
///
/// The sphere mesh, timeline, backend and (when parallel) the thread pool are built once; every
/// frame is then a pure function of its index.
pub struct RenderSession {
    config: SceneConfig,
    mesh: MeshData,
    timeline: MorphTimeline,
    backend: Box<dyn RenderBackend>,
    pool: Option<rayon::ThreadPool>,
    opts: RenderSessionOpts,
}

impl RenderSession {
    #[tracing::instrument(skip_all, fields(parallel = opts.parallel, threads = ?opts.threads))]
    pub fn new(config: &SceneConfig, opts: RenderSessionOpts) -> CocoonResult<Self> {
        config.validate()?;
        let mesh = config.sphere.build()?;
        let timeline = MorphTimeline::new(
            config.timeline,
            config.morph,
            config.spin,
            config.duration_secs() as f32,
        )?;
        let backend = create_backend(
            BackendKind::Cpu,
            RenderSettings {
                canvas: config.canvas,
                camera: config.camera,
                shader: config.shader(),
                background: config.background,
                bloom: config.bloom,
            },
        )?;
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        tracing::debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            duration_frames = config.duration_frames,
            "render session ready"
        );
        Ok(Self {
            config: config.clone(),
            mesh,
            timeline,
            backend,
            pool,
            opts,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Undeformed base mesh.
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn timeline(&self) -> &MorphTimeline {
        &self.timeline
    }

    pub fn duration_frames(&self) -> u64 {
        self.config.duration_frames
    }

    /// Scene time at which `frame` is sampled.
    pub fn time_at(&self, frame: FrameIndex) -> f32 {
        self.config.fps.frame_time_secs(frame)
    }

    /// Morph parameter snapshot for `frame`.
    pub fn params_at(&self, frame: FrameIndex) -> MorphParams {
        self.timeline.params_at(self.time_at(frame))
    }

    fn check_frame(&self, frame: FrameIndex, what: &str) -> CocoonResult<()> {
        if frame.0 >= self.config.duration_frames {
            return Err(CocoonError::validation(format!(
                "{what} frame {} must be within scene duration {}",
                frame.0, self.config.duration_frames
            )));
        }
        Ok(())
    }

    /// Render a single frame.
    #[tracing::instrument(skip_all, fields(frame = frame.0))]
    pub fn render_frame(&self, frame: FrameIndex) -> CocoonResult<FrameRGBA> {
        self.check_frame(frame, "render_frame")?;
        self.render_unchecked(frame)
    }

    fn render_unchecked(&self, frame: FrameIndex) -> CocoonResult<FrameRGBA> {
        let time = self.time_at(frame);
        let morph = ShapeMorph::new(&self.timeline.params_at(time));
        let morphed = morph.deform(&self.mesh.vertices);
        let draw = SurfaceDraw {
            base: &self.mesh.vertices,
            morphed: &morphed,
            indices: &self.mesh.indices,
            rotation: self.timeline.rotation_at(time),
            time,
            morph_progress: morph.params().morph_progress,
        };
        tracing::debug!(frame = frame.0, time, progress = draw.morph_progress, "render frame");
        self.backend.render_surface(&draw)
    }

    /// Deformed geometry of a frame, for export.
    #[tracing::instrument(skip_all, fields(frame = frame.0))]
    pub fn deform_frame(&self, frame: FrameIndex) -> CocoonResult<DeformedMesh> {
        self.check_frame(frame, "deform_frame")?;
        let time = self.time_at(frame);
        let morph = ShapeMorph::new(&self.timeline.params_at(time));
        let morphed = morph.deform(&self.mesh.vertices);

        let positions: Vec<Vec3> = morphed.iter().map(|v| v.position).collect();
        let normals = smooth_normals(&positions, &self.mesh.indices);
        Ok(DeformedMesh {
            time,
            progress: morph.params().morph_progress,
            rotation: self.timeline.rotation_at(time),
            normals,
            uvs: self.mesh.vertices.iter().map(|v| v.uv).collect(),
            petal_mask: morphed.iter().map(|v| v.petal_mask).collect(),
            center_mask: morphed.iter().map(|v| v.center_mask).collect(),
            positions,
            indices: self.mesh.indices.clone(),
        })
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order. With `parallel`, each
    /// chunk is rendered on the session pool and delivered once complete, so output is identical
    /// to a sequential render.
    #[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> CocoonResult<RenderStats> {
        if range.is_empty() {
            return Err(CocoonError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.config.duration_frames {
            return Err(CocoonError::validation(
                "render_range range must be within scene duration",
            ));
        }

        sink.begin(SinkConfig {
            width: self.config.canvas.width,
            height: self.config.canvas.height,
            fps: self.config.fps,
        })?;

        let mut stats = RenderStats::default();
        for chunk in range.chunks(normalized_chunk_size(self.opts.chunk_size)) {
            let frames: Vec<FrameRGBA> = match self.pool.as_ref() {
                Some(pool) => pool.install(|| {
                    (chunk.start.0..chunk.end.0)
                        .into_par_iter()
                        .map(|f| self.render_unchecked(FrameIndex(f)))
                        .collect::<CocoonResult<Vec<_>>>()
                })?,
                None => (chunk.start.0..chunk.end.0)
                    .map(|f| self.render_unchecked(FrameIndex(f)))
                    .collect::<CocoonResult<Vec<_>>>()?,
            };
            for (f, frame) in (chunk.start.0..chunk.end.0).zip(&frames) {
                sink.push_frame(FrameIndex(f), frame)?;
            }
            stats.frames_total += chunk.len_frames();
            stats.chunks += 1;
        }

        sink.end()?;
        tracing::info!(
            frames = stats.frames_total,
            chunks = stats.chunks,
            parallel = self.pool.is_some(),
            "range rendered"
        );
        Ok(stats)
    }
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(threads: Option<usize>) -> CocoonResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CocoonError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CocoonError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
