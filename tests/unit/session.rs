use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::mesh::SphereSpec;
use crate::sink::InMemorySink;

fn small_scene() -> SceneConfig {
    SceneConfig {
        canvas: Canvas {
            width: 32,
            height: 24,
        },
        fps: Fps::new(12, 1).unwrap(),
        duration_frames: 60,
        sphere: SphereSpec {
            radius: 1.0,
            width_segments: 16,
            height_segments: 12,
        },
        ..SceneConfig::default()
    }
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn new_rejects_invalid_scenes_and_zero_threads() {
    let mut cfg = small_scene();
    cfg.canvas.width = 0;
    assert!(RenderSession::new(&cfg, RenderSessionOpts::default()).is_err());

    let opts = RenderSessionOpts {
        parallel: true,
        threads: Some(0),
        ..RenderSessionOpts::default()
    };
    assert!(RenderSession::new(&small_scene(), opts).is_err());
}

#[test]
fn new_rejects_oversized_sphere_without_building_it() {
    let mut cfg = small_scene();
    cfg.sphere = SphereSpec {
        width_segments: u32::MAX,
        height_segments: 2,
        ..SphereSpec::default()
    };
    assert!(RenderSession::new(&cfg, RenderSessionOpts::default()).is_err());
}

#[test]
fn params_follow_the_timeline() {
    let s = RenderSession::new(&small_scene(), RenderSessionOpts::default()).unwrap();
    let first = s.params_at(FrameIndex(0));
    assert_eq!(first.time, 0.0);
    assert_eq!(first.morph_progress, 0.0);
    assert_eq!(first.petal_count, 6);

    let last = s.params_at(FrameIndex(59));
    assert!((last.time - 59.0 / 12.0).abs() < 1e-6);
    assert_eq!(last.morph_progress, 1.0);
}

#[test]
fn frames_outside_the_duration_are_rejected() {
    let s = RenderSession::new(&small_scene(), RenderSessionOpts::default()).unwrap();
    assert!(s.render_frame(FrameIndex(60)).is_err());
    assert!(s.deform_frame(FrameIndex(60)).is_err());
    let frame = s.render_frame(FrameIndex(59)).unwrap();
    assert_eq!((frame.width, frame.height), (32, 24));
    assert_eq!(frame.data.len(), 32 * 24 * 4);
}

#[test]
fn deform_frame_is_consistent_with_the_mesh() {
    let s = RenderSession::new(&small_scene(), RenderSessionOpts::default()).unwrap();
    let d = s.deform_frame(FrameIndex(30)).unwrap();
    let n = s.mesh().vertices.len();
    assert_eq!(d.positions.len(), n);
    assert_eq!(d.normals.len(), n);
    assert_eq!(d.uvs.len(), n);
    assert_eq!(d.petal_mask.len(), n);
    assert_eq!(d.center_mask.len(), n);
    assert_eq!(d.indices, s.mesh().indices);
    assert!((0.0..=1.0).contains(&d.progress));
    assert!(d.positions.iter().all(|p| p.is_finite()));
    assert!(
        d.normals
            .iter()
            .all(|v| (v.length() - 1.0).abs() < 1e-4)
    );
}

#[test]
fn render_range_streams_in_order_with_chunk_stats() {
    let opts = RenderSessionOpts {
        chunk_size: 5,
        ..RenderSessionOpts::default()
    };
    let s = RenderSession::new(&small_scene(), opts).unwrap();
    let mut sink = InMemorySink::new();
    let stats = s.render_range(range(10, 22), &mut sink).unwrap();

    assert_eq!(
        stats,
        RenderStats {
            frames_total: 12,
            chunks: 3
        }
    );
    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (10..22).collect::<Vec<_>>());
    assert_eq!(sink.frames[2].1, s.render_frame(FrameIndex(12)).unwrap());
}

#[test]
fn parallel_range_matches_sequential() {
    let seq = RenderSession::new(&small_scene(), RenderSessionOpts::default()).unwrap();
    let par = RenderSession::new(
        &small_scene(),
        RenderSessionOpts {
            parallel: true,
            threads: Some(3),
            chunk_size: 4,
        },
    )
    .unwrap();

    let mut a = InMemorySink::new();
    let mut b = InMemorySink::new();
    seq.render_range(range(0, 10), &mut a).unwrap();
    par.render_range(range(0, 10), &mut b).unwrap();
    assert_eq!(a.frames, b.frames);
}

#[test]
fn bad_ranges_are_rejected() {
    let s = RenderSession::new(&small_scene(), RenderSessionOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    assert!(s.render_range(range(3, 3), &mut sink).is_err());
    assert!(s.render_range(range(50, 61), &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn zero_chunk_size_renders_one_frame_per_chunk() {
    let opts = RenderSessionOpts {
        chunk_size: 0,
        ..RenderSessionOpts::default()
    };
    let s = RenderSession::new(&small_scene(), opts).unwrap();
    let mut sink = InMemorySink::new();
    let stats = s.render_range(range(0, 3), &mut sink).unwrap();
    assert_eq!(stats.chunks, 3);
}
