use super::*;
use crate::morph::params::ArtTuning;

fn sphere_samples() -> Vec<Vertex> {
    let mut out = Vec::new();
    for lat in 0..=12 {
        let y = 1.0 - 2.0 * (lat as f32 / 12.0);
        let ring = (1.0 - y * y).max(0.0).sqrt();
        for lon in 0..17 {
            let theta = lon as f32 / 17.0 * TAU - PI;
            out.push(Vertex::on_unit_sphere(Vec3::new(
                theta.sin() * ring,
                y,
                theta.cos() * ring,
            )));
        }
    }
    out
}

fn at(time: f32, progress: f32) -> MorphParams {
    MorphParams::default().at(time, progress)
}

fn vertex_at(theta: f32, y: f32) -> Vertex {
    let ring = (1.0 - y * y).sqrt();
    Vertex::on_unit_sphere(Vec3::new(theta.sin() * ring, y, theta.cos() * ring))
}

#[test]
fn zero_progress_is_pure_cocoon() {
    for time in [0.0, 1.3, 7.9] {
        let morph = ShapeMorph::new(&at(time, 0.0));
        for v in sphere_samples() {
            let out = morph.evaluate(&v);
            assert_eq!(out.position, morph.cocoon_pose(&v));
            assert_eq!(out.petal_mask, 0.0);
            assert_eq!(out.center_mask, 0.0);
        }
    }
}

#[test]
fn full_progress_is_pure_flower() {
    for time in [0.0, 2.1] {
        let morph = ShapeMorph::new(&at(time, 1.0));
        for v in sphere_samples() {
            let out = morph.evaluate(&v);
            let flower = morph.flower_pose(&v);
            assert_eq!(out.position, flower.position);
            assert_eq!(out.petal_mask, flower.petal_mask);
            assert_eq!(out.center_mask, flower.center_mask);
        }
    }
}

#[test]
fn position_is_continuous_in_progress() {
    let d = 1e-4;
    for base in [0.0, 0.25, 0.5, 0.999, 1.0 - d] {
        let a = ShapeMorph::new(&at(0.7, base));
        let b = ShapeMorph::new(&at(0.7, base + d));
        for v in sphere_samples() {
            let pa = a.evaluate(&v).position;
            let pb = b.evaluate(&v).position;
            assert!(
                (pa - pb).length() < 1e-2,
                "jump at progress {base}: {pa:?} -> {pb:?}"
            );
        }
    }
}

#[test]
fn masks_stay_in_unit_range() {
    for progress in [-0.5, 0.0, 0.3, 0.8, 1.0, 1.7] {
        let morph = ShapeMorph::new(&at(3.3, progress));
        for v in sphere_samples() {
            let out = morph.evaluate(&v);
            assert!((0.0..=1.0).contains(&out.petal_mask), "{out:?}");
            assert!((0.0..=1.0).contains(&out.center_mask), "{out:?}");
        }
    }
}

#[test]
fn petal_pattern_repeats_every_sector() {
    for petal_count in [2, 5, 6] {
        let params = MorphParams {
            petal_count,
            ..at(0.0, 1.0)
        };
        let morph = ShapeMorph::new(&params);
        let sector = TAU / petal_count as f32;
        let t = ArtTuning::default();
        let sway = Vec3::new(0.0, 0.0, t.sway_amount);

        for y in [-0.4, 0.1, 0.3, 0.5] {
            for step in 0..9 {
                let theta = -PI + 0.05 + step as f32 * 0.31;
                let a = morph.flower_pose(&vertex_at(theta, y));
                let b = morph.flower_pose(&vertex_at(theta + sector, y));

                assert!((a.petal_mask - b.petal_mask).abs() < 1e-3);
                assert!((a.position.y - b.position.y).abs() < 1e-3);

                let ra = Vec2::new(a.position.x - sway.x, a.position.z - sway.z).length();
                let rb = Vec2::new(b.position.x - sway.x, b.position.z - sway.z).length();
                assert!((ra - rb).abs() < 1e-3, "radius {ra} vs {rb}");
            }
        }
    }
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let params = at(12.34, 0.42);
    let v = vertex_at(0.7, 0.2);
    let a = evaluate(&v, &params);
    let b = evaluate(&v, &params);
    assert_eq!(a.position.to_array().map(f32::to_bits), b.position.to_array().map(f32::to_bits));
    assert_eq!(a.petal_mask.to_bits(), b.petal_mask.to_bits());
    assert_eq!(a.center_mask.to_bits(), b.center_mask.to_bits());
}

#[test]
fn north_pole_is_flower_center() {
    let v = Vertex::on_unit_sphere(Vec3::Y);
    let out = evaluate(&v, &at(0.0, 1.0));
    assert!(out.center_mask > 0.99, "{out:?}");
    assert!(out.petal_mask < 0.01, "{out:?}");
}

#[test]
fn equator_point_at_rest_is_cocoon_only() {
    let v = Vertex::on_unit_sphere(Vec3::X);
    let params = at(0.0, 0.0);
    let out = evaluate(&v, &params);

    let n = simplex3(Vec3::X * 2.0);
    let expected = (Vec3::new(1.0, 0.0, 0.0) + Vec3::X * n * 0.4) * 1.0;
    assert!((out.position - expected).length() < 1e-5, "{out:?}");
    assert_eq!(out.petal_mask, 0.0);
    assert_eq!(out.center_mask, 0.0);
}

#[test]
fn single_petal_spans_the_whole_azimuth() {
    let params = MorphParams {
        petal_count: 1,
        ..at(0.0, 1.0)
    };
    let morph = ShapeMorph::new(&params);

    let masks: Vec<f32> = (0..64)
        .map(|i| {
            let theta = -PI + (i as f32 + 0.5) / 64.0 * TAU;
            morph.flower_pose(&vertex_at(theta, 0.3)).petal_mask
        })
        .collect();
    assert!(masks.iter().all(|m| m.is_finite()));

    // One lobe: above threshold on a single contiguous run centered on theta = 0.
    let above: Vec<bool> = masks.iter().map(|&m| m > 0.1).collect();
    let rises = above.windows(2).filter(|w| !w[0] && w[1]).count();
    assert_eq!(rises, 1);
    assert!(above[31] && above[32]);
    assert!(!above[0] && !above[63]);
}

#[test]
fn zero_petals_behave_like_one() {
    let one = MorphParams {
        petal_count: 1,
        ..at(0.5, 0.9)
    };
    let zero = MorphParams {
        petal_count: 0,
        ..one
    };
    for v in sphere_samples() {
        assert_eq!(evaluate(&v, &zero), evaluate(&v, &one));
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    for v in sphere_samples() {
        assert_eq!(evaluate(&v, &at(1.0, 1.6)), evaluate(&v, &at(1.0, 1.0)));
        assert_eq!(evaluate(&v, &at(1.0, -0.4)), evaluate(&v, &at(1.0, 0.0)));
    }
}

#[test]
fn parallel_deform_matches_sequential() {
    let morph = ShapeMorph::new(&at(4.2, 0.6));
    let verts = sphere_samples();
    let par = morph.deform(&verts);
    let seq: Vec<_> = verts.iter().map(|v| morph.evaluate(v)).collect();
    assert_eq!(par, seq);
}

#[test]
fn unit_sphere_vertex_uv_convention() {
    let north = Vertex::on_unit_sphere(Vec3::new(0.0, 3.0, 0.0));
    assert_eq!(north.position, Vec3::Y);
    assert!((north.uv.y - 1.0).abs() < 1e-6);

    let south = Vertex::on_unit_sphere(-Vec3::Y);
    assert!(south.uv.y.abs() < 1e-6);

    let v = Vertex::on_unit_sphere(Vec3::ZERO);
    assert_eq!(v.position, Vec3::Y);
}
