use super::*;
use crate::foundation::core::Vec3;

fn linear_timeline(spin: IdleSpin) -> MorphTimeline {
    MorphTimeline::new(
        ProgressCurve::Ease {
            start: 2.0,
            duration: 4.0,
            ease: Ease::Linear,
        },
        MorphParams::default(),
        spin,
        10.0,
    )
    .unwrap()
}

#[test]
fn params_carry_time_and_progress() {
    let tl = linear_timeline(IdleSpin::default());
    let p = tl.params_at(4.0);
    assert_eq!(p.time, 4.0);
    assert_eq!(p.morph_progress, 0.5);
    assert_eq!(p.petal_count, 6);
}

#[test]
fn spin_freezes_once_threshold_is_reached() {
    let tl = linear_timeline(IdleSpin::default());
    let freeze = tl.freeze_at().unwrap();
    assert!((freeze - 2.4).abs() < 1e-3);

    let frozen = tl.rotation_at(freeze);
    assert!(tl.rotation_at(9.0).angle_between(frozen) < 1e-5);
    assert!(tl.rotation_at(1.0).angle_between(frozen) > 1e-3);
}

#[test]
fn spin_runs_forever_when_never_morphing() {
    let tl = MorphTimeline::new(
        ProgressCurve::Hold { value: 0.0 },
        MorphParams::default(),
        IdleSpin::default(),
        10.0,
    )
    .unwrap();
    assert_eq!(tl.freeze_at(), None);
    let (_, yaw) = IdleSpin::default().angles(30.0, tl.freeze_at());
    assert!((yaw - 3.0).abs() < 1e-5);
}

#[test]
fn spin_matches_reference_angles() {
    let spin = IdleSpin::default();
    let (pitch, yaw) = spin.angles(2.0, None);
    assert!((pitch - (0.5f32).sin() * 0.2).abs() < 1e-6);
    assert!((yaw - 0.2).abs() < 1e-6);

    let q = spin.rotation(0.0, None);
    assert!((q * Vec3::Z - Vec3::Z).length() < 1e-6);
}

#[test]
fn disabled_spin_is_identity() {
    let tl = linear_timeline(IdleSpin::disabled());
    assert!(tl.rotation_at(1.7).angle_between(Quat::IDENTITY) < 1e-6);
}

#[test]
fn rejects_invalid_curve() {
    let err = MorphTimeline::new(
        ProgressCurve::Hold { value: f32::NAN },
        MorphParams::default(),
        IdleSpin::default(),
        1.0,
    )
    .unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}
