use super::*;

#[test]
fn defaults_match_reference_look() {
    let p = MorphParams::default();
    assert_eq!(p.petal_count, 6);
    assert_eq!(p.petal_spread, 2.2);
    assert_eq!(p.petal_thickness, 0.35);
    assert_eq!(p.petal_curl, 0.5);
    assert_eq!(p.distort_amount, 0.4);
    assert_eq!(p.center_size, 0.35);
    assert_eq!(p.tuning.cocoon_stretch, 1.8);
    assert_eq!(p.tuning.flatten, 0.08);
    p.validate().unwrap();
}

#[test]
fn sanitized_clamps_progress_and_petal_count() {
    let p = MorphParams {
        morph_progress: 1.35,
        petal_count: 0,
        ..MorphParams::default()
    }
    .sanitized();
    assert_eq!(p.morph_progress, 1.0);
    assert_eq!(p.petal_count, 1);

    let p = MorphParams::default().at(2.0, -0.2).sanitized();
    assert_eq!(p.morph_progress, 0.0);
    assert_eq!(p.time, 2.0);
}

#[test]
fn validate_rejects_bad_values() {
    let bad = [
        MorphParams {
            petal_count: 0,
            ..MorphParams::default()
        },
        MorphParams {
            petal_spread: 0.5,
            ..MorphParams::default()
        },
        MorphParams {
            center_size: 1.0,
            ..MorphParams::default()
        },
        MorphParams {
            time: f32::NAN,
            ..MorphParams::default()
        },
    ];
    for p in bad {
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("validation error:"));
    }
}

#[test]
fn validate_rejects_degenerate_zones() {
    let mut p = MorphParams::default();
    p.tuning.upper_zone = [0.2, 0.2];
    assert!(p.validate().is_err());

    let mut p = MorphParams::default();
    p.tuning.petal_falloff = 0.0;
    assert!(p.validate().is_err());

    let mut p = MorphParams::default();
    p.tuning.sway_speed = [f32::INFINITY, 0.5];
    assert!(p.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let p: MorphParams =
        serde_json::from_str(r#"{ "petal_count": 5, "tuning": { "flatten": 0.2 } }"#).unwrap();
    assert_eq!(p.petal_count, 5);
    assert_eq!(p.petal_spread, 2.2);
    assert_eq!(p.tuning.flatten, 0.2);
    assert_eq!(p.tuning.gap_inward, 0.7);
}
