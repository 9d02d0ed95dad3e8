use super::*;
use crate::timeline::Ease;

#[test]
fn empty_object_is_the_default_scene() {
    let cfg = SceneConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SceneConfig::default());
    cfg.validate().unwrap();
    assert_eq!(cfg.background.to_rgba8(), [5, 5, 5, 255]);
    assert_eq!(cfg.sphere.width_segments, 64);
    assert!(cfg.bloom.is_none());
}

#[test]
fn partial_scene_overrides_only_given_fields() {
    let json = r##"{
        "canvas": { "width": 320, "height": 240 },
        "fps": { "num": 30, "den": 1 },
        "duration_frames": 90,
        "background": "#000000",
        "morph": { "petal_count": 8, "tuning": { "ripple_amount": 0.0 } },
        "timeline": { "kind": "ease", "start": 0.5, "duration": 2.0, "ease": "out_quad" },
        "bloom": { "intensity": 1.5 }
    }"##;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();

    assert_eq!(cfg.canvas, Canvas { width: 320, height: 240 });
    assert_eq!(cfg.duration_frames, 90);
    assert_eq!(cfg.morph.petal_count, 8);
    assert_eq!(cfg.morph.petal_spread, 2.2);
    assert_eq!(cfg.morph.tuning.ripple_amount, 0.0);
    assert_eq!(cfg.morph.tuning.cocoon_stretch, 1.8);
    assert_eq!(
        cfg.timeline,
        ProgressCurve::Ease {
            start: 0.5,
            duration: 2.0,
            ease: Ease::OutQuad
        }
    );
    let bloom = cfg.bloom.unwrap();
    assert_eq!(bloom.intensity, 1.5);
    assert_eq!(bloom.threshold, 0.1);
    assert!((cfg.duration_secs() - 3.0).abs() < 1e-12);
}

#[test]
fn unknown_top_level_fields_are_config_errors() {
    let err = SceneConfig::from_reader(r#"{ "scenes": [] }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, CocoonError::Config(_)));
    assert!(err.to_string().starts_with("config error:"));
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = SceneConfig::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, CocoonError::Config(_)));
}

#[test]
fn missing_file_error_names_the_path() {
    let err = SceneConfig::from_path("/definitely/not/here/scene.json").unwrap_err();
    assert!(matches!(err, CocoonError::Config(_)));
    assert!(err.to_string().contains("/definitely/not/here/scene.json"));
}

#[test]
fn validate_catches_bad_sections() {
    let mut cfg = SceneConfig::default();
    cfg.duration_frames = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.sphere.radius = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.morph.center_size = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.gradient = GradientMap::default();
    cfg.fps.den = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.bloom = Some(BloomSettings {
        intensity: -1.0,
        ..BloomSettings::default()
    });
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.canvas.width = 100_000;
    cfg.canvas.height = 100_000;
    assert!(cfg.validate().is_err());
}

#[test]
fn oversized_sphere_tessellation_is_rejected_before_building() {
    let json = r#"{"sphere":{"radius":1.0,"width_segments":4294967295,"height_segments":2}}"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, CocoonError::Validation(_)));
    assert!(err.to_string().contains("sphere segments"));
}

#[test]
fn oversized_bloom_radius_is_rejected() {
    let json = r#"{"bloom":{"radius":4294967295}}"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert!(matches!(cfg.validate(), Err(CocoonError::Validation(_))));
}

#[test]
fn scene_round_trips_through_json() {
    let mut cfg = SceneConfig::default();
    cfg.bloom = Some(BloomSettings::default());
    cfg.timeline = ProgressCurve::Spring {
        start: 0.5,
        stiffness: 40.0,
        damping: 6.0,
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, cfg);
}
