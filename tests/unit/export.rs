use super::*;
use crate::foundation::core::{Quat, Vec2, Vec3};

fn triangle() -> DeformedMesh {
    DeformedMesh {
        time: 1.5,
        progress: 0.25,
        rotation: Quat::IDENTITY,
        positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        normals: vec![Vec3::Z; 3],
        uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        petal_mask: vec![0.0; 3],
        center_mask: vec![0.0; 3],
        indices: vec![0, 1, 2],
    }
}

#[test]
fn writes_one_based_faces_and_all_streams() {
    let mut out = Vec::new();
    write_obj(&mut out, &triangle()).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("# time 1.500000 progress 0.250000"));
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
    assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 3);
    assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 3);
    assert!(text.contains("v 1.000000 0.000000 0.000000"));
    assert!(text.contains("vn 0.000000 0.000000 1.000000"));
    assert!(text.lines().any(|l| l == "f 1/1/1 2/2/2 3/3/3"));
}

#[test]
fn rejects_inconsistent_meshes() {
    let mut m = triangle();
    m.normals.pop();
    assert!(write_obj(Vec::new(), &m).is_err());

    let mut m = triangle();
    m.indices = vec![0, 1];
    assert!(write_obj(Vec::new(), &m).is_err());

    let mut m = triangle();
    m.indices = vec![0, 1, 3];
    assert!(write_obj(Vec::new(), &m).is_err());
}
