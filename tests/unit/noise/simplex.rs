use super::*;

fn grid() -> impl Iterator<Item = Vec3> {
    (0..12).flat_map(|a| {
        (0..12).flat_map(move |b| {
            (0..6).map(move |c| {
                Vec3::new(
                    a as f32 * 0.37 - 2.0,
                    b as f32 * 0.29 - 1.5,
                    c as f32 * 0.83 + 0.1,
                )
            })
        })
    })
}

#[test]
fn output_is_bounded() {
    for p in grid() {
        let n = simplex3(p);
        assert!(n.is_finite());
        assert!((-1.0..=1.0).contains(&n), "noise {n} at {p:?}");
    }
}

#[test]
fn output_varies_across_space() {
    let values: Vec<f32> = grid().map(simplex3).collect();
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert!(max - min > 0.5, "range {min}..{max} too flat");
}

#[test]
fn small_steps_give_small_changes() {
    let d = Vec3::new(1e-3, -7e-4, 5e-4);
    for p in grid() {
        let a = simplex3(p);
        let b = simplex3(p + d);
        assert!((a - b).abs() < 0.05, "jump {a} -> {b} at {p:?}");
    }
}

#[test]
fn is_deterministic() {
    let p = Vec3::new(0.31, -4.2, 17.5);
    assert_eq!(simplex3(p).to_bits(), simplex3(p).to_bits());
}

#[test]
fn repeats_along_the_lattice_diagonal() {
    // Shifting every axis by 289 moves the skewed cell by 578 on each axis, a whole number of
    // hash periods.
    let p = Vec3::new(0.25, 0.5, 0.75);
    let shifted = p + Vec3::splat(289.0);
    assert!((simplex3(p) - simplex3(shifted)).abs() < 1e-2);
}
