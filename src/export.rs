//! Wavefront OBJ export of deformed frames.

use std::io::Write;

use crate::foundation::error::{CocoonError, CocoonResult};
use crate::session::DeformedMesh;

/// Write `mesh` as a Wavefront OBJ with positions, texture coordinates and normals.
///
/// Positions are in model space. Faces use 1-based `a/a/a` triples since all three attribute
/// streams share one index.
pub fn write_obj<W: Write>(mut w: W, mesh: &DeformedMesh) -> CocoonResult<()> {
    let n = mesh.positions.len();
    if mesh.normals.len() != n || mesh.uvs.len() != n {
        return Err(CocoonError::validation(
            "write_obj expects positions, normals and uvs of equal length",
        ));
    }
    if mesh.indices.len() % 3 != 0 {
        return Err(CocoonError::validation(
            "write_obj expects a triangle list",
        ));
    }
    if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= n) {
        return Err(CocoonError::validation(format!(
            "write_obj index {bad} out of range for {n} vertices"
        )));
    }

    write_body(&mut w, mesh).map_err(|e| CocoonError::io(format!("write obj: {e}")))
}

fn write_body<W: Write>(w: &mut W, mesh: &DeformedMesh) -> std::io::Result<()> {
    writeln!(w, "# cocoon deformed mesh")?;
    writeln!(w, "# time {:.6} progress {:.6}", mesh.time, mesh.progress)?;
    writeln!(
        w,
        "# vertices {} triangles {}",
        mesh.positions.len(),
        mesh.indices.len() / 3
    )?;
    writeln!(w, "o cocoon")?;
    for p in &mesh.positions {
        writeln!(w, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }
    for t in &mesh.uvs {
        writeln!(w, "vt {:.6} {:.6}", t.x, t.y)?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    w.flush()
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
