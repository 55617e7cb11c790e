//! Wavefront OBJ export.
//!
//! Writes a [`Mesh`] back out as triangle soup: every corner gets its own
//! `v`, `vt` and `vn` entry, and faces reference them with 1-based indices.

use std::fmt::{self, Write};

use crate::mesh::{Mesh, DEFAULT_GROUP, NO_MATERIAL};

/// Export a mesh to OBJ text.
pub fn export_obj(mesh: &Mesh, name: &str) -> Result<String, fmt::Error> {
    // Pre-size buffers: ~40 bytes per attribute line, ~30 per face
    let capacity = 256 + mesh.vertex_count() * 120 + mesh.triangle_count() * 30;
    let mut obj = String::with_capacity(capacity);
    write_obj(mesh, name, &mut obj)?;
    Ok(obj)
}

/// Write a mesh as OBJ text into any formatter sink.
///
/// Faces are written in triangle order, so re-importing the text yields the
/// same triangle indices, groups and material buckets.
pub fn write_obj<W: Write>(mesh: &Mesh, name: &str, out: &mut W) -> fmt::Result {
    writeln!(out, "# {}", name)?;
    writeln!(out, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(out, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(out)?;

    for library in &mesh.mtllibs {
        writeln!(out, "mtllib {}", library)?;
    }
    if !mesh.mtllibs.is_empty() {
        writeln!(out)?;
    }

    for corner in 0..mesh.vertex_count() {
        if let Some(p) = mesh.position(corner) {
            if p.w == 1.0 {
                writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
            } else {
                writeln!(out, "v {} {} {} {}", p.x, p.y, p.z, p.w)?;
            }
        }
    }
    writeln!(out)?;

    let texcoords = mesh.has_texcoords();
    if texcoords {
        for corner in 0..mesh.vertex_count() {
            if let Some(t) = mesh.texcoord(corner) {
                writeln!(out, "vt {} {}", t.x, t.y)?;
            }
        }
        writeln!(out)?;
    }

    let normals = mesh.has_normals();
    if normals {
        for corner in 0..mesh.vertex_count() {
            if let Some(n) = mesh.normal(corner) {
                writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
            }
        }
        writeln!(out)?;
    }

    // Import starts in the unnamed group with no material.
    let mut group = DEFAULT_GROUP;
    let mut material = NO_MATERIAL;
    for (triangle, (next_group, next_material)) in triangle_buckets(mesh).into_iter().enumerate() {
        if next_group != group {
            if next_group.is_empty() {
                writeln!(out, "g")?;
            } else {
                writeln!(out, "g {}", next_group)?;
            }
            group = next_group;
        }
        if next_material != material {
            writeln!(out, "usemtl {}", next_material)?;
            material = next_material;
        }
        write_face(triangle, texcoords, normals, out)?;
    }

    Ok(())
}

/// `(group, material)` of every triangle, indexed by triangle.
fn triangle_buckets(mesh: &Mesh) -> Vec<(&str, &str)> {
    let mut buckets = vec![(DEFAULT_GROUP, NO_MATERIAL); mesh.triangle_count()];
    for (group, materials) in &mesh.groups {
        for bucket in materials {
            for &triangle in &bucket.triangles {
                if let Some(slot) = buckets.get_mut(triangle) {
                    *slot = (group.as_str(), bucket.material.as_str());
                }
            }
        }
    }
    buckets
}

fn write_face<W: Write>(triangle: usize, texcoords: bool, normals: bool, out: &mut W) -> fmt::Result {
    write!(out, "f")?;
    for corner in triangle * 3..triangle * 3 + 3 {
        let i = corner + 1;
        match (texcoords, normals) {
            (true, true) => write!(out, " {}/{}/{}", i, i, i)?,
            (true, false) => write!(out, " {}/{}", i, i)?,
            (false, true) => write!(out, " {}//{}", i, i)?,
            (false, false) => write!(out, " {}", i)?,
        }
    }
    writeln!(out)
}
