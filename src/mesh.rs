//! The imported, render-ready mesh.
//!
//! [`Mesh`] is triangle soup: every triangle corner owns its own copy of each
//! attribute, stored as flat `f32` sequences in triangle order so that every
//! three consecutive corners form one triangle. Triangles are partitioned by
//! geometry group and material for batched drawing. Zero-copy byte accessors
//! are provided for buffer upload.

use std::collections::BTreeMap;
use std::mem;

use serde::Serialize;

use crate::types::{Normal, Position, TexCoord};

/// Floats per position (`x, y, z, w`).
pub const POSITION_COMPONENTS: usize = 4;
/// Floats per normal.
pub const NORMAL_COMPONENTS: usize = 3;
/// Floats per texture coordinate.
pub const TEXCOORD_COMPONENTS: usize = 2;

/// Group name used for faces before any `g` line.
pub const DEFAULT_GROUP: &str = "";
/// Material name used for faces before any `usemtl` line.
pub const NO_MATERIAL: &str = "none";

/// Triangles of one geometry group that share one material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterialGroup {
    /// Material name, or [`NO_MATERIAL`].
    pub material: String,
    /// Indices of the triangles in this bucket, ascending.
    pub triangles: Vec<usize>,
}

impl MaterialGroup {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner indices into the flat attribute arrays, three per triangle.
    pub fn vertex_indices(&self) -> Vec<u32> {
        self.triangles
            .iter()
            .flat_map(|&t| {
                let first = (t * 3) as u32;
                [first, first + 1, first + 2]
            })
            .collect()
    }
}

/// An imported mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    /// Homogeneous positions, four floats per corner.
    pub positions: Vec<f32>,
    /// Unit normals, three floats per corner. Empty if the mesh has none.
    pub normals: Vec<f32>,
    /// Texture coordinates, two floats per corner. Empty if the mesh has none.
    pub texcoords: Vec<f32>,
    /// Geometry group name to its per-material triangle buckets.
    pub groups: BTreeMap<String, Vec<MaterialGroup>>,
    /// Material library file names referenced by `mtllib`, first-seen order.
    pub mtllibs: Vec<String>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of triangle corners.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// `true` iff every corner carries a normal.
    pub fn has_normals(&self) -> bool {
        !self.is_empty() && self.normals.len() == self.vertex_count() * NORMAL_COMPONENTS
    }

    /// `true` iff every corner carries a texture coordinate.
    pub fn has_texcoords(&self) -> bool {
        !self.is_empty() && self.texcoords.len() == self.vertex_count() * TEXCOORD_COMPONENTS
    }

    /// Position of corner `index`.
    pub fn position(&self, index: usize) -> Option<Position> {
        let start = index * POSITION_COMPONENTS;
        self.positions
            .get(start..start + POSITION_COMPONENTS)
            .map(Position::from_slice)
    }

    /// Normal of corner `index`.
    pub fn normal(&self, index: usize) -> Option<Normal> {
        let start = index * NORMAL_COMPONENTS;
        self.normals
            .get(start..start + NORMAL_COMPONENTS)
            .map(Normal::from_slice)
    }

    /// Texture coordinate of corner `index`.
    pub fn texcoord(&self, index: usize) -> Option<TexCoord> {
        let start = index * TEXCOORD_COMPONENTS;
        self.texcoords
            .get(start..start + TEXCOORD_COMPONENTS)
            .map(TexCoord::from_slice)
    }

    /// Buckets of one geometry group.
    pub fn group(&self, name: &str) -> Option<&[MaterialGroup]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Distinct material names used by any triangle, sorted.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .groups
            .values()
            .flatten()
            .map(|bucket| bucket.material.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Raw bytes of the positions array. Zero-allocation view.
    pub fn positions_bytes(&self) -> &[u8] {
        cast_slice(&self.positions)
    }

    /// Raw bytes of the normals array. Zero-allocation view.
    pub fn normals_bytes(&self) -> &[u8] {
        cast_slice(&self.normals)
    }

    /// Raw bytes of the texture coordinate array. Zero-allocation view.
    pub fn texcoords_bytes(&self) -> &[u8] {
        cast_slice(&self.texcoords)
    }
}

fn cast_slice(slice: &[f32]) -> &[u8] {
    let ptr = slice.as_ptr() as *const u8;
    let len = mem::size_of_val(slice);
    // SAFETY: f32 has no padding and any byte pattern is a valid u8.
    unsafe { std::slice::from_raw_parts(ptr, len) }
}
