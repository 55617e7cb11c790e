//! Shared types used throughout the library.

mod interner;

pub use interner::NameInterner;

/// Homogeneous vertex position. `w` defaults to 1.
pub type Position = glam::Vec4;
/// Vertex normal. Not necessarily unit length until normals are finalized.
pub type Normal = glam::Vec3;
/// Texture coordinate.
pub type TexCoord = glam::Vec2;

/// Resolved 0-based indices for one triangle corner.
///
/// Texture and normal references are `None` when the face token omitted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CornerRef {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl CornerRef {
    pub fn new(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// A triangle produced by fan-triangulating one face record.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub corners: [CornerRef; 3],
    /// Smoothing group; `<= 0` disables smoothing.
    pub smoothing_group: i32,
    /// Interned material index, `None` before any `usemtl`.
    pub material: Option<usize>,
    /// Interned geometry-group index, 0 is the unnamed group.
    pub group: usize,
    /// 1-based line number of the face record this triangle came from.
    pub(crate) line: usize,
}

impl Triangle {
    /// Position indices of the three corners.
    pub fn positions(&self) -> [usize; 3] {
        self.corners.map(|c| c.position)
    }

    /// Which corner (0..3) uses the given position index, if any.
    pub fn corner_of(&self, position: usize) -> Option<usize> {
        self.corners.iter().position(|c| c.position == position)
    }

    pub fn is_smooth(&self) -> bool {
        self.smoothing_group > 0
    }
}

/// A source line kept for diagnostics raised after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub(crate) fn new(number: usize, text: &str) -> Self {
        Self {
            number,
            text: text.to_string(),
        }
    }
}
