//! Append-only geometry tables and OBJ index resolution.

use crate::error::{AttributeKind, LineError};
use crate::types::{Normal, Position, TexCoord};

/// The `v`, `vn` and `vt` tables in definition order.
#[derive(Debug, Clone, Default)]
pub(crate) struct GeometryAccumulator {
    positions: Vec<Position>,
    normals: Vec<Normal>,
    texcoords: Vec<TexCoord>,
}

impl GeometryAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_position(&mut self, position: Position) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    pub(crate) fn add_normal(&mut self, normal: Normal) -> usize {
        self.normals.push(normal);
        self.normals.len() - 1
    }

    pub(crate) fn add_texcoord(&mut self, texcoord: TexCoord) -> usize {
        self.texcoords.push(texcoord);
        self.texcoords.len() - 1
    }

    pub(crate) fn len(&self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Position => self.positions.len(),
            AttributeKind::TexCoord => self.texcoords.len(),
            AttributeKind::Normal => self.normals.len(),
        }
    }

    /// Resolve a raw 1-based or negative relative OBJ index to a 0-based one.
    ///
    /// Negative indices count back from the table length at call time, so a
    /// later `v` line never changes what an earlier `-1` meant.
    pub(crate) fn resolve_index(&self, raw: i64, kind: AttributeKind) -> Result<usize, LineError> {
        let len = self.len(kind);
        let resolved = match raw {
            0 => {
                return Err(LineError::malformed(format!(
                    "{} index 0 is not valid, indices start at 1",
                    kind.keyword()
                )))
            }
            r if r > 0 => r - 1,
            r => len as i64 + r,
        };

        if resolved < 0 || resolved >= len as i64 {
            return Err(LineError::OutOfRange {
                kind,
                index: raw,
                len,
            });
        }
        Ok(resolved as usize)
    }

    pub(crate) fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub(crate) fn normals(&self) -> &[Normal] {
        &self.normals
    }

    pub(crate) fn texcoords(&self) -> &[TexCoord] {
        &self.texcoords
    }

    /// Normalize every normal from `start` on. Zero-length normals stay zero.
    pub(crate) fn normalize_normals_from(&mut self, start: usize) {
        for normal in self.normals.iter_mut().skip(start) {
            *normal = normal.normalize_or_zero();
        }
    }
}
