//! Position index to triangle membership, used for normal smoothing.

/// For each position index, the triangles that reference it.
#[derive(Debug, Clone, Default)]
pub(crate) struct VertexAdjacency {
    faces: Vec<Vec<usize>>,
}

impl VertexAdjacency {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that `triangle` uses each of `positions`.
    ///
    /// Must be called with increasing triangle indices. A triangle listing the
    /// same position twice is registered once.
    pub(crate) fn register(&mut self, triangle: usize, positions: [usize; 3]) {
        for position in positions {
            if position >= self.faces.len() {
                self.faces.resize_with(position + 1, Vec::new);
            }
            let members = &mut self.faces[position];
            if members.last() != Some(&triangle) {
                members.push(triangle);
            }
        }
    }

    /// Triangles touching `position`, in creation order.
    pub(crate) fn faces_of(&self, position: usize) -> &[usize] {
        self.faces.get(position).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut adjacency = VertexAdjacency::new();
        adjacency.register(0, [0, 1, 2]);
        adjacency.register(1, [0, 2, 3]);

        assert_eq!(adjacency.faces_of(0), &[0, 1]);
        assert_eq!(adjacency.faces_of(1), &[0]);
        assert_eq!(adjacency.faces_of(2), &[0, 1]);
        assert_eq!(adjacency.faces_of(3), &[1]);
        assert!(adjacency.faces_of(42).is_empty());
    }

    #[test]
    fn test_degenerate_triangle_registered_once() {
        let mut adjacency = VertexAdjacency::new();
        adjacency.register(0, [5, 5, 6]);
        assert_eq!(adjacency.faces_of(5), &[0]);
    }
}
