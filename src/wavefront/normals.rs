//! Normal synthesis for corners without an explicit `vn` reference.
//!
//! Smooth corners get the angle-weighted sum of the flat normals of every
//! triangle that shares the position and the smoothing group. Flat corners get
//! their own triangle's face normal. Sums are stored unnormalized and all
//! synthesized normals are normalized in one pass at the end, so the result
//! does not depend on the order corners are visited.

use std::collections::HashMap;

use glam::Vec3;

use super::accumulator::GeometryAccumulator;
use super::adjacency::VertexAdjacency;
use crate::error::AttributeKind;
use crate::types::{Normal, Position, Triangle};

fn dehomogenize(position: Position) -> Vec3 {
    position.truncate() / position.w
}

fn corner_point(positions: &[Position], triangle: &Triangle, corner: usize) -> Vec3 {
    dehomogenize(positions[triangle.corners[corner].position])
}

/// Unnormalized flat normal: `(b - a) x (c - a)`.
pub(crate) fn face_normal(positions: &[Position], triangle: &Triangle) -> Normal {
    let a = corner_point(positions, triangle, 0);
    let b = corner_point(positions, triangle, 1);
    let c = corner_point(positions, triangle, 2);
    (b - a).cross(c - a)
}

/// Interior angle of `triangle` at the corner using `position`, in radians.
///
/// Zero when the triangle does not use `position` or an edge has no length.
pub(crate) fn angle_at(positions: &[Position], triangle: &Triangle, position: usize) -> f32 {
    let Some(origin) = triangle.corner_of(position) else {
        return 0.0;
    };
    let (a, b) = match origin {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let from = corner_point(positions, triangle, origin);
    let e1 = corner_point(positions, triangle, a) - from;
    let e2 = corner_point(positions, triangle, b) - from;

    let lengths = e1.length() * e2.length();
    if lengths <= 0.0 {
        return 0.0;
    }
    (e1.dot(e2) / lengths).clamp(-1.0, 1.0).acos()
}

/// Angle-weighted sum of unit face normals around `position` within one
/// smoothing group. Not normalized.
pub(crate) fn smooth_normal(
    positions: &[Position],
    triangles: &[Triangle],
    adjacency: &VertexAdjacency,
    smoothing_group: i32,
    position: usize,
) -> Normal {
    adjacency
        .faces_of(position)
        .iter()
        .map(|&index| &triangles[index])
        .filter(|adjacent| adjacent.smoothing_group == smoothing_group)
        .fold(Normal::ZERO, |sum, adjacent| {
            let angle = angle_at(positions, adjacent, position);
            if angle > 0.0 {
                sum + angle * face_normal(positions, adjacent).normalize_or_zero()
            } else {
                sum
            }
        })
}

/// Fill every missing corner normal, then normalize the new normals.
///
/// Explicit normals from the document are left untouched. Returns the number
/// of normals added.
pub(crate) fn synthesize_normals(
    geometry: &mut GeometryAccumulator,
    triangles: &mut [Triangle],
    adjacency: &VertexAdjacency,
) -> usize {
    let explicit = geometry.len(AttributeKind::Normal);
    // A smooth vertex gets one normal per smoothing group it sits in.
    let mut smooth_cache: HashMap<(usize, i32), usize> = HashMap::new();

    for t in 0..triangles.len() {
        let mut flat: Option<usize> = None;

        for corner in 0..3 {
            let reference = triangles[t].corners[corner];
            if matches!(reference.normal, Some(n) if n < explicit) {
                continue;
            }

            let triangle = &triangles[t];
            let index = if triangle.is_smooth() {
                let key = (reference.position, triangle.smoothing_group);
                match smooth_cache.get(&key) {
                    Some(&index) => index,
                    None => {
                        let normal = smooth_normal(
                            geometry.positions(),
                            triangles,
                            adjacency,
                            triangle.smoothing_group,
                            reference.position,
                        );
                        let index = geometry.add_normal(normal);
                        smooth_cache.insert(key, index);
                        index
                    }
                }
            } else {
                match flat {
                    Some(index) => index,
                    None => {
                        let normal = face_normal(geometry.positions(), triangle);
                        let index = geometry.add_normal(normal);
                        flat = Some(index);
                        index
                    }
                }
            };

            triangles[t].corners[corner].normal = Some(index);
        }
    }

    geometry.normalize_normals_from(explicit);
    geometry.len(AttributeKind::Normal) - explicit
}
