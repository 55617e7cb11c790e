//! Dereferences triangles into flat attribute arrays and buckets them by
//! geometry group and material.

use std::collections::BTreeMap;

use super::accumulator::GeometryAccumulator;
use crate::error::{AttributeKind, ImportError, Result};
use crate::mesh::{MaterialGroup, Mesh, DEFAULT_GROUP, NO_MATERIAL};
use crate::types::{CornerRef, NameInterner, SourceLine, Triangle};

/// Name tables and diagnostics needed to finish a mesh.
pub(crate) struct FlattenContext<'a> {
    pub groups: &'a NameInterner,
    pub materials: &'a NameInterner,
    /// First face record with a corner lacking a texture coordinate.
    pub missing_texcoord: Option<&'a SourceLine>,
    /// First face record with a corner lacking a normal.
    pub missing_normal: Option<&'a SourceLine>,
    pub mtllibs: &'a [String],
}

pub(crate) fn flatten(
    geometry: &GeometryAccumulator,
    triangles: &[Triangle],
    context: &FlattenContext<'_>,
) -> Result<Mesh> {
    let with_texcoords = attribute_presence(
        triangles,
        context.missing_texcoord,
        AttributeKind::TexCoord,
        |c| c.texcoord,
    )?;
    let with_normals = attribute_presence(
        triangles,
        context.missing_normal,
        AttributeKind::Normal,
        |c| c.normal,
    )?;

    let corners = triangles.len() * 3;
    let mut positions = Vec::with_capacity(corners * 4);
    let mut texcoords = Vec::with_capacity(if with_texcoords { corners * 2 } else { 0 });
    let mut normals = Vec::with_capacity(if with_normals { corners * 3 } else { 0 });

    for triangle in triangles {
        for corner in &triangle.corners {
            positions.extend_from_slice(&geometry.positions()[corner.position].to_array());
            if let (true, Some(t)) = (with_texcoords, corner.texcoord) {
                texcoords.extend_from_slice(&geometry.texcoords()[t].to_array());
            }
            if let (true, Some(n)) = (with_normals, corner.normal) {
                normals.extend_from_slice(&geometry.normals()[n].to_array());
            }
        }
    }

    Ok(Mesh {
        positions,
        normals,
        texcoords,
        groups: group_triangles(triangles, context.groups, context.materials),
        mtllibs: context.mtllibs.to_vec(),
    })
}

/// Whether every corner has the attribute. Mixed presence is an error naming
/// the first face that lacks it. `first_missing` supplies that face's text.
fn attribute_presence(
    triangles: &[Triangle],
    first_missing: Option<&SourceLine>,
    kind: AttributeKind,
    get: impl Fn(&CornerRef) -> Option<usize>,
) -> Result<bool> {
    let any = triangles
        .iter()
        .any(|triangle| triangle.corners.iter().any(|c| get(c).is_some()));
    if !any {
        return Ok(false);
    }

    match triangles
        .iter()
        .find(|triangle| triangle.corners.iter().any(|c| get(c).is_none()))
    {
        None => Ok(true),
        Some(triangle) => {
            let line = triangle.line;
            let text = first_missing
                .filter(|source| source.number == line)
                .map(|source| source.text.clone())
                .unwrap_or_default();
            Err(ImportError::InconsistentAttributePresence { line, text, kind })
        }
    }
}

/// Bucket triangle indices by `(group, material)`, then re-key by group.
pub(crate) fn group_triangles(
    triangles: &[Triangle],
    groups: &NameInterner,
    materials: &NameInterner,
) -> BTreeMap<String, Vec<MaterialGroup>> {
    let mut flat: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for (index, triangle) in triangles.iter().enumerate() {
        let group = groups.name(triangle.group).unwrap_or(DEFAULT_GROUP);
        let material = triangle
            .material
            .and_then(|m| materials.name(m))
            .unwrap_or(NO_MATERIAL);
        flat.entry((group, material)).or_default().push(index);
    }

    let mut grouped: BTreeMap<String, Vec<MaterialGroup>> = BTreeMap::new();
    for ((group, material), triangles) in flat {
        grouped.entry(group.to_string()).or_default().push(MaterialGroup {
            material: material.to_string(),
            triangles,
        });
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Normal, Position, TexCoord};

    fn triangle(corners: [CornerRef; 3], group: usize, material: Option<usize>, line: usize) -> Triangle {
        Triangle {
            corners,
            smoothing_group: 0,
            material,
            group,
            line,
        }
    }

    fn plain(group: usize, material: Option<usize>) -> Triangle {
        triangle([0, 1, 2].map(|p| CornerRef::new(p, None, None)), group, material, 6)
    }

    fn flatten_context<'a>(
        groups: &'a NameInterner,
        materials: &'a NameInterner,
        missing_texcoord: Option<&'a SourceLine>,
    ) -> FlattenContext<'a> {
        FlattenContext {
            groups,
            materials,
            missing_texcoord,
            missing_normal: None,
            mtllibs: &[],
        }
    }

    fn geometry() -> GeometryAccumulator {
        let mut geometry = GeometryAccumulator::new();
        geometry.add_position(Position::new(0.0, 0.0, 0.0, 1.0));
        geometry.add_position(Position::new(1.0, 0.0, 0.0, 1.0));
        geometry.add_position(Position::new(0.0, 1.0, 0.0, 2.0));
        geometry.add_texcoord(TexCoord::new(0.5, 0.25));
        geometry.add_normal(Normal::Z);
        geometry
    }

    fn bare_face() -> SourceLine {
        SourceLine {
            number: 6,
            text: "f 1 2 3".to_string(),
        }
    }

    #[test]
    fn test_grouping_covers_every_triangle_once() {
        let mut groups = NameInterner::with_first("");
        let hull = groups.intern("hull");
        let mut materials = NameInterner::new();
        let steel = materials.intern("steel");

        let triangles = vec![
            plain(0, None),
            plain(hull, Some(steel)),
            plain(hull, None),
            plain(hull, Some(steel)),
            plain(0, None),
        ];
        let grouped = group_triangles(&triangles, &groups, &materials);

        assert_eq!(grouped[""].len(), 1);
        assert_eq!(grouped[""][0].material, "none");
        assert_eq!(grouped[""][0].triangles, vec![0, 4]);

        let hull_buckets = &grouped["hull"];
        assert_eq!(hull_buckets.len(), 2);
        assert_eq!(hull_buckets[0].material, "none");
        assert_eq!(hull_buckets[0].triangles, vec![2]);
        assert_eq!(hull_buckets[1].material, "steel");
        assert_eq!(hull_buckets[1].triangles, vec![1, 3]);

        let mut all: Vec<usize> = grouped
            .values()
            .flatten()
            .flat_map(|bucket| bucket.triangles.iter().copied())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..triangles.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_flatten_dereferences_in_triangle_order() {
        let geometry = geometry();
        let groups = NameInterner::with_first("");
        let materials = NameInterner::new();
        let corners = [
            CornerRef::new(2, Some(0), Some(0)),
            CornerRef::new(0, Some(0), Some(0)),
            CornerRef::new(1, Some(0), Some(0)),
        ];
        let triangles = vec![triangle(corners, 0, None, 5)];
        let bare = bare_face();
        let context = flatten_context(&groups, &materials, Some(&bare));

        let mesh = flatten(&geometry, &triangles, &context).unwrap();

        assert_eq!(&mesh.positions[..4], &[0.0, 1.0, 0.0, 2.0]);
        assert_eq!(&mesh.positions[4..8], &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.texcoords, [0.5, 0.25].repeat(3));
        assert_eq!(mesh.normals, [0.0, 0.0, 1.0].repeat(3));
        assert!(mesh.has_normals());
        assert!(mesh.has_texcoords());
    }

    #[test]
    fn test_uniformly_absent_attributes_are_empty() {
        let geometry = geometry();
        let groups = NameInterner::with_first("");
        let materials = NameInterner::new();
        let triangles = vec![plain(0, None), plain(0, None)];
        let bare = bare_face();
        let context = flatten_context(&groups, &materials, Some(&bare));

        let mesh = flatten(&geometry, &triangles, &context).unwrap();

        assert_eq!(mesh.positions.len(), 4 * 3 * 2);
        assert!(mesh.texcoords.is_empty());
        assert!(mesh.normals.is_empty());
        assert!(!mesh.has_texcoords());
    }

    #[test]
    fn test_mixed_texcoords_are_rejected() {
        let geometry = geometry();
        let groups = NameInterner::with_first("");
        let materials = NameInterner::new();
        let textured = [0, 1, 2].map(|p| CornerRef::new(p, Some(0), None));
        let triangles = vec![triangle(textured, 0, None, 5), plain(0, None)];
        let bare = bare_face();
        let context = flatten_context(&groups, &materials, Some(&bare));

        match flatten(&geometry, &triangles, &context) {
            Err(ImportError::InconsistentAttributePresence { line, text, kind }) => {
                assert_eq!(line, 6);
                assert_eq!(text, "f 1 2 3");
                assert_eq!(kind, AttributeKind::TexCoord);
            }
            other => panic!("expected inconsistent presence, got {:?}", other),
        }
    }
}
