//! Face corner parsing and fan triangulation.

use super::accumulator::GeometryAccumulator;
use crate::error::{AttributeKind, LineError};
use crate::types::CornerRef;

/// Raw indices from one `v`, `v/t`, `v//n` or `v/t/n` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CornerToken {
    pub position: i64,
    pub texcoord: Option<i64>,
    pub normal: Option<i64>,
}

impl CornerToken {
    /// Parse one corner token. Empty texture or normal fields are absent.
    pub(crate) fn parse(token: &str) -> Result<Self, LineError> {
        let mut fields = token.split('/');
        let position = match fields.next() {
            Some(field) if !field.is_empty() => parse_index(field, token)?,
            _ => {
                return Err(LineError::malformed(format!(
                    "face corner {:?} has no position index",
                    token
                )))
            }
        };
        let texcoord = parse_optional_index(fields.next(), token)?;
        let normal = parse_optional_index(fields.next(), token)?;

        if fields.next().is_some() {
            return Err(LineError::malformed(format!(
                "face corner {:?} has more than 3 fields",
                token
            )));
        }

        Ok(Self {
            position,
            texcoord,
            normal,
        })
    }

    /// Resolve against the tables as they are right now.
    pub(crate) fn resolve(&self, geometry: &GeometryAccumulator) -> Result<CornerRef, LineError> {
        let position = geometry.resolve_index(self.position, AttributeKind::Position)?;
        let texcoord = self
            .texcoord
            .map(|raw| geometry.resolve_index(raw, AttributeKind::TexCoord))
            .transpose()?;
        let normal = self
            .normal
            .map(|raw| geometry.resolve_index(raw, AttributeKind::Normal))
            .transpose()?;
        Ok(CornerRef::new(position, texcoord, normal))
    }
}

fn parse_index(field: &str, token: &str) -> Result<i64, LineError> {
    field.parse::<i64>().map_err(|_| {
        LineError::malformed(format!("invalid index {:?} in face corner {:?}", field, token))
    })
}

fn parse_optional_index(field: Option<&str>, token: &str) -> Result<Option<i64>, LineError> {
    match field {
        None | Some("") => Ok(None),
        Some(field) => parse_index(field, token).map(Some),
    }
}

/// Parse and resolve every corner of a face record, in order.
pub(crate) fn resolve_corners(
    tokens: &[&str],
    geometry: &GeometryAccumulator,
) -> Result<Vec<CornerRef>, LineError> {
    tokens
        .iter()
        .map(|token| CornerToken::parse(token)?.resolve(geometry))
        .collect()
}

/// Fan-triangulate a polygon around its first corner.
///
/// Yields `k - 2` triangles `{0, i-1, i}` for `k >= 3` corners and nothing
/// otherwise.
pub(crate) fn triangulate<T: Copy>(corners: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    (2..corners.len()).map(move |i| [corners[0], corners[i - 1], corners[i]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Normal, Position, TexCoord};

    #[test]
    fn test_parse_all_token_shapes() {
        assert_eq!(
            CornerToken::parse("3"),
            Ok(CornerToken {
                position: 3,
                texcoord: None,
                normal: None
            })
        );
        assert_eq!(
            CornerToken::parse("3/7"),
            Ok(CornerToken {
                position: 3,
                texcoord: Some(7),
                normal: None
            })
        );
        assert_eq!(
            CornerToken::parse("3//-2"),
            Ok(CornerToken {
                position: 3,
                texcoord: None,
                normal: Some(-2)
            })
        );
        assert_eq!(
            CornerToken::parse("-1/-1/-1"),
            Ok(CornerToken {
                position: -1,
                texcoord: Some(-1),
                normal: Some(-1)
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(CornerToken::parse("/1/1").is_err());
        assert!(CornerToken::parse("1/2/3/4").is_err());
        assert!(CornerToken::parse("a/2").is_err());
        assert!(CornerToken::parse("1.5").is_err());
    }

    #[test]
    fn test_resolve_uses_current_lengths() {
        let mut geometry = GeometryAccumulator::new();
        for i in 0..3 {
            geometry.add_position(Position::new(i as f32, 0.0, 0.0, 1.0));
        }
        geometry.add_texcoord(TexCoord::ZERO);
        geometry.add_normal(Normal::Z);

        let corner = CornerToken::parse("-1/1/-1")
            .unwrap()
            .resolve(&geometry)
            .unwrap();
        assert_eq!(corner, CornerRef::new(2, Some(0), Some(0)));

        let err = CornerToken::parse("1/2").unwrap().resolve(&geometry);
        assert!(matches!(
            err,
            Err(LineError::OutOfRange {
                kind: AttributeKind::TexCoord,
                ..
            })
        ));
    }

    #[test]
    fn test_fan_triangulation() {
        let quad: Vec<_> = triangulate(&[0, 1, 2, 3]).collect();
        assert_eq!(quad, vec![[0, 1, 2], [0, 2, 3]]);

        let pentagon: Vec<_> = triangulate(&[10, 11, 12, 13, 14]).collect();
        assert_eq!(pentagon, vec![[10, 11, 12], [10, 12, 13], [10, 13, 14]]);
    }

    #[test]
    fn test_triangle_count_is_n_minus_two() {
        let corners: Vec<usize> = (0..12).collect();
        for n in 0..corners.len() {
            let expected = n.saturating_sub(2);
            assert_eq!(triangulate(&corners[..n]).count(), expected, "n = {}", n);
        }
    }
}
