//! Line classification for OBJ geometry documents.
//!
//! Each non-empty line is matched against a fixed, ordered rule table keyed on
//! its first word. The first matching rule decides the record type.

use crate::error::LineError;
use crate::types::{Normal, Position, TexCoord};

/// One parsed OBJ record. Face corners are kept as raw tokens because
/// resolving them needs the accumulator state at this point in the document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Record<'a> {
    MaterialLibrary(&'a str),
    UseMaterial(&'a str),
    Smoothing(i32),
    Group(&'a str),
    Position(Position),
    Normal(Normal),
    TexCoord(TexCoord),
    Face(Vec<&'a str>),
}

type Rule = for<'a> fn(&'a str) -> Result<Record<'a>, LineError>;

/// Record rules in priority order.
const RULES: [(&str, Rule); 8] = [
    ("mtllib", parse_mtllib),
    ("usemtl", parse_usemtl),
    ("s", parse_smoothing),
    ("g", parse_group),
    ("v", parse_position),
    ("vn", parse_normal),
    ("vt", parse_texcoord),
    ("f", parse_face),
];

/// Strip a trailing `#` comment and surrounding whitespace.
pub(crate) fn strip_line(raw: &str) -> &str {
    let line = match raw.find('#') {
        Some(at) => &raw[..at],
        None => raw,
    };
    line.trim()
}

/// Split a stripped line into its keyword and the trimmed remainder.
pub(crate) fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    }
}

/// Classify one raw line. `Ok(None)` means the line is blank or a comment.
pub(crate) fn classify(raw: &str) -> Result<Option<Record<'_>>, LineError> {
    let line = strip_line(raw);
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = split_keyword(line);
    RULES
        .iter()
        .find(|(rule_keyword, _)| *rule_keyword == keyword)
        .map(|(_, rule)| rule(rest).map(Some))
        .unwrap_or(Err(LineError::Syntax))
}

/// Parse whitespace-separated floats into a fixed buffer.
///
/// Returns the buffer and how many values were present. More than `N` values
/// is an error.
pub(crate) fn parse_floats<const N: usize>(
    rest: &str,
    keyword: &str,
) -> Result<([f32; N], usize), LineError> {
    let mut values = [0.0; N];
    let mut count = 0;
    for token in rest.split_whitespace() {
        if count == N {
            return Err(LineError::malformed(format!(
                "too many values for {} (at most {})",
                keyword, N
            )));
        }
        values[count] = token.parse::<f32>().map_err(|_| {
            LineError::malformed(format!("invalid number {:?} in {}", token, keyword))
        })?;
        count += 1;
    }
    Ok((values, count))
}

fn required_name<'a>(rest: &'a str, keyword: &str) -> Result<&'a str, LineError> {
    if rest.is_empty() {
        Err(LineError::malformed(format!("{} needs a name", keyword)))
    } else {
        Ok(rest)
    }
}

fn parse_mtllib(rest: &str) -> Result<Record<'_>, LineError> {
    required_name(rest, "mtllib").map(Record::MaterialLibrary)
}

fn parse_usemtl(rest: &str) -> Result<Record<'_>, LineError> {
    required_name(rest, "usemtl").map(Record::UseMaterial)
}

fn parse_smoothing(rest: &str) -> Result<Record<'_>, LineError> {
    if rest.eq_ignore_ascii_case("off") {
        return Ok(Record::Smoothing(0));
    }
    rest.parse::<i32>()
        .map(Record::Smoothing)
        .map_err(|_| LineError::malformed("smoothing group must be an integer or \"off\""))
}

fn parse_group(rest: &str) -> Result<Record<'_>, LineError> {
    Ok(Record::Group(rest))
}

fn parse_position(rest: &str) -> Result<Record<'_>, LineError> {
    let (v, count) = parse_floats::<7>(rest, "v")?;
    // 6 and 7 values carry a trailing vertex colour, which is dropped.
    let position = match count {
        3 | 6 => Position::new(v[0], v[1], v[2], 1.0),
        4 | 7 => Position::new(v[0], v[1], v[2], v[3]),
        _ => {
            return Err(LineError::malformed(format!(
                "v expects 3 or 4 numbers, got {}",
                count
            )))
        }
    };
    Ok(Record::Position(position))
}

fn parse_normal(rest: &str) -> Result<Record<'_>, LineError> {
    match parse_floats::<3>(rest, "vn")? {
        (v, 3) => Ok(Record::Normal(Normal::from_array(v))),
        (_, count) => Err(LineError::malformed(format!(
            "vn expects 3 numbers, got {}",
            count
        ))),
    }
}

fn parse_texcoord(rest: &str) -> Result<Record<'_>, LineError> {
    match parse_floats::<3>(rest, "vt")? {
        (v, 2 | 3) => Ok(Record::TexCoord(TexCoord::new(v[0], v[1]))),
        (_, count) => Err(LineError::malformed(format!(
            "vt expects 2 or 3 numbers, got {}",
            count
        ))),
    }
}

fn parse_face(rest: &str) -> Result<Record<'_>, LineError> {
    Ok(Record::Face(rest.split_whitespace().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(classify(""), Ok(None));
        assert_eq!(classify("   \t "), Ok(None));
        assert_eq!(classify("# a comment"), Ok(None));
        assert_eq!(classify("   # indented comment"), Ok(None));
    }

    #[test]
    fn test_trailing_comment_is_stripped() {
        assert_eq!(
            classify("v 1 2 3 # corner"),
            Ok(Some(Record::Position(Position::new(1.0, 2.0, 3.0, 1.0))))
        );
        assert_eq!(
            classify("usemtl steel # shiny"),
            Ok(Some(Record::UseMaterial("steel")))
        );
    }

    #[test]
    fn test_position_w_defaults_to_one() {
        assert_eq!(
            classify("v 1 2 3 0.5"),
            Ok(Some(Record::Position(Position::new(1.0, 2.0, 3.0, 0.5))))
        );
        assert_eq!(
            classify("v 1 2 3 0.9 0.1 0.1"),
            Ok(Some(Record::Position(Position::new(1.0, 2.0, 3.0, 1.0))))
        );
    }

    #[test]
    fn test_position_needs_three_numbers() {
        assert!(matches!(classify("v 1 2"), Err(LineError::Malformed(_))));
        assert!(matches!(classify("v 1 x 2"), Err(LineError::Malformed(_))));
        assert!(matches!(
            classify("v 1 2 3 4 5 6 7 8"),
            Err(LineError::Malformed(_))
        ));
    }

    #[test]
    fn test_normal_and_texcoord() {
        assert_eq!(
            classify("vn 0 0 1"),
            Ok(Some(Record::Normal(Normal::new(0.0, 0.0, 1.0))))
        );
        assert_eq!(
            classify("vt 0.25 0.75"),
            Ok(Some(Record::TexCoord(TexCoord::new(0.25, 0.75))))
        );
        assert_eq!(
            classify("vt 0.25 0.75 0"),
            Ok(Some(Record::TexCoord(TexCoord::new(0.25, 0.75))))
        );
        assert!(matches!(classify("vn 0 1"), Err(LineError::Malformed(_))));
        assert!(matches!(classify("vt 0.5"), Err(LineError::Malformed(_))));
    }

    #[test]
    fn test_smoothing_directive() {
        assert_eq!(classify("s 4"), Ok(Some(Record::Smoothing(4))));
        assert_eq!(classify("s off"), Ok(Some(Record::Smoothing(0))));
        assert_eq!(classify("s 0"), Ok(Some(Record::Smoothing(0))));
        assert!(matches!(classify("s"), Err(LineError::Malformed(_))));
        assert!(matches!(classify("s smooth"), Err(LineError::Malformed(_))));
    }

    #[test]
    fn test_groups_and_names() {
        assert_eq!(classify("g"), Ok(Some(Record::Group(""))));
        assert_eq!(classify("g  hull "), Ok(Some(Record::Group("hull"))));
        assert_eq!(
            classify("mtllib ship parts.mtl"),
            Ok(Some(Record::MaterialLibrary("ship parts.mtl")))
        );
        assert!(matches!(classify("usemtl"), Err(LineError::Malformed(_))));
    }

    #[test]
    fn test_face_tokens() {
        assert_eq!(
            classify("f 1/1/1  2//2\t3"),
            Ok(Some(Record::Face(vec!["1/1/1", "2//2", "3"])))
        );
    }

    #[test]
    fn test_unknown_keyword_is_syntax_error() {
        assert_eq!(classify("o object_name"), Err(LineError::Syntax));
        assert_eq!(classify("vp 0.1 0.2"), Err(LineError::Syntax));
        assert_eq!(classify("garbage"), Err(LineError::Syntax));
    }

    #[test]
    fn test_split_keyword() {
        assert_eq!(split_keyword("map_Kd  wood.png"), ("map_Kd", "wood.png"));
        assert_eq!(split_keyword("g"), ("g", ""));
    }
}
