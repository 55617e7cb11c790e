//! Error types for the Wavefront importer.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ImportError.
pub type Result<T> = std::result::Result<T, ImportError>;

/// The per-vertex attribute a face reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
}

impl AttributeKind {
    /// The OBJ record keyword that defines this attribute.
    pub fn keyword(self) -> &'static str {
        match self {
            AttributeKind::Position => "v",
            AttributeKind::TexCoord => "vt",
            AttributeKind::Normal => "vn",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TexCoord => "texture coordinate",
            AttributeKind::Normal => "normal",
        };
        write!(f, "{} ({})", name, self.keyword())
    }
}

/// Main error type for mesh and material imports.
///
/// Every line-level variant carries the 1-based line number and the raw line text.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The document could not be opened or read.
    #[error("unreadable source{}: {source}", display_path(.path))]
    UnreadableSource {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// A line matched no record rule.
    #[error("syntax error on line {line}: {text:?}")]
    SyntaxError { line: usize, text: String },

    /// A record keyword matched but its fields did not parse.
    #[error("malformed record on line {line} ({reason}): {text:?}")]
    MalformedRecord {
        line: usize,
        text: String,
        reason: String,
    },

    /// A face reference resolved outside the data accumulated so far.
    #[error("{kind} index {index} out of range (have {len}) on line {line}: {text:?}")]
    IndexOutOfRange {
        line: usize,
        text: String,
        kind: AttributeKind,
        index: i64,
        len: usize,
    },

    /// Some faces supply an attribute and others do not.
    #[error("inconsistent {kind} presence: face on line {line} has none while others do: {text:?}")]
    InconsistentAttributePresence {
        line: usize,
        text: String,
        kind: AttributeKind,
    },

    /// Every line-level error found when collecting instead of aborting.
    #[error("{} errors while importing, first: {}", .0.len(), first_error(.0))]
    Multiple(Vec<ImportError>),
}

impl ImportError {
    /// The offending line number, where the error is tied to one line.
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::SyntaxError { line, .. }
            | ImportError::MalformedRecord { line, .. }
            | ImportError::IndexOutOfRange { line, .. }
            | ImportError::InconsistentAttributePresence { line, .. } => Some(*line),
            ImportError::UnreadableSource { .. } | ImportError::Multiple(_) => None,
        }
    }

    pub(crate) fn unreadable(path: Option<PathBuf>, source: std::io::Error) -> Self {
        ImportError::UnreadableSource { path, source }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    }
}

fn first_error(errors: &[ImportError]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_default()
}

/// A line-level failure before line context is attached.
///
/// Record handlers return this; the line loop turns it into an [`ImportError`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LineError {
    Syntax,
    Malformed(String),
    OutOfRange {
        kind: AttributeKind,
        index: i64,
        len: usize,
    },
}

impl LineError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        LineError::Malformed(reason.into())
    }

    pub(crate) fn at(self, line: usize, text: &str) -> ImportError {
        let text = text.to_string();
        match self {
            LineError::Syntax => ImportError::SyntaxError { line, text },
            LineError::Malformed(reason) => ImportError::MalformedRecord { line, text, reason },
            LineError::OutOfRange { kind, index, len } => ImportError::IndexOutOfRange {
                line,
                text,
                kind,
                index,
                len,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_carries_context() {
        let err = LineError::malformed("expected 3 numbers").at(7, "v 1 2");
        assert_eq!(err.line(), Some(7));
        let message = err.to_string();
        assert!(message.contains("line 7"));
        assert!(message.contains("v 1 2"));
    }

    #[test]
    fn test_out_of_range_names_record_type() {
        let err = LineError::OutOfRange {
            kind: AttributeKind::Normal,
            index: 4,
            len: 2,
        }
        .at(3, "f 1//5 2//1 3//1");
        assert!(err.to_string().contains("(vn)"));
    }

    #[test]
    fn test_multiple_reports_count() {
        let err = ImportError::Multiple(vec![
            LineError::Syntax.at(1, "bogus"),
            LineError::Syntax.at(2, "worse"),
        ]);
        assert!(err.to_string().starts_with("2 errors"));
        assert_eq!(err.line(), None);
    }
}
