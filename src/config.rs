//! Import configuration.

use crate::error::{ImportError, Result};

/// What to do when a line fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the import at the first bad line.
    #[default]
    Strict,
    /// Keep going past bad lines and report all of them at the end.
    Collect,
    /// Log bad lines and drop them.
    Skip,
}

/// Import configuration shared by the mesh and material parsers.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// How line-level errors are handled.
    pub error_policy: ErrorPolicy,
    /// Synthesize normals for corners that reference none.
    pub synthesize_normals: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Strict,
            synthesize_normals: true,
        }
    }
}

impl ImportConfig {
    /// Create config with a specific error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Enable or disable normal synthesis.
    pub fn with_normal_synthesis(mut self, enabled: bool) -> Self {
        self.synthesize_normals = enabled;
        self
    }
}

/// Applies an [`ErrorPolicy`] to line-level errors as they occur.
#[derive(Debug)]
pub(crate) struct LineErrors {
    policy: ErrorPolicy,
    collected: Vec<ImportError>,
    skipped: usize,
}

impl LineErrors {
    pub(crate) fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            collected: Vec::new(),
            skipped: 0,
        }
    }

    /// Returns `Err` only when the policy says the import must stop now.
    pub(crate) fn handle(&mut self, error: ImportError) -> Result<()> {
        match self.policy {
            ErrorPolicy::Strict => Err(error),
            ErrorPolicy::Collect => {
                self.collected.push(error);
                Ok(())
            }
            ErrorPolicy::Skip => {
                tracing::warn!(line = error.line(), "skipping line: {}", error);
                self.skipped += 1;
                Ok(())
            }
        }
    }

    pub(crate) fn skipped(&self) -> usize {
        self.skipped
    }

    /// Fails with every collected error, if any.
    pub(crate) fn finish(self) -> Result<()> {
        if self.collected.is_empty() {
            Ok(())
        } else {
            Err(ImportError::Multiple(self.collected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineError;

    #[test]
    fn test_strict_stops_immediately() {
        let mut errors = LineErrors::new(ErrorPolicy::Strict);
        assert!(errors.handle(LineError::Syntax.at(1, "x")).is_err());
    }

    #[test]
    fn test_collect_reports_all_at_end() {
        let mut errors = LineErrors::new(ErrorPolicy::Collect);
        errors.handle(LineError::Syntax.at(1, "x")).unwrap();
        errors.handle(LineError::Syntax.at(4, "y")).unwrap();
        match errors.finish() {
            Err(ImportError::Multiple(all)) => {
                let lines: Vec<_> = all.iter().map(|e| e.line()).collect();
                assert_eq!(lines, vec![Some(1), Some(4)]);
            }
            other => panic!("expected Multiple, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_counts_and_succeeds() {
        let mut errors = LineErrors::new(ErrorPolicy::Skip);
        errors.handle(LineError::Syntax.at(2, "x")).unwrap();
        assert_eq!(errors.skipped(), 1);
        assert!(errors.finish().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = ImportConfig::default()
            .with_error_policy(ErrorPolicy::Skip)
            .with_normal_synthesis(false);
        assert_eq!(config.error_policy, ErrorPolicy::Skip);
        assert!(!config.synthesize_normals);
    }
}
