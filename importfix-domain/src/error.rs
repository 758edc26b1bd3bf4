//! Error types for importfix-domain.
//!
//! Ambiguous headers, unrecognized directives and unknown patch headers are not errors;
//! they surface as diagnostics in the run report.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportfixError {
    /// The manifest, the module directory or a target directory is missing.
    #[error("workspace not found: {path}")]
    WorkspaceNotFound { path: Utf8PathBuf },

    /// A declared source pattern has malformed brace groups.
    #[error("invalid source pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A module descriptor or patch document could not be decoded.
    #[error("invalid document {path}: {message}")]
    Document { path: Utf8PathBuf, message: String },

    /// I/O and other tool errors.
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

impl ImportfixError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        ImportfixError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ImportfixResult<T> = Result<T, ImportfixError>;
