use thiserror::Error;

use modegate_types::{IdError, ModeValidationError};

/// Errors produced while resolving modes or enforcing tool permissions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Unknown mode: {0}")]
    UnknownMode(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown tool group: {0}")]
    UnknownGroup(String),
    #[error("Duplicate mode slug: {0}")]
    DuplicateMode(String),
    #[error("Invalid mode definition: {0}")]
    InvalidMode(#[from] ModeValidationError),
    /// The only error `enforce` produces. Callers match on this exact text.
    #[error("Tool \"{tool}\" is not allowed in {mode} mode.")]
    PermissionDenied { tool: String, mode: String },
    #[error(
        "Tool \"{tool}\" in {mode} mode can only edit files matching {pattern}{}. Got: {path}",
        restriction_suffix(.description)
    )]
    FileRestricted {
        tool: String,
        mode: String,
        pattern: String,
        description: Option<String>,
        path: String,
    },
}

fn restriction_suffix(description: &Option<String>) -> String {
    match description {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

impl From<IdError> for PolicyError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::UnknownTool(name) => PolicyError::UnknownTool(name),
            IdError::UnknownGroup(name) => PolicyError::UnknownGroup(name),
        }
    }
}

pub type PolicyResult<T> = Result<T, PolicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_message() {
        let err = PolicyError::PermissionDenied {
            tool: "write_to_file".into(),
            mode: "architect".into(),
        };
        assert_eq!(
            err.to_string(),
            "Tool \"write_to_file\" is not allowed in architect mode."
        );
    }

    #[test]
    fn test_file_restricted_message() {
        let err = PolicyError::FileRestricted {
            tool: "write_to_file".into(),
            mode: "docs".into(),
            pattern: "\\.md$".into(),
            description: Some("Markdown only".into()),
            path: "src/main.rs".into(),
        };
        assert_eq!(
            err.to_string(),
            "Tool \"write_to_file\" in docs mode can only edit files matching \\.md$ (Markdown only). Got: src/main.rs"
        );
    }

    #[test]
    fn test_id_error_conversion() {
        let err: PolicyError = IdError::UnknownGroup("network".into()).into();
        assert_eq!(err, PolicyError::UnknownGroup("network".into()));
    }
}
