use crate::error::GenerateError;
use serde::Serialize;
use tracing::error;

/// A structural problem found while validating an input type graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Turn a non-empty issue list into a fatal [`GenerateError::InvalidGraph`]
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> Result<(), GenerateError> {
    if issues.is_empty() {
        return Ok(());
    }
    for issue in &issues {
        error!(location = %issue.location, kind = %issue.kind, "{}", issue.message);
    }
    Err(GenerateError::InvalidGraph { issues })
}
