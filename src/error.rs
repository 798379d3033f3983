//! Error handling module for InstallForge
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Validation findings are NOT errors: they travel as [`crate::recipe::Issue`]
//! values. Only operational failures end up here.

use thiserror::Error;

use crate::recipe::Issue;

/// Main error type for InstallForge
#[derive(Error, Debug)]
pub enum ForgeError {
    /// IO errors (bundle writing, recipe files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A recipe value cannot be represented in the generated shell
    #[error("Cannot quote value for step '{step_id}': {reason}")]
    Quote { step_id: String, reason: String },

    /// Internal generation fault (formatter failure)
    #[error("Render error: {0}")]
    Render(String),

    /// Export refused because the recipe has blocking issues
    #[error("Export blocked by {} error issue(s)", .issues.iter().filter(|i| i.is_error()).count())]
    ExportBlocked { issues: Vec<Issue> },
}

/// Result type alias for InstallForge operations
pub type Result<T> = std::result::Result<T, ForgeError>;

impl ForgeError {
    /// Create a quoting error for the given step
    pub fn quote(step_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Quote {
            step_id: step_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Issues attached to a blocked export, if any
    pub fn blocking_issues(&self) -> Option<&[Issue]> {
        match self {
            Self::ExportBlocked { issues } => Some(issues),
            _ => None,
        }
    }
}

impl From<std::fmt::Error> for ForgeError {
    fn from(_: std::fmt::Error) -> Self {
        Self::Render("formatter error while writing script".to_string())
    }
}
