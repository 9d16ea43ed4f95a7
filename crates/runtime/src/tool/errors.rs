use thiserror::Error;

/// Error returned by a tool handler.
///
/// Handler failures are reported back to the model as corrective context,
/// not surfaced to the caller as success.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ToolError {
    /// Human-readable failure description.
    pub message: String,
}

impl ToolError {
    /// Create a new tool error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ToolError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ToolError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
