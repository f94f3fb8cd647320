use thiserror::Error;

/// Errors produced while driving the folder tree and building its outline
#[derive(Debug, Error)]
pub enum OutlineError {
    /// The locator never produced a value within the attempt budget
    #[error("'{target}' was not found after {attempts} attempts")]
    ResolutionTimeout { target: String, attempts: u32 },

    /// Resolution was cancelled while waiting between attempts
    #[error("Resolution of '{target}' cancelled after {attempts} attempts")]
    ResolutionCancelled { target: String, attempts: u32 },

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The folder rows returned by the page could not be parsed
    #[error("Failed to parse folder tree: {0}")]
    TreeParseFailed(String),

    #[error("Failed to write outline to clipboard: {0}")]
    ClipboardFailed(String),
}

impl OutlineError {
    /// Number of locator attempts made, for resolver failures
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::ResolutionTimeout { attempts, .. } | Self::ResolutionCancelled { attempts, .. } => {
                Some(*attempts)
            }
            _ => None,
        }
    }
}

/// Result type alias for outline operations
pub type Result<T> = std::result::Result<T, OutlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = OutlineError::ResolutionTimeout {
            target: ".nav-path".to_string(),
            attempts: 20,
        };
        assert_eq!(err.to_string(), "'.nav-path' was not found after 20 attempts");
        assert_eq!(err.attempts(), Some(20));
    }

    #[test]
    fn test_attempts_absent_for_glue_errors() {
        let err = OutlineError::EvaluationFailed("boom".to_string());
        assert_eq!(err.attempts(), None);
    }
}
