use thiserror::Error;

#[derive(Error, Debug)]
pub enum KettleError {
    #[error("Homebrew installation failed: {0}")]
    InstallationFailed(String),

    #[error("Command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Failed to parse output: {0}")]
    ParsingFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse property list: {0}")]
    Plist(#[from] plist::Error),
}

impl KettleError {
    /// Exit code of a failed command, if this error came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            KettleError::CommandFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, KettleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = KettleError::CommandFailed {
            command: "services list".to_string(),
            code: 1,
        };
        assert_eq!(
            err.to_string(),
            "Command 'services list' failed with exit code 1"
        );
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_invalid_state_message() {
        let err = KettleError::InvalidState("Homebrew is not installed".to_string());
        assert_eq!(err.to_string(), "Invalid state: Homebrew is not installed");
        assert_eq!(err.exit_code(), None);
    }
}
