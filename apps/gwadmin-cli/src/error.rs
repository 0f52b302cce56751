//! CLI error types and exit codes

use gwadmin_directory::DirectoryError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication or permission error
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Input file error: {0}")]
    InputFile(String),

    #[error("{0}")]
    Directory(#[from] DirectoryError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Io(_) | CliError::InputFile(_) => 1,
            CliError::Validation(_) => 4,
            CliError::Directory(e) => match e {
                DirectoryError::Config(_) => 1,
                DirectoryError::Credentials(_) | DirectoryError::Auth(_) => 2,
                DirectoryError::Http(_) => 3,
                _ => match e.status() {
                    Some(401) | Some(403) => 2,
                    Some(status) if status >= 500 => 5,
                    Some(_) => 4,
                    None => 1,
                },
            },
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some("Run 'gwadmin init' to write a starter configuration."),
            CliError::Directory(DirectoryError::Credentials(_)) => {
                Some("Check credentials.key_file or set GWADMIN_KEY_FILE.")
            }
            CliError::Directory(DirectoryError::Auth(_)) => Some(
                "Make sure domain-wide delegation is granted to the service account for the configured scopes.",
            ),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON error: {}", e))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Config(format!("YAML error: {}", e))
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::InputFile(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwadmin_directory::Operation;

    fn remote(status: Option<u16>) -> CliError {
        CliError::Directory(DirectoryError::Remote {
            operation: Operation::Suspend {
                email: "jane@example.com".to_string(),
            },
            status,
            reason: "test".to_string(),
        })
    }

    #[test]
    fn test_exit_code_config() {
        assert_eq!(CliError::Config("test".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_exit_code_validation() {
        assert_eq!(CliError::Validation("test".to_string()).exit_code(), 4);
    }

    #[test]
    fn test_exit_code_remote_forbidden() {
        assert_eq!(remote(Some(403)).exit_code(), 2);
    }

    #[test]
    fn test_exit_code_remote_server_error() {
        assert_eq!(remote(Some(503)).exit_code(), 5);
    }

    #[test]
    fn test_exit_code_remote_not_found() {
        assert_eq!(remote(Some(404)).exit_code(), 4);
    }

    #[test]
    fn test_exit_code_remote_without_status() {
        assert_eq!(remote(None).exit_code(), 1);
    }

    #[test]
    fn test_exit_code_credentials() {
        let err = CliError::Directory(DirectoryError::Credentials("missing".to_string()));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_directory_error_display_is_passed_through() {
        let err = remote(Some(404));
        assert_eq!(
            err.to_string(),
            "An error has occurred while suspending jane@example.com -- test"
        );
    }
}
