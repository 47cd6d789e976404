//! Shared CLI plumbing: exit codes, errors and file helpers.

use std::fmt;
use std::fs;
use std::path::Path;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Bad input or arguments
    Validation = 1,
    /// Filesystem or device failure
    Io = 2,
}

impl ExitCode {
    /// Numeric process status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Error returned by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code to report
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Invalid input or arguments.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// Filesystem, serialization or device failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Reads a source file into a string.
pub fn read_source(path: &Path) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::validation(format!(
            "File not found: {}",
            path.display()
        )));
    }
    fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Writes `content` to `path`.
pub fn write_output(path: &Path, content: &str) -> CliResult<()> {
    fs::write(path, content)
        .map_err(|e| CliError::io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Prints a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(CliError::validation("x").code.as_i32(), 1);
        assert_eq!(CliError::io("x").code.as_i32(), 2);
    }

    #[test]
    fn test_read_missing_file_is_validation_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_source(&temp_dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code, ExitCode::Validation);
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        write_output(&path, "hello").unwrap();
        assert_eq!(read_source(&path).unwrap(), "hello");
    }
}
