//! Error types for the CLI application.

use std::fmt;

use evohold_arena::ArenaError;
use evohold_genetics::GeneticsError;

use crate::config::ConfigError;

/// Custom error type for CLI operations.
///
/// Every variant maps to exit code `2`.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Reproduction failed (most often: no seed supplied)
    Genetics(GeneticsError),

    /// Store, benchmark or tournament failure
    Arena(ArenaError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Genetics(e) => write!(f, "{}", e),
            CliError::Arena(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Genetics(e) => Some(e),
            CliError::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GeneticsError> for CliError {
    fn from(error: GeneticsError) -> Self {
        CliError::Genetics(error)
    }
}

impl From<ArenaError> for CliError {
    fn from(error: ArenaError) -> Self {
        CliError::Arena(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::InvalidInput(format!("malformed JSON: {}", error))
    }
}
