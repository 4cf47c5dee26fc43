//! Error types for the command line layer.
//!
//! Wraps [`crate::bundler::Error`] together with argument, manifest and I/O
//! failures, and maps each onto an actionable hint.

use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments or manifest contents
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as Inner;

        match self {
            BundlerError::Cli(CliError::ExecutionFailed { .. }) => {
                vec!["Run from the project directory or pass --source <DIR>".to_string()]
            }
            BundlerError::Cli(CliError::InvalidArguments { .. }) | BundlerError::Toml(_) => {
                vec!["Check [project] and [tool.nsis] in pyproject.toml".to_string()]
            }
            BundlerError::Bundler(Inner::Config(_)) => vec![
                "Pass --target-version X.Y or set target-versions under [tool.nsis]".to_string(),
            ],
            BundlerError::Bundler(Inner::Platform(_)) => {
                vec!["Build distributions with native extensions on Windows".to_string()]
            }
            BundlerError::Bundler(Inner::CommandFailed { .. } | Inner::CommandStatus { .. }) => {
                vec!["Check that --python points at a working interpreter and setup.py runs".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Precondition failures abort before anything is staged, so rerunning
    /// with corrected input is always safe.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BundlerError::Bundler(inner) => inner.is_fatal_precondition(),
            BundlerError::Cli(_) | BundlerError::Toml(_) => true,
            BundlerError::Io(_) => false,
        }
    }
}
