//! Error types for bundler operations.
//!
//! Provides error handling with contextual error chaining and
//! filesystem-specific errors.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Error classes
//!
//! Only [`Error::Config`] and [`Error::Platform`] abort a run before any
//! staging happens. Discovery problems are logged and skipped, and a failing
//! `makensis` is downgraded to a warning by the orchestrator.

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "reading pyproject.toml")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Child process execution error.
    ///
    /// Used when an external command cannot be spawned at all.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// External command ran but exited unsuccessfully.
    #[error("command {command} exited with {status}")]
    CommandStatus {
        /// Command that failed
        command: String,
        /// Exit status as reported by the OS
        status: std::process::ExitStatus,
    },

    /// Invalid or conflicting configuration, raised before any staging.
    #[error("configuration error: {0}")]
    Config(String),

    /// The host platform cannot produce the requested installer.
    #[error("platform error: {0}")]
    Platform(String),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking the staged tree.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Handlebars template rendering error.
    #[error("{0}")]
    HandleBarsError(#[from] handlebars::RenderError),

    /// Handlebars template parsing error.
    #[error("{0}")]
    Template(#[from] handlebars::TemplateError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Returns true for errors that must abort a run before staging.
    pub fn is_fatal_precondition(&self) -> bool {
        match self {
            Self::Config(_) | Self::Platform(_) => true,
            Self::Context(_, inner) => inner.is_fatal_precondition(),
            _ => false,
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nsis::bundler::{ErrorExt, Result};
/// use std::path::Path;
///
/// fn create_staging_dir(path: &Path) -> Result<()> {
///     std::fs::create_dir_all(path).fs_context("creating staging directory", path)?;
///     Ok(())
/// }
/// ```
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "writing script".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// # Examples
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_and_preserves_precondition_class() {
        let err: Result<()> = Err(Error::Config("no application targets".into()));
        let wrapped = err.context("validating settings").unwrap_err();
        assert!(wrapped.is_fatal_precondition());
        assert_eq!(
            wrapped.to_string(),
            "validating settings: configuration error: no application targets"
        );
    }

    #[test]
    fn test_with_context_is_lazy() {
        let ok: Result<u8> = Ok(1);
        assert_eq!(ok.with_context(|| -> String { panic!("not evaluated") }).unwrap(), 1);

        let err: Result<()> = Err(Error::GenericError("walk failed".into()));
        let wrapped = err.with_context(|| format!("classifying {}", "bdist")).unwrap_err();
        assert_eq!(wrapped.to_string(), "classifying bdist: walk failed");
    }

    #[test]
    fn test_fs_context_includes_path() {
        let io: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = io.fs_context("reading pyproject.toml", "/tmp/demo/pyproject.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "reading pyproject.toml /tmp/demo/pyproject.toml: gone"
        );
        assert!(!err.is_fatal_precondition());
    }
}
