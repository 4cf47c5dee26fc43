//! NSIS installer bundler for Python distributions
//!
//! This library stages a Python distribution with `setup.py`, classifies the
//! staged files by install role, and generates and compiles an NSIS script
//! whose installer targets every matching Python or Maya runtime on the
//! installing machine.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
