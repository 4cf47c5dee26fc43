//! NSIS installer bundler for Python distributions.
//!
//! Stages a distribution with its own `setup.py`, classifies the staged
//! files by install role, and turns them into an NSIS script with one
//! section per application target (a Python installation, or the Python
//! bundled with Maya). `makensis` then compiles the script into a single
//! Windows installer.
//!
//! # Configuration
//!
//! Metadata comes from `[project]` in `pyproject.toml`; installer features
//! from `[tool.nsis]`:
//!
//! ```toml
//! [tool.nsis]
//! target-versions = ["2.7", "3.2"]
//! bits = 32
//! maya = true
//! msvc2008 = true
//! ```
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | Target enumeration | [`targets`] |
//! | Staging | `builder::staging` |
//! | Tree classification | [`tree`] |
//! | Instruction emission | `platform::windows::nsis::emit` |
//! | Script assembly | `platform::windows::nsis::script` |
//! | Compilation | `platform::windows::nsis::build` |

mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod targets;
pub mod tree;
mod utils;

// Public re-exports
pub use builder::{BundleReport, Bundler};
pub use error::{Context, Error, ErrorExt, Result};
pub use settings::{
    BitWidth, NsisCompression, NsisSettings, PackageSettings, Settings, SettingsBuilder,
};

use std::path::PathBuf;

/// A compiled installer.
///
/// # Fields
///
/// - `path`: The installer executable in the dist directory
/// - `size`: Size in bytes
/// - `checksum`: SHA-256 checksum for integrity verification
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BundledArtifact {
    /// Installer path.
    pub path: PathBuf,
    /// Installer size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the installer.
    pub checksum: String,
}
