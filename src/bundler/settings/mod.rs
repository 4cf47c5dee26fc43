//! Configuration structures for bundling operations.
//!
//! Settings are assembled once per run from `pyproject.toml` and the command
//! line, then threaded through every pipeline step.

mod bits;
mod builder;
mod core;
mod package;
mod windows;

// Re-export all public types
pub use bits::BitWidth;
pub use builder::SettingsBuilder;
pub use core::Settings;
pub use package::PackageSettings;
pub use windows::{NsisCompression, NsisSettings};
