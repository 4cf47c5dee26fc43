//! Installer formats.

pub mod windows;
