//! NSIS toolset location.
//!
//! Finds the `makensis` compiler once per run and hands it around as a
//! [`Toolset`] value.

use crate::bundler::error::{Context, Result};
use std::path::{Path, PathBuf};

/// Conventional Windows install locations, searched after `PATH`.
const COMMON_NSIS_DIRS: &[&str] = &[r"C:\Program Files\NSIS", r"C:\Program Files (x86)\NSIS"];

const MAKENSIS_NAMES: &[&str] = &["makensis.exe", "makensis"];

/// A located NSIS compiler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Toolset {
    makensis: PathBuf,
}

impl Toolset {
    /// Uses `makensis` at an already known path.
    pub fn new(makensis: impl Into<PathBuf>) -> Self {
        Self {
            makensis: makensis.into(),
        }
    }

    /// Locate `makensis`.
    ///
    /// An explicit `nsis_dir` is the only place searched when given.
    /// Otherwise `PATH` is tried first, then the usual install directories.
    pub fn locate(nsis_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = nsis_dir {
            match find_in_dir(dir) {
                Some(path) => return Ok(Self::new(path)),
                None => crate::bail!("makensis not found in {}", dir.display()),
            }
        }

        if let Ok(path) = which::which("makensis") {
            log::debug!("Found makensis on PATH: {}", path.display());
            return Ok(Self::new(path));
        }

        COMMON_NSIS_DIRS
            .iter()
            .find_map(|dir| find_in_dir(Path::new(dir)))
            .map(Self::new)
            .context("makensis not found. Add the NSIS directory to PATH or pass --nsis-dir")
    }

    /// Path of the compiler executable.
    pub fn makensis(&self) -> &Path {
        &self.makensis
    }
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    MAKENSIS_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_is_searched_exclusively() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Toolset::locate(Some(dir.path())).is_err());

        let makensis = dir.path().join("makensis");
        std::fs::write(&makensis, b"").unwrap();
        let toolset = Toolset::locate(Some(dir.path())).unwrap();
        assert_eq!(toolset.makensis(), makensis);
    }

    #[test]
    fn test_windows_name_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("makensis"), b"").unwrap();
        std::fs::write(dir.path().join("makensis.exe"), b"").unwrap();
        let toolset = Toolset::locate(Some(dir.path())).unwrap();
        assert_eq!(toolset.makensis(), dir.path().join("makensis.exe"));
    }
}
