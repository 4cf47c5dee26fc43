//! NSIS installer build execution.
//!
//! Compiles NSI scripts into Windows installer executables using makensis.

use super::toolset::Toolset;
use crate::bundler::error::{Error, ErrorExt, Result};
use std::path::Path;

/// Run makensis to compile NSI script into installer executable.
///
/// The script names its own output file, so the only argument besides
/// verbosity is the script. makensis resolves `File` paths relative to the
/// script, so it runs from the script's directory.
pub async fn run_makensis(toolset: &Toolset, nsi_path: &Path, output_path: &Path) -> Result<()> {
    log::info!("Running {}", toolset.makensis().display());

    // makensis refuses to write into a missing directory
    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating installer output directory", parent)?;
    }

    let mut command = tokio::process::Command::new(toolset.makensis());
    command.arg("-V3").arg(nsi_path);
    if let Some(dir) = nsi_path.parent() {
        command.current_dir(dir);
    }

    let status = command.status().await.map_err(|e| Error::CommandFailed {
        command: toolset.makensis().display().to_string(),
        error: e,
    })?;

    if !status.success() {
        return Err(Error::CommandStatus {
            command: "makensis".to_string(),
            status,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_compiler_is_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let toolset = Toolset::new(dir.path().join("no-such-makensis"));
        let nsi = dir.path().join("setup.nsi");
        let out = dir.path().join("dist").join("demo.exe");
        let err = run_makensis(&toolset, &nsi, &out).await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert!(dir.path().join("dist").is_dir());
    }
}
