//! File system utilities for bundling.
//!
//! Idempotent directory operations used around the staging tree.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("bdist.nsis");
        create_dir_all(&tree.join("package/foo"), false).await.unwrap();
        std::fs::write(tree.join("setup.nsi"), "").unwrap();

        remove_file(&tree.join("setup.nsi")).await.unwrap();
        remove_file(&tree.join("setup.nsi")).await.unwrap();
        remove_dir_all(&tree).await.unwrap();
        remove_dir_all(&tree).await.unwrap();
        assert!(!tree.exists());
    }

    #[tokio::test]
    async fn test_create_dir_all_can_erase() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("out");
        create_dir_all(&tree, false).await.unwrap();
        std::fs::write(tree.join("stale.txt"), "").unwrap();
        create_dir_all(&tree, true).await.unwrap();
        assert!(tree.is_dir());
        assert!(!tree.join("stale.txt").exists());
    }
}
