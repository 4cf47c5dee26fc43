//! Staged tree discovery and classification.
//!
//! The staging step installs the distribution into a directory shaped by a
//! fixed three-root scheme:
//!
//! ```text
//! <bdist>/package/...          importable packages and modules
//! <bdist>/scripts/...          console scripts
//! <bdist>/include/<name>/...   C headers
//! ```
//!
//! [`StagedTree::walk`] enumerates every regular file below the staging
//! directory and [`Classification::from_entries`] sorts them into an
//! [`InstallRole`], recording per role the files in walk order and the
//! removal roots the uninstaller deletes recursively.

use crate::bundler::error::Result;
use std::{
    cmp::Ordering,
    ffi::OsStr,
    path::{Component, Path},
};
use walkdir::{DirEntry, WalkDir};

/// Suffixes of build-metadata artifacts that are never installed.
const BUILD_METADATA_SUFFIXES: &[&str] = &[".egg-info", ".dist-info"];

/// Extensions of interpretable source files.
const PYTHON_SOURCE_EXTENSIONS: &[&str] = &["py", "pyw"];

/// Install role of a staged file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InstallRole {
    /// Packages and modules, installed into site-packages.
    Package,
    /// Executable scripts.
    Script,
    /// C header files.
    Header,
}

impl InstallRole {
    /// Every role, in the order blocks appear in the script.
    pub const ALL: [InstallRole; 3] = [InstallRole::Package, InstallRole::Script, InstallRole::Header];

    /// Top-level directory of this role inside the staging tree.
    pub fn staging_root(self) -> &'static str {
        match self {
            InstallRole::Package => "package",
            InstallRole::Script => "scripts",
            InstallRole::Header => "include",
        }
    }

    /// NSIS variable holding this role's target directory.
    pub fn nsis_var(self) -> &'static str {
        match self {
            InstallRole::Package => "$PACKAGEDIR",
            InstallRole::Script => "$SCRIPTSDIR",
            InstallRole::Header => "$HEADERSDIR",
        }
    }

    fn from_staging_root(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.staging_root() == segment)
    }
}

/// A file discovered in the staging tree.
///
/// Paths are relative to the staging directory and use `\` separators, as
/// they are written into the NSIS script verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StagedFile {
    role: InstallRole,
    dir: String,
    path: String,
}

impl StagedFile {
    /// Role of this file.
    pub fn role(&self) -> InstallRole {
        self.role
    }

    /// Containing directory, e.g. `package\foo`.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// File path, e.g. `package\foo\bar.py`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Containing directory below the role root, e.g. `foo` (empty at the root).
    pub fn role_dir(&self) -> &str {
        strip_role_root(&self.dir)
    }

    /// File path below the role root, e.g. `foo\bar.py`.
    pub fn role_path(&self) -> &str {
        strip_role_root(&self.path)
    }

    /// First two path segments when the file sits inside a subdirectory of
    /// its role root, e.g. `package\foo`.
    pub fn removal_root(&self) -> Option<&str> {
        let mut separators = self.dir.match_indices('\\').map(|(i, _)| i);
        separators.next()?;
        Some(match separators.next() {
            Some(end) => &self.dir[..end],
            None => &self.dir,
        })
    }

    /// Whether this is interpretable source with compiled siblings.
    pub fn is_python_source(&self) -> bool {
        self.path
            .rsplit_once('.')
            .map(|(_, ext)| {
                PYTHON_SOURCE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }
}

/// Drops the first segment of a staging-relative path.
pub(crate) fn strip_role_root(path: &str) -> &str {
    path.split_once('\\').map(|(_, rest)| rest).unwrap_or("")
}

/// One regular file found by [`StagedTree::walk`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TreeEntry {
    /// File below one of the three role roots.
    Staged(StagedFile),
    /// File anywhere else; carries its staging-relative path.
    Outside(String),
}

/// Enumeration of a staged tree.
pub struct StagedTree;

impl StagedTree {
    /// Walks `root` lazily, yielding every regular file once.
    ///
    /// Within each directory, files come before subdirectories and both are
    /// visited in name order, so files sharing a directory are contiguous.
    /// Build-metadata directories and files are pruned without being yielded.
    pub fn walk(root: &Path) -> impl Iterator<Item = Result<TreeEntry>> {
        let base = root.to_path_buf();
        WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|entry| {
                let metadata = is_build_metadata(entry.file_name());
                if metadata {
                    log::debug!("Excluding build metadata {}", entry.path().display());
                }
                !metadata
            })
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) => Some(to_tree_entry(&base, &entry)),
                Err(e) => Some(Err(e.into())),
            })
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_build_metadata(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    BUILD_METADATA_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

fn to_tree_entry(base: &Path, entry: &DirEntry) -> Result<TreeEntry> {
    let relative = entry.path().strip_prefix(base)?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let path = segments.join("\\");

    let role = match segments.as_slice() {
        [root, _, ..] => InstallRole::from_staging_root(root),
        _ => None,
    };
    Ok(match role {
        Some(role) => {
            let dir = segments[..segments.len() - 1].join("\\");
            TreeEntry::Staged(StagedFile { role, dir, path })
        }
        None => TreeEntry::Outside(path),
    })
}

/// Files of one role, plus the removal roots they imply.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoleFiles {
    files: Vec<StagedFile>,
    removal_roots: Vec<String>,
}

impl RoleFiles {
    /// Appends a file and records its removal root.
    pub fn push(&mut self, file: StagedFile) {
        if let Some(root) = file.removal_root() {
            let root = root.to_string();
            self.insert_removal_root(root);
        }
        self.files.push(file);
    }

    /// Records a removal root; returns false if it was already present.
    pub fn insert_removal_root(&mut self, root: String) -> bool {
        if self.removal_roots.contains(&root) {
            return false;
        }
        self.removal_roots.push(root);
        true
    }

    /// Files in walk order.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Removal roots in first-seen order.
    pub fn removal_roots(&self) -> &[String] {
        &self.removal_roots
    }

    /// Whether no file has this role.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A staged tree sorted by install role.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    package: RoleFiles,
    script: RoleFiles,
    header: RoleFiles,
    skipped: Vec<String>,
}

impl Classification {
    /// Walks and classifies the tree at `root`.
    pub fn classify(root: &Path) -> Result<Self> {
        Self::from_entries(StagedTree::walk(root))
    }

    /// Consumes a tree enumeration.
    ///
    /// Files outside the three roots are logged and remembered in
    /// [`Classification::skipped`]; install schemes may legitimately place
    /// data files there.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<TreeEntry>>,
    {
        let mut classification = Self::default();
        for entry in entries {
            match entry? {
                TreeEntry::Staged(file) => classification.role_mut(file.role()).push(file),
                TreeEntry::Outside(path) => {
                    log::warn!(
                        "Skipping {}: not under package, scripts or include",
                        path
                    );
                    classification.skipped.push(path);
                }
            }
        }
        log::debug!(
            "Classified {} packages, {} scripts, {} headers, {} skipped",
            classification.package.files.len(),
            classification.script.files.len(),
            classification.header.files.len(),
            classification.skipped.len()
        );
        Ok(classification)
    }

    /// Files of one role.
    pub fn role(&self, role: InstallRole) -> &RoleFiles {
        match role {
            InstallRole::Package => &self.package,
            InstallRole::Script => &self.script,
            InstallRole::Header => &self.header,
        }
    }

    fn role_mut(&mut self, role: InstallRole) -> &mut RoleFiles {
        match role {
            InstallRole::Package => &mut self.package,
            InstallRole::Script => &mut self.script,
            InstallRole::Header => &mut self.header,
        }
    }

    /// Files skipped because they are outside every role root.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Number of classified files across all roles.
    pub fn file_count(&self) -> usize {
        InstallRole::ALL
            .into_iter()
            .map(|role| self.role(role).files.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(role: InstallRole, path: &str) -> StagedFile {
        let dir = path.rsplit_once('\\').map(|(d, _)| d).unwrap_or("").to_string();
        StagedFile {
            role,
            dir,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_removal_root_is_first_two_segments() {
        let deep = staged(InstallRole::Package, r"package\foo\sub\mod.py");
        assert_eq!(deep.removal_root(), Some(r"package\foo"));
        let shallow = staged(InstallRole::Package, r"package\foo\bar.py");
        assert_eq!(shallow.removal_root(), Some(r"package\foo"));
        let top = staged(InstallRole::Script, r"scripts\run.py");
        assert_eq!(top.removal_root(), None);
    }

    #[test]
    fn test_role_relative_paths() {
        let file = staged(InstallRole::Package, r"package\foo\bar.py");
        assert_eq!(file.role_dir(), "foo");
        assert_eq!(file.role_path(), r"foo\bar.py");
        let script = staged(InstallRole::Script, r"scripts\run.py");
        assert_eq!(script.role_dir(), "");
        assert_eq!(script.role_path(), "run.py");
    }

    #[test]
    fn test_python_source_detection() {
        assert!(staged(InstallRole::Package, r"package\a.py").is_python_source());
        assert!(staged(InstallRole::Script, r"scripts\gui.PYW").is_python_source());
        assert!(!staged(InstallRole::Package, r"package\a.pyd").is_python_source());
        assert!(!staged(InstallRole::Header, r"include\demo\a.h").is_python_source());
    }

    #[test]
    fn test_removal_roots_are_deduplicated() {
        let mut files = RoleFiles::default();
        files.push(staged(InstallRole::Package, r"package\foo\a.py"));
        files.push(staged(InstallRole::Package, r"package\foo\b.py"));
        assert!(!files.insert_removal_root(r"package\foo".into()));
        assert!(files.insert_removal_root(r"package\bar".into()));
        assert_eq!(files.removal_roots(), [r"package\foo", r"package\bar"]);
        assert_eq!(files.files().len(), 2);
    }

    #[test]
    fn test_from_entries_sorts_roles_and_skips_outside() {
        let entries = vec![
            Ok(TreeEntry::Staged(staged(InstallRole::Package, r"package\foo\a.py"))),
            Ok(TreeEntry::Outside(r"data\share\doc.txt".into())),
            Ok(TreeEntry::Staged(staged(InstallRole::Header, r"include\demo\a.h"))),
        ];
        let classification = Classification::from_entries(entries).unwrap();
        assert_eq!(classification.role(InstallRole::Package).files().len(), 1);
        assert!(classification.role(InstallRole::Script).is_empty());
        assert_eq!(classification.role(InstallRole::Header).removal_roots(), [r"include\demo"]);
        assert_eq!(classification.skipped(), [r"data\share\doc.txt"]);
        assert_eq!(classification.file_count(), 2);
    }
}
