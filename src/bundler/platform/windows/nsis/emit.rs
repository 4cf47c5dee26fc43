//! Install and uninstall instruction emission.
//!
//! Turns the files of one [`InstallRole`] into NSIS instructions. Target
//! paths are written through the role's variable (`$PACKAGEDIR`, ...), so
//! one block serves every application target: each target section assigns
//! the variables from its own layout before inserting the block.

use super::utils::escape_path;
use crate::bundler::tree::{Classification, InstallRole, RoleFiles, strip_role_root};

/// Suffixes appended to a source path to name its compiled siblings.
const COMPILED_SUFFIXES: [&str; 2] = ["c", "o"];

/// Instructions for one install role.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstructionBlock {
    role: InstallRole,
    install: Vec<String>,
    uninstall: Vec<String>,
    removal_roots: Vec<String>,
}

impl InstructionBlock {
    /// Emits the block for `files`, or `None` when the role has no files.
    ///
    /// Install instructions switch the output directory only when it differs
    /// from the previous file's. Uninstall instructions delete every file,
    /// the `c`/`o` compiled siblings of every Python source, and finally
    /// each removal root recursively. `RMDir /r` tolerates a missing
    /// directory, so running the uninstaller over a partial install is safe.
    pub fn emit(role: InstallRole, files: &RoleFiles) -> Option<Self> {
        if files.is_empty() {
            return None;
        }

        let var = role.nsis_var();
        let mut install = Vec::with_capacity(files.files().len() + 1);
        let mut uninstall = Vec::with_capacity(files.files().len() * 3);
        let mut current_dir: Option<&str> = None;

        for file in files.files() {
            if current_dir != Some(file.dir()) {
                install.push(format!(
                    "SetOutPath \"{}\"",
                    target_path(var, file.role_dir())
                ));
                current_dir = Some(file.dir());
            }
            install.push(format!("File \"{}\"", escape_path(file.path())));

            let target = target_path(var, file.role_path());
            uninstall.push(format!("Delete \"{target}\""));
            if file.is_python_source() {
                for suffix in COMPILED_SUFFIXES {
                    uninstall.push(format!("Delete \"{target}{suffix}\""));
                }
            }
        }

        let removal_roots: Vec<String> = files
            .removal_roots()
            .iter()
            .map(|root| target_path(var, strip_role_root(root)))
            .collect();
        uninstall.extend(removal_roots.iter().map(|root| format!("RMDir /r \"{root}\"")));

        Some(Self {
            role,
            install,
            uninstall,
            removal_roots,
        })
    }

    /// Role this block installs.
    pub fn role(&self) -> InstallRole {
        self.role
    }

    /// Install instructions in execution order.
    pub fn install_lines(&self) -> &[String] {
        &self.install
    }

    /// Uninstall instructions in execution order, recursive deletes last.
    pub fn uninstall_lines(&self) -> &[String] {
        &self.uninstall
    }

    /// Target directories removed recursively on uninstall.
    pub fn removal_roots(&self) -> &[String] {
        &self.removal_roots
    }

    /// Install instructions as an indented script fragment.
    pub fn install_text(&self) -> String {
        indent(&self.install)
    }

    /// Uninstall instructions as an indented script fragment.
    pub fn uninstall_text(&self) -> String {
        indent(&self.uninstall)
    }
}

/// Emits a block for every non-empty role, in [`InstallRole::ALL`] order.
pub fn emit_all(classification: &Classification) -> Vec<InstructionBlock> {
    InstallRole::ALL
        .into_iter()
        .filter_map(|role| InstructionBlock::emit(role, classification.role(role)))
        .collect()
}

/// Role-relative `.py` sources of the package role, for the post-install helper.
pub fn package_sources(files: &RoleFiles) -> Vec<String> {
    files
        .files()
        .iter()
        .filter(|f| f.is_python_source())
        .map(|f| f.role_path().to_string())
        .collect()
}

fn target_path(var: &str, relative: &str) -> String {
    if relative.is_empty() {
        var.to_string()
    } else {
        format!("{var}\\{}", escape_path(relative))
    }
}

fn indent(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
