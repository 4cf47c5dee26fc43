//! Metadata and installer configuration from a single pyproject.toml

use crate::bundler::{BitWidth, NsisCompression, PackageSettings};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File names tried, in order, when `[project] license` names no file.
const LICENSE_CANDIDATES: &[&str] = &["LICENSE", "LICENSE.txt", "LICENSE.rst", "COPYING", "license"];

/// Keys of `[project.urls]` accepted as the homepage, in preference order.
const HOMEPAGE_KEYS: &[&str] = &["Homepage", "homepage", "Home", "home"];

/// Installer configuration from `[tool.nsis]`.
///
/// Every key is optional. Command-line flags override these values.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Runtime versions the installer targets.
    pub target_versions: Option<Vec<String>>,
    /// Restrict targets to one bit width.
    pub bits: Option<BitWidth>,
    /// Also target Maya releases.
    pub maya: bool,
    /// Do not byte-compile on the target system.
    pub no_target_compile: bool,
    /// Do not byte-compile with `-OO` on the target system.
    pub no_target_optimize: bool,
    /// Run 2to3 on Python 3 targets.
    pub run_2to3: bool,
    /// Header bitmap (150x57).
    pub header_bitmap: Option<PathBuf>,
    /// Welcome page bitmap (164x314).
    pub welcome_bitmap: Option<PathBuf>,
    /// Installer icon.
    pub install_icon: Option<PathBuf>,
    /// Uninstaller icon.
    pub uninstall_icon: Option<PathBuf>,
    /// Extra `.nsh` file included by the script.
    pub nsh: Option<PathBuf>,
    /// Custom NSIS skeleton.
    pub template: Option<PathBuf>,
    /// Installer compression.
    pub compression: Option<NsisCompression>,
    /// Warn when the MSVC 2008 runtime is missing.
    pub msvc2008: bool,
    /// Warn when the MSVC 2010 runtime is missing.
    pub msvc2010: bool,
    /// Installer debug tracing.
    pub debug: bool,
}

/// Complete project data from pyproject.toml
pub struct ProjectManifest {
    /// Package metadata ([project] section)
    pub package: PackageSettings,

    /// Installer configuration ([tool.nsis] section)
    pub config: ProjectConfig,
}

/// Load project metadata and installer configuration (single read + parse).
///
/// `name` and `version` are required in `[project]`; everything else
/// degrades to `None`. Relative paths in `[tool.nsis]` are resolved against
/// the project directory.
pub fn load_manifest(pyproject_path: &Path) -> Result<ProjectManifest> {
    let manifest = std::fs::read_to_string(pyproject_path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_pyproject_toml".to_string(),
            reason: format!("Failed to read {}: {}", pyproject_path.display(), e),
        })
    })?;

    let toml_value: toml::Value = toml::from_str(&manifest)?;
    let project_dir = pyproject_path.parent().unwrap_or_else(|| Path::new("."));

    let project = toml_value.get("project").ok_or_else(|| {
        BundlerError::Cli(CliError::InvalidArguments {
            reason: "No [project] section in pyproject.toml".to_string(),
        })
    })?;

    let required = |key: &str| {
        str_at(project, key).ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Missing '{key}' in [project]"),
            })
        })
    };

    let (author, author_email) = first_person(project, "authors");
    let (maintainer, maintainer_email) = first_person(project, "maintainers");

    let homepage = project.get("urls").and_then(|urls| {
        HOMEPAGE_KEYS
            .iter()
            .find_map(|key| urls.get(*key).and_then(|v| v.as_str()))
            .map(String::from)
    });

    let (license, license_file) = match project.get("license") {
        Some(toml::Value::String(expr)) => (Some(expr.clone()), None),
        Some(table @ toml::Value::Table(_)) => (
            str_at(table, "text"),
            str_at(table, "file").map(|file| project_dir.join(file)),
        ),
        _ => (None, None),
    };
    let license_file = license_file.or_else(|| discover_license_file(project_dir));

    let has_ext_modules = toml_value
        .get("tool")
        .and_then(|t| t.get("setuptools"))
        .and_then(|s| s.get("ext-modules"))
        .and_then(|m| m.as_array())
        .is_some_and(|modules| !modules.is_empty());

    let package = PackageSettings {
        product_name: required("name")?,
        version: required("version")?,
        description: str_at(project, "description"),
        author,
        author_email,
        maintainer,
        maintainer_email,
        homepage,
        license,
        license_file,
        has_ext_modules,
    };

    let mut config = match toml_value.get("tool").and_then(|t| t.get("nsis")) {
        Some(table) => table.clone().try_into::<ProjectConfig>()?,
        None => ProjectConfig::default(),
    };
    config.resolve_paths(project_dir);

    Ok(ProjectManifest { package, config })
}

impl ProjectConfig {
    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.header_bitmap,
            &mut self.welcome_bitmap,
            &mut self.install_icon,
            &mut self.uninstall_icon,
            &mut self.nsh,
            &mut self.template,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn str_at(value: &toml::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

/// `(name, email)` of the first entry of a PEP 621 people list.
fn first_person(project: &toml::Value, key: &str) -> (Option<String>, Option<String>) {
    match project
        .get(key)
        .and_then(|v| v.as_array())
        .and_then(|people| people.first())
    {
        Some(person) => (str_at(person, "name"), str_at(person, "email")),
        None => (None, None),
    }
}

fn discover_license_file(project_dir: &Path) -> Option<PathBuf> {
    let found = LICENSE_CANDIDATES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.is_file());
    match &found {
        Some(path) => log::debug!("Found license file: {}", path.display()),
        None => log::debug!("No license file in {}", project_dir.display()),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_project(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pyproject.toml"), content).unwrap();
        dir
    }

    #[test]
    fn test_full_metadata() {
        let dir = write_project(
            r#"
[project]
name = "pyffi"
version = "2.1.4"
description = "Interfacing block structured files"
authors = [{ name = "Amorilia", email = "amorilia@users.sourceforge.net" }]
license = { text = "BSD" }

[project.urls]
Homepage = "http://pyffi.sourceforge.net/"

[tool.nsis]
target-versions = ["2.5", "2.6"]
bits = 32
maya = true
no-target-optimize = true
nsh = "installer/extra.nsh"
"#,
        );
        std::fs::write(dir.path().join("LICENSE.rst"), "BSD").unwrap();

        let manifest = load_manifest(&dir.path().join("pyproject.toml")).unwrap();
        let package = manifest.package;
        assert_eq!(package.product_name, "pyffi");
        assert_eq!(package.author.as_deref(), Some("Amorilia"));
        assert_eq!(package.homepage.as_deref(), Some("http://pyffi.sourceforge.net/"));
        assert_eq!(package.license.as_deref(), Some("BSD"));
        assert_eq!(package.license_file, Some(dir.path().join("LICENSE.rst")));
        assert!(package.maintainer.is_none());
        assert!(!package.has_ext_modules);

        let config = manifest.config;
        assert_eq!(config.target_versions, Some(vec!["2.5".into(), "2.6".into()]));
        assert_eq!(config.bits, Some(BitWidth::Bits32));
        assert!(config.maya && config.no_target_optimize && !config.no_target_compile);
        assert_eq!(config.nsh, Some(dir.path().join("installer/extra.nsh")));
    }

    #[test]
    fn test_minimal_metadata_and_ext_modules() {
        let dir = write_project(
            r#"
[project]
name = "demo"
version = "1.0"
license = "MIT"

[[tool.setuptools.ext-modules]]
name = "demo._speedups"
sources = ["src/speedups.c"]
"#,
        );
        let manifest = load_manifest(&dir.path().join("pyproject.toml")).unwrap();
        assert_eq!(manifest.package.license.as_deref(), Some("MIT"));
        assert!(manifest.package.license_file.is_none());
        assert!(manifest.package.has_ext_modules);
        assert_eq!(manifest.config, ProjectConfig::default());
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let dir = write_project("[project]\nname = \"demo\"\n");
        let err = load_manifest(&dir.path().join("pyproject.toml")).err().unwrap();
        assert!(err.to_string().contains("Missing 'version'"));
    }

    #[test]
    fn test_invalid_bits_is_rejected() {
        let dir = write_project("[project]\nname = \"demo\"\nversion = \"1\"\n[tool.nsis]\nbits = 16\n");
        assert!(load_manifest(&dir.path().join("pyproject.toml")).is_err());
    }
}
