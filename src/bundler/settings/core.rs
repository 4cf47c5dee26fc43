//! Core Settings struct and implementations.

use super::{BitWidth, NsisSettings, PackageSettings};
use crate::bundler::targets::TargetRequest;
use std::path::{Path, PathBuf};

/// Main settings for one bundling run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). Everything a
/// run needs is carried here explicitly; nothing is read from process-wide
/// state after construction.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nsis::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_nsis::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir("path/to/project")
///     .package_settings(PackageSettings {
///         product_name: "demo".into(),
///         version: "1.0".into(),
///         ..Default::default()
///     })
///     .target_versions(vec!["2.7".into(), "3.2".into()])
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    package: PackageSettings,

    /// Installer features and assets.
    nsis: NsisSettings,

    /// Which runtimes the installer may target.
    targets: TargetRequest,

    /// Directory holding `pyproject.toml` and `setup.py`.
    project_dir: PathBuf,

    /// Staging directory (pseudo-installation tree).
    bdist_dir: PathBuf,

    /// Where the finished installer is written.
    dist_dir: PathBuf,

    /// Build interpreter used to stage the distribution.
    python: PathBuf,

    /// Explicit NSIS directory, searched before `PATH`.
    nsis_dir: Option<PathBuf>,

    /// Keep the staging tree after the run.
    keep_temp: bool,

    /// Skip `setup.py build`.
    skip_build: bool,

    /// Treat `bdist_dir` as already staged.
    skip_install: bool,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the NSIS installer settings.
    pub fn nsis_settings(&self) -> &NsisSettings {
        &self.nsis
    }

    /// Returns the requested application targets.
    pub fn target_request(&self) -> &TargetRequest {
        &self.targets
    }

    /// Returns the project directory.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the staging directory.
    pub fn bdist_dir(&self) -> &Path {
        &self.bdist_dir
    }

    /// Returns the output directory for installers.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Returns the build interpreter.
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Returns the explicit NSIS directory, if any.
    pub fn nsis_dir(&self) -> Option<&Path> {
        self.nsis_dir.as_deref()
    }

    /// Whether the staging tree survives the run.
    pub fn keep_temp(&self) -> bool {
        self.keep_temp
    }

    /// Whether `setup.py build` is skipped.
    pub fn skip_build(&self) -> bool {
        self.skip_build
    }

    /// Whether staging is skipped entirely.
    pub fn skip_install(&self) -> bool {
        self.skip_install
    }

    /// Installer file name, e.g. `demo-1.0.win32-py2.7.exe`.
    ///
    /// The `-py` suffix is only added when exactly one runtime version was
    /// requested.
    pub fn installer_file_name(&self) -> String {
        let plat = BitWidth::platform_tag(self.targets.bits);
        match self.targets.versions.as_slice() {
            [single] => format!("{}.{}-py{}.exe", self.package.full_name(), plat, single),
            _ => format!("{}.{}.exe", self.package.full_name(), plat),
        }
    }

    /// Full path of the installer inside the dist directory.
    pub fn installer_path(&self) -> PathBuf {
        self.dist_dir.join(self.installer_file_name())
    }

    /// Replaces the requested runtime versions.
    ///
    /// Used once the build interpreter's version is known for distributions
    /// with native extensions.
    pub(crate) fn set_target_versions(&mut self, versions: Vec<String>) {
        self.targets.versions = versions;
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package: PackageSettings,
        nsis: NsisSettings,
        targets: TargetRequest,
        project_dir: PathBuf,
        bdist_dir: PathBuf,
        dist_dir: PathBuf,
        python: PathBuf,
        nsis_dir: Option<PathBuf>,
        flags: (bool, bool, bool),
    ) -> Self {
        let (keep_temp, skip_build, skip_install) = flags;
        Self {
            package,
            nsis,
            targets,
            project_dir,
            bdist_dir,
            dist_dir,
            python,
            nsis_dir,
            keep_temp,
            skip_build,
            skip_install,
        }
    }
}
