//! Builder for constructing Settings.

use super::{BitWidth, NsisSettings, PackageSettings, Settings};
use crate::bundler::{error::Error, targets::TargetRequest};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nsis::bundler::{BitWidth, PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_nsis::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir(".")
///     .package_settings(PackageSettings {
///         product_name: "demo".into(),
///         version: "1.0".into(),
///         ..Default::default()
///     })
///     .target_versions(vec!["2.7".into()])
///     .bits(Some(BitWidth::Bits64))
///     .keep_temp(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_dir: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    nsis_settings: NsisSettings,
    targets: TargetRequest,
    bdist_dir: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    python: Option<PathBuf>,
    nsis_dir: Option<PathBuf>,
    keep_temp: bool,
    skip_build: bool,
    skip_install: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project directory.
    ///
    /// Default: current directory
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets installer features and assets.
    pub fn nsis_settings(mut self, settings: NsisSettings) -> Self {
        self.nsis_settings = settings;
        self
    }

    /// Sets the requested runtime versions, in order.
    pub fn target_versions(mut self, versions: Vec<String>) -> Self {
        self.targets.versions = versions;
        self
    }

    /// Restricts targets to one bit width.
    pub fn bits(mut self, bits: Option<BitWidth>) -> Self {
        self.targets.bits = bits;
        self
    }

    /// Adds Maya targets for the requested runtime versions.
    pub fn maya(mut self, maya: bool) -> Self {
        self.targets.maya = maya;
        self
    }

    /// Sets the staging directory.
    ///
    /// Default: `<project>/build/bdist.nsis`
    pub fn bdist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.bdist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `<project>/dist`
    pub fn dist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the build interpreter.
    ///
    /// Default: `python`
    pub fn python<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.python = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets an explicit NSIS directory.
    pub fn nsis_dir(mut self, path: Option<PathBuf>) -> Self {
        self.nsis_dir = path;
        self
    }

    /// Keeps the staging tree after the run.
    pub fn keep_temp(mut self, keep: bool) -> Self {
        self.keep_temp = keep;
        self
    }

    /// Skips `setup.py build`.
    pub fn skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }

    /// Uses the staging directory as-is instead of running the installer.
    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if package metadata is missing or has an
    /// empty name or version.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let package = self
            .package_settings
            .ok_or_else(|| Error::Config("package_settings is required".into()))?;
        if package.product_name.trim().is_empty() {
            return Err(Error::Config("package name is empty".into()));
        }
        if package.version.trim().is_empty() {
            return Err(Error::Config("package version is empty".into()));
        }

        let project_dir = self.project_dir.unwrap_or_else(|| PathBuf::from("."));
        let bdist_dir = self
            .bdist_dir
            .unwrap_or_else(|| project_dir.join("build").join("bdist.nsis"));
        let dist_dir = self.dist_dir.unwrap_or_else(|| project_dir.join("dist"));
        let python = self.python.unwrap_or_else(|| PathBuf::from("python"));

        Ok(Settings::new(
            package,
            self.nsis_settings,
            self.targets,
            project_dir,
            bdist_dir,
            dist_dir,
            python,
            self.nsis_dir,
            (self.keep_temp, self.skip_build, self.skip_install),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> PackageSettings {
        PackageSettings {
            product_name: "demo".into(),
            version: "1.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_requires_package_settings() {
        let err = SettingsBuilder::new().build().unwrap_err();
        assert!(err.is_fatal_precondition());
    }

    #[test]
    fn test_build_rejects_empty_version() {
        let package = PackageSettings {
            version: " ".into(),
            ..demo()
        };
        let err = SettingsBuilder::new()
            .package_settings(package)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_directories_follow_project_dir() {
        let settings = SettingsBuilder::new()
            .project_dir("proj")
            .package_settings(demo())
            .build()
            .unwrap();
        assert_eq!(settings.bdist_dir(), Path::new("proj/build/bdist.nsis"));
        assert_eq!(settings.dist_dir(), Path::new("proj/dist"));
        assert_eq!(settings.python(), Path::new("python"));
    }

    #[test]
    fn test_installer_file_name_variants() {
        let single = SettingsBuilder::new()
            .package_settings(demo())
            .target_versions(vec!["2.7".into()])
            .build()
            .unwrap();
        assert_eq!(single.installer_file_name(), "demo-1.0.win32-py2.7.exe");

        let multi = SettingsBuilder::new()
            .package_settings(demo())
            .target_versions(vec!["2.7".into(), "3.2".into()])
            .bits(Some(BitWidth::Bits64))
            .build()
            .unwrap();
        assert_eq!(multi.installer_file_name(), "demo-1.0.win-amd64.exe");
    }
}
