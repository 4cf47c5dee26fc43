//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs one
//! installer build from validated settings to a checksummed artifact.

use super::{checksum::calculate_sha256, staging};
use crate::bundler::{
    BundledArtifact, Result, Settings,
    error::{Context, Error, ErrorExt},
    platform::windows::nsis::{self, script},
    targets::{ApplicationTarget, enumerate_targets},
    tree::Classification,
    utils::fs,
};
use std::path::PathBuf;

/// Files a run writes next to the staged tree.
const GENERATED_FILES: &[&str] = &[
    script::SCRIPT_FILE_NAME,
    script::POSTINSTALL_FILE_NAME,
    script::LICENSE_FILE_NAME,
];

/// What one run produced.
#[derive(Debug, Default)]
pub struct BundleReport {
    /// Labels of the application targets the installer carries.
    pub targets: Vec<String>,
    /// Staged files left out of the installer.
    pub skipped: Vec<String>,
    /// Number of files the installer installs per target.
    pub file_count: usize,
    /// Generated script, when the staging directory was kept.
    pub script: Option<PathBuf>,
    /// The installer, when makensis produced one.
    pub artifact: Option<BundledArtifact>,
    /// Non-fatal problems worth showing to the user.
    pub warnings: Vec<String>,
}

/// Main bundler orchestrator.
///
/// Runs the pipeline strictly in order: validate, stage, classify, emit and
/// assemble the script, compile it, checksum the installer, clean up.
/// Configuration and platform problems abort before anything is staged.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nsis::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_nsis::bundler::Result<()> {
/// let mut bundler = Bundler::new(settings);
/// let report = bundler.bundle().await?;
/// if let Some(artifact) = report.artifact {
///     println!("Created {} ({})", artifact.path.display(), artifact.checksum);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Checks preconditions and enumerates application targets.
    ///
    /// Distributions with native extensions can only be built on Windows
    /// and only for the build interpreter's version, which replaces an
    /// empty version list. Native code declared in either pyproject.toml
    /// or `setup.py` counts.
    pub async fn validate(&mut self) -> Result<Vec<Box<dyn ApplicationTarget>>> {
        let has_ext_modules = self.settings.package().has_ext_modules
            || staging::detect_native_components(&self.settings)
                .await
                .context("inspecting setup.py for native components")?;
        check_host(has_ext_modules, cfg!(windows))?;

        if has_ext_modules {
            let build_version = staging::detect_build_version(self.settings.python())
                .await
                .context("detecting build interpreter version")?;
            let versions =
                resolve_native_versions(&self.settings.target_request().versions, &build_version)?;
            self.settings.set_target_versions(versions);
        }

        let targets = enumerate_targets(self.settings.target_request());
        if targets.is_empty() {
            return Err(Error::Config(
                "no application targets; pass --target-version or set target-versions".into(),
            ));
        }
        Ok(targets)
    }

    /// Runs the whole pipeline.
    ///
    /// A missing or failing makensis is reported in
    /// [`BundleReport::warnings`], not as an error.
    pub async fn bundle(&mut self) -> Result<BundleReport> {
        let targets = self.validate().await?;
        let bdist_dir = self.settings.bdist_dir().to_path_buf();

        staging::remove_generated(&bdist_dir, GENERATED_FILES).await?;
        if self.settings.skip_install() {
            if !bdist_dir.is_dir() {
                return Err(Error::Config(format!(
                    "staging directory {} does not exist",
                    bdist_dir.display()
                )));
            }
            log::info!("Using staged tree in {}", bdist_dir.display());
        } else {
            staging::stage(&self.settings).await?;
        }

        let classification = Classification::classify(&bdist_dir)
            .with_context(|| format!("classifying {}", bdist_dir.display()))?;
        let mut report = BundleReport {
            targets: targets.iter().map(|t| t.describe().label).collect(),
            skipped: classification.skipped().to_vec(),
            file_count: classification.file_count(),
            ..Default::default()
        };
        if report.file_count == 0 {
            report
                .warnings
                .push(format!("no installable files found in {}", bdist_dir.display()));
        }
        if !report.skipped.is_empty() {
            report.warnings.push(format!(
                "{} staged files are outside package, scripts and include and were skipped",
                report.skipped.len()
            ));
        }

        let outcome = nsis::bundle_project(&self.settings, &targets, &classification).await?;
        report.warnings.extend(outcome.warning);

        if let Some(path) = outcome.installer {
            let size = tokio::fs::metadata(&path)
                .await
                .fs_context("reading artifact metadata", &path)?
                .len();
            let checksum = calculate_sha256(&path).await?;
            report.artifact = Some(BundledArtifact {
                path,
                size,
                checksum,
            });
        }

        // A pre-staged tree belongs to the caller.
        if self.settings.keep_temp() || self.settings.skip_install() {
            report.script = Some(outcome.generated.script);
        } else if let Err(e) = fs::remove_dir_all(&bdist_dir).await {
            log::warn!("Failed to remove {}: {}", bdist_dir.display(), e);
        }

        Ok(report)
    }
}

/// Rejects native extensions on hosts that cannot compile them.
pub(crate) fn check_host(has_ext_modules: bool, host_is_windows: bool) -> Result<()> {
    if has_ext_modules && !host_is_windows {
        return Err(Error::Platform(
            "this distribution contains native extensions; build the installer on Windows".into(),
        ));
    }
    Ok(())
}

/// Pins the requested versions to the build interpreter's.
pub(crate) fn resolve_native_versions(requested: &[String], build: &str) -> Result<Vec<String>> {
    if let Some(other) = requested.iter().find(|v| v.as_str() != build) {
        return Err(Error::Config(format!(
            "target version {other} requested, but native extensions can only target {build}"
        )));
    }
    Ok(vec![build.to_string()])
}
