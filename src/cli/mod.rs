//! Command line interface for the NSIS bundler.
//!
//! Loads `pyproject.toml`, merges `[tool.nsis]` with the command line,
//! runs one [`Bundler`] and reports the outcome.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use args::is_major_minor;
use crate::bundler::{BundleReport, Bundler, NsisSettings, Settings, SettingsBuilder};
use crate::error::{CliError, Result};
use crate::metadata::{ProjectConfig, load_manifest};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Run one bundling pass with already parsed arguments.
///
/// Returns the process exit code. A missing or failing makensis still
/// yields 0; configuration, platform and staging problems are errors.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = RuntimeConfig::from(&args);
    let output = config.output();

    let project_dir = args.source.absolutize()?.into_owned();
    let manifest = load_manifest(&project_dir.join("pyproject.toml"))?;
    output.verbose(&format!(
        "Loaded {} {} from {}",
        manifest.package.product_name,
        manifest.package.version,
        project_dir.display()
    ))?;

    let mut settings_builder = SettingsBuilder::new()
        .project_dir(&project_dir)
        .package_settings(manifest.package);
    settings_builder = apply_overrides(settings_builder, &args, &manifest.config)?;
    let settings = settings_builder.build()?;

    output.section(&format!(
        "Bundling {} {}",
        settings.product_name(),
        settings.version_string()
    ))?;

    let mut bundler = Bundler::new(settings);
    let report = bundler.bundle().await?;
    print_report(output, bundler.settings(), &report)?;

    Ok(0)
}

/// Merge `[tool.nsis]` with the command line into the builder.
///
/// Flags win: booleans OR together, a non-empty version list replaces the
/// configured one, and paths given on the command line replace configured
/// paths.
fn apply_overrides(
    builder: SettingsBuilder,
    args: &Args,
    config: &ProjectConfig,
) -> Result<SettingsBuilder> {
    let target_versions = if args.target_version.is_empty() {
        config.target_versions.clone().unwrap_or_default()
    } else {
        args.target_version.clone()
    };
    if let Some(bad) = target_versions.iter().find(|v| !is_major_minor(v)) {
        return Err(CliError::InvalidArguments {
            reason: format!("Invalid target version '{bad}', expected MAJOR.MINOR such as 2.7"),
        }
        .into());
    }

    let nsis = NsisSettings {
        template: pick_path(&args.template, &config.template)?,
        header_image: pick_path(&args.header_bitmap, &config.header_bitmap)?,
        welcome_image: pick_path(&args.welcome_bitmap, &config.welcome_bitmap)?,
        installer_icon: pick_path(&args.install_icon, &config.install_icon)?,
        uninstaller_icon: pick_path(&args.uninstall_icon, &config.uninstall_icon)?,
        include_nsh: pick_path(&args.nsh, &config.nsh)?,
        compression: args.compression.or(config.compression).unwrap_or_default(),
        compile: !(args.no_target_compile || config.no_target_compile),
        optimize: !(args.no_target_optimize || config.no_target_optimize),
        run_2to3: args.run_2to3 || config.run_2to3,
        msvc2008: args.msvc2008 || config.msvc2008,
        msvc2010: args.msvc2010 || config.msvc2010,
        debug: args.debug || config.debug,
    };

    let mut builder = builder
        .nsis_settings(nsis)
        .target_versions(target_versions)
        .bits(args.bits.or(config.bits))
        .maya(args.maya || config.maya)
        .nsis_dir(absolute(args.nsis_dir.as_deref())?)
        .keep_temp(args.keep_temp)
        .skip_build(args.skip_build)
        .skip_install(args.skip_install);

    if let Some(dir) = absolute(args.bdist_dir.as_deref())? {
        builder = builder.bdist_dir(dir);
    }
    if let Some(dir) = absolute(args.dist_dir.as_deref())? {
        builder = builder.dist_dir(dir);
    }
    if let Some(python) = &args.python {
        builder = builder.python(python);
    }
    Ok(builder)
}

/// Command-line path (made absolute) or the configured one.
fn pick_path(cli: &Option<PathBuf>, config: &Option<PathBuf>) -> Result<Option<PathBuf>> {
    match absolute(cli.as_deref())? {
        Some(path) => Ok(Some(path)),
        None => Ok(config.clone()),
    }
}

fn absolute(path: Option<&Path>) -> Result<Option<PathBuf>> {
    Ok(match path {
        Some(path) => Some(path.absolutize()?.into_owned()),
        None => None,
    })
}

fn print_report(output: &OutputManager, settings: &Settings, report: &BundleReport) -> Result<()> {
    output.indent(&format!("Targets: {}", report.targets.join(", ")))?;
    output.indent(&format!("Files per target: {}", report.file_count))?;
    for skipped in &report.skipped {
        output.verbose(&format!("Skipped {skipped}"))?;
    }
    for warning in &report.warnings {
        output.warn(warning)?;
    }

    if let Some(script) = &report.script {
        output.indent(&format!("Script: {}", script.display()))?;
    }

    match &report.artifact {
        Some(artifact) => {
            output.success(&format!(
                "Created {} ({} bytes)",
                artifact.path.display(),
                artifact.size
            ))?;
            output.indent(&format!("SHA-256: {}", artifact.checksum))?;
        }
        None => output.progress(&format!(
            "No installer written to {}",
            settings.dist_dir().display()
        ))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BitWidth, NsisCompression, PackageSettings};

    fn demo() -> SettingsBuilder {
        SettingsBuilder::new()
            .project_dir("/work/demo")
            .package_settings(PackageSettings {
                product_name: "demo".into(),
                version: "1.0".into(),
                ..Default::default()
            })
    }

    #[test]
    fn test_config_applies_without_flags() {
        let config = ProjectConfig {
            target_versions: Some(vec!["2.6".into()]),
            bits: Some(BitWidth::Bits32),
            no_target_optimize: true,
            compression: Some(NsisCompression::Zlib),
            nsh: Some(PathBuf::from("/work/demo/extra.nsh")),
            ..Default::default()
        };
        let settings = apply_overrides(demo(), &Args::default(), &config)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.target_request().versions, ["2.6"]);
        assert_eq!(settings.target_request().bits, Some(BitWidth::Bits32));
        let nsis = settings.nsis_settings();
        assert!(nsis.compile && !nsis.optimize);
        assert_eq!(nsis.compression, NsisCompression::Zlib);
        assert_eq!(nsis.include_nsh, Some(PathBuf::from("/work/demo/extra.nsh")));
    }

    #[test]
    fn test_flags_override_config() {
        let config = ProjectConfig {
            target_versions: Some(vec!["2.6".into()]),
            bits: Some(BitWidth::Bits32),
            msvc2008: true,
            ..Default::default()
        };
        let args = Args {
            target_version: vec!["2.7".into(), "3.2".into()],
            bits: Some(BitWidth::Bits64),
            no_target_compile: true,
            msvc2010: true,
            ..Default::default()
        };
        let settings = apply_overrides(demo(), &args, &config)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.target_request().versions, ["2.7", "3.2"]);
        assert_eq!(settings.target_request().bits, Some(BitWidth::Bits64));
        let nsis = settings.nsis_settings();
        assert!(!nsis.compile && nsis.optimize);
        assert!(nsis.msvc2008 && nsis.msvc2010);
    }

    #[test]
    fn test_configured_versions_are_validated() {
        let config = ProjectConfig {
            target_versions: Some(vec!["2.7".into(), "2.7.1".into()]),
            ..Default::default()
        };
        let err = apply_overrides(demo(), &Args::default(), &config).err().unwrap();
        assert!(matches!(err, crate::error::BundlerError::Cli(CliError::InvalidArguments { .. })));
        assert!(err.to_string().contains("'2.7.1'"));
    }

    #[test]
    fn test_relative_flag_paths_become_absolute() {
        let args = Args {
            nsh: Some(PathBuf::from("extra.nsh")),
            dist_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        let settings = apply_overrides(demo(), &args, &ProjectConfig::default())
            .unwrap()
            .build()
            .unwrap();

        assert!(settings.nsis_settings().include_nsh.as_ref().unwrap().is_absolute());
        assert!(settings.dist_dir().is_absolute());
        assert!(settings.dist_dir().ends_with("out"));
    }
}
