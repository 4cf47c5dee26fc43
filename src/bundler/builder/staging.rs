//! Staging the distribution into a pseudo-installation tree.
//!
//! The packaging toolchain is driven as a black box: `setup.py build`
//! followed by `setup.py install --root`, with every install directory
//! redirected to one of the roots the tree classifier understands.

use crate::bundler::{
    Result, Settings,
    error::Error,
    tree::InstallRole,
    utils::fs,
};
use std::path::Path;
use tokio::process::Command;

/// Prints `major.minor` of the running interpreter.
const VERSION_PROBE: &str = "import sys; print('%d.%d' % sys.version_info[:2])";

/// Prints `1` when `setup.py` declares extension modules or C libraries.
///
/// setuptools is imported first so `distutils` resolves to its copy on
/// interpreters that no longer ship one.
const NATIVE_PROBE: &str = "\
try:
    import setuptools
except ImportError:
    pass
from distutils.core import run_setup
dist = run_setup('setup.py', stop_after='init')
print(int(bool(dist.has_ext_modules() or dist.has_c_libraries())))
";

/// Staging-tree directory receiving data files, which are not installed.
pub const DATA_ROOT: &str = "data";

/// `setup.py install` options redirecting each install scheme key into the
/// staging tree.
pub fn install_args(settings: &Settings) -> Vec<String> {
    vec![
        "install".to_string(),
        format!("--root={}", settings.bdist_dir().display()),
        format!("--install-lib=/{}", InstallRole::Package.staging_root()),
        format!("--install-scripts=/{}", InstallRole::Script.staging_root()),
        format!(
            "--install-headers=/{}/{}",
            InstallRole::Header.staging_root(),
            settings.product_name()
        ),
        format!("--install-data=/{DATA_ROOT}"),
        "--no-compile".to_string(),
    ]
}

/// Ask the build interpreter for its `major.minor` version.
pub async fn detect_build_version(python: &Path) -> Result<String> {
    let output = Command::new(python)
        .args(["-c", VERSION_PROBE])
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: python.display().to_string(),
            error,
        })?;
    if !output.status.success() {
        return Err(Error::CommandStatus {
            command: format!("{} -c <version probe>", python.display()),
            status: output.status,
        });
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    log::debug!("Build interpreter {} is Python {}", python.display(), version);
    Ok(version)
}

/// Ask the build interpreter whether `setup.py` builds native code.
///
/// The distribution is configured but not built. A project without
/// `setup.py` has no native components.
pub async fn detect_native_components(settings: &Settings) -> Result<bool> {
    let setup_py = settings.project_dir().join("setup.py");
    if !setup_py.is_file() {
        log::debug!("No setup.py in {}", settings.project_dir().display());
        return Ok(false);
    }

    let python = settings.python();
    let output = Command::new(python)
        .args(["-c", NATIVE_PROBE])
        .current_dir(settings.project_dir())
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: python.display().to_string(),
            error,
        })?;
    if !output.status.success() {
        return Err(Error::CommandStatus {
            command: format!("{} -c <native component probe>", python.display()),
            status: output.status,
        });
    }

    let native = parse_native_flag(&String::from_utf8_lossy(&output.stdout))?;
    log::debug!("setup.py declares native components: {}", native);
    Ok(native)
}

/// The flag is the last non-empty line; setup.py may print before it.
fn parse_native_flag(stdout: &str) -> Result<bool> {
    match stdout.lines().map(str::trim).rfind(|line| !line.is_empty()) {
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        other => Err(Error::GenericError(format!(
            "unexpected output from native component probe: {other:?}"
        ))),
    }
}

/// Build and install the distribution into the staging directory.
///
/// The staging directory is erased first so stale files from an earlier run
/// never reach the installer.
pub async fn stage(settings: &Settings) -> Result<()> {
    if !settings.skip_build() {
        run_setup(settings, &["build".to_string()]).await?;
    }

    fs::create_dir_all(settings.bdist_dir(), true).await?;
    log::info!("Installing to {}", settings.bdist_dir().display());
    run_setup(settings, &install_args(settings)).await
}

async fn run_setup(settings: &Settings, args: &[String]) -> Result<()> {
    let setup_py = settings.project_dir().join("setup.py");
    if !setup_py.is_file() {
        return Err(Error::Fs {
            context: "locating",
            path: setup_py,
            error: std::io::ErrorKind::NotFound.into(),
        });
    }

    let command = format!("setup.py {}", args.first().map(String::as_str).unwrap_or(""));
    log::debug!("Running {} setup.py {}", settings.python().display(), args.join(" "));
    let status = Command::new(settings.python())
        .arg("setup.py")
        .args(args)
        .current_dir(settings.project_dir())
        .status()
        .await
        .map_err(|error| Error::CommandFailed {
            command: command.clone(),
            error,
        })?;

    if !status.success() {
        return Err(Error::CommandStatus { command, status });
    }
    Ok(())
}

/// Remove files an earlier run generated next to the staged tree.
pub async fn remove_generated(bdist_dir: &Path, names: &[&str]) -> Result<()> {
    for name in names {
        fs::remove_file(&bdist_dir.join(name)).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{PackageSettings, SettingsBuilder};

    #[test]
    fn test_install_args_use_three_roots() {
        let settings = SettingsBuilder::new()
            .project_dir("/work/demo")
            .package_settings(PackageSettings {
                product_name: "demo".into(),
                version: "1.0".into(),
                ..Default::default()
            })
            .build()
            .unwrap();
        let args = install_args(&settings);
        assert_eq!(args[0], "install");
        assert!(args.contains(&"--install-lib=/package".to_string()));
        assert!(args.contains(&"--install-scripts=/scripts".to_string()));
        assert!(args.contains(&"--install-headers=/include/demo".to_string()));
        assert!(args.contains(&"--install-data=/data".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--root=") && a.ends_with("bdist.nsis")));
    }

    #[tokio::test]
    async fn test_missing_setup_py_fails_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsBuilder::new()
            .project_dir(dir.path())
            .package_settings(PackageSettings {
                product_name: "demo".into(),
                version: "1.0".into(),
                ..Default::default()
            })
            .build()
            .unwrap();
        let err = stage(&settings).await.unwrap_err();
        assert!(matches!(err, Error::Fs { .. }));
    }

    #[test]
    fn test_native_flag_is_last_line() {
        assert!(parse_native_flag("running init\n1\n").unwrap());
        assert!(!parse_native_flag("0").unwrap());
        assert!(parse_native_flag("warning: no files\n").is_err());
        assert!(parse_native_flag("").is_err());
    }

    #[tokio::test]
    async fn test_no_setup_py_means_no_native_components() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsBuilder::new()
            .project_dir(dir.path())
            .package_settings(PackageSettings {
                product_name: "demo".into(),
                version: "1.0".into(),
                ..Default::default()
            })
            .python(dir.path().join("no-such-python"))
            .build()
            .unwrap();
        assert!(!detect_native_components(&settings).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_generated_ignores_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("setup.nsi"), "").unwrap();
        remove_generated(dir.path(), &["setup.nsi", "postinstall.py"])
            .await
            .unwrap();
        assert!(!dir.path().join("setup.nsi").exists());
    }
}
