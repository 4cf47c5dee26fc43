//! Command line argument parsing and validation.
//!
//! Every installer option can also be set under `[tool.nsis]` in
//! pyproject.toml; flags given here win.

use crate::bundler::{BitWidth, NsisCompression};
use clap::Parser;
use std::path::PathBuf;

/// NSIS installer builder for Python distributions
#[derive(Parser, Debug, Default)]
#[command(
    name = "kodegen_bundler_nsis",
    version,
    about = "NSIS installer builder for Python distributions",
    long_about = "Stages a Python distribution with setup.py, generates an NSIS script that
installs it into every matching Python or Maya runtime found on the target
machine, and compiles the script with makensis.

Usage:
  kodegen_bundler_nsis --source . --target-version 2.7,3.2
  kodegen_bundler_nsis -v 2.7 --bits 64 --maya --nsis-dir 'C:\\Program Files\\NSIS'
  kodegen_bundler_nsis -v 2.7 --skip-install --keep-temp

A missing or failing makensis is reported as a warning; the generated
setup.nsi is kept in the staging directory for inspection."
)]
pub struct Args {
    /// Project directory containing pyproject.toml and setup.py
    #[arg(short = 's', long, value_name = "DIR", default_value = ".")]
    pub source: PathBuf,

    /// Staging directory [default: <source>/build/bdist.nsis]
    #[arg(long, value_name = "DIR")]
    pub bdist_dir: Option<PathBuf>,

    /// Output directory for the installer [default: <source>/dist]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Keep the staging directory after the run
    #[arg(short = 'k', long)]
    pub keep_temp: bool,

    /// Skip `setup.py build`
    #[arg(long)]
    pub skip_build: bool,

    /// Use the staging directory as-is instead of installing into it
    #[arg(long)]
    pub skip_install: bool,

    /// Python versions to target (repeatable or comma separated)
    #[arg(short = 'v', long, value_name = "X.Y", value_delimiter = ',')]
    pub target_version: Vec<String>,

    /// Only target 32 or 64 bit runtimes
    #[arg(long, value_name = "32|64")]
    pub bits: Option<BitWidth>,

    /// Also target Maya releases bundling the requested versions
    #[arg(long)]
    pub maya: bool,

    /// Do not byte-compile on the target system
    #[arg(short = 'c', long)]
    pub no_target_compile: bool,

    /// Do not byte-compile with -OO on the target system
    #[arg(short = 'o', long)]
    pub no_target_optimize: bool,

    /// Run 2to3 over installed packages on Python 3 targets
    #[arg(long = "run-2to3")]
    pub run_2to3: bool,

    /// Directory containing makensis
    #[arg(short = 'n', long, value_name = "DIR")]
    pub nsis_dir: Option<PathBuf>,

    /// Build interpreter used for setup.py
    #[arg(long, value_name = "PATH", env = "PYTHON")]
    pub python: Option<PathBuf>,

    /// Header bitmap (150x57)
    #[arg(long, value_name = "PATH")]
    pub header_bitmap: Option<PathBuf>,

    /// Welcome page bitmap (164x314)
    #[arg(long, value_name = "PATH")]
    pub welcome_bitmap: Option<PathBuf>,

    /// Installer icon
    #[arg(long, value_name = "PATH")]
    pub install_icon: Option<PathBuf>,

    /// Uninstaller icon
    #[arg(long, value_name = "PATH")]
    pub uninstall_icon: Option<PathBuf>,

    /// Extra .nsh file included by the script
    #[arg(long, value_name = "PATH")]
    pub nsh: Option<PathBuf>,

    /// Custom NSIS skeleton (handlebars)
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Installer compression: none, zlib, bzip2, lzma
    #[arg(long, value_name = "ALGO")]
    pub compression: Option<NsisCompression>,

    /// Warn when the MSVC 2008 runtime is missing on the target
    #[arg(long)]
    pub msvc2008: bool,

    /// Warn when the MSVC 2010 runtime is missing on the target
    #[arg(long)]
    pub msvc2010: bool,

    /// Trace target detection in the installer's details log
    #[arg(long)]
    pub debug: bool,

    /// Verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self.target_version.iter().find(|v| !is_major_minor(v)) {
            return Err(format!(
                "Invalid target version '{bad}', expected MAJOR.MINOR such as 2.7"
            ));
        }

        if self.skip_install && self.skip_build {
            log::debug!("--skip-build is implied by --skip-install");
        }

        Ok(())
    }
}

/// `major.minor`, both parts non-empty digits.
pub(crate) fn is_major_minor(version: &str) -> bool {
    match version.split_once('.') {
        Some((major, minor)) => [major, minor]
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_versions_split_on_commas() {
        let args = Args::try_parse_from([
            "kodegen_bundler_nsis",
            "-v",
            "2.7,3.2",
            "--target-version",
            "3.3",
            "--bits",
            "64",
        ])
        .unwrap();
        assert_eq!(args.target_version, ["2.7", "3.2", "3.3"]);
        assert_eq!(args.bits, Some(BitWidth::Bits64));
        assert_eq!(args.source, PathBuf::from("."));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_short_flags() {
        let args =
            Args::try_parse_from(["kodegen_bundler_nsis", "-k", "-c", "-o", "-n", "nsis"]).unwrap();
        assert!(args.keep_temp && args.no_target_compile && args.no_target_optimize);
        assert_eq!(args.nsis_dir, Some(PathBuf::from("nsis")));
    }

    #[test]
    fn test_rejects_bad_bits_and_versions() {
        assert!(Args::try_parse_from(["kodegen_bundler_nsis", "--bits", "16"]).is_err());

        let args = Args::try_parse_from(["kodegen_bundler_nsis", "-v", "2"]).unwrap();
        assert!(args.validate().unwrap_err().contains("'2'"));
        assert!(!is_major_minor("2.x"));
        assert!(is_major_minor("3.10"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["kodegen_bundler_nsis", "--verbose", "-q"]).is_err());
    }
}
