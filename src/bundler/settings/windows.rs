//! NSIS installer settings.

use serde::Deserialize;
use std::path::PathBuf;

/// NSIS compression algorithm.
///
/// Controls the compression method used for the NSIS installer executable.
///
/// | Algorithm | Speed | Size |
/// |-----------|-------|------|
/// | None | Fastest | Largest |
/// | Zlib | Fast | Medium |
/// | Bzip2 | Medium | Small |
/// | LZMA | Slowest | Smallest |
///
/// # Configuration
///
/// ```toml
/// [tool.nsis]
/// compression = "lzma"
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NsisCompression {
    /// No compression - fastest, largest size.
    None,

    /// zlib compression.
    Zlib,

    /// bzip2 compression - smaller than zlib.
    Bzip2,

    /// Solid LZMA compression - smallest size, slowest (default).
    #[default]
    Lzma,
}

impl std::str::FromStr for NsisCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "zlib" => Ok(Self::Zlib),
            "bzip2" => Ok(Self::Bzip2),
            "lzma" => Ok(Self::Lzma),
            other => Err(format!(
                "unknown compression '{other}', expected none, zlib, bzip2 or lzma"
            )),
        }
    }
}

/// NSIS installer (.exe) configuration.
///
/// Every boolean here is rendered into the script as a comment toggle: an
/// enabled feature leaves its `!define` active, a disabled one prefixes it
/// with `;`.
///
/// # Configuration
///
/// Add to `pyproject.toml`:
///
/// ```toml
/// [tool.nsis]
/// no-target-optimize = true
/// msvc2008 = true
/// header-bitmap = "installer/header.bmp"
/// nsh = "installer/extra.nsh"
/// ```
#[derive(Clone, Debug)]
pub struct NsisSettings {
    /// Path to a custom NSIS skeleton (handlebars template).
    ///
    /// Default: None (uses built-in template)
    pub template: Option<PathBuf>,

    /// Path to header image (150×57 pixels).
    ///
    /// Default: None (NSIS stock header bitmap)
    pub header_image: Option<PathBuf>,

    /// Path to welcome/finish page image (164×314 pixels).
    ///
    /// Default: None (NSIS stock wizard bitmap)
    pub welcome_image: Option<PathBuf>,

    /// Path to installer icon (.ico file).
    ///
    /// Default: None (NSIS stock icon)
    pub installer_icon: Option<PathBuf>,

    /// Path to uninstaller icon (.ico file).
    ///
    /// Default: None (NSIS stock icon)
    pub uninstaller_icon: Option<PathBuf>,

    /// Extra user-supplied `.nsh` file included at the top of the script.
    pub include_nsh: Option<PathBuf>,

    /// Compression algorithm for installer.
    pub compression: NsisCompression,

    /// Byte-compile installed `.py` files on the target system.
    ///
    /// Default: true
    pub compile: bool,

    /// Byte-compile with `-OO` on the target system.
    ///
    /// Default: true
    pub optimize: bool,

    /// Run `lib2to3` over installed packages for Python 3 targets.
    pub run_2to3: bool,

    /// Warn at install time when the MSVC 2008 runtime is missing.
    pub msvc2008: bool,

    /// Warn at install time when the MSVC 2010 runtime is missing.
    pub msvc2010: bool,

    /// Emit `DetailPrint` tracing of target detection in the installer.
    pub debug: bool,
}

impl Default for NsisSettings {
    fn default() -> Self {
        Self {
            template: None,
            header_image: None,
            welcome_image: None,
            installer_icon: None,
            uninstaller_icon: None,
            include_nsh: None,
            compression: NsisCompression::default(),
            compile: true,
            optimize: true,
            run_2to3: false,
            msvc2008: false,
            msvc2010: false,
            debug: false,
        }
    }
}

impl NsisSettings {
    /// Whether the post-install helper script is needed at all.
    pub fn needs_postinstall(&self) -> bool {
        self.compile || self.optimize || self.run_2to3
    }
}
