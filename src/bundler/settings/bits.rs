//! Runtime bit width and registry view.

use serde::Deserialize;
use std::fmt;

/// Bit width of an installed runtime.
///
/// Selects both the registry view the installer probes (`SetRegView 32|64`)
/// and the `-32`/`-64` suffix of application-target labels.
///
/// # Configuration
///
/// ```toml
/// [tool.nsis]
/// bits = 64
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum BitWidth {
    /// 32-bit runtime (x86)
    Bits32,
    /// 64-bit runtime (x86_64 / AMD64)
    Bits64,
}

impl BitWidth {
    /// Both widths, in the order targets are enumerated.
    pub const ALL: [BitWidth; 2] = [BitWidth::Bits32, BitWidth::Bits64];

    /// Numeric width, as used by `SetRegView` and in labels.
    pub fn as_u8(self) -> u8 {
        match self {
            BitWidth::Bits32 => 32,
            BitWidth::Bits64 => 64,
        }
    }

    /// Returns true when `filter` is absent or equal to `self`.
    pub fn passes(self, filter: Option<BitWidth>) -> bool {
        filter.is_none_or(|wanted| wanted == self)
    }

    /// Platform tag used in installer file names.
    pub fn platform_tag(filter: Option<BitWidth>) -> &'static str {
        match filter {
            Some(BitWidth::Bits64) => "win-amd64",
            _ => "win32",
        }
    }
}

impl TryFrom<u8> for BitWidth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            32 => Ok(BitWidth::Bits32),
            64 => Ok(BitWidth::Bits64),
            other => Err(format!("unsupported bit width {other}, expected 32 or 64")),
        }
    }
}

impl std::str::FromStr for BitWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid bit width '{s}', expected 32 or 64"))?;
        BitWidth::try_from(value)
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
