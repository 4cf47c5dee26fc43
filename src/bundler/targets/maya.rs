//! Autodesk Maya releases and the Python they bundle.

use super::{ApplicationTarget, Hive, InstallLayout, RegistryProbe, TargetDescription, make_label};
use crate::bundler::settings::BitWidth;

/// One Maya release in the catalog.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MayaRelease {
    /// Release year, which is also the registry key.
    pub year: &'static str,
    /// Bundled Python version.
    pub python: &'static str,
    /// Bit widths the release shipped in.
    pub bits: &'static [BitWidth],
}

const BOTH: &[BitWidth] = &[BitWidth::Bits32, BitWidth::Bits64];
const ONLY_64: &[BitWidth] = &[BitWidth::Bits64];

/// Known Maya releases, oldest first. Enumeration preserves this order.
pub const MAYA_CATALOG: &[MayaRelease] = &[
    MayaRelease { year: "2008", python: "2.5", bits: BOTH },
    MayaRelease { year: "2009", python: "2.5", bits: BOTH },
    MayaRelease { year: "2010", python: "2.6", bits: BOTH },
    MayaRelease { year: "2011", python: "2.6", bits: BOTH },
    MayaRelease { year: "2012", python: "2.6", bits: BOTH },
    MayaRelease { year: "2013", python: "2.6", bits: BOTH },
    MayaRelease { year: "2014", python: "2.7", bits: ONLY_64 },
    MayaRelease { year: "2015", python: "2.7", bits: ONLY_64 },
    MayaRelease { year: "2016", python: "2.7", bits: ONLY_64 },
];

/// A Maya installation of one release and bit width.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MayaTarget {
    release: MayaRelease,
    bits: BitWidth,
}

impl MayaTarget {
    /// Creates a target for a catalog release.
    pub fn new(release: &MayaRelease, bits: BitWidth) -> Self {
        Self {
            release: *release,
            bits,
        }
    }
}

impl ApplicationTarget for MayaTarget {
    fn describe(&self) -> TargetDescription {
        TargetDescription {
            name: format!("Maya {} ({}-bit)", self.release.year, self.bits),
            label: make_label("maya", self.release.year, self.bits),
            runtime_version: self.release.python.to_string(),
            bits: self.bits,
            layout: InstallLayout {
                package_dir: r"Python\Lib\site-packages".into(),
                scripts_dir: r"Python\Scripts".into(),
                headers_dir: format!(r"include\python{}", self.release.python),
                interpreter: r"bin\mayapy.exe".into(),
            },
        }
    }

    fn registry_probes(&self) -> Vec<RegistryProbe> {
        vec![RegistryProbe::new(
            self.bits,
            Hive::LocalMachine,
            format!(r"SOFTWARE\Autodesk\Maya\{}\Setup\InstallPath", self.release.year),
            "MAYA_INSTALL_LOCATION",
        )]
    }

    fn confirm_presence(&self) -> &'static str {
        r"bin\mayapy.exe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maya_layout_nests_python() {
        let target = MayaTarget::new(&MAYA_CATALOG[4], BitWidth::Bits32);
        let desc = target.describe();
        assert_eq!(desc.label, "maya_2012_32");
        assert_eq!(desc.runtime_version, "2.6");
        assert_eq!(desc.layout.headers_dir, r"include\python2.6");
        assert_eq!(target.confirm_presence(), r"bin\mayapy.exe");
    }

    #[test]
    fn test_maya_probe_uses_release_view() {
        let probes = MayaTarget::new(&MAYA_CATALOG[6], BitWidth::Bits64).registry_probes();
        assert_eq!(probes.len(), 1);
        assert_eq!(probes[0].view, BitWidth::Bits64);
        assert_eq!(probes[0].key, r"SOFTWARE\Autodesk\Maya\2014\Setup\InstallPath");
        assert_eq!(probes[0].value, "MAYA_INSTALL_LOCATION");
    }
}
