//! Plain Python installations.

use super::{ApplicationTarget, Hive, InstallLayout, RegistryProbe, TargetDescription, make_label};
use crate::bundler::settings::BitWidth;

const PYTHON_CORE: &str = r"Software\Python\PythonCore";

/// A Python installation of one version and bit width.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PythonTarget {
    version: String,
    bits: BitWidth,
}

impl PythonTarget {
    /// Creates a target for `version` (e.g. `2.7`) at `bits`.
    pub fn new(version: String, bits: BitWidth) -> Self {
        Self { version, bits }
    }
}

impl ApplicationTarget for PythonTarget {
    fn describe(&self) -> TargetDescription {
        TargetDescription {
            name: format!("Python {} ({}-bit)", self.version, self.bits),
            label: make_label("python", &self.version, self.bits),
            runtime_version: self.version.clone(),
            bits: self.bits,
            layout: InstallLayout {
                package_dir: r"Lib\site-packages".into(),
                scripts_dir: "Scripts".into(),
                headers_dir: "Include".into(),
                interpreter: "python.exe".into(),
            },
        }
    }

    fn registry_probes(&self) -> Vec<RegistryProbe> {
        let key = |suffix: &str| format!(r"{PYTHON_CORE}\{}{suffix}\InstallPath", self.version);
        match self.bits {
            BitWidth::Bits32 => vec![
                RegistryProbe::new(BitWidth::Bits32, Hive::LocalMachine, key(""), ""),
                // per-user installs of 3.5+ register 32-bit builds as "<v>-32"
                RegistryProbe::new(BitWidth::Bits32, Hive::CurrentUser, key("-32"), ""),
                RegistryProbe::new(BitWidth::Bits32, Hive::CurrentUser, key(""), ""),
            ],
            BitWidth::Bits64 => vec![
                RegistryProbe::new(BitWidth::Bits64, Hive::LocalMachine, key(""), ""),
                RegistryProbe::new(BitWidth::Bits64, Hive::CurrentUser, key(""), ""),
            ],
        }
    }

    fn confirm_presence(&self) -> &'static str {
        "python.exe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_32_bit_probes_fall_back_to_current_user() {
        let probes = PythonTarget::new("3.6".into(), BitWidth::Bits32).registry_probes();
        assert_eq!(probes.len(), 3);
        assert_eq!(probes[0].hive, Hive::LocalMachine);
        assert_eq!(probes[0].key, r"Software\Python\PythonCore\3.6\InstallPath");
        assert_eq!(probes[1].key, r"Software\Python\PythonCore\3.6-32\InstallPath");
        assert!(probes.iter().all(|p| p.view == BitWidth::Bits32 && p.value.is_empty()));
    }

    #[test]
    fn test_describe() {
        let desc = PythonTarget::new("2.7".into(), BitWidth::Bits64).describe();
        assert_eq!(desc.name, "Python 2.7 (64-bit)");
        assert_eq!(desc.label, "python_2_7_64");
        assert!(!desc.is_python3());
        assert_eq!(desc.layout.package_dir, r"Lib\site-packages");
    }
}
