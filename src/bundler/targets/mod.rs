//! Application targets the generated installer can install into.
//!
//! An application target is one concrete runtime the installer knows how to
//! find on the user's machine: a plain Python installation of a given
//! version and bit width, or the Python bundled with a Maya release.
//!
//! Every kind implements [`ApplicationTarget`], which answers three
//! questions: what the target is called ([`ApplicationTarget::describe`]),
//! where the registry says it lives ([`ApplicationTarget::registry_probes`]),
//! and which file proves a discovered location is real
//! ([`ApplicationTarget::confirm_presence`]).

mod maya;
mod python;

pub use maya::{MAYA_CATALOG, MayaRelease, MayaTarget};
pub use python::PythonTarget;

use crate::bundler::settings::BitWidth;
use std::{collections::HashSet, fmt};

/// Registry root key probed by the installer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hive {
    /// `HKEY_LOCAL_MACHINE`
    LocalMachine,
    /// `HKEY_CURRENT_USER`
    CurrentUser,
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hive::LocalMachine => "HKLM",
            Hive::CurrentUser => "HKCU",
        })
    }
}

/// One place to look for an installed application.
///
/// Probes are tried in order at install time; the first one that yields a
/// non-empty value wins.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryProbe {
    /// Registry view (`SetRegView`).
    pub view: BitWidth,
    /// Root key.
    pub hive: Hive,
    /// Key path below the root.
    pub key: String,
    /// Value name; empty for the key's default value.
    pub value: String,
}

impl RegistryProbe {
    /// Creates a probe.
    pub fn new(view: BitWidth, hive: Hive, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            view,
            hive,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Directory layout of a target below its discovered root.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallLayout {
    /// Where packages go (site-packages).
    pub package_dir: String,
    /// Where scripts go.
    pub scripts_dir: String,
    /// Where C headers go.
    pub headers_dir: String,
    /// Interpreter used for post-install steps.
    pub interpreter: String,
}

/// Human-facing identity of a target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetDescription {
    /// Display name, e.g. `Python 2.7 (32-bit)`.
    pub name: String,
    /// DSL identifier, e.g. `python_2_7_32`.
    pub label: String,
    /// Python version the target runs, e.g. `2.7`.
    pub runtime_version: String,
    /// Bit width of the runtime.
    pub bits: BitWidth,
    /// Where files go once the root is known.
    pub layout: InstallLayout,
}

impl TargetDescription {
    /// Whether this target runs Python 3 (2to3 post-processing applies).
    pub fn is_python3(&self) -> bool {
        self.runtime_version.starts_with('3')
    }
}

/// Capability set shared by every application target kind.
pub trait ApplicationTarget: fmt::Debug {
    /// Name, label, runtime version, and layout.
    fn describe(&self) -> TargetDescription;

    /// Registry locations to try, in fallback order.
    fn registry_probes(&self) -> Vec<RegistryProbe>;

    /// Path, relative to the discovered root, that must exist for the
    /// location to be accepted.
    fn confirm_presence(&self) -> &'static str;
}

/// What the caller asked the installer to target.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TargetRequest {
    /// Runtime versions, in request order.
    pub versions: Vec<String>,
    /// Restrict to one bit width.
    pub bits: Option<BitWidth>,
    /// Also target Maya releases bundling a requested runtime version.
    pub maya: bool,
}

/// Builds a DSL-safe identifier: lowercase alphanumerics and underscores.
pub(crate) fn make_label(kind: &str, version: &str, bits: BitWidth) -> String {
    let version: String = version
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{kind}_{version}_{bits}")
}

/// Enumerates application targets for a request.
///
/// Plain Python targets come first, one per requested version and bit width
/// (32 before 64). Maya targets follow in catalog order when requested, for
/// every release whose bundled Python is among the requested versions.
/// Versions matching no catalog entry simply produce no Maya target.
///
/// An empty request yields an empty list; the caller decides whether that
/// is fatal.
pub fn enumerate_targets(request: &TargetRequest) -> Vec<Box<dyn ApplicationTarget>> {
    let mut targets: Vec<Box<dyn ApplicationTarget>> = Vec::new();
    let mut labels = HashSet::new();

    for version in &request.versions {
        for bits in BitWidth::ALL {
            if !bits.passes(request.bits) {
                continue;
            }
            let target = PythonTarget::new(version.clone(), bits);
            push_unique(&mut targets, &mut labels, Box::new(target));
        }
    }

    if request.maya {
        for release in MAYA_CATALOG {
            if !request.versions.iter().any(|v| v == release.python) {
                continue;
            }
            for &bits in release.bits {
                if bits.passes(request.bits) {
                    push_unique(&mut targets, &mut labels, Box::new(MayaTarget::new(release, bits)));
                }
            }
        }
    }

    log::debug!("Enumerated {} application targets", targets.len());
    targets
}

fn push_unique(
    targets: &mut Vec<Box<dyn ApplicationTarget>>,
    labels: &mut HashSet<String>,
    target: Box<dyn ApplicationTarget>,
) {
    let label = target.describe().label;
    if labels.insert(label.clone()) {
        targets.push(target);
    } else {
        log::warn!("Ignoring duplicate application target {}", label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(versions: &[&str], bits: Option<BitWidth>, maya: bool) -> TargetRequest {
        TargetRequest {
            versions: versions.iter().map(|v| v.to_string()).collect(),
            bits,
            maya,
        }
    }

    fn labels(targets: &[Box<dyn ApplicationTarget>]) -> Vec<String> {
        targets.iter().map(|t| t.describe().label).collect()
    }

    #[test]
    fn test_cross_product_preserves_request_order() {
        let targets = enumerate_targets(&request(&["2.7", "3.2"], None, false));
        assert_eq!(
            labels(&targets),
            ["python_2_7_32", "python_2_7_64", "python_3_2_32", "python_3_2_64"]
        );
    }

    #[test]
    fn test_bit_filter_restricts_cross_product() {
        let targets = enumerate_targets(&request(&["3.2", "2.7"], Some(BitWidth::Bits64), false));
        assert_eq!(labels(&targets), ["python_3_2_64", "python_2_7_64"]);
    }

    #[test]
    fn test_empty_request_yields_no_targets() {
        assert!(enumerate_targets(&request(&[], None, true)).is_empty());
    }

    #[test]
    fn test_maya_follows_catalog_and_skips_unknown_versions() {
        let targets = enumerate_targets(&request(&["2.6", "9.9"], Some(BitWidth::Bits64), true));
        assert_eq!(
            labels(&targets),
            [
                "python_2_6_64",
                "python_9_9_64",
                "maya_2010_64",
                "maya_2011_64",
                "maya_2012_64",
                "maya_2013_64",
            ]
        );
    }

    #[test]
    fn test_maya_only_64_bit_releases_for_2_7() {
        let targets = enumerate_targets(&request(&["2.7"], Some(BitWidth::Bits32), true));
        assert_eq!(labels(&targets), ["python_2_7_32"]);
    }

    #[test]
    fn test_duplicate_labels_are_dropped() {
        let targets = enumerate_targets(&request(&["2.7", "2_7"], Some(BitWidth::Bits32), false));
        assert_eq!(labels(&targets), ["python_2_7_32"]);
    }

    #[test]
    fn test_labels_are_dsl_identifiers() {
        for target in enumerate_targets(&request(&["2.7", "3.2"], None, true)) {
            let label = target.describe().label;
            assert!(
                label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "{label}"
            );
        }
    }
}
