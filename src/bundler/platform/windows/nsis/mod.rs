//! Windows NSIS installer creation.
//!
//! Turns a classified staging tree into an NSIS script and compiles it with
//! `makensis`. One installer carries a section per application target; each
//! section detects its runtime at install time and installs the same role
//! blocks into that runtime's layout.
//!
//! # Module Organization
//!
//! - `emit` - Per-role install/uninstall instruction blocks
//! - `template` - NSI skeleton and post-install helper templates
//! - `script` - Typed template context and script generation
//! - `toolset` - makensis location
//! - `build` - makensis execution
//! - `utils` - Escaping, version formatting, BOM writing

pub mod emit;
pub mod script;
mod template;
pub mod toolset;
mod build;
mod utils;

pub use emit::InstructionBlock;
pub use script::{GeneratedScript, ScriptContext, Toggle};
pub use toolset::Toolset;

use crate::bundler::{
    error::Result,
    settings::Settings,
    targets::ApplicationTarget,
    tree::Classification,
};
use std::path::PathBuf;

/// Result of one NSIS step.
#[derive(Clone, Debug)]
pub struct NsisOutcome {
    /// Files generated in the staging directory.
    pub generated: GeneratedScript,
    /// The compiled installer, when makensis produced one.
    pub installer: Option<PathBuf>,
    /// Why no installer was produced, when compilation was attempted and failed.
    pub warning: Option<String>,
}

/// Bundle project as NSIS installer.
///
/// # Process
///
/// 1. Generate `setup.nsi` and its companion files in the staging directory
/// 2. Locate makensis
/// 3. Compile the script into the dist directory
///
/// Failing to generate the script is an error. A missing or failing
/// makensis is not: the outcome then carries a warning and no installer,
/// and the generated script stays available for inspection.
pub async fn bundle_project(
    settings: &Settings,
    targets: &[Box<dyn ApplicationTarget>],
    classification: &Classification,
) -> Result<NsisOutcome> {
    log::info!("Building NSIS installer for {}", settings.product_name());

    let generated = script::generate_nsi_script(settings, targets, classification).await?;
    let installer_path = settings.installer_path();

    let compiled = match Toolset::locate(settings.nsis_dir()) {
        Ok(toolset) => build::run_makensis(&toolset, &generated.script, &installer_path).await,
        Err(e) => Err(e),
    };

    let outcome = match compiled {
        Ok(()) if installer_path.is_file() => {
            log::info!("✓ Created NSIS installer: {}", installer_path.display());
            NsisOutcome {
                generated,
                installer: Some(installer_path),
                warning: None,
            }
        }
        Ok(()) => {
            let warning = format!(
                "makensis finished but {} was not created",
                installer_path.display()
            );
            log::warn!("{warning}");
            NsisOutcome {
                generated,
                installer: None,
                warning: Some(warning),
            }
        }
        Err(e) => {
            let warning = format!("possible error during NSIS compilation: {e}");
            log::warn!("{warning}");
            NsisOutcome {
                generated,
                installer: None,
                warning: Some(warning),
            }
        }
    };

    Ok(outcome)
}
