//! NSIS installer script generation.
//!
//! Builds a typed [`ScriptContext`] from settings, application targets and
//! instruction blocks, then renders it into the skeleton with handlebars.
//! Strict mode turns any expression without a provider into a render error.

use super::{
    emit::{self, InstructionBlock},
    template::{NSI_TEMPLATE, POSTINSTALL_TEMPLATE},
    utils::{self, escape_path, nsis_escape},
};
use crate::bundler::{
    error::{Context, ErrorExt, Result},
    settings::{NsisCompression, Settings},
    targets::{ApplicationTarget, RegistryProbe},
    tree::{Classification, InstallRole},
};
use handlebars::Handlebars;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Name of the generated script inside the staging directory.
pub const SCRIPT_FILE_NAME: &str = "setup.nsi";
/// Name of the post-install helper inside the staging directory.
pub const POSTINSTALL_FILE_NAME: &str = "postinstall.py";
/// Name of the copied license text inside the staging directory.
pub const LICENSE_FILE_NAME: &str = "license.txt";

const DEFAULT_INSTALL_ICON: &str = r"${NSISDIR}\Contrib\Graphics\Icons\modern-install.ico";
const DEFAULT_UNINSTALL_ICON: &str = r"${NSISDIR}\Contrib\Graphics\Icons\modern-uninstall.ico";
const DEFAULT_HEADER_BITMAP: &str = r"${NSISDIR}\Contrib\Graphics\Header\nsis.bmp";
const DEFAULT_WELCOME_BITMAP: &str = r"${NSISDIR}\Contrib\Graphics\Wizard\win.bmp";

/// Comment toggle for an optional script line.
///
/// Serializes to an empty string when enabled and to `;` when disabled, so
/// the line it prefixes either executes or becomes a comment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Toggle(bool);

impl Toggle {
    /// Toggle for `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self(enabled)
    }

    /// Whether the prefixed line executes.
    pub fn is_enabled(self) -> bool {
        self.0
    }

    fn token(self) -> &'static str {
        if self.0 { "" } else { ";" }
    }
}

impl Serialize for Toggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

/// All comment toggles of the skeleton.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Toggles {
    pub compile: Toggle,
    pub optimize: Toggle,
    pub run_2to3: Toggle,
    pub msvc2008: Toggle,
    pub msvc2010: Toggle,
    pub debug: Toggle,
    pub nsh: Toggle,
    pub license_page: Toggle,
    pub publisher: Toggle,
    pub web_site: Toggle,
    pub info_description: Toggle,
    pub info_author: Toggle,
    pub info_author_email: Toggle,
    pub info_maintainer: Toggle,
    pub info_maintainer_email: Toggle,
    pub info_url: Toggle,
    pub info_license: Toggle,
}

/// Escaped package information; empty where the toggle is off.
#[derive(Clone, Debug, Default, Serialize)]
pub struct InfoLines {
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub maintainer: String,
    pub maintainer_email: String,
    pub url: String,
    pub license: String,
}

/// One registry lookup as rendered into a detection function.
#[derive(Clone, Debug, Serialize)]
pub struct ProbeContext {
    pub view: String,
    pub hive: String,
    pub key: String,
    pub value: String,
}

impl From<RegistryProbe> for ProbeContext {
    fn from(probe: RegistryProbe) -> Self {
        Self {
            view: probe.view.to_string(),
            hive: probe.hive.to_string(),
            key: nsis_escape(&probe.key),
            value: nsis_escape(&probe.value),
        }
    }
}

/// One application target as rendered into a section and its detection.
#[derive(Clone, Debug, Serialize)]
pub struct TargetContext {
    pub name: String,
    pub label: String,
    /// `${SEC_<label>}`, precomputed so the skeleton never nests braces.
    pub section_ref: String,
    pub probes: Vec<ProbeContext>,
    /// Detected root joined with the file confirming the target exists.
    pub presence_path: String,
    pub package_dir: String,
    pub scripts_dir: String,
    pub headers_dir: String,
    pub interpreter: String,
    pub run_2to3: Toggle,
}

impl TargetContext {
    fn new(target: &dyn ApplicationTarget, run_2to3: bool, has_package: bool) -> Self {
        let desc = target.describe();
        let root = format!("$DIR_{}", desc.label);
        let under_root = |relative: &str| format!("{root}\\{}", nsis_escape(relative));
        Self {
            name: nsis_escape(&desc.name),
            section_ref: format!("${{SEC_{}}}", desc.label),
            probes: target.registry_probes().into_iter().map(Into::into).collect(),
            presence_path: format!("$R0\\{}", target.confirm_presence()),
            package_dir: under_root(&desc.layout.package_dir),
            scripts_dir: under_root(&desc.layout.scripts_dir),
            headers_dir: under_root(&desc.layout.headers_dir),
            interpreter: under_root(&desc.layout.interpreter),
            run_2to3: Toggle::new(run_2to3 && has_package && desc.is_python3()),
            label: desc.label,
        }
    }
}

/// Install and uninstall fragments of one role.
#[derive(Clone, Debug, Serialize)]
pub struct BlockContext {
    pub install: String,
    pub uninstall: String,
}

impl From<&InstructionBlock> for BlockContext {
    fn from(block: &InstructionBlock) -> Self {
        Self {
            install: block.install_text(),
            uninstall: block.uninstall_text(),
        }
    }
}

/// Every value the skeleton refers to.
///
/// Adding an expression to the skeleton without a field here fails the
/// render in strict mode; the field types keep the providers honest.
#[derive(Clone, Debug, Serialize)]
pub struct ScriptContext {
    pub product_name: String,
    pub version: String,
    pub version_nsis: String,
    pub compression: String,
    pub publisher: String,
    pub web_site: String,
    pub installer_path: String,
    pub install_icon: String,
    pub uninstall_icon: String,
    pub header_bitmap: String,
    pub welcome_bitmap: String,
    pub license_file: String,
    pub nsh_path: String,
    pub toggles: Toggles,
    pub info: InfoLines,
    pub targets: Vec<TargetContext>,
    pub package: Option<BlockContext>,
    pub script: Option<BlockContext>,
    pub header: Option<BlockContext>,
    pub postinstall: bool,
}

impl ScriptContext {
    /// Assembles the context for one run.
    ///
    /// `blocks` holds at most one block per role; roles without a block are
    /// omitted from the script along with their post-processing.
    pub fn new(
        settings: &Settings,
        targets: &[Box<dyn ApplicationTarget>],
        blocks: &[InstructionBlock],
    ) -> Self {
        let package = settings.package();
        let nsis = settings.nsis_settings();
        let block = |role: InstallRole| {
            blocks
                .iter()
                .find(|b| b.role() == role)
                .map(BlockContext::from)
        };
        let has_package = blocks.iter().any(|b| b.role() == InstallRole::Package);
        let postinstall = has_package && nsis.needs_postinstall();

        let mut toggles = Toggles {
            compile: Toggle::new(nsis.compile),
            optimize: Toggle::new(nsis.optimize),
            run_2to3: Toggle::new(nsis.run_2to3),
            msvc2008: Toggle::new(nsis.msvc2008),
            msvc2010: Toggle::new(nsis.msvc2010),
            debug: Toggle::new(nsis.debug),
            nsh: Toggle::new(nsis.include_nsh.is_some()),
            license_page: Toggle::new(package.license_file.is_some()),
            ..Default::default()
        };
        let mut info = InfoLines::default();
        let fill = |value: &Option<String>, toggle: &mut Toggle, slot: &mut String| {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                *toggle = Toggle::new(true);
                *slot = nsis_escape(value);
            }
        };
        fill(&package.description, &mut toggles.info_description, &mut info.description);
        fill(&package.author, &mut toggles.info_author, &mut info.author);
        fill(&package.author_email, &mut toggles.info_author_email, &mut info.author_email);
        fill(&package.maintainer, &mut toggles.info_maintainer, &mut info.maintainer);
        fill(
            &package.maintainer_email,
            &mut toggles.info_maintainer_email,
            &mut info.maintainer_email,
        );
        fill(&package.homepage, &mut toggles.info_url, &mut info.url);
        fill(&package.license, &mut toggles.info_license, &mut info.license);

        let publisher = package.publisher();
        toggles.publisher = Toggle::new(publisher.is_some());
        toggles.web_site = toggles.info_url;

        let asset = |path: &Option<PathBuf>, default: &str| match path {
            Some(path) => escape_path(&path.display().to_string()),
            None => default.to_string(),
        };

        Self {
            product_name: nsis_escape(settings.product_name()),
            version: nsis_escape(settings.version_string()),
            version_nsis: utils::format_version_for_nsis(settings.version_string()),
            compression: match nsis.compression {
                NsisCompression::None => "SetCompress off".to_string(),
                NsisCompression::Lzma => "SetCompressor /SOLID lzma".to_string(),
                other => format!("SetCompressor {}", utils::map_compression(other)),
            },
            publisher: publisher.as_deref().map(nsis_escape).unwrap_or_default(),
            web_site: info.url.clone(),
            installer_path: escape_path(&settings.installer_path().display().to_string()),
            install_icon: asset(&nsis.installer_icon, DEFAULT_INSTALL_ICON),
            uninstall_icon: asset(&nsis.uninstaller_icon, DEFAULT_UNINSTALL_ICON),
            header_bitmap: asset(&nsis.header_image, DEFAULT_HEADER_BITMAP),
            welcome_bitmap: asset(&nsis.welcome_image, DEFAULT_WELCOME_BITMAP),
            license_file: LICENSE_FILE_NAME.to_string(),
            nsh_path: asset(&nsis.include_nsh, ""),
            toggles,
            info,
            targets: targets
                .iter()
                .map(|t| TargetContext::new(t.as_ref(), nsis.run_2to3, has_package))
                .collect(),
            package: block(InstallRole::Package),
            script: block(InstallRole::Script),
            header: block(InstallRole::Header),
            postinstall,
        }
    }
}

#[derive(Serialize)]
struct PostinstallContext<'a> {
    product_name: &'a str,
    version: &'a str,
    sources: Vec<String>,
}

fn registry(name: &str, template: &str) -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    handlebars.register_template_string(name, template)?;
    Ok(handlebars)
}

/// Render a skeleton with `context`.
pub fn render_script(template: &str, context: &ScriptContext) -> Result<String> {
    let handlebars = registry(SCRIPT_FILE_NAME, template)?;
    Ok(handlebars.render(SCRIPT_FILE_NAME, context)?)
}

/// Render the post-install helper for the package role's sources.
pub fn render_postinstall(settings: &Settings, sources: Vec<String>) -> Result<String> {
    let handlebars = registry(POSTINSTALL_FILE_NAME, POSTINSTALL_TEMPLATE)?;
    let context = PostinstallContext {
        product_name: settings.product_name(),
        version: settings.version_string(),
        sources,
    };
    Ok(handlebars.render(POSTINSTALL_FILE_NAME, &context)?)
}

/// Files written by [`generate_nsi_script`].
#[derive(Clone, Debug)]
pub struct GeneratedScript {
    /// The NSIS script.
    pub script: PathBuf,
    /// Post-install helper, when one was needed.
    pub postinstall: Option<PathBuf>,
    /// License text copied next to the script.
    pub license: Option<PathBuf>,
}

/// Generate the NSI installer script and its companions in the staging dir.
///
/// The skeleton is the built-in one unless the settings name a custom
/// template. The script is written with the UTF-8 BOM NSIS expects.
pub async fn generate_nsi_script(
    settings: &Settings,
    targets: &[Box<dyn ApplicationTarget>],
    classification: &Classification,
) -> Result<GeneratedScript> {
    let out_dir = settings.bdist_dir();
    let blocks = emit::emit_all(classification);
    let context = ScriptContext::new(settings, targets, &blocks);

    let template = match &settings.nsis_settings().template {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .fs_context("reading NSIS template", path)?,
        None => NSI_TEMPLATE.to_string(),
    };
    let nsi_content = render_script(&template, &context).context("rendering setup.nsi")?;

    let postinstall = if context.postinstall {
        let sources = emit::package_sources(classification.role(InstallRole::Package));
        let content = render_postinstall(settings, sources)?;
        let path = out_dir.join(POSTINSTALL_FILE_NAME);
        tokio::fs::write(&path, content)
            .await
            .fs_context("writing post-install helper", &path)?;
        Some(path)
    } else {
        None
    };

    let license = match &settings.package().license_file {
        Some(source) => Some(copy_license(source, out_dir).await?),
        None => None,
    };

    let script = out_dir.join(SCRIPT_FILE_NAME);
    utils::write_utf8_bom(&script, &nsi_content).await?;
    log::info!(
        "Wrote {} with {} application targets",
        script.display(),
        context.targets.len()
    );

    Ok(GeneratedScript {
        script,
        postinstall,
        license,
    })
}

async fn copy_license(source: &Path, out_dir: &Path) -> Result<PathBuf> {
    let target = out_dir.join(LICENSE_FILE_NAME);
    tokio::fs::copy(source, &target)
        .await
        .fs_context("copying license file", source)?;
    Ok(target)
}
