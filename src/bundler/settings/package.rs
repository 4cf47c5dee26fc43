//! Package metadata and configuration.

use std::path::PathBuf;

/// Package metadata shown by the installer.
///
/// This maps from the `[project]` table of `pyproject.toml`; see
/// [`crate::metadata::load_manifest`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nsis::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "demo".into(),
///     version: "1.0".into(),
///     author: Some("Jane Doe".into()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSettings {
    /// Distribution name. Also names the uninstaller and the registry key.
    pub product_name: String,

    /// Version string as declared by the project.
    pub version: String,

    /// One-line description.
    pub description: Option<String>,

    /// Author name.
    pub author: Option<String>,

    /// Author email.
    pub author_email: Option<String>,

    /// Maintainer name.
    pub maintainer: Option<String>,

    /// Maintainer email.
    pub maintainer_email: Option<String>,

    /// Project homepage.
    pub homepage: Option<String>,

    /// License name or SPDX expression.
    pub license: Option<String>,

    /// License text file, shown on the installer's license page.
    pub license_file: Option<PathBuf>,

    /// Whether pyproject.toml declares native extension modules.
    ///
    /// `setup.py` is checked separately when the run is validated.
    ///
    /// Native extensions tie the installer to the build interpreter's version
    /// and can only be compiled on a Windows host.
    pub has_ext_modules: bool,
}

impl PackageSettings {
    /// `name-version`, used as the stem of the installer file name.
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.product_name, self.version)
    }

    /// Publisher string for the uninstall registry entry.
    ///
    /// Prefers the author, falls back to the maintainer, and appends the
    /// matching email in angle brackets when one is known.
    pub fn publisher(&self) -> Option<String> {
        let (name, email) = match (&self.author, &self.maintainer) {
            (Some(author), _) => (author, &self.author_email),
            (None, Some(maintainer)) => (maintainer, &self.maintainer_email),
            (None, None) => return None,
        };
        Some(match email {
            Some(email) => format!("{name} <{email}>"),
            None => name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_prefers_author_with_email() {
        let settings = PackageSettings {
            author: Some("Amorilia".into()),
            author_email: Some("amorilia@users.sourceforge.net".into()),
            maintainer: Some("Someone Else".into()),
            ..Default::default()
        };
        assert_eq!(
            settings.publisher().as_deref(),
            Some("Amorilia <amorilia@users.sourceforge.net>")
        );
    }

    #[test]
    fn test_publisher_falls_back_to_maintainer() {
        let settings = PackageSettings {
            maintainer: Some("Keeper".into()),
            ..Default::default()
        };
        assert_eq!(settings.publisher().as_deref(), Some("Keeper"));
        assert_eq!(PackageSettings::default().publisher(), None);
    }
}
