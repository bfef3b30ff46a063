//! Configuration options for a docset build.
//!
//! The `Options` struct describes where the downloaded reference page lives
//! inside the docset bundle, where the build outputs go, and a handful of
//! knobs for the individual passes.

use std::path::PathBuf;

/// Bundle metadata written to `Contents/Info.plist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInfo {
    /// `CFBundleIdentifier`, also used as the docset keyword.
    pub identifier: String,

    /// `CFBundleName`, the display name in the documentation browser.
    pub name: String,

    /// `DocSetPlatformFamily`.
    pub platform_family: String,
}

impl Default for BundleInfo {
    fn default() -> Self {
        Self {
            identifier: "leaflet".to_string(),
            name: "Leaflet".to_string(),
            platform_family: "leaflet".to_string(),
        }
    }
}

/// Configuration options for a docset build.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the standard Leaflet layout.
///
/// # Example
///
/// ```rust
/// use leaflet_docset::Options;
///
/// let options = Options {
///     docset_dir: "out/Leaflet.docset".into(),
///     archive_path: None,
///     ..Options::default()
/// };
/// assert!(options.index_path().ends_with("leafletjs.com/reference.html"));
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Root of the docset bundle (the `*.docset` directory).
    ///
    /// Default: `dist/Leaflet.docset`
    pub docset_dir: PathBuf,

    /// Directory under `Contents/Resources/Documents` holding the mirrored site.
    ///
    /// Default: `leafletjs.com`
    pub site_dir_name: String,

    /// File name of the reference page inside the site directory.
    ///
    /// Default: `reference.html`
    pub index_file: String,

    /// Static asset directory, relative to the site directory.
    ///
    /// Default: `docs`
    pub static_dir_name: String,

    /// Consolidated stylesheet, relative to the site directory.
    ///
    /// Default: `docs/css/styles.min.css`
    pub stylesheet_output: String,

    /// Prefix of every search index path; the anchor follows `#`.
    ///
    /// Default: `leafletjs.com/reference.html`
    pub path_prefix: String,

    /// Name of the bundled syntect theme used for code samples.
    ///
    /// Unknown names fall back to the theme's default colors.
    ///
    /// Default: `InspiredGitHub`
    pub highlight_theme: String,

    /// Scripts appended to `<body>` after sanitization, relative to the site directory.
    ///
    /// Default: `["docs/js/reference.js"]`
    pub extra_scripts: Vec<String>,

    /// Directories removed before processing, relative to the site directory.
    ///
    /// Default: `["dialog", "docs/highlight"]`
    pub obsolete_dirs: Vec<String>,

    /// Where to write the JSON dump of the symbol index.
    ///
    /// Default: `Some("nodes.json")`
    pub symbols_dump: Option<PathBuf>,

    /// Where to write the `.tgz` archive of the docset.
    ///
    /// Default: `Some("dist/Leaflet.tgz")`
    pub archive_path: Option<PathBuf>,

    /// Metadata for `Info.plist`.
    pub bundle: BundleInfo,

    /// Minify the final HTML.
    ///
    /// Default: `true`
    pub minify: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            docset_dir: PathBuf::from("dist/Leaflet.docset"),
            site_dir_name: "leafletjs.com".to_string(),
            index_file: "reference.html".to_string(),
            static_dir_name: "docs".to_string(),
            stylesheet_output: "docs/css/styles.min.css".to_string(),
            path_prefix: "leafletjs.com/reference.html".to_string(),
            highlight_theme: "InspiredGitHub".to_string(),
            extra_scripts: vec!["docs/js/reference.js".to_string()],
            obsolete_dirs: vec!["dialog".to_string(), "docs/highlight".to_string()],
            symbols_dump: Some(PathBuf::from("nodes.json")),
            archive_path: Some(PathBuf::from("dist/Leaflet.tgz")),
            bundle: BundleInfo::default(),
            minify: true,
        }
    }
}

impl Options {
    /// `Contents/Resources` inside the bundle.
    #[must_use]
    pub fn resources_dir(&self) -> PathBuf {
        self.docset_dir.join("Contents").join("Resources")
    }

    /// `Contents/Resources/Documents` inside the bundle.
    #[must_use]
    pub fn documents_dir(&self) -> PathBuf {
        self.resources_dir().join("Documents")
    }

    /// The mirrored site directory.
    #[must_use]
    pub fn site_dir(&self) -> PathBuf {
        self.documents_dir().join(&self.site_dir_name)
    }

    /// The reference page that gets transformed.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.site_dir().join(&self.index_file)
    }

    /// The static asset directory (`docs/`).
    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.site_dir().join(&self.static_dir_name)
    }

    /// Absolute location of the consolidated stylesheet.
    #[must_use]
    pub fn stylesheet_path(&self) -> PathBuf {
        self.site_dir().join(&self.stylesheet_output)
    }

    /// The SQLite search index.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.resources_dir().join("docSet.dsidx")
    }

    /// `Contents/Info.plist`.
    #[must_use]
    pub fn plist_path(&self) -> PathBuf {
        self.docset_dir.join("Contents").join("Info.plist")
    }

    /// Index file path relative to the Documents directory, as Dash expects it.
    #[must_use]
    pub fn index_relative_path(&self) -> String {
        format!("{}/{}", self.site_dir_name, self.index_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_dash_bundle() {
        let options = Options::default();
        assert_eq!(
            options.index_path(),
            PathBuf::from("dist/Leaflet.docset/Contents/Resources/Documents/leafletjs.com/reference.html")
        );
        assert_eq!(
            options.database_path(),
            PathBuf::from("dist/Leaflet.docset/Contents/Resources/docSet.dsidx")
        );
        assert_eq!(
            options.stylesheet_path(),
            PathBuf::from("dist/Leaflet.docset/Contents/Resources/Documents/leafletjs.com/docs/css/styles.min.css")
        );
    }

    #[test]
    fn layout_follows_custom_docset_dir() {
        let options = Options {
            docset_dir: PathBuf::from("/tmp/x.docset"),
            site_dir_name: "example.org".to_string(),
            ..Options::default()
        };
        assert_eq!(options.plist_path(), PathBuf::from("/tmp/x.docset/Contents/Info.plist"));
        assert_eq!(
            options.static_dir(),
            PathBuf::from("/tmp/x.docset/Contents/Resources/Documents/example.org/docs")
        );
        assert_eq!(options.index_relative_path(), "example.org/reference.html");
    }
}
