//! `Contents/Info.plist` for the docset bundle.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::create_parent;
use crate::error::{Error, Result};
use crate::options::BundleInfo;

/// Render the property list for `bundle`.
///
/// `index_path` is the start page relative to `Contents/Resources/Documents`.
#[must_use]
pub fn render_info_plist(bundle: &BundleInfo, index_path: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>{identifier}</string>
    <key>CFBundleName</key>
    <string>{name}</string>
    <key>DocSetPlatformFamily</key>
    <string>{family}</string>
    <key>dashIndexFilePath</key>
    <string>{index}</string>
    <key>isDashDocset</key>
    <true/>
    <key>isJavaScriptEnabled</key>
    <true/>
</dict>
</plist>
"#,
        identifier = xml_escape(&bundle.identifier),
        name = xml_escape(&bundle.name),
        family = xml_escape(&bundle.platform_family),
        index = xml_escape(index_path),
    )
}

/// Write `Info.plist` unless the bundle already has one.
///
/// Returns `true` when a file was written.
pub fn write_info_plist(path: &Path, bundle: &BundleInfo, index_path: &str) -> Result<bool> {
    if path.exists() {
        debug!(path = %path.display(), "keeping existing Info.plist");
        return Ok(false);
    }
    create_parent(path)?;
    fs::write(path, render_info_plist(bundle, index_path)).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "Info.plist written");
    Ok(true)
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plist_names_the_index_page() {
        let plist = render_info_plist(&BundleInfo::default(), "leafletjs.com/reference.html");
        assert!(plist.contains("<string>leaflet</string>"));
        assert!(plist.contains("<string>Leaflet</string>"));
        assert!(plist.contains("<string>leafletjs.com/reference.html</string>"));
        assert!(plist.contains("<key>isDashDocset</key>\n    <true/>"));
    }

    #[test]
    fn values_are_escaped() {
        let bundle = BundleInfo {
            name: "Maps & <Tiles>".to_string(),
            ..BundleInfo::default()
        };
        assert!(render_info_plist(&bundle, "x.html").contains("Maps &amp; &lt;Tiles&gt;"));
    }

    #[test]
    fn existing_plist_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Contents/Info.plist");

        assert!(write_info_plist(&path, &BundleInfo::default(), "a.html").expect("write"));
        fs::write(&path, "custom").expect("overwrite");
        assert!(!write_info_plist(&path, &BundleInfo::default(), "b.html").expect("keep"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "custom");
    }
}
