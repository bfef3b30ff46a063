//! Source document loading.
//!
//! Reads the mirrored reference page, enforces the two fatal preconditions
//! of a build (the page exists and is not empty), decodes it to UTF-8 using
//! the charset declared in its `<meta>` tags, and turns self-referencing
//! links (`reference.html#foo`) into plain fragment links (`#foo`).

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// Smallest source document accepted, in bytes.
pub const MIN_SOURCE_SIZE: u64 = 2;

/// How far into the document the charset declaration is searched for.
const CHARSET_SNIFF_LEN: usize = 1024;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("META_CHARSET regex")
});

/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`
#[allow(clippy::expect_used)]
static META_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("META_CONTENT_TYPE regex")
});

/// Read the source document from disk.
///
/// Fails with [`Error::MissingSource`] when the file is absent and with
/// [`Error::SourceTooSmall`] when it holds fewer than [`MIN_SOURCE_SIZE`]
/// bytes. Those are the only failures that stop a build before any
/// transformation starts.
pub fn load_source(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::MissingSource(path.to_path_buf()));
    }

    let size = fs::metadata(path).map_err(|e| Error::io(path, e))?.len();
    if size < MIN_SOURCE_SIZE {
        return Err(Error::SourceTooSmall {
            path: path.to_path_buf(),
            size,
        });
    }
    debug!(path = %path.display(), size, "reading source document");

    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let html = decode_html(&bytes);
    debug!(path = %path.display(), length = html.len(), "source document decoded");
    Ok(html)
}

/// Pick the encoding declared by the document, defaulting to UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&html[..html.len().min(CHARSET_SNIFF_LEN)]);

    [&*META_CHARSET, &*META_CONTENT_TYPE]
        .iter()
        .filter_map(|re| re.captures(&head).and_then(|c| c.get(1)))
        .find_map(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode document bytes to a UTF-8 string, replacing invalid sequences.
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}

/// Rewrite `href="<index_file>#anchor"` into `href="#anchor"`.
///
/// The mirrored page links to its own sections through the full file name;
/// fragment-only links keep working after the page is moved into the bundle.
#[must_use]
pub fn rewrite_self_anchors(html: &str, index_file: &str) -> String {
    let pattern = format!(
        r#"href=["']{}(#[^"']+)["']"#,
        regex::escape(index_file)
    );
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(html, r#"href="$1""#).into_owned(),
        Err(e) => {
            debug!(error = %e, "self anchor pattern rejected, leaving links as-is");
            html.to_string()
        }
    }
}
