//! Shared fixture: a docset bundle holding a trimmed-down reference page.

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use leaflet_docset::Options;
use tempfile::TempDir;

pub const REFERENCE_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Documentation - Leaflet</title>
<link rel="stylesheet" href="docs/css/normalize.css">
<link rel="stylesheet" href="docs/css/main.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="docs/highlight/styles/github-gist.css">
<link rel="icon" type="image/x-icon" href="docs/images/favicon.ico">
<link rel="alternate" type="application/rss+xml" href="https://leafletjs.com/feed.xml">
<script src="docs/highlight/highlight.pack.js"></script>
<script src="docs/js/docs.js"></script>
<script>hljs.initHighlightingOnLoad();</script>
<style>.api-page h2 { margin-top: 1em; }</style>
</head>
<body class="api-page">
<header><a href="index.html"><img src="docs/images/logo.png"></a></header>
<nav class="ext-links"><a href="https://github.com/Leaflet/Leaflet">GitHub</a></nav>
<div id="toc"><a href="reference.html#map">Map</a></div>
<section>
<h2 id="map">Map</h2>
<p>The central class. See <a href="reference.html#map-setview">setView</a>.</p>
<pre><code class="language-js">var map = L.map('map', {
    center: [51.505, -0.09],
    zoom: 13
});</code></pre>
<h3 id="map-factory">Creation</h3>
<table><thead><tr><th>Factory</th><th>Description</th></tr></thead>
<tbody><tr id="map-l-map"><td><code><b>L.map</b>(&lt;String&gt; <i>id</i>)</code></td><td>Creates a map.</td></tr></tbody></table>
<h3>Methods</h3>
<table><thead><tr><th>Method</th><th>Returns</th></tr></thead>
<tbody>
<tr id="map-setview"><td><code><b>setView</b>(center)</code></td><td><code>this</code></td></tr>
<tr id="map-setview"><td><code><b>setView</b>(center, zoom)</code></td><td><code>this</code></td></tr>
</tbody></table>
<table><tbody><tr><td>no header here</td></tr></tbody></table>
</section>
<section>
<h2 id="crs">CRS</h2>
<table><thead><tr><th>CRS</th><th>Description</th></tr></thead>
<tbody><tr><td><code>L.CRS.EPSG3857</code></td><td>Default.</td></tr></tbody></table>
<pre><code class="nohighlight">plain <span>markup</span></code></pre>
</section>
<!-- footer comment -->
<p><nobr>no wrap</nobr></p>
</body>
</html>
"##;

/// A temporary docset bundle laid out like a fresh `wget` mirror.
pub struct Fixture {
    pub dir: TempDir,
    pub options: Options,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_page(REFERENCE_PAGE)
    }

    pub fn with_page(page: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = Options {
            docset_dir: dir.path().join("Leaflet.docset"),
            symbols_dump: Some(dir.path().join("nodes.json")),
            archive_path: Some(dir.path().join("Leaflet.tgz")),
            ..Options::default()
        };
        let fixture = Self { dir, options };

        fixture.write("reference.html", page);
        fixture.write("docs/css/normalize.css", "html { font-family: sans-serif; }\naudio { display: none; }\n");
        fixture.write(
            "docs/css/main.css",
            "@import url(\"fonts.css\");\n\
             /* layout */\n\
             body { background: url(../images/bg.png); }\n\
             .api-page table td { padding: 4px; }\n\
             .sidebar li { color: red; }\n\
             .api-page h2[id]:hover:before { content: \"#\"; }\n\
             div.accordion.expanded label { top: 0; }\n\
             @font-face { font-family: Inter; src: url(inter.woff2); }\n\
             @media print { .sidebar { display: none; } section { margin: 0; } }\n",
        );
        fixture.write("docs/css/fonts.css", "h2 { font-weight: 700; }\n");
        fixture.write("docs/css/unused.css", "aside { color: blue; }\n");
        fixture.write("docs/js/reference.js", "// accordion\n");
        fixture.write("docs/js/docs.js", "// site nav\n");
        fixture.write("docs/images/bg.png", "png");
        fixture.write("docs/images/logo.png", "png");
        fixture.write("docs/images/favicon.ico", "ico");
        fixture.write("docs/highlight/highlight.pack.js", "// hljs\n");
        fixture.write("dialog/index.html", "<p>dialog</p>");
        fixture
    }

    pub fn site(&self) -> PathBuf {
        self.options.site_dir()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.site().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write fixture file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("read output")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }
}
