//! Stylesheet consolidation against on-disk bundles.

#![allow(clippy::expect_used)]

mod common;

use common::Fixture;
use leaflet_docset::dom;
use leaflet_docset::stylesheet::{consolidate, eliminate_dead_rules, Rule, Stylesheet};

const PAGE: &str = r#"<html><body class="api-page">
    <section><h2 id="map">Map</h2>
    <table><tbody><tr id="map-setview"><td><code>setView</code></td></tr></tbody></table></section>
    </body></html>"#;

#[test]
fn kept_rules_are_exactly_matched_or_allow_listed() {
    let doc = dom::parse(PAGE);
    let css = "section h2 { a: 1 } aside { a: 2 } tr[id] td { a: 3 } .menu li:after { a: 4 } \
               .highlight-7 .keyword { a: 5 } .accordion.expanded { a: 6 } nav ul { a: 7 } \
               @media (max-width: 600px) { section { a: 8 } footer { a: 9 } .x:before { a: 10 } }";
    let mut sheet = Stylesheet::parse(css);
    let before = sheet.style_rule_count();

    let report = eliminate_dead_rules(&mut sheet, &doc);

    let kept: Vec<&str> = sheet.rules.iter().filter_map(Rule::selector).collect();
    assert_eq!(
        kept,
        ["section h2", "tr[id] td", ".menu li:after", ".highlight-7 .keyword", ".accordion.expanded"]
    );
    assert_eq!(sheet.rules.last().and_then(Rule::condition), Some("@media (max-width: 600px)"));
    assert_eq!(sheet.style_rule_count(), before - report.removed);
    assert_eq!(report.removed, 3);
}

#[test]
fn consolidate_writes_one_file_and_repoints_the_link() {
    let fixture = Fixture::with_page(PAGE);
    fixture.write("docs/css/main.css", "section { margin: 0 }\n.gone { color: red }\n");
    let doc = dom::parse(
        r#"<html><head><link rel="stylesheet" href="docs/css/main.css" media="screen">
        <link rel="stylesheet" href="docs/css/missing.css"></head>
        <body><section>x</section></body></html>"#,
    );

    let (css, report) = consolidate(&doc, &fixture.options).expect("consolidate");

    assert!(css.starts_with("section{margin:0}"));
    assert!(!css.contains(".gone"));
    assert_eq!(fixture.read("docs/css/styles.min.css"), css);
    assert_eq!(report.dropped_links, 1);
    assert_eq!(report.rules.removed, 1);
    assert!(!fixture.exists("docs/css/main.css"));

    let link = doc.select(r#"link[rel="stylesheet"]"#);
    assert_eq!(link.length(), 1);
    assert_eq!(dom::get_attribute(&link, "href"), Some("docs/css/styles.min.css".to_string()));
    assert_eq!(dom::get_attribute(&link, "media"), None);
}

#[test]
fn unparseable_selectors_are_reported_and_kept() {
    let fixture = Fixture::with_page(PAGE);
    fixture.write("docs/css/main.css", "section::-webkit-scrollbar-thumb:horizontal:x-y { a: b }\n");
    let doc = dom::parse(
        r#"<html><head><link rel="stylesheet" href="docs/css/main.css"></head><body></body></html>"#,
    );

    let (css, report) = consolidate(&doc, &fixture.options).expect("consolidate");

    assert_eq!(report.rules.failures.len(), 1);
    assert!(css.contains("-webkit-scrollbar-thumb"));
}
