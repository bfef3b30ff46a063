//! Symbol index extraction over realistic API tables.

use leaflet_docset::dom;
use leaflet_docset::indexer::{build_symbol_index, normalize_symbol_type};

const PREFIX: &str = "leafletjs.com/reference.html";

#[test]
fn rows_without_ids_under_one_heading_get_distinct_paths() {
    let doc = dom::parse(
        r#"<section><h2>Methods</h2>
        <table><thead><tr><th>Method</th><th>Returns</th></tr></thead><tbody>
        <tr><td>setView</td><td>this</td></tr>
        <tr><td>setView</td><td>this</td></tr>
        </tbody></table></section>"#,
    );

    let index = build_symbol_index(&doc, PREFIX);

    assert_eq!(index.entries.len(), 2);
    assert!(index.entries.iter().all(|e| e.kind == "Method" && e.name == "setView"));
    assert_ne!(index.entries[0].path, index.entries[1].path);
    assert_eq!(index.entries[0].path, "leafletjs.com/reference.html#methods-1");
    assert_eq!(index.entries[1].path, "leafletjs.com/reference.html#methods-2");
}

#[test]
fn duplicate_row_ids_are_suffixed_and_written_back() {
    let doc = dom::parse(
        r#"<section><h2 id="foo">Foo</h2>
        <table><thead><tr><th>Option</th></tr></thead><tbody>
        <tr id="foo"><td>a</td></tr>
        <tr id="foo"><td>b</td></tr>
        </tbody></table></section>"#,
    );

    let index = build_symbol_index(&doc, PREFIX);

    let ids: Vec<&str> = index.entries.iter().map(|e| e.anchor_id.as_str()).collect();
    assert_eq!(ids, ["foo", "foo2"]);
    assert_eq!(doc.select("tr#foo2 td").text(), "b".into());
}

#[test]
fn row_ids_are_normalized() {
    let doc = dom::parse(
        r#"<section><table><thead><tr><th>Event</th></tr></thead><tbody>
        <tr id="Map-ZoomEnd!"><td>zoomend</td></tr>
        </tbody></table></section>"#,
    );

    let index = build_symbol_index(&doc, PREFIX);

    assert_eq!(index.entries[0].anchor_id, "map-zoomend");
    assert!(doc.select("tr#map-zoomend").exists());
}

#[test]
fn header_renames_apply_case_insensitively() {
    assert_eq!(normalize_symbol_type("CRS"), "Constant");
    assert_eq!(normalize_symbol_type("Pane"), "Element");
    assert_eq!(normalize_symbol_type("Option"), "Option");

    let doc = dom::parse(
        r#"<section><h2>Map panes</h2>
        <table><thead><tr><th>Pane</th><th>Type</th></tr></thead><tbody>
        <tr><td>mapPane</td><td>HTMLElement</td></tr>
        </tbody></table></section>"#,
    );
    let index = build_symbol_index(&doc, PREFIX);
    assert_eq!(index.entries[0].kind, "Element");
    assert_eq!(index.entries[0].anchor_id, "map-panes-1");
}

#[test]
fn each_name_cell_gets_a_link_anchor() {
    let doc = dom::parse(
        r#"<section><table><thead><tr><th>Method</th></tr></thead><tbody>
        <tr id="map-locate"><td><code><b>locate</b>(&lt;Locate options&gt; <i>options?</i>)</code></td></tr>
        </tbody></table></section>"#,
    );

    let index = build_symbol_index(&doc, PREFIX);

    assert_eq!(index.entries[0].name, "locate(<Locate options> options?)");
    let anchor = doc.select("tr#map-locate td:first-of-type > a:last-child");
    assert_eq!(dom::get_attribute(&anchor, "href"), Some("#map-locate".to_string()));
    assert_eq!(dom::get_attribute(&anchor, "data-anchor"), Some("map-locate".to_string()));
}

#[test]
fn tables_outside_sections_and_without_headers_are_skipped() {
    let doc = dom::parse(
        r#"<div><table><thead><tr><th>Method</th></tr></thead><tbody><tr><td>a</td></tr></tbody></table></div>
        <section>
        <table><tbody><tr><td>no header</td></tr></tbody></table>
        <table><thead><tr><th></th></tr></thead><tbody><tr><td>empty header</td></tr></tbody></table>
        </section>"#,
    );

    let index = build_symbol_index(&doc, PREFIX);

    assert!(index.entries.is_empty());
    assert_eq!(index.tables_skipped, 2);
    assert_eq!(index.tables_indexed, 0);
}
