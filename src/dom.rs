//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate so the build passes read as
//! tree operations instead of selection plumbing. Every pass mutates the
//! same `Document` in place.

pub use dom_query::{Document, Matcher, Selection};

pub use tendril::StrTendril;

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get an attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

/// First token of the `class` attribute, if any.
#[must_use]
pub fn first_class(sel: &Selection) -> Option<String> {
    sel.attr("class")
        .and_then(|classes| classes.split_whitespace().next().map(str::to_string))
}

// === Tag/Node Information ===

/// Get tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// True when the element has at least one element child.
///
/// Text-only elements (raw code samples) return `false`.
#[inline]
#[must_use]
pub fn has_element_children(sel: &Selection) -> bool {
    sel.children().exists()
}

// === Text Content ===

/// All text of the node and its descendants, tags stripped and entities decoded.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Outer HTML of the selection.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Querying ===

/// Split a selection into one selection per node, in document order.
///
/// The snapshot is stable while the caller mutates the tree, which is what
/// the highlighter relies on for its fixed occurrence numbering.
#[must_use]
pub fn each<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|node| Selection::from(*node)).collect()
}

/// Compile a selector for matching against the tree.
///
/// Returns the parser's complaint when the selector is outside what the
/// matcher supports (pseudo-elements, vendor pseudo-classes, malformed text).
pub fn compile_selector(selector: &str) -> Result<Matcher, String> {
    Matcher::new(selector).map_err(|e| format!("{e:?}"))
}

/// True when at least one element of the document matches.
#[inline]
#[must_use]
pub fn matches_any(doc: &Document, matcher: &Matcher) -> bool {
    doc.select_matcher(matcher).exists()
}

// === Tree Manipulation ===

/// Detach every element of the selection (with descendants) and return how many went.
#[inline]
pub fn remove(sel: &Selection) -> usize {
    let count = sel.length();
    sel.remove();
    count
}

/// Rename element tag.
#[inline]
pub fn rename(sel: &Selection, new_tag: &str) {
    sel.rename(new_tag);
}

/// Replace the element with parsed HTML.
#[inline]
pub fn replace_with_html(sel: &Selection, html: &str) {
    sel.replace_with_html(html);
}

/// Append parsed HTML as the last children of the element.
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_class_takes_first_token() {
        let doc = parse(r#"<pre><code class="language-js extra">x</code></pre>"#);
        assert_eq!(first_class(&doc.select("code")), Some("language-js".to_string()));

        let doc = parse("<pre><code>x</code></pre>");
        assert_eq!(first_class(&doc.select("code")), None);
    }

    #[test]
    fn test_has_element_children_ignores_text() {
        let doc = parse(r#"<div id="a">text only</div><div id="b">x <span>y</span></div>"#);
        assert!(!has_element_children(&doc.select("#a")));
        assert!(has_element_children(&doc.select("#b")));
    }

    #[test]
    fn test_remove_counts_elements() {
        let doc = parse(r#"<div><script>1</script><script>2</script><p>keep</p></div>"#);
        assert_eq!(remove(&doc.select("script")), 2);
        assert!(doc.select("script").is_empty());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn test_each_snapshot_survives_replacement() {
        let doc = parse(r#"<p class="x">1</p><p class="x">2</p><p class="x">3</p>"#);
        let items = each(&doc.select("p.x"));
        assert_eq!(items.len(), 3);

        replace_with_html(&items[0], r#"<div class="done">one</div>"#);
        assert_eq!(text_content(&items[1]), "2".into());
        assert_eq!(doc.select("p.x").length(), 2);
        assert!(doc.select("div.done").exists());
    }

    #[test]
    fn test_compile_selector_rejects_garbage() {
        assert!(compile_selector("div > p.note").is_ok());
        assert!(compile_selector("div >>> {").is_err());
    }

    #[test]
    fn test_matches_any() {
        let doc = parse(r#"<section><table><tr><td>x</td></tr></table></section>"#);
        let hit = compile_selector("section td").unwrap_or_else(|e| panic!("{e}"));
        let miss = compile_selector("aside td").unwrap_or_else(|e| panic!("{e}"));
        assert!(matches_any(&doc, &hit));
        assert!(!matches_any(&doc, &miss));
    }

    #[test]
    fn test_link_can_be_repointed() {
        let doc = parse(r#"<link rel="stylesheet" href="a.css" media="screen">"#);
        let link = doc.select("link");

        set_attribute(&link, "href", "b.css");
        remove_attribute(&link, "media");

        assert_eq!(get_attribute(&link, "href"), Some("b.css".to_string()));
        assert_eq!(get_attribute(&link, "media"), None);
    }

    #[test]
    fn test_nobr_renames_to_span() {
        let doc = parse(r#"<p><nobr id="n">a b</nobr></p>"#);
        rename(&doc.select("#n"), "span");
        assert!(doc.select("span#n").exists());
        assert_eq!(tag_name(&doc.select("#n")), Some("span".to_string()));
    }
}
