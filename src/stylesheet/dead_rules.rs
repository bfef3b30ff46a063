//! Dead-rule elimination.
//!
//! Drops every rule whose selector matches nothing in the final document.
//! A handful of selectors are never evaluated: pseudo-elements the matcher
//! cannot see, the per-block highlighter styles, and the `expanded` state
//! class that the accordion script toggles at runtime. Selectors the matcher
//! cannot parse are reported and kept.

use serde::Serialize;
use tracing::{debug, warn};

use super::model::{Rule, Stylesheet};
use crate::dom::{self, Document};

/// Class prefix of the per-block highlighter styles.
pub const HIGHLIGHT_CLASS_PREFIX: &str = ".highlight-";

/// State class added by script, never present in static markup.
pub const DYNAMIC_STATE_MARKER: &str = "expanded";

/// Outcome of checking one selector against the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// At least one element matches.
    Matched,
    /// Nothing matches; the rule is dead.
    Unmatched,
    /// Not evaluated; always kept.
    Exempt,
    /// The matcher rejected the selector; kept.
    Failed(String),
}

impl Verdict {
    #[must_use]
    pub fn keeps_rule(&self) -> bool {
        !matches!(self, Self::Unmatched)
    }
}

/// A selector the matcher could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub selector: String,
    pub reason: String,
}

/// Summary of one elimination pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    /// Rules kept because something matches.
    pub matched: usize,
    /// Rules kept without evaluation.
    pub exempt: usize,
    /// Rules dropped because nothing matches.
    pub removed: usize,
    /// Items dropped for having neither selector nor condition.
    pub malformed: usize,
    /// Rules kept because their selector could not be evaluated.
    pub failures: Vec<RuleFailure>,
}

impl RuleReport {
    fn record(&mut self, selector: &str, verdict: &Verdict) {
        match verdict {
            Verdict::Matched => self.matched += 1,
            Verdict::Exempt => self.exempt += 1,
            Verdict::Unmatched => {
                debug!(selector, "dropping unused rule");
                self.removed += 1;
            }
            Verdict::Failed(reason) => {
                warn!(selector, reason = %reason, "selector evaluation failed, keeping rule");
                self.failures.push(RuleFailure {
                    selector: selector.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }
}

/// True for selectors using `:before`/`:after` (either colon form).
#[must_use]
pub fn has_pseudo_element(selector: &str) -> bool {
    selector.contains(":before") || selector.contains(":after")
}

/// Exemption for top-level plain rules.
#[must_use]
pub fn is_exempt_top_level(selector: &str) -> bool {
    has_pseudo_element(selector)
        || selector.contains(HIGHLIGHT_CLASS_PREFIX)
        || selector.contains(DYNAMIC_STATE_MARKER)
}

/// Exemption for plain rules nested in a conditional group.
#[must_use]
pub fn is_exempt_nested(selector: &str) -> bool {
    has_pseudo_element(selector) || selector.contains(DYNAMIC_STATE_MARKER)
}

/// Check one selector against the document.
#[must_use]
pub fn evaluate(doc: &Document, selector: &str, exempt: fn(&str) -> bool) -> Verdict {
    if exempt(selector) {
        return Verdict::Exempt;
    }
    match dom::compile_selector(selector) {
        Ok(matcher) if dom::matches_any(doc, &matcher) => Verdict::Matched,
        Ok(_) => Verdict::Unmatched,
        Err(reason) => Verdict::Failed(reason),
    }
}

/// Remove dead rules from `sheet` in place.
///
/// Groups are evaluated one level deep: their nested plain rules are
/// checked, anything else nested inside is left alone, and the group itself
/// always survives, even when emptied.
pub fn eliminate_dead_rules(sheet: &mut Stylesheet, doc: &Document) -> RuleReport {
    let mut report = RuleReport::default();

    sheet.rules.retain_mut(|rule| match rule {
        Rule::Group(group) => {
            group.rules.retain(|nested| match nested {
                Rule::Style(style) => {
                    let verdict = evaluate(doc, &style.selector, is_exempt_nested);
                    report.record(&style.selector, &verdict);
                    verdict.keeps_rule()
                }
                Rule::Group(_) | Rule::Opaque(_) => true,
            });
            true
        }
        Rule::Style(style) => {
            let verdict = evaluate(doc, &style.selector, is_exempt_top_level);
            report.record(&style.selector, &verdict);
            verdict.keeps_rule()
        }
        Rule::Opaque(text) => {
            debug!(item = %text.chars().take(40).collect::<String>(), "dropping item without selector");
            report.malformed += 1;
            false
        }
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <section class="api-page"><h2 id="map">Map</h2>
        <table><thead><tr><th>Method</th></tr></thead>
        <tbody><tr id="map-setview"><td><code>setView</code></td></tr></tbody></table>
        </section>
        <div class="accordion"><label>x</label></div>
        </body></html>"#;

    fn run(css: &str) -> (Stylesheet, RuleReport) {
        let doc = dom::parse(PAGE);
        let mut sheet = Stylesheet::parse(css);
        let report = eliminate_dead_rules(&mut sheet, &doc);
        (sheet, report)
    }

    #[test]
    fn keeps_matching_and_drops_unmatched_rules() {
        let (sheet, report) = run(".api-page table td { a: b } .sidebar li { c: d } h2[id] { e: f }");
        assert_eq!(sheet.to_css(), ".api-page table td{a:b}h2[id]{e:f}");
        assert_eq!(report.matched, 2);
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn allow_listed_selectors_survive_without_matches() {
        let css = ".missing:before { a: b } .missing::after { a: b } .highlight-9 .k { a: b } div.accordion.expanded label { a: b }";
        let (sheet, report) = run(css);
        assert_eq!(sheet.rules.len(), 4);
        assert_eq!(report.exempt, 4);
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn groups_are_pruned_but_never_dropped() {
        let css = "@media print { .gone { a: b } section { c: d } .x.expanded { e: f } } @media screen { .gone { a: b } }";
        let (sheet, report) = run(css);
        assert_eq!(
            sheet.to_css(),
            "@media print{section{c:d}.x.expanded{e:f}}@media screen{}"
        );
        assert_eq!(report.removed, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.exempt, 1);
    }

    #[test]
    fn highlight_rules_inside_groups_are_evaluated() {
        let (sheet, _) = run("@media print { .highlight-3 .k { a: b } }");
        assert_eq!(sheet.to_css(), "@media print{}");
    }

    #[test]
    fn items_without_selector_or_condition_are_dropped() {
        let (sheet, report) = run("@charset \"utf-8\"; @font-face { font-family: X } { a: b } section { c: d }");
        assert_eq!(sheet.to_css(), "section{c:d}");
        assert_eq!(report.malformed, 3);
    }

    #[test]
    fn unparseable_selectors_fail_open() {
        let (sheet, report) = run("section >>> td { a: b } .nothing { c: d }");
        assert_eq!(sheet.to_css(), "section >>> td{a:b}");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].selector, "section >>> td");
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn keep_iff_matched_or_allow_listed() {
        let doc = dom::parse(PAGE);
        let cases = [
            ("section", true),
            ("tr#map-setview td", true),
            ("aside", false),
            ("table.other", false),
            ("aside:before", true),
            ("aside .highlight-1", true),
            ("aside.expanded", true),
        ];
        for (selector, keep) in cases {
            let verdict = evaluate(&doc, selector, is_exempt_top_level);
            assert_eq!(verdict.keeps_rule(), keep, "{selector}");
        }
    }
}
