//! Code sample highlighting.
//!
//! Raw `<pre><code>` blocks are re-rendered with `syntect` into classed
//! spans. Each block gets its own scope class `highlight-N` and a matching
//! `<style>` child, which the stylesheet consolidator later absorbs.

use serde::Serialize;
use syntect::escape::Escape;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::{debug, info, warn};

use crate::dom::{self, Document};
use crate::patterns::CSS_RULE_SHAPE;
use crate::stylesheet::compact::compact_css;
use crate::stylesheet::{Rule, StyleRule, Stylesheet};

/// Selector for the blocks the highlighter considers.
pub const CODE_BLOCKS: &str = "pre > code";

/// Class tokens that opt a block out of language lookup.
const NO_HINT_TOKENS: &[&str] = &["none", "nohighlight"];

/// Substrings that mark a sample as JavaScript when nothing else matched.
const SCRIPT_MARKERS: &[&str] = &["L.", "var ", "let ", "const ", "function", "=>", ");"];

/// How a block's lexer was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "syntax")]
pub enum LexerSource {
    /// Looked up from the block's language hint.
    Named(String),
    /// Guessed from the sample text.
    Detected(String),
    /// Nothing matched; rendered as escaped text.
    PlainText,
}

/// Summary of one highlighting pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    /// Blocks re-rendered.
    pub highlighted: usize,
    /// Blocks left alone because they already hold markup.
    pub skipped: usize,
    /// Blocks whose hint resolved to a syntax.
    pub named: usize,
    /// Blocks whose syntax was guessed.
    pub detected: usize,
    /// Blocks rendered as plain text.
    pub plain_text: usize,
    /// Hints that did not name a known syntax.
    pub unknown_hints: Vec<String>,
}

/// Syntax definitions plus the theme's rules, loaded once per run.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme_rules: Vec<StyleRule>,
}

impl Highlighter {
    /// Load the bundled syntaxes and the named theme.
    ///
    /// Unknown theme names fall back to an empty theme, which yields
    /// unstyled but still scoped markup.
    #[must_use]
    pub fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(theme_name).unwrap_or_else(|| {
            warn!(theme = theme_name, "unknown highlight theme, using defaults");
            Theme::default()
        });
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme_rules: theme_rules(&theme),
        }
    }

    /// Pick a syntax for a sample. Never fails.
    ///
    /// Named lookup first, then detection from the text, then plain text.
    #[must_use]
    pub fn resolve(&self, hint: Option<&str>, code: &str) -> (&SyntaxReference, LexerSource) {
        if let Some(syntax) = hint.and_then(|h| self.syntaxes.find_syntax_by_token(h)) {
            return (syntax, LexerSource::Named(syntax.name.clone()));
        }
        if let Some(syntax) = self.detect(code) {
            return (syntax, LexerSource::Detected(syntax.name.clone()));
        }
        (self.syntaxes.find_syntax_plain_text(), LexerSource::PlainText)
    }

    fn detect(&self, code: &str) -> Option<&SyntaxReference> {
        let first_line = code.lines().find(|line| !line.trim().is_empty())?;
        self.syntaxes
            .find_syntax_by_first_line(first_line)
            .or_else(|| guess_token(code).and_then(|t| self.syntaxes.find_syntax_by_token(t)))
    }

    /// Render a sample into a `<code class="highlight-N">` fragment.
    ///
    /// Line breaks become `<br>`; trailing blank lines are dropped.
    #[must_use]
    pub fn render(&self, code: &str, syntax: &SyntaxReference, index: usize) -> String {
        let code = code.replace("\r\n", "\n");
        let code = code.trim_end_matches('\n');
        let body = self.classed_html(code, syntax).unwrap_or_else(|e| {
            warn!(index, error = %e, "highlighting failed, escaping sample");
            Escape(code).to_string()
        });
        let body = body.trim_end_matches('\n').replace('\n', "<br>");
        format!(r#"<code class="{}">{body}</code>"#, scope_class(index))
    }

    fn classed_html(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    /// The theme's rules scoped under `.highlight-N`, compacted.
    #[must_use]
    pub fn scoped_css(&self, index: usize) -> String {
        let scope = format!(".{}", scope_class(index));
        let sheet = Stylesheet {
            rules: self
                .theme_rules
                .iter()
                .map(|rule| {
                    Rule::Style(StyleRule {
                        selector: scope_selector(&rule.selector, &scope),
                        declarations: rule.declarations.clone(),
                    })
                })
                .collect(),
        };
        compact_css(&sheet.to_css())
    }
}

/// Class carried by the `index`-th block.
#[must_use]
pub fn scope_class(index: usize) -> String {
    format!("highlight-{index}")
}

/// Language hint from a block's first class token.
///
/// `language-js` and `JS` both give `js`; `none` and `nohighlight` give nothing.
#[must_use]
pub fn language_hint(first_class: Option<&str>) -> Option<String> {
    let token = first_class?.trim().to_lowercase();
    let hint = token.strip_prefix("language-").unwrap_or(&token);
    if hint.is_empty() || NO_HINT_TOKENS.contains(&hint) {
        None
    } else {
        Some(hint.to_string())
    }
}

/// Cheap content sniffing for samples the first-line matchers miss.
fn guess_token(code: &str) -> Option<&'static str> {
    let trimmed = code.trim_start();
    if trimmed.starts_with('<') {
        return Some("html");
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return Some("json");
    }
    if CSS_RULE_SHAPE.is_match(code) {
        return Some("css");
    }
    SCRIPT_MARKERS
        .iter()
        .any(|marker| code.contains(marker))
        .then_some("js")
}

/// Theme rules without any background declarations.
fn theme_rules(theme: &Theme) -> Vec<StyleRule> {
    let css = match css_for_theme_with_class_style(theme, ClassStyle::Spaced) {
        Ok(css) => css,
        Err(e) => {
            warn!(error = %e, "could not generate theme styles");
            return Vec::new();
        }
    };
    Stylesheet::parse(&css)
        .rules
        .into_iter()
        .filter_map(|rule| match rule {
            Rule::Style(mut style) => {
                style
                    .declarations
                    .retain(|d| !d.property.to_ascii_lowercase().starts_with("background"));
                (!style.declarations.is_empty()).then_some(style)
            }
            Rule::Group(_) | Rule::Opaque(_) => None,
        })
        .collect()
}

/// Put every part of a selector list under `scope`.
///
/// The generator's root class `.code` becomes the scope itself.
fn scope_selector(selector: &str, scope: &str) -> String {
    selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part == ".code" {
                scope.to_string()
            } else {
                format!("{scope} {part}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Re-render every raw code block of `doc` in place.
///
/// Indices are assigned once over all matched blocks, skipped ones included,
/// so numbering does not shift while the tree is being rewritten.
pub fn highlight_code_blocks(doc: &Document, highlighter: &Highlighter) -> HighlightReport {
    let mut report = HighlightReport::default();

    for (position, block) in dom::each(&doc.select(CODE_BLOCKS)).into_iter().enumerate() {
        let index = position + 1;
        if dom::has_element_children(&block) {
            debug!(index, "code block holds markup, leaving it alone");
            report.skipped += 1;
            continue;
        }

        let hint = language_hint(dom::first_class(&block).as_deref());
        let code = dom::text_content(&block);
        let (syntax, source) = highlighter.resolve(hint.as_deref(), &code);
        match &source {
            LexerSource::Named(_) => report.named += 1,
            LexerSource::Detected(_) => report.detected += 1,
            LexerSource::PlainText => report.plain_text += 1,
        }
        if let Some(hint) = hint.filter(|_| !matches!(source, LexerSource::Named(_))) {
            debug!(index, hint = %hint, "no syntax for language hint");
            if !report.unknown_hints.contains(&hint) {
                report.unknown_hints.push(hint);
            }
        }
        debug!(index, source = ?source, "highlighting code block");

        dom::replace_with_html(&block, &highlighter.render(&code, syntax, index));
        let root = doc.select(&format!("{CODE_BLOCKS}.{}", scope_class(index)));
        dom::append_html(&root, &format!("<style>{}</style>", highlighter.scoped_css(index)));
        report.highlighted += 1;
    }

    info!(
        highlighted = report.highlighted,
        skipped = report.skipped,
        plain_text = report.plain_text,
        "code blocks highlighted"
    );
    report
}
