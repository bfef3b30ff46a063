//! Stylesheet model and a forgiving rule-level parser.
//!
//! The parser only understands enough CSS to split a sheet into rules:
//! selectors and declaration blocks, conditional group rules (`@media`,
//! `@supports`, ...) with their nested rules, and everything else as opaque
//! text. Strings, comments, escapes and parentheses are respected so that
//! `url(data:...;base64,...)` values and `content: "}"` do not split rules.

use crate::patterns::{CSS_COMMENT, WHITESPACE_RUN};

/// At-rules whose block holds nested rules under a condition.
const GROUP_AT_RULES: &[&str] = &["media", "supports", "document", "-moz-document", "container"];

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A plain rule: selector list plus declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

/// A conditional group rule such as `@media print { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRule {
    /// The full prelude, e.g. `@media screen and (max-width: 600px)`.
    pub condition: String,
    pub rules: Vec<Rule>,
}

/// One top-level item of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Style(StyleRule),
    Group(GroupRule),
    /// Anything with neither a selector nor a condition: `@font-face`,
    /// `@keyframes`, `@charset`, blocks with an empty selector.
    Opaque(String),
}

impl Rule {
    /// Selector text of a plain rule.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Style(rule) => Some(&rule.selector),
            _ => None,
        }
    }

    /// Condition of a group rule.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::Group(group) => Some(&group.condition),
            _ => None,
        }
    }

    fn write_css(&self, out: &mut String) {
        match self {
            Self::Style(rule) => {
                out.push_str(&rule.selector);
                out.push('{');
                let body: Vec<String> = rule
                    .declarations
                    .iter()
                    .map(|d| format!("{}:{}", d.property, d.value))
                    .collect();
                out.push_str(&body.join(";"));
                out.push('}');
            }
            Self::Group(group) => {
                out.push_str(&group.condition);
                out.push('{');
                for rule in &group.rules {
                    rule.write_css(out);
                }
                out.push('}');
            }
            Self::Opaque(text) => out.push_str(text),
        }
    }
}

/// An ordered sequence of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Parse CSS text. Never fails; unparseable trailing text is dropped.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        Self {
            rules: parse_rules(css),
        }
    }

    /// Serialize back to compact CSS, preserving rule order.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            rule.write_css(&mut out);
        }
        out
    }

    /// Number of plain rules, counting those nested in groups.
    #[must_use]
    pub fn style_rule_count(&self) -> usize {
        fn count(rules: &[Rule]) -> usize {
            rules
                .iter()
                .map(|rule| match rule {
                    Rule::Style(_) => 1,
                    Rule::Group(group) => count(&group.rules),
                    Rule::Opaque(_) => 0,
                })
                .sum()
        }
        count(&self.rules)
    }
}

/// Parse a declaration block body (`color: red; margin: 0`).
#[must_use]
pub fn parse_declarations(body: &str) -> Vec<Declaration> {
    let mut cursor = Cursor::new(body);
    let mut declarations = Vec::new();

    while !cursor.at_end() {
        let (piece, _) = cursor.read_until(b";");
        let piece = CSS_COMMENT.replace_all(piece, "");
        let Some((property, value)) = piece.split_once(':') else {
            continue;
        };
        let property = property.trim();
        if property.is_empty() {
            continue;
        }
        declarations.push(Declaration {
            property: property.to_string(),
            value: WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned(),
        });
    }

    declarations
}

fn parse_rules(css: &str) -> Vec<Rule> {
    let mut cursor = Cursor::new(css);
    let mut rules = Vec::new();

    loop {
        cursor.skip_trivia();
        match cursor.peek() {
            None => break,
            Some(b'}' | b';') => cursor.bump(),
            Some(b'@') => {
                let (prelude, stop) = cursor.read_until(b"{;}");
                let prelude = normalize_prelude(prelude);
                match stop {
                    Some(b'{') => {
                        let body = cursor.read_block();
                        if GROUP_AT_RULES.contains(&at_keyword(&prelude).as_str()) {
                            rules.push(Rule::Group(GroupRule {
                                condition: prelude,
                                rules: parse_rules(body),
                            }));
                        } else {
                            rules.push(Rule::Opaque(format!("{prelude}{{{}}}", body.trim())));
                        }
                    }
                    _ => rules.push(Rule::Opaque(format!("{prelude};"))),
                }
            }
            Some(_) => {
                let (prelude, stop) = cursor.read_until(b"{}");
                if stop != Some(b'{') {
                    continue;
                }
                let body = cursor.read_block();
                let selector = normalize_prelude(prelude);
                if selector.is_empty() {
                    rules.push(Rule::Opaque(format!("{{{}}}", body.trim())));
                } else {
                    rules.push(Rule::Style(StyleRule {
                        selector,
                        declarations: parse_declarations(body),
                    }));
                }
            }
        }
    }

    rules
}

/// Strip comments and collapse whitespace in a selector or at-rule prelude.
fn normalize_prelude(prelude: &str) -> String {
    let without_comments = CSS_COMMENT.replace_all(prelude, "");
    WHITESPACE_RUN
        .replace_all(without_comments.trim(), " ")
        .into_owned()
}

/// `@media screen` -> `media`
fn at_keyword(prelude: &str) -> String {
    prelude
        .trim_start_matches('@')
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Byte cursor over CSS text.
///
/// Every byte the cursor stops on is ASCII, so slicing at its positions
/// always lands on a UTF-8 boundary.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    /// Skip whitespace, comments and the legacy `<!--` / `-->` markers.
    fn skip_trivia(&mut self) {
        loop {
            if self.starts_with("/*") {
                self.skip_comment();
            } else if self.starts_with("<!--") {
                self.pos += 4;
            } else if self.starts_with("-->") {
                self.pos += 3;
            } else if self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        self.pos += 2;
        match self.src[self.pos..].find("*/") {
            Some(end) => self.pos += end + 2,
            None => self.pos = self.src.len(),
        }
    }

    /// Skip a backslash and the whole character it escapes.
    fn skip_escape(&mut self) {
        self.bump();
        if let Some(c) = self.src.get(self.pos..).and_then(|rest| rest.chars().next()) {
            self.pos += c.len_utf8();
        }
    }

    fn skip_string(&mut self, quote: u8) {
        self.bump();
        while let Some(b) = self.peek() {
            self.bump();
            if b == b'\\' {
                self.bump();
            } else if b == quote || b == b'\n' {
                break;
            }
        }
    }

    /// Read up to (and consume) the first top-level byte from `stops`.
    ///
    /// Returns the text before the stop byte and the stop byte itself, or
    /// `None` when the input ran out first.
    fn read_until(&mut self, stops: &[u8]) -> (&'a str, Option<u8>) {
        let start = self.pos;
        let mut parens = 0usize;

        while let Some(b) = self.peek() {
            match b {
                b'"' | b'\'' => {
                    self.skip_string(b);
                    continue;
                }
                b'\\' => {
                    self.skip_escape();
                    continue;
                }
                b'/' if self.starts_with("/*") => {
                    self.skip_comment();
                    continue;
                }
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                _ if parens == 0 && stops.contains(&b) => {
                    let text = &self.src[start..self.pos];
                    self.bump();
                    return (text, Some(b));
                }
                _ => {}
            }
            self.bump();
        }

        self.pos = self.pos.min(self.src.len());
        (&self.src[start..], None)
    }

    /// Read a block body after its `{`, consuming the matching `}`.
    fn read_block(&mut self) -> &'a str {
        let start = self.pos;
        let mut depth = 1usize;

        while let Some(b) = self.peek() {
            match b {
                b'"' | b'\'' => {
                    self.skip_string(b);
                    continue;
                }
                b'\\' => {
                    self.skip_escape();
                    continue;
                }
                b'/' if self.starts_with("/*") => {
                    self.skip_comment();
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = &self.src[start..self.pos];
                        self.bump();
                        return body;
                    }
                }
                _ => {}
            }
            self.bump();
        }

        self.pos = self.pos.min(self.src.len());
        &self.src[start..]
    }
}
