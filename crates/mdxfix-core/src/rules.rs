//! Prose rewrite rules.
//!
//! Rules run in a fixed order, most specific first. Each rule only scans text
//! that no earlier rule has produced, so `{{version}}` is wrapped whole and the
//! single-brace rule never sees the `{version}` inside it.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::stats::RewriteStats;

/// Placeholders wrapped by default when they appear in prose.
pub const DEFAULT_PLACEHOLDERS: [&str; 5] = [
    "<YOUR_API_KEY>",
    "<access_token>",
    "</id>",
    "</cli>",
    "</dir>",
];

/// HTML element names the generic placeholder pattern must not touch: the
/// current element index, `svg` and `math`, and legacy tags still seen in docs.
const HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "label", "legend", "li", "link", "main", "map", "mark", "math", "menu", "meta",
    "meter", "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "picture",
    "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search", "section",
    "select", "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup",
    "svg", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time",
    "title", "tr", "track", "u", "ul", "var", "video", "wbr",
    // legacy
    "acronym", "applet", "basefont", "big", "blink", "center", "dir", "font", "frame",
    "frameset", "keygen", "marquee", "menuitem", "nobr", "noembed", "noframes", "param",
    "plaintext", "rb", "rtc", "strike", "tt", "xmp",
];

static DOUBLE_CURLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}\n]+\}\}").expect("Invalid double curly regex"));

static PERCENT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*[^%\n]+\s*%\}").expect("Invalid percent tag regex"));

static SINGLE_CURLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[A-Za-z0-9_.:\-\s]{1,80}\}").expect("Invalid single curly regex")
});

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]\s*:").expect("Invalid key value regex"));

static GENERIC_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?([A-Za-z0-9_\-]+)>").expect("Invalid placeholder regex"));

static VOID_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(br|hr)\s*>").expect("Invalid void element regex"));

/// How angle-bracket placeholders are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderMode {
    /// Wrap only the configured literals
    #[default]
    Literal,
    /// Wrap the literals, then any `<token>` or `</token>` that is not an
    /// HTML element name
    Generic,
    /// Never wrap angle brackets
    Off,
}

/// Rule selection, as read from the `[rules]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Wrap `{{ ... }}` template tokens
    pub double_curly: bool,

    /// Wrap `{% ... %}` tags
    pub percent_tags: bool,

    /// Wrap short `{token}` expressions
    pub single_curly: bool,

    /// Rewrite `<br>` and `<hr>` to self-closing form
    pub void_elements: bool,

    pub placeholders: PlaceholderMode,

    /// Exact placeholder strings to wrap
    pub placeholder_literals: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            double_curly: true,
            percent_tags: true,
            single_curly: true,
            void_elements: true,
            placeholders: PlaceholderMode::Literal,
            placeholder_literals: DEFAULT_PLACEHOLDERS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Identifies a rule in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleKind {
    DoubleCurly,
    PercentTag,
    SingleCurly,
    PlaceholderLiteral,
    GenericPlaceholder,
    VoidElement,
}

impl RuleKind {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DoubleCurly => "double-curly",
            Self::PercentTag => "percent-tag",
            Self::SingleCurly => "single-curly",
            Self::PlaceholderLiteral => "placeholder-literal",
            Self::GenericPlaceholder => "generic-placeholder",
            Self::VoidElement => "void-element",
        }
    }
}

/// A pattern and what to do with its matches.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    pattern: Regex,
}

impl Rule {
    fn new(kind: RuleKind, pattern: &Regex) -> Self {
        Self {
            kind,
            pattern: pattern.clone(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Replacement text for a match, or `None` when the match is declined.
    fn replace(&self, matched: &str, stats: &mut RewriteStats) -> Option<String> {
        match self.kind {
            RuleKind::SingleCurly if KEY_VALUE.is_match(matched) => {
                stats.ambiguous_braces += 1;
                None
            }
            RuleKind::GenericPlaceholder if is_html_element(matched) => None,
            RuleKind::VoidElement => {
                stats.normalized += 1;
                let name = if matched.get(1..2).is_some_and(|c| c.eq_ignore_ascii_case("b")) {
                    "br"
                } else {
                    "hr"
                };
                Some(format!("<{} />", name))
            }
            _ => {
                stats.wrapped += 1;
                Some(format!("`{}`", matched))
            }
        }
    }

    /// Split open text around accepted matches. Returns true if anything
    /// was replaced.
    fn split_into<'a>(
        &self,
        text: &'a str,
        out: &mut Vec<Piece<'a>>,
        stats: &mut RewriteStats,
    ) -> bool {
        let mut last = 0;

        for m in self.pattern.find_iter(text) {
            let Some(replacement) = self.replace(m.as_str(), stats) else {
                continue;
            };

            if m.start() > last {
                out.push(Piece::Open(&text[last..m.start()]));
            }
            out.push(Piece::Done(replacement));
            last = m.end();
        }

        if last < text.len() {
            out.push(Piece::Open(&text[last..]));
        }

        last > 0
    }
}

fn is_html_element(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('<')
        .trim_start_matches('/')
        .trim_end_matches('>');
    HTML_ELEMENTS
        .iter()
        .any(|element| element.eq_ignore_ascii_case(name))
}

/// A fragment of a prose span during rule application.
#[derive(Debug)]
enum Piece<'a> {
    /// Original text, still open to later rules
    Open(&'a str),
    /// Output of a rule, never rescanned
    Done(String),
}

impl Piece<'_> {
    fn as_str(&self) -> &str {
        match self {
            Piece::Open(text) => text,
            Piece::Done(text) => text,
        }
    }
}

/// Errors that can occur when building a rule set.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Ordered rules applied to prose spans.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_config(&RuleConfig::default()).expect("default placeholder literals are valid")
    }
}

impl RuleSet {
    /// Build the rules enabled in a config, in precedence order.
    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleError> {
        let mut rules = Vec::new();

        if config.double_curly {
            rules.push(Rule::new(RuleKind::DoubleCurly, &DOUBLE_CURLY));
        }
        if config.percent_tags {
            rules.push(Rule::new(RuleKind::PercentTag, &PERCENT_TAG));
        }
        if config.single_curly {
            rules.push(Rule::new(RuleKind::SingleCurly, &SINGLE_CURLY));
        }

        if config.placeholders != PlaceholderMode::Off {
            if let Some(pattern) = literal_pattern(&config.placeholder_literals)? {
                rules.push(Rule::new(RuleKind::PlaceholderLiteral, &pattern));
            }
        }
        if config.placeholders == PlaceholderMode::Generic {
            rules.push(Rule::new(RuleKind::GenericPlaceholder, &GENERIC_PLACEHOLDER));
        }

        if config.void_elements {
            rules.push(Rule::new(RuleKind::VoidElement, &VOID_ELEMENT));
        }

        Ok(Self { rules })
    }

    /// Rules in the order they are applied.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to one prose span.
    ///
    /// Returns the input borrowed when nothing matched.
    pub fn apply_to_prose<'a>(&self, span: &'a str, stats: &mut RewriteStats) -> Cow<'a, str> {
        if span.is_empty() {
            return Cow::Borrowed(span);
        }

        let mut pieces = vec![Piece::Open(span)];
        let mut replaced = false;

        for rule in &self.rules {
            let mut next = Vec::with_capacity(pieces.len());

            for piece in pieces {
                match piece {
                    Piece::Open(text) => replaced |= rule.split_into(text, &mut next, stats),
                    done => next.push(done),
                }
            }

            pieces = next;
        }

        if !replaced {
            return Cow::Borrowed(span);
        }

        Cow::Owned(pieces.iter().map(Piece::as_str).collect())
    }
}

/// Alternation of escaped literals, longest first so overlapping literals
/// prefer the longer match.
fn literal_pattern(literals: &[String]) -> Result<Option<Regex>, RuleError> {
    let mut literals: Vec<&str> = literals
        .iter()
        .map(String::as_str)
        .filter(|l| !l.is_empty())
        .collect();

    if literals.is_empty() {
        return Ok(None);
    }

    literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    literals.dedup();

    let alternation = literals
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|");

    Ok(Some(Regex::new(&alternation)?))
}
