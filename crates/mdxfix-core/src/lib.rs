//! Region-aware rewriting of Markdown and MDX documents.
//!
//! Text that an MDX renderer would read as markup (template tokens, bare
//! placeholders, unclosed void elements) is wrapped in inline code or
//! normalized. Front matter, fenced code and inline code are never touched.

pub mod fence;
pub mod frontmatter;
pub mod rewriter;
pub mod rules;
pub mod span;
pub mod stats;

pub use fence::{classify, Classifier, FenceChar, FenceState, Line, LineKind};
pub use frontmatter::{split_front_matter, Document};
pub use rewriter::{rewrite, Rewrite, Rewriter};
pub use rules::{PlaceholderMode, RuleConfig, RuleError, RuleKind, RuleSet, DEFAULT_PLACEHOLDERS};
pub use span::{split_spans, Span, SpanKind};
pub use stats::RewriteStats;
