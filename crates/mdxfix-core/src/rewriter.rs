//! Document rewriter.
//!
//! Front matter, fence markers and fenced lines are copied through byte for
//! byte. Every other line is split into spans and only its prose spans go
//! through the rule set.

use std::borrow::Cow;

use crate::fence::{classify, fence_marker, Line};
use crate::frontmatter::split_front_matter;
use crate::rules::RuleSet;
use crate::span::split_spans;
use crate::stats::RewriteStats;

/// Output of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Rewritten document text
    pub text: String,

    pub stats: RewriteStats,
}

impl Rewrite {
    /// Check if the rewrite differs from the input it was produced from.
    pub fn is_changed(&self, input: &str) -> bool {
        self.text != input
    }
}

/// Applies a rule set to whole documents.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: RuleSet,
}

impl Rewriter {
    /// Create a rewriter for the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Rewrite a document.
    pub fn rewrite(&self, source: &str) -> Rewrite {
        let doc = split_front_matter(source);
        let mut stats = RewriteStats::default();

        let mut text = String::with_capacity(source.len() + 16);
        text.push_str(doc.front_matter);

        let mut lines = classify(doc.body);
        for line in lines.by_ref() {
            if line.is_fenced() {
                text.push_str(line.content);
            } else {
                text.push_str(&self.rewrite_line(&line, &mut stats));
            }
            text.push_str(line.terminator);
        }

        let offset = doc.front_matter.lines().count();
        stats.unclosed_fence = lines.unclosed_fence().map(|line| line + offset);

        Rewrite { text, stats }
    }

    fn rewrite_line<'a>(&self, line: &Line<'a>, stats: &mut RewriteStats) -> Cow<'a, str> {
        let mut line_stats = RewriteStats::default();
        let mut changed = false;

        let spans: Vec<Cow<'a, str>> = split_spans(line.content)
            .map(|span| {
                if !span.is_prose() {
                    return Cow::Borrowed(span.text);
                }
                let out = self.rules.apply_to_prose(span.text, &mut line_stats);
                changed |= matches!(out, Cow::Owned(_));
                out
            })
            .collect();

        // Declined matches still count even when the line is unchanged.
        stats.ambiguous_braces += line_stats.ambiguous_braces;

        if !changed {
            return Cow::Borrowed(line.content);
        }

        let rewritten = spans.join("`");

        // Wrapping right after a pair of backticks can produce a new fence
        // marker, which would swallow the rest of the document next time.
        if fence_marker(&rewritten).is_some() {
            stats.reverted_lines += 1;
            return Cow::Borrowed(line.content);
        }

        stats.wrapped += line_stats.wrapped;
        stats.normalized += line_stats.normalized;

        Cow::Owned(rewritten)
    }
}

/// Rewrite a document with the default rules.
pub fn rewrite(source: &str) -> String {
    Rewriter::default().rewrite(source).text
}
