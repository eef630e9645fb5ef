//! Counters collected while rewriting.

use std::ops::AddAssign;

use serde::Serialize;

/// What a rewrite did to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Tokens wrapped in backticks
    pub wrapped: usize,

    /// Void elements rewritten to self-closing form
    pub normalized: usize,

    /// Brace tokens left alone because they look like `key: value` code
    pub ambiguous_braces: usize,

    /// Lines kept verbatim because rewriting would have turned them into a
    /// fence marker
    pub reverted_lines: usize,

    /// Line of a fence opener that was never closed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unclosed_fence: Option<usize>,
}

impl RewriteStats {
    /// Total number of substitutions made.
    pub fn substitutions(&self) -> usize {
        self.wrapped + self.normalized
    }
}

impl AddAssign for RewriteStats {
    fn add_assign(&mut self, other: Self) {
        self.wrapped += other.wrapped;
        self.normalized += other.normalized;
        self.ambiguous_braces += other.ambiguous_braces;
        self.reverted_lines += other.reverted_lines;
        // Per-document only; an aggregate has no single line to point at.
        self.unclosed_fence = None;
    }
}
