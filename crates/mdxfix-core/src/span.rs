//! Inline code span splitting.
//!
//! A line outside fences is cut on every backtick. Segments alternate between
//! prose and inline code, starting with prose. This is lexical only: a line
//! with an odd number of backticks leaves its last segment classified as
//! inline code, so text after an unpaired backtick is never rewritten.

/// Region a span belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Prose,
    InlineCode,
}

/// A segment of a line between backticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub text: &'a str,
}

impl Span<'_> {
    /// Check if this span is eligible for rewriting.
    pub fn is_prose(&self) -> bool {
        self.kind == SpanKind::Prose
    }
}

/// Split a line into alternating prose and inline code spans.
///
/// Joining the span texts with a backtick reproduces the line exactly.
pub fn split_spans(line: &str) -> impl Iterator<Item = Span<'_>> {
    line.split('`').enumerate().map(|(index, text)| Span {
        kind: if index % 2 == 0 {
            SpanKind::Prose
        } else {
            SpanKind::InlineCode
        },
        text,
    })
}
