//! Fenced code block tracking.
//!
//! Lines are classified one at a time by a small state machine. A run of three
//! or more backticks or tildes at the start of a line (after indentation) is a
//! fence marker. Markers open a fence from the outside, and close it only when
//! they use the same character as the opener.

/// Character used to build a fence marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceChar {
    Backtick,
    Tilde,
}

impl FenceChar {
    /// Map a character to a fence delimiter.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '`' => Some(Self::Backtick),
            '~' => Some(Self::Tilde),
            _ => None,
        }
    }
}

/// A fence marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMarker {
    pub delimiter: FenceChar,

    /// Length of the delimiter run (at least 3)
    pub len: usize,
}

/// Detect a fence marker at the start of a line.
///
/// Leading whitespace is ignored and anything after the run (an info string,
/// or more text) is allowed.
pub fn fence_marker(line: &str) -> Option<FenceMarker> {
    let trimmed = line.trim_start();
    let first = trimmed.chars().next()?;
    let delimiter = FenceChar::from_char(first)?;
    let len = trimmed.chars().take_while(|&c| c == first).count();

    (len >= 3).then_some(FenceMarker { delimiter, len })
}

/// Whether the classifier is currently inside a fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FenceState {
    #[default]
    Outside,
    InFence {
        delimiter: FenceChar,

        /// Length of the opening run. Closing markers may be any length.
        opening_len: usize,
    },
}

impl FenceState {
    /// Check if this state is inside a fence.
    pub fn is_fenced(&self) -> bool {
        matches!(self, Self::InFence { .. })
    }

    /// Advance the state over one line.
    ///
    /// Returns the next state and whether the line was a fence marker. A
    /// marker with the other delimiter inside a fence is still a marker but
    /// leaves the state unchanged.
    pub fn transition(self, line: &str) -> (Self, bool) {
        let Some(marker) = fence_marker(line) else {
            return (self, false);
        };

        let next = match self {
            Self::Outside => Self::InFence {
                delimiter: marker.delimiter,
                opening_len: marker.len,
            },
            Self::InFence { delimiter, .. } if delimiter == marker.delimiter => Self::Outside,
            inside => inside,
        };

        (next, true)
    }
}

/// How a line takes part in rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A fence marker line, opening, closing or neither
    FenceMarker,
    /// Inside a fenced block
    Fenced,
    /// Outside any fence; candidate for rewriting
    Open,
}

/// A classified line of a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line number within the classified text (1-indexed)
    pub number: usize,

    /// Line content without its terminator
    pub content: &'a str,

    /// `"\n"`, `"\r\n"`, or empty for a final unterminated line
    pub terminator: &'a str,

    /// Fence state before this line was visited
    pub before: FenceState,

    /// Fence state after this line was visited
    pub after: FenceState,

    pub kind: LineKind,
}

impl Line<'_> {
    /// Check if this line must be passed through verbatim.
    pub fn is_fenced(&self) -> bool {
        self.kind != LineKind::Open
    }
}

/// Lazy line classifier over a document body.
///
/// Classification of a line depends only on the lines before it, so a fresh
/// classifier over the same text always yields the same sequence.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    rest: &'a str,
    state: FenceState,
    number: usize,
    opened_at: Option<usize>,
}

/// Classify the lines of a document body.
pub fn classify(body: &str) -> Classifier<'_> {
    Classifier {
        rest: body,
        state: FenceState::Outside,
        number: 0,
        opened_at: None,
    }
}

impl<'a> Classifier<'a> {
    /// Line number of the opener of a fence that is still open.
    ///
    /// Once iteration has finished, this is the fence that never closed. All
    /// lines after it were classified as fenced.
    pub fn unclosed_fence(&self) -> Option<usize> {
        self.state.is_fenced().then_some(self.opened_at).flatten()
    }

    fn next_raw_line(&mut self) -> Option<(&'a str, &'a str)> {
        if self.rest.is_empty() {
            return None;
        }

        let (line, rest) = match self.rest.find('\n') {
            Some(i) => self.rest.split_at(i + 1),
            None => (self.rest, ""),
        };
        self.rest = rest;

        let split = if line.ends_with("\r\n") {
            line.len() - 2
        } else if line.ends_with('\n') {
            line.len() - 1
        } else {
            line.len()
        };

        Some(line.split_at(split))
    }
}

impl<'a> Iterator for Classifier<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (content, terminator) = self.next_raw_line()?;
        self.number += 1;

        let before = self.state;
        let (after, is_marker) = before.transition(content);

        let kind = if is_marker {
            LineKind::FenceMarker
        } else if before.is_fenced() {
            LineKind::Fenced
        } else {
            LineKind::Open
        };

        if !before.is_fenced() && after.is_fenced() {
            self.opened_at = Some(self.number);
        }
        self.state = after;

        Some(Line {
            number: self.number,
            content,
            terminator,
            before,
            after,
            kind,
        })
    }
}
