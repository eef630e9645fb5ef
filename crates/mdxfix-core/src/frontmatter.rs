//! Front matter isolation.
//!
//! A leading YAML block is carried through a rewrite untouched, so the
//! splitter only has to find where it ends. Nothing inside it is parsed.

/// A document split into its front matter and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    /// Front matter block including both `---` lines and the trailing newline,
    /// or empty when the document has none
    pub front_matter: &'a str,

    /// Everything after the front matter
    pub body: &'a str,
}

impl Document<'_> {
    /// Check if the document starts with a front matter block.
    pub fn has_front_matter(&self) -> bool {
        !self.front_matter.is_empty()
    }
}

/// Split a leading front matter block off the source text.
///
/// The opener must be `---` at byte 0 followed by a newline. The closing `---`
/// must sit alone on a later line, and cannot be the line directly after the
/// opener. A document without a complete block is returned whole as the body.
pub fn split_front_matter(source: &str) -> Document<'_> {
    let unsplit = Document {
        front_matter: "",
        body: source,
    };

    let Some(after_open) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return unsplit;
    };

    let mut offset = source.len() - after_open.len();
    let mut rest = after_open;
    let mut first = true;

    while !rest.is_empty() {
        let line_len = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        let line = &rest[..line_len];
        offset += line_len;

        if !first && is_delimiter(line) {
            return Document {
                front_matter: &source[..offset],
                body: &source[offset..],
            };
        }

        first = false;
        rest = &rest[line_len..];
    }

    unsplit
}

fn is_delimiter(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line == "---"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_valid_front_matter() {
        let source = r#"---
title: Button
description: A clickable button component
---

# Button Component
"#;

        let doc = split_front_matter(source);

        assert!(doc.has_front_matter());
        assert_eq!(
            doc.front_matter,
            "---\ntitle: Button\ndescription: A clickable button component\n---\n"
        );
        assert_eq!(doc.body, "\n# Button Component\n");
    }

    #[test]
    fn handles_no_front_matter() {
        let source = "# Just Markdown\n\nNo front matter here.";

        let doc = split_front_matter(source);

        assert!(!doc.has_front_matter());
        assert_eq!(doc.body, source);
    }

    #[test]
    fn leaves_unclosed_block_in_body() {
        let source = "---\ntitle: Test\n# No closing";

        let doc = split_front_matter(source);

        assert_eq!(doc.front_matter, "");
        assert_eq!(doc.body, source);
    }

    #[test]
    fn requires_block_at_start() {
        let source = "\n---\ntitle: Test\n---\n";

        assert_eq!(split_front_matter(source).body, source);
    }

    #[test]
    fn closing_line_must_be_standalone() {
        let source = "---\ntitle: x\n----\nbody\n---\nrest";

        let doc = split_front_matter(source);

        assert_eq!(doc.front_matter, "---\ntitle: x\n----\nbody\n---\n");
        assert_eq!(doc.body, "rest");
    }

    #[test]
    fn accepts_closing_at_end_of_text() {
        let doc = split_front_matter("---\ntitle: x\n---");

        assert_eq!(doc.front_matter, "---\ntitle: x\n---");
        assert_eq!(doc.body, "");
    }

    #[test]
    fn keeps_crlf_block_intact() {
        let source = "---\r\ntitle: x\r\n---\r\nHello {name}\r\n";

        let doc = split_front_matter(source);

        assert_eq!(doc.front_matter, "---\r\ntitle: x\r\n---\r\n");
        assert_eq!(doc.body, "Hello {name}\r\n");
    }

    #[test]
    fn empty_yaml_needs_a_content_line() {
        assert_eq!(split_front_matter("---\n---\nbody").front_matter, "");
        assert_eq!(
            split_front_matter("---\n\n---\nbody").front_matter,
            "---\n\n---\n"
        );
    }
}
