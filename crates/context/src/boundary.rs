//! Segment boundary detection.
//!
//! A document is cut at blank lines (paragraph breaks) and before Markdown
//! headings (`#` to `######` at line start followed by whitespace). Paragraph
//! boundaries consume the blank run; heading boundaries are zero-width so
//! the heading stays with the text that follows it.
//!
//! Two interchangeable detectors produce identical boundaries:
//! [`RegexBoundaryDetector`] and the dependency-free [`ScanBoundaryDetector`].

use regex::Regex;
use std::sync::LazyLock;

/// Paragraph break or heading start, matched with multi-line anchors.
static BOUNDARY_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)\n\s*\n|^#{1,6}\s").ok());

const MAX_HEADING_LEVEL: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Paragraph,
    Heading,
}

/// A cut point in byte offsets. `start == end` for headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub kind: BoundaryKind,
    pub start: usize,
    pub end: usize,
}

impl Boundary {
    fn paragraph(start: usize, end: usize) -> Self {
        Self {
            kind: BoundaryKind::Paragraph,
            start,
            end,
        }
    }

    fn heading(at: usize) -> Self {
        Self {
            kind: BoundaryKind::Heading,
            start: at,
            end: at,
        }
    }
}

/// Finds segment boundaries in a document, in ascending order.
pub trait BoundaryDetector: Send + Sync {
    fn boundaries(&self, text: &str) -> Vec<Boundary>;
}

/// Regex-backed detector. Falls back to [`ScanBoundaryDetector`] if the
/// pattern is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexBoundaryDetector;

impl BoundaryDetector for RegexBoundaryDetector {
    fn boundaries(&self, text: &str) -> Vec<Boundary> {
        let Some(re) = BOUNDARY_RE.as_ref() else {
            tracing::warn!("Boundary regex failed to compile, using line scanner");
            return ScanBoundaryDetector.boundaries(text);
        };

        let mut boundaries = Vec::new();
        let mut at = 0;
        while let Some(m) = re.find_at(text, at) {
            if m.as_str().starts_with('#') {
                boundaries.push(Boundary::heading(m.start()));
                at = m.start() + 1;
            } else {
                boundaries.push(Boundary::paragraph(m.start(), m.end()));
                at = m.end();
            }
        }
        boundaries
    }
}

/// Hand-rolled single-pass line scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanBoundaryDetector;

impl ScanBoundaryDetector {
    /// End of a blank-line run starting with the `\n` at `pos`, if any: one
    /// past the last newline inside the whitespace that follows.
    fn paragraph_end(text: &str, pos: usize) -> Option<usize> {
        let mut end = None;
        for (offset, c) in text[pos + 1..].char_indices() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                end = Some(pos + 1 + offset + 1);
            }
        }
        end
    }

    fn is_heading_at(text: &str, pos: usize) -> bool {
        let at_line_start = pos == 0 || text.as_bytes()[pos - 1] == b'\n';
        if !at_line_start {
            return false;
        }
        let rest = &text[pos..];
        let hashes = rest.bytes().take_while(|b| *b == b'#').count();
        if hashes == 0 || hashes > MAX_HEADING_LEVEL {
            return false;
        }
        rest[hashes..].chars().next().is_some_and(char::is_whitespace)
    }
}

impl BoundaryDetector for ScanBoundaryDetector {
    fn boundaries(&self, text: &str) -> Vec<Boundary> {
        let mut boundaries = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(c) = text[pos..].chars().next() else {
                break;
            };
            if c == '\n' {
                if let Some(end) = Self::paragraph_end(text, pos) {
                    boundaries.push(Boundary::paragraph(pos, end));
                    pos = end;
                    continue;
                }
            } else if c == '#' && Self::is_heading_at(text, pos) {
                boundaries.push(Boundary::heading(pos));
            }
            pos += c.len_utf8();
        }
        boundaries
    }
}

/// Cut `text` at the detector's boundaries, trimming each segment and
/// dropping empty ones.
pub fn split_segments<'a>(text: &'a str, detector: &dyn BoundaryDetector) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for boundary in detector.boundaries(text) {
        segments.push(&text[cursor..boundary.start]);
        cursor = boundary.end;
    }
    segments.push(&text[cursor..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
