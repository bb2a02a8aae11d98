//! Heading and section data model

use serde::Serialize;

/// A heading extracted from a document.
///
/// `end_line` is the last line the heading owns: the line before the next
/// heading of the same or a shallower level, or the last line of the file.
/// Line numbers are 1-based and count from the top of the file, front matter
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub anchor: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl Heading {
    /// Number of lines spanned, heading line included
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Copy with both line numbers moved by `delta`
    pub fn shifted(&self, delta: isize) -> Self {
        Self {
            start_line: self.start_line.saturating_add_signed(delta),
            end_line: self.end_line.saturating_add_signed(delta),
            ..self.clone()
        }
    }

    /// Copy adjusted for `delta` lines inserted right after `line`.
    ///
    /// Starts below `line` move. A span ending on or below `line` grows or
    /// shrinks, since the inserted text lands before the next heading.
    pub fn shifted_below(&self, line: usize, delta: isize) -> Self {
        let start_line = if self.start_line > line {
            self.start_line.saturating_add_signed(delta)
        } else {
            self.start_line
        };
        let end_line = if self.end_line >= line {
            self.end_line.saturating_add_signed(delta)
        } else {
            self.end_line
        };
        Self {
            start_line,
            end_line: end_line.max(start_line),
            ..self.clone()
        }
    }
}

/// A level-1 heading together with the deeper headings up to the next level-1 heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: Heading,
    pub sub_headings: Vec<Heading>,
}

impl Section {
    /// A section only gets its own TOC when it has at least one level-2 heading
    pub fn has_level2(&self) -> bool {
        self.sub_headings.iter().any(|h| h.level == 2)
    }
}
