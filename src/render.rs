//! TOC rendering
//!
//! Produces the Markdown list that goes between the markers. Output lines are
//! joined with `\n` and carry no trailing newline.

use crate::heading::{Heading, Section};
use crate::options::TocOptions;

/// Renders heading lists as nested Markdown lists
#[derive(Debug, Clone)]
pub struct TocRenderer {
    options: TocOptions,
}

impl TocRenderer {
    pub fn new(options: &TocOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    /// Render already-filtered headings, indenting relative to `base_level`
    pub fn render_flat(&self, headings: &[Heading], base_level: u8) -> String {
        let mut counters = [0usize; 7];
        let mut lines = Vec::with_capacity(headings.len());

        for heading in headings {
            let level = usize::from(heading.level.clamp(1, 6));
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(base_level)));

            let marker = if self.options.ordered {
                counters[level] += 1;
                // Deeper counters restart under every emitted heading
                for deeper in &mut counters[level + 1..] {
                    *deeper = 0;
                }
                format!("{}.", counters[level])
            } else {
                "-".to_string()
            };

            let mut entry = format!("{indent}{marker} {}", self.link(heading));
            if let Some(annotation) = self.line_annotation(heading) {
                entry.push(' ');
                entry.push_str(&annotation);
            }
            lines.push(entry);
        }

        lines.join("\n")
    }

    /// Render the sub-TOC of one section.
    ///
    /// Empty when the section has no level-2 heading, even if deeper headings
    /// fall inside the configured range.
    pub fn render_section(&self, section: &Section) -> String {
        if !section.has_level2() {
            return String::new();
        }

        let filtered: Vec<Heading> = section
            .sub_headings
            .iter()
            .filter(|h| self.options.includes_level(h.level))
            .cloned()
            .collect();

        match base_level(&filtered) {
            Some(base) => self.render_flat(&filtered, base),
            None => String::new(),
        }
    }

    fn link(&self, heading: &Heading) -> String {
        if self.options.anchor_links {
            format!("[{}](#{})", heading.text, heading.anchor)
        } else {
            format!("[{}]", heading.text)
        }
    }

    /// `` `:start+count` ``, or `` `path:start+count` `` when a path is shown
    fn line_annotation(&self, heading: &Heading) -> Option<String> {
        if !self.options.line_numbers || heading.start_line == 0 {
            return None;
        }
        let path = match &self.options.file_path {
            Some(path) if self.options.show_path => path.as_str(),
            _ => "",
        };
        Some(format!("`{path}:{}+{}`", heading.start_line, heading.line_count()))
    }
}

/// Shallowest level present, so the outermost rendered entries sit flush left
pub fn base_level(headings: &[Heading]) -> Option<u8> {
    headings.iter().map(|h| h.level).min()
}

/// Number of lines a rendered TOC occupies
pub fn rendered_line_count(toc: &str) -> usize {
    if toc.is_empty() { 0 } else { toc.matches('\n').count() + 1 }
}
