//! Heading extraction
//!
//! Headings come from pulldown-cmark rather than a line scan, so fenced and
//! indented code, HTML blocks and setext underlines are handled by the parser.
//! Front matter is cut off before parsing and its lines are added back to
//! every line number.

use crate::heading::Heading;
use crate::options::TocOptions;
use crate::utils::anchor::AnchorGenerator;
use crate::utils::front_matter::FrontMatterUtils;
use crate::utils::line_utils::line_count;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Heading as found by the parser, before anchors and spans are assigned
#[derive(Debug)]
struct RawHeading {
    level: u8,
    text: String,
    line: usize,
}

/// Extracts headings from one document at a time.
///
/// The anchor generator is reset at the start of every extraction, so a single
/// extractor can be reused across documents.
#[derive(Debug, Default)]
pub struct HeadingExtractor {
    min_level: u8,
    max_level: u8,
    anchors: AnchorGenerator,
}

impl HeadingExtractor {
    pub fn new(options: &TocOptions) -> Self {
        Self {
            min_level: options.min_level,
            max_level: options.max_level,
            anchors: AnchorGenerator::new(),
        }
    }

    /// Headings within the configured level range, in document order
    pub fn extract(&mut self, content: &str) -> Vec<Heading> {
        let (min, max) = (self.min_level, self.max_level);
        self.extract_all(content)
            .into_iter()
            .filter(|h| (min..=max).contains(&h.level))
            .collect()
    }

    /// Every heading regardless of level, in document order.
    ///
    /// Anchors are numbered over the full list so they do not depend on the
    /// level filter, and end lines are computed against the full list because
    /// a deep child decides how far its ancestors extend.
    pub fn extract_all(&mut self, content: &str) -> Vec<Heading> {
        self.anchors.reset();

        let (body_offset, skipped_lines) = FrontMatterUtils::split_body(content);
        let raw = parse_headings(&content[body_offset..], skipped_lines);
        let total_lines = line_count(content);

        let mut headings: Vec<Heading> = raw
            .into_iter()
            .map(|h| Heading {
                anchor: self.anchors.generate(&h.text),
                level: h.level,
                text: h.text,
                start_line: h.line,
                end_line: h.line,
            })
            .collect();

        assign_end_lines(&mut headings, total_lines);
        log::debug!("Extracted {} headings from {} lines", headings.len(), total_lines);
        headings
    }
}

/// For each heading, the line before the next heading at the same or a
/// shallower level, else the last line of the document. Never earlier than
/// the heading's own line.
fn assign_end_lines(headings: &mut [Heading], total_lines: usize) {
    for i in 0..headings.len() {
        let (level, start) = (headings[i].level, headings[i].start_line);
        let end = headings[i + 1..]
            .iter()
            .find(|next| next.level <= level)
            .map_or(total_lines, |next| next.start_line.saturating_sub(1));
        headings[i].end_line = end.max(start);
    }
}

/// Walk the parser's event stream and collect heading text and line numbers.
///
/// `line_offset` is the number of lines cut off before `body`.
fn parse_headings(body: &str, line_offset: usize) -> Vec<RawHeading> {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(body.match_indices('\n').map(|(idx, _)| idx + 1))
        .collect();
    let line_of = |offset: usize| line_starts.partition_point(|&start| start <= offset) + line_offset;

    let mut headings = Vec::new();
    let mut current: Option<RawHeading> = None;

    for (event, range) in Parser::new_ext(body, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(RawHeading {
                    level: heading_level(level),
                    text: String::new(),
                    line: line_of(range.start),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = current.take() {
                    heading.text = heading.text.trim().to_string();
                    headings.push(heading);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push(' ');
                }
            }
            // Inline HTML and everything else carries no heading text
            _ => {}
        }
    }

    headings
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
