//! TOC marker handling
//!
//! A managed region is delimited by marker lines (default `<!--TOC-->`).
//! One marker is an insertion point; two markers bound a region whose
//! interior belongs to the tool and is replaced wholesale on update.
//!
//! Every operation here is a pure transform over document text. Line indices
//! are 0-based. Scans skip front matter and fenced code blocks, so marker-like
//! lines inside either are never touched.
//!
//! Inserted blocks always have the shape
//!
//! ```text
//! <!--TOC-->
//!
//! - [Entry](#entry)
//!
//! <!--TOC-->
//! ```
//!
//! with exactly one blank line between each marker and the list.

use crate::render::rendered_line_count;
use crate::utils::front_matter::FrontMatterUtils;
use crate::utils::line_utils::{FenceTracker, atx_heading_level, is_blank, join_lines, split_lines};
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_MARKER: &str = "<!--TOC-->";

/// Blank line, marker, blank line, content, blank line, marker, blank line
const SECTION_BLOCK_FRAMING: usize = 6;

/// Where the managed region stands in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    /// No marker at all
    Absent,
    /// A single marker: content goes after it and a closing marker is added
    Open { start: usize },
    /// Two markers bounding a replaceable interior
    Closed { start: usize, end: usize },
}

impl MarkerState {
    pub fn is_found(&self) -> bool {
        !matches!(self, MarkerState::Absent)
    }
}

/// Position of a closed marker pair, both marker lines included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start_line: usize,
    pub end_line: usize,
}

/// How deleting a block treats the blank lines around it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankPolicy {
    /// Strip before re-inserting section blocks: the insertion adds its own
    /// surrounding blank lines back
    Reinsert,
    /// Strip for good: leave the surrounding text as it was before insertion
    Remove,
}

#[derive(Debug, Clone)]
pub struct MarkerEngine {
    marker: String,
}

impl Default for MarkerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl MarkerEngine {
    /// An empty marker falls back to [`DEFAULT_MARKER`]
    pub fn new(marker: &str) -> Self {
        let marker = marker.trim();
        Self {
            marker: if marker.is_empty() { DEFAULT_MARKER } else { marker }.to_string(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Locate the first two markers
    pub fn find_markers(&self, content: &str) -> MarkerState {
        let lines = split_lines(content);
        self.marker_state(&lines)
    }

    /// Write `toc` into the managed region. Without a marker the content is
    /// returned unchanged.
    pub fn insert_at_marker(&self, content: &str, toc: &str) -> String {
        let lines = split_lines(content);
        let mut result: Vec<&str> = Vec::with_capacity(lines.len() + rendered_line_count(toc) + 4);

        match self.marker_state(&lines) {
            MarkerState::Absent => return content.to_string(),
            MarkerState::Open { start } => {
                result.extend_from_slice(&lines[..=start]);
                result.extend(framed(toc));
                result.push(&self.marker);
                result.extend_from_slice(&lines[start + 1..]);
            }
            MarkerState::Closed { start, end } => {
                if !holds_only_toc(&lines[start + 1..end]) {
                    log::warn!(
                        "Text between the {} markers on lines {} and {} is not a TOC; leaving it alone",
                        self.marker,
                        start + 1,
                        end + 1
                    );
                    return content.to_string();
                }
                // The stale interior goes entirely; everything from the end
                // marker on is kept as is
                result.extend_from_slice(&lines[..=start]);
                result.extend(framed(toc));
                result.extend_from_slice(&lines[end..]);
            }
        }

        join_lines(&result)
    }

    /// Text between the two markers with surrounding blank lines trimmed.
    /// Empty unless the region is closed.
    pub fn extract_interior(&self, content: &str) -> String {
        let lines = split_lines(content);
        match self.marker_state(&lines) {
            MarkerState::Closed { start, end } => join_lines(&lines[start + 1..end]).trim().to_string(),
            _ => String::new(),
        }
    }

    /// First ATX heading outside front matter and fenced code
    pub fn find_first_heading(&self, content: &str) -> Option<usize> {
        let lines = split_lines(content);
        scan_body(&lines).find(|&idx| atx_heading_level(lines[idx]).is_some())
    }

    /// Insert a complete block right after the first heading, or at the top
    /// of the document when there is no heading.
    ///
    /// No blank line is added after the closing marker: whatever followed the
    /// heading follows the block, so deleting the block gives back the input.
    pub fn insert_after_first_heading(&self, content: &str, toc: &str) -> String {
        let lines = split_lines(content);
        let mut result: Vec<&str> = Vec::with_capacity(lines.len() + rendered_line_count(toc) + 6);

        match scan_body(&lines).find(|&idx| atx_heading_level(lines[idx]).is_some()) {
            Some(heading) => {
                result.extend_from_slice(&lines[..=heading]);
                result.push("");
                self.push_block(&mut result, toc);
                result.extend_from_slice(&lines[heading + 1..]);
            }
            None => {
                log::debug!("No heading found; placing TOC at the top of the document");
                self.push_block(&mut result, toc);
                result.push("");
                result.extend_from_slice(&lines);
            }
        }

        join_lines(&result)
    }

    /// Lines of all ATX level-1 headings outside front matter and fenced code
    pub fn find_level1_lines(&self, content: &str) -> Vec<usize> {
        let lines = split_lines(content);
        level1_lines(&lines)
    }

    /// Insert a block after each level-1 heading line named in `tocs`.
    ///
    /// Keys that are not level-1 heading lines and empty TOCs are ignored.
    /// Blank lines directly after the heading are absorbed by the block's own
    /// trailing blank line.
    pub fn insert_per_section(&self, content: &str, tocs: &BTreeMap<usize, String>) -> String {
        let lines = split_lines(content);
        let headings: HashSet<usize> = level1_lines(&lines).into_iter().collect();

        let targets: BTreeMap<usize, &str> = tocs
            .iter()
            .filter(|(line, toc)| {
                let usable = headings.contains(*line) && !toc.is_empty();
                if !usable && !toc.is_empty() {
                    log::debug!("Line {} is not a level-1 heading; skipping its TOC", *line + 1);
                }
                usable
            })
            .map(|(line, toc)| (*line, toc.as_str()))
            .collect();

        if targets.is_empty() {
            return content.to_string();
        }

        let mut result: Vec<&str> = Vec::with_capacity(lines.len() + targets.len() * 8);
        let mut resume_at = 0;
        for (idx, line) in lines.iter().enumerate() {
            if idx < resume_at {
                continue;
            }
            result.push(*line);
            if let Some(toc) = targets.get(&idx) {
                result.push("");
                self.push_block(&mut result, toc);
                result.push("");
                resume_at = idx + 1 + blank_run(&lines, idx + 1);
            }
        }

        join_lines(&result)
    }

    /// Strip every block, then insert fresh ones.
    ///
    /// `plan` receives the cleaned document and returns TOCs keyed by the
    /// level-1 heading lines of that cleaned document. Keys computed against
    /// the input document would be off by the removed blocks.
    ///
    /// A document with a stray marker is returned unchanged.
    pub fn replace_all_sections<F>(&self, content: &str, plan: F) -> String
    where
        F: FnOnce(&str) -> BTreeMap<usize, String>,
    {
        let lines = split_lines(content);
        let Some(blocks) = self.closed_blocks(&lines) else {
            return content.to_string();
        };
        let clean = if blocks.is_empty() {
            content.to_string()
        } else {
            log::debug!("Removed {} existing TOC blocks before re-inserting", blocks.len());
            strip_blocks(&lines, &blocks, BlankPolicy::Reinsert)
        };
        let tocs = plan(&clean);
        self.insert_per_section(&clean, &tocs)
    }

    /// Remove every block together with the blank line before it, absorbing a
    /// single blank line after it and collapsing longer runs to one.
    ///
    /// The result is what [`MarkerEngine::insert_per_section`] expects to
    /// re-insert into.
    pub fn clean_blocks(&self, content: &str) -> (String, Vec<BlockSpan>) {
        self.remove_blocks(content, BlankPolicy::Reinsert)
    }

    /// Remove every block and one adjacent blank line, collapsing any
    /// remaining run of blank lines after it to at most one. Content without
    /// a closed block, or with a stray marker, comes back byte-identical with
    /// no spans.
    pub fn delete_all_blocks(&self, content: &str) -> (String, Vec<BlockSpan>) {
        self.remove_blocks(content, BlankPolicy::Remove)
    }

    /// First marker line (0-based) that does not belong to a TOC block.
    ///
    /// Markers pair up in order. A pair with anything besides list items and
    /// blank lines between them starts at a stray marker, and so does a
    /// marker left over at the end.
    pub fn find_stray_marker(&self, content: &str) -> Option<usize> {
        let lines = split_lines(content);
        stray_marker(&lines, &self.marker_lines(&lines))
    }

    /// Start of the managed region (0-based) when its interior holds text
    /// that [`MarkerEngine::insert_at_marker`] would refuse to replace
    pub fn find_foreign_interior(&self, content: &str) -> Option<usize> {
        let lines = split_lines(content);
        match self.marker_state(&lines) {
            MarkerState::Closed { start, end } if !holds_only_toc(&lines[start + 1..end]) => Some(start),
            _ => None,
        }
    }

    /// Net lines a section block adds after `heading_line`: the framing plus
    /// the TOC itself, less the blank lines it absorbs
    pub fn section_block_growth(&self, content: &str, heading_line: usize, toc: &str) -> usize {
        if toc.is_empty() {
            return 0;
        }
        let lines = split_lines(content);
        block_line_count(toc).saturating_sub(blank_run(&lines, heading_line + 1))
    }

    fn remove_blocks(&self, content: &str, policy: BlankPolicy) -> (String, Vec<BlockSpan>) {
        let lines = split_lines(content);
        match self.closed_blocks(&lines) {
            Some(blocks) if !blocks.is_empty() => (strip_blocks(&lines, &blocks, policy), blocks),
            _ => (content.to_string(), Vec::new()),
        }
    }

    fn push_block<'a>(&'a self, result: &mut Vec<&'a str>, toc: &'a str) {
        result.push(&self.marker);
        result.extend(framed(toc));
        result.push(&self.marker);
    }

    fn is_marker(&self, line: &str) -> bool {
        line.trim() == self.marker
    }

    fn marker_lines(&self, lines: &[&str]) -> Vec<usize> {
        scan_body(lines).filter(|&idx| self.is_marker(lines[idx])).collect()
    }

    fn marker_state(&self, lines: &[&str]) -> MarkerState {
        let markers = self.marker_lines(lines);
        match markers.as_slice() {
            [] => MarkerState::Absent,
            [start] => MarkerState::Open { start: *start },
            [start, end, ..] => MarkerState::Closed {
                start: *start,
                end: *end,
            },
        }
    }

    /// Markers paired up in order, or `None` when one of them is stray
    fn closed_blocks(&self, lines: &[&str]) -> Option<Vec<BlockSpan>> {
        let markers = self.marker_lines(lines);
        if let Some(stray) = stray_marker(lines, &markers) {
            log::warn!(
                "{} on line {} does not pair with a marker around a TOC; leaving the document unchanged",
                self.marker,
                stray + 1
            );
            return None;
        }
        Some(
            markers
                .chunks_exact(2)
                .map(|pair| BlockSpan {
                    start_line: pair[0],
                    end_line: pair[1],
                })
                .collect(),
        )
    }
}

/// Drop the given blocks and the blank lines around them per `policy`
fn strip_blocks(lines: &[&str], blocks: &[BlockSpan], policy: BlankPolicy) -> String {
    let mut remove = vec![false; lines.len()];
    for block in blocks {
        remove[block.start_line..=block.end_line].fill(true);

        let before = block.start_line.checked_sub(1).filter(|&idx| removable_blank(lines, idx));
        if let Some(idx) = before {
            remove[idx] = true;
        }

        let trailing: Vec<usize> = (block.end_line + 1..lines.len())
            .take_while(|&idx| removable_blank(lines, idx))
            .collect();
        let keep = match policy {
            // A single trailing blank goes; a longer run keeps one
            BlankPolicy::Reinsert => usize::from(trailing.len() > 1),
            BlankPolicy::Remove if before.is_some() => trailing.len().min(1),
            BlankPolicy::Remove => trailing.len().saturating_sub(1).min(1),
        };
        for &idx in &trailing[keep..] {
            remove[idx] = true;
        }
    }

    let kept: Vec<&str> = lines
        .iter()
        .zip(&remove)
        .filter(|(_, removed)| !**removed)
        .map(|(line, _)| *line)
        .collect();

    join_lines(&kept)
}

fn stray_marker(lines: &[&str], markers: &[usize]) -> Option<usize> {
    markers.chunks(2).find_map(|pair| match *pair {
        [start, end] if holds_only_toc(&lines[start + 1..end]) => None,
        _ => pair.first().copied(),
    })
}

/// Only blank lines and list items, the way rendered TOCs look
fn holds_only_toc(lines: &[&str]) -> bool {
    lines.iter().all(|line| is_blank(line) || is_list_item(line))
}

fn is_list_item(line: &str) -> bool {
    let item = line.trim_start();
    let digits = item.bytes().take_while(u8::is_ascii_digit).count();
    let bullet_end = if digits > 0 {
        item[digits..].starts_with(['.', ')']).then_some(digits + 1)
    } else {
        item.starts_with(['-', '*', '+']).then_some(1)
    };
    bullet_end.is_some_and(|end| item[end..].starts_with([' ', '\t']))
}

/// Lines a section block occupies: framing plus the TOC lines
pub fn block_line_count(toc: &str) -> usize {
    SECTION_BLOCK_FRAMING + rendered_line_count(toc)
}

/// Interior lines between the markers: the TOC padded by one blank line on
/// each side, or a single blank line when there is nothing to list
fn framed(toc: &str) -> Vec<&str> {
    if toc.is_empty() { vec![""] } else { vec!["", toc, ""] }
}

/// Indices of lines after the front matter that are outside fenced code
fn scan_body<'a>(lines: &'a [&'a str]) -> impl Iterator<Item = usize> + 'a {
    let start = FrontMatterUtils::body_start_line(lines);
    let mut fences = FenceTracker::new();
    (start..lines.len()).filter(move |&idx| !fences.is_fenced(lines[idx]))
}

/// Number of consecutive blank lines starting at `from`
fn blank_run(lines: &[&str], from: usize) -> usize {
    lines.get(from..).map_or(0, |rest| rest.iter().take_while(|line| is_blank(line)).count())
}

fn level1_lines(lines: &[&str]) -> Vec<usize> {
    scan_body(lines)
        .filter(|&idx| atx_heading_level(lines[idx]) == Some(1))
        .collect()
}

/// A blank line that may be deleted. The empty element after a final newline
/// is the file terminator, not a blank line.
fn removable_blank(lines: &[&str], idx: usize) -> bool {
    is_blank(lines[idx]) && !(idx + 1 == lines.len() && lines[idx].is_empty())
}
