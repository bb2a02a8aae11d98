//! Line-oriented helpers shared by the marker engine and the raw heading scans.
//!
//! Documents are handled as `\n`-separated lines. A trailing newline yields a
//! final empty element, so `join_lines(split_lines(s)) == s` for every input.

/// Split content into lines on `\n`, keeping any `\r` on the line
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Inverse of [`split_lines`]
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut result = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            result.push('\n');
        }
        result.push_str(line.as_ref());
    }
    result
}

#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of lines in the document as an editor would count them
///
/// The empty remainder after a final newline is not a line.
pub fn line_count(content: &str) -> usize {
    content.lines().count()
}

/// Level of an ATX heading line (`#` to `######` followed by whitespace or end of line)
pub fn atx_heading_level(line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = line[indent..].trim_end();
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match rest.as_bytes().get(hashes) {
        None | Some(b' ') | Some(b'\t') => Some(hashes),
        _ => None,
    }
}

/// Tracks whether a line-by-line scan is inside a fenced code block.
///
/// A fence opens on three or more backticks or tildes indented by at most
/// three spaces, and only closes on a bare fence of the same character that
/// is at least as long. Backtick fences cannot carry a backtick in their info
/// string. Deeper indentation is an indented code block, not a fence.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<Fence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    ch: char,
    len: usize,
    bare: bool,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line. Returns `true` when the line belongs to a fenced
    /// block, including the opening and closing fence lines.
    pub fn is_fenced(&mut self, line: &str) -> bool {
        match (self.open, fence_of(line)) {
            (Some(open), Some(fence)) => {
                if fence.ch == open.ch && fence.len >= open.len && fence.bare {
                    self.open = None;
                }
                true
            }
            (Some(_), None) => true,
            (None, Some(fence)) => {
                self.open = Some(fence);
                true
            }
            (None, None) => false,
        }
    }
}

fn fence_of(line: &str) -> Option<Fence> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return None;
    }
    let ch = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = rest.chars().take_while(|&c| c == ch).count();
    if len < 3 {
        return None;
    }
    let info = rest[len..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some(Fence {
        ch,
        len,
        bare: info.is_empty(),
    })
}
