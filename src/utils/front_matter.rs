/// Utility functions for detecting YAML front matter in Markdown documents
///
/// Front matter only counts when it starts on the very first line with `---`
/// and is closed by a later `---` or `...` line. An opening delimiter without
/// a closing one is treated as ordinary content.
pub struct FrontMatterUtils;

impl FrontMatterUtils {
    /// 0-based index of the closing delimiter line, if the document has front matter
    pub fn closing_line<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
        let first = lines.first()?;
        if first.as_ref().trim() != "---" {
            return None;
        }

        let closing = lines
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, line)| matches!(line.as_ref().trim(), "---" | "..."))
            .map(|(idx, _)| idx);

        if closing.is_none() {
            log::warn!("Front matter opened on line 1 is never closed; treating it as content");
        }
        closing
    }

    /// 0-based index of the first line after the front matter (0 without front matter)
    ///
    /// All heading and marker scanning starts at this line.
    pub fn body_start_line<S: AsRef<str>>(lines: &[S]) -> usize {
        Self::closing_line(lines).map_or(0, |idx| idx + 1)
    }

    /// Byte offset where the body starts, paired with the number of lines skipped
    pub fn split_body(content: &str) -> (usize, usize) {
        let lines: Vec<&str> = content.split('\n').collect();
        let skipped = Self::body_start_line(&lines);
        let offset = lines.iter().take(skipped).map(|line| line.len() + 1).sum::<usize>();
        (offset.min(content.len()), skipped)
    }
}
