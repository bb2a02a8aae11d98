#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
    Mixed,
}

pub fn detect_line_ending(content: &str) -> LineEnding {
    let has_crlf = content.contains("\r\n");
    // LF characters that are NOT part of CRLF
    let has_standalone_lf = content.replace("\r\n", "").contains('\n');

    match (has_crlf, has_standalone_lf) {
        (true, true) => LineEnding::Mixed,
        (true, false) => LineEnding::Crlf,
        (false, _) => LineEnding::Lf,
    }
}

/// Convert a CRLF document to LF for editing. LF and mixed documents are returned unchanged.
pub fn to_lf(content: &str, ending: LineEnding) -> String {
    match ending {
        LineEnding::Crlf => content.replace("\r\n", "\n"),
        LineEnding::Lf | LineEnding::Mixed => content.to_string(),
    }
}

/// Restore the document's original line endings after editing in LF form
pub fn restore(content: String, ending: LineEnding) -> String {
    match ending {
        LineEnding::Crlf => content.replace('\n', "\r\n"),
        LineEnding::Lf | LineEnding::Mixed => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(detect_line_ending("a\nb\n"), LineEnding::Lf);
        assert_eq!(detect_line_ending("a\r\nb\r\n"), LineEnding::Crlf);
        assert_eq!(detect_line_ending("a\r\nb\n"), LineEnding::Mixed);
        assert_eq!(detect_line_ending("single line"), LineEnding::Lf);
    }

    #[test]
    fn test_crlf_roundtrip() {
        let original = "# T\r\n\r\ntext\r\n";
        let ending = detect_line_ending(original);
        let lf = to_lf(original, ending);
        assert_eq!(lf, "# T\n\ntext\n");
        assert_eq!(restore(lf, ending), original);
    }

    #[test]
    fn test_mixed_left_alone() {
        let original = "a\r\nb\n";
        assert_eq!(to_lf(original, LineEnding::Mixed), original);
        assert_eq!(restore(original.to_string(), LineEnding::Mixed), original);
    }
}
