//! Per-invocation rendering options

use crate::toc::TocError;

/// Options shared by every stage of TOC generation.
///
/// Built once per invocation (and per file when `file_path` is set) and
/// passed by reference; nothing mutates it mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocOptions {
    /// Shallowest heading level included (1-6)
    pub min_level: u8,
    /// Deepest heading level included (1-6)
    pub max_level: u8,
    /// Numbered list (`1.`) instead of bullets (`-`)
    pub ordered: bool,
    /// Append a `` `:start+count` `` line-range annotation to each entry
    pub line_numbers: bool,
    /// Prefix the line-range annotation with `file_path`
    pub show_path: bool,
    /// Path shown when `show_path` is on
    pub file_path: Option<String>,
    /// One sub-TOC after every level-1 heading instead of one global TOC
    pub section_mode: bool,
    /// Emit `[text](#anchor)` links instead of bare `[text]` entries
    pub anchor_links: bool,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 3,
            ordered: false,
            line_numbers: false,
            show_path: false,
            file_path: None,
            section_mode: true,
            anchor_links: false,
        }
    }
}

impl TocOptions {
    /// Reject level bounds outside `1 <= min_level <= max_level <= 6`
    pub fn validate(&self) -> Result<(), TocError> {
        if !(1..=6).contains(&self.min_level) {
            return Err(TocError::InvalidOptions(format!(
                "min-level must be between 1 and 6, got {}",
                self.min_level
            )));
        }
        if !(1..=6).contains(&self.max_level) {
            return Err(TocError::InvalidOptions(format!(
                "max-level must be between 1 and 6, got {}",
                self.max_level
            )));
        }
        if self.min_level > self.max_level {
            return Err(TocError::InvalidOptions(format!(
                "min-level ({}) cannot be greater than max-level ({})",
                self.min_level, self.max_level
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn includes_level(&self, level: u8) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    /// Copy for writing into a file: links are mandatory there
    pub fn for_write(&self) -> Self {
        Self {
            anchor_links: true,
            ..self.clone()
        }
    }

    /// Copy annotated with the path of the file being processed
    pub fn with_file_path(&self, path: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = TocOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.section_mode);
        assert!(!options.anchor_links);
    }

    #[test]
    fn test_level_bounds_rejected() {
        let zero = TocOptions {
            min_level: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(TocError::InvalidOptions(_))));

        let seven = TocOptions {
            max_level: 7,
            ..Default::default()
        };
        assert!(seven.validate().is_err());

        let inverted = TocOptions {
            min_level: 4,
            max_level: 2,
            ..Default::default()
        };
        let message = inverted.validate().unwrap_err().to_string();
        assert!(message.contains("cannot be greater"), "{message}");
    }

    #[test]
    fn test_includes_level() {
        let options = TocOptions {
            min_level: 2,
            max_level: 3,
            ..Default::default()
        };
        assert!(!options.includes_level(1));
        assert!(options.includes_level(2));
        assert!(options.includes_level(3));
        assert!(!options.includes_level(4));
    }

    #[test]
    fn test_for_write_forces_links() {
        let write = TocOptions::default().with_file_path("README.md").for_write();
        assert!(write.anchor_links);
        assert_eq!(write.file_path.as_deref(), Some("README.md"));
    }
}
