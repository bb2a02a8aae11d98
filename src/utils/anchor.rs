//! GitHub-compatible heading anchors
//!
//! Converts heading text into the fragment identifier GitHub assigns to the
//! rendered heading, and keeps the per-document occurrence counts used to
//! disambiguate repeated headings (`title`, `title-1`, `title-2`, ...).
//!
//! The markup-stripping stage is a fixed pipeline of single-purpose
//! replacements. The order matters: bold is resolved before italic so that
//! `**x**` is not read as two italics, and link text before image alt text.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());
/// Anything but letters, decimal digits, hyphen, underscore and space
static NON_SLUG_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{Nd}_ \-]").unwrap());

static BOLD_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static BOLD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());
/// Underscore emphasis only counts on word boundaries, so `snake_case_name` survives
static ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s)_([^_]+?)_(\s|$)").unwrap());
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap());

/// Stateful anchor generator for a single document.
///
/// Call [`AnchorGenerator::reset`] (or build a new generator) before
/// processing another document, otherwise duplicate numbering leaks across
/// documents.
#[derive(Debug, Default, Clone)]
pub struct AnchorGenerator {
    /// Occurrence count per base slug (the slug before any `-N` suffix)
    counts: HashMap<String, usize>,
}

impl AnchorGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every slug seen so far
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Generate the anchor for `text`, numbering repeats in call order.
    ///
    /// ```
    /// use mdtoc_lib::utils::anchor::AnchorGenerator;
    ///
    /// let mut anchors = AnchorGenerator::new();
    /// assert_eq!(anchors.generate("Title"), "title");
    /// assert_eq!(anchors.generate("Title"), "title-1");
    /// ```
    pub fn generate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.counts.entry(base.clone()).or_insert(0);
        let anchor = if *count == 0 { base } else { format!("{base}-{count}") };
        *count += 1;
        anchor
    }
}

/// Stateless slug for `text`, without duplicate numbering.
///
/// Never fails: text made only of punctuation yields an empty slug.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_tags = HTML_TAG.replace_all(&lowered, "");
    let plain = strip_markup(&without_tags);

    let filtered = NON_SLUG_CHAR.replace_all(&plain, "").replace(' ', "-");

    HYPHEN_RUN.replace_all(&filtered, "-").trim_matches('-').to_string()
}

/// Replace inline Markdown constructs with their inner text
fn strip_markup(text: &str) -> String {
    let mut result = BOLD_STAR.replace_all(text, "$1").into_owned();
    result = ITALIC_STAR.replace_all(&result, "$1").into_owned();
    result = BOLD_UNDERSCORE.replace_all(&result, "$1").into_owned();
    result = strip_italic_underscore(&result);
    result = STRIKETHROUGH.replace_all(&result, "$1").into_owned();
    result = CODE_SPAN.replace_all(&result, "$1").into_owned();
    result = LINK.replace_all(&result, "$1").into_owned();
    IMAGE.replace_all(&result, "$1").into_owned()
}

/// Adjacent matches like `_a_ _b_` share the separating space, so a single
/// pass leaves the second one behind. Repeat until nothing changes.
fn strip_italic_underscore(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = ITALIC_UNDERSCORE
            .replace_all(&current, |caps: &Captures| format!("{}{}{}", &caps[1], &caps[2], &caps[3]))
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
