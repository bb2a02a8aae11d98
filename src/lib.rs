//! Markdown table-of-contents generation.
//!
//! Headings are extracted with pulldown-cmark, rendered as nested Markdown
//! lists and kept in sync inside marker-delimited regions of the document,
//! either as one global TOC or as one sub-TOC per level-1 section.

pub mod config;
pub mod exit_codes;
pub mod extract;
pub mod file_processor;
pub mod heading;
pub mod marker;
pub mod options;
pub mod render;
pub mod sections;
pub mod toc;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use crate::config::{Config, ConfigError};
pub use crate::heading::{Heading, Section};
pub use crate::marker::{DEFAULT_MARKER, MarkerEngine, MarkerState};
pub use crate::options::TocOptions;
pub use crate::toc::{SectionToc, Toc, TocError, UpdateMode, UpdateOutcome, UpdateResult};
