//! Text utilities shared by the TOC pipeline

pub mod anchor;
pub mod front_matter;
pub mod line_ending;
pub mod line_utils;

pub use anchor::{AnchorGenerator, slugify};
pub use front_matter::FrontMatterUtils;
pub use line_ending::LineEnding;
