use clap::{ArgGroup, Parser};
use mdtoc_lib::file_processor::FileAction;
use mdtoc_lib::options::TocOptions;
use mdtoc_lib::toc::UpdateMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mdtoc",
    author,
    version,
    about = "Generate and maintain tables of contents in Markdown files",
    long_about = "Generate and maintain tables of contents in Markdown files.\n\n\
        By default every level-1 heading gets its own sub-TOC; use --global for \
        a single TOC per document. Without -i, -d or --check the TOC is printed \
        to stdout."
)]
#[command(group(ArgGroup::new("action").args(["in_place", "delete", "check", "json"])))]
pub struct Cli {
    /// Files or directories to process. Read from stdin, one per line, when
    /// omitted and stdin is not a terminal.
    pub paths: Vec<PathBuf>,

    /// Shallowest heading level to include (1-6)
    #[arg(short = 'm', long, value_name = "LEVEL")]
    pub min_level: Option<u8>,

    /// Deepest heading level to include (1-6)
    #[arg(short = 'M', long, value_name = "LEVEL")]
    pub max_level: Option<u8>,

    /// Use a numbered list instead of bullets
    #[arg(short, long)]
    pub ordered: bool,

    /// Append `:start+count` line ranges to entries
    /// When not specified, uses config file value (default: true)
    #[arg(
        short = 'L',
        long,
        num_args(0..=1),
        require_equals(true),
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub line_numbers: Option<bool>,

    /// Prefix line ranges with the file path
    #[arg(short = 'p', long = "path")]
    pub show_path: bool,

    /// One TOC for the whole document instead of one per level-1 section
    #[arg(short, long)]
    pub global: bool,

    /// Link entries to their anchors in stdout output (always on when writing)
    #[arg(short, long)]
    pub anchor: bool,

    /// Write the TOC into the files
    #[arg(short, long)]
    pub in_place: bool,

    /// Remove all TOC blocks from the files
    #[arg(short, long)]
    pub delete: bool,

    /// Exit with code 1 if any file's TOC is missing or out of date (for CI)
    #[arg(long)]
    pub check: bool,

    /// Print the heading outline as JSON
    #[arg(long)]
    pub json: bool,

    /// With -i, only update files that already contain a marker
    #[arg(long, requires = "in_place")]
    pub marker_only: bool,

    /// Marker line delimiting the TOC
    #[arg(long, value_name = "MARKER")]
    pub marker: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore any configuration file
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line flags over options loaded from configuration
    pub fn toc_options(&self, base: TocOptions) -> TocOptions {
        TocOptions {
            min_level: self.min_level.unwrap_or(base.min_level),
            max_level: self.max_level.unwrap_or(base.max_level),
            ordered: base.ordered || self.ordered,
            line_numbers: self.line_numbers.unwrap_or(base.line_numbers),
            show_path: base.show_path || self.show_path,
            file_path: None,
            section_mode: base.section_mode && !self.global,
            anchor_links: base.anchor_links || self.anchor,
        }
    }

    pub fn action(&self) -> FileAction {
        if self.in_place {
            let mode = if self.marker_only {
                UpdateMode::MarkerOnly
            } else {
                UpdateMode::AutoInsert
            };
            FileAction::Update(mode)
        } else if self.delete {
            FileAction::Delete
        } else if self.check {
            FileAction::Check
        } else if self.json {
            FileAction::Outline
        } else {
            FileAction::Preview
        }
    }
}
