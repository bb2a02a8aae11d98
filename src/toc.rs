//! Public entry points for generating, updating, checking and deleting TOCs
//!
//! [`Toc`] ties extraction, rendering and marker handling together. Methods
//! take `&self` and build their per-document state (the anchor counter) on
//! every call, so one `Toc` can be shared across threads.

use crate::extract::HeadingExtractor;
use crate::heading::{Heading, Section};
use crate::marker::{MarkerEngine, MarkerState};
use crate::options::TocOptions;
use crate::render::{TocRenderer, base_level, rendered_line_count};
use crate::sections::split_sections;
use crate::utils::line_ending::{detect_line_ending, restore, to_lf};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TocError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOC marker {marker} not found")]
    MarkerNotFound { marker: String },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Stray TOC marker {marker} on line {line}: markers must come in pairs around a TOC list")]
    StrayMarker { marker: String, line: usize },
}

/// What to do when a document has no marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Insert a new block after the first heading
    #[default]
    AutoInsert,
    /// Fail with [`TocError::MarkerNotFound`]
    MarkerOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The document had no marker and a block was added
    Inserted,
    /// An existing block was rewritten
    Updated,
    /// Nothing to change
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub content: String,
    pub outcome: UpdateOutcome,
}

/// Sub-TOC planned for one level-1 heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionToc {
    /// The level-1 heading, with line numbers as they will be after insertion
    pub title: Heading,
    /// 0-based line of the heading in the document without TOC blocks
    pub heading_line: usize,
    pub toc: String,
}

#[derive(Debug, Clone, Default)]
pub struct Toc {
    options: TocOptions,
    marker: MarkerEngine,
}

impl Toc {
    pub fn new(options: TocOptions) -> Self {
        Self {
            options,
            marker: MarkerEngine::default(),
        }
    }

    /// Use a custom marker line. An empty marker keeps the default.
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = MarkerEngine::new(marker);
        self
    }

    pub fn marker(&self) -> &str {
        self.marker.marker()
    }

    /// Same configuration with `path` shown in line-range annotations
    pub fn for_path(&self, path: &Path) -> Self {
        Self {
            options: self.options.with_file_path(path.display().to_string()),
            marker: self.marker.clone(),
        }
    }

    /// Headings in the configured range, as rendered by [`Toc::generate`]
    pub fn headings(&self, content: &str) -> Vec<Heading> {
        let content = normalized(content);
        HeadingExtractor::new(&self.options).extract(&content)
    }

    /// One flat TOC for the whole document, using current line numbers
    pub fn generate(&self, content: &str) -> String {
        let content = normalized(content);
        render_global(&self.options, &content)
    }

    /// Sub-TOCs for every section that gets one, with line numbers as they
    /// will be once the blocks are written
    pub fn section_plan(&self, content: &str) -> Vec<SectionToc> {
        let content = normalized(content);
        let (clean, _) = self.marker.clean_blocks(&content);
        self.plan_sections(&clean, &self.options)
    }

    /// What would be written, for display, with the line numbers the written
    /// file will have.
    ///
    /// In section mode each sub-TOC is headed by `### <title>`.
    pub fn preview(&self, content: &str) -> String {
        if !self.options.section_mode {
            let content = normalized(content);
            return self.global_toc(&content, &self.options).unwrap_or_default();
        }
        self.section_plan(content)
            .iter()
            .map(|section| format!("### {}\n\n{}", section.title.text, section.toc))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Whether updating would change the document
    pub fn check_diff(&self, content: &str) -> bool {
        let content = normalized(content);
        if self.options.section_mode {
            return self.update_sections(&content) != content;
        }
        let fresh = self.global_toc(&content, &self.options.for_write()).unwrap_or_default();
        fresh.trim() != self.marker.extract_interior(&content)
    }

    /// At least one marker line is present
    pub fn has_marker(&self, content: &str) -> bool {
        self.marker.find_markers(content).is_found()
    }

    pub fn update(&self, content: &str, mode: UpdateMode) -> Result<UpdateResult, TocError> {
        let ending = detect_line_ending(content);
        let normalized = to_lf(content, ending);
        let had_marker = self.has_marker(&normalized);

        if mode == UpdateMode::MarkerOnly && !had_marker {
            return Err(TocError::MarkerNotFound {
                marker: self.marker().to_string(),
            });
        }
        self.ensure_paired(&normalized, self.options.section_mode)?;

        let updated = if self.options.section_mode {
            self.update_sections(&normalized)
        } else {
            self.update_global(&normalized, had_marker)
        };
        let updated = restore(updated, ending);

        let outcome = if updated == content {
            UpdateOutcome::Unchanged
        } else if had_marker {
            UpdateOutcome::Updated
        } else {
            UpdateOutcome::Inserted
        };
        Ok(UpdateResult {
            content: updated,
            outcome,
        })
    }

    /// Remove every TOC block. The flag is `false` when there was none, in
    /// which case the content is returned unchanged.
    pub fn delete(&self, content: &str) -> Result<(String, bool), TocError> {
        let ending = detect_line_ending(content);
        let normalized = to_lf(content, ending);
        self.ensure_paired(&normalized, true)?;

        let (deleted, blocks) = self.marker.delete_all_blocks(&normalized);
        if blocks.is_empty() {
            return Ok((content.to_string(), false));
        }
        log::debug!("Deleted {} TOC blocks", blocks.len());
        Ok((restore(deleted, ending), true))
    }

    pub fn generate_file(&self, path: &Path) -> Result<String, TocError> {
        let content = read_file(path)?;
        Ok(self.for_path(path).preview(&content))
    }

    pub fn check_file(&self, path: &Path) -> Result<bool, TocError> {
        let content = read_file(path)?;
        self.ensure_paired(&normalized(&content), self.options.section_mode)?;
        Ok(self.for_path(path).check_diff(&content))
    }

    /// Update a file in place. The file is only written when it changes.
    pub fn update_file(&self, path: &Path, mode: UpdateMode) -> Result<UpdateOutcome, TocError> {
        let content = read_file(path)?;
        let result = self.for_path(path).update(&content, mode)?;
        if result.outcome != UpdateOutcome::Unchanged {
            write_file(path, &result.content)?;
        }
        Ok(result.outcome)
    }

    /// Delete all TOC blocks from a file. Returns whether anything was removed.
    pub fn delete_file(&self, path: &Path) -> Result<bool, TocError> {
        let content = read_file(path)?;
        let (deleted, removed) = self.delete(&content)?;
        if removed {
            write_file(path, &deleted)?;
        }
        Ok(removed)
    }

    /// Refuse documents whose markers do not bound TOC blocks. With
    /// `every_pair` all markers must pair up; otherwise only the region
    /// between the first two is checked.
    fn ensure_paired(&self, content: &str, every_pair: bool) -> Result<(), TocError> {
        let stray = if every_pair {
            self.marker.find_stray_marker(content)
        } else {
            self.marker.find_foreign_interior(content)
        };
        match stray {
            Some(line) => Err(TocError::StrayMarker {
                marker: self.marker().to_string(),
                line: line + 1,
            }),
            None => Ok(()),
        }
    }

    fn update_sections(&self, content: &str) -> String {
        let options = self.options.for_write();
        self.marker.replace_all_sections(content, |clean| {
            self.plan_sections(clean, &options)
                .into_iter()
                .map(|section| (section.heading_line, section.toc))
                .collect::<BTreeMap<_, _>>()
        })
    }

    fn update_global(&self, content: &str, had_marker: bool) -> String {
        let Some(toc) = self.global_toc(content, &self.options.for_write()) else {
            if !had_marker {
                log::debug!("No headings in range; nothing to insert");
                return content.to_string();
            }
            return self.marker.insert_at_marker(content, "");
        };

        if had_marker {
            self.marker.insert_at_marker(content, &toc)
        } else {
            log::debug!("No marker found; inserting TOC after the first heading");
            self.marker.insert_after_first_heading(content, &toc)
        }
    }

    /// Single TOC as it will be written. Headings below the insertion point
    /// are shifted by the lines the write adds or removes, so annotations
    /// match the written file. `None` when no heading is in range.
    fn global_toc(&self, content: &str, options: &TocOptions) -> Option<String> {
        let headings = HeadingExtractor::new(options).extract(content);
        let base = base_level(&headings)?;

        let renderer = TocRenderer::new(options);
        let interior = rendered_line_count(&renderer.render_flat(&headings, base)) + 2;

        // 1-based line after which text is inserted, and the net change
        let (insert_after, delta) = match self.marker.find_markers(content) {
            MarkerState::Closed { start, end } => (start + 1, interior as isize - (end - start - 1) as isize),
            MarkerState::Open { start } => (start + 1, interior as isize + 1),
            MarkerState::Absent => match self.marker.find_first_heading(content) {
                Some(line) => (line + 1, interior as isize + 3),
                None => (0, interior as isize + 3),
            },
        };

        let shifted: Vec<Heading> = headings
            .iter()
            .map(|heading| heading.shifted_below(insert_after, delta))
            .collect();
        Some(renderer.render_flat(&shifted, base))
    }

    /// Plan sub-TOCs against a document without TOC blocks.
    ///
    /// Each block pushes everything after it down, so headings are shifted by
    /// the growth of all earlier blocks, and sub-headings additionally by the
    /// growth of their own section's block.
    fn plan_sections(&self, clean: &str, options: &TocOptions) -> Vec<SectionToc> {
        let headings = HeadingExtractor::new(options).extract_all(clean);
        let sections = split_sections(&headings);
        let level1: HashSet<usize> = self.marker.find_level1_lines(clean).into_iter().collect();

        let measure = TocRenderer::new(&TocOptions {
            line_numbers: false,
            ..options.clone()
        });
        let renderer = TocRenderer::new(options);

        let (_, plan) = sections
            .iter()
            .fold((0usize, Vec::new()), |(offset, mut plan), section| {
                let heading_line = section.title.start_line.saturating_sub(1);
                if !level1.contains(&heading_line) {
                    log::debug!("Section '{}' has no ATX title line; skipped", section.title.text);
                    return (offset, plan);
                }

                let measured = measure.render_section(section);
                if measured.is_empty() {
                    log::debug!("Section '{}' has no level-2 heading; skipped", section.title.text);
                    return (offset, plan);
                }

                let growth = self.marker.section_block_growth(clean, heading_line, &measured);
                let title_shift = offset as isize;
                let child_shift = (offset + growth) as isize;
                // The block sits inside the title's own span
                let title = section.title.shifted(title_shift);
                let title = title.shifted_below(title.start_line, growth as isize);
                let shifted = Section {
                    title,
                    sub_headings: section.sub_headings.iter().map(|h| h.shifted(child_shift)).collect(),
                };

                plan.push(SectionToc {
                    toc: renderer.render_section(&shifted),
                    title: shifted.title,
                    heading_line,
                });
                (offset + growth, plan)
            });

        plan
    }
}

fn render_global(options: &TocOptions, content: &str) -> String {
    let headings = HeadingExtractor::new(options).extract(content);
    match base_level(&headings) {
        Some(base) => TocRenderer::new(options).render_flat(&headings, base),
        None => String::new(),
    }
}

fn normalized(content: &str) -> String {
    to_lf(content, detect_line_ending(content))
}

fn read_file(path: &Path) -> Result<String, TocError> {
    fs::read_to_string(path).map_err(|source| TocError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), TocError> {
    fs::write(path, content).map_err(|source| TocError::Io {
        path: path.display().to_string(),
        source,
    })
}
