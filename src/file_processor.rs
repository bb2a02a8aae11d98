//! File discovery and per-file processing.
//!
//! Directories are walked for Markdown files with `ignore`, so `.gitignore`
//! and `.ignore` rules apply. Explicit file paths are taken as given; a missing
//! one surfaces as an error for that file only.

use crate::heading::Heading;
use crate::toc::{Toc, TocError, UpdateMode, UpdateOutcome};
use ignore::WalkBuilder;
use ignore::types::{Types, TypesBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const MARKDOWN_GLOBS: &[&str] = &["*.md", "*.markdown", "*.mdx", "*.mkd", "*.mkdn", "*.mdown", "*.mdwn"];

/// What to do with each file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Render the TOC for display
    Preview,
    /// Collect the headings for a JSON outline
    Outline,
    /// Write the TOC into the file
    Update(UpdateMode),
    /// Remove all TOC blocks from the file
    Delete,
    /// Report whether the file is out of date
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReport {
    Preview(String),
    Outline(Vec<Heading>),
    Updated(UpdateOutcome),
    Deleted(bool),
    Checked { drift: bool },
}

#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub report: Result<FileReport, TocError>,
}

/// Expand the given paths into Markdown files, keeping input order.
///
/// Each directory contributes its files sorted by path. Files reached twice
/// are listed once.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ignore::Error> {
    let types = markdown_types()?;
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            if seen.insert(path.clone()) {
                files.push(path.clone());
            }
            continue;
        }

        let mut found = walk_directory(path, &types);
        found.sort();
        files.extend(found.into_iter().filter(|file| seen.insert(file.clone())));
    }

    log::debug!("Collected {} files from {} paths", files.len(), paths.len());
    Ok(files)
}

/// Run one action on one file
pub fn process_file(toc: &Toc, path: &Path, action: FileAction) -> FileResult {
    let report = match action {
        FileAction::Preview => toc.generate_file(path).map(FileReport::Preview),
        FileAction::Outline => read_outline(toc, path).map(FileReport::Outline),
        FileAction::Update(mode) => toc.update_file(path, mode).map(FileReport::Updated),
        FileAction::Delete => toc.delete_file(path).map(FileReport::Deleted),
        FileAction::Check => toc.check_file(path).map(|drift| FileReport::Checked { drift }),
    };

    if let Err(err) = &report {
        log::debug!("Processing {} failed: {err}", path.display());
    }

    FileResult {
        path: path.to_path_buf(),
        report,
    }
}

fn read_outline(toc: &Toc, path: &Path) -> Result<Vec<Heading>, TocError> {
    let content = std::fs::read_to_string(path).map_err(|source| TocError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toc.headings(&content))
}

fn markdown_types() -> Result<Types, ignore::Error> {
    let mut builder = TypesBuilder::new();
    for glob in MARKDOWN_GLOBS {
        builder.add("markdown", glob)?;
    }
    builder.select("markdown");
    builder.build()
}

fn walk_directory(dir: &Path, types: &Types) -> Vec<PathBuf> {
    let mut walker = WalkBuilder::new(dir);
    walker
        .types(types.clone())
        .hidden(false)
        .require_git(false)
        .add_custom_ignore_filename(".mdtocignore");

    let mut files = Vec::new();
    for entry in walker.build() {
        match entry {
            Ok(entry) if entry.file_type().is_some_and(|kind| kind.is_file()) => {
                let path = entry.path();
                files.push(path.strip_prefix("./").unwrap_or(path).to_path_buf());
            }
            Ok(_) => {}
            Err(err) => log::warn!("Error walking {}: {err}", dir.display()),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TocOptions;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_walks_directories_for_markdown() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("README.md"), "# R").unwrap();
        fs::write(dir.path().join("docs/guide.markdown"), "# G").unwrap();
        fs::write(dir.path().join("docs/notes.txt"), "text").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("README.md"), dir.path().join("docs/guide.markdown")]
        );
    }

    #[test]
    fn test_collect_respects_gitignore() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "drafts/\n").unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("drafts/wip.md"), "# W").unwrap();
        fs::write(dir.path().join("keep.md"), "# K").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![dir.path().join("keep.md")]);
    }

    #[test]
    fn test_collect_keeps_explicit_files_in_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.md");
        let a = dir.path().join("a.txt");
        fs::write(&b, "# B").unwrap();
        fs::write(&a, "# A").unwrap();
        let missing = dir.path().join("missing.md");

        let files = collect_files(&[b.clone(), a.clone(), missing.clone(), b.clone()]).unwrap();
        assert_eq!(files, vec![b, a, missing]);
    }

    #[test]
    fn test_process_file_reports_per_action() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# Chapter\n\n## A\n").unwrap();
        let toc = Toc::new(TocOptions::default());

        let check = process_file(&toc, &path, FileAction::Check);
        assert_eq!(check.report.unwrap(), FileReport::Checked { drift: true });

        let update = process_file(&toc, &path, FileAction::Update(UpdateMode::AutoInsert));
        assert_eq!(update.report.unwrap(), FileReport::Updated(UpdateOutcome::Inserted));

        let outline = process_file(&toc, &path, FileAction::Outline);
        match outline.report.unwrap() {
            FileReport::Outline(headings) => assert_eq!(headings.len(), 2),
            other => panic!("unexpected report {other:?}"),
        }

        let delete = process_file(&toc, &path, FileAction::Delete);
        assert_eq!(delete.report.unwrap(), FileReport::Deleted(true));
    }

    #[test]
    fn test_process_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let toc = Toc::new(TocOptions::default());
        let result = process_file(&toc, &dir.path().join("nope.md"), FileAction::Preview);
        assert!(matches!(result.report, Err(TocError::Io { .. })));
    }
}
