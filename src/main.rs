use anyhow::{Context, bail};
use clap::Parser;
use colored::*;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use mdtoc_lib::config::Config;
use mdtoc_lib::exit_codes::RunStatus;
use mdtoc_lib::file_processor::{FileAction, FileReport, FileResult, collect_files};
use mdtoc_lib::toc::{Toc, UpdateOutcome};

mod cli_types;

use cli_types::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(status) => status.exit(),
        Err(err) => {
            eprintln!("{}: {err:#}", "Error".red().bold());
            RunStatus::Failed.exit();
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<RunStatus> {
    let config = if cli.no_config {
        Config::default()
    } else {
        Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?
    };

    let options = cli.toc_options(config.to_options());
    options.validate()?;

    let marker = cli.marker.as_deref().unwrap_or(&config.marker);
    let toc = Toc::new(options).with_marker(marker);

    let paths = input_paths(cli)?;
    if paths.is_empty() {
        bail!("No input files. Pass paths or pipe a list of files on stdin");
    }
    let files = collect_files(&paths).context("Failed to collect Markdown files")?;
    if files.is_empty() {
        log::warn!("No Markdown files found");
        return Ok(RunStatus::Clean);
    }

    let action = cli.action();
    let results = process(&toc, &files, action);
    report(&results, action, cli.quiet)
}

/// Paths from the command line, or one per line from piped stdin
fn input_paths(cli: &Cli) -> anyhow::Result<Vec<PathBuf>> {
    if !cli.paths.is_empty() {
        return Ok(cli.paths.clone());
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read file list from stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    log::debug!("Read {} paths from stdin", paths.len());
    Ok(paths)
}

#[cfg(feature = "parallel")]
fn process(toc: &Toc, files: &[PathBuf], action: FileAction) -> Vec<FileResult> {
    mdtoc_lib::parallel::FileParallelProcessor::with_default_config().process_files(toc, files, action)
}

#[cfg(not(feature = "parallel"))]
fn process(toc: &Toc, files: &[PathBuf], action: FileAction) -> Vec<FileResult> {
    files
        .iter()
        .map(|path| mdtoc_lib::file_processor::process_file(toc, path, action))
        .collect()
}

/// Print results in input order and pick the exit status
fn report(results: &[FileResult], action: FileAction, quiet: bool) -> anyhow::Result<RunStatus> {
    let mut status = RunStatus::Clean;
    let mut previews = Vec::new();
    let mut outlines = Vec::new();

    for result in results {
        let path = display_path(&result.path);
        let report = match &result.report {
            Ok(report) => report,
            Err(err) => {
                eprintln!("{}: {path}: {err}", "Error".red().bold());
                status = status.max(RunStatus::Failed);
                continue;
            }
        };

        match report {
            FileReport::Preview(toc) => {
                if !toc.is_empty() {
                    previews.push((path, toc.as_str()));
                }
            }
            FileReport::Outline(headings) => {
                outlines.push(serde_json::json!({ "path": path, "headings": headings }));
            }
            FileReport::Updated(outcome) => {
                if !quiet {
                    match outcome {
                        UpdateOutcome::Inserted => println!("{path}: {}", "TOC inserted".green()),
                        UpdateOutcome::Updated => println!("{path}: {}", "TOC updated".green()),
                        UpdateOutcome::Unchanged => println!("{path}: {}", "up to date".dimmed()),
                    }
                }
            }
            FileReport::Deleted(removed) => {
                if *removed && !quiet {
                    println!("{path}: {}", "TOC removed".green());
                } else if !removed {
                    log::debug!("{path}: no TOC block to remove");
                }
            }
            FileReport::Checked { drift: stale } => {
                if *stale {
                    status = status.max(RunStatus::Drift);
                    if !quiet {
                        println!("{path}: {}", "TOC out of date".yellow());
                    }
                }
            }
        }
    }

    match action {
        FileAction::Preview => print_previews(&previews, results.len() > 1),
        FileAction::Outline => println!(
            "{}",
            serde_json::to_string_pretty(&outlines).context("Failed to serialize outline")?
        ),
        _ => {}
    }

    Ok(status)
}

/// A single file prints its TOC as is; a batch heads each TOC with its path
fn print_previews(previews: &[(String, &str)], batch: bool) {
    if !batch {
        for (_, toc) in previews {
            println!("{toc}");
        }
        return;
    }
    let sections: Vec<String> = previews
        .iter()
        .map(|(path, toc)| format!("## {path}\n\n{toc}"))
        .collect();
    if !sections.is_empty() {
        println!("{}", sections.join("\n\n"));
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
