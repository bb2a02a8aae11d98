/// Parallel file processing for mdtoc
///
/// Files are independent of each other, so a batch is spread over the rayon
/// thread pool. Results always come back in input order.
use crate::file_processor::{FileAction, FileResult, process_file};
use crate::toc::Toc;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable/disable parallel execution
    pub enabled: bool,
    /// Number of threads to use (None = auto-detect)
    pub thread_count: Option<usize>,
    /// Minimum number of files to enable parallel execution
    pub min_file_count: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thread_count: None,
            min_file_count: 2,
        }
    }
}

/// File-level parallel processing for multiple files
pub struct FileParallelProcessor {
    config: ParallelConfig,
}

impl FileParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(ParallelConfig::default())
    }

    /// Process every file, one result per input path
    pub fn process_files(&self, toc: &Toc, files: &[PathBuf], action: FileAction) -> Vec<FileResult> {
        if !self.should_use_parallel(files) {
            return files.iter().map(|path| process_file(toc, path, action)).collect();
        }

        let run = || -> Vec<FileResult> {
            files
                .par_iter()
                .map(|path| {
                    let start = Instant::now();
                    let result = process_file(toc, path, action);
                    let duration = start.elapsed();

                    if duration.as_millis() > 1000 {
                        log::debug!("File {} took {:?}", path.display(), duration);
                    }

                    result
                })
                .collect()
        };

        match self.config.thread_count {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(err) => {
                    log::warn!("Failed to build a thread pool with {threads} threads: {err}");
                    run()
                }
            },
            None => run(),
        }
    }

    /// Determine if file-level parallel processing should be used
    pub fn should_use_parallel(&self, files: &[PathBuf]) -> bool {
        self.config.enabled && files.len() >= self.config.min_file_count && rayon::current_num_threads() > 1
    }
}
