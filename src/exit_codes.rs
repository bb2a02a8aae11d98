//! Process exit codes.
//!
//! `--check` runs in CI, where a stale TOC and a failed run need different
//! codes: 0 when everything is current, 1 when a TOC is missing or out of
//! date, 2 when configuration, input or file access failed.

pub const SUCCESS: i32 = 0;

/// `--check` saw at least one file whose TOC needs updating
pub const DRIFT_FOUND: i32 = 1;

/// Configuration error, invalid options, stray markers or file access error
pub const TOOL_ERROR: i32 = 2;

/// Overall result of a run. Variants are ordered from best to worst, so a
/// batch reports the maximum over its files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStatus {
    #[default]
    Clean,
    Drift,
    Failed,
}

impl RunStatus {
    pub fn code(self) -> i32 {
        match self {
            RunStatus::Clean => SUCCESS,
            RunStatus::Drift => DRIFT_FOUND,
            RunStatus::Failed => TOOL_ERROR,
        }
    }

    /// Terminate the process with this status
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}
