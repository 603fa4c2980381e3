use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Something that went wrong during a batch run.
///
/// None of these stop the run from returning: an `Open` issue ends it with
/// no results, `Read` keeps what was gathered so far, `Parse` skips one line
/// and `Write` leaves the in-memory results untouched.
#[derive(Debug, Error)]
pub enum BatchIssue {
    #[error("the file '{}' could not be opened: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("read failed at line {line}, remaining lines abandoned: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("error writing to output file '{}': {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

impl BatchIssue {
    /// True when the issue cost the run more than a single line.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchIssue::Parse { .. })
    }

    pub(crate) fn emit(&self) {
        if self.is_terminal() {
            tracing::error!("{self}");
        } else {
            tracing::warn!("{self}");
        }
    }
}
