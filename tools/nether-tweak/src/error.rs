//! Error types for nether-tweak

use std::io;
use std::path::{Path, PathBuf};

/// A matched numeral token that could not be turned into a replacement value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert numeral '{token}': {reason}")]
pub struct NumeralError {
    /// The matched token, as it appeared on the line
    pub token: String,
    pub reason: &'static str,
}

impl NumeralError {
    pub(crate) fn new(token: &[u8], reason: &'static str) -> Self {
        Self {
            token: String::from_utf8_lossy(token).into_owned(),
            reason,
        }
    }
}

/// Errors raised while tweaking a text asset
#[derive(Debug, thiserror::Error)]
pub enum TweakError {
    /// Input file missing, unreadable, or failed mid-read
    #[error("failed to read input file {}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read failure on an input stream with no known path
    #[error("failed to read input")]
    Read(#[source] io::Error),

    /// Numeral on a line could not be converted; the line was not written
    #[error("invalid numeral on line {line}")]
    Parse {
        /// 1-based line number
        line: usize,
        #[source]
        source: NumeralError,
    },

    /// Output sink rejected a write
    #[error("failed to write output")]
    Write(#[from] io::Error),
}

impl TweakError {
    /// Attach the input path to anonymous read failures.
    pub fn with_input_path(self, path: &Path) -> Self {
        match self {
            TweakError::Read(source) => TweakError::FileAccess {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
