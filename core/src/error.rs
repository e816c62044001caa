use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A source or query file could not be opened or decoded.
    #[error("unable to read {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An index or report destination could not be written.
    #[error("unable to write {path}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An index dump line that does not follow the dump format.
    #[error("malformed index dump at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl Error {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::InputUnreadable { path: path.into(), source }
    }

    pub(crate) fn unwritable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::OutputUnwritable { path: path.into(), source }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::Malformed { line, reason: reason.into() }
    }
}
