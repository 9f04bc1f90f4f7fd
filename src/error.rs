use {
    std::{io, num::ParseIntError, path::PathBuf, str::Utf8Error},
    thiserror::Error,
};

/// an error encountered while sampling one metric family.
///
/// these are reported per-metric and are never fatal to a tick.
#[derive(Debug, Error)]
pub enum SampleError {
    /// the counter source could not be opened or read.
    #[error("counter source {} is unavailable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// the counter source was read, but its contents could not be understood.
    #[error("failed to parse {}: {source}", .path.display())]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    /// the disk target does not exist or could not be queried.
    #[error("filesystem at {} is unavailable: {source}", .path.display())]
    PathUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// a cpu reading was requested before two samples were taken.
    #[error("insufficient cpu history, at least two samples are required")]
    InsufficientHistory,
}

/// structural problems found in a counter source.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("no aggregate cpu line")]
    MissingCpuLine,
    #[error("missing mandatory counter `{name}`")]
    MissingCounter { name: &'static str },
    #[error("invalid value for counter `{name}`: {source}")]
    InvalidCounter {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("counter line is not valid utf-8: {source}")]
    InvalidUtf8 {
        #[source]
        source: Utf8Error,
    },
    #[error("source contained no counters")]
    Empty,
}

// === impl SampleError ===

impl SampleError {
    /// returns true if this error means "no data yet", rather than a failure.
    pub fn is_warming_up(&self) -> bool {
        matches!(self, Self::InsufficientHistory)
    }
}
