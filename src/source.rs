use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

#[cfg(test)]
pub use self::mock::MockSource;

/// a source of kernel statistics.
pub trait StatsSource {
    /// returns a reader.
    fn open(&self) -> io::Result<impl Read>;

    /// the location this source reads from, for diagnostics.
    fn path(&self) -> &Path;
}

/// stats backed by a file, such as `/proc/stat`.
#[derive(Clone, Debug)]
pub struct ProcFile {
    path: PathBuf,
}

// === impl ProcFile ===

impl StatsSource for ProcFile {
    fn open(&self) -> io::Result<impl Read> {
        File::open(&self.path).map(BufReader::new)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl ProcFile {
    const STAT: &str = "/proc/stat";
    const MEMINFO: &str = "/proc/meminfo";

    /// a source reading from an arbitrary path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// the aggregate cpu time counters.
    pub fn stat() -> Self {
        Self::new(Self::STAT)
    }

    /// the memory counters.
    pub fn meminfo() -> Self {
        Self::new(Self::MEMINFO)
    }
}
