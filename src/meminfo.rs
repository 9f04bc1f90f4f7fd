//! memory counters.
//!
//! see `proc_meminfo(5)`. the source is a sequence of `Key: value kB` lines; only a handful of
//! keys are consulted, and anything else is ignored.

use {
    crate::{
        error::{ParseError, SampleError},
        source::StatsSource,
    },
    log::{debug, trace},
    std::{
        io::{BufRead, BufReader},
        str,
    },
};

/// a snapshot of the system's memory, in kibibytes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemorySnapshot {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    /// used memory as a share of the total, in `[0, 100]`.
    pub usage_percent: f64,
}

/// the raw counters, before any derivation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemInfo {
    pub total: u64,
    /// `None` when the source does not report `MemAvailable`.
    pub available: Option<u64>,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
}

/// reads a [`MemorySnapshot`] from the given source.
pub fn read_memory(stats: &impl StatsSource) -> Result<MemorySnapshot, SampleError> {
    let unavailable = |source| SampleError::SourceUnavailable {
        path: stats.path().to_owned(),
        source,
    };

    let reader = stats.open().map(BufReader::new).map_err(unavailable)?;
    let lines = reader
        .split(b'\n')
        .collect::<Result<Vec<_>, _>>()
        .map_err(unavailable)?;

    // a line that is not valid utf-8 is malformed, and skipped like any other.
    let text = lines.iter().filter_map(|line| match str::from_utf8(line) {
        Ok(line) => Some(line),
        Err(error) => {
            trace!("skipping memory counter line: {error}");
            None
        }
    });

    let info = MemInfo::parse(text).map_err(|source| {
        SampleError::ParseFailure {
            path: stats.path().to_owned(),
            source,
        }
    })?;
    trace!("read memory counters: {info:?}");

    let snapshot = MemorySnapshot::from(info);
    debug!(
        "memory usage {:.1}% ({} of {} kB)",
        snapshot.usage_percent, snapshot.used, snapshot.total
    );

    Ok(snapshot)
}

// === impl MemInfo ===

impl MemInfo {
    /// collects the recognized counters from a sequence of lines.
    ///
    /// malformed lines and unknown keys are skipped. missing keys read as zero. this only
    /// fails if not a single line was well-formed.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, ParseError> {
        let mut info = Self::default();
        let mut recognized = 0_usize;

        for line in lines {
            let Some((key, value)) = Self::parse_line(line) else {
                continue;
            };
            recognized += 1;

            match key {
                "MemTotal" => info.total = value,
                "MemAvailable" => info.available = Some(value),
                "MemFree" => info.free = value,
                "Buffers" => info.buffers = value,
                "Cached" => info.cached = value,
                _ => {}
            }
        }

        if recognized == 0 {
            return Err(ParseError::Empty);
        }

        Ok(info)
    }

    /// splits a `Key: value kB` line.
    ///
    /// a few keys, such as `HugePages_Total`, carry no unit; those are accepted as well.
    fn parse_line(line: &str) -> Option<(&str, u64)> {
        let (key, rest) = line.split_once(':')?;
        let mut tokens = rest.split_whitespace();
        let value = tokens.next()?.parse::<u64>().ok()?;

        match (tokens.next(), tokens.next()) {
            (None | Some(Self::UNIT), None) => Some((key.trim(), value)),
            _ => None,
        }
    }

    const UNIT: &str = "kB";
}

// === impl MemorySnapshot ===

impl From<MemInfo> for MemorySnapshot {
    fn from(
        MemInfo {
            total,
            available,
            free,
            buffers,
            cached,
        }: MemInfo,
    ) -> Self {
        // without `MemAvailable`, treat buffers and cache as reclaimable.
        let (used, available) = match available {
            Some(available) => (total.saturating_sub(available), available),
            None => {
                let reclaimable = free.saturating_add(buffers).saturating_add(cached);
                (total.saturating_sub(reclaimable), reclaimable)
            }
        };
        let available = available.min(total);

        let usage_percent = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };

        Self {
            total,
            available,
            used,
            free,
            buffers,
            cached,
            usage_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::source::MockSource};

    const PROC_MEMINFO: &str = "\
MemTotal:        8000000 kB
MemFree:          500000 kB
MemAvailable:    2500000 kB
Buffers:          100000 kB
Cached:          1500000 kB
SwapCached:            0 kB
HugePages_Total:       0
Hugepagesize:       2048 kB
";

    #[test]
    fn reads_available() {
        let source = MockSource::new([PROC_MEMINFO]);
        let snapshot = read_memory(&source).unwrap();

        assert_eq!(snapshot.total, 8_000_000);
        assert_eq!(snapshot.available, 2_500_000);
        assert_eq!(snapshot.used, 5_500_000);
        assert_eq!(snapshot.free, 500_000);
        assert_eq!(snapshot.buffers, 100_000);
        assert_eq!(snapshot.cached, 1_500_000);
        assert_eq!(snapshot.usage_percent, 68.75);
    }

    #[test]
    fn fallback_without_available() {
        let info = MemInfo {
            total: 1000,
            available: None,
            free: 200,
            buffers: 50,
            cached: 250,
        };
        let snapshot = MemorySnapshot::from(info);

        assert_eq!(snapshot.used, 500);
        assert_eq!(snapshot.available, 500);
        assert_eq!(snapshot.usage_percent, 50.0);
    }

    #[test]
    fn fallback_from_source() {
        let source = MockSource::new([
            "MemTotal: 1000 kB\nMemFree: 200 kB\nBuffers: 50 kB\nCached: 250 kB\n",
        ]);
        let snapshot = read_memory(&source).unwrap();

        assert_eq!(snapshot.used, 500);
        assert_eq!(snapshot.available, 500);
    }

    #[test]
    fn zero_total() {
        let snapshot = MemorySnapshot::from(MemInfo::default());
        assert_eq!(snapshot.usage_percent, 0.0);
        assert_eq!(snapshot.used, 0);
    }

    /// buffers and cache larger than the total are clamped rather than underflowing.
    #[test]
    fn fallback_is_clamped() {
        let info = MemInfo {
            total: 1000,
            available: None,
            free: 600,
            buffers: 300,
            cached: 400,
        };
        let snapshot = MemorySnapshot::from(info);

        assert_eq!(snapshot.used, 0);
        assert_eq!(snapshot.available, 1000);
        assert_eq!(snapshot.usage_percent, 0.0);
    }

    #[test]
    fn available_above_total_is_clamped() {
        let info = MemInfo {
            total: 1000,
            available: Some(4000),
            ..MemInfo::default()
        };
        let snapshot = MemorySnapshot::from(info);

        assert_eq!(snapshot.used, 0);
        assert_eq!(snapshot.available, 1000);
    }

    #[test]
    fn zero_available_is_reported() {
        let info = MemInfo {
            total: 1000,
            available: Some(0),
            free: 200,
            ..MemInfo::default()
        };
        let snapshot = MemorySnapshot::from(info);

        assert_eq!(snapshot.used, 1000);
        assert_eq!(snapshot.usage_percent, 100.0);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let info = MemInfo::parse([
            "MemTotal: 1000 kB",
            "MemFree: lots kB",
            "garbage",
            "Cached: 100 MB",
            "Buffers: 10 kB",
        ])
        .unwrap();

        assert_eq!(
            info,
            MemInfo {
                total: 1000,
                available: None,
                free: 0,
                buffers: 10,
                cached: 0,
            }
        );
    }

    #[test]
    fn unknown_keys_only() {
        let info = MemInfo::parse(["Shmem: 12 kB", "Active: 40 kB"]).unwrap();
        assert_eq!(info, MemInfo::default());
    }

    #[test]
    fn empty() {
        let source = MockSource::new([""]);
        let err = read_memory(&source).unwrap_err();
        assert!(matches!(
            err,
            SampleError::ParseFailure {
                source: ParseError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn unavailable() {
        let source = MockSource::default();
        let err = read_memory(&source).unwrap_err();
        assert!(matches!(err, SampleError::SourceUnavailable { .. }));
    }

    mod proc_file {
        use {
            super::*,
            crate::source::ProcFile,
            std::{fs, io},
        };

        fn fixture(dir: &tempfile::TempDir, contents: &[u8]) -> ProcFile {
            let path = dir.path().join("meminfo");
            fs::write(&path, contents).unwrap();
            ProcFile::new(path)
        }

        #[test]
        fn reads_file() {
            let dir = tempfile::tempdir().unwrap();
            let source = fixture(&dir, PROC_MEMINFO.as_bytes());
            let snapshot = read_memory(&source).unwrap();

            assert_eq!(snapshot.total, 8_000_000);
            assert_eq!(snapshot.usage_percent, 68.75);
        }

        #[test]
        fn missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let source = ProcFile::new(dir.path().join("meminfo"));
            match read_memory(&source).unwrap_err() {
                SampleError::SourceUnavailable { source, .. } => {
                    assert_eq!(source.kind(), io::ErrorKind::NotFound);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        /// a line that is not text is skipped, and the rest of the counters survive.
        #[test]
        fn invalid_utf8_line_is_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let source = fixture(
                &dir,
                b"MemTotal: 1000 kB\nMemAvailable: 250 kB\nWeird\xff: 1 kB\nCached: 10 kB\n",
            );
            let snapshot = read_memory(&source).unwrap();

            assert_eq!(snapshot.total, 1000);
            assert_eq!(snapshot.available, 250);
            assert_eq!(snapshot.cached, 10);
            assert_eq!(snapshot.usage_percent, 75.0);
        }
    }
}
