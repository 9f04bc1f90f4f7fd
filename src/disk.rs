//! filesystem capacity.
//!
//! NB: `used` counts every block that is not free, while `available` counts only the blocks an
//! unprivileged user may still write to. when the filesystem reserves blocks for root these two
//! figures do not add up to `total`; both are kept as reported.

use {
    crate::error::SampleError,
    log::debug,
    nix::sys::statvfs::statvfs,
    std::{
        io,
        path::{Path, PathBuf},
    },
};

/// capacity of the filesystem holding some path, in bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct DiskSnapshot {
    /// the path that was queried.
    pub path: PathBuf,
    pub total: u64,
    pub used: u64,
    pub available: u64,
    /// used space as a share of the total, in `[0, 100]`.
    pub usage_percent: f64,
}

/// block statistics for a filesystem, as reported by `statvfs(3)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FsStats {
    /// the total number of blocks.
    pub blocks: u64,
    /// the number of free blocks.
    pub free_blocks: u64,
    /// the number of free blocks available to unprivileged users.
    pub available_blocks: u64,
    /// the fragment size, which all block counts are measured in.
    pub block_size: u64,
}

/// reads a [`DiskSnapshot`] for the filesystem holding `path`.
///
/// failures are reported as [`SampleError::PathUnavailable`] and are not retried.
pub fn read_disk(path: impl AsRef<Path>) -> Result<DiskSnapshot, SampleError> {
    let path = path.as_ref();
    let stats = FsStats::query(path).map_err(|source| SampleError::PathUnavailable {
        path: path.to_owned(),
        source,
    })?;

    let snapshot = DiskSnapshot::new(path, stats);
    debug!(
        "disk usage {:.1}% at {} ({} of {} bytes)",
        snapshot.usage_percent,
        path.display(),
        snapshot.used,
        snapshot.total
    );

    Ok(snapshot)
}

// === impl FsStats ===

impl FsStats {
    /// queries the filesystem holding `path`.
    #[allow(clippy::unnecessary_cast, reason = "these widths vary by platform")]
    pub fn query(path: &Path) -> io::Result<Self> {
        let stats = statvfs(path)?;

        Ok(Self {
            blocks: stats.blocks() as u64,
            free_blocks: stats.blocks_free() as u64,
            available_blocks: stats.blocks_available() as u64,
            block_size: stats.fragment_size() as u64,
        })
    }
}

// === impl DiskSnapshot ===

impl DiskSnapshot {
    /// derives capacity figures from raw block statistics.
    pub fn new(path: impl Into<PathBuf>, stats: FsStats) -> Self {
        let FsStats {
            blocks,
            free_blocks,
            available_blocks,
            block_size,
        } = stats;

        let total = blocks.saturating_mul(block_size);
        let used = total.saturating_sub(free_blocks.saturating_mul(block_size));
        let available = available_blocks.saturating_mul(block_size);

        let usage_percent = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };

        Self {
            path: path.into(),
            total,
            used,
            available,
            usage_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_from_blocks() {
        let stats = FsStats {
            blocks: 1000,
            free_blocks: 200,
            available_blocks: 200,
            block_size: 4096,
        };
        let snapshot = DiskSnapshot::new("/", stats);

        assert_eq!(snapshot.total, 4_096_000);
        assert_eq!(snapshot.used, 3_276_800);
        assert_eq!(snapshot.available, 819_200);
        assert_eq!(snapshot.usage_percent, 80.0);
    }

    /// reserved blocks count towards neither used nor available.
    #[test]
    fn reserved_blocks() {
        let stats = FsStats {
            blocks: 1000,
            free_blocks: 200,
            available_blocks: 150,
            block_size: 1024,
        };
        let snapshot = DiskSnapshot::new("/", stats);

        assert_eq!(snapshot.used, 800 * 1024);
        assert_eq!(snapshot.available, 150 * 1024);
        assert!(snapshot.used + snapshot.available < snapshot.total);
    }

    #[test]
    fn empty_filesystem() {
        let snapshot = DiskSnapshot::new("/proc", FsStats::default());
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.usage_percent, 0.0);
    }

    #[test]
    fn free_exceeds_total() {
        let stats = FsStats {
            blocks: 10,
            free_blocks: 20,
            available_blocks: 20,
            block_size: 512,
        };
        let snapshot = DiskSnapshot::new("/", stats);

        assert_eq!(snapshot.used, 0);
        assert_eq!(snapshot.usage_percent, 0.0);
    }

    #[test]
    fn reads_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = read_disk(dir.path()).unwrap();

        assert_eq!(snapshot.path, dir.path());
        assert!(snapshot.used <= snapshot.total);
        assert!((0.0..=100.0).contains(&snapshot.usage_percent));
    }

    #[test]
    fn missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = read_disk(&missing).unwrap_err();

        match err {
            SampleError::PathUnavailable { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn interior_nul() {
        match read_disk("/tmp\0/x").unwrap_err() {
            SampleError::PathUnavailable { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
