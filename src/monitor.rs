use {
    crate::{
        disk::{self, DiskSnapshot},
        error::SampleError,
        meminfo::{self, MemorySnapshot},
        sentinel::Sentinel,
        severity::Thresholds,
        source::{ProcFile, StatsSource},
        stat::CpuReading,
    },
    log::warn,
    std::{fmt, num::NonZeroU64, path::PathBuf, time::Duration},
    thiserror::Error,
};

/// what to sample, and how often.
///
/// this is fixed for the life of the polling loop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollConfig {
    /// seconds between ticks.
    pub refresh: NonZeroU64,
    pub cpu: bool,
    pub memory: bool,
    pub disk: bool,
    /// the path whose filesystem is sampled.
    pub disk_path: PathBuf,
    /// sample once and exit, rather than polling continuously.
    pub once: bool,
}

/// a family of metrics.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
}

/// a failure to sample one [`Metric`].
#[derive(Debug, Error)]
#[error("{metric}: {error}")]
pub struct MetricError {
    pub metric: Metric,
    #[source]
    pub error: SampleError,
}

/// the result of one tick.
///
/// each enabled metric either has a value or an entry in `errors`. a disabled metric has
/// neither.
#[derive(Debug, Default)]
pub struct Sample {
    pub cpu: Option<CpuReading>,
    pub memory: Option<MemorySnapshot>,
    pub disk: Option<DiskSnapshot>,
    pub errors: Vec<MetricError>,
}

/// samples every enabled metric, keeping the cpu history between ticks.
pub struct Monitor<S = ProcFile, M = ProcFile> {
    sentinel: Sentinel<S>,
    meminfo: M,
}

// === impl PollConfig ===

impl PollConfig {
    /// how long to wait between the cpu baseline read and the first reading.
    ///
    /// this does not depend on the refresh rate.
    pub const WARM_UP: Duration = Duration::from_secs(1);

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh.get())
    }

    pub fn is_enabled(&self, metric: Metric) -> bool {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Memory => self.memory,
            Metric::Disk => self.disk,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            refresh: NonZeroU64::MIN,
            cpu: true,
            memory: true,
            disk: true,
            disk_path: PathBuf::from("/"),
            once: false,
        }
    }
}

// === impl Metric ===

impl Metric {
    pub const ALL: [Self; 3] = [Self::Cpu, Self::Memory, Self::Disk];

    pub fn thresholds(self) -> Thresholds {
        match self {
            Self::Cpu => Thresholds::CPU,
            Self::Memory => Thresholds::MEMORY,
            Self::Disk => Thresholds::DISK,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Disk => "disk",
        })
    }
}

// === impl Sample ===

impl Sample {
    /// returns the error recorded for `metric` this tick, if any.
    pub fn error(&self, metric: Metric) -> Option<&SampleError> {
        self.errors
            .iter()
            .find(|e| e.metric == metric)
            .map(|e| &e.error)
    }

    /// records the outcome of sampling one metric.
    fn record<T>(&mut self, metric: Metric, result: Result<T, SampleError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                if !error.is_warming_up() {
                    warn!("failed to sample {metric}: {error}");
                }
                self.errors.push(MetricError { metric, error });
                None
            }
        }
    }
}

// === impl Monitor ===

impl Monitor<ProcFile, ProcFile> {
    /// a monitor reading `/proc/stat` and `/proc/meminfo`.
    pub fn new() -> Self {
        Self::with_sources(ProcFile::stat(), ProcFile::meminfo())
    }
}

impl Default for Monitor<ProcFile, ProcFile> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StatsSource, M: StatsSource> Monitor<S, M> {
    pub fn with_sources(stat: S, meminfo: M) -> Self {
        Self {
            sentinel: Sentinel::with_source(stat),
            meminfo,
        }
    }

    /// takes the discarded first cpu sample, if cpu sampling is enabled.
    pub fn warm_up(&mut self, config: &PollConfig) -> Result<(), SampleError> {
        if config.cpu {
            self.sentinel.warm_up()?;
        }
        Ok(())
    }

    /// samples every metric enabled by `config`.
    ///
    /// a failure in one metric does not prevent the others from being sampled.
    pub fn sample_once(&mut self, config: &PollConfig) -> Sample {
        let mut sample = Sample::default();

        if config.cpu {
            let result = self.sentinel.observe();
            sample.cpu = sample.record(Metric::Cpu, result);
        }

        if config.memory {
            let result = meminfo::read_memory(&self.meminfo);
            sample.memory = sample.record(Metric::Memory, result);
        }

        if config.disk {
            let result = disk::read_disk(&config.disk_path);
            sample.disk = sample.record(Metric::Disk, result);
        }

        sample
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::source::MockSource};

    const STAT_1: &str = "cpu 100 0 100 800 0 0 0 0\n";
    const STAT_2: &str = "cpu 150 0 150 900 0 0 0 0\n";
    const MEMINFO: &str = "MemTotal: 8000000 kB\nMemAvailable: 2500000 kB\n";

    fn temp_config(dir: &tempfile::TempDir) -> PollConfig {
        PollConfig {
            disk_path: dir.path().to_owned(),
            ..PollConfig::default()
        }
    }

    #[test]
    fn samples_everything() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);
        let mut monitor =
            Monitor::with_sources(MockSource::new([STAT_1, STAT_2]), MockSource::new([MEMINFO]));

        monitor.warm_up(&config).unwrap();
        let sample = monitor.sample_once(&config);

        assert!(sample.errors.is_empty(), "{:?}", sample.errors);
        assert_eq!(sample.cpu.unwrap().usage_percent, 50.0);
        assert_eq!(sample.memory.unwrap().usage_percent, 68.75);
        assert_eq!(sample.disk.unwrap().path, dir.path());
    }

    /// without a warm-up read, cpu reports that it has no data yet, which is not zero usage.
    #[test]
    fn cpu_without_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);
        let mut monitor = Monitor::with_sources(
            MockSource::new([STAT_1, STAT_2]),
            MockSource::new([MEMINFO, MEMINFO]),
        );

        let sample = monitor.sample_once(&config);
        assert!(sample.cpu.is_none());
        assert!(sample.error(Metric::Cpu).unwrap().is_warming_up());
        assert!(sample.memory.is_some());

        let sample = monitor.sample_once(&config);
        assert!(sample.cpu.is_some());
        assert!(sample.error(Metric::Cpu).is_none());
    }

    #[test]
    fn failures_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let config = PollConfig {
            disk_path: dir.path().join("missing"),
            ..PollConfig::default()
        };
        let mut monitor =
            Monitor::with_sources(MockSource::new([STAT_1, STAT_2]), MockSource::default());

        monitor.warm_up(&config).unwrap();
        let sample = monitor.sample_once(&config);

        assert!(sample.cpu.is_some());
        assert!(sample.memory.is_none());
        assert!(sample.disk.is_none());
        assert!(matches!(
            sample.error(Metric::Memory),
            Some(SampleError::SourceUnavailable { .. })
        ));
        assert!(matches!(
            sample.error(Metric::Disk),
            Some(SampleError::PathUnavailable { .. })
        ));
        assert_eq!(sample.errors.len(), 2);
    }

    #[test]
    fn disabled_metrics_are_skipped() {
        let config = PollConfig {
            cpu: false,
            disk: false,
            ..PollConfig::default()
        };
        let mut monitor =
            Monitor::with_sources(MockSource::default(), MockSource::new([MEMINFO]));

        monitor.warm_up(&config).unwrap();
        let sample = monitor.sample_once(&config);

        assert!(sample.cpu.is_none());
        assert!(sample.disk.is_none());
        assert!(sample.memory.is_some());
        assert!(sample.errors.is_empty());
    }

    #[test]
    fn default_config() {
        let config = PollConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert!(Metric::ALL.into_iter().all(|m| config.is_enabled(m)));
        assert_eq!(config.disk_path, PathBuf::from("/"));
        assert!(!config.once);
    }

    #[test]
    fn warm_up_ignores_refresh_rate() {
        let config = PollConfig {
            refresh: NonZeroU64::new(30).unwrap(),
            ..PollConfig::default()
        };
        assert_eq!(PollConfig::WARM_UP, Duration::from_secs(1));
        assert!(PollConfig::WARM_UP < config.interval());
    }

    #[test]
    fn metric_error_display() {
        let error = MetricError {
            metric: Metric::Cpu,
            error: SampleError::InsufficientHistory,
        };
        assert!(error.to_string().starts_with("cpu: insufficient cpu history"));
    }
}
