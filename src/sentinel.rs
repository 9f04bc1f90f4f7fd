use {
    crate::{
        error::SampleError,
        source::{ProcFile, StatsSource},
        stat::{self, CpuReading, CpuTime},
    },
    log::debug,
};

/// observes the cpu time counters.
///
/// a reading compares the current sample against the previous one, so the sentinel keeps
/// exactly one sample of history. it is owned by whoever drives the polling loop.
pub struct Sentinel<S = ProcFile> {
    /// the underlying source of kernel statistics.
    source: S,
    inner: Inner,
}

enum Inner {
    /// no sample has been taken yet.
    Initialized,
    Running {
        /// the last observed sample.
        last: CpuTime,
    },
}

/// === impl Sentinel ===

impl Sentinel<ProcFile> {
    /// creates a new [`Sentinel`] reading `/proc/stat`.
    pub fn new() -> Self {
        Self::with_source(ProcFile::stat())
    }
}

impl Default for Sentinel<ProcFile> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StatsSource> Sentinel<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            inner: Inner::Initialized,
        }
    }

    /// takes a sample that will serve as the baseline for the next reading.
    ///
    /// any previously retained sample is discarded.
    pub fn warm_up(&mut self) -> Result<(), SampleError> {
        let last = stat::read_cpu(&self.source)?;
        debug!("seeded cpu history");
        self.inner = Inner::Running { last };
        Ok(())
    }

    /// returns a [`CpuReading`] of cpu time since this was last called.
    ///
    /// NB: by virtue of this being a comparison to the previous reading, this will return
    /// [`SampleError::InsufficientHistory`] the first time it is called. that call still
    /// seeds the history, so the next call yields a reading.
    ///
    /// a failed read leaves the history untouched.
    pub fn observe(&mut self) -> Result<CpuReading, SampleError> {
        let Self { source, inner } = self;

        let new = stat::read_cpu(&*source)?;
        match std::mem::replace(inner, Inner::Running { last: new }) {
            Inner::Initialized => Err(SampleError::InsufficientHistory),
            Inner::Running { last } => Ok(stat::derive_usage(&last, &new)),
        }
    }

    /// returns true once a baseline sample has been taken.
    pub fn is_warm(&self) -> bool {
        matches!(self.inner, Inner::Running { .. })
    }
}
