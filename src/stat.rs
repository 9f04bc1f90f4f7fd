use {
    crate::{
        error::{ParseError, SampleError},
        source::StatsSource,
    },
    log::{debug, trace, warn},
    std::{
        io::{BufRead, BufReader},
        str::{self, FromStr},
    },
};

pub use self::{
    cpu_time::{CpuReading, CpuTime, Measurement},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;


/// reads one sample of the aggregate cpu time counters.
///
/// see `proc_stat(5)` for more information. only the aggregate `cpu` line is consulted; per-cpu
/// lines and other entries are skipped.
pub fn read_cpu(stats: &impl StatsSource) -> Result<CpuTime, SampleError> {
    let unavailable = |source| SampleError::SourceUnavailable {
        path: stats.path().to_owned(),
        source,
    };
    let malformed = |source| SampleError::ParseFailure {
        path: stats.path().to_owned(),
        source,
    };

    // lines are split as bytes, so that text problems are told apart from i/o failures.
    let reader = stats.open().map(BufReader::new).map_err(unavailable)?;
    for line in reader.split(b'\n') {
        let line = line.map_err(unavailable)?;
        let tag = line
            .split(u8::is_ascii_whitespace)
            .find(|token| !token.is_empty());
        if tag != Some(CpuTime::TAG.as_bytes()) {
            continue;
        }

        let line = str::from_utf8(&line)
            .map_err(|source| malformed(ParseError::InvalidUtf8 { source }))?;
        let time = line.parse::<CpuTime>().map_err(malformed)?;
        trace!("read cpu sample: {time:?}, {} ticks total", time.total());
        return Ok(time);
    }

    Err(malformed(ParseError::MissingCpuLine))
}

/// derives utilization from two consecutive samples.
pub fn derive_usage(prev: &CpuTime, curr: &CpuTime) -> CpuReading {
    CpuReading::new(prev, curr)
}
