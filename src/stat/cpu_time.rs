use super::*;

/// the aggregate time the system's cpus spent in each state, as of one read of the source.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    pub user: UserHz,
    /// time spent in user mode with low priority (nice).
    pub nice: UserHz,
    /// time spent in system mode.
    pub system: UserHz,
    /// time spent in the idle task.
    pub idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable, and may decrease in certain conditions.
    pub iowait: UserHz,
    /// time servicing interrupts.
    pub irq: UserHz,
    /// time servicing softirqs.
    pub softirq: UserHz,
    /// stolen time, which is the time spent in other operating systems when running in a
    /// virtualized environment.
    pub steal: UserHz,
}

/// a measurement of the difference between two [`CpuTime`]s.
///
/// each field is signed. a negative value means the counter went backwards between samples.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Measurement {
    pub user: i64,
    pub nice: i64,
    pub system: i64,
    pub idle: i64,
    pub iowait: i64,
    pub irq: i64,
    pub softirq: i64,
    pub steal: i64,
}

/// cpu utilization derived from two consecutive samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuReading {
    /// the share of non-idle time, in `[0, 100]`.
    pub usage_percent: f64,
    /// the share of time spent in user mode.
    pub user_share: f64,
    /// the share of time spent in system mode.
    pub system_share: f64,
    /// the share of time spent idle or waiting on i/o.
    pub idle_share: f64,
    /// the raw per-bucket deltas the shares were computed from.
    pub delta: Measurement,
}

// === impl CpuTime ===

impl CpuTime {
    /// the tag that begins the aggregate line.
    pub(super) const TAG: &str = "cpu";

    /// counter names, in the order they appear on the aggregate line.
    pub(super) const COUNTERS: [&str; 8] = [
        "user", "nice", "system", "idle", "iowait", "irq", "softirq", "steal",
    ];

    /// the first four counters must be present; older kernels omit the rest.
    pub(super) const MANDATORY: usize = 4;

    /// the sum of all eight counters.
    pub fn total(&self) -> u128 {
        <[UserHz; 8]>::from(*self)
            .into_iter()
            .map(|hz| u128::from(hz.get()))
            .sum()
    }
}

impl FromStr for CpuTime {
    type Err = ParseError;

    /// parses the aggregate `cpu` line of the cpu counter source.
    ///
    /// counters are read left to right until one is missing or malformed. the mandatory
    /// counters must all be read; any optional counter after the stopping point is zero.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(Self::TAG) {
            return Err(ParseError::MissingCpuLine);
        }

        let mut counters = [UserHz::default(); 8];
        for (i, name) in Self::COUNTERS.into_iter().enumerate() {
            let parsed = match tokens.next() {
                Some(token) => token.parse::<UserHz>().map_err(|source| {
                    ParseError::InvalidCounter { name, source }
                }),
                None => Err(ParseError::MissingCounter { name }),
            };

            match parsed {
                Ok(hz) => counters[i] = hz,
                Err(error) if i < Self::MANDATORY => return Err(error),
                Err(ParseError::MissingCounter { .. }) => break,
                Err(error) => {
                    warn!("ignoring remaining cpu counters: {error}");
                    break;
                }
            }
        }

        Ok(Self::from(counters))
    }
}

impl From<[UserHz; 8]> for CpuTime {
    fn from([user, nice, system, idle, iowait, irq, softirq, steal]: [UserHz; 8]) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        }
    }
}

impl From<CpuTime> for [UserHz; 8] {
    fn from(
        CpuTime {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        }: CpuTime,
    ) -> Self {
        [user, nice, system, idle, iowait, irq, softirq, steal]
    }
}

// === impl Measurement ===

impl Measurement {
    pub fn new(prev: &CpuTime, curr: &CpuTime) -> Self {
        let prev: [UserHz; 8] = (*prev).into();
        let curr: [UserHz; 8] = (*curr).into();

        let mut deltas = [0_i64; 8];
        for (delta, (then, now)) in deltas.iter_mut().zip(prev.into_iter().zip(curr)) {
            *delta = now.since(then);
        }
        let [user, nice, system, idle, iowait, irq, softirq, steal] = deltas;

        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        }
    }

    /// returns true if any counter went backwards.
    pub fn regressed(&self) -> bool {
        self.buckets().into_iter().any(|delta| delta < 0)
    }

    /// the change in idle and iowait time.
    pub fn idle_total(&self) -> i128 {
        i128::from(self.idle) + i128::from(self.iowait)
    }

    /// the change in all eight counters.
    pub fn total(&self) -> i128 {
        self.buckets().into_iter().map(i128::from).sum()
    }

    fn buckets(&self) -> [i64; 8] {
        let Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        } = *self;

        [user, nice, system, idle, iowait, irq, softirq, steal]
    }
}

// === impl CpuReading ===

impl CpuReading {
    /// derives utilization from a previous and a current sample.
    ///
    /// a zero total delta yields zero everywhere. counter regressions never produce a usage
    /// outside of `[0, 100]`.
    pub fn new(prev: &CpuTime, curr: &CpuTime) -> Self {
        let delta = Measurement::new(prev, curr);
        if delta.regressed() {
            warn!("cpu counters went backwards between samples: {delta:?}");
        }

        let total = delta.total();
        let share = |ticks: i128| -> f64 {
            if total == 0 {
                0.0
            } else {
                (ticks as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
            }
        };

        let reading = Self {
            usage_percent: share(total - delta.idle_total()),
            user_share: share(delta.user.into()),
            system_share: share(delta.system.into()),
            idle_share: share(delta.idle_total()),
            delta,
        };
        debug!(
            "cpu usage {:.1}% (user {:.1}%, system {:.1}%, idle {:.1}%)",
            reading.usage_percent, reading.user_share, reading.system_share, reading.idle_share
        );

        reading
    }
}
