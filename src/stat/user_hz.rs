use std::str::FromStr;

/// a count of `USER_HZ` clock ticks since boot.
///
/// these are monotonic in principle, but the kernel does not promise it: `iowait` in particular
/// may decrease, and counters may reset. see [`UserHz::since`].
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct UserHz(u64);

// === impl UserHz ===

impl UserHz {
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// returns the signed number of ticks elapsed between `earlier` and `self`.
    ///
    /// a counter that went backwards yields a negative delta rather than wrapping.
    pub fn since(self, earlier: Self) -> i64 {
        let (Self(now), Self(then)) = (self, earlier);
        let delta = i128::from(now) - i128::from(then);
        delta.clamp(i64::MIN.into(), i64::MAX.into()) as i64
    }
}

impl FromStr for UserHz {
    type Err = <u64 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
