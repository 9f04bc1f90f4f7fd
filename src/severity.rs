/// a coarse classification of how loaded a resource is.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SeverityTier {
    Normal,
    Moderate,
    High,
}

/// the two cut points separating the three tiers.
///
/// each cut point belongs to the tier above it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

// === impl SeverityTier ===

impl SeverityTier {
    /// classifies a percentage against a pair of cut points.
    pub fn classify(percent: f64, low: f64, high: f64) -> Self {
        if percent >= high {
            Self::High
        } else if percent >= low {
            Self::Moderate
        } else {
            Self::Normal
        }
    }
}

// === impl Thresholds ===

impl Thresholds {
    pub const CPU: Self = Self::new(60.0, 80.0);
    pub const MEMORY: Self = Self::new(75.0, 90.0);
    pub const DISK: Self = Self::new(80.0, 90.0);

    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn classify(&self, percent: f64) -> SeverityTier {
        let Self { low, high } = *self;
        SeverityTier::classify(percent, low, high)
    }
}
