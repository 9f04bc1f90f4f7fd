//! a compact cpu, memory, and disk monitor.
//!
//! the library samples raw kernel counters and derives utilization from them. cpu usage is a
//! rate, so it is computed from the difference between two consecutive samples; memory and disk
//! usage are computed from a single sample.

pub use self::{
    disk::{DiskSnapshot, FsStats, read_disk},
    error::{ParseError, SampleError},
    meminfo::{MemInfo, MemorySnapshot, read_memory},
    monitor::{Metric, MetricError, Monitor, PollConfig, Sample},
    sentinel::Sentinel,
    severity::{SeverityTier, Thresholds},
    source::{ProcFile, StatsSource},
    stat::{CpuReading, CpuTime, Measurement, UserHz, derive_usage, read_cpu},
    units::format_bytes,
    window::Dashboard,
};

pub mod disk;
mod error;
pub mod meminfo;
pub mod meter;
pub mod monitor;
pub mod sentinel;
pub mod severity;
pub mod source;
/// kernel statistics facilities.
///
/// this module provides tools to interact with `/proc/stat`.
pub mod stat;
mod units;
pub mod window;
