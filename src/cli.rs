use {
    clap::Parser,
    std::{num::NonZeroU64, path::PathBuf},
    vitals::PollConfig,
};

/// samples cpu, memory, and disk usage and draws them in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// refresh rate in seconds.
    #[arg(short, long, value_name = "SECONDS", default_value = "1")]
    refresh: NonZeroU64,

    /// show cpu usage.
    #[arg(short, long)]
    cpu: bool,

    /// show memory usage.
    #[arg(short, long)]
    memory: bool,

    /// show disk usage for the filesystem holding PATH.
    #[arg(short, long, value_name = "PATH")]
    disk: Option<PathBuf>,

    /// run once and exit.
    #[arg(short, long)]
    once: bool,
}

// === impl Cli ===

impl Cli {
    const DEFAULT_DISK: &str = "/";

    /// converts the parsed arguments into a [`PollConfig`].
    ///
    /// selecting any of `--cpu`, `--memory`, or `--disk` restricts the monitor to the selected
    /// families. selecting none of them enables everything.
    pub fn into_config(self) -> PollConfig {
        let Self {
            refresh,
            cpu,
            memory,
            disk,
            once,
        } = self;

        let all = !(cpu || memory || disk.is_some());

        PollConfig {
            refresh,
            cpu: all || cpu,
            memory: all || memory,
            disk: all || disk.is_some(),
            disk_path: disk.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DISK)),
            once,
        }
    }
}
