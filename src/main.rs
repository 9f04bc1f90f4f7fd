//! a compact cpu, memory, and disk monitor.

use {
    self::cli::Cli,
    clap::Parser,
    log::{error, info},
    std::{
        io,
        sync::mpsc::{self, RecvTimeoutError},
    },
    vitals::{Dashboard, Monitor, PollConfig},
};

mod cli;

type Error = Box<dyn std::error::Error>;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Cli::parse().into_config();
    info!("starting with {config:?}");

    // shutdown requests are only observed between ticks.
    let (shutdown_tx, shutdown) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })?;

    let mut monitor = Monitor::new();
    let mut dashboard = Dashboard::new(io::stdout());

    dashboard.banner()?;

    // cpu usage needs a baseline sample taken shortly before the first reading.
    if config.cpu {
        if let Err(error) = monitor.warm_up(&config) {
            error!("cpu warm-up read failed: {error}");
        }
        if let Ok(()) | Err(RecvTimeoutError::Disconnected) =
            shutdown.recv_timeout(PollConfig::WARM_UP)
        {
            dashboard.stopped()?;
            return Ok(());
        }
    }

    loop {
        let sample = monitor.sample_once(&config);

        if config.once {
            dashboard.draw(&sample, &config)?;
            break;
        }

        dashboard.clear(&config)?;
        dashboard.draw(&sample, &config)?;

        match shutdown.recv_timeout(config.interval()) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    dashboard.stopped()?;
    Ok(())
}
