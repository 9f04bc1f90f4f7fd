use {
    crate::{
        disk::DiskSnapshot,
        meminfo::MemorySnapshot,
        meter::Meter,
        monitor::{Metric, PollConfig, Sample},
        stat::CpuReading,
        units::format_bytes,
    },
    chrono::Local,
    crossterm::{
        QueueableCommand, cursor,
        style::{Color, Stylize},
        terminal,
    },
    std::io::{self, Write},
};

/// renders samples as text.
pub struct Dashboard<W> {
    out: W,
}

/// === impl Dashboard ===

impl<W: Write> Dashboard<W> {
    const RULE: &str = "═══════════════════════════════════════════════════════════";
    const TITLE: &str = "Linux System Monitoring Tool";

    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// prints the startup banner, shown while the first readings are taken.
    pub fn banner(&mut self) -> io::Result<()> {
        let Self { out } = self;

        writeln!(out, "{}", Self::TITLE.bold().with(Color::Cyan))?;
        writeln!(out, "Press Ctrl+C to exit\n")?;
        out.flush()
    }

    /// clears the screen and prints the banner shown while polling continuously.
    pub fn clear(&mut self, config: &PollConfig) -> io::Result<()> {
        let Self { out } = self;

        out.queue(terminal::Clear(terminal::ClearType::All))?
            .queue(cursor::MoveTo(0, 0))?;
        writeln!(out, "{}", Self::TITLE.bold().with(Color::Cyan))?;
        writeln!(
            out,
            "Press Ctrl+C to exit | Refresh rate: {}s\n",
            config.refresh
        )?;

        Ok(())
    }

    /// prints one tick's worth of metrics.
    pub fn draw(&mut self, sample: &Sample, config: &PollConfig) -> io::Result<()> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(
            self.out,
            "{}",
            format!("System Status - {now}").bold().with(Color::White)
        )?;
        writeln!(self.out, "{}\n", Self::RULE)?;

        if config.cpu {
            self.section("CPU Usage:", Color::Cyan)?;
            match &sample.cpu {
                Some(cpu) => self.cpu(cpu)?,
                None => self.unavailable(sample, Metric::Cpu)?,
            }
        }

        if config.memory {
            self.section("Memory Usage:", Color::Magenta)?;
            match &sample.memory {
                Some(memory) => self.memory(memory)?,
                None => self.unavailable(sample, Metric::Memory)?,
            }
        }

        if config.disk {
            let title = format!("Disk Usage ({}):", config.disk_path.display());
            self.section(&title, Color::Yellow)?;
            match &sample.disk {
                Some(disk) => self.disk(disk)?,
                None => self.unavailable(sample, Metric::Disk)?,
            }
        }

        writeln!(self.out, "{}", Self::RULE)?;
        self.out.flush()
    }

    /// prints the farewell line.
    pub fn stopped(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "\n{}",
            "Monitoring stopped.".bold().with(Color::Green)
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn section(&mut self, title: &str, color: Color) -> io::Result<()> {
        writeln!(self.out, "{}", title.bold().with(color))
    }

    fn meter(&mut self, name: &str, metric: Metric, value: f64) -> io::Result<()> {
        let meter = Meter {
            name,
            value,
            width: Meter::WIDTH,
            tier: metric.thresholds().classify(value),
        };
        meter.draw(&mut self.out)?;
        writeln!(self.out)
    }

    fn cpu(&mut self, cpu: &CpuReading) -> io::Result<()> {
        self.meter("CPU", Metric::Cpu, cpu.usage_percent)?;
        writeln!(
            self.out,
            "  {} User: {:.1}%, System: {:.1}%, Idle: {:.1}%\n",
            "Details:".bold(),
            cpu.user_share,
            cpu.system_share,
            cpu.idle_share
        )
    }

    fn memory(&mut self, memory: &MemorySnapshot) -> io::Result<()> {
        let kib = |n: u64| format_bytes(n.saturating_mul(1024));

        self.meter("Memory", Metric::Memory, memory.usage_percent)?;
        writeln!(
            self.out,
            "  {} Used: {}, Available: {}, Total: {}",
            "Details:".bold(),
            kib(memory.used),
            kib(memory.available),
            kib(memory.total)
        )?;
        writeln!(
            self.out,
            "  {} Buffers: {}, Cached: {}\n",
            "Caching:".bold(),
            kib(memory.buffers),
            kib(memory.cached)
        )
    }

    fn disk(&mut self, disk: &DiskSnapshot) -> io::Result<()> {
        self.meter("Disk", Metric::Disk, disk.usage_percent)?;
        writeln!(
            self.out,
            "  {} Used: {}, Available: {}, Total: {}\n",
            "Details:".bold(),
            format_bytes(disk.used),
            format_bytes(disk.available),
            format_bytes(disk.total)
        )
    }

    /// explains why a metric has no value this tick.
    fn unavailable(&mut self, sample: &Sample, metric: Metric) -> io::Result<()> {
        let message = match sample.error(metric) {
            Some(error) if error.is_warming_up() => "warming up".to_owned(),
            Some(error) => format!("unavailable: {error}"),
            None => "unavailable".to_owned(),
        };
        writeln!(self.out, "  {}\n", message.with(Color::DarkGrey))
    }
}
