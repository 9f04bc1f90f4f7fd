use {
    crate::severity::SeverityTier,
    crossterm::style::{Color, Stylize},
    std::{
        io::{self, Write},
        iter::repeat_n,
    },
};

/// a labeled horizontal bar, filled in proportion to a percentage.
pub struct Meter<'a> {
    pub name: &'a str,
    /// a percentage in `[0, 100]`. values outside of that range are clamped.
    pub value: f64,
    pub width: usize,
    pub tier: SeverityTier,
}

/// === impl Meter ===

impl Meter<'_> {
    /// the width used by the dashboard.
    pub const WIDTH: usize = 50;

    const ACTIVE: char = '█';
    const IDLE: char = '░';
    const BORDER_L: char = '[';
    const BORDER_R: char = ']';

    pub fn draw(&self, writer: &mut impl Write) -> io::Result<()> {
        let Self {
            name,
            value,
            width,
            tier,
        } = *self;

        let value = value.clamp(0.0, 100.0);
        let filled = Self::filled(value, width);

        let active = repeat_n(Self::ACTIVE, filled).collect::<String>();
        let idle = repeat_n(Self::IDLE, width - filled).collect::<String>();

        write!(
            writer,
            "{} {}{}{}{} {}",
            format!("{name:<12}").bold(),
            Self::BORDER_L,
            active.with(color(tier)),
            idle,
            Self::BORDER_R,
            format!("{value:.1}%").bold(),
        )
    }

    /// the number of active cells, rounding down.
    fn filled(value: f64, width: usize) -> usize {
        ((value * width as f64 / 100.0) as usize).min(width)
    }
}

/// the color used to draw a tier.
pub fn color(tier: SeverityTier) -> Color {
    match tier {
        SeverityTier::Normal => Color::Green,
        SeverityTier::Moderate => Color::Yellow,
        SeverityTier::High => Color::Red,
    }
}
