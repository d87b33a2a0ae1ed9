use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Reasons a configuration request is refused.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("unsupported tick interval {0} ms (expected 150, 100 or 50)")]
    UnsupportedTickInterval(u64),
    #[error("malformed color value `{0}`")]
    MalformedColor(String),
    #[error("unknown speed preset `{0}`")]
    UnknownSpeed(String),
    #[error("configuration can only change before a session starts")]
    SessionActive,
}

/// Tick speed presets offered before a session starts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Normal, Speed::Fast];

    #[must_use]
    pub fn tick_interval_ms(self) -> u64 {
        match self {
            Self::Slow => 150,
            Self::Normal => 100,
            Self::Fast => 50,
        }
    }

    #[must_use]
    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    /// Maps a raw interval back to its preset.
    pub fn from_millis(ms: u64) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|speed| speed.tick_interval_ms() == ms)
            .ok_or(ConfigError::UnsupportedTickInterval(ms))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
        }
    }

    /// Returns the neighbouring preset, wrapping around.
    #[must_use]
    pub fn cycled(self, forward: bool) -> Self {
        cycle(&Self::ALL, self, forward)
    }
}

impl FromStr for Speed {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            other => other
                .parse::<u64>()
                .map_err(|_| ConfigError::UnknownSpeed(raw.to_owned()))
                .and_then(Self::from_millis),
        }
    }
}

/// Named colours accepted in addition to `#rrggbb`.
pub const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("cyan", Rgb::new(0x00, 0xff, 0xff)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("lime", Rgb::new(0x00, 0xff, 0x00)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("orange", Rgb::new(0xff, 0xa5, 0x00)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("magenta", Rgb::new(0xff, 0x00, 0xff)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
];

/// 24-bit colour.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Raises every channel by `round(2.55 * percent)`, saturating at 255.
    #[must_use]
    pub fn lighten(self, percent: u8) -> Self {
        self.shift(i16::from(shade_amount(percent)))
    }

    /// Lowers every channel by `round(2.55 * percent)`, saturating at 0.
    #[must_use]
    pub fn darken(self, percent: u8) -> Self {
        self.shift(-i16::from(shade_amount(percent)))
    }

    fn shift(self, amount: i16) -> Self {
        let channel = |value: u8| {
            let shifted = (i16::from(value) + amount).clamp(0, 255);
            u8::try_from(shifted).unwrap_or(u8::MAX)
        };
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }

    /// Returns the registered name for this colour, if any.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        NAMED_COLORS
            .iter()
            .find(|(_, rgb)| *rgb == self)
            .map(|(name, _)| *name)
    }

    /// Steps through [`NAMED_COLORS`]; unnamed colours restart at the first entry.
    #[must_use]
    pub fn cycled(self, forward: bool) -> Self {
        let palette: Vec<Rgb> = NAMED_COLORS.iter().map(|(_, rgb)| *rgb).collect();
        cycle(&palette, self, forward)
    }
}

fn shade_amount(percent: u8) -> u8 {
    let amount = (2.55 * f32::from(percent.min(100))).round();
    // Bounded to 0..=255 by the clamp on `percent`.
    amount as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        let malformed = || ConfigError::MalformedColor(raw.to_owned());

        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            let packed = u32::from_str_radix(hex, 16).map_err(|_| malformed())?;
            let [_, r, g, b] = packed.to_be_bytes();
            return Ok(Self { r, g, b });
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, rgb)| *rgb)
            .ok_or_else(malformed)
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// Background and snake body colours chosen before a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Colors {
    pub background: Rgb,
    pub snake: Rgb,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x00, 0x00, 0x00),
            snake: Rgb::new(0x00, 0xff, 0x00),
        }
    }
}

/// Settings fixed for the duration of one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct SessionConfig {
    pub speed: Speed,
    pub colors: Colors,
}

impl SessionConfig {
    /// Validates a raw interval and colour pair into a config.
    pub fn parse(
        tick_interval_ms: u64,
        background: &str,
        snake: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            speed: Speed::from_millis(tick_interval_ms)?,
            colors: Colors {
                background: background.parse()?,
                snake: snake.parse()?,
            },
        })
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.speed.tick_interval()
    }
}

fn cycle<T: Copy + PartialEq>(items: &[T], current: T, forward: bool) -> T {
    let len = items.len();
    match items.iter().position(|item| *item == current) {
        Some(index) if forward => items[(index + 1) % len],
        Some(index) => items[(index + len - 1) % len],
        None => items[0],
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Rgb, SessionConfig, Speed};

    #[test]
    fn speed_presets_map_to_intervals() {
        assert_eq!(Speed::Slow.tick_interval_ms(), 150);
        assert_eq!(Speed::Normal.tick_interval_ms(), 100);
        assert_eq!(Speed::Fast.tick_interval_ms(), 50);
        assert_eq!(Speed::default(), Speed::Normal);
    }

    #[test]
    fn unsupported_interval_is_rejected() {
        assert_eq!(
            Speed::from_millis(75),
            Err(ConfigError::UnsupportedTickInterval(75))
        );
        assert_eq!("fast".parse::<Speed>(), Ok(Speed::Fast));
        assert_eq!("150".parse::<Speed>(), Ok(Speed::Slow));
        assert!("warp".parse::<Speed>().is_err());
    }

    #[test]
    fn colors_parse_from_hex_and_names() {
        assert_eq!("#1a2B3c".parse::<Rgb>(), Ok(Rgb::new(0x1a, 0x2b, 0x3c)));
        assert_eq!("Lime".parse::<Rgb>(), Ok(Rgb::new(0, 255, 0)));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("chartreuse-ish".parse::<Rgb>().is_err());
    }

    #[test]
    fn shading_clamps_each_channel() {
        let color = Rgb::new(250, 100, 3);
        assert_eq!(color.lighten(20), Rgb::new(255, 151, 54));
        assert_eq!(color.darken(20), Rgb::new(199, 49, 0));
    }

    #[test]
    fn session_config_parse_validates_every_field() {
        let config = SessionConfig::parse(50, "black", "#ff0000").expect("valid config");
        assert_eq!(config.speed, Speed::Fast);
        assert_eq!(config.colors.snake, Rgb::new(255, 0, 0));

        assert!(matches!(
            SessionConfig::parse(100, "black", "nope"),
            Err(ConfigError::MalformedColor(_))
        ));
    }

    #[test]
    fn display_prefers_names() {
        assert_eq!(Rgb::new(0, 0, 0).to_string(), "black");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(Speed::Fast.cycled(true), Speed::Slow);
        assert_eq!(Speed::Slow.cycled(false), Speed::Fast);
        assert_eq!(Rgb::new(1, 2, 3).cycled(true), Rgb::new(0, 0, 0));
    }
}
