//! Watchface configuration
//!
//! Settings are baked in at build time: the firmware captures `ANIMFACE_UTC_OFFSET`,
//! `ANIMFACE_CLOCK` and `ANIMFACE_BACKLIGHT` with `option_env!` and hands the raw strings to
//! [`WatchfaceConfig::from_build_env`].

/// Offset of the local time zone to UTC, Central European Time by default.
pub const DEFAULT_UTC_OFFSET: i32 = 3_600;

/// Largest offset in use anywhere (UTC+14).
const MAX_UTC_OFFSET: i32 = 14 * 3_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    /// `13:05`
    #[default]
    TwentyFourHour,
    /// `01:05`
    TwelveHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchfaceConfig {
    pub clock_style: ClockStyle,
    /// Seconds to add to UTC for local time
    pub utc_offset_secs: i32,
    /// Backlight level (0–7)
    pub backlight: u8,
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self {
            clock_style: ClockStyle::default(),
            utc_offset_secs: DEFAULT_UTC_OFFSET,
            backlight: 2,
        }
    }
}

impl WatchfaceConfig {
    /// Build a configuration from optional raw values, unset values keep their default.
    pub fn from_build_env(
        utc_offset: Option<&str>,
        clock_style: Option<&str>,
        backlight: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = utc_offset {
            config.utc_offset_secs = raw
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|offset| offset.abs() <= MAX_UTC_OFFSET)
                .ok_or(ConfigError::InvalidUtcOffset)?;
        }

        if let Some(raw) = clock_style {
            config.clock_style = match raw.trim() {
                "24h" | "24" => ClockStyle::TwentyFourHour,
                "12h" | "12" => ClockStyle::TwelveHour,
                _ => return Err(ConfigError::UnknownClockStyle),
            };
        }

        if let Some(raw) = backlight {
            config.backlight = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|level| *level <= 7)
                .ok_or(ConfigError::InvalidBacklight)?;
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("UTC offset must be a number of seconds within ±14h")]
    InvalidUtcOffset,
    #[error("clock style must be `24h` or `12h`")]
    UnknownClockStyle,
    #[error("backlight level must be between 0 and 7")]
    InvalidBacklight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_keep_defaults() {
        assert_eq!(
            WatchfaceConfig::from_build_env(None, None, None),
            Ok(WatchfaceConfig::default())
        );
    }

    #[test]
    fn parses_values() {
        let config = WatchfaceConfig::from_build_env(Some("-18000"), Some("12h"), Some(" 7 ")).unwrap();
        assert_eq!(
            config,
            WatchfaceConfig {
                clock_style: ClockStyle::TwelveHour,
                utc_offset_secs: -18_000,
                backlight: 7,
            }
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            WatchfaceConfig::from_build_env(Some("UTC+1"), None, None),
            Err(ConfigError::InvalidUtcOffset)
        );
        assert_eq!(
            WatchfaceConfig::from_build_env(Some("90000"), None, None),
            Err(ConfigError::InvalidUtcOffset)
        );
        assert_eq!(
            WatchfaceConfig::from_build_env(None, Some("am/pm"), None),
            Err(ConfigError::UnknownClockStyle)
        );
        assert_eq!(
            WatchfaceConfig::from_build_env(None, None, Some("8")),
            Err(ConfigError::InvalidBacklight)
        );
    }
}
