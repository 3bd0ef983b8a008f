//! Millisecond time codes and frame counts
//!
//! `TimeCode` is always within `[00:00:00.000, 99:59:59.999]`. Every
//! constructor clamps instead of overflowing, so arithmetic done through the
//! calculator can never produce a negative or out-of-range value.

use crate::errors::{CoreError, Result};
use core::fmt;
use core::str::FromStr;

/// Largest representable time in milliseconds (`99:59:59.999`)
pub const MAX_MILLIS: u32 = 359_999_999;

/// Largest representable time in seconds
pub const MAX_SECONDS: f64 = 359_999.999;

/// A clamped `HH:MM:SS.mmm` time value stored as whole milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCode {
    millis: u32,
}

impl TimeCode {
    /// `00:00:00.000`
    pub const ZERO: Self = Self { millis: 0 };

    /// `99:59:59.999`
    pub const MAX: Self = Self { millis: MAX_MILLIS };

    /// Create from milliseconds, clamping to [`TimeCode::MAX`]
    #[must_use]
    pub const fn from_millis(millis: u32) -> Self {
        if millis > MAX_MILLIS {
            Self::MAX
        } else {
            Self { millis }
        }
    }

    /// Create from components, clamping the total to [`TimeCode::MAX`]
    #[must_use]
    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Self {
        let total = (hours as u64) * 3_600_000
            + (minutes as u64) * 60_000
            + (seconds as u64) * 1_000
            + millis as u64;
        if total > MAX_MILLIS as u64 {
            Self::MAX
        } else {
            Self {
                millis: total as u32,
            }
        }
    }

    /// Create from seconds
    ///
    /// Seconds are rounded to three decimals. Negative and non-finite
    /// inputs below zero clamp to zero, anything above `359999.999`
    /// clamps to [`TimeCode::MAX`].
    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds.is_nan() || seconds <= 0.0 {
            return Self::ZERO;
        }
        if seconds >= MAX_SECONDS {
            return Self::MAX;
        }
        Self::from_millis((seconds * 1000.0).round() as u32)
    }

    /// Total milliseconds
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        self.millis
    }

    /// Total seconds
    #[must_use]
    pub fn as_seconds(self) -> f64 {
        f64::from(self.millis) / 1000.0
    }

    /// `self - other`, clamped to zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self {
            millis: self.millis.saturating_sub(other.millis),
        }
    }

    /// `self + other`, clamped to [`TimeCode::MAX`]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self::from_millis(self.millis.saturating_add(other.millis))
    }

    /// Split into `(hours, minutes, seconds, milliseconds)`
    #[must_use]
    pub const fn components(self) -> (u32, u32, u32, u32) {
        let hours = self.millis / 3_600_000;
        let rest = self.millis % 3_600_000;
        (hours, rest / 60_000, (rest % 60_000) / 1_000, rest % 1_000)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds, millis) = self.components();
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

impl FromStr for TimeCode {
    type Err = CoreError;

    /// Parse `HH:MM:SS.mmm`
    ///
    /// Accepts `,` as the millisecond separator and one to three fraction
    /// digits. A leading `-` is accepted and clamps to zero, hours beyond
    /// 99 clamp to [`TimeCode::MAX`].
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let parts: Vec<&str> = body.split(':').collect();
        if parts.len() != 3 {
            return Err(CoreError::invalid_time(s, "expected HH:MM:SS.mmm"));
        }

        let hours: u32 = parts[0]
            .parse()
            .map_err(|_| CoreError::invalid_time(s, "invalid hours"))?;
        let minutes: u32 = parts[1]
            .parse()
            .map_err(|_| CoreError::invalid_time(s, "invalid minutes"))?;

        let (seconds_str, fraction_str) = match parts[2].split_once(['.', ',']) {
            Some((secs, frac)) => (secs, Some(frac)),
            None => (parts[2], None),
        };
        let seconds: u32 = seconds_str
            .parse()
            .map_err(|_| CoreError::invalid_time(s, "invalid seconds"))?;

        let millis = match fraction_str {
            Some(frac) => {
                if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CoreError::invalid_time(s, "invalid milliseconds"));
                }
                let value: u32 = frac
                    .parse()
                    .map_err(|_| CoreError::invalid_time(s, "invalid milliseconds"))?;
                value * 10u32.pow(3 - frac.len() as u32)
            }
            None => 0,
        };

        if minutes >= 60 {
            return Err(CoreError::invalid_time(s, "minutes must be < 60"));
        }
        if seconds >= 60 {
            return Err(CoreError::invalid_time(s, "seconds must be < 60"));
        }

        if negative {
            return Ok(Self::ZERO);
        }
        Ok(Self::from_hms(hours, minutes, seconds, millis))
    }
}

/// A non-negative frame number, meaningful only relative to a framerate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCount(pub u32);

impl FrameCount {
    /// Frame zero
    pub const ZERO: Self = Self(0);

    /// Create a new frame count
    #[must_use]
    pub const fn new(frames: u32) -> Self {
        Self(frames)
    }

    /// Raw frame number
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// `self - other`, clamped to zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `self + other`, saturating
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Add a signed offset, clamping at zero
    #[must_use]
    pub fn saturating_add_signed(self, delta: i64) -> Self {
        let value = i64::from(self.0).saturating_add(delta);
        Self(value.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

impl From<u32> for FrameCount {
    fn from(frames: u32) -> Self {
        Self(frames)
    }
}

impl fmt::Display for FrameCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_all_fields() {
        assert_eq!(TimeCode::from_millis(3_723_004).to_string(), "01:02:03.004");
        assert_eq!(TimeCode::ZERO.to_string(), "00:00:00.000");
        assert_eq!(TimeCode::MAX.to_string(), "99:59:59.999");
    }

    #[test]
    fn parse_accepts_both_separators() {
        let dot: TimeCode = "00:00:05.250".parse().unwrap();
        let comma: TimeCode = "00:00:05,250".parse().unwrap();
        assert_eq!(dot, comma);
        assert_eq!(dot.as_millis(), 5_250);
    }

    #[test]
    fn parse_short_fraction() {
        let t: TimeCode = "00:00:01.5".parse().unwrap();
        assert_eq!(t.as_millis(), 1_500);
        let t: TimeCode = "00:00:01".parse().unwrap();
        assert_eq!(t.as_millis(), 1_000);
    }

    #[test]
    fn parse_clamps_out_of_range() {
        let negative: TimeCode = "-00:00:01.000".parse().unwrap();
        assert_eq!(negative, TimeCode::ZERO);
        let huge: TimeCode = "120:00:00.000".parse().unwrap();
        assert_eq!(huge, TimeCode::MAX);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("1:2".parse::<TimeCode>().is_err());
        assert!("00:61:00.000".parse::<TimeCode>().is_err());
        assert!("00:00:00.0000".parse::<TimeCode>().is_err());
        assert!("aa:00:00.000".parse::<TimeCode>().is_err());
    }

    #[test]
    fn from_seconds_rounds_to_millis() {
        assert_eq!(TimeCode::from_seconds(1.0004).as_millis(), 1_000);
        assert_eq!(TimeCode::from_seconds(1.0006).as_millis(), 1_001);
        assert_eq!(TimeCode::from_seconds(-3.0), TimeCode::ZERO);
        assert_eq!(TimeCode::from_seconds(1e9), TimeCode::MAX);
    }

    #[test]
    fn frame_signed_add_clamps() {
        assert_eq!(FrameCount(5).saturating_add_signed(-10), FrameCount(0));
        assert_eq!(FrameCount(5).saturating_add_signed(3), FrameCount(8));
    }
}
