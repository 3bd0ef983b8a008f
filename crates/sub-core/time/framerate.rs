//! Framerate presets and the document's native position mode

use crate::errors::{CoreError, Result};
use core::fmt;

/// Common video framerates
///
/// The NTSC rates are stored exactly as `N / 1.001` rather than as their
/// rounded display values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Framerate {
    /// 24 / 1.001
    #[default]
    Fps23_976,
    /// 24
    Fps24,
    /// 25
    Fps25,
    /// 30 / 1.001
    Fps29_97,
    /// 30
    Fps30,
    /// 50
    Fps50,
    /// 60 / 1.001
    Fps59_94,
    /// 60
    Fps60,
}

impl Framerate {
    /// All presets in ascending order
    pub const ALL: [Self; 8] = [
        Self::Fps23_976,
        Self::Fps24,
        Self::Fps25,
        Self::Fps29_97,
        Self::Fps30,
        Self::Fps50,
        Self::Fps59_94,
        Self::Fps60,
    ];

    /// Frames per second
    #[must_use]
    pub fn fps(self) -> f64 {
        match self {
            Self::Fps23_976 => 24.0 / 1.001,
            Self::Fps24 => 24.0,
            Self::Fps25 => 25.0,
            Self::Fps29_97 => 30.0 / 1.001,
            Self::Fps30 => 30.0,
            Self::Fps50 => 50.0,
            Self::Fps59_94 => 60.0 / 1.001,
            Self::Fps60 => 60.0,
        }
    }

    /// Find the preset matching `fps` within 0.01
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFramerate`] if `fps` is not finite and
    /// positive or matches no preset.
    pub fn from_fps(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CoreError::invalid_framerate(fps));
        }
        Self::ALL
            .into_iter()
            .find(|rate| (rate.fps() - fps).abs() < 0.01)
            .ok_or_else(|| CoreError::invalid_framerate(fps))
    }
}

impl fmt::Display for Framerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.fps())
    }
}

/// Which representation a document stores natively
///
/// The other representation is always derived from the native one and is
/// therefore the one exposed to rounding drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Positions are times
    #[default]
    Time,
    /// Positions are frames
    Frame,
}
