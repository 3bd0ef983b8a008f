//! Show/hide/duration triples

use core::fmt;

/// Column of a [`PositionTriple`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Column {
    /// Time the subtitle appears
    Show,
    /// Time the subtitle disappears
    Hide,
    /// `max(0, hide - show)`
    Duration,
}

/// `(show, hide, duration)` with `duration = max(0, hide - show)`
///
/// Ordering is lexicographic over `(show, hide, duration)`, which is the
/// key a document keeps its rows sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionTriple<T> {
    /// Appearance position
    pub show: T,
    /// Disappearance position
    pub hide: T,
    /// Derived duration
    pub duration: T,
}

impl<T: Copy> PositionTriple<T> {
    /// Create a triple from already consistent parts
    ///
    /// Use the calculator's `time_triple`/`frame_triple` to derive the
    /// duration instead of supplying it.
    #[must_use]
    pub const fn new(show: T, hide: T, duration: T) -> Self {
        Self {
            show,
            hide,
            duration,
        }
    }

    /// Read one column
    #[must_use]
    pub fn get(&self, column: Column) -> T {
        match column {
            Column::Show => self.show,
            Column::Hide => self.hide,
            Column::Duration => self.duration,
        }
    }
}

impl<T: fmt::Display> fmt::Display for PositionTriple<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {} ({})", self.show, self.hide, self.duration)
    }
}
