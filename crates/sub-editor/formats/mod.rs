//! Boundary with subtitle file readers and writers
//!
//! Readers and writers live outside this crate. They hand over and take back
//! a [`SubtitleData`]: show and hide positions in the file's native unit plus
//! one text per row.

use crate::core::document::{Doc, Document};
use crate::core::errors::{EditorError, Result};
use sub_core::{Calculator, FrameCount, Mode, PositionTriple, TimeCode};

/// Show/hide positions in one unit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NativePositions {
    Times {
        shows: Vec<TimeCode>,
        hides: Vec<TimeCode>,
    },
    Frames {
        shows: Vec<FrameCount>,
        hides: Vec<FrameCount>,
    },
}

/// Rows as exchanged with file readers and writers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubtitleData {
    pub positions: NativePositions,
    pub texts: Vec<String>,
}

impl SubtitleData {
    /// Time-based rows
    #[must_use]
    pub fn from_times(shows: Vec<TimeCode>, hides: Vec<TimeCode>, texts: Vec<String>) -> Self {
        Self {
            positions: NativePositions::Times { shows, hides },
            texts,
        }
    }

    /// Frame-based rows
    #[must_use]
    pub fn from_frames(shows: Vec<FrameCount>, hides: Vec<FrameCount>, texts: Vec<String>) -> Self {
        Self {
            positions: NativePositions::Frames { shows, hides },
            texts,
        }
    }

    /// Snapshot of `document` in `mode` with the texts of `doc`
    #[must_use]
    pub fn from_document(document: &Document, mode: Mode, doc: Doc) -> Self {
        let positions = match mode {
            Mode::Time => NativePositions::Times {
                shows: document.times().iter().map(|t| t.show).collect(),
                hides: document.times().iter().map(|t| t.hide).collect(),
            },
            Mode::Frame => NativePositions::Frames {
                shows: document.frames().iter().map(|f| f.show).collect(),
                hides: document.frames().iter().map(|f| f.hide).collect(),
            },
        };
        Self {
            positions,
            texts: document.texts(doc).to_vec(),
        }
    }

    /// Native unit of the positions
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self.positions {
            NativePositions::Times { .. } => Mode::Time,
            NativePositions::Frames { .. } => Mode::Frame,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Check that shows, hides and texts line up
    pub fn validate(&self) -> Result<()> {
        let (shows, hides) = match &self.positions {
            NativePositions::Times { shows, hides } => (shows.len(), hides.len()),
            NativePositions::Frames { shows, hides } => (shows.len(), hides.len()),
        };
        for (what, actual) in [("shows", shows), ("hides", hides)] {
            if actual != self.texts.len() {
                return Err(EditorError::LengthMismatch {
                    what,
                    expected: self.texts.len(),
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Both triples of every row, derived with `calc`
    #[must_use]
    pub fn expand(
        &self,
        calc: &Calculator,
    ) -> Vec<(PositionTriple<TimeCode>, PositionTriple<FrameCount>)> {
        match &self.positions {
            NativePositions::Times { shows, hides } => shows
                .iter()
                .zip(hides)
                .map(|(&show, &hide)| calc.expand(show, hide))
                .collect(),
            NativePositions::Frames { shows, hides } => shows
                .iter()
                .zip(hides)
                .map(|(&show, &hide)| calc.expand(show, hide))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sub_core::Framerate;

    #[test]
    fn validate_rejects_ragged_input() {
        let data = SubtitleData::from_times(
            vec![TimeCode::ZERO],
            vec![],
            vec!["a".to_string()],
        );
        assert!(matches!(
            data.validate(),
            Err(EditorError::LengthMismatch { what: "hides", .. })
        ));
    }

    #[test]
    fn frames_expand_with_calculator() {
        let data = SubtitleData::from_frames(
            vec![FrameCount(25)],
            vec![FrameCount(50)],
            vec!["a".to_string()],
        );
        assert_eq!(data.mode(), Mode::Frame);
        let rows = data.expand(&Calculator::new(Framerate::Fps25));
        assert_eq!(rows[0].0.show, TimeCode::from_millis(1000));
        assert_eq!(rows[0].0.duration, TimeCode::from_millis(1000));
        assert_eq!(rows[0].1.duration, FrameCount(25));
    }
}
