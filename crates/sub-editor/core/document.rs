//! Ordered document store
//!
//! A [`Document`] holds four parallel sequences: times, frames, main texts and
//! translation texts. Row `i` is the tuple of the `i`th element of each. The
//! sequences always have the same length and rows are kept sorted by their
//! time triple, which orders by show first.
//!
//! The store only offers structural primitives. Everything that has to keep
//! the two position representations in sync, or that should be undoable,
//! lives in the edit operations on [`crate::Project`].

use crate::core::errors::{EditorError, Result};
use bitflags::bitflags;
use core::fmt;
use sub_core::{FrameCount, PositionTriple, TimeCode};

/// One of the two text documents sharing the positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Doc {
    /// Main text
    Main,
    /// Translation text
    Tran,
}

impl Doc {
    /// Flag for this document
    #[must_use]
    pub const fn flag(self) -> Documents {
        match self {
            Self::Main => Documents::MAIN,
            Self::Tran => Documents::TRAN,
        }
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Tran => write!(f, "translation"),
        }
    }
}

bitflags! {
    /// Set of documents an action affects
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Documents: u8 {
        const MAIN = 0b01;
        const TRAN = 0b10;
    }
}

impl Documents {
    /// Iterate the single documents in this set
    pub fn docs(self) -> impl Iterator<Item = Doc> {
        [Doc::Main, Doc::Tran]
            .into_iter()
            .filter(move |doc| self.contains(doc.flag()))
    }
}

impl From<Doc> for Documents {
    fn from(doc: Doc) -> Self {
        doc.flag()
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleRow<'a> {
    /// Positions as times
    pub times: PositionTriple<TimeCode>,
    /// Positions as frames
    pub frames: PositionTriple<FrameCount>,
    /// Main text
    pub main_text: &'a str,
    /// Translation text
    pub tran_text: &'a str,
}

/// Owned rows in column layout, as captured by removals
///
/// Used as payload when inserting rows verbatim, which is how removals are
/// undone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowData {
    pub times: Vec<PositionTriple<TimeCode>>,
    pub frames: Vec<PositionTriple<FrameCount>>,
    pub main_texts: Vec<String>,
    pub tran_texts: Vec<String>,
}

impl RowData {
    /// Empty data with room for `capacity` rows
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            frames: Vec::with_capacity(capacity),
            main_texts: Vec::with_capacity(capacity),
            tran_texts: Vec::with_capacity(capacity),
        }
    }

    /// Append one row
    pub fn push(
        &mut self,
        times: PositionTriple<TimeCode>,
        frames: PositionTriple<FrameCount>,
        main_text: impl Into<String>,
        tran_text: impl Into<String>,
    ) {
        self.times.push(times);
        self.frames.push(frames);
        self.main_texts.push(main_text.into());
        self.tran_texts.push(tran_text.into());
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check whether no rows are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Check that all four columns hold `expected` rows
    pub fn check_len(&self, expected: usize) -> Result<()> {
        let columns = [
            ("times", self.times.len()),
            ("frames", self.frames.len()),
            ("main texts", self.main_texts.len()),
            ("translation texts", self.tran_texts.len()),
        ];
        for (what, actual) in columns {
            if actual != expected {
                return Err(EditorError::LengthMismatch {
                    what,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Ordered document of subtitle rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) times: Vec<PositionTriple<TimeCode>>,
    pub(crate) frames: Vec<PositionTriple<FrameCount>>,
    pub(crate) main_texts: Vec<String>,
    pub(crate) tran_texts: Vec<String>,
}

impl Document {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check whether the document has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// All time triples in row order
    #[must_use]
    pub fn times(&self) -> &[PositionTriple<TimeCode>] {
        &self.times
    }

    /// All frame triples in row order
    #[must_use]
    pub fn frames(&self) -> &[PositionTriple<FrameCount>] {
        &self.frames
    }

    /// All main texts in row order
    #[must_use]
    pub fn main_texts(&self) -> &[String] {
        &self.main_texts
    }

    /// All translation texts in row order
    #[must_use]
    pub fn tran_texts(&self) -> &[String] {
        &self.tran_texts
    }

    /// Texts of one document
    #[must_use]
    pub fn texts(&self, doc: Doc) -> &[String] {
        match doc {
            Doc::Main => &self.main_texts,
            Doc::Tran => &self.tran_texts,
        }
    }

    /// Borrow row `row`
    #[must_use]
    pub fn row(&self, row: usize) -> Option<SubtitleRow<'_>> {
        Some(SubtitleRow {
            times: *self.times.get(row)?,
            frames: *self.frames.get(row)?,
            main_text: self.main_texts.get(row)?,
            tran_text: self.tran_texts.get(row)?,
        })
    }

    /// Iterate all rows in order
    pub fn rows(&self) -> impl Iterator<Item = SubtitleRow<'_>> + '_ {
        (0..self.len()).filter_map(|row| self.row(row))
    }

    /// Reject `row` unless it names an existing row
    pub fn check_row(&self, row: usize) -> Result<()> {
        if row < self.len() {
            Ok(())
        } else {
            Err(EditorError::row_out_of_bounds(row, self.len()))
        }
    }

    /// Check whether rows are ordered by show
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.times.windows(2).all(|pair| pair[0].show <= pair[1].show)
    }

    pub(crate) fn text_mut(&mut self, doc: Doc, row: usize) -> &mut String {
        match doc {
            Doc::Main => &mut self.main_texts[row],
            Doc::Tran => &mut self.tran_texts[row],
        }
    }

    /// Insert one row at final index `row`
    pub(crate) fn insert_row(
        &mut self,
        row: usize,
        times: PositionTriple<TimeCode>,
        frames: PositionTriple<FrameCount>,
        main_text: String,
        tran_text: String,
    ) {
        self.times.insert(row, times);
        self.frames.insert(row, frames);
        self.main_texts.insert(row, main_text);
        self.tran_texts.insert(row, tran_text);
        self.debug_assert_parallel();
    }

    /// Remove row `row`, returning its contents
    pub(crate) fn remove_row(
        &mut self,
        row: usize,
    ) -> (
        PositionTriple<TimeCode>,
        PositionTriple<FrameCount>,
        String,
        String,
    ) {
        let removed = (
            self.times.remove(row),
            self.frames.remove(row),
            self.main_texts.remove(row),
            self.tran_texts.remove(row),
        );
        self.debug_assert_parallel();
        removed
    }

    /// Move a row so that it ends up at index `to`
    pub(crate) fn move_row(&mut self, from: usize, to: usize) {
        let (times, frames, main_text, tran_text) = self.remove_row(from);
        self.insert_row(to, times, frames, main_text, tran_text);
    }

    /// Rightmost insertion point for `key` among all rows except `skip`
    ///
    /// The returned index is a final index: inserting the skipped row there
    /// after taking it out keeps the rows sorted. Pass `skip >= len` to
    /// search over every row.
    #[must_use]
    pub fn insertion_point(&self, skip: usize, key: &PositionTriple<TimeCode>) -> usize {
        let skipped = usize::from(skip < self.len());
        let (mut lo, mut hi) = (0, self.len() - skipped);
        while lo < hi {
            let mid = (lo + hi) / 2;
            let actual = if mid < skip { mid } else { mid + skipped };
            if *key < self.times[actual] {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }

    /// Stable sort by time triple, returning how many rows were out of order
    ///
    /// A row counts as out of order when it sorts before the row it followed.
    pub(crate) fn sort(&mut self) -> usize {
        let out_of_order = self
            .times
            .windows(2)
            .filter(|pair| pair[1] < pair[0])
            .count();
        if out_of_order == 0 {
            return 0;
        }

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&row| self.times[row]);

        let mut times = Vec::with_capacity(order.len());
        let mut frames = Vec::with_capacity(order.len());
        let mut main_texts = Vec::with_capacity(order.len());
        let mut tran_texts = Vec::with_capacity(order.len());
        for &row in &order {
            times.push(self.times[row]);
            frames.push(self.frames[row]);
            main_texts.push(core::mem::take(&mut self.main_texts[row]));
            tran_texts.push(core::mem::take(&mut self.tran_texts[row]));
        }
        self.times = times;
        self.frames = frames;
        self.main_texts = main_texts;
        self.tran_texts = tran_texts;
        out_of_order
    }

    fn debug_assert_parallel(&self) {
        debug_assert_eq!(self.times.len(), self.frames.len());
        debug_assert_eq!(self.times.len(), self.main_texts.len());
        debug_assert_eq!(self.times.len(), self.tran_texts.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sub_core::Calculator;

    fn doc_with_shows(shows: &[u32]) -> Document {
        let calc = Calculator::default();
        let mut doc = Document::new();
        for (i, &show) in shows.iter().enumerate() {
            let (times, frames) = calc.expand_times(
                TimeCode::from_millis(show),
                TimeCode::from_millis(show + 1000),
            );
            doc.insert_row(i, times, frames, format!("line {i}"), String::new());
        }
        doc
    }

    #[test]
    fn documents_iterate_members() {
        let all: Vec<Doc> = Documents::all().docs().collect();
        assert_eq!(all, vec![Doc::Main, Doc::Tran]);
        let tran: Vec<Doc> = Documents::from(Doc::Tran).docs().collect();
        assert_eq!(tran, vec![Doc::Tran]);
        assert!(Documents::empty().docs().next().is_none());
    }

    #[test]
    fn insertion_point_skips_row() {
        let doc = doc_with_shows(&[0, 1000, 2000, 3000]);
        let calc = Calculator::default();
        let key = calc.time_triple(TimeCode::from_millis(2500), TimeCode::from_millis(3500));
        // Without row 0 the others sit at 0..3, 2500 goes after 2000
        assert_eq!(doc.insertion_point(0, &key), 2);
        assert_eq!(doc.insertion_point(3, &key), 3);
        assert_eq!(doc.insertion_point(usize::MAX, &key), 3);
    }

    #[test]
    fn insertion_point_is_rightmost_on_ties() {
        let doc = doc_with_shows(&[1000, 1000, 1000]);
        let key = doc.times[0];
        assert_eq!(doc.insertion_point(usize::MAX, &key), 3);
        assert_eq!(doc.insertion_point(1, &key), 2);
    }

    #[test]
    fn move_row_keeps_columns_parallel() {
        let mut doc = doc_with_shows(&[0, 1000, 2000]);
        doc.move_row(0, 2);
        assert_eq!(doc.main_texts(), ["line 1", "line 2", "line 0"]);
        assert_eq!(doc.times[2].show, TimeCode::ZERO);
        assert_eq!(doc.frames.len(), 3);
    }

    #[test]
    fn sort_counts_out_of_order_rows() {
        let mut doc = doc_with_shows(&[3000, 1000, 2000, 0]);
        assert!(!doc.is_sorted());
        assert_eq!(doc.sort(), 2);
        assert!(doc.is_sorted());
        assert_eq!(doc.main_texts(), ["line 3", "line 1", "line 2", "line 0"]);
        assert_eq!(doc.sort(), 0);
    }

    #[test]
    fn row_view_and_bounds() {
        let doc = doc_with_shows(&[0, 500]);
        let row = doc.row(1).unwrap();
        assert_eq!(row.main_text, "line 1");
        assert_eq!(row.times.duration, TimeCode::from_millis(1000));
        assert!(doc.row(2).is_none());
        assert_eq!(doc.rows().count(), 2);
        assert!(doc.check_row(1).is_ok());
        assert_eq!(doc.check_row(2), Err(EditorError::row_out_of_bounds(2, 2)));
    }

    #[test]
    fn row_data_length_check() {
        let mut data = RowData::with_capacity(1);
        let calc = Calculator::default();
        let (times, frames) = calc.expand_times(TimeCode::ZERO, TimeCode::from_millis(10));
        data.push(times, frames, "a", "b");
        assert!(data.check_len(1).is_ok());
        assert!(matches!(
            data.check_len(2),
            Err(EditorError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }
}
