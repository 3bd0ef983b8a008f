//! Edits built from several primitives
//!
//! With a register these run inside [`Project::transaction`], so the
//! primitives they call end up as one grouped undo step with one merged
//! notification.

use crate::commands::normalize_rows;
use crate::core::action::Register;
use crate::core::document::{Doc, RowData};
use crate::core::errors::{EditorError, Result};
use crate::core::project::Project;
use sub_core::{Column, FrameCount, Mode, TimeCode};

impl Project {
    /// Split `row` into two rows at the midpoint of its positions
    ///
    /// The first half keeps the first `ceil(n / 2)` lines of each text, the
    /// second half gets the rest. Returns the index of the second half.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] if `row` does not exist.
    pub fn split_row(&mut self, row: usize, register: Option<Register>) -> Result<usize> {
        self.document.check_row(row)?;
        self.grouped(register, "Splitting subtitle", |project, register| {
            project.split_row_with(row, register)
        })
    }

    fn split_row_with(&mut self, row: usize, register: Option<Register>) -> Result<usize> {
        let times = self.document.times[row];
        let frames = self.document.frames[row];
        let second = match self.mode {
            Mode::Time => {
                let show = times.show.as_millis();
                let hide = times.hide.as_millis().max(show);
                let mid = TimeCode::from_millis(show + (hide - show) / 2);
                self.set_time(row, Column::Hide, mid, register)?;
                self.calc.expand(mid, times.hide)
            }
            Mode::Frame => {
                let show = frames.show.get();
                let hide = frames.hide.get().max(show);
                let mid = FrameCount(show + (hide - show) / 2);
                self.set_frame(row, Column::Hide, mid, register)?;
                self.calc.expand(mid, frames.hide)
            }
        };

        let (main_first, main_second) = split_lines(&self.document.main_texts[row]);
        let (tran_first, tran_second) = split_lines(&self.document.tran_texts[row]);
        self.set_text(row, Doc::Main, main_first, register)?;
        self.set_text(row, Doc::Tran, tran_first, register)?;

        let mut data = RowData::with_capacity(1);
        data.push(second.0, second.1, main_second, tran_second);
        let target = self.document.insertion_point(usize::MAX, &second.0);
        self.insert_rows(&[target], Some(data), register)?;
        Ok(target)
    }

    /// Merge a contiguous range of rows into one
    ///
    /// The merged row spans the first row's show to the last row's hide.
    /// Non-empty texts are joined with newlines. Returns the merged row's
    /// index.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless `rows` names at least two
    /// contiguous rows, or [`EditorError::RowOutOfBounds`] if any row does
    /// not exist.
    pub fn merge_rows(&mut self, rows: &[usize], register: Option<Register>) -> Result<usize> {
        let rows = normalize_rows(rows);
        let (first, last) = match rows.as_slice() {
            [first, .., last] => (*first, *last),
            _ => return Err(EditorError::validation("merging needs at least two rows")),
        };
        if last - first + 1 != rows.len() {
            return Err(EditorError::validation("merged rows must be contiguous"));
        }
        self.document.check_row(last)?;

        let (times, frames) = match self.mode {
            Mode::Time => self
                .calc
                .expand(self.document.times[first].show, self.document.times[last].hide),
            Mode::Frame => self
                .calc
                .expand(self.document.frames[first].show, self.document.frames[last].hide),
        };
        let join = |texts: &[String]| {
            texts[first..=last]
                .iter()
                .filter(|text| !text.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n")
        };
        let mut data = RowData::with_capacity(1);
        data.push(
            times,
            frames,
            join(&self.document.main_texts),
            join(&self.document.tran_texts),
        );

        self.grouped(register, "Merging subtitles", |project, register| {
            project.remove_rows(&rows, register)?;
            project.insert_rows(&[first], Some(data), register)?;
            Ok(first)
        })
    }

    fn grouped<T>(
        &mut self,
        register: Option<Register>,
        description: &str,
        edit: impl FnOnce(&mut Self, Option<Register>) -> Result<T>,
    ) -> Result<T> {
        match register {
            Some(register) => {
                self.transaction(register, description, |project| edit(project, Some(register)))
            }
            None => edit(self, None),
        }
    }
}

/// First `ceil(n / 2)` lines and the remaining lines of `text`
fn split_lines(text: &str) -> (String, String) {
    let lines: Vec<&str> = text.split('\n').collect();
    let (first, second) = lines.split_at(lines.len().div_ceil(2));
    (first.join("\n"), second.join("\n"))
}
