//! Position edits
//!
//! Single-cell edits go through [`Project::set_time`] and
//! [`Project::set_frame`], which keep the other unit and the durations in
//! step and move the row if its show changed its place in the order. Bulk
//! edits compute new triples and hand them to
//! [`Project::replace_positions`], or to [`Project::replace_framerate`] when
//! the framerate changes too.

use crate::commands::{check_paired, check_unique, rows_or_all};
use crate::core::action::{Action, Register, RevertOp};
use crate::core::document::Documents;
use crate::core::errors::{EditorError, Result};
use crate::core::project::Project;
use sub_core::{Calculator, Column, FrameCount, Framerate, Mode, PositionTriple, TimeCode};

/// Signed offset for [`Project::shift_positions`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shift {
    Seconds(f64),
    Frames(i64),
}

/// Rules for [`Project::adjust_durations`]
///
/// Durations are in seconds. `optimal` is seconds per character of main
/// text; `gap` is the minimum distance kept to the next row's show when
/// lengthening.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationAdjustment {
    pub optimal: Option<f64>,
    pub lengthen: bool,
    pub shorten: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionValue {
    Time(TimeCode),
    Frame(FrameCount),
}

type Triples = (PositionTriple<TimeCode>, PositionTriple<FrameCount>);

impl Project {
    /// Set one time column of `row`, returning the row's new index
    ///
    /// The frame of the same column and both durations follow. A duration
    /// writes `hide = show + value`. Editing the show may move the row to
    /// keep the document sorted. Does nothing if the value is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] if `row` does not exist.
    pub fn set_time(
        &mut self,
        row: usize,
        column: Column,
        value: TimeCode,
        register: Option<Register>,
    ) -> Result<usize> {
        self.set_position(row, column, PositionValue::Time(value), register)
    }

    /// Set one frame column of `row`, returning the row's new index
    ///
    /// Frame counterpart of [`Self::set_time`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] if `row` does not exist.
    pub fn set_frame(
        &mut self,
        row: usize,
        column: Column,
        value: FrameCount,
        register: Option<Register>,
    ) -> Result<usize> {
        self.set_position(row, column, PositionValue::Frame(value), register)
    }

    /// Check whether giving `row` the show `show` would move it
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] if `row` does not exist.
    pub fn needs_resort(&self, row: usize, show: TimeCode) -> Result<bool> {
        self.document.check_row(row)?;
        let hide = self.document.times[row].hide;
        let key = self.calc.time_triple(show, hide);
        Ok(self.document.insertion_point(row, &key) != row)
    }

    fn set_position(
        &mut self,
        row: usize,
        column: Column,
        value: PositionValue,
        register: Option<Register>,
    ) -> Result<usize> {
        self.document.check_row(row)?;
        let times = self.document.times[row];
        let frames = self.document.frames[row];
        let (new_times, new_frames) =
            updated_triples(&self.calc, self.mode, times, frames, column, value);
        if new_times == times && new_frames == frames {
            return Ok(row);
        }

        // The inverse restores hide rather than a duration that may have
        // been clamped, in the unit that is exact for this document.
        let revert_column = if column == Column::Duration {
            Column::Hide
        } else {
            column
        };
        let original = match self.mode {
            Mode::Time => PositionValue::Time(times.get(revert_column)),
            Mode::Frame => PositionValue::Frame(frames.get(revert_column)),
        };

        self.document.times[row] = new_times;
        self.document.frames[row] = new_frames;
        let new_row = if column == Column::Show {
            self.resort_row(row)
        } else {
            row
        };

        if let Some(register) = register {
            let revert = match original {
                PositionValue::Time(value) => RevertOp::SetTime {
                    row: new_row,
                    column: revert_column,
                    value,
                },
                PositionValue::Frame(value) => RevertOp::SetFrame {
                    row: new_row,
                    column: revert_column,
                    value,
                },
            };
            let builder = Action::builder(register, "Editing position")
                .documents(Documents::all())
                .revert(revert);
            let builder = if new_row == row {
                builder.updated_positions([row])
            } else {
                builder.updated_rows(row.min(new_row)..=row.max(new_row))
            };
            self.register_action(builder.build()?);
        }
        Ok(new_row)
    }

    /// Move `row` to where its time triple belongs, returning the new index
    fn resort_row(&mut self, row: usize) -> usize {
        let key = self.document.times[row];
        let target = self.document.insertion_point(row, &key);
        if target != row {
            self.document.move_row(row, target);
            #[cfg(feature = "tracing")]
            tracing::trace!(from = row, to = target, "resorted row");
        }
        target
    }

    /// Replace both triples of `rows`, pairing by position
    ///
    /// Does nothing if every triple is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows` has duplicates or rows out of range, if
    /// the triples do not pair with `rows`, or if the new shows would break
    /// the document order.
    pub fn replace_positions(
        &mut self,
        rows: &[usize],
        times: Vec<PositionTriple<TimeCode>>,
        frames: Vec<PositionTriple<FrameCount>>,
        register: Option<Register>,
    ) -> Result<()> {
        self.replace_positions_as(rows, times, frames, register, "Replacing positions")
    }

    pub(crate) fn replace_positions_as(
        &mut self,
        rows: &[usize],
        times: Vec<PositionTriple<TimeCode>>,
        frames: Vec<PositionTriple<FrameCount>>,
        register: Option<Register>,
        description: &str,
    ) -> Result<()> {
        check_paired("times", rows, times.len())?;
        check_paired("frames", rows, frames.len())?;
        check_unique(rows)?;
        for &row in rows {
            self.document.check_row(row)?;
        }
        let unchanged = rows.iter().zip(times.iter().zip(&frames)).all(|(&row, (t, f))| {
            self.document.times[row] == *t && self.document.frames[row] == *f
        });
        if unchanged {
            return Ok(());
        }
        self.check_order_after(rows, &times)?;

        let mut old_times = Vec::with_capacity(rows.len());
        let mut old_frames = Vec::with_capacity(rows.len());
        for ((&row, t), f) in rows.iter().zip(times).zip(frames) {
            old_times.push(core::mem::replace(&mut self.document.times[row], t));
            old_frames.push(core::mem::replace(&mut self.document.frames[row], f));
        }

        if let Some(register) = register {
            let action = Action::builder(register, description)
                .documents(Documents::all())
                .updated_positions(rows.iter().copied())
                .revert(RevertOp::ReplacePositions {
                    rows: rows.to_vec(),
                    times: old_times,
                    frames: old_frames,
                })
                .build()?;
            self.register_action(action);
        }
        Ok(())
    }

    /// Reject new shows for `rows` that would leave the document unsorted
    fn check_order_after(&self, rows: &[usize], times: &[PositionTriple<TimeCode>]) -> Result<()> {
        let mut replaced: Vec<(usize, TimeCode)> = rows
            .iter()
            .zip(times)
            .map(|(&row, t)| (row, t.show))
            .collect();
        replaced.sort_unstable_by_key(|&(row, _)| row);
        let show_at = |row: usize| {
            replaced
                .binary_search_by_key(&row, |&(r, _)| r)
                .map_or(self.document.times[row].show, |i| replaced[i].1)
        };
        for &(row, show) in &replaced {
            let after_prev = row == 0 || show_at(row - 1) <= show;
            let before_next = row + 1 >= self.document.len() || show <= show_at(row + 1);
            if !(after_prev && before_next) {
                return Err(EditorError::validation(format!(
                    "new show {show} of row {row} breaks the row order"
                )));
            }
        }
        Ok(())
    }

    /// Shift show and hide of `rows` (all rows if `None`)
    ///
    /// Positions clamp at zero. The shift is applied in the native unit, so
    /// a shift in the other unit is converted first.
    ///
    /// # Errors
    ///
    /// Returns an error for rows out of range, or if shifting part of the
    /// document would break the row order.
    pub fn shift_positions(
        &mut self,
        rows: Option<&[usize]>,
        amount: Shift,
        register: Option<Register>,
    ) -> Result<()> {
        let rows = rows_or_all(self, rows)?;
        let calc = self.calc;
        let shifted: Vec<Triples> = match self.mode {
            Mode::Time => {
                let seconds = match amount {
                    Shift::Seconds(seconds) => seconds,
                    Shift::Frames(frames) => frames as f64 / calc.fps(),
                };
                rows.iter()
                    .map(|&row| {
                        let t = self.document.times[row];
                        calc.expand(
                            calc.add_seconds_to_time(t.show, seconds),
                            calc.add_seconds_to_time(t.hide, seconds),
                        )
                    })
                    .collect()
            }
            Mode::Frame => {
                let frames = match amount {
                    Shift::Frames(frames) => frames,
                    Shift::Seconds(seconds) => (seconds * calc.fps()).round() as i64,
                };
                rows.iter()
                    .map(|&row| {
                        let f = self.document.frames[row];
                        calc.expand(calc.add_frames(f.show, frames), calc.add_frames(f.hide, frames))
                    })
                    .collect()
            }
        };
        let (times, frames) = shifted.into_iter().unzip();
        self.replace_positions_as(&rows, times, frames, register, "Shifting positions")
    }

    /// Correct positions of `rows` (all rows if `None`) linearly
    ///
    /// Each point is `(row, new_show)`. The line through the two points,
    /// mapping the rows' current shows to the given ones, is applied to the
    /// show and hide of every row, in the native unit.
    ///
    /// # Errors
    ///
    /// Returns an error if a row is out of range, if both points share the
    /// same current show, or if the mapping would break the row order.
    pub fn transform_positions(
        &mut self,
        rows: Option<&[usize]>,
        point_1: (usize, TimeCode),
        point_2: (usize, TimeCode),
        register: Option<Register>,
    ) -> Result<()> {
        let calc = self.calc;
        let native = |time: TimeCode| match self.mode {
            Mode::Time => calc.time_to_seconds(time),
            Mode::Frame => f64::from(calc.time_to_frame(time).get()),
        };
        let y1 = native(point_1.1);
        let y2 = native(point_2.1);
        self.transform_native(rows, (point_1.0, y1), (point_2.0, y2), register)
    }

    /// Frame variant of [`Self::transform_positions`]
    ///
    /// # Errors
    ///
    /// Same as [`Self::transform_positions`].
    pub fn transform_frames(
        &mut self,
        rows: Option<&[usize]>,
        point_1: (usize, FrameCount),
        point_2: (usize, FrameCount),
        register: Option<Register>,
    ) -> Result<()> {
        let calc = self.calc;
        let native = |frame: FrameCount| match self.mode {
            Mode::Time => calc.frame_to_seconds(frame),
            Mode::Frame => f64::from(frame.get()),
        };
        let y1 = native(point_1.1);
        let y2 = native(point_2.1);
        self.transform_native(rows, (point_1.0, y1), (point_2.0, y2), register)
    }

    fn transform_native(
        &mut self,
        rows: Option<&[usize]>,
        point_1: (usize, f64),
        point_2: (usize, f64),
        register: Option<Register>,
    ) -> Result<()> {
        self.document.check_row(point_1.0)?;
        self.document.check_row(point_2.0)?;
        let rows = rows_or_all(self, rows)?;
        let x1 = self.native_show(point_1.0);
        let x2 = self.native_show(point_2.0);
        if (x2 - x1).abs() < f64::EPSILON {
            return Err(EditorError::validation(
                "correction points must have different shows",
            ));
        }
        let coefficient = (point_2.1 - point_1.1) / (x2 - x1);
        let constant = point_1.1 - coefficient * x1;

        let calc = self.calc;
        let transformed: Vec<Triples> = rows
            .iter()
            .map(|&row| match self.mode {
                Mode::Time => {
                    let t = self.document.times[row];
                    let map = |time: TimeCode| {
                        calc.seconds_to_time(coefficient * calc.time_to_seconds(time) + constant)
                    };
                    calc.expand(map(t.show), map(t.hide))
                }
                Mode::Frame => {
                    let f = self.document.frames[row];
                    let map = |frame: FrameCount| {
                        let value = (coefficient * f64::from(frame.get()) + constant).round();
                        FrameCount(value.clamp(0.0, f64::from(u32::MAX)) as u32)
                    };
                    calc.expand(map(f.show), map(f.hide))
                }
            })
            .collect();
        let (times, frames) = transformed.into_iter().unzip();
        self.replace_positions_as(&rows, times, frames, register, "Transforming positions")
    }

    fn native_show(&self, row: usize) -> f64 {
        match self.mode {
            Mode::Time => self.calc.time_to_seconds(self.document.times[row].show),
            Mode::Frame => f64::from(self.document.frames[row].show.get()),
        }
    }

    /// Lengthen or shorten durations of `rows` (all rows if `None`)
    ///
    /// Only hides move, so the row order is kept.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] for rows out of range.
    pub fn adjust_durations(
        &mut self,
        rows: Option<&[usize]>,
        adjustment: DurationAdjustment,
        register: Option<Register>,
    ) -> Result<()> {
        let rows = rows_or_all(self, rows)?;
        let calc = self.calc;
        let mut changed_rows = Vec::new();
        let mut times = Vec::new();
        let mut frames = Vec::new();

        for &row in &rows {
            let current = self.document.times[row];
            let show = calc.time_to_seconds(current.show);
            let hide = calc.time_to_seconds(current.hide);
            let mut duration = (hide - show).max(0.0);

            if let Some(per_char) = adjustment.optimal {
                let chars = self.document.main_texts[row]
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .count();
                let optimal = chars as f64 * per_char;
                if (adjustment.lengthen && duration < optimal)
                    || (adjustment.shorten && duration > optimal)
                {
                    duration = optimal;
                }
            }
            if let Some(minimum) = adjustment.minimum.filter(|_| adjustment.lengthen) {
                duration = duration.max(minimum);
            }
            if let Some(maximum) = adjustment.maximum.filter(|_| adjustment.shorten) {
                duration = duration.min(maximum);
            }

            let mut new_hide = show + duration;
            if let (Some(gap), Some(next)) = (adjustment.gap, self.document.times.get(row + 1)) {
                let limit = calc.time_to_seconds(next.show) - gap;
                if new_hide > hide && new_hide > limit {
                    new_hide = limit.max(hide);
                }
            }

            let triples = match self.mode {
                Mode::Time => calc.expand(current.show, calc.seconds_to_time(new_hide)),
                Mode::Frame => {
                    let f = self.document.frames[row];
                    calc.expand(f.show, calc.seconds_to_frame(new_hide))
                }
            };
            if triples.0 != current || triples.1 != self.document.frames[row] {
                changed_rows.push(row);
                times.push(triples.0);
                frames.push(triples.1);
            }
        }

        if changed_rows.is_empty() {
            return Ok(());
        }
        self.replace_positions_as(&changed_rows, times, frames, register, "Adjusting durations")
    }

    /// Scale positions of `rows` (all rows if `None`) from `input` to
    /// `output` and switch the framerate to `output`
    ///
    /// In time mode the selected times are multiplied by `input / output`
    /// and frames are re-derived at `output`. In frame mode frame numbers
    /// stay and times are re-derived at `output`.
    ///
    /// # Errors
    ///
    /// Returns an error for rows out of range or if scaling part of the
    /// document would break the row order.
    pub fn convert_framerate(
        &mut self,
        rows: Option<&[usize]>,
        input: Framerate,
        output: Framerate,
        register: Option<Register>,
    ) -> Result<()> {
        let rows = rows_or_all(self, rows)?;
        let coefficient = input.fps() / output.fps();
        let calc = Calculator::new(output);
        let mut times = Vec::with_capacity(self.document.len());
        let mut frames = Vec::with_capacity(self.document.len());
        let mut selected = rows.iter().peekable();

        for row in 0..self.document.len() {
            let scale = selected.next_if_eq(&&row).is_some();
            let (t, f) = match self.mode {
                Mode::Time => {
                    let t = self.document.times[row];
                    if scale {
                        let map = |time: TimeCode| {
                            calc.seconds_to_time(calc.time_to_seconds(time) * coefficient)
                        };
                        calc.expand(map(t.show), map(t.hide))
                    } else {
                        calc.expand(t.show, t.hide)
                    }
                }
                Mode::Frame => {
                    let f = self.document.frames[row];
                    calc.expand(f.show, f.hide)
                }
            };
            times.push(t);
            frames.push(f);
        }
        self.replace_framerate_as(output, times, frames, register, "Converting framerate")
    }

    /// Reinterpret the document at `framerate`
    ///
    /// Native positions stay and the other unit is re-derived.
    ///
    /// # Errors
    ///
    /// Only fails if registering the action fails.
    pub fn change_framerate(&mut self, framerate: Framerate, register: Option<Register>) -> Result<()> {
        let calc = Calculator::new(framerate);
        let (times, frames): (Vec<_>, Vec<_>) = match self.mode {
            Mode::Time => self
                .document
                .times
                .iter()
                .map(|t| calc.expand(t.show, t.hide))
                .unzip(),
            Mode::Frame => self
                .document
                .frames
                .iter()
                .map(|f| calc.expand(f.show, f.hide))
                .unzip(),
        };
        self.replace_framerate_as(framerate, times, frames, register, "Changing framerate")
    }

    /// Set the framerate together with every row's positions
    ///
    /// Does nothing if nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::LengthMismatch`] unless both vectors cover
    /// every row, or a validation error if the times are not sorted.
    pub fn replace_framerate(
        &mut self,
        framerate: Framerate,
        times: Vec<PositionTriple<TimeCode>>,
        frames: Vec<PositionTriple<FrameCount>>,
        register: Option<Register>,
    ) -> Result<()> {
        self.replace_framerate_as(framerate, times, frames, register, "Replacing framerate")
    }

    fn replace_framerate_as(
        &mut self,
        framerate: Framerate,
        times: Vec<PositionTriple<TimeCode>>,
        frames: Vec<PositionTriple<FrameCount>>,
        register: Option<Register>,
        description: &str,
    ) -> Result<()> {
        let len = self.document.len();
        for (what, actual) in [("times", times.len()), ("frames", frames.len())] {
            if actual != len {
                return Err(EditorError::LengthMismatch {
                    what,
                    expected: len,
                    actual,
                });
            }
        }
        if framerate == self.calc.framerate()
            && times == self.document.times
            && frames == self.document.frames
        {
            return Ok(());
        }
        if times.windows(2).any(|pair| pair[1].show < pair[0].show) {
            return Err(EditorError::validation("new positions break the row order"));
        }

        let old_framerate = self.calc.framerate();
        let old_times = core::mem::replace(&mut self.document.times, times);
        let old_frames = core::mem::replace(&mut self.document.frames, frames);
        self.calc.set_framerate(framerate);

        #[cfg(feature = "tracing")]
        tracing::debug!(from = %old_framerate, to = %framerate, "framerate replaced");

        if let Some(register) = register {
            let action = Action::builder(register, description)
                .documents(Documents::all())
                .updated_positions(0..len)
                .revert(RevertOp::ReplaceFramerate {
                    framerate: old_framerate,
                    times: old_times,
                    frames: old_frames,
                })
                .build()?;
            self.register_action(action);
        }
        Ok(())
    }
}

/// New triples after writing `value` into `column`
///
/// A value in the other unit is first converted to the native unit of
/// `mode`, so the stored pair is exactly what the native value derives. The
/// other unit is converted for the touched endpoint only, so untouched
/// endpoints keep their exact values.
fn updated_triples(
    calc: &Calculator,
    mode: Mode,
    times: PositionTriple<TimeCode>,
    frames: PositionTriple<FrameCount>,
    column: Column,
    value: PositionValue,
) -> Triples {
    // A duration becomes the hide it implies before switching units
    let endpoint = if column == Column::Duration {
        Column::Hide
    } else {
        column
    };
    match (mode, value) {
        (Mode::Frame, PositionValue::Time(value)) => {
            let time = match column {
                Column::Show | Column::Hide => value,
                Column::Duration => calc.add_times(times.show, value),
            };
            let frame = PositionValue::Frame(calc.time_to_frame(time));
            updated_triples(calc, mode, times, frames, endpoint, frame)
        }
        (Mode::Time, PositionValue::Frame(value)) => {
            let frame = match column {
                Column::Show | Column::Hide => value,
                Column::Duration => frames.show.saturating_add(value),
            };
            let time = PositionValue::Time(calc.frame_to_time(frame));
            updated_triples(calc, mode, times, frames, endpoint, time)
        }
        (_, PositionValue::Time(value)) => {
            let (show, hide) = match column {
                Column::Show => (value, times.hide),
                Column::Hide => (times.show, value),
                Column::Duration => (times.show, calc.add_times(times.show, value)),
            };
            let (frame_show, frame_hide) = match column {
                Column::Show => (calc.time_to_frame(show), frames.hide),
                Column::Hide | Column::Duration => (frames.show, calc.time_to_frame(hide)),
            };
            (
                calc.time_triple(show, hide),
                calc.frame_triple(frame_show, frame_hide),
            )
        }
        (_, PositionValue::Frame(value)) => {
            let (show, hide) = match column {
                Column::Show => (value, frames.hide),
                Column::Hide => (frames.show, value),
                Column::Duration => (frames.show, frames.show.saturating_add(value)),
            };
            let (time_show, time_hide) = match column {
                Column::Show => (calc.frame_to_time(show), times.hide),
                Column::Hide | Column::Duration => (times.show, calc.frame_to_time(hide)),
            };
            (
                calc.time_triple(time_show, time_hide),
                calc.frame_triple(show, hide),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::Stack;
    use crate::{Doc, ProjectConfig};
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> TimeCode {
        s.parse().unwrap()
    }

    /// Rows showing at 0, 10, 20, ... seconds, each lasting 2 seconds
    fn project(rows: u32, mode: Mode) -> Project {
        let mut project = Project::with_config(ProjectConfig {
            mode,
            framerate: Framerate::Fps25,
            ..ProjectConfig::default()
        });
        for row in 0..rows {
            let (times, frames) = project.expand_positions(
                TimeCode::from_millis(row * 10_000),
                TimeCode::from_millis(row * 10_000 + 2_000),
            );
            let mut data = crate::RowData::default();
            data.push(times, frames, format!("row {row}"), "");
            project
                .insert_rows(&[row as usize], Some(data), None)
                .unwrap();
        }
        project
    }

    fn texts(project: &Project) -> Vec<&str> {
        project
            .document()
            .main_texts()
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn set_show_resorts_and_reports_range() {
        let mut project = project(4, Mode::Time);
        let new_row = project
            .set_time(0, Column::Show, t("00:00:25.000"), Some(Register::Do))
            .unwrap();
        assert_eq!(new_row, 2);
        assert_eq!(texts(&project), ["row 1", "row 2", "row 0", "row 3"]);
        assert!(project.document().is_sorted());

        let action = &project.history().peek(Stack::Undo).unwrap().actions()[0];
        assert_eq!(action.updated_rows(), &[0, 1, 2]);
        assert!(action.updated_positions().is_empty());

        project.undo(1).unwrap();
        assert_eq!(texts(&project), ["row 0", "row 1", "row 2", "row 3"]);
        assert_eq!(project.document().times()[0].show, TimeCode::ZERO);
    }

    #[test]
    fn set_show_in_place_reports_position() {
        let mut project = project(3, Mode::Time);
        let new_row = project
            .set_time(1, Column::Show, t("00:00:11.000"), Some(Register::Do))
            .unwrap();
        assert_eq!(new_row, 1);
        let action = &project.history().peek(Stack::Undo).unwrap().actions()[0];
        assert_eq!(action.updated_positions(), &[1]);
        assert_eq!(project.document().frames()[1].show, FrameCount(275));
        assert_eq!(project.document().times()[1].duration, t("00:00:01.000"));
    }

    #[test]
    fn unchanged_position_is_a_no_op() {
        let mut project = project(2, Mode::Time);
        let row = project
            .set_frame(1, Column::Show, FrameCount(250), Some(Register::Do))
            .unwrap();
        assert_eq!(row, 1);
        assert!(!project.can_undo());
    }

    #[test]
    fn duration_edit_reverts_hide() {
        let mut project = project(2, Mode::Time);
        project
            .set_time(0, Column::Duration, t("00:00:05.000"), Some(Register::Do))
            .unwrap();
        assert_eq!(project.document().times()[0].hide, t("00:00:05.000"));
        assert_eq!(project.document().frames()[0].hide, FrameCount(125));
        match project.history().peek(Stack::Undo).unwrap().actions()[0].revert_op() {
            Some(RevertOp::SetTime { column, value, .. }) => {
                assert_eq!(*column, Column::Hide);
                assert_eq!(*value, t("00:00:02.000"));
            }
            other => panic!("unexpected revert {other:?}"),
        }
        project.undo(1).unwrap();
        assert_eq!(project.document().times()[0].duration, t("00:00:02.000"));
    }

    #[test]
    fn frame_mode_records_frame_inverse() {
        let mut project = project(2, Mode::Frame);
        let before = project.document().clone();
        project
            .set_time(1, Column::Hide, t("00:00:13.000"), Some(Register::Do))
            .unwrap();
        assert!(matches!(
            project.history().peek(Stack::Undo).unwrap().actions()[0].revert_op(),
            Some(RevertOp::SetFrame {
                column: Column::Hide,
                value: FrameCount(300),
                ..
            })
        ));
        project.undo(1).unwrap();
        assert_eq!(project.document(), &before);
    }

    #[test]
    fn off_frame_time_snaps_to_native_frame() {
        let mut project = project(2, Mode::Frame);
        project
            .set_time(0, Column::Hide, t("00:00:03.010"), Some(Register::Do))
            .unwrap();
        let after = project.document().clone();
        assert_eq!(after.frames()[0].hide, FrameCount(75));
        assert_eq!(after.times()[0].hide, t("00:00:03.000"));

        project.undo(1).unwrap();
        assert_eq!(project.document().times()[0].hide, t("00:00:02.000"));
        project.redo(1).unwrap();
        assert_eq!(project.document(), &after);

        // Snaps to the value already stored
        project
            .set_time(0, Column::Hide, t("00:00:03.010"), Some(Register::Do))
            .unwrap();
        assert_eq!(project.history().undo_count(), 1);
    }

    #[test]
    fn frame_edit_on_time_document_goes_through_time() {
        let mut project = project(2, Mode::Time);
        project
            .set_frame(1, Column::Duration, FrameCount(13), Some(Register::Do))
            .unwrap();
        let after = project.document().clone();
        assert_eq!(after.times()[1].hide, t("00:00:10.520"));
        assert_eq!(after.frames()[1].hide, FrameCount(263));
        assert!(matches!(
            project.history().peek(Stack::Undo).unwrap().actions()[0].revert_op(),
            Some(RevertOp::SetTime {
                column: Column::Hide,
                ..
            })
        ));

        project.undo(1).unwrap();
        project.redo(1).unwrap();
        assert_eq!(project.document(), &after);
    }

    #[test]
    fn needs_resort_predicts_moves() {
        let project = project(3, Mode::Time);
        assert!(!project.needs_resort(1, t("00:00:15.000")).unwrap());
        assert!(project.needs_resort(1, t("00:00:25.000")).unwrap());
        assert!(project.needs_resort(2, t("00:00:05.000")).unwrap());
        assert!(project.needs_resort(3, TimeCode::ZERO).is_err());
    }

    #[test]
    fn shift_all_rows_and_undo() {
        let mut project = project(3, Mode::Time);
        let before = project.document().clone();
        project
            .shift_positions(None, Shift::Seconds(-5.0), Some(Register::Do))
            .unwrap();
        let shows: Vec<String> = project
            .document()
            .times()
            .iter()
            .map(|t| t.show.to_string())
            .collect();
        assert_eq!(shows, ["00:00:00.000", "00:00:05.000", "00:00:15.000"]);
        assert_eq!(project.document().times()[0].hide, TimeCode::ZERO);
        assert_eq!(project.history().undo_description(), Some("Shifting positions"));
        project.undo(1).unwrap();
        assert_eq!(project.document(), &before);
    }

    #[test]
    fn shift_in_frames_on_frame_document() {
        let mut project = project(2, Mode::Frame);
        project
            .shift_positions(Some(&[1]), Shift::Frames(25), Some(Register::Do))
            .unwrap();
        assert_eq!(project.document().frames()[1].show, FrameCount(275));
        assert_eq!(project.document().times()[1].show, t("00:00:11.000"));
        assert_eq!(project.document().frames()[0].show, FrameCount(0));
    }

    #[test]
    fn partial_shift_that_breaks_order_is_rejected() {
        let mut project = project(3, Mode::Time);
        let before = project.document().clone();
        let err = project
            .shift_positions(Some(&[0]), Shift::Seconds(15.0), Some(Register::Do))
            .unwrap_err();
        assert!(matches!(err, EditorError::ValidationError { .. }));
        assert_eq!(project.document(), &before);
        assert!(!project.can_undo());
    }

    #[test]
    fn transform_maps_through_two_points() {
        let mut project = project(3, Mode::Time);
        project
            .transform_positions(
                None,
                (0, t("00:00:01.000")),
                (2, t("00:00:41.000")),
                Some(Register::Do),
            )
            .unwrap();
        let times = project.document().times();
        assert_eq!(times[0].show, t("00:00:01.000"));
        assert_eq!(times[1].show, t("00:00:21.000"));
        assert_eq!(times[1].hide, t("00:00:25.000"));
        assert_eq!(times[2].show, t("00:00:41.000"));
        assert!(project
            .transform_positions(None, (1, TimeCode::ZERO), (1, TimeCode::MAX), None)
            .is_err());
    }

    #[test]
    fn adjust_durations_lengthens_within_gap() {
        let mut project = project(2, Mode::Time);
        project
            .set_text(0, Doc::Main, "x".repeat(100), None)
            .unwrap();
        project
            .adjust_durations(
                None,
                DurationAdjustment {
                    optimal: Some(0.5),
                    lengthen: true,
                    gap: Some(1.0),
                    ..DurationAdjustment::default()
                },
                Some(Register::Do),
            )
            .unwrap();
        // Row 0 wants 50 s but stops one second before row 1
        assert_eq!(project.document().times()[0].hide, t("00:00:09.000"));
        // Row 1 ("row 1", 4 chars) wants 2 s and already has it
        assert_eq!(project.document().times()[1].hide, t("00:00:12.000"));
        let action = &project.history().peek(Stack::Undo).unwrap().actions()[0];
        assert_eq!(action.updated_positions(), &[0]);
    }

    #[test]
    fn adjust_durations_shortens_to_maximum() {
        let mut project = project(2, Mode::Frame);
        project
            .adjust_durations(
                Some(&[1]),
                DurationAdjustment {
                    shorten: true,
                    maximum: Some(1.0),
                    ..DurationAdjustment::default()
                },
                Some(Register::Do),
            )
            .unwrap();
        assert_eq!(project.document().frames()[1].duration, FrameCount(25));
        assert_eq!(project.document().frames()[0].duration, FrameCount(50));
    }

    #[test]
    fn convert_framerate_scales_times_and_undoes() {
        let mut project = project(2, Mode::Time);
        let before = project.document().clone();
        project
            .convert_framerate(None, Framerate::Fps25, Framerate::Fps50, Some(Register::Do))
            .unwrap();
        assert_eq!(project.framerate(), Framerate::Fps50);
        assert_eq!(project.document().times()[1].show, t("00:00:05.000"));
        assert_eq!(project.document().frames()[1].show, FrameCount(250));

        project.undo(1).unwrap();
        assert_eq!(project.framerate(), Framerate::Fps25);
        assert_eq!(project.document(), &before);
        project.redo(1).unwrap();
        assert_eq!(project.framerate(), Framerate::Fps50);
    }

    #[test]
    fn change_framerate_rederives_other_unit() {
        let mut project = project(2, Mode::Frame);
        project
            .change_framerate(Framerate::Fps50, Some(Register::Do))
            .unwrap();
        assert_eq!(project.document().frames()[1].show, FrameCount(250));
        assert_eq!(project.document().times()[1].show, t("00:00:05.000"));
        project.undo(1).unwrap();
        assert_eq!(project.document().times()[1].show, t("00:00:10.000"));
        assert!(project
            .change_framerate(Framerate::Fps25, Some(Register::Do))
            .is_ok());
        assert_eq!(project.history().undo_count(), 0);
    }
}
