//! Inserting and removing rows

use crate::commands::normalize_rows;
use crate::core::action::{Action, Register, RevertOp};
use crate::core::document::{Documents, RowData};
use crate::core::errors::{EditorError, Result};
use crate::core::project::Project;
use sub_core::{FrameCount, Mode, Position, PositionTriple, TimeCode};

impl Project {
    /// Both triples for a show/hide pair in either unit, using the current
    /// framerate
    ///
    /// A pair in the other unit is converted to the native unit first, and
    /// the result is derived from that.
    #[must_use]
    pub fn expand_positions<P: Position>(
        &self,
        show: P,
        hide: P,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>) {
        let (times, frames) = self.calc.expand(show, hide);
        match self.mode {
            Mode::Time => self.calc.expand(times.show, times.hide),
            Mode::Frame => self.calc.expand(frames.show, frames.hide),
        }
    }

    /// Insert rows at final indices `rows`
    ///
    /// With `data` the rows are inserted verbatim and `rows` must be strictly
    /// ascending. Without it blank rows are synthesized per consecutive block:
    /// they evenly split the gap between the row before the block and the
    /// row after it, or take `default_duration` each at the end.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] if a row cannot be a final
    /// index, or a length or validation error for mismatched `data`.
    pub fn insert_rows(
        &mut self,
        rows: &[usize],
        data: Option<RowData>,
        register: Option<Register>,
    ) -> Result<()> {
        let sorted = normalize_rows(rows);
        let final_len = self.document.len() + sorted.len();
        if let Some(&last) = sorted.last() {
            if last >= final_len {
                return Err(EditorError::row_out_of_bounds(last, final_len));
            }
        } else {
            return Ok(());
        }

        match data {
            Some(data) => {
                if sorted.as_slice() != rows {
                    return Err(EditorError::validation(
                        "rows inserted with data must be strictly ascending",
                    ));
                }
                data.check_len(rows.len())?;
                let RowData {
                    times,
                    frames,
                    main_texts,
                    tran_texts,
                } = data;
                let columns = times.into_iter().zip(frames).zip(main_texts).zip(tran_texts);
                for (&row, (((times, frames), main_text), tran_text)) in rows.iter().zip(columns) {
                    self.document
                        .insert_row(row, times, frames, main_text, tran_text);
                }
            }
            None => self.insert_blank_rows(&sorted),
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(rows = ?sorted, "inserted rows");

        if let Some(register) = register {
            let action = Action::builder(register, "Inserting subtitles")
                .documents(Documents::all())
                .revert(RevertOp::RemoveRows {
                    rows: sorted.clone(),
                })
                .inserted_rows(sorted)
                .build()?;
            self.register_action(action);
        }
        Ok(())
    }

    /// Remove rows `rows`
    ///
    /// The removed rows are captured so that the inverse re-inserts them
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RowOutOfBounds`] if any row does not exist.
    pub fn remove_rows(&mut self, rows: &[usize], register: Option<Register>) -> Result<()> {
        let rows = normalize_rows(rows);
        let Some(&last) = rows.last() else {
            return Ok(());
        };
        self.document.check_row(last)?;

        let mut removed: Vec<_> = rows
            .iter()
            .rev()
            .map(|&row| self.document.remove_row(row))
            .collect();
        removed.reverse();
        let mut data = RowData::with_capacity(removed.len());
        for (times, frames, main_text, tran_text) in removed {
            data.push(times, frames, main_text, tran_text);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(rows = ?rows, "removed rows");

        if let Some(register) = register {
            let action = Action::builder(register, "Removing subtitles")
                .documents(Documents::all())
                .removed_rows(rows.iter().copied())
                .revert(RevertOp::InsertRows { rows, data })
                .build()?;
            self.register_action(action);
        }
        Ok(())
    }

    fn insert_blank_rows(&mut self, rows: &[usize]) {
        let mut start = 0;
        while start < rows.len() {
            let mut end = start + 1;
            while end < rows.len() && rows[end] == rows[end - 1] + 1 {
                end += 1;
            }
            let first = rows[start];
            let amount = end - start;
            for (offset, (times, frames)) in self.blank_positions(first, amount).into_iter().enumerate() {
                self.document
                    .insert_row(first + offset, times, frames, String::new(), String::new());
            }
            start = end;
        }
    }

    /// Seconds taken by `amount` blank rows appended at the end
    ///
    /// Never negative, also for a negative or NaN default duration.
    fn blank_slot(&self, amount: usize) -> f64 {
        (self.default_duration * amount as f64).max(0.0)
    }

    /// Positions for `amount` blank rows inserted at `first`
    fn blank_positions(
        &self,
        first: usize,
        amount: usize,
    ) -> Vec<(PositionTriple<TimeCode>, PositionTriple<FrameCount>)> {
        let amount_u64 = amount as u64;
        match self.mode {
            Mode::Time => {
                let begin = first
                    .checked_sub(1)
                    .map_or(TimeCode::ZERO, |prev| {
                        let prev = self.document.times[prev];
                        prev.show.max(prev.hide)
                    });
                let (begin, end) = match self.document.times.get(first) {
                    Some(next) => (begin.min(next.show), next.show),
                    None => {
                        let end = self.calc.add_seconds_to_time(begin, self.blank_slot(amount));
                        (begin, end)
                    }
                };
                let base = u64::from(begin.as_millis());
                let span = u64::from(end.as_millis()).saturating_sub(base);
                (0..amount_u64)
                    .map(|i| {
                        let show = base + span * i / amount_u64;
                        let hide = base + span * (i + 1) / amount_u64;
                        self.calc.expand(
                            TimeCode::from_millis(show as u32),
                            TimeCode::from_millis(hide as u32),
                        )
                    })
                    .collect()
            }
            Mode::Frame => {
                let begin = first
                    .checked_sub(1)
                    .map_or(FrameCount::ZERO, |prev| {
                        let prev = self.document.frames[prev];
                        prev.show.max(prev.hide)
                    });
                let (begin, end) = match self.document.frames.get(first) {
                    Some(next) => (begin.min(next.show), next.show),
                    None => {
                        let end = self.calc.add_seconds_to_frame(begin, self.blank_slot(amount));
                        (begin, end)
                    }
                };
                let base = u64::from(begin.get());
                let span = u64::from(end.get()).saturating_sub(base);
                (0..amount_u64)
                    .map(|i| {
                        let show = base + span * i / amount_u64;
                        let hide = base + span * (i + 1) / amount_u64;
                        self.calc
                            .expand(FrameCount(show as u32), FrameCount(hide as u32))
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Doc, EditorError, Project, ProjectConfig, Register};
    use pretty_assertions::assert_eq;
    use sub_core::{FrameCount, Mode, TimeCode};

    fn shows(project: &Project) -> Vec<String> {
        project
            .document()
            .times()
            .iter()
            .map(|t| t.show.to_string())
            .collect()
    }

    #[test]
    fn blank_rows_at_end_use_default_duration() {
        let mut project = Project::new();
        project.insert_rows(&[0, 1], None, None).unwrap();
        assert_eq!(shows(&project), ["00:00:00.000", "00:00:03.000"]);
        let last = project.document().times()[1];
        assert_eq!(last.hide.to_string(), "00:00:06.000");
        assert_eq!(last.duration.to_string(), "00:00:03.000");
    }

    #[test]
    fn blank_rows_split_gap_to_next_row() {
        let mut project = Project::new();
        project.insert_rows(&[0, 1], None, None).unwrap();
        // Gap between hide of row 0 (3 s) and show of row 1 (3 s) is empty,
        // so move row 1 away first.
        project
            .set_time(1, sub_core::Column::Show, TimeCode::from_millis(9000), None)
            .unwrap();
        project.insert_rows(&[1, 2, 3], None, None).unwrap();
        assert_eq!(
            shows(&project),
            [
                "00:00:00.000",
                "00:00:03.000",
                "00:00:05.000",
                "00:00:07.000",
                "00:00:09.000"
            ]
        );
        assert!(project.document().is_sorted());
    }

    #[test]
    fn blank_rows_in_frame_mode() {
        let mut project = Project::with_config(ProjectConfig {
            mode: Mode::Frame,
            framerate: sub_core::Framerate::Fps25,
            ..ProjectConfig::default()
        });
        project.insert_rows(&[0], None, None).unwrap();
        let frames = project.document().frames()[0];
        assert_eq!(frames.show, FrameCount(0));
        assert_eq!(frames.hide, FrameCount(75));
    }

    #[test]
    fn invalid_default_duration_gives_empty_slots() {
        for (mode, default_duration) in [
            (Mode::Time, -2.0),
            (Mode::Time, f64::NAN),
            (Mode::Frame, -2.0),
            (Mode::Frame, f64::NAN),
        ] {
            let mut project = Project::with_config(ProjectConfig {
                mode,
                framerate: sub_core::Framerate::Fps25,
                default_duration,
                ..ProjectConfig::default()
            });
            project.insert_rows(&[0], None, None).unwrap();
            project
                .set_time(0, sub_core::Column::Hide, TimeCode::from_millis(4_000), None)
                .unwrap();
            project.insert_rows(&[1, 2], None, None).unwrap();
            let times = project.document().times();
            assert_eq!(times[1].show, TimeCode::from_millis(4_000));
            assert_eq!(times[2].hide, TimeCode::from_millis(4_000));
            assert_eq!(times[2].duration, TimeCode::ZERO);
            assert!(project.document().is_sorted());
        }
    }

    #[test]
    fn expand_positions_derives_from_native_unit() {
        let mut project = Project::with_config(ProjectConfig {
            mode: Mode::Frame,
            framerate: sub_core::Framerate::Fps25,
            ..ProjectConfig::default()
        });
        let (times, frames) =
            project.expand_positions(TimeCode::from_millis(1_010), TimeCode::from_millis(3_010));
        assert_eq!(frames.show, FrameCount(25));
        assert_eq!(times.show, TimeCode::from_millis(1_000));
        assert_eq!(times.hide, TimeCode::from_millis(3_000));

        project.set_mode(Mode::Time);
        let (times, frames) = project.expand_positions(FrameCount(26), FrameCount(51));
        assert_eq!(times.show, TimeCode::from_millis(1_040));
        assert_eq!(frames.hide, FrameCount(51));
    }

    #[test]
    fn insert_then_undo_restores() {
        let mut project = Project::new();
        project.insert_rows(&[0, 1], None, None).unwrap();
        project
            .set_text(1, Doc::Main, "keep", None)
            .unwrap();
        let before = project.document().clone();
        project
            .insert_rows(&[0, 3], None, Some(Register::Do))
            .unwrap();
        assert_eq!(project.document().len(), 4);
        assert_eq!(project.document().main_texts()[2], "keep");
        project.undo(1).unwrap();
        assert_eq!(project.document(), &before);
    }

    #[test]
    fn remove_then_undo_restores_verbatim() {
        let mut project = Project::new();
        project.insert_rows(&[0, 1, 2, 3], None, None).unwrap();
        for row in 0..4 {
            project
                .set_text(row, Doc::Main, format!("line {row}"), None)
                .unwrap();
        }
        let before = project.document().clone();
        project.remove_rows(&[3, 1], Some(Register::Do)).unwrap();
        assert_eq!(project.document().main_texts(), ["line 0", "line 2"]);
        project.undo(1).unwrap();
        assert_eq!(project.document(), &before);
        project.redo(1).unwrap();
        assert_eq!(project.document().main_texts(), ["line 0", "line 2"]);
    }

    #[test]
    fn out_of_range_rows_are_rejected() {
        let mut project = Project::new();
        project.insert_rows(&[0], None, None).unwrap();
        assert_eq!(
            project.insert_rows(&[3], None, None),
            Err(EditorError::row_out_of_bounds(3, 2))
        );
        assert_eq!(
            project.remove_rows(&[0, 1], None),
            Err(EditorError::row_out_of_bounds(1, 1))
        );
        assert_eq!(project.document().len(), 1);
        assert!(project.insert_rows(&[], None, Some(Register::Do)).is_ok());
        assert!(!project.can_undo());
    }
}
