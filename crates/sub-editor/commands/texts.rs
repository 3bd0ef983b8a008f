//! Text edits

use crate::commands::{check_paired, check_unique};
use crate::core::action::{Action, Register, RevertOp};
use crate::core::document::Doc;
use crate::core::errors::Result;
use crate::core::project::Project;

impl Project {
    /// Set the text of `row` in `doc`
    ///
    /// Does nothing if the text is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::RowOutOfBounds`] if `row` does not exist.
    pub fn set_text(
        &mut self,
        row: usize,
        doc: Doc,
        value: impl Into<String>,
        register: Option<Register>,
    ) -> Result<()> {
        self.document.check_row(row)?;
        let value = value.into();
        let slot = self.document.text_mut(doc, row);
        if *slot == value {
            return Ok(());
        }
        let old = core::mem::replace(slot, value);

        if let Some(register) = register {
            let action = Action::builder(register, "Editing text")
                .documents(doc)
                .updated_texts(doc, [row])
                .revert(RevertOp::SetText {
                    row,
                    doc,
                    value: old,
                })
                .build()?;
            self.register_action(action);
        }
        Ok(())
    }

    /// Replace the texts of `rows` in `doc`, pairing by position
    ///
    /// Does nothing if every text is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows` has duplicates or rows out of range, or if
    /// `texts` does not pair with `rows`.
    pub fn replace_texts(
        &mut self,
        rows: &[usize],
        doc: Doc,
        texts: Vec<String>,
        register: Option<Register>,
    ) -> Result<()> {
        self.replace_texts_as(rows, doc, texts, register, "Replacing texts")
    }

    /// Empty the texts of `rows` in `doc`
    ///
    /// # Errors
    ///
    /// Returns an error if `rows` has duplicates or rows out of range.
    pub fn clear_texts(&mut self, rows: &[usize], doc: Doc, register: Option<Register>) -> Result<()> {
        let texts = vec![String::new(); rows.len()];
        self.replace_texts_as(rows, doc, texts, register, "Clearing texts")
    }

    pub(crate) fn replace_texts_as(
        &mut self,
        rows: &[usize],
        doc: Doc,
        texts: Vec<String>,
        register: Option<Register>,
        description: &str,
    ) -> Result<()> {
        check_paired("texts", rows, texts.len())?;
        check_unique(rows)?;
        for &row in rows {
            self.document.check_row(row)?;
        }
        let current = self.document.texts(doc);
        if rows.iter().zip(&texts).all(|(&row, text)| current[row] == *text) {
            return Ok(());
        }

        let old: Vec<String> = rows
            .iter()
            .zip(texts)
            .map(|(&row, text)| core::mem::replace(self.document.text_mut(doc, row), text))
            .collect();

        if let Some(register) = register {
            let action = Action::builder(register, description)
                .documents(doc)
                .updated_texts(doc, rows.iter().copied())
                .revert(RevertOp::ReplaceTexts {
                    rows: rows.to_vec(),
                    doc,
                    texts: old,
                })
                .build()?;
            self.register_action(action);
        }
        Ok(())
    }
}
