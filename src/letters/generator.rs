//! Single-letter generation: validate, compose fields, render, export.

use chrono::NaiveDate;

use super::fields::{FieldSet, FirmProfile, LetterRequest};
use super::render::{render, Letter};
use super::traits::{Generator, Validator};
use super::{GeneratedDocument, LetterError};
use crate::export::file::letter_filename;
use crate::export::{DocumentExporter, Logo};

/// Generator bound to one firm profile snapshot.
pub struct LetterGenerator<'a> {
    firm: &'a FirmProfile,
    logo: Option<&'a Logo>,
    exporter: &'a dyn DocumentExporter,
    today: NaiveDate,
}

impl<'a> LetterGenerator<'a> {
    pub fn new(firm: &'a FirmProfile, exporter: &'a dyn DocumentExporter, today: NaiveDate) -> Self {
        Self {
            firm,
            logo: None,
            exporter,
            today,
        }
    }

    pub fn with_logo(mut self, logo: Option<&'a Logo>) -> Self {
        self.logo = logo;
        self
    }

    /// Validate the request and render the letter text without exporting it.
    pub fn render(&self, request: &LetterRequest) -> Result<Letter, LetterError> {
        request.validate()?;
        let fields = FieldSet::compose(self.firm.field_set(self.today), request.field_set());
        render(request.assignment_type, &fields)
    }

    /// Suggested download name for `letter` in the exporter's format.
    pub fn filename(&self, letter: &Letter) -> String {
        letter_filename(
            letter.assignment_type(),
            letter.client_name(),
            self.exporter.extension(),
        )
    }
}

impl<'r> Generator<&'r LetterRequest> for LetterGenerator<'_> {
    fn generate(&self, request: &'r LetterRequest) -> Result<GeneratedDocument, LetterError> {
        let letter = self.render(request)?;
        let content = self.exporter.export(&letter, self.logo)?;
        let filename = self.filename(&letter);

        log::info!(
            "Generated {} letter for '{}' ({} bytes)",
            letter.assignment_type(),
            letter.client_name(),
            content.len()
        );

        Ok(GeneratedDocument {
            filename,
            content,
            letter,
        })
    }
}
