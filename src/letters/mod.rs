//! Letters module - template registry, field collection and rendering.
//!
//! - `templates` - the closed set of ICAI assignment types and their bodies
//! - `fields` - firm profile, per-letter request and the composed `FieldSet`
//! - `render` - placeholder substitution
//! - `generator` - render + export for the single-letter path

pub mod fields;
pub mod generator;
pub mod render;
pub mod templates;
pub mod traits;
pub mod validation;

pub use fields::{FieldSet, FirmProfile, LetterRequest};
pub use generator::LetterGenerator;
pub use render::{render, Letter};
pub use templates::{AssignmentType, Placeholder};
pub use traits::{Generator, Validator};

use thiserror::Error;

use crate::export::ExportError;
use validation::ValidationErrors;

/// Errors raised while collecting fields, rendering or exporting a letter.
#[derive(Debug, Error)]
pub enum LetterError {
    #[error("{0}")]
    MissingRequiredField(ValidationErrors),
    #[error("unknown assignment type '{0}'")]
    UnknownAssignmentType(String),
    #[error("no value supplied for placeholder '{0}'")]
    MissingField(String),
    #[error("failed to export letter: {0}")]
    Export(#[from] ExportError),
}

/// Result of a successful document generation.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub content: Vec<u8>,
    pub letter: Letter,
}
