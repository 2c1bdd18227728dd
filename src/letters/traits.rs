//! Traits shared by letter requests and generators.

use super::{GeneratedDocument, LetterError};

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), LetterError>;
}

/// Trait for document generators.
pub trait Generator<Req> {
    /// Generate a document from the request.
    fn generate(&self, request: Req) -> Result<GeneratedDocument, LetterError>;
}
