//! File naming and MIME type detection.

use std::fmt;
use std::path::Path;

use crate::letters::AssignmentType;

/// Name of the archive returned by bulk generation.
pub const BULK_ARCHIVE_NAME: &str = "letters_bulk.zip";

/// File extensions handled by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileExtension {
    Docx,
    Pdf,
    Zip,
    Png,
    Jpeg,
    Csv,
    Xlsx,
    Txt,
    Unknown,
}

impl FileExtension {
    /// Get MIME type for this extension.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
            Self::Zip => "application/zip",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Txt => "text/plain",
            Self::Unknown => "application/octet-stream",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Txt => "txt",
            Self::Unknown => "bin",
        }
    }

    /// Parse from extension string.
    pub fn parse(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "docx" => Self::Docx,
            "pdf" => Self::Pdf,
            "zip" => Self::Zip,
            "png" => Self::Png,
            "jpeg" | "jpg" => Self::Jpeg,
            "csv" => Self::Csv,
            "xlsx" => Self::Xlsx,
            "txt" => Self::Txt,
            _ => Self::Unknown,
        }
    }

    /// Parse from filename.
    pub fn from_filename(filename: &str) -> Self {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::parse)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect MIME type from filename, falling back to `mime_guess` for types the
/// server does not produce itself.
pub fn detect_mime_type(filename: &str) -> String {
    match FileExtension::from_filename(filename) {
        FileExtension::Unknown => mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string(),
        known => known.mime_type().to_string(),
    }
}

/// `{Assignment_Type}_Engagement_Letter_{client_name}.{ext}`.
///
/// The client name is kept as supplied except that path separators become `-`.
pub fn letter_filename(
    assignment_type: AssignmentType,
    client_name: &str,
    ext: FileExtension,
) -> String {
    let client = client_name.replace(['/', '\\'], "-");
    format!(
        "{}_Engagement_Letter_{}.{}",
        assignment_type.file_stem(),
        client,
        ext
    )
}
