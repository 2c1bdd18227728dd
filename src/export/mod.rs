//! Export collaborators: document construction, format conversion and file naming.

pub mod convert;
pub mod docx;
pub mod file;

pub use convert::{ConvertError, FormatConverter, SofficeConverter};
pub use docx::DocxExporter;
pub use file::{detect_mime_type, letter_filename, FileExtension};

use std::io::Cursor;
use thiserror::Error;

use crate::letters::Letter;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported logo image: {0}")]
    UnsupportedImage(String),
    #[error("failed to read logo image: {0}")]
    ImageDecode(#[source] image::ImageError),
    #[error("failed to pack document: {0}")]
    Pack(String),
}

/// Turns letter text into a downloadable document.
pub trait DocumentExporter: Send + Sync {
    fn export(&self, letter: &Letter, logo: Option<&Logo>) -> Result<Vec<u8>, ExportError>;

    /// Extension of the produced document.
    fn extension(&self) -> FileExtension {
        FileExtension::Docx
    }
}

/// Letterhead image, checked to be a decodable PNG or JPEG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    bytes: Vec<u8>,
    format: FileExtension,
    width_px: u32,
    height_px: u32,
}

impl Logo {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ExportError> {
        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| ExportError::UnsupportedImage(e.to_string()))?;

        let format = match reader.format() {
            Some(image::ImageFormat::Png) => FileExtension::Png,
            Some(image::ImageFormat::Jpeg) => FileExtension::Jpeg,
            Some(other) => {
                return Err(ExportError::UnsupportedImage(format!(
                    "{:?} (expected PNG or JPEG)",
                    other
                )))
            }
            None => {
                return Err(ExportError::UnsupportedImage(
                    "unrecognized image format".to_string(),
                ))
            }
        };

        let decoded = reader.decode().map_err(ExportError::ImageDecode)?;
        let (width_px, height_px) = (decoded.width(), decoded.height());
        if width_px == 0 || height_px == 0 {
            return Err(ExportError::UnsupportedImage("empty image".to_string()));
        }

        Ok(Self {
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> FileExtension {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }
}
