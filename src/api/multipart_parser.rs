use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures::StreamExt;
use sanitize_filename::sanitize;

use crate::ErrorResponse;

/// Largest accepted upload (logo or spreadsheet).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Missing form field '{0}'")]
    MissingField(String),
    #[error("Upload exceeds {} bytes", MAX_UPLOAD_BYTES)]
    TooLarge,
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&format!("{}", error))),
            MultipartParseError::TooLarge => HttpResponse::PayloadTooLarge()
                .json(ErrorResponse::new("PayloadTooLarge", &format!("{}", error))),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!("{}", error))),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Read the file sent under `field_name`, draining every other field.
    pub async fn parse_upload(
        mut multipart: Multipart,
        field_name: &str,
    ) -> Result<UploadedFile, MultipartParseError> {
        let mut upload: Option<UploadedFile> = None;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let maybe_filename = content_disposition.get_filename().map(sanitize);

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                if name == field_name {
                    if buffer.len() + data_chunk.len() > MAX_UPLOAD_BYTES {
                        return Err(MultipartParseError::TooLarge);
                    }
                    buffer.extend_from_slice(&data_chunk);
                }
            }

            if name == field_name && upload.is_none() {
                let filename = maybe_filename
                    .filter(|f| !f.is_empty())
                    .unwrap_or_else(|| format!("{}.dat", field_name));
                upload = Some(UploadedFile {
                    filename,
                    bytes: buffer,
                });
            }
        }

        upload.ok_or_else(|| MultipartParseError::MissingField(field_name.to_string()))
    }
}
