//! HTTP API backing the letter form.
//!
//! - `firm` - session firm profile and letterhead logo
//! - `letters` - single-letter preview, download, conversion and email
//! - `bulk` - spreadsheet upload to ZIP archive

pub mod bulk;
pub mod firm;
pub mod letters;
pub mod models;
pub mod multipart_parser;

use actix_web::error::{BlockingError, InternalError, JsonPayloadError};
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::bulk::{BulkError, RowSourceError};
use crate::export::ConvertError;
use crate::letters::LetterError;
use crate::mail::MailError;
use crate::ErrorResponse;

impl From<LetterError> for HttpResponse {
    fn from(error: LetterError) -> Self {
        match error {
            LetterError::MissingRequiredField(ref errors) => {
                log::info!("Rejected letter form: {} missing field(s)", errors.len());
                HttpResponse::BadRequest().json(ErrorResponse::new(
                    "MissingRequiredField",
                    &errors.to_message(),
                ))
            }
            LetterError::UnknownAssignmentType(_) => HttpResponse::BadRequest()
                .json(ErrorResponse::new("UnknownAssignmentType", &error.to_string())),
            LetterError::MissingField(_) => {
                log::error!("Template rendering failed: {}", error);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("MissingField", &error.to_string()))
            }
            LetterError::Export(_) => {
                log::error!("{}", error);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error(&error.to_string()))
            }
        }
    }
}

impl From<ConvertError> for HttpResponse {
    fn from(error: ConvertError) -> Self {
        match error {
            ConvertError::Unavailable => HttpResponse::ServiceUnavailable()
                .json(ErrorResponse::new("ConversionUnavailable", &error.to_string())),
            _ => {
                log::error!("PDF conversion failed: {}", error);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error(&error.to_string()))
            }
        }
    }
}

impl From<MailError> for HttpResponse {
    fn from(error: MailError) -> Self {
        match error {
            MailError::FieldsIncomplete(_) => HttpResponse::BadRequest()
                .json(ErrorResponse::new("EmailFieldsIncomplete", &error.to_string())),
            MailError::InvalidAddress(_) => HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request(&error.to_string())),
            MailError::Build(_) => {
                log::error!("{}", error);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error(&error.to_string()))
            }
            MailError::SendFailure(_) => {
                log::error!("Email send failed: {}", error);
                HttpResponse::BadGateway()
                    .json(ErrorResponse::new("EmailSendFailure", &error.to_string()))
            }
        }
    }
}

impl From<RowSourceError> for HttpResponse {
    fn from(error: RowSourceError) -> Self {
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
    }
}

impl From<BulkError> for HttpResponse {
    fn from(error: BulkError) -> Self {
        log::error!("Bulk generation aborted: {}", error);
        HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&error.to_string()))
    }
}

pub(crate) fn blocking_failed(error: BlockingError) -> HttpResponse {
    log::error!("Blocking task failed: {}", error);
    HttpResponse::InternalServerError().json(ErrorResponse::internal_error("Worker task failed"))
}

/// `filename` with control characters dropped and everything outside printable
/// ASCII (plus quotes and backslashes) replaced by `_`.
fn ascii_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect()
}

/// Download response with `Content-Disposition: attachment`.
///
/// Names that are not plain ASCII also get an RFC 6266 `filename*` parameter.
pub(crate) fn attachment(filename: &str, mime_type: &str, content: Vec<u8>) -> HttpResponse {
    let clean: String = filename.chars().filter(|c| !c.is_control()).collect();
    let fallback = ascii_filename(&clean);

    let mut parameters = vec![DispositionParam::Filename(fallback.clone())];
    if fallback != clean {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: clean.into_bytes(),
        }));
    }

    HttpResponse::Ok()
        .content_type(mime_type.to_string())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters,
        })
        .body(content)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Register every `/api` route on `cfg`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::resource("/assignment-types")
                .route(web::get().to(letters::list_assignment_types)),
        )
        .service(web::resource("/capabilities").route(web::get().to(letters::get_capabilities)))
        .service(
            web::resource("/firm")
                .route(web::get().to(firm::get_firm))
                .route(web::put().to(firm::update_firm)),
        )
        .service(
            web::resource("/firm/logo")
                .route(web::put().to(firm::upload_logo))
                .route(web::delete().to(firm::delete_logo)),
        )
        .service(web::resource("/letters/preview").route(web::post().to(letters::preview_letter)))
        .service(web::resource("/letters/docx").route(web::post().to(letters::download_docx)))
        .service(web::resource("/letters/pdf").route(web::post().to(letters::download_pdf)))
        .service(web::resource("/letters/email").route(web::post().to(letters::email_letter)))
        .service(web::resource("/bulk/preview").route(web::post().to(bulk::preview_bulk)))
        .service(web::resource("/bulk").route(web::post().to(bulk::generate_bulk)));
}
