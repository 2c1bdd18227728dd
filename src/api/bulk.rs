use actix_multipart::Multipart;
use actix_web::http::header::HeaderName;
use actix_web::{web, HttpResponse, Responder};
use log::info;

use super::models::{BulkPreviewResponse, UploadSpreadsheetRequest};
use super::multipart_parser::MultipartParser;
use super::{attachment, blocking_failed};
use crate::bulk::{build_archive, read_rows, BulkContext};
use crate::export::file::BULK_ARCHIVE_NAME;
use crate::export::FileExtension;
use crate::letters::fields::today;
use crate::{AppState, ErrorResponse};

/// Rows shown by the upload preview.
pub const PREVIEW_ROWS: usize = 5;

pub const GENERATED_HEADER: &str = "x-letters-generated";
pub const FAILED_HEADER: &str = "x-letters-failed";

#[utoipa::path(
    context_path = "/api",
    tag = "Bulk",
    post,
    path = "/bulk/preview",
    request_body(content = inline(UploadSpreadsheetRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Row count and the first rows of the upload", body = BulkPreviewResponse),
        (status = 400, description = "Missing or unreadable spreadsheet", body = ErrorResponse)
    )
)]
pub async fn preview_bulk(payload: Multipart) -> impl Responder {
    let upload = match MultipartParser::parse_upload(payload, "file").await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::from(e),
    };

    match web::block(move || read_rows(&upload.filename, &upload.bytes)).await {
        Ok(Ok(rows)) => {
            let total_rows = rows.len();
            HttpResponse::Ok().json(BulkPreviewResponse {
                total_rows,
                rows: rows.into_iter().take(PREVIEW_ROWS).collect(),
            })
        }
        Ok(Err(e)) => HttpResponse::from(e),
        Err(e) => blocking_failed(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Bulk",
    post,
    path = "/bulk",
    request_body(content = inline(UploadSpreadsheetRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "ZIP archive with one letter per row, plus errors.txt when rows failed", content_type = "application/zip"),
        (status = 400, description = "Missing or unreadable spreadsheet", body = ErrorResponse),
        (status = 500, description = "Archive could not be written", body = ErrorResponse)
    )
)]
pub async fn generate_bulk(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match MultipartParser::parse_upload(payload, "file").await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::from(e),
    };

    let rows = match web::block(move || read_rows(&upload.filename, &upload.bytes)).await {
        Ok(Ok(rows)) => rows,
        Ok(Err(e)) => return HttpResponse::from(e),
        Err(e) => return blocking_failed(e),
    };
    info!("Bulk upload accepted with {} row(s)", rows.len());

    let (firm, logo) = state.firm_snapshot();
    let exporter = state.exporter.clone();
    let result = web::block(move || {
        let ctx = BulkContext {
            firm: &firm,
            logo: logo.as_deref(),
            exporter: exporter.as_ref(),
            today: today(),
        };
        build_archive(&rows, &ctx)
    })
    .await;

    match result {
        Ok(Ok((archive, report))) => {
            let mut response = attachment(BULK_ARCHIVE_NAME, FileExtension::Zip.mime_type(), archive);
            let headers = response.headers_mut();
            headers.insert(
                HeaderName::from_static(GENERATED_HEADER),
                report.generated.len().into(),
            );
            headers.insert(
                HeaderName::from_static(FAILED_HEADER),
                report.failures.len().into(),
            );
            response
        }
        Ok(Err(e)) => HttpResponse::from(e),
        Err(e) => blocking_failed(e),
    }
}
