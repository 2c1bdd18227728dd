use actix_web::{web, HttpResponse, Responder};
use log::info;

use super::models::{
    AssignmentTypesResponse, CapabilitiesResponse, EmailLetterRequest, EmailSentResponse,
    PreviewResponse,
};
use super::{attachment, blocking_failed};
use crate::export::{letter_filename, ConvertError};
use crate::letters::fields::today;
use crate::letters::{AssignmentType, GeneratedDocument, Generator, LetterGenerator, LetterRequest};
use crate::mail::EmailMessage;
use crate::{AppState, ErrorResponse};

/// Render and export on a blocking thread with the current firm snapshot.
async fn generate_docx(
    state: &web::Data<AppState>,
    request: LetterRequest,
) -> Result<GeneratedDocument, HttpResponse> {
    let (firm, logo) = state.firm_snapshot();
    let exporter = state.exporter.clone();

    let result = web::block(move || {
        LetterGenerator::new(&firm, exporter.as_ref(), today())
            .with_logo(logo.as_deref())
            .generate(&request)
    })
    .await;

    match result {
        Ok(Ok(doc)) => Ok(doc),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(blocking_failed(e)),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letters",
    get,
    path = "/assignment-types",
    responses(
        (status = 200, description = "Registered assignment types", body = AssignmentTypesResponse)
    )
)]
pub async fn list_assignment_types() -> impl Responder {
    HttpResponse::Ok().json(AssignmentTypesResponse {
        assignment_types: AssignmentType::ALL.to_vec(),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letters",
    get,
    path = "/capabilities",
    responses(
        (status = 200, description = "Optional features available on this host", body = CapabilitiesResponse)
    )
)]
pub async fn get_capabilities(state: web::Data<AppState>) -> impl Responder {
    let pdf_conversion = state.pdf_available();
    HttpResponse::Ok().json(CapabilitiesResponse {
        pdf_conversion,
        message: (!pdf_conversion).then(|| ConvertError::Unavailable.to_string()),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letters",
    post,
    path = "/letters/preview",
    request_body = LetterRequest,
    responses(
        (status = 200, description = "Rendered letter text", body = PreviewResponse),
        (status = 400, description = "Missing client name or address", body = ErrorResponse)
    )
)]
pub async fn preview_letter(
    state: web::Data<AppState>,
    body: web::Json<LetterRequest>,
) -> impl Responder {
    let (firm, _) = state.firm_snapshot();
    let generator = LetterGenerator::new(&firm, state.exporter.as_ref(), today());

    match generator.render(&body) {
        Ok(letter) => HttpResponse::Ok().json(PreviewResponse {
            filename: generator.filename(&letter),
            text: letter.text().to_string(),
        }),
        Err(e) => HttpResponse::from(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letters",
    post,
    path = "/letters/docx",
    request_body = LetterRequest,
    responses(
        (status = 200, description = "Word document", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "Missing client name or address", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn download_docx(
    state: web::Data<AppState>,
    body: web::Json<LetterRequest>,
) -> impl Responder {
    match generate_docx(&state, body.into_inner()).await {
        Ok(doc) => attachment(
            &doc.filename,
            state.exporter.extension().mime_type(),
            doc.content,
        ),
        Err(response) => response,
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letters",
    post,
    path = "/letters/pdf",
    request_body = LetterRequest,
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, description = "Missing client name or address", body = ErrorResponse),
        (status = 503, description = "PDF conversion is not available on this host", body = ErrorResponse)
    )
)]
pub async fn download_pdf(
    state: web::Data<AppState>,
    body: web::Json<LetterRequest>,
) -> impl Responder {
    let Some(converter) = state.converter.clone() else {
        info!("PDF requested but conversion is unavailable");
        return HttpResponse::from(ConvertError::Unavailable);
    };

    let doc = match generate_docx(&state, body.into_inner()).await {
        Ok(doc) => doc,
        Err(response) => return response,
    };

    let target = converter.target();
    let filename = letter_filename(
        doc.letter.assignment_type(),
        doc.letter.client_name(),
        target,
    );

    match web::block(move || converter.convert(&doc.content)).await {
        Ok(Ok(pdf)) => attachment(&filename, target.mime_type(), pdf),
        Ok(Err(e)) => HttpResponse::from(e),
        Err(e) => blocking_failed(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letters",
    post,
    path = "/letters/email",
    request_body = EmailLetterRequest,
    responses(
        (status = 200, description = "Letter sent as attachment", body = EmailSentResponse),
        (status = 400, description = "Missing letter or email fields", body = ErrorResponse),
        (status = 502, description = "Mail server rejected the message", body = ErrorResponse)
    )
)]
pub async fn email_letter(
    state: web::Data<AppState>,
    body: web::Json<EmailLetterRequest>,
) -> impl Responder {
    let EmailLetterRequest { letter, email } = body.into_inner();
    if let Err(e) = email.check_complete() {
        return HttpResponse::from(e);
    }
    let firm_name = state.firm_snapshot().0.firm_name;

    let doc = match generate_docx(&state, letter).await {
        Ok(doc) => doc,
        Err(response) => return response,
    };

    let message = EmailMessage::for_document(email, &doc, &firm_name);
    match state.notifier.send(&message).await {
        Ok(()) => HttpResponse::Ok().json(EmailSentResponse {
            message: format!("E-mail sent to {}!", message.to),
            filename: doc.filename,
        }),
        Err(e) => HttpResponse::from(e),
    }
}
