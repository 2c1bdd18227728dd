use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use log::info;

use super::models::{FirmResponse, UploadLogoRequest};
use super::multipart_parser::MultipartParser;
use crate::export::Logo;
use crate::letters::FirmProfile;
use crate::{AppState, ErrorResponse};

fn firm_response(state: &AppState) -> FirmResponse {
    let (profile, logo) = state.firm_snapshot();
    FirmResponse {
        profile,
        has_logo: logo.is_some(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Firm",
    get,
    path = "/firm",
    responses(
        (status = 200, description = "Current firm and signatory details", body = FirmResponse)
    )
)]
pub async fn get_firm(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(firm_response(&state))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Firm",
    put,
    path = "/firm",
    request_body = FirmProfile,
    responses(
        (status = 200, description = "Firm details replaced for this session", body = FirmResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn update_firm(
    state: web::Data<AppState>,
    body: web::Json<FirmProfile>,
) -> impl Responder {
    let profile = body.into_inner();
    info!("Firm profile updated: {}", profile.firm_name);
    state.set_firm_profile(profile);
    HttpResponse::Ok().json(firm_response(&state))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Firm",
    put,
    path = "/firm/logo",
    request_body(content = inline(UploadLogoRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Letterhead logo stored for this session", body = FirmResponse),
        (status = 400, description = "Missing or unsupported image", body = ErrorResponse)
    )
)]
pub async fn upload_logo(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match MultipartParser::parse_upload(payload, "logo").await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::from(e),
    };

    let filename = upload.filename.clone();
    match web::block(move || Logo::from_bytes(upload.bytes)).await {
        Ok(Ok(logo)) => {
            info!(
                "Logo '{}' stored ({}x{} px)",
                filename,
                logo.dimensions().0,
                logo.dimensions().1
            );
            state.set_logo(Some(logo));
            HttpResponse::Ok().json(firm_response(&state))
        }
        Ok(Err(e)) => {
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()))
        }
        Err(e) => super::blocking_failed(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Firm",
    delete,
    path = "/firm/logo",
    responses(
        (status = 204, description = "Logo cleared")
    )
)]
pub async fn delete_logo(state: web::Data<AppState>) -> impl Responder {
    state.set_logo(None);
    HttpResponse::NoContent().finish()
}
