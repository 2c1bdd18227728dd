use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
pub mod bulk;
pub mod config;
pub mod export;
pub mod letters;
pub mod mail;
pub mod state;

pub use crate::config::ServerConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::letters::list_assignment_types,
        crate::api::letters::get_capabilities,
        crate::api::letters::preview_letter,
        crate::api::letters::download_docx,
        crate::api::letters::download_pdf,
        crate::api::letters::email_letter,
        crate::api::firm::get_firm,
        crate::api::firm::update_firm,
        crate::api::firm::upload_logo,
        crate::api::firm::delete_logo,
        crate::api::bulk::preview_bulk,
        crate::api::bulk::generate_bulk
    ),
    components(
        schemas(
            letters::AssignmentType,
            letters::FirmProfile,
            letters::LetterRequest,
            letters::validation::ValidationError,
            mail::EmailDetails,
            bulk::BulkRow,
            bulk::BulkReport,
            bulk::RowFailure,
            api::models::AssignmentTypesResponse,
            api::models::CapabilitiesResponse,
            api::models::FirmResponse,
            api::models::PreviewResponse,
            api::models::EmailLetterRequest,
            api::models::EmailSentResponse,
            api::models::BulkPreviewResponse,
            api::models::UploadLogoRequest,
            api::models::UploadSpreadsheetRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Letters", description = "Single engagement letter preview, download and email."),
        (name = "Firm", description = "Firm, signatory and letterhead details for this session."),
        (name = "Bulk", description = "Spreadsheet upload to a ZIP of letters.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Local server")
    )
)]
pub struct ApiDoc;

fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![
            header::CONTENT_DISPOSITION,
            header::HeaderName::from_static(api::bulk::GENERATED_HEADER),
            header::HeaderName::from_static(api::bulk::FAILED_HEADER),
        ])
        .max_age(3600)
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    let app_state = web::Data::new(AppState::new(&config));
    if !app_state.pdf_available() {
        log::warn!("LibreOffice not found; PDF download is disabled");
    }

    let prometheus = PrometheusMetricsBuilder::new("engagement_letter_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&origins))
            .app_data(app_state.clone())
            .service(web::scope("/api").configure(api::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
