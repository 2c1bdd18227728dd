use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::bulk::BulkRow;
use crate::letters::{AssignmentType, FirmProfile, LetterRequest};
use crate::mail::EmailDetails;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentTypesResponse {
    pub assignment_types: Vec<AssignmentType>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CapabilitiesResponse {
    pub pdf_conversion: bool,
    /// Informational note when a capability is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FirmResponse {
    pub profile: FirmProfile,
    pub has_logo: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailLetterRequest {
    pub letter: LetterRequest,
    pub email: EmailDetails,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmailSentResponse {
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkPreviewResponse {
    pub total_rows: usize,
    /// First rows of the upload.
    pub rows: Vec<BulkRow>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadLogoRequest {
    #[allow(unused)]
    pub logo: Vec<u8>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadSpreadsheetRequest {
    #[allow(unused)]
    pub file: Vec<u8>,
}
