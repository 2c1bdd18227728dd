//! ICAI engagement letter templates.
//!
//! The registry is a closed set of assignment types. Each variant owns its letter
//! body (compiled in from `static/templates`) and the placeholders that body needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::LetterError;

/// Named slot in a template body, written `{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    ClientName,
    ClientAddress,
    FyStart,
    FyEnd,
    AppointmentDate,
    OtherTerms,
    Fees,
    SignatoryName,
    Designation,
    FirmName,
    FirmRegNo,
    Today,
    Place,
}

impl Placeholder {
    pub const ALL: [Placeholder; 13] = [
        Placeholder::ClientName,
        Placeholder::ClientAddress,
        Placeholder::FyStart,
        Placeholder::FyEnd,
        Placeholder::AppointmentDate,
        Placeholder::OtherTerms,
        Placeholder::Fees,
        Placeholder::SignatoryName,
        Placeholder::Designation,
        Placeholder::FirmName,
        Placeholder::FirmRegNo,
        Placeholder::Today,
        Placeholder::Place,
    ];

    /// Key used inside template bodies and field sets.
    pub fn key(self) -> &'static str {
        match self {
            Placeholder::ClientName => "client_name",
            Placeholder::ClientAddress => "client_address",
            Placeholder::FyStart => "fy_start",
            Placeholder::FyEnd => "fy_end",
            Placeholder::AppointmentDate => "appointment_date",
            Placeholder::OtherTerms => "other_terms",
            Placeholder::Fees => "fees",
            Placeholder::SignatoryName => "signatory_name",
            Placeholder::Designation => "designation",
            Placeholder::FirmName => "firm_name",
            Placeholder::FirmRegNo => "firm_reg_no",
            Placeholder::Today => "today",
            Placeholder::Place => "place",
        }
    }
}

/// Assignment type selecting which letter template is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AssignmentType {
    #[serde(rename = "Statutory Audit")]
    StatutoryAudit,
    #[serde(rename = "Tax Audit")]
    TaxAudit,
    #[serde(rename = "Internal Audit")]
    InternalAudit,
    #[serde(rename = "GST Audit")]
    GstAudit,
}

impl Default for AssignmentType {
    fn default() -> Self {
        AssignmentType::StatutoryAudit
    }
}

impl AssignmentType {
    /// Registered types in the order they are offered for selection.
    pub const ALL: [AssignmentType; 4] = [
        AssignmentType::StatutoryAudit,
        AssignmentType::TaxAudit,
        AssignmentType::InternalAudit,
        AssignmentType::GstAudit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssignmentType::StatutoryAudit => "Statutory Audit",
            AssignmentType::TaxAudit => "Tax Audit",
            AssignmentType::InternalAudit => "Internal Audit",
            AssignmentType::GstAudit => "GST Audit",
        }
    }

    /// Look up a registered type by its display name.
    pub fn from_name(name: &str) -> Result<Self, LetterError> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| LetterError::UnknownAssignmentType(wanted.to_string()))
    }

    /// Like [`AssignmentType::from_name`], but missing or unknown names fall back to
    /// the statutory audit template.
    pub fn resolve_or_default(name: Option<&str>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() => Self::from_name(name).unwrap_or_else(|err| {
                log::warn!("{}; using {}", err, Self::default().name());
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            AssignmentType::StatutoryAudit => {
                include_str!("../../static/templates/statutory_audit.txt")
            }
            AssignmentType::TaxAudit => include_str!("../../static/templates/tax_audit.txt"),
            AssignmentType::InternalAudit => {
                include_str!("../../static/templates/internal_audit.txt")
            }
            AssignmentType::GstAudit => include_str!("../../static/templates/gst_audit.txt"),
        }
    }

    /// Placeholders the body references; a field set must cover all of them.
    pub fn placeholders(self) -> &'static [Placeholder] {
        match self {
            AssignmentType::StatutoryAudit
            | AssignmentType::TaxAudit
            | AssignmentType::InternalAudit
            | AssignmentType::GstAudit => &Placeholder::ALL,
        }
    }

    /// File-name stem, e.g. `GST_Audit`.
    pub fn file_stem(self) -> String {
        self.name().replace(' ', "_")
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
