//! Field collection: firm-level profile, per-letter request, and the flat
//! [`FieldSet`] handed to the renderer.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::templates::{AssignmentType, Placeholder};
use super::traits::Validator;
use super::validation::{validate_required, ValidationErrors};
use super::LetterError;

/// Day-month-year form used for every date substituted into a letter.
pub const LETTER_DATE_FORMAT: &str = "%d-%m-%Y";

pub const DEFAULT_FEES: &str = "To be mutually agreed";

pub fn format_letter_date(date: NaiveDate) -> String {
    date.format(LETTER_DATE_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Default fiscal year: 1 April of the prior year to 31 March of `today`'s year.
pub fn default_fiscal_year(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let year = today.year();
    let start = NaiveDate::from_ymd_opt(year - 1, 4, 1).unwrap_or(today);
    let end = NaiveDate::from_ymd_opt(year, 3, 31).unwrap_or(today);
    (start, end)
}

/// Flat mapping from placeholder name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: HashMap<String, String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.insert(placeholder.key(), value);
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Combine firm-level and letter-level fields. Letter-level values win on
    /// overlapping keys.
    pub fn compose(firm: FieldSet, letter: FieldSet) -> FieldSet {
        let mut values = firm.values;
        values.extend(letter.values);
        FieldSet { values }
    }
}

/// Firm and signatory details, entered once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FirmProfile {
    pub firm_name: String,
    pub firm_reg_no: String,
    pub firm_address: String,
    pub signatory_name: String,
    pub designation: String,
    pub place: String,
}

impl Default for FirmProfile {
    fn default() -> Self {
        Self {
            firm_name: "Singla Vishal & Co.".to_string(),
            firm_reg_no: "000000W".to_string(),
            firm_address: "W-101, Mangal Bazar, Laxmi Nagar, Delhi".to_string(),
            signatory_name: "CA Vishal Singla".to_string(),
            designation: "Partner".to_string(),
            place: "Delhi".to_string(),
        }
    }
}

impl FirmProfile {
    /// Firm-level fields for a letter dated `today`.
    pub fn field_set(&self, today: NaiveDate) -> FieldSet {
        FieldSet::new()
            .with(Placeholder::SignatoryName, &self.signatory_name)
            .with(Placeholder::Designation, &self.designation)
            .with(Placeholder::FirmName, &self.firm_name)
            .with(Placeholder::FirmRegNo, &self.firm_reg_no)
            .with(Placeholder::Place, &self.place)
            .with(Placeholder::Today, format_letter_date(today))
    }
}

fn default_fy_start() -> NaiveDate {
    default_fiscal_year(today()).0
}

fn default_fy_end() -> NaiveDate {
    default_fiscal_year(today()).1
}

fn default_fees() -> String {
    DEFAULT_FEES.to_string()
}

/// Per-letter input from the single-letter form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LetterRequest {
    #[serde(default)]
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default = "default_fy_start")]
    pub fy_start: NaiveDate,
    #[serde(default = "default_fy_end")]
    pub fy_end: NaiveDate,
    /// Date of the client's appointment letter; defaults to today.
    #[serde(default = "today")]
    pub appointment_date: NaiveDate,
    #[serde(default)]
    pub other_terms: String,
    #[serde(default = "default_fees")]
    pub fees: String,
}

impl LetterRequest {
    /// New request with the form's defaults and the given client.
    pub fn new(
        assignment_type: AssignmentType,
        client_name: impl Into<String>,
        client_address: impl Into<String>,
    ) -> Self {
        let (fy_start, fy_end) = default_fiscal_year(today());
        Self {
            assignment_type,
            client_name: client_name.into(),
            client_address: client_address.into(),
            fy_start,
            fy_end,
            appointment_date: today(),
            other_terms: String::new(),
            fees: default_fees(),
        }
    }

    /// Letter-level fields, dates formatted for substitution.
    pub fn field_set(&self) -> FieldSet {
        FieldSet::new()
            .with(Placeholder::ClientName, &self.client_name)
            .with(Placeholder::ClientAddress, &self.client_address)
            .with(Placeholder::FyStart, format_letter_date(self.fy_start))
            .with(Placeholder::FyEnd, format_letter_date(self.fy_end))
            .with(
                Placeholder::AppointmentDate,
                format_letter_date(self.appointment_date),
            )
            .with(Placeholder::OtherTerms, &self.other_terms)
            .with(Placeholder::Fees, &self.fees)
    }
}

impl Validator for LetterRequest {
    fn validate(&self) -> Result<(), LetterError> {
        let mut errors = ValidationErrors::new();
        validate_required(&self.client_name, "client_name", "Client Name", &mut errors);
        validate_required(
            &self.client_address,
            "client_address",
            "Client Address",
            &mut errors,
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_letter_date() {
        assert_eq!(format_letter_date(date(2025, 4, 1)), "01-04-2025");
        assert_eq!(format_letter_date(date(2024, 12, 31)), "31-12-2024");
    }

    #[test]
    fn test_default_fiscal_year() {
        let (start, end) = default_fiscal_year(date(2026, 10, 18));
        assert_eq!(start, date(2025, 4, 1));
        assert_eq!(end, date(2026, 3, 31));
    }

    #[test]
    fn test_compose_letter_fields_win() {
        let mut firm = FieldSet::new();
        firm.insert("place", "Delhi");
        firm.insert("firm_name", "Firm A");
        let mut letter = FieldSet::new();
        letter.insert("place", "Mumbai");

        let composed = FieldSet::compose(firm, letter);
        assert_eq!(composed.get("place"), Some("Mumbai"));
        assert_eq!(composed.get("firm_name"), Some("Firm A"));
        assert_eq!(composed.len(), 2);
    }

    #[test]
    fn test_firm_profile_field_set() {
        let fields = FirmProfile::default().field_set(date(2026, 10, 18));
        assert_eq!(fields.get("firm_name"), Some("Singla Vishal & Co."));
        assert_eq!(fields.get("today"), Some("18-10-2026"));
        assert!(fields.get("firm_address").is_none());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let json = r#"{
            "assignment_type": "Tax Audit",
            "client_name": "Acme Pvt Ltd",
            "client_address": "12 MG Road, Pune"
        }"#;

        let request: LetterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.assignment_type, AssignmentType::TaxAudit);
        assert_eq!(request.fees, DEFAULT_FEES);
        assert_eq!(request.other_terms, "");
        assert_eq!(request.fy_start.month(), 4);
        assert_eq!(request.fy_end.month(), 3);
    }

    #[test]
    fn test_request_dates_are_formatted() {
        let mut request = LetterRequest::new(AssignmentType::GstAudit, "Acme", "Pune");
        request.fy_start = date(2024, 4, 1);
        request.fy_end = date(2025, 3, 31);
        request.appointment_date = date(2025, 6, 9);

        let fields = request.field_set();
        assert_eq!(fields.get("fy_start"), Some("01-04-2024"));
        assert_eq!(fields.get("fy_end"), Some("31-03-2025"));
        assert_eq!(fields.get("appointment_date"), Some("09-06-2025"));
    }

    #[test]
    fn test_validate_requires_client_fields() {
        let request = LetterRequest::new(AssignmentType::StatutoryAudit, " ", "");
        match request.validate() {
            Err(LetterError::MissingRequiredField(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.to_message().contains("Client Name"));
                assert!(errors.to_message().contains("Client Address"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let ok = LetterRequest::new(AssignmentType::StatutoryAudit, "Acme", "Pune");
        assert!(ok.validate().is_ok());
    }
}
