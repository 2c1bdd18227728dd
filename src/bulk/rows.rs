//! Row sources for bulk generation: CSV and XLSX uploads.

use calamine::{Data, DataType, Reader, Xlsx};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use utoipa::ToSchema;

use crate::export::FileExtension;
use crate::letters::fields::{default_fiscal_year, format_letter_date, DEFAULT_FEES};
use crate::letters::{AssignmentType, FieldSet, Placeholder};

#[derive(Debug, Error)]
pub enum RowSourceError {
    #[error("unsupported upload '{0}' (expected .csv or .xlsx)")]
    UnsupportedFormat(String),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read spreadsheet: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("spreadsheet has no worksheet")]
    NoWorksheet,
}

/// One spreadsheet row. Absent or blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BulkRow {
    pub assignment_type: Option<String>,
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    pub fy_start: Option<String>,
    pub fy_end: Option<String>,
    pub appointment_date: Option<String>,
    pub other_terms: Option<String>,
    pub fees: Option<String>,
}

impl BulkRow {
    fn set(&mut self, column: &str, value: String) {
        let value = Some(value).filter(|v| !v.trim().is_empty());
        match column {
            "assignment_type" => self.assignment_type = value,
            "client_name" => self.client_name = value,
            "client_address" => self.client_address = value,
            "fy_start" => self.fy_start = value,
            "fy_end" => self.fy_end = value,
            "appointment_date" => self.appointment_date = value,
            "other_terms" => self.other_terms = value,
            "fees" => self.fees = value,
            _ => {}
        }
    }

    fn is_blank(&self) -> bool {
        *self == BulkRow::default()
    }

    /// Template for this row; missing or unknown names fall back to statutory audit.
    pub fn assignment(&self) -> AssignmentType {
        AssignmentType::resolve_or_default(self.assignment_type.as_deref())
    }

    /// Letter-level fields with defaults applied to every absent column.
    pub fn field_set(&self, today: NaiveDate) -> FieldSet {
        let (fy_start, fy_end) = default_fiscal_year(today);
        let date_or = |value: &Option<String>, fallback: NaiveDate| {
            value
                .as_deref()
                .map(normalize_date)
                .unwrap_or_else(|| format_letter_date(fallback))
        };
        let text_or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };

        FieldSet::new()
            .with(Placeholder::ClientName, text_or(&self.client_name, ""))
            .with(Placeholder::ClientAddress, text_or(&self.client_address, ""))
            .with(Placeholder::FyStart, date_or(&self.fy_start, fy_start))
            .with(Placeholder::FyEnd, date_or(&self.fy_end, fy_end))
            .with(
                Placeholder::AppointmentDate,
                date_or(&self.appointment_date, today),
            )
            .with(Placeholder::OtherTerms, text_or(&self.other_terms, ""))
            .with(Placeholder::Fees, text_or(&self.fees, DEFAULT_FEES))
    }
}

const DATE_INPUT_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Recognized date text is rewritten as `DD-MM-YYYY`; anything else is kept verbatim.
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    for format in DATE_INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return format_letter_date(date);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, format) {
            return format_letter_date(dt.date());
        }
    }
    trimmed.to_string()
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Parse an upload into rows, choosing the reader from the file extension.
pub fn read_rows(filename: &str, bytes: &[u8]) -> Result<Vec<BulkRow>, RowSourceError> {
    match FileExtension::from_filename(filename) {
        FileExtension::Csv => read_csv(bytes),
        FileExtension::Xlsx => read_xlsx(bytes),
        _ => Err(RowSourceError::UnsupportedFormat(filename.to_string())),
    }
}

pub fn read_csv(bytes: &[u8]) -> Result<Vec<BulkRow>, RowSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = BulkRow::default();
        for (column, value) in headers.iter().zip(record.iter()) {
            row.set(column, value.to_string());
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DateTime(_) => cell
            .as_date()
            .map(format_letter_date)
            .unwrap_or_else(|| cell.to_string()),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

pub fn read_xlsx(bytes: &[u8]) -> Result<Vec<BulkRow>, RowSourceError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(RowSourceError::NoWorksheet)??;

    let mut lines = range.rows();
    let headers: Vec<String> = match lines.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| normalize_header(&cell_text(cell)))
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for line in lines {
        let mut row = BulkRow::default();
        for (column, cell) in headers.iter().zip(line.iter()) {
            row.set(column, cell_text(cell).trim().to_string());
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}
