//! Bulk generation from an uploaded spreadsheet.
//!
//! - `rows` - CSV/XLSX parsing into `BulkRow`s with per-column defaults
//! - `orchestrator` - per-row render/export streamed into one ZIP archive

pub mod orchestrator;
pub mod rows;

pub use orchestrator::{build_archive, run, BulkContext};
pub use rows::{read_rows, BulkRow, RowSourceError};

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Archive entry listing rows that could not be generated.
pub const ERROR_MANIFEST_NAME: &str = "errors.txt";

/// Errors that abort a whole bulk run. Row-level problems never do.
#[derive(Debug, Error)]
pub enum BulkError {
    #[error("failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("archive IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RowFailure {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BulkReport {
    /// Archive entry names, in row order.
    pub generated: Vec<String>,
    pub failures: Vec<RowFailure>,
}

impl BulkReport {
    pub fn manifest(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("row {}: {}\n", f.row, f.reason))
            .collect()
    }
}
