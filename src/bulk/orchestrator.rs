//! Bulk generation loop.
//!
//! Each row is rendered and exported on its own; the resulting document is written
//! into the archive straight away and dropped before the next row starts. A row
//! that fails is recorded and skipped, never aborting the batch.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::rows::BulkRow;
use super::{BulkError, BulkReport, RowFailure, ERROR_MANIFEST_NAME};
use crate::export::file::letter_filename;
use crate::export::{DocumentExporter, Logo};
use crate::letters::{render, FieldSet, FirmProfile, LetterError};

/// Firm snapshot and collaborators shared by every row of one run.
pub struct BulkContext<'a> {
    pub firm: &'a FirmProfile,
    pub logo: Option<&'a Logo>,
    pub exporter: &'a dyn DocumentExporter,
    pub today: NaiveDate,
}

/// Reasons a single row is rejected.
#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("client_name is empty")]
    MissingClientName,
    #[error(transparent)]
    Letter(#[from] LetterError),
}

fn generate_row(ctx: &BulkContext<'_>, row: &BulkRow) -> Result<(String, Vec<u8>), RowError> {
    if row.client_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        return Err(RowError::MissingClientName);
    }

    let assignment = row.assignment();
    let fields = FieldSet::compose(ctx.firm.field_set(ctx.today), row.field_set(ctx.today));
    let letter = render(assignment, &fields)?;
    let content = ctx
        .exporter
        .export(&letter, ctx.logo)
        .map_err(LetterError::from)?;
    let name = letter_filename(assignment, letter.client_name(), ctx.exporter.extension());
    Ok((name, content))
}

/// `name` if unused, otherwise `stem_2.ext`, `stem_3.ext`, ...
fn unique_entry_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot..]),
        None => (name.as_str(), ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}{}", stem, n, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Generate one document per row into `sink`, returning the sink and the report.
pub fn run<W: Write + Seek>(
    rows: &[BulkRow],
    ctx: &BulkContext<'_>,
    sink: W,
) -> Result<(W, BulkReport), BulkError> {
    let mut zip = ZipWriter::new(sink);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used_names = HashSet::new();
    let mut report = BulkReport::default();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        match generate_row(ctx, row) {
            Ok((name, content)) => {
                let name = unique_entry_name(name, &mut used_names);
                zip.start_file(name.as_str(), options)?;
                zip.write_all(&content)?;
                report.generated.push(name);
            }
            Err(e) => {
                log::warn!("Bulk row {} skipped: {}", row_number, e);
                report.failures.push(RowFailure {
                    row: row_number,
                    reason: e.to_string(),
                });
            }
        }
    }

    if !report.failures.is_empty() {
        zip.start_file(ERROR_MANIFEST_NAME, options)?;
        zip.write_all(report.manifest().as_bytes())?;
    }

    let sink = zip.finish()?;
    log::info!(
        "Bulk run finished: {} generated, {} failed",
        report.generated.len(),
        report.failures.len()
    );
    Ok((sink, report))
}

/// Run into a scoped temporary file and return the finished archive bytes.
/// The temporary file is removed when this returns, on success or error.
pub fn build_archive(
    rows: &[BulkRow],
    ctx: &BulkContext<'_>,
) -> Result<(Vec<u8>, BulkReport), BulkError> {
    let file = tempfile::tempfile()?;
    let (mut file, report) = run(rows, ctx, file)?;
    file.seek(SeekFrom::Start(0))?;
    let mut archive = Vec::new();
    file.read_to_end(&mut archive)?;
    Ok((archive, report))
}
