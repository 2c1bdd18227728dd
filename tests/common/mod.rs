#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use engagement_letter_server::export::{ConvertError, DocxExporter, FormatConverter};
use engagement_letter_server::mail::{EmailMessage, MailError, Notifier, SmtpNotifier};
use engagement_letter_server::AppState;
use parking_lot::Mutex;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

pub const BOUNDARY: &str = "----letter-test-boundary";

/// Notifier that keeps every message instead of sending it. It accepts
/// anything, so field checks have to happen before it is called.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

/// Converter that wraps the input length in a fake PDF header.
pub struct FakePdfConverter;

impl FormatConverter for FakePdfConverter {
    fn convert(&self, docx: &[u8]) -> Result<Vec<u8>, ConvertError> {
        Ok(format!("%PDF-1.4 fake ({} bytes in)", docx.len()).into_bytes())
    }
}

/// State with the real exporter, no PDF converter and the real SMTP notifier.
pub fn app_state() -> web::Data<AppState> {
    web::Data::new(AppState::with_collaborators(
        Arc::new(DocxExporter::new()),
        None,
        Arc::new(SmtpNotifier::default()),
    ))
}

pub fn app_state_with_pdf() -> web::Data<AppState> {
    web::Data::new(AppState::with_collaborators(
        Arc::new(DocxExporter::new()),
        Some(Arc::new(FakePdfConverter)),
        Arc::new(SmtpNotifier::default()),
    ))
}

pub fn app_state_with_notifier(notifier: Arc<RecordingNotifier>) -> web::Data<AppState> {
    web::Data::new(AppState::with_collaborators(
        Arc::new(DocxExporter::new()),
        None,
        notifier,
    ))
}

/// Single-file multipart body under `field`.
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// CSV upload with a header row and `rows` generated clients.
pub fn clients_csv(rows: usize) -> String {
    let mut csv = String::from("Assignment Type,Client Name,Client Address,Fees\n");
    for i in 1..=rows {
        csv.push_str(&format!("Tax Audit,Client {},Street {},\"50,000\"\n", i, i));
    }
    csv
}

pub fn zip_entry_names(archive: &[u8]) -> Vec<String> {
    let zip = zip::ZipArchive::new(Cursor::new(archive)).expect("valid zip");
    zip.file_names().map(str::to_string).collect()
}

pub fn zip_entry_text(archive: &[u8], name: &str) -> String {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).expect("valid zip");
    let mut entry = zip.by_name(name).expect("entry present");
    let mut text = String::new();
    entry.read_to_string(&mut text).expect("utf-8 entry");
    text
}

/// `word/document.xml` of a generated DOCX.
pub fn docx_document_xml(docx: &[u8]) -> String {
    zip_entry_text(docx, "word/document.xml")
}

/// Cell of a generated test workbook.
pub enum XlsxCell {
    Text(&'static str),
    Number(f64),
    /// Excel serial day number, styled with the built-in short date format.
    Date(u32),
}

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn cell_xml(reference: &str, cell: &XlsxCell) -> String {
    match cell {
        XlsxCell::Text(text) => format!(
            "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
            reference, text
        ),
        XlsxCell::Number(value) => format!("<c r=\"{}\"><v>{}</v></c>", reference, value),
        XlsxCell::Date(serial) => format!("<c r=\"{}\" s=\"1\"><v>{}</v></c>", reference, serial),
    }
}

/// Minimal single-sheet XLSX: a text header row followed by `rows`.
pub fn xlsx_workbook(header: &[&'static str], rows: &[Vec<XlsxCell>]) -> Vec<u8> {
    let mut sheet_rows = String::new();
    let header_cells: Vec<XlsxCell> = header.iter().map(|&h| XlsxCell::Text(h)).collect();
    for (r, cells) in std::iter::once(&header_cells).chain(rows.iter()).enumerate() {
        sheet_rows.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c), r + 1);
            sheet_rows.push_str(&cell_xml(&reference, cell));
        }
        sheet_rows.push_str("</row>");
    }

    let parts = [
        (
            "[Content_Types].xml",
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
             <Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
             <Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>\
             </Types>"
                .to_string(),
        ),
        (
            "_rels/.rels",
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
             </Relationships>"
                .to_string(),
        ),
        (
            "xl/workbook.xml",
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <workbook xmlns=\"{}\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
                 <sheets><sheet name=\"Clients\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
                SPREADSHEET_NS
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
             <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
             </Relationships>"
                .to_string(),
        ),
        (
            "xl/styles.xml",
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <styleSheet xmlns=\"{}\"><cellXfs count=\"2\">\
                 <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\
                 <xf numFmtId=\"14\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\"/>\
                 </cellXfs></styleSheet>",
                SPREADSHEET_NS
            ),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <worksheet xmlns=\"{}\"><sheetData>{}</sheetData></worksheet>",
                SPREADSHEET_NS, sheet_rows
            ),
        ),
    ];

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(name, options).expect("start workbook part");
        zip.write_all(content.as_bytes()).expect("write workbook part");
    }
    zip.finish().expect("finish workbook").into_inner()
}

/// Two clients with a native date cell and a numeric fee.
pub fn clients_xlsx() -> Vec<u8> {
    xlsx_workbook(
        &["Client Name", "Assignment Type", "FY Start", "Fees"],
        &[
            vec![
                XlsxCell::Text("Acme Pvt Ltd"),
                XlsxCell::Text("GST Audit"),
                XlsxCell::Date(45383),
                XlsxCell::Number(50000.0),
            ],
            vec![
                XlsxCell::Text("Beta LLP"),
                XlsxCell::Text("Tax Audit"),
                XlsxCell::Date(45748),
                XlsxCell::Number(12500.5),
            ],
        ],
    )
}
