//! Word document exporter built on `docx-rs`.

use docx_rs::{BreakType, Docx, Paragraph, Pic, Run};
use std::io::Cursor;

use super::{DocumentExporter, ExportError, FileExtension, Logo};
use crate::letters::Letter;

const EMU_PER_INCH: u32 = 914_400;

/// Display width of the letterhead logo.
pub const LOGO_WIDTH_EMU: u32 = EMU_PER_INCH * 3 / 2;

/// One paragraph per blank-line separated block; lines inside a block become
/// line breaks. A leading `**Heading:**` on a line is rendered bold.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }

    fn logo_paragraph(logo: &Logo) -> Paragraph {
        let (width_px, height_px) = logo.dimensions();
        let height_emu = (u64::from(LOGO_WIDTH_EMU) * u64::from(height_px) / u64::from(width_px))
            .min(u64::from(u32::MAX)) as u32;
        let pic = Pic::new(logo.bytes()).size(LOGO_WIDTH_EMU, height_emu);
        Paragraph::new().add_run(Run::new().add_image(pic))
    }

    fn text_paragraph(block: &str) -> Paragraph {
        let mut paragraph = Paragraph::new();
        for (i, line) in block.lines().enumerate() {
            if i > 0 {
                paragraph = paragraph.add_run(Run::new().add_break(BreakType::TextWrapping));
            }
            for run in line_runs(line.trim_end()) {
                paragraph = paragraph.add_run(run);
            }
        }
        paragraph
    }
}

fn line_runs(line: &str) -> Vec<Run> {
    if let Some(rest) = line.strip_prefix("**") {
        if let Some(end) = rest.find("**") {
            let mut runs = vec![Run::new().add_text(&rest[..end]).bold()];
            let tail = &rest[end + 2..];
            if !tail.is_empty() {
                runs.push(Run::new().add_text(tail));
            }
            return runs;
        }
    }
    vec![Run::new().add_text(line)]
}

impl DocumentExporter for DocxExporter {
    fn export(&self, letter: &Letter, logo: Option<&Logo>) -> Result<Vec<u8>, ExportError> {
        let mut docx = Docx::new();

        if let Some(logo) = logo {
            docx = docx.add_paragraph(Self::logo_paragraph(logo));
        }

        for block in letter.paragraphs() {
            if block.trim().is_empty() {
                continue;
            }
            docx = docx.add_paragraph(Self::text_paragraph(block));
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| ExportError::Pack(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    fn extension(&self) -> FileExtension {
        FileExtension::Docx
    }
}
