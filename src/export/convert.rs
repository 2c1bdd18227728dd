//! PDF conversion through a headless LibreOffice (`soffice`) process.
//!
//! Conversion is only offered when the binary answers `--version` at start-up;
//! the detection result is held by the caller as an `Option`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::{tempdir, TempDir};
use thiserror::Error;

use super::FileExtension;

pub const DEFAULT_SOFFICE_BIN: &str = "soffice";

const INPUT_FILE: &str = "letter.docx";
const OUTPUT_FILE: &str = "letter.pdf";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("PDF download is unavailable on this host (LibreOffice not found).")]
    Unavailable,
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write document for conversion: {0}")]
    WriteInput(#[source] std::io::Error),
    #[error("converter execution failed: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("converter exited with status {0}")]
    Exit(i32),
    #[error("failed to read converted document: {0}")]
    ReadOutput(#[source] std::io::Error),
}

/// Turns an exported document into a secondary download format.
pub trait FormatConverter: Send + Sync {
    fn convert(&self, document: &[u8]) -> Result<Vec<u8>, ConvertError>;

    fn target(&self) -> FileExtension {
        FileExtension::Pdf
    }
}

#[derive(Debug, Clone)]
pub struct SofficeConverter {
    binary: PathBuf,
}

impl SofficeConverter {
    /// Returns a converter if `binary --version` runs successfully.
    pub fn detect(binary: impl AsRef<Path>) -> Option<Self> {
        let binary = binary.as_ref();
        let status = Command::new(binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {
                log::info!("PDF conversion enabled via {}", binary.display());
                Some(Self {
                    binary: binary.to_path_buf(),
                })
            }
            Ok(status) => {
                log::info!(
                    "PDF conversion disabled: {} exited with {}",
                    binary.display(),
                    status
                );
                None
            }
            Err(e) => {
                log::info!("PDF conversion disabled: {} not runnable ({})", binary.display(), e);
                None
            }
        }
    }
}

impl FormatConverter for SofficeConverter {
    fn convert(&self, document: &[u8]) -> Result<Vec<u8>, ConvertError> {
        // Removed on drop, including every early return below.
        let work_dir = tempdir().map_err(ConvertError::TempDir)?;
        fs::write(work_dir.path().join(INPUT_FILE), document).map_err(ConvertError::WriteInput)?;
        run_soffice(&self.binary, &work_dir)?;
        fs::read(work_dir.path().join(OUTPUT_FILE)).map_err(ConvertError::ReadOutput)
    }
}

fn run_soffice(binary: &Path, work_dir: &TempDir) -> Result<(), ConvertError> {
    let status = Command::new(binary)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(work_dir.path())
        .arg(work_dir.path().join(INPUT_FILE))
        .current_dir(work_dir.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .status()
        .map_err(ConvertError::Spawn)?;

    if !status.success() {
        return Err(ConvertError::Exit(status.code().unwrap_or(-1)));
    }
    Ok(())
}
