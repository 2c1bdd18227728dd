//! Application state shared by all handlers.
//!
//! The firm profile and logo are the only mutable session data. Handlers take a
//! snapshot and pass it explicitly into generation, so no call reads the lock
//! while rendering.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::export::{DocumentExporter, DocxExporter, FormatConverter, Logo, SofficeConverter};
use crate::letters::FirmProfile;
use crate::mail::{Notifier, SmtpNotifier};

#[derive(Debug, Default)]
pub struct FirmSession {
    pub profile: FirmProfile,
    pub logo: Option<Arc<Logo>>,
}

pub struct AppState {
    firm: RwLock<FirmSession>,
    pub exporter: Arc<dyn DocumentExporter>,
    /// `None` when no converter was found at start-up.
    pub converter: Option<Arc<dyn FormatConverter>>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Production collaborators; detects the PDF converter once.
    pub fn new(config: &ServerConfig) -> Self {
        let converter = SofficeConverter::detect(&config.soffice_bin)
            .map(|c| Arc::new(c) as Arc<dyn FormatConverter>);
        Self::with_collaborators(
            Arc::new(DocxExporter::new()),
            converter,
            Arc::new(SmtpNotifier::new(config.smtp_host.clone())),
        )
    }

    pub fn with_collaborators(
        exporter: Arc<dyn DocumentExporter>,
        converter: Option<Arc<dyn FormatConverter>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            firm: RwLock::new(FirmSession::default()),
            exporter,
            converter,
            notifier,
        }
    }

    pub fn pdf_available(&self) -> bool {
        self.converter.is_some()
    }

    /// Copy of the current firm profile and logo.
    pub fn firm_snapshot(&self) -> (FirmProfile, Option<Arc<Logo>>) {
        let session = self.firm.read();
        (session.profile.clone(), session.logo.clone())
    }

    pub fn set_firm_profile(&self, profile: FirmProfile) {
        self.firm.write().profile = profile;
    }

    pub fn set_logo(&self, logo: Option<Logo>) {
        self.firm.write().logo = logo.map(Arc::new);
    }

    pub fn has_logo(&self) -> bool {
        self.firm.read().logo.is_some()
    }
}
