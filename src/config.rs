//! Process configuration.
//!
//! Only server plumbing is configurable here. Letter content (firm details,
//! client fields, email credentials) is always entered per session.

use std::env;
use thiserror::Error;

use crate::export::convert::DEFAULT_SOFFICE_BIN;
use crate::mail::DEFAULT_SMTP_HOST;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:3000,http://localhost:8080,http://127.0.0.1:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SERVER_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// LibreOffice binary checked for PDF conversion.
    pub soffice_bin: String,
    pub smtp_host: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            soffice_bin: DEFAULT_SOFFICE_BIN.to_string(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            allowed_origins: split_origins(DEFAULT_ORIGINS),
        }
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl ServerConfig {
    /// Read from the environment (after loading `.env`), falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port,
            soffice_bin: lookup("SOFFICE_BIN").unwrap_or(defaults.soffice_bin),
            smtp_host: lookup("SMTP_HOST").unwrap_or(defaults.smtp_host),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or(defaults.allowed_origins),
        })
    }
}
