use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No {0} given. Provide one to run the report.")]
    MissingInput(&'static str),

    #[error("Invalid month '{0}'. Expected MM-YYYY (e.g., '03-2024').")]
    InvalidMonth(String),

    #[error("Request to Stripe failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Stripe returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected {resource} payload from Stripe: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
