//! Library error type

use thiserror::Error;

/// Errors raised while fetching, preparing or rendering posts
#[derive(Error, Debug)]
pub enum Error {
    #[error("No {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No content source configured: set cms.endpoint or cms.fixtures_dir")]
    NoContentSource,

    #[error("CMS API did not advertise a master ref")]
    MissingMasterRef,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

impl Error {
    /// Whether this error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
