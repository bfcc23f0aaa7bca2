//! Error types for the media library.

use crate::services::providers::ProviderErrors;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media library.
#[derive(Error, Debug)]
pub enum Error {
    // Index errors
    #[error("Not found in library: {0}")]
    NotFound(String),

    #[error("Season {season} of show {show_id} still has episodes")]
    SeasonNotEmpty { show_id: String, season: u32 },

    #[error("Show {0} still has seasons")]
    ShowNotEmpty(String),

    // Ingest precondition errors
    #[error("Video has no file path")]
    MissingFilePath,

    #[error("Missing image URL: {0}")]
    MissingImageUrl(String),

    #[error("Movie has no title")]
    MissingMovieTitle,

    #[error("Episode has no show title")]
    MissingShowTitle,

    #[error("Movie has no IMDB ID")]
    MissingMovieId,

    #[error("Episode has no show IMDB ID")]
    MissingShowId,

    #[error("Title does not make a valid folder name: {0:?}")]
    InvalidFolderName(String),

    // Sidecar errors
    #[error("Failed to parse NFO: {0}")]
    ParseError(String),

    #[error("Invalid quality: {0}")]
    InvalidQuality(String),

    // Module errors
    #[error("Module {name:?} of type {kind} is already registered")]
    ModuleAlreadyRegistered { kind: &'static str, name: String },

    #[error("Module {name:?} of type {kind} is not registered")]
    ModuleNotFound { kind: &'static str, name: String },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderErrors),

    // Download errors
    #[error("Image download failed: {0}")]
    ImageDownload(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config errors
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    // Worker errors
    #[error("Index worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error means the identifier is absent from the index.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::ParseError(err.to_string())
    }
}
