use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeakersError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No server URL found. Set INDICO_URL env var or add base_url to ~/.config/speakers/config.toml"
    )]
    MissingBaseUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Event not specified and no default_event in config")]
    NoEvent,

    #[error("Invalid event ID: {0}")]
    InvalidEventId(String),

    #[error("Speaker not found: {0}")]
    SpeakerNotFound(u64),

    #[error("No speaker selected")]
    NoSpeakerSelected,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Photo rejected ({filename}): {reason}")]
    InvalidPhoto { filename: String, reason: String },

    /// The error has already been shown to the user.
    #[error("Request failed")]
    Reported,
}

pub type Result<T> = std::result::Result<T, SpeakersError>;
