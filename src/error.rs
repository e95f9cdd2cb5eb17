use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when querying the podcast API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur during episode downloads
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Top-level errors for CLI commands
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No {0} found")]
    NoResults(&'static str),

    #[error("Episode index {index} not found ({available} episodes available)")]
    EpisodeNotFound { index: usize, available: usize },

    #[error("No download URL found for this episode")]
    MissingEpisodeUrl,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl CommandError {
    /// Whether a `download` command reports this error as a failed
    /// `DownloadOutcome` on stdout rather than only as a diagnostic
    pub fn is_download_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingEpisodeUrl | Self::Api(_) | Self::Download(_)
        )
    }
}
