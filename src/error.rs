use std::path::PathBuf;

/// Failures of a single upstream fetch. Exactly one network attempt is made
/// per call, so every variant describes that one attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// The wrapped error never carries the request URL, which holds the
    /// API credential.
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response contained no data")]
    NoData,

    #[error("Failed to decode response: {0}")]
    Decoding(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

/// Failures of the durable bookmark record.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse bookmark file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize bookmarks: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    #[error("Index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Bookmark error: {0}")]
    Bookmark(#[from] BookmarkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;
