use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskwatchError {
    /// Non-2xx answer from one of the dashboard endpoints.
    #[error("HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("{0}")]
    Other(String),
}

impl DeskwatchError {
    /// HTTP status carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeskwatchError::Status { status, .. } => Some(*status),
            DeskwatchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskwatchError>;
