use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured (set {0})")]
    MissingCredentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response had no text content")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, AiError>;
