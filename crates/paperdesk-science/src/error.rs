use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScienceError {
    #[error("invalid arXiv ID: {0}")]
    InvalidArxivId(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ScienceError>;
