use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Capability unavailable: {0}")]
    Unsupported(&'static str),

    #[error("Playback rejected: {0}")]
    Rejected(String),

    #[error("Async runtime unavailable: {0}")]
    Runtime(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
