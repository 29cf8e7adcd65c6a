//! Workspace-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VitrinaError>;

#[derive(Debug, Error)]
pub enum VitrinaError {
    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("no API key configured for {0}")]
    ApiKeyMissing(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
