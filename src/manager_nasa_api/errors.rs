use thiserror::Error;

/// Error depicting errors that occur while talking to the network server
///
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("StatusError: HTTP error! status: {0}")]
    StatusError(u16),
    #[error("DocumentError: {0}")]
    DocumentError(#[from] serde_json::Error),
}
