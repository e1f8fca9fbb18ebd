use thiserror::Error;

/// Error depicting errors that occur while downloading and processing FIRMS data
///
#[derive(Error, Debug)]
pub enum FirmsError {
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("FileError: {0}")]
    FileError(String),
    #[error("DocumentError: {0}")]
    DocumentError(String),
    #[error("EmptyDocument")]
    EmptyDocument,
    #[error("MissingColumn: {0}")]
    MissingColumn(&'static str),
}
