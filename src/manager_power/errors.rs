use thiserror::Error;

/// Error depicting errors that occur while fetching NASA POWER weather data
///
#[derive(Error, Debug)]
pub enum PowerError {
    #[error("DateError: {0}")]
    DateError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("StatusError: {0}")]
    StatusError(u16),
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
}
