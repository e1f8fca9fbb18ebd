use thiserror::Error;

/// Error depicting errors that make the service unable to start or keep running
///
#[derive(Debug, Error)]
#[error("error while running network service: {0}")]
pub struct ServiceError(pub String);

/// Error depicting errors in the dashboard view state
///
#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("no locations to show")]
    NoLocations,
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("unknown fire: {0}")]
    UnknownFire(u64),
}
