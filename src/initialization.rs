use std::env;
use std::sync::Arc;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_firms::Firms;
use crate::manager_firms::errors::FirmsError;
use crate::manager_nasa_api::NasaApi;
use crate::manager_nasa_api::errors::ApiError;
use crate::manager_power::Power;
use crate::manager_power::errors::PowerError;
use crate::store::{FireStore, StoreError};

pub struct Mgr {
    pub firms: Firms,
    pub power: Power,
    pub store: Arc<FireStore>,
    pub api: NasaApi,
}

/// Command line arguments
#[derive(Debug, PartialEq)]
pub struct Args {
    pub config_path: String,
    /// Run the headless dashboard instead of the service
    pub dashboard: bool,
}

/// Parses command line arguments, '--config=<path>' is mandatory
///
/// # Arguments
///
/// * 'args' - arguments, the program name included
pub fn parse_args(args: &[String]) -> Result<Args, InitializationError> {
    let config_path = args.iter()
        .find_map(|a| a.strip_prefix("--config="))
        .filter(|p| !p.is_empty())
        .ok_or(InitializationError::MissingArgument("--config=<path>".to_string()))?;

    Ok(Args {
        config_path: config_path.to_string(),
        dashboard: args.iter().any(|a| a == "--dashboard"),
    })
}

/// Initializes and returns configuration, a Mgr struct holding the initialized managers
/// and the parsed arguments
///
pub fn init() -> Result<(Config, Mgr, Args), InitializationError> {
    let args = parse_args(&env::args().collect::<Vec<String>>())?;

    // Load configuration
    let config = load_config(&args.config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;


    // Print version
    info!("starting aepg network version: {}", env!("CARGO_PKG_VERSION"));


    // Instantiate structs
    let firms = Firms::new(&config.firms, &config.region)?;
    let power = Power::new(&config.power)?;
    let store = FireStore::open(&config.files.data_dir, config.files.keep_hours)?;
    let api = NasaApi::new(&config.client.base_url)?;
    info!("store opened with {} fire records", store.len());

    let mgr = Mgr {
        firms,
        power,
        store: Arc::new(store),
        api,
    };

    Ok((config, mgr, args))
}

/// Error depicting errors that occur while initializing the service
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("MissingArgument: {0}")]
    MissingArgument(String),
    #[error("FirmsSetupError: {0}")]
    FirmsSetupError(#[from] FirmsError),
    #[error("PowerSetupError: {0}")]
    PowerSetupError(#[from] PowerError),
    #[error("StoreSetupError: {0}")]
    StoreSetupError(#[from] StoreError),
    #[error("ApiSetupError: {0}")]
    ApiSetupError(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn config_and_dashboard_flag() {
        let parsed = parse_args(&args(&["aepg_network", "--dashboard", "--config=config.toml"])).unwrap();

        assert_eq!(parsed, Args { config_path: "config.toml".to_string(), dashboard: true });
        assert!(!parse_args(&args(&["aepg_network", "--config=/etc/aepg.toml"])).unwrap().dashboard);
    }

    #[test]
    fn config_is_mandatory() {
        assert!(matches!(parse_args(&args(&["aepg_network"])), Err(InitializationError::MissingArgument(_))));
        assert!(matches!(parse_args(&args(&["aepg_network", "--config="])), Err(InitializationError::MissingArgument(_))));
    }
}
