use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server { bind: "0.0.0.0".to_string(), port: 8000 }
    }
}

/// FIRMS area CSV source, the url carries map key, source, area and day range
#[derive(Deserialize)]
pub struct Firms {
    pub url: String,
    pub csv_file: String,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Power {
    pub url: String,
    pub community: String,
    pub hours_window: i64,
    pub parameters: Vec<String>,
}

impl Default for Power {
    fn default() -> Self {
        Power {
            url: "https://power.larc.nasa.gov/api/temporal/hourly/point".to_string(),
            community: "RE".to_string(),
            hours_window: 3,
            parameters: vec!["T2M".into(), "WS2M".into(), "RH2M".into(), "PRECTOTCORR".into()],
        }
    }
}

/// Bounding box that fire detections must fall within (inclusive), defaults to North America
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Region {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for Region {
    fn default() -> Self {
        Region { lat_min: 5.0, lat_max: 83.0, lon_min: -168.0, lon_max: -52.0 }
    }
}

impl Region {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub run_hours: Vec<u32>,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule { run_hours: vec![4, 21] }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Files {
    pub data_dir: String,
    pub keep_hours: i64,
}

impl Default for Files {
    fn default() -> Self {
        Files { data_dir: "data/".to_string(), keep_hours: 48 }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Client {
    pub base_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Client { base_url: "http://127.0.0.1:8000".to_string() }
    }
}

#[derive(Deserialize)]
pub struct Config {
    pub general: General,
    pub firms: Firms,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub power: Power,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub files: Files,
    #[serde(default)]
    pub client: Client,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

/// Parses configuration from its TOML text and validates the schedule
///
/// # Arguments
///
/// * 'toml' - the configuration document
pub fn parse_config(toml: &str) -> Result<Config, LoadConfigurationError> {
    let config: Config = toml::from_str(toml)?;

    if config.schedule.run_hours.is_empty() || config.schedule.run_hours.iter().any(|h| *h > 23) {
        return Err(LoadConfigurationError::InvalidValue(
            format!("schedule.run_hours must be a non empty list of hours 0-23: {:?}", config.schedule.run_hours)));
    }

    Ok(config)
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("FileError: {0}")]
    FileError(#[from] std::io::Error),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("InvalidValue: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [general]
        log_path = "logs/aepg_network.log"
        log_level = "info"
        log_to_stdout = true

        [firms]
        url = "https://firms.modaps.eosdis.nasa.gov/api/area/csv/KEY/LANDSAT_NRT/world/1"
        csv_file = "firm_data.csv"
    "#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse_config(MINIMAL).unwrap();

        assert_eq!(config.general.log_level, LevelFilter::Info);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.schedule.run_hours, vec![4, 21]);
        assert_eq!(config.power.hours_window, 3);
        assert_eq!(config.power.parameters.len(), 4);
        assert_eq!(config.region, Region::default());
        assert_eq!(config.files.keep_hours, 48);
    }

    #[test]
    fn overrides_are_applied() {
        let toml = format!("{}\n[server]\nport = 9090\n\n[schedule]\nrun_hours = [6]\n", MINIMAL);
        let config = parse_config(&toml).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.schedule.run_hours, vec![6]);
    }

    #[test]
    fn rejects_out_of_range_hours() {
        let toml = format!("{}\n[schedule]\nrun_hours = [4, 24]\n", MINIMAL);

        assert!(matches!(parse_config(&toml), Err(LoadConfigurationError::InvalidValue(_))));
    }

    #[test]
    fn region_bounds_are_inclusive() {
        let region = Region::default();

        assert!(region.contains(5.0, -52.0));
        assert!(region.contains(83.0, -168.0));
        assert!(!region.contains(4.99, -100.0));
        assert!(!region.contains(40.0, -51.0));
    }
}
