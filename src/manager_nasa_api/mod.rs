pub mod errors;
pub mod mock;

use std::time::Duration;
use chrono::Utc;
use log::error;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use crate::models::{FireDetection, WeatherObservation};
use crate::manager_nasa_api::errors::ApiError;

/// Client for the AEPG network server
///
/// Any failure while talking to the server is logged and answered with fixed sample data,
/// so callers always get something to display.
pub struct NasaApi {
    client: Client,
    base_url: String,
}

impl NasaApi {
    /// Returns a client for the network server at the given base url
    ///
    /// # Arguments
    ///
    /// * 'base_url' - scheme, host and port of the server, e.g. http://127.0.0.1:8000
    pub fn new(base_url: &str) -> Result<NasaApi, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(NasaApi { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Fetches fire detections, falling back to the sample detections on failure
    ///
    /// # Arguments
    ///
    /// * 'filter' - optional confidence level filter passed on to the server
    pub fn get_fire_detections(&self, filter: Option<&str>) -> Vec<FireDetection> {
        match self.fetch_fire_detections(filter) {
            Ok(fires) => fires,
            Err(e) => {
                error!("Error fetching fire detections: {}", e);
                mock::fire_detections(Utc::now())
            }
        }
    }

    /// Fetches power (weather) data, falling back to the sample data on failure
    ///
    /// # Arguments
    ///
    /// * 'fire_id' - optional fire to get data for, all data is returned if not given
    pub fn get_power_data(&self, fire_id: Option<u64>) -> Vec<WeatherObservation> {
        match self.fetch_power_data(fire_id) {
            Ok(power) => power,
            Err(e) => {
                error!("Error fetching power data: {}", e);
                mock::power_data(Utc::now())
            }
        }
    }

    /// Fetches fire detections from the server, an empty filter is not sent
    ///
    /// # Arguments
    ///
    /// * 'filter' - optional confidence level filter
    pub fn fetch_fire_detections(&self, filter: Option<&str>) -> Result<Vec<FireDetection>, ApiError> {
        let query: Vec<(&str, String)> = filter
            .filter(|f| !f.is_empty())
            .map(|f| vec![("filter", f.to_string())])
            .unwrap_or_default();

        self.get_json("/api/detect/fire", &query)
    }

    /// Fetches power data from the server, fire id 0 is not sent
    ///
    /// # Arguments
    ///
    /// * 'fire_id' - optional fire to get data for
    pub fn fetch_power_data(&self, fire_id: Option<u64>) -> Result<Vec<WeatherObservation>, ApiError> {
        let query: Vec<(&str, String)> = fire_id
            .filter(|id| *id != 0)
            .map(|id| vec![("fire", id.to_string())])
            .unwrap_or_default();

        self.get_json("/api/detect/power", &query)
    }

    /// Sends a GET request and decodes the JSON body, non-success statuses are errors
    ///
    /// # Arguments
    ///
    /// * 'path' - the API path excluding the base url
    /// * 'query' - query parameters
    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client
            .get(url)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::StatusError(status.as_u16()));
        }

        let json = response.text()?;

        Ok(serde_json::from_str(&json)?)
    }
}
