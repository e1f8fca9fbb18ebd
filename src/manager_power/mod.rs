pub mod errors;
pub mod models;

use std::time::Duration;
use chrono::{DateTime, DurationRound, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use log::{debug, info};
use reqwest::blocking::Client;
use crate::config::Power as PowerConfig;
use crate::manager_power::models::PowerResponse;
use crate::models::{NewObservation, POWER_SOURCE};
use crate::manager_power::errors::PowerError;

/// NASA POWER marks missing values with this number
const FILL_VALUE: f64 = -999.0;

/// Struct for fetching NASA POWER weather data around fire detections
pub struct Power {
    client: Client,
    url: String,
    community: String,
    parameters: Vec<String>,
    hours_window: i64,
}

impl Power {
    /// Returns a Power struct ready for fetching weather data
    ///
    /// # Arguments
    ///
    /// * 'config' - NASA POWER configuration
    pub fn new(config: &PowerConfig) -> Result<Power, PowerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Power {
            client,
            url: config.url.clone(),
            community: config.community.clone(),
            parameters: config.parameters.clone(),
            hours_window: config.hours_window,
        })
    }

    /// Returns the observation window around an acquisition time, both ends truncated to the hour
    ///
    /// # Arguments
    ///
    /// * 'acq' - fire acquisition time
    pub fn window(&self, acq: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), PowerError> {
        let start = (acq - TimeDelta::hours(self.hours_window)).duration_trunc(TimeDelta::hours(1))
            .map_err(|e| PowerError::DateError(format!("window start: {}", e)))?;
        let end = (acq + TimeDelta::hours(self.hours_window)).duration_trunc(TimeDelta::hours(1))
            .map_err(|e| PowerError::DateError(format!("window end: {}", e)))?;

        Ok((start, end))
    }

    /// Fetches and transforms weather observations for a point around an acquisition time
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the fire
    /// * 'lon' - longitude of the fire
    /// * 'acq' - fire acquisition time
    pub fn observations(&self, lat: f64, lon: f64, acq: DateTime<Utc>) -> Result<Vec<NewObservation>, PowerError> {
        let window = self.window(acq)?;
        let response = self.fetch(lat, lon, window)?;
        let observations = transform(&response, &self.parameters, window);

        info!("Got {} weather observations for ({}, {})", observations.len(), lat, lon);

        Ok(observations)
    }

    /// Calls the hourly point endpoint, which only accepts whole days
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude
    /// * 'lon' - longitude
    /// * 'window' - start and end of the period to cover
    fn fetch(&self, lat: f64, lon: f64, window: (DateTime<Utc>, DateTime<Utc>)) -> Result<PowerResponse, PowerError> {
        let response = self.client
            .get(&self.url)
            .query(&[
                ("parameters", self.parameters.join(",")),
                ("community", self.community.clone()),
                ("longitude", lon.to_string()),
                ("latitude", lat.to_string()),
                ("start", window.0.format("%Y%m%d").to_string()),
                ("end", window.1.format("%Y%m%d").to_string()),
                ("format", "JSON".to_string()),
                ("time-standard", "UTC".to_string()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PowerError::StatusError(status.as_u16()));
        }

        let json = response.text()?;

        serde_json::from_str(&json).map_err(|e| PowerError::ParseError(e.to_string()))
    }
}

/// Turns a POWER response into observations within the window
///
/// Timestamps that don't parse, missing values and fill values are skipped.
///
/// # Arguments
///
/// * 'response' - decoded POWER response
/// * 'parameters' - parameters to extract
/// * 'window' - inclusive start and end of the period to keep
pub fn transform(response: &PowerResponse, parameters: &[String], window: (DateTime<Utc>, DateTime<Utc>)) -> Vec<NewObservation> {
    let mut observations: Vec<NewObservation> = Vec::new();

    for parameter in parameters {
        let Some(values) = response.properties.parameter.get(parameter) else {
            debug!("No values for parameter {} in POWER response", parameter);
            continue;
        };

        for (ts, value) in values {
            let Some(obs_time) = parse_timestamp(ts) else {
                debug!("Unrecognized timestamp format from POWER: {}", ts);
                continue;
            };
            if obs_time < window.0 || obs_time > window.1 {
                continue;
            }
            let Some(value) = value.filter(|v| *v != FILL_VALUE) else {
                continue;
            };

            observations.push(NewObservation {
                obs_time,
                parameter: parameter.clone(),
                value: Some(value),
                units: unit_hint(parameter).map(|u| u.to_string()),
                source: POWER_SOURCE.to_string(),
            });
        }
    }

    observations.sort_by(|a, b| a.obs_time.cmp(&b.obs_time).then_with(|| a.parameter.cmp(&b.parameter)));
    observations
}

/// Parses an hourly `YYYYMMDDHH` key, falling back to a daily `YYYYMMDD` key
///
/// # Arguments
///
/// * 'ts' - timestamp key from the response
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    match ts.len() {
        10 => NaiveDateTime::parse_from_str(&format!("{}00", ts), "%Y%m%d%H%M")
            .ok()
            .map(|dt| dt.and_utc()),
        8 => NaiveDate::parse_from_str(ts, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc()),
        _ => None,
    }
}

pub fn unit_hint(parameter: &str) -> Option<&'static str> {
    match parameter {
        "T2M" => Some("degC"),
        "WS2M" => Some("m/s"),
        "RH2M" => Some("%"),
        "PRECTOTCORR" => Some("mm"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params() -> Vec<String> {
        vec!["T2M".to_string(), "WS2M".to_string(), "RH2M".to_string(), "PRECTOTCORR".to_string()]
    }

    fn response() -> PowerResponse {
        let json = r#"{
            "type": "Feature",
            "properties": {
                "parameter": {
                    "T2M": {"2025100405": 11.2, "2025100406": 11.9, "2025100407": -999.0, "2025100423": 14.0},
                    "WS2M": {"2025100406": 3.4, "bad": 1.0},
                    "RH2M": {"2025100406": null},
                    "ALLSKY_SFC_SW_DWN": {"2025100406": 0.0}
                }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn window_is_truncated_to_hour() {
        let power = Power::new(&PowerConfig::default()).unwrap();
        let acq = Utc.with_ymd_and_hms(2025, 10, 4, 8, 13, 0).unwrap();

        let (start, end) = power.window(acq).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 10, 4, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 10, 4, 11, 0, 0).unwrap());
    }

    #[test]
    fn transform_keeps_requested_values_in_window() {
        let window = (Utc.with_ymd_and_hms(2025, 10, 4, 5, 0, 0).unwrap(), Utc.with_ymd_and_hms(2025, 10, 4, 11, 0, 0).unwrap());
        let obs = transform(&response(), &params(), window);

        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].parameter, "T2M");
        assert_eq!(obs[0].value, Some(11.2));
        assert_eq!(obs[0].units.as_deref(), Some("degC"));
        assert_eq!(obs[1].parameter, "T2M");
        assert_eq!(obs[2].parameter, "WS2M");
        assert_eq!(obs[2].units.as_deref(), Some("m/s"));
        assert!(obs.iter().all(|o| o.source == POWER_SOURCE));
    }

    #[test]
    fn empty_response_gives_no_observations() {
        let window = (Utc::now() - TimeDelta::hours(3), Utc::now());

        assert!(transform(&PowerResponse::default(), &params(), window).is_empty());
    }

    #[test]
    fn timestamps_hourly_and_daily() {
        assert_eq!(parse_timestamp("2025100413"), Some(Utc.with_ymd_and_hms(2025, 10, 4, 13, 0, 0).unwrap()));
        assert_eq!(parse_timestamp("20251004"), Some(Utc.with_ymd_and_hms(2025, 10, 4, 0, 0, 0).unwrap()));
        assert_eq!(parse_timestamp("2025100425"), None);
        assert_eq!(parse_timestamp("x"), None);
    }
}
