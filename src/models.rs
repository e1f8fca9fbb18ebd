use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const POWER_SOURCE: &str = "NASA_POWER";

/// A fire detection as served by `/api/detect/fire`, with its weather observations nested
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FireDetection {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Detection confidence in percent (0-100)
    pub confidence: f64,
    pub confidence_lvl: String,
    pub satellite: String,
    pub acq_datetime: DateTime<Utc>,
    pub daynight: String,
    pub geom_wkt: String,
    #[serde(default)]
    pub weather: Vec<WeatherObservation>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A single weather parameter value observed around a fire, also served as "power data"
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WeatherObservation {
    pub id: u64,
    pub fire_id: u64,
    pub obs_time: DateTime<Utc>,
    pub parameter: String,
    pub value: Option<f64>,
    pub units: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A processed FIRMS row ready to be stored
#[derive(Clone, Debug, PartialEq)]
pub struct NewFireRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub confidence: f64,
    pub confidence_lvl: String,
    pub satellite: String,
    pub acq_datetime: DateTime<Utc>,
    pub daynight: String,
    pub geom_wkt: String,
}

/// A transformed NASA POWER value ready to be stored against a fire
#[derive(Clone, Debug, PartialEq)]
pub struct NewObservation {
    pub obs_time: DateTime<Utc>,
    pub parameter: String,
    pub value: Option<f64>,
    pub units: Option<String>,
    pub source: String,
}

fn default_source() -> String {
    POWER_SOURCE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_detection_uses_camel_case_timestamps() {
        let json = r#"{
            "id": 4, "latitude": 34.05, "longitude": -118.24, "confidence": 85.0,
            "confidence_lvl": "high", "satellite": "MODIS", "acq_datetime": "2024-01-01T12:00:00Z",
            "daynight": "D", "geom_wkt": "POINT(-118.24 34.05)",
            "createdAt": "2024-01-01T12:05:00Z", "updatedAt": "2024-01-01T12:05:00Z"
        }"#;

        let fire: FireDetection = serde_json::from_str(json).unwrap();
        assert_eq!(fire.id, 4);
        assert!(fire.weather.is_empty());

        let back = serde_json::to_value(&fire).unwrap();
        assert!(back.get("createdAt").is_some());
        assert!(back.get("created_at").is_none());
    }

    #[test]
    fn observation_source_defaults_to_power() {
        let json = r#"{
            "id": 1, "fire_id": 4, "obs_time": "2024-01-01T12:00:00Z", "parameter": "T2M",
            "value": null, "units": null,
            "createdAt": "2024-01-01T12:05:00Z", "updatedAt": "2024-01-01T12:05:00Z"
        }"#;

        let obs: WeatherObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.source, POWER_SOURCE);
        assert_eq!(obs.value, None);
    }
}
