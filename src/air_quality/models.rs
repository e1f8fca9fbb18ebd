use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Location {
    pub name: String,
    /// [longitude, latitude]
    pub coordinates: [f64; 2],
    pub country: String,
}

impl Location {
    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CurrentReading {
    pub aqi: u32,
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    pub co: f64,
    pub so2: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ForecastHour {
    pub hour: DateTime<Utc>,
    pub aqi: u32,
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Danger,
    Info,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub severity: u8,
    pub expires_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AirQualityData {
    pub id: String,
    pub location: Location,
    pub current: CurrentReading,
    pub forecast: Vec<ForecastHour>,
    pub alerts: Vec<Alert>,
}

/// An air quality marker for the globe
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GlobePoint {
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub aqi: u32,
    pub size: f64,
    pub location: String,
}
