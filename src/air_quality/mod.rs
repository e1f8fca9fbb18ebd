pub mod models;

use serde::Serialize;
use crate::air_quality::models::{AirQualityData, GlobePoint};

const SAMPLE_DATA: &str = include_str!("../../data/air_quality.json");

/// Color used when an AQI value falls outside every band
pub const FALLBACK_COLOR: &str = "#ff0000";

/// Label used when an AQI value falls outside every band
pub const FALLBACK_LABEL: &str = "Unknown";

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

#[derive(Debug, PartialEq)]
pub struct AqiInfo {
    pub level: AqiLevel,
    pub color: &'static str,
    pub label: &'static str,
    /// Inclusive range
    pub range: (u32, u32),
}

pub static AQI_LEVELS: [AqiInfo; 6] = [
    AqiInfo { level: AqiLevel::Good, color: "#00ff88", label: "Good", range: (0, 50) },
    AqiInfo { level: AqiLevel::Moderate, color: "#ffff00", label: "Moderate", range: (51, 100) },
    AqiInfo { level: AqiLevel::UnhealthySensitive, color: "#ff8800", label: "Unhealthy for Sensitive", range: (101, 150) },
    AqiInfo { level: AqiLevel::Unhealthy, color: "#ff0000", label: "Unhealthy", range: (151, 200) },
    AqiInfo { level: AqiLevel::VeryUnhealthy, color: "#8800ff", label: "Very Unhealthy", range: (201, 300) },
    AqiInfo { level: AqiLevel::Hazardous, color: "#800000", label: "Hazardous", range: (301, 500) },
];

impl AqiLevel {
    /// Open ended banding as used by charts and the location list, anything above 300 is hazardous
    ///
    /// # Arguments
    ///
    /// * 'aqi' - air quality index
    pub fn from_aqi(aqi: u32) -> AqiLevel {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthySensitive,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn info(&self) -> &'static AqiInfo {
        // AQI_LEVELS is ordered the same way as the enum
        &AQI_LEVELS[*self as usize]
    }
}

/// Returns the band an AQI value falls within, if any
///
/// # Arguments
///
/// * 'aqi' - air quality index
pub fn aqi_info(aqi: u32) -> Option<&'static AqiInfo> {
    AQI_LEVELS.iter().find(|l| aqi >= l.range.0 && aqi <= l.range.1)
}

pub fn aqi_color(aqi: u32) -> &'static str {
    aqi_info(aqi).map_or(FALLBACK_COLOR, |l| l.color)
}

pub fn aqi_label(aqi: u32) -> &'static str {
    aqi_info(aqi).map_or(FALLBACK_LABEL, |l| l.label)
}

/// Legend entries as (color, text), e.g. ("#00ff88", "Good (0-50)")
pub fn legend() -> Vec<(&'static str, String)> {
    AQI_LEVELS.iter()
        .map(|l| (l.color, format!("{} ({}-{})", l.label, l.range.0, l.range.1)))
        .collect()
}

/// Loads the bundled sample air quality dataset
///
pub fn mock_air_quality() -> Result<Vec<AirQualityData>, serde_json::Error> {
    serde_json::from_str(SAMPLE_DATA)
}

/// Generates one globe marker per location, sized by the current AQI
///
/// # Arguments
///
/// * 'data' - air quality records
pub fn generate_globe_points(data: &[AirQualityData]) -> Vec<GlobePoint> {
    data.iter()
        .map(|d| GlobePoint {
            lat: d.location.lat(),
            lng: d.location.lng(),
            color: aqi_color(d.current.aqi).to_string(),
            aqi: d.current.aqi,
            size: (d.current.aqi as f64 / 50.0).clamp(0.5, 3.0),
            location: d.location.name.clone(),
        })
        .collect()
}
