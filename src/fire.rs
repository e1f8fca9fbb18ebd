use std::fmt;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::models::FireDetection;

/// Confidence from which a detection counts as high confidence
const HIGH_CONFIDENCE: f64 = 80.0;

/// A fire marker for the globe
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FirePoint {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub size: f64,
    pub confidence: f64,
    pub satellite: String,
    pub timestamp: DateTime<Utc>,
    pub daynight: String,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Estimated effect of a set of fire detections on air quality
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AirQualityImpact {
    pub total_fires: usize,
    pub high_confidence_fires: usize,
    /// Additional AQI points, 0-100
    pub aqi_impact: u32,
    pub risk_level: RiskLevel,
}

/// Returns the marker color for a detection confidence
///
/// # Arguments
///
/// * 'confidence' - detection confidence in percent
pub fn fire_color(confidence: f64) -> &'static str {
    if confidence >= 90.0 {
        "#ff0000"
    } else if confidence >= 70.0 {
        "#ff8800"
    } else if confidence >= 50.0 {
        "#ffff00"
    } else {
        "#ff8800"
    }
}

pub fn fire_size(confidence: f64) -> f64 {
    (confidence / 30.0).clamp(0.5, 3.0)
}

/// Maps fire detections to globe markers
///
/// # Arguments
///
/// * 'fires' - fire detections
pub fn fire_points(fires: &[FireDetection]) -> Vec<FirePoint> {
    fires.iter()
        .map(|f| FirePoint {
            id: f.id,
            lat: f.latitude,
            lng: f.longitude,
            color: fire_color(f.confidence).to_string(),
            size: (f.confidence / 50.0).clamp(0.5, 2.0),
            confidence: f.confidence,
            satellite: f.satellite.clone(),
            timestamp: f.acq_datetime,
            daynight: f.daynight.clone(),
        })
        .collect()
}

/// Estimates the air quality impact from average confidence and the share of high confidence fires
///
/// # Arguments
///
/// * 'fires' - fire detections
pub fn air_quality_impact(fires: &[FireDetection]) -> AirQualityImpact {
    let total_fires = fires.len();
    let high_confidence_fires = fires.iter().filter(|f| f.confidence >= HIGH_CONFIDENCE).count();

    let impact = if total_fires > 0 {
        let avg_confidence = fires.iter().map(|f| f.confidence).sum::<f64>() / total_fires as f64;
        let high_confidence_ratio = high_confidence_fires as f64 / total_fires as f64;
        (avg_confidence * 0.5 + high_confidence_ratio * 30.0).min(100.0)
    } else {
        0.0
    };

    let risk_level = if impact > 50.0 {
        RiskLevel::High
    } else if impact > 25.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    AirQualityImpact {
        total_fires,
        high_confidence_fires,
        aqi_impact: impact.round().max(0.0) as u32,
        risk_level,
    }
}
