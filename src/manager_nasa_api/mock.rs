use chrono::{DateTime, TimeDelta, Utc};
use crate::models::{FireDetection, WeatherObservation, POWER_SOURCE};

/// Fallback fire detections used when the network server can't be reached
///
/// # Arguments
///
/// * 'now' - time the most recent detection is stamped with, older ones go back an hour each
pub fn fire_detections(now: DateTime<Utc>) -> Vec<FireDetection> {
    let one_hour_ago = now - TimeDelta::hours(1);
    let two_hours_ago = now - TimeDelta::hours(2);

    vec![
        fire(1, 34.0522, -118.2437, 85.0, "high", "MODIS", "day", now, vec![
            observation(1, 1, "wind_speed", 12.5, "m/s", now),
            observation(2, 1, "relative_humidity", 45.0, "%", now),
        ]),
        fire(2, 37.7749, -122.4194, 72.0, "medium", "VIIRS", "night", one_hour_ago, vec![
            observation(3, 2, "temperature", 28.5, "C", one_hour_ago),
        ]),
        fire(3, 40.7128, -74.0060, 95.0, "high", "MODIS", "day", two_hours_ago, vec![
            observation(4, 3, "air_pressure", 1013.25, "hPa", two_hours_ago),
        ]),
    ]
}

/// Fallback power data used when the network server can't be reached
///
/// # Arguments
///
/// * 'now' - time the observations are stamped with
pub fn power_data(now: DateTime<Utc>) -> Vec<WeatherObservation> {
    vec![
        observation(1, 1, "solar_irradiance", 850.5, "W/m²", now),
        observation(2, 1, "uv_index", 8.2, "index", now),
    ]
}

#[allow(clippy::too_many_arguments)]
fn fire(id: u64, latitude: f64, longitude: f64, confidence: f64, confidence_lvl: &str, satellite: &str,
        daynight: &str, at: DateTime<Utc>, weather: Vec<WeatherObservation>) -> FireDetection {
    FireDetection {
        id,
        latitude,
        longitude,
        confidence,
        confidence_lvl: confidence_lvl.to_string(),
        satellite: satellite.to_string(),
        acq_datetime: at,
        daynight: daynight.to_string(),
        geom_wkt: format!("POINT({} {})", longitude, latitude),
        weather,
        created_at: at,
        updated_at: at,
    }
}

fn observation(id: u64, fire_id: u64, parameter: &str, value: f64, units: &str, at: DateTime<Utc>) -> WeatherObservation {
    WeatherObservation {
        id,
        fire_id,
        obs_time: at,
        parameter: parameter.to_string(),
        value: Some(value),
        units: Some(units.to_string()),
        source: POWER_SOURCE.to_string(),
        created_at: at,
        updated_at: at,
    }
}
