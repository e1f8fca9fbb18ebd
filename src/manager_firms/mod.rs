pub mod errors;
mod models;

use std::collections::HashSet;
use std::fs;
use std::time::Duration;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use reqwest::blocking::Client;
use crate::config::{Firms as FirmsConfig, Region};
use crate::manager_firms::models::Columns;
use crate::models::NewFireRecord;
use crate::manager_firms::errors::FirmsError;

/// Struct for downloading and processing FIRMS active fire detections
pub struct Firms {
    client: Client,
    url: String,
    csv_file: String,
    pub region: Region,
}

impl Firms {
    /// Returns a Firms struct ready for downloading detections
    ///
    /// # Arguments
    ///
    /// * 'config' - FIRMS configuration
    /// * 'region' - region detections must fall within
    pub fn new(config: &FirmsConfig, region: &Region) -> Result<Firms, FirmsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Firms {
            client,
            url: config.url.clone(),
            csv_file: config.csv_file.clone(),
            region: region.clone(),
        })
    }

    /// Downloads the area CSV, keeps a copy on disk and returns its content
    ///
    pub fn download(&self) -> Result<String, FirmsError> {
        let response = self.client
            .get(&self.url)
            .send()?
            .error_for_status()?;

        let csv = response.text()?;

        fs::write(&self.csv_file, &csv)
            .map_err(|e| FirmsError::FileError(format!("error writing {}: {}", self.csv_file, e)))?;

        info!("Downloaded {} bytes of FIRMS data to {}", csv.len(), self.csv_file);

        Ok(csv)
    }

    /// Processes the last downloaded CSV from disk
    ///
    pub fn load(&self) -> Result<Vec<NewFireRecord>, FirmsError> {
        let csv = fs::read_to_string(&self.csv_file)
            .map_err(|e| FirmsError::FileError(format!("error reading {}: {}", self.csv_file, e)))?;

        process_csv(&csv, &self.region)
    }
}

/// Cleans and normalizes a FIRMS area CSV
///
/// Rows with unparsable coordinates, confidence or acquisition time are dropped, as are rows
/// outside the region. Duplicates on (latitude, longitude, acquisition time) are removed
/// keeping the first occurrence.
///
/// # Arguments
///
/// * 'csv' - CSV text with a header row
/// * 'region' - region detections must fall within
pub fn process_csv(csv: &str, region: &Region) -> Result<Vec<NewFireRecord>, FirmsError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(csv.as_bytes());

    let header = reader.headers()
        .map_err(|e| FirmsError::DocumentError(format!("error reading header: {}", e)))?;
    if header.is_empty() {
        return Err(FirmsError::EmptyDocument);
    }
    let columns = Columns::from_header(header)?;

    let mut invalid = 0usize;
    let mut outside = 0usize;
    let mut duplicates = 0usize;
    let mut seen: HashSet<(u64, u64, i64)> = HashSet::new();
    let mut records: Vec<NewFireRecord> = Vec::new();

    for row in reader.records() {
        let Some(record) = row.ok().and_then(|r| parse_row(&columns, &r)) else {
            invalid += 1;
            continue;
        };

        if !region.contains(record.latitude, record.longitude) {
            outside += 1;
            continue;
        }

        let key = (record.latitude.to_bits(), record.longitude.to_bits(), record.acq_datetime.timestamp());
        if !seen.insert(key) {
            duplicates += 1;
            continue;
        }

        records.push(record);
    }

    info!("Dropped {} rows with invalid data, {} outside region, {} duplicates", invalid, outside, duplicates);
    info!("Kept {} fire detections", records.len());

    Ok(records)
}

/// Parses one CSV row, returns None if any required field is missing or unusable
///
/// # Arguments
///
/// * 'columns' - positions of the required columns
/// * 'row' - the CSV record
fn parse_row(columns: &Columns, row: &StringRecord) -> Option<NewFireRecord> {
    let latitude = row.get(columns.latitude)?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let longitude = row.get(columns.longitude)?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let confidence_lvl = row.get(columns.confidence)?;
    let confidence = confidence_percent(confidence_lvl)?;
    let acq_datetime = parse_acq_datetime(row.get(columns.acq_date)?, row.get(columns.acq_time)?)?;

    Some(NewFireRecord {
        latitude,
        longitude,
        confidence,
        confidence_lvl: confidence_lvl.to_string(),
        satellite: row.get(columns.satellite)?.to_string(),
        acq_datetime,
        daynight: row.get(columns.daynight)?.to_string(),
        geom_wkt: format!("POINT({} {})", longitude, latitude),
    })
}

/// Maps FIRMS confidence to percent
///
/// Letter classes (L, M/N, H) map to 30, 60 and 90, numeric confidences are already percent.
///
/// # Arguments
///
/// * 'raw' - confidence field as found in the CSV
pub fn confidence_percent(raw: &str) -> Option<f64> {
    match raw {
        "L" | "l" => Some(30.0),
        "M" | "m" | "N" | "n" => Some(60.0),
        "H" | "h" => Some(90.0),
        _ => raw.parse::<f64>().ok().filter(|c| (0.0..=100.0).contains(c)),
    }
}

/// Combines acq_date (YYYY-MM-DD) and acq_time (HHMM, leading zeros may be missing) into UTC
///
/// # Arguments
///
/// * 'date' - acquisition date
/// * 'time' - acquisition time, e.g. 813 for 08:13
pub fn parse_acq_datetime(date: &str, time: &str) -> Option<DateTime<Utc>> {
    if time.is_empty() || !time.is_ascii() || time.len() > 4 {
        return None;
    }
    let time = format!("{:0>4}", time);
    let combined = format!("{} {}:{}", date, &time[0..2], &time[2..4]);

    NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M")
        .ok()
        .map(|dt| dt.and_utc())
}
