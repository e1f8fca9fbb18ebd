use std::fmt;
use chrono::{DateTime, Utc};
use log::{error, info};
use thiserror::Error;
use crate::initialization::Mgr;
use crate::manager_firms::process_csv;
use crate::manager_power::errors::PowerError;
use crate::models::{FireDetection, NewFireRecord, NewObservation};
use crate::store::FireStore;
use crate::retry;

/// Outcome of one pipeline run
#[derive(Debug, Default, PartialEq)]
pub struct RunReport {
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub observations: usize,
    pub failed_enrichments: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "processed: {}, inserted: {}, updated: {}, observations: {}, failed enrichments: {}",
               self.processed, self.inserted, self.updated, self.observations, self.failed_enrichments)
    }
}

/// Runs the FIRMS pipeline: download, process, store, enrich with weather and snapshot
///
/// # Arguments
///
/// * 'mgr' - struct with configured managers
/// * 'run_start' - time the run started, names the snapshot
pub fn run(mgr: &Mgr, run_start: DateTime<Utc>) -> Result<RunReport, WorkerError> {
    info!("Running FIRMS pipeline job");

    let csv = retry!(||mgr.firms.download())
        .map_err(|e| WorkerError::DownloadError(format!("error downloading FIRMS data: {}", e)))?;

    let rows = process_csv(&csv, &mgr.firms.region)
        .map_err(|e| WorkerError::ProcessError(format!("error processing FIRMS data: {}", e)))?;

    let report = ingest(&mgr.store, rows, |fire| {
        retry!(||mgr.power.observations(fire.latitude, fire.longitude, fire.acq_datetime))
    })?;

    if let Some(path) = mgr.store.snapshot(run_start)
        .map_err(|e| WorkerError::SnapshotError(format!("error saving snapshot: {}", e)))? {
        info!("Saved snapshot {}", path.display());
    }

    info!("Pipeline done, {}", report);

    Ok(report)
}

/// Stores processed rows and enriches each stored fire with weather observations
///
/// A detection already in the store is updated instead of inserted again. A failing
/// enrichment is logged and the fire is kept without new observations.
///
/// # Arguments
///
/// * 'store' - the fire store
/// * 'rows' - processed FIRMS rows
/// * 'enrich' - fetches weather observations for a stored fire
pub fn ingest<F>(store: &FireStore, rows: Vec<NewFireRecord>, enrich: F) -> Result<RunReport, WorkerError>
where
    F: Fn(&FireDetection) -> Result<Vec<NewObservation>, PowerError>,
{
    let mut report = RunReport { processed: rows.len(), ..Default::default() };

    for row in rows {
        let existing = store.find_fire(&row);
        let fire = store.save_fire_record(existing, row)
            .map_err(|e| WorkerError::StoreError(format!("error saving fire record: {}", e)))?;

        if existing.is_some() {
            report.updated += 1;
        } else {
            report.inserted += 1;
        }

        match enrich(&fire) {
            Ok(observations) => {
                report.observations += store.ingest_weather_data(fire.id, observations)
                    .map_err(|e| WorkerError::StoreError(format!("error saving weather data: {}", e)))?;
            },
            Err(e) => {
                error!("Failed weather fetch for fire {}: {}", fire.id, e);
                report.failed_enrichments += 1;
            },
        }
    }

    Ok(report)
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("error while downloading: {0:?}")]
    DownloadError(String),
    #[error("error while processing: {0:?}")]
    ProcessError(String),
    #[error("error while storing: {0:?}")]
    StoreError(String),
    #[error("error while saving snapshot: {0:?}")]
    SnapshotError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::models::POWER_SOURCE;

    fn row(lat: f64, lon: f64) -> NewFireRecord {
        NewFireRecord {
            latitude: lat,
            longitude: lon,
            confidence: 60.0,
            confidence_lvl: "n".to_string(),
            satellite: "N".to_string(),
            acq_datetime: Utc.with_ymd_and_hms(2025, 10, 4, 8, 0, 0).unwrap(),
            daynight: "D".to_string(),
            geom_wkt: format!("POINT({} {})", lon, lat),
        }
    }

    fn temperature(fire: &FireDetection) -> Vec<NewObservation> {
        vec![NewObservation {
            obs_time: fire.acq_datetime,
            parameter: "T2M".to_string(),
            value: Some(12.0),
            units: Some("degC".to_string()),
            source: POWER_SOURCE.to_string(),
        }]
    }

    #[test]
    fn stores_and_enriches_rows() {
        let store = FireStore::in_memory();
        let report = ingest(&store, vec![row(45.0, -75.0), row(46.0, -76.0)], |f| Ok(temperature(f))).unwrap();

        assert_eq!(report, RunReport { processed: 2, inserted: 2, updated: 0, observations: 2, failed_enrichments: 0 });
        assert_eq!(store.retrieve_weather_data(None).len(), 2);
    }

    #[test]
    fn failed_enrichment_keeps_fire() {
        let store = FireStore::in_memory();
        let report = ingest(&store, vec![row(45.0, -75.0), row(46.0, -76.0)], |f| {
            if f.latitude == 45.0 {
                Err(PowerError::StatusError(500))
            } else {
                Ok(temperature(f))
            }
        }).unwrap();

        assert_eq!(report.failed_enrichments, 1);
        assert_eq!(report.observations, 1);
        assert_eq!(store.len(), 2);
        assert!(store.retrieve_weather_data(Some(1)).is_empty());
    }

    #[test]
    fn repeated_detections_are_updated() {
        let store = FireStore::in_memory();
        ingest(&store, vec![row(45.0, -75.0)], |f| Ok(temperature(f))).unwrap();
        let report = ingest(&store, vec![row(45.0, -75.0)], |f| Ok(temperature(f))).unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.retrieve_weather_data(Some(1)).len(), 1);
    }
}
