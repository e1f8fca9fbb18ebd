use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use glob::glob;
use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::{FireDetection, NewFireRecord, NewObservation, WeatherObservation};

const SNAPSHOT_SUFFIX: &str = "_fires.json";

#[derive(Serialize, Deserialize, Default)]
struct StoreData {
    next_fire_id: u64,
    next_obs_id: u64,
    fires: BTreeMap<u64, FireDetection>,
}

/// Fire detections and their weather observations
///
/// Records live in memory behind a read/write lock and are persisted as timestamped JSON
/// snapshots in the data directory, the latest snapshot is loaded on open.
pub struct FireStore {
    data: RwLock<StoreData>,
    data_dir: Option<PathBuf>,
    keep_hours: i64,
}

impl FireStore {
    /// Returns an empty store that is never persisted
    ///
    pub fn in_memory() -> FireStore {
        FireStore { data: RwLock::new(StoreData::default()), data_dir: None, keep_hours: 0 }
    }

    /// Opens a store persisted in the given directory, loading the most recent snapshot if any
    ///
    /// # Arguments
    ///
    /// * 'data_dir' - directory for snapshots
    /// * 'keep_hours' - snapshots older than this are removed when a new one is written
    pub fn open(data_dir: &str, keep_hours: i64) -> Result<FireStore, StoreError> {
        fs::create_dir_all(data_dir)
            .map_err(|e| StoreError::FileError(format!("error creating {}: {}", data_dir, e)))?;

        let dir = Path::new(data_dir);
        let pattern = snapshot_pattern(dir);
        let latest = glob(&pattern)
            .map_err(|e| StoreError::FileError(format!("error reading files with pattern {}: {}", pattern, e)))?
            .flatten()
            .max();

        let data = match latest {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .map_err(|e| StoreError::FileError(format!("error reading {}: {}", path.display(), e)))?;
                let data: StoreData = serde_json::from_str(&json)?;
                info!("Loaded {} fire records from {}", data.fires.len(), path.display());
                data
            },
            None => StoreData::default(),
        };

        Ok(FireStore { data: RwLock::new(data), data_dir: Some(dir.to_path_buf()), keep_hours })
    }

    /// Inserts a new fire record, or updates the record with the given id
    ///
    /// Updating keeps the record's weather observations and creation time.
    ///
    /// # Arguments
    ///
    /// * 'id' - id of the record to update, None to insert
    /// * 'record' - the fire record
    pub fn save_fire_record(&self, id: Option<u64>, record: NewFireRecord) -> Result<FireDetection, StoreError> {
        let now = Utc::now();
        let mut data = self.data.write();

        let (id, weather, created_at) = match id {
            Some(id) => {
                let existing = data.fires.get_mut(&id).ok_or(StoreError::NotFound(id))?;
                (id, std::mem::take(&mut existing.weather), existing.created_at)
            },
            None => {
                data.next_fire_id += 1;
                (data.next_fire_id, Vec::new(), now)
            },
        };

        let fire = FireDetection {
            id,
            latitude: record.latitude,
            longitude: record.longitude,
            confidence: record.confidence,
            confidence_lvl: record.confidence_lvl,
            satellite: record.satellite,
            acq_datetime: record.acq_datetime,
            daynight: record.daynight,
            geom_wkt: record.geom_wkt,
            weather,
            created_at,
            updated_at: now,
        };
        data.fires.insert(id, fire.clone());

        Ok(fire)
    }

    /// Returns the id of a stored record at the same position and acquisition time
    ///
    /// # Arguments
    ///
    /// * 'record' - record to look for
    pub fn find_fire(&self, record: &NewFireRecord) -> Option<u64> {
        self.data.read().fires.values()
            .find(|f| f.latitude == record.latitude && f.longitude == record.longitude && f.acq_datetime == record.acq_datetime)
            .map(|f| f.id)
    }

    /// Returns fire records newest first, with their weather nested
    ///
    /// # Arguments
    ///
    /// * 'filter' - optional confidence level to match, case-insensitive, empty means no filter
    pub fn get_fire_records(&self, filter: Option<&str>) -> Vec<FireDetection> {
        let filter = filter.map(|f| f.trim()).filter(|f| !f.is_empty());

        let mut fires: Vec<FireDetection> = self.data.read().fires.values()
            .filter(|f| filter.is_none_or(|lvl| f.confidence_lvl.eq_ignore_ascii_case(lvl)))
            .cloned()
            .collect();

        fires.sort_by(|a, b| b.acq_datetime.cmp(&a.acq_datetime).then(a.id.cmp(&b.id)));
        fires
    }

    /// Stores weather observations against a fire, replacing any earlier value for the same
    /// parameter and time. Returns the number of observations stored.
    ///
    /// # Arguments
    ///
    /// * 'fire_id' - fire the observations belong to
    /// * 'observations' - observations to store
    pub fn ingest_weather_data(&self, fire_id: u64, observations: Vec<NewObservation>) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut data = self.data.write();
        let mut next_obs_id = data.next_obs_id;

        let fire = data.fires.get_mut(&fire_id).ok_or(StoreError::NotFound(fire_id))?;
        let count = observations.len();

        for obs in observations {
            match fire.weather.iter_mut().find(|w| w.obs_time == obs.obs_time && w.parameter == obs.parameter) {
                Some(existing) => {
                    existing.value = obs.value;
                    existing.units = obs.units;
                    existing.source = obs.source;
                    existing.updated_at = now;
                },
                None => {
                    next_obs_id += 1;
                    fire.weather.push(WeatherObservation {
                        id: next_obs_id,
                        fire_id,
                        obs_time: obs.obs_time,
                        parameter: obs.parameter,
                        value: obs.value,
                        units: obs.units,
                        source: obs.source,
                        created_at: now,
                        updated_at: now,
                    });
                },
            }
        }
        fire.weather.sort_by(|a, b| a.obs_time.cmp(&b.obs_time).then_with(|| a.parameter.cmp(&b.parameter)));
        data.next_obs_id = next_obs_id;

        Ok(count)
    }

    /// Returns weather observations of one fire, or of all fires
    ///
    /// # Arguments
    ///
    /// * 'fire_id' - fire to get observations for, None for all
    pub fn retrieve_weather_data(&self, fire_id: Option<u64>) -> Vec<WeatherObservation> {
        let data = self.data.read();

        match fire_id {
            Some(id) => data.fires.get(&id).map(|f| f.weather.clone()).unwrap_or_default(),
            None => data.fires.values().flat_map(|f| f.weather.iter().cloned()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().fires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes a snapshot named after the given time and removes outdated snapshots.
    /// Returns the snapshot path, or None for an in memory store.
    ///
    /// # Arguments
    ///
    /// * 'now' - time the snapshot is named after
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<Option<PathBuf>, StoreError> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(None);
        };

        let path = data_dir.join(format!("{}{}", now.format("%Y%m%d%H%M"), SNAPSHOT_SUFFIX));
        let json = serde_json::to_string(&*self.data.read())?;
        fs::write(&path, json)
            .map_err(|e| StoreError::FileError(format!("error writing {}: {}", path.display(), e)))?;

        clean_up_snapshots(&snapshot_pattern(data_dir), now, self.keep_hours)?;

        Ok(Some(path))
    }
}

/// Glob pattern matching every snapshot in a directory
fn snapshot_pattern(dir: &Path) -> String {
    dir.join(format!("*{}", SNAPSHOT_SUFFIX)).display().to_string()
}

/// Removes snapshots that are older than keep_hours counted from the gate time
///
/// # Arguments
///
/// * 'pattern' - file pattern
/// * 'gate_date_time' - time of the newest snapshot
/// * 'keep_hours' - hours to keep snapshots
fn clean_up_snapshots(pattern: &str, gate_date_time: DateTime<Utc>, keep_hours: i64) -> Result<(), StoreError> {
    let entries = glob(pattern)
        .map_err(|e| StoreError::CleanUpError(format!("error reading files with pattern {}: {}", pattern, e)))?;

    for path in entries.flatten() {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(datetime) = filename.get(0..12)
            .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M").ok())
            .map(|dt| dt.and_utc()) else {
            warn!("Skipping clean up of unexpected file {}", filename);
            continue;
        };

        if gate_date_time - datetime > TimeDelta::hours(keep_hours) {
            fs::remove_file(&path)
                .map_err(|e| StoreError::CleanUpError(format!("error removing file: {}", e)))?;
            info!("Removed outdated snapshot {}", filename);
        }
    }

    Ok(())
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("FileError: {0}")]
    FileError(String),
    #[error("DocumentError: {0}")]
    DocumentError(#[from] serde_json::Error),
    #[error("NotFound: no fire record with id {0}")]
    NotFound(u64),
    #[error("CleanUpError: {0}")]
    CleanUpError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::models::POWER_SOURCE;

    fn record(lat: f64, lon: f64, lvl: &str, hour: u32) -> NewFireRecord {
        NewFireRecord {
            latitude: lat,
            longitude: lon,
            confidence: 90.0,
            confidence_lvl: lvl.to_string(),
            satellite: "N".to_string(),
            acq_datetime: Utc.with_ymd_and_hms(2025, 10, 4, hour, 0, 0).unwrap(),
            daynight: "D".to_string(),
            geom_wkt: format!("POINT({} {})", lon, lat),
        }
    }

    fn observation(hour: u32, parameter: &str, value: f64) -> NewObservation {
        NewObservation {
            obs_time: Utc.with_ymd_and_hms(2025, 10, 4, hour, 0, 0).unwrap(),
            parameter: parameter.to_string(),
            value: Some(value),
            units: None,
            source: POWER_SOURCE.to_string(),
        }
    }

    #[test]
    fn insert_and_update() {
        let store = FireStore::in_memory();
        let first = store.save_fire_record(None, record(45.0, -75.0, "h", 8)).unwrap();
        let second = store.save_fire_record(None, record(46.0, -76.0, "l", 9)).unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        store.ingest_weather_data(1, vec![observation(8, "T2M", 10.0)]).unwrap();
        let mut changed = record(45.0, -75.0, "h", 8);
        changed.confidence = 60.0;
        let updated = store.save_fire_record(Some(1), changed).unwrap();

        assert_eq!(updated.confidence, 60.0);
        assert_eq!(updated.weather.len(), 1);
        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(store.len(), 2);
        assert!(matches!(store.save_fire_record(Some(9), record(1.0, 1.0, "h", 1)), Err(StoreError::NotFound(9))));
    }

    #[test]
    fn filter_is_case_insensitive_and_newest_first() {
        let store = FireStore::in_memory();
        store.save_fire_record(None, record(45.0, -75.0, "h", 8)).unwrap();
        store.save_fire_record(None, record(46.0, -76.0, "l", 9)).unwrap();
        store.save_fire_record(None, record(47.0, -77.0, "H", 10)).unwrap();

        let all = store.get_fire_records(None);
        assert_eq!(all.iter().map(|f| f.id).collect::<Vec<u64>>(), vec![3, 2, 1]);

        let high = store.get_fire_records(Some("h"));
        assert_eq!(high.iter().map(|f| f.id).collect::<Vec<u64>>(), vec![3, 1]);

        assert_eq!(store.get_fire_records(Some("")).len(), 3);
        assert!(store.get_fire_records(Some("medium")).is_empty());
    }

    #[test]
    fn weather_is_nested_and_replaced() {
        let store = FireStore::in_memory();
        store.save_fire_record(None, record(45.0, -75.0, "h", 8)).unwrap();
        store.save_fire_record(None, record(46.0, -76.0, "l", 9)).unwrap();

        store.ingest_weather_data(1, vec![observation(8, "T2M", 10.0), observation(8, "WS2M", 2.0)]).unwrap();
        store.ingest_weather_data(2, vec![observation(9, "T2M", 12.0)]).unwrap();
        store.ingest_weather_data(1, vec![observation(8, "T2M", 11.0)]).unwrap();

        let weather = store.retrieve_weather_data(Some(1));
        assert_eq!(weather.len(), 2);
        assert_eq!(weather[0].value, Some(11.0));
        assert_eq!(weather[0].fire_id, 1);
        assert_eq!(store.retrieve_weather_data(None).len(), 3);
        assert!(store.retrieve_weather_data(Some(42)).is_empty());
        assert!(matches!(store.ingest_weather_data(42, vec![]), Err(StoreError::NotFound(42))));

        let fires = store.get_fire_records(None);
        assert_eq!(fires[1].weather.len(), 2);
    }

    #[test]
    fn finds_existing_detection() {
        let store = FireStore::in_memory();
        store.save_fire_record(None, record(45.0, -75.0, "h", 8)).unwrap();

        assert_eq!(store.find_fire(&record(45.0, -75.0, "l", 8)), Some(1));
        assert_eq!(store.find_fire(&record(45.0, -75.0, "h", 9)), None);
    }

    #[test]
    fn snapshots_are_reloaded_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = format!("{}/", dir.path().display());

        let store = FireStore::open(&data_dir, 48).unwrap();
        assert!(store.is_empty());
        store.save_fire_record(None, record(45.0, -75.0, "h", 8)).unwrap();
        store.ingest_weather_data(1, vec![observation(8, "T2M", 10.0)]).unwrap();

        let old = Utc.with_ymd_and_hms(2025, 10, 1, 4, 0, 0).unwrap();
        let old_path = store.snapshot(old).unwrap().unwrap();
        assert!(old_path.exists());

        let now = Utc.with_ymd_and_hms(2025, 10, 4, 4, 0, 0).unwrap();
        let path = store.snapshot(now).unwrap().unwrap();
        assert!(path.ends_with("202510040400_fires.json"));
        assert!(!old_path.exists());

        let reopened = FireStore::open(&data_dir, 48).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.retrieve_weather_data(Some(1)).len(), 1);
        let next = reopened.save_fire_record(None, record(46.0, -76.0, "l", 9)).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn data_dir_without_trailing_separator() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let data_dir = data_dir.to_str().unwrap();

        let store = FireStore::open(data_dir, 48).unwrap();
        store.save_fire_record(None, record(45.0, -75.0, "h", 8)).unwrap();
        let path = store.snapshot(Utc.with_ymd_and_hms(2025, 10, 4, 4, 0, 0).unwrap()).unwrap().unwrap();

        assert_eq!(path, dir.path().join("data").join("202510040400_fires.json"));
        assert!(path.exists());
        assert_eq!(FireStore::open(data_dir, 48).unwrap().len(), 1);
    }

    #[test]
    fn in_memory_store_has_no_snapshots() {
        assert_eq!(FireStore::in_memory().snapshot(Utc::now()).unwrap(), None);
    }
}
