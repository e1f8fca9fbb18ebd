use std::collections::{BTreeMap, HashMap};
use serde::Deserialize;

/// The part of a NASA POWER point response that carries values
///
/// Values are keyed by parameter name and then by timestamp, `YYYYMMDDHH` for hourly data
/// and `YYYYMMDD` for daily data.
#[derive(Deserialize, Default, Debug)]
pub struct PowerResponse {
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Deserialize, Default, Debug)]
pub struct Properties {
    #[serde(default)]
    pub parameter: HashMap<String, BTreeMap<String, Option<f64>>>,
}
