use log::info;
use crate::errors::DashboardError;
use crate::fire::{air_quality_impact, fire_points, AirQualityImpact, FirePoint};
use crate::manager_nasa_api::NasaApi;
use crate::models::{FireDetection, WeatherObservation};

const RECENT_FIRES: usize = 5;
const POWER_PREVIEW: usize = 3;

/// View state of the fire detection page
pub struct FirePage {
    fires: Vec<FireDetection>,
    power: Vec<WeatherObservation>,
    selected: Option<u64>,
}

impl FirePage {
    /// Loads fire detections and power data side by side
    ///
    /// # Arguments
    ///
    /// * 'api' - network server client
    pub fn load(api: &NasaApi) -> FirePage {
        let (fires, power) = rayon::join(
            || api.get_fire_detections(None),
            || api.get_power_data(None));

        info!("Fire page loaded {} detections and {} power rows", fires.len(), power.len());

        FirePage::new(fires, power)
    }

    pub fn new(fires: Vec<FireDetection>, power: Vec<WeatherObservation>) -> FirePage {
        FirePage { fires, power, selected: None }
    }

    pub fn fire_count(&self) -> usize {
        self.fires.len()
    }

    pub fn fires(&self) -> &[FireDetection] {
        &self.fires
    }

    pub fn recent_fires(&self) -> &[FireDetection] {
        &self.fires[..self.fires.len().min(RECENT_FIRES)]
    }

    pub fn power_preview(&self) -> &[WeatherObservation] {
        &self.power[..self.power.len().min(POWER_PREVIEW)]
    }

    /// Selects a fire by id, an unknown id leaves the selection as it was
    ///
    /// # Arguments
    ///
    /// * 'id' - id of the fire detection
    pub fn select_fire(&mut self, id: u64) -> Result<&FireDetection, DashboardError> {
        let fire = self.fires.iter()
            .find(|f| f.id == id)
            .ok_or(DashboardError::UnknownFire(id))?;

        self.selected = Some(id);

        Ok(fire)
    }

    pub fn selected_fire(&self) -> Option<&FireDetection> {
        self.selected.and_then(|id| self.fires.iter().find(|f| f.id == id))
    }

    pub fn impact(&self) -> AirQualityImpact {
        air_quality_impact(&self.fires)
    }

    pub fn fire_points(&self) -> Vec<FirePoint> {
        fire_points(&self.fires)
    }
}
