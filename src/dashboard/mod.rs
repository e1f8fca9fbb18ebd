pub mod fire_page;
pub mod notifications;

use serde::Serialize;
use crate::air_quality::{generate_globe_points, AqiLevel};
use crate::air_quality::models::{AirQualityData, Alert, GlobePoint};
use crate::dashboard::notifications::NotificationBanner;
use crate::errors::DashboardError;

/// Headroom added above the highest AQI on the chart's y axis
const Y_AXIS_HEADROOM: u32 = 20;

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SidebarTab {
    #[default]
    Locations,
    Alerts,
    Insights,
}

/// One point of the forecast chart
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartPoint {
    /// Forecast hour as HH:MM (UTC)
    pub time: String,
    pub aqi: u32,
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub color: &'static str,
}

/// An alert together with the name of the location it was raised for
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LocatedAlert {
    #[serde(flatten)]
    pub alert: Alert,
    pub location: String,
}

/// View state of the air quality dashboard
pub struct Dashboard {
    locations: Vec<AirQualityData>,
    selected: usize,
    search_query: String,
    sidebar_open: bool,
    active_tab: SidebarTab,
    banner: NotificationBanner,
}

impl Dashboard {
    /// Returns a dashboard with the first location selected and the sidebar open
    ///
    /// # Arguments
    ///
    /// * 'locations' - air quality data per location, must not be empty
    pub fn new(locations: Vec<AirQualityData>) -> Result<Dashboard, DashboardError> {
        let first = locations.first().ok_or(DashboardError::NoLocations)?;
        let banner = NotificationBanner::new(first.alerts.clone());

        Ok(Dashboard {
            locations,
            selected: 0,
            search_query: String::new(),
            sidebar_open: true,
            active_tab: SidebarTab::default(),
            banner,
        })
    }

    pub fn locations(&self) -> &[AirQualityData] {
        &self.locations
    }

    pub fn selected(&self) -> &AirQualityData {
        &self.locations[self.selected]
    }

    /// Selects a location by id, an unknown id leaves the selection as it was
    ///
    /// # Arguments
    ///
    /// * 'id' - id of the location record
    pub fn select_location(&mut self, id: &str) -> Result<&AirQualityData, DashboardError> {
        let index = self.locations.iter()
            .position(|l| l.id == id)
            .ok_or_else(|| DashboardError::UnknownLocation(id.to_string()))?;

        self.selected = index;
        self.banner.set_alerts(self.locations[index].alerts.clone());

        Ok(&self.locations[index])
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    /// Locations whose name or country contains the search query, ignoring case
    ///
    pub fn filtered_locations(&self) -> Vec<&AirQualityData> {
        let query = self.search_query.to_lowercase();

        self.locations.iter()
            .filter(|l| l.location.name.to_lowercase().contains(&query) || l.location.country.to_lowercase().contains(&query))
            .collect()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn active_tab(&self) -> SidebarTab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: SidebarTab) {
        self.active_tab = tab;
    }

    /// Forecast of the selected location as chart points
    ///
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.selected().forecast.iter()
            .map(|f| ChartPoint {
                time: f.hour.format("%H:%M").to_string(),
                aqi: f.aqi,
                pm25: f.pm25,
                pm10: f.pm10,
                no2: f.no2,
                o3: f.o3,
                temperature: f.temperature,
                humidity: f.humidity,
                wind_speed: f.wind_speed,
                color: AqiLevel::from_aqi(f.aqi).info().color,
            })
            .collect()
    }

    pub fn y_axis_max(&self) -> u32 {
        self.selected().forecast.iter().map(|f| f.aqi).max().unwrap_or(0) + Y_AXIS_HEADROOM
    }

    /// Every alert of every location, tagged with the location name
    ///
    pub fn all_alerts(&self) -> Vec<LocatedAlert> {
        self.locations.iter()
            .flat_map(|l| l.alerts.iter().map(|a| LocatedAlert { alert: a.clone(), location: l.location.name.clone() }))
            .collect()
    }

    pub fn globe_points(&self) -> Vec<GlobePoint> {
        generate_globe_points(&self.locations)
    }

    /// Banner with the alerts of the selected location
    pub fn banner(&self) -> &NotificationBanner {
        &self.banner
    }

    pub fn banner_mut(&mut self) -> &mut NotificationBanner {
        &mut self.banner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air_quality::mock_air_quality;

    fn dashboard() -> Dashboard {
        Dashboard::new(mock_air_quality().unwrap()).unwrap()
    }

    #[test]
    fn starts_on_first_location() {
        let dashboard = dashboard();

        assert_eq!(dashboard.selected().location.name, "Toronto");
        assert!(dashboard.sidebar_open());
        assert_eq!(dashboard.active_tab(), SidebarTab::Locations);
        assert_eq!(dashboard.banner().visible().len(), 1);
    }

    #[test]
    fn no_locations_is_an_error() {
        assert!(matches!(Dashboard::new(Vec::new()), Err(DashboardError::NoLocations)));
    }

    #[test]
    fn selecting_a_location_changes_the_series() {
        let mut dashboard = dashboard();
        assert_eq!(dashboard.chart_series()[0].aqi, 85);

        dashboard.select_location("beijing-001").unwrap();
        let series = dashboard.chart_series();
        assert_eq!(series.len(), 9);
        assert_eq!(series[0].aqi, 156);
        assert_eq!(series[0].color, "#ff0000");
        assert_eq!(dashboard.y_axis_max(), 202);
        assert_eq!(dashboard.banner().visible()[0].id, "alert-003");
    }

    #[test]
    fn unknown_location_keeps_selection() {
        let mut dashboard = dashboard();
        dashboard.select_location("tokyo-001").unwrap();

        assert_eq!(dashboard.select_location("paris-001").unwrap_err(), DashboardError::UnknownLocation("paris-001".to_string()));
        assert_eq!(dashboard.selected().location.name, "Tokyo");
    }

    #[test]
    fn chart_times_are_hours_and_minutes() {
        let series = dashboard().chart_series();

        assert_eq!(series[0].time, "12:00");
        assert_eq!(series[8].time, "20:00");
        assert_eq!(series[3].color, "#ff8800");
    }

    #[test]
    fn search_matches_name_or_country_ignoring_case() {
        let mut dashboard = dashboard();

        dashboard.set_search_query("united");
        let names: Vec<&str> = dashboard.filtered_locations().iter().map(|l| l.location.name.as_str()).collect();
        assert_eq!(names, vec!["London", "New York"]);

        dashboard.set_search_query("TOKYO");
        assert_eq!(dashboard.filtered_locations().len(), 1);

        dashboard.set_search_query("");
        assert_eq!(dashboard.filtered_locations().len(), 5);

        dashboard.set_search_query("atlantis");
        assert!(dashboard.filtered_locations().is_empty());
    }

    #[test]
    fn alerts_are_tagged_with_location() {
        let alerts = dashboard().all_alerts();

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].location, "Toronto");
        assert_eq!(alerts[2].location, "Beijing");
        assert_eq!(alerts[2].alert.severity, 5);
    }

    #[test]
    fn sidebar_and_tabs() {
        let mut dashboard = dashboard();
        dashboard.toggle_sidebar();
        dashboard.set_tab(SidebarTab::Alerts);

        assert!(!dashboard.sidebar_open());
        assert_eq!(dashboard.active_tab(), SidebarTab::Alerts);
        assert_eq!(dashboard.globe_points().len(), 5);
    }
}
