use std::collections::HashSet;
use crate::air_quality::models::Alert;

/// Alert banner with per alert dismissal
///
/// Dismissals are remembered by alert id, so an alert stays hidden when the banner is
/// given a new set of alerts that still contains it.
#[derive(Debug, Default)]
pub struct NotificationBanner {
    alerts: Vec<Alert>,
    dismissed: HashSet<String>,
}

impl NotificationBanner {
    pub fn new(alerts: Vec<Alert>) -> NotificationBanner {
        NotificationBanner { alerts, dismissed: HashSet::new() }
    }

    /// Replaces the alerts shown, keeping earlier dismissals
    ///
    /// # Arguments
    ///
    /// * 'alerts' - alerts to show
    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
    }

    pub fn visible(&self) -> Vec<&Alert> {
        self.alerts.iter()
            .filter(|a| !self.dismissed.contains(&a.id))
            .collect()
    }

    pub fn dismiss(&mut self, alert_id: &str) {
        self.dismissed.insert(alert_id.to_string());
    }

    pub fn dismiss_all(&mut self) {
        self.dismissed.extend(self.alerts.iter().map(|a| a.id.clone()));
    }
}
