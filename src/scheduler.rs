use std::thread;
use chrono::{DateTime, Days, TimeZone, Utc};
use log::{error, info};
use crate::initialization::Mgr;
use crate::worker::run;

/// Returns the next time at minute 0 of one of the given UTC hours, strictly after now
///
/// # Arguments
///
/// * 'now' - the current time
/// * 'hours' - hours of day (0-23) to run at
pub fn next_run(now: DateTime<Utc>, hours: &[u32]) -> Option<DateTime<Utc>> {
    let today = now.date_naive();

    [Some(today), today.checked_add_days(Days::new(1))]
        .into_iter()
        .flatten()
        .flat_map(|date| hours.iter().filter_map(move |h| date.and_hms_opt(*h, 0, 0)))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .filter(|slot| *slot > now)
        .min()
}

/// Runs the pipeline at each scheduled hour until the process ends
///
/// A failed run is logged and the next slot is waited for.
///
/// # Arguments
///
/// * 'mgr' - struct with configured managers
/// * 'hours' - hours of day (UTC) to run at
pub fn run_forever(mgr: &Mgr, hours: &[u32]) {
    info!("Scheduler started, running at hours {:?} UTC", hours);

    loop {
        let now = Utc::now();
        let Some(next) = next_run(now, hours) else {
            error!("No valid run hours in {:?}, scheduler stopped", hours);
            return;
        };

        info!("Next pipeline run at {}", next);
        if let Ok(wait) = (next - now).to_std() {
            thread::sleep(wait);
        }

        match run(mgr, next) {
            Ok(report) => info!("Pipeline run succeeded: {}", report),
            Err(e) => error!("Pipeline run failed: {}", e),
        }
    }
}
