use std::sync::Arc;
use std::thread;
use rayon::ThreadPoolBuilder;
use anyhow::Result;
use log::{error, info};
use aepg_network::air_quality::{aqi_label, mock_air_quality};
use aepg_network::api::{serve, AppState};
use aepg_network::dashboard::Dashboard;
use aepg_network::dashboard::fire_page::FirePage;
use aepg_network::errors::ServiceError;
use aepg_network::initialization::{init, Mgr};
use aepg_network::render::RenderSession;
use aepg_network::render::bars::BarChartScene;
use aepg_network::render::globe::{GlobeConfig, GlobeScene, Marker};
use aepg_network::scheduler::run_forever;

/// Frames the headless dashboard renders, two seconds at 60 fps
const DASHBOARD_FRAMES: u32 = 120;
const VIEWPORT: (u32, u32) = (800, 600);

fn main() -> Result<()> {
    ThreadPoolBuilder::new().num_threads(2).build_global()?;

    // Load config and set up all managers. If initialization fails, we are pretty much out of luck
    // and can't even log.
    let (config, mgr, args) = match init() {
        Ok((c, m, a)) => (c, m, a),
        Err(e) => {
            return Err(ServiceError(format!("Initialization failed: {}", e)))?;
        }
    };

    if args.dashboard {
        return run_dashboard(&mgr);
    }

    let app_state = AppState { store: mgr.store.clone() };
    let mgr = Arc::new(mgr);
    let run_hours = config.schedule.run_hours.clone();

    // The pipeline does blocking I/O and sleeps between runs, so it gets its own thread
    thread::Builder::new()
        .name("scheduler".to_string())
        .spawn(move || run_forever(&mgr, &run_hours))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    if let Err(e) = runtime.block_on(serve(app_state, &config.server.bind, config.server.port)) {
        error!("Server stopped: {}", e);
        return Err(e)?;
    }

    Ok(())
}

/// Loads the dashboards through the API client and renders their scenes headless for a few frames
///
/// # Arguments
///
/// * 'mgr' - struct with configured managers
fn run_dashboard(mgr: &Mgr) -> Result<()> {
    let mut dashboard = Dashboard::new(mock_air_quality()?)?;
    let selected = dashboard.selected();
    info!("Air quality: {} locations, {} in {} at AQI {} ({})",
        dashboard.locations().len(), selected.location.name, selected.location.country,
        selected.current.aqi, aqi_label(selected.current.aqi));
    info!("Alerts: {} in total, {} on the banner", dashboard.all_alerts().len(), dashboard.banner().visible().len());

    let mut page = FirePage::load(&mgr.api);
    let impact = page.impact();
    info!("Fires: {} detections, {} high confidence, risk {}, AQI +{}",
        page.fire_count(), impact.high_confidence_fires, impact.risk_level, impact.aqi_impact);

    // fire globe, a click in the middle selects the fire facing the camera
    let mut scene = GlobeScene::new(GlobeConfig::fire(), rand::random());
    scene.set_markers(page.fire_points().iter().map(Marker::from).collect());
    let mut globe = RenderSession::start(scene, VIEWPORT.0, VIEWPORT.1)?;
    for frame in 0..DASHBOARD_FRAMES {
        globe.tick(frame as f64 / 60.0)?;
    }

    let hit = globe.click(VIEWPORT.0 as f64 / 2.0, VIEWPORT.1 as f64 / 2.0)?;
    let fire_id = hit.and_then(|i| globe.visualization().ok()?.markers().get(i)?.fire_id);
    match fire_id {
        Some(id) => {
            let fire = page.select_fire(id)?;
            info!("Picked fire {} at {:.2}, {:.2}", fire.id, fire.latitude, fire.longitude);
        },
        None => info!("No fire under the center of the globe"),
    }
    globe.dispose()?;

    // air quality bars for the location picked in the sidebar
    if let Some(id) = dashboard.filtered_locations().first().map(|l| l.id.clone()) {
        dashboard.select_location(&id)?;
    }
    let mut bars = RenderSession::start(BarChartScene::new(dashboard.locations()), VIEWPORT.0, VIEWPORT.1)?;
    for frame in 0..DASHBOARD_FRAMES {
        bars.tick(frame as f64 / 60.0)?;
    }
    info!("Rendered {} bar chart frames, chart peaks at {}", bars.frames(), dashboard.y_axis_max());
    bars.dispose()?;

    Ok(())
}
