use std::sync::Arc;
use axum::{extract::{Query, State}, routing::get, Json, Router};
use log::{debug, info};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use crate::errors::ServiceError;
use crate::models::{FireDetection, WeatherObservation};
use crate::store::FireStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FireStore>,
}

#[derive(Debug, Deserialize)]
pub struct FireQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PowerQuery {
    pub fire: Option<u64>,
}

/// Builds the router for the fire and power endpoints, open to any origin
///
/// # Arguments
///
/// * 'app_state' - state shared with the handlers
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/detect/fire", get(fetch_fire_detected))
        .route("/api/detect/power", get(fetch_power_data))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}

// GET /api/detect/fire?filter=
pub async fn fetch_fire_detected(State(app): State<AppState>, Query(query): Query<FireQuery>) -> Json<Vec<FireDetection>> {
    let fires = app.store.get_fire_records(query.filter.as_deref());
    debug!("Serving {} fire records (filter: {:?})", fires.len(), query.filter);
    Json(fires)
}

// GET /api/detect/power?fire=
pub async fn fetch_power_data(State(app): State<AppState>, Query(query): Query<PowerQuery>) -> Json<Vec<WeatherObservation>> {
    let weather = app.store.retrieve_weather_data(query.fire);
    debug!("Serving {} weather observations (fire: {:?})", weather.len(), query.fire);
    Json(weather)
}

/// Binds the listener and serves the API until the process ends
///
/// # Arguments
///
/// * 'app_state' - state shared with the handlers
/// * 'bind' - address to bind to
/// * 'port' - port to listen on
pub async fn serve(app_state: AppState, bind: &str, port: u16) -> Result<(), ServiceError> {
    let addr = format!("{}:{}", bind, port);
    let listener = TcpListener::bind(&addr).await
        .map_err(|e| ServiceError(format!("error binding {}: {}", addr, e)))?;

    info!("AEPG network server listening on {}", addr);

    axum::serve(listener, build_router(app_state)).await
        .map_err(|e| ServiceError(format!("error serving api: {}", e)))
}

/// Serves a router on a free local port from a background thread, returns its base url
///
/// # Arguments
///
/// * 'router' - the router to serve
#[cfg(test)]
pub(crate) fn serve_in_background(router: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    format!("http://{}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::models::{NewFireRecord, NewObservation, POWER_SOURCE};

    fn state() -> AppState {
        let store = FireStore::in_memory();
        for (i, lvl) in ["h", "l", "H"].iter().enumerate() {
            let at = Utc.with_ymd_and_hms(2025, 10, 4, 8 + i as u32, 0, 0).unwrap();
            let fire = store.save_fire_record(None, NewFireRecord {
                latitude: 45.0 + i as f64,
                longitude: -75.0,
                confidence: 90.0,
                confidence_lvl: lvl.to_string(),
                satellite: "N".to_string(),
                acq_datetime: at,
                daynight: "D".to_string(),
                geom_wkt: format!("POINT(-75 {})", 45 + i),
            }).unwrap();
            store.ingest_weather_data(fire.id, vec![NewObservation {
                obs_time: at,
                parameter: "T2M".to_string(),
                value: Some(10.0),
                units: Some("degC".to_string()),
                source: POWER_SOURCE.to_string(),
            }]).unwrap();
        }

        AppState { store: Arc::new(store) }
    }

    #[tokio::test]
    async fn fire_endpoint_returns_records_with_weather() {
        let Json(fires) = fetch_fire_detected(State(state()), Query(FireQuery { filter: None })).await;

        assert_eq!(fires.len(), 3);
        assert!(fires.iter().all(|f| f.weather.len() == 1));
    }

    #[tokio::test]
    async fn fire_endpoint_honours_filter() {
        let Json(fires) = fetch_fire_detected(State(state()), Query(FireQuery { filter: Some("H".to_string()) })).await;

        assert_eq!(fires.len(), 2);
    }

    #[tokio::test]
    async fn power_endpoint_honours_fire() {
        let app = state();
        let Json(all) = fetch_power_data(State(app.clone()), Query(PowerQuery { fire: None })).await;
        let Json(one) = fetch_power_data(State(app), Query(PowerQuery { fire: Some(2) })).await;

        assert_eq!(all.len(), 3);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].fire_id, 2);
    }

    #[test]
    fn routes_answer_over_http() {
        let base = serve_in_background(build_router(state()));
        let client = reqwest::blocking::Client::new();

        let health = client.get(format!("{}/health", base)).send().unwrap();
        assert_eq!(health.status(), reqwest::StatusCode::OK);
        assert_eq!(health.text().unwrap(), "ok");

        let fires = client.get(format!("{}/api/detect/fire?filter=h", base)).send().unwrap();
        assert_eq!(fires.status(), reqwest::StatusCode::OK);
        let fires: Vec<FireDetection> = serde_json::from_str(&fires.text().unwrap()).unwrap();
        assert_eq!(fires.len(), 2);

        let unknown = client.get(format!("{}/api/detect/nothing", base)).send().unwrap();
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_query_values_are_rejected() {
        let base = serve_in_background(build_router(state()));
        let client = reqwest::blocking::Client::new();

        let power = client.get(format!("{}/api/detect/power?fire=abc", base)).send().unwrap();
        assert_eq!(power.status(), reqwest::StatusCode::BAD_REQUEST);

        let power = client.get(format!("{}/api/detect/power?fire=-1", base)).send().unwrap();
        assert_eq!(power.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn any_origin_is_allowed() {
        let base = serve_in_background(build_router(state()));
        let response = reqwest::blocking::Client::new()
            .get(format!("{}/api/detect/fire", base))
            .header("Origin", "http://localhost:5173")
            .send()
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
    }
}
