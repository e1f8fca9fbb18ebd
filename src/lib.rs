pub mod air_quality;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod fire;
pub mod initialization;
pub mod logging;
pub mod macros;
pub mod manager_firms;
pub mod manager_nasa_api;
pub mod manager_power;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod worker;
